//! Maps of earlier passes found on a tree

use std::rc::Rc;

use cssmap_ast::{PreviousMap, Root};

/// Collect the previous map of every input referenced by the tree
///
/// Maps are compared by identity, not by path: two inputs may share a path
/// yet carry different maps. The result is in first-seen, depth-first order.
pub fn collect_previous_maps(root: &Root) -> Vec<Rc<PreviousMap>> {
    let mut maps: Vec<Rc<PreviousMap>> = Vec::new();
    root.walk(|node| {
        let Some(map) = node.source().and_then(|source| source.input.map.as_ref()) else {
            return;
        };
        if !maps.iter().any(|seen| Rc::ptr_eq(seen, map)) {
            maps.push(Rc::clone(map));
        }
    });
    maps
}
