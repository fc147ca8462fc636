//! Folding the maps of earlier passes into the new map

use std::rc::Rc;

use cssmap_ast::PreviousMap;
use cssmap_codec::{CodecError, SourceMapGenerator, dirname};

use crate::paths::PathResolver;

/// Compose `map` with every previous map, in order
///
/// Mappings of `map` that point into a previous pass's output are rewritten
/// to point at that pass's own sources. With `strip_content` the previous
/// maps are decoded afresh without their embedded source text, so none of
/// it reaches `map`.
pub fn apply_previous_maps(
    map: &mut SourceMapGenerator,
    previous: &[Rc<PreviousMap>],
    paths: &mut PathResolver,
    strip_content: bool,
) -> Result<(), CodecError> {
    for prev in previous {
        let from = paths.relative(prev.file());
        let root = prev
            .root()
            .map_or_else(|| dirname(prev.file()), str::to_string);
        let root = paths.relative(&root);

        tracing::trace!(file = %from, root = %root, strip_content, "Applying previous map");

        if strip_content {
            let consumer = prev.consumer_without_content()?;
            map.apply_source_map(&consumer, Some(&from), Some(&root))?;
        } else {
            map.apply_source_map(prev.consumer()?, Some(&from), Some(&root))?;
        }
    }
    Ok(())
}
