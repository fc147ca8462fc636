//! The trailing `sourceMappingURL` comment

use cssmap_ast::{ANNOTATION_MARKER, Root};

use crate::context::{Annotation, MapOptions};

/// Remove annotation comments left at the top level of the tree
///
/// Nothing is removed when annotations are explicitly disabled. Returns the
/// number of comments removed.
pub fn clear_annotation(root: &mut Root, options: &MapOptions) -> usize {
    if options.annotation == Some(Annotation::Flag(false)) {
        return 0;
    }

    let mut removed = 0;
    for index in (0..root.nodes.len()).rev() {
        let is_annotation = root.nodes[index]
            .as_comment()
            .is_some_and(|comment| comment.text.starts_with(ANNOTATION_MARKER));
        if is_annotation {
            root.remove(index);
            removed += 1;
        }
    }
    removed
}

/// Append the annotation comment for `content` on a new line
pub fn add_annotation(css: &mut String, content: &str) {
    css.push_str("\n/*");
    css.push_str(ANNOTATION_MARKER);
    css.push_str(content);
    css.push_str(" */");
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssmap_ast::{Comment, Rule};

    fn tree() -> Root {
        Root::new()
            .append(Comment::new("# sourceMappingURL=old.css.map"))
            .append(Rule::new("a"))
            .append(Comment::new("keep me"))
            .append(Comment::new("# sourceMappingURL=data:application/json;base64,e30="))
    }

    #[test]
    fn test_clears_every_annotation() {
        let mut root = tree();
        assert_eq!(clear_annotation(&mut root, &MapOptions::default()), 2);
        assert_eq!(root.to_string(), "a{}/*keep me*/");
    }

    #[test]
    fn test_disabled_annotation_keeps_comments() {
        let mut root = tree();
        let options = MapOptions {
            annotation: Some(Annotation::Flag(false)),
            ..MapOptions::default()
        };
        assert_eq!(clear_annotation(&mut root, &options), 0);
        assert_eq!(root.nodes.len(), 4);
    }

    #[test]
    fn test_add_annotation() {
        let mut css = "a{}".to_string();
        add_annotation(&mut css, "out.css.map");
        assert_eq!(css, "a{}\n/*# sourceMappingURL=out.css.map */");
    }
}
