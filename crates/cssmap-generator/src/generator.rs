//! One generation run: CSS text plus, when wanted, its source map

use std::borrow::Cow;
use std::collections::HashSet;
use std::rc::Rc;

use cssmap_ast::{PreviousMap, Root};
use cssmap_codec::SourceMapGenerator;
use once_cell::unsync::OnceCell;

use crate::accumulator::Accumulator;
use crate::annotation;
use crate::context::{GenerationContext, MapOptions};
use crate::error::GenerateError;
use crate::merge;
use crate::paths::PathResolver;
use crate::policy::{self, Inherited};
use crate::previous::collect_previous_maps;

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    /// Generated CSS, including the annotation comment if one was written
    pub css: String,
    /// The map, when one was produced and not inlined into `css`
    pub map: Option<SourceMapGenerator>,
}

/// Generates CSS and a source map for one tree
///
/// A generator is good for a single [`generate`](MapGenerator::generate)
/// call; the previous-map list and the path cache live as long as it does.
pub struct MapGenerator<'a> {
    root: &'a mut Root,
    ctx: &'a GenerationContext,
    options: Cow<'a, MapOptions>,
    paths: PathResolver,
    previous: OnceCell<Vec<Rc<PreviousMap>>>,
}

impl<'a> MapGenerator<'a> {
    pub fn new(root: &'a mut Root, ctx: &'a GenerationContext) -> Self {
        MapGenerator {
            root,
            ctx,
            options: ctx.map_options(),
            paths: PathResolver::new(ctx),
            previous: OnceCell::new(),
        }
    }

    /// Distinct maps of earlier passes, collected on first use
    pub fn previous(&self) -> &[Rc<PreviousMap>] {
        self.previous.get_or_init(|| collect_previous_maps(self.root))
    }

    fn inherited(&self) -> Inherited {
        Inherited::from_maps(self.previous())
    }

    pub fn is_map(&self) -> bool {
        policy::map_needed(self.ctx.map.as_ref(), &self.inherited())
    }

    pub fn is_inline(&self) -> bool {
        policy::inline(&self.options, &self.inherited())
    }

    pub fn is_sources_content(&self) -> bool {
        policy::sources_content(&self.options, &self.inherited())
    }

    pub fn is_annotation(&self) -> bool {
        policy::annotation_needed(&self.options, &self.inherited())
    }

    /// Produce the output
    ///
    /// Stale annotation comments are removed from the tree first, so running
    /// this twice on the same tree never yields two annotations.
    pub fn generate(self) -> Result<OutputArtifact, GenerateError> {
        let removed = annotation::clear_annotation(self.root, &self.options);
        if removed > 0 {
            tracing::debug!(removed, "Removed stale source map annotations");
        }

        if !self.is_map() {
            return Ok(OutputArtifact {
                css: self.root.to_string(),
                map: None,
            });
        }
        self.generate_map()
    }

    fn generate_map(mut self) -> Result<OutputArtifact, GenerateError> {
        let previous = self.previous().to_vec();
        let inherited = Inherited::from_maps(&previous);
        let inline = policy::inline(&self.options, &inherited);
        let sources_content = policy::sources_content(&self.options, &inherited);
        let annotation_needed = policy::annotation_needed(&self.options, &inherited);

        tracing::debug!(
            previous = inherited.count,
            inline,
            sources_content,
            annotation = annotation_needed,
            "Generating source map"
        );

        let output_file = policy::output_file(self.ctx, &mut self.paths);
        let mut accumulator = Accumulator::new(output_file.clone(), &mut self.paths);
        self.root.stringify(&mut accumulator);
        let (mut css, mut map) = accumulator.finish();

        if sources_content {
            set_sources_content(&mut map, self.root, &mut self.paths);
        }
        if inherited.has_previous() {
            let strip_content = self.options.sources_content == Some(false);
            merge::apply_previous_maps(&mut map, &previous, &mut self.paths, strip_content)?;
        }
        if annotation_needed {
            let content = policy::annotation_form(&self.options, &inherited, &map, &output_file);
            annotation::add_annotation(&mut css, &content);
        }

        Ok(OutputArtifact {
            css,
            map: if inline { None } else { Some(map) },
        })
    }
}

/// Embed the text of every input the tree was read from
fn set_sources_content(map: &mut SourceMapGenerator, root: &Root, paths: &mut PathResolver) {
    let mut seen = HashSet::new();
    root.walk(|node| {
        let Some(source) = node.source() else {
            return;
        };
        let input = &source.input;
        if seen.insert(input.from.clone()) {
            map.set_source_content(paths.relative(&input.from), Some(input.css.clone()));
        }
    });
}

/// Generate CSS and its map for `root` in one call
pub fn generate(root: &mut Root, ctx: &GenerationContext) -> Result<OutputArtifact, GenerateError> {
    MapGenerator::new(root, ctx).generate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Annotation, MapSetting};
    use cssmap_ast::{Comment, Input, Location, Rule, Source};

    fn tree() -> Root {
        let input = Rc::new(Input::new("a{}", "/work/a.css"));
        Root::new().append(
            Rule::new("a").with_source(Source::new(&input, Location::new(1, 1), Location::new(1, 3))),
        )
    }

    fn ctx(map: Option<MapSetting>) -> GenerationContext {
        let ctx = GenerationContext::new()
            .with_cwd("/work")
            .with_to("/work/out.css");
        match map {
            Some(map) => ctx.with_map(map),
            None => ctx,
        }
    }

    fn options(options: MapOptions) -> Option<MapSetting> {
        Some(MapSetting::Options(options))
    }

    #[test]
    fn test_no_map_without_request_or_history() {
        let mut root = tree();
        let out = generate(&mut root, &ctx(None)).unwrap();
        assert_eq!(out.css, "a{}");
        assert!(out.map.is_none());
    }

    #[test]
    fn test_map_false() {
        let mut root = tree();
        let out = generate(&mut root, &ctx(Some(MapSetting::Flag(false)))).unwrap();
        assert_eq!(out.css, "a{}");
        assert!(out.map.is_none());
    }

    #[test]
    fn test_map_true_defaults_to_inline() {
        let mut root = tree();
        let out = generate(&mut root, &ctx(Some(MapSetting::Flag(true)))).unwrap();
        assert!(
            out.css
                .starts_with("a{}\n/*# sourceMappingURL=data:application/json;base64,")
        );
        assert!(out.map.is_none());
    }

    #[test]
    fn test_external_map() {
        let mut root = tree();
        let out = generate(
            &mut root,
            &ctx(options(MapOptions {
                inline: Some(false),
                ..MapOptions::default()
            })),
        )
        .unwrap();
        assert_eq!(out.css, "a{}\n/*# sourceMappingURL=out.css.map */");

        let map = out.map.unwrap();
        assert_eq!(map.file(), Some("out.css"));
        assert_eq!(map.source_content("a.css"), Some("a{}"));
    }

    #[test]
    fn test_inline_without_annotation() {
        let mut root = tree();
        let out = generate(
            &mut root,
            &ctx(options(MapOptions {
                inline: Some(true),
                annotation: Some(Annotation::Flag(false)),
                ..MapOptions::default()
            })),
        )
        .unwrap();
        assert_eq!(out.css, "a{}");
        assert!(out.map.is_none());
    }

    #[test]
    fn test_disabled_sources_content() {
        let mut root = tree();
        let out = generate(
            &mut root,
            &ctx(options(MapOptions {
                inline: Some(false),
                sources_content: Some(false),
                ..MapOptions::default()
            })),
        )
        .unwrap();
        assert!(out.map.unwrap().to_raw().sources_content.is_none());
    }

    #[test]
    fn test_stale_annotation_removed() {
        let mut root = tree().append(Comment::new("# sourceMappingURL=old.map"));
        let out = generate(
            &mut root,
            &ctx(options(MapOptions {
                inline: Some(false),
                ..MapOptions::default()
            })),
        )
        .unwrap();
        assert_eq!(out.css, "a{}\n/*# sourceMappingURL=out.css.map */");
        assert_eq!(root.nodes.len(), 1);
    }

    #[test]
    fn test_policy_accessors() {
        let mut root = tree();
        let ctx = ctx(None);
        let generator = MapGenerator::new(&mut root, &ctx);
        assert!(generator.previous().is_empty());
        assert!(!generator.is_map());
        assert!(generator.is_inline());
        assert!(generator.is_sources_content());
        assert!(generator.is_annotation());
    }
}
