//! Decisions about the shape of the generated map
//!
//! Every decision follows the same precedence: an explicit option wins,
//! otherwise the maps of earlier passes are consulted (so a pipeline keeps
//! the style it started with), otherwise a fixed default applies.

use std::rc::Rc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cssmap_ast::PreviousMap;
use cssmap_codec::SourceMapGenerator;

use crate::context::{Annotation, GenerationContext, MapOptions, MapSetting};
use crate::paths::PathResolver;

/// Output name used when neither `to` nor `from` is known
pub const DEFAULT_OUTPUT_FILE: &str = "to.css";

/// What the maps of earlier passes had in common
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inherited {
    /// Number of distinct previous maps
    pub count: usize,
    /// Some previous map was inline
    pub any_inline: bool,
    /// Some previous map embedded source text
    pub any_content: bool,
    /// Some previous input carried an annotation comment
    pub any_annotation: bool,
}

impl Inherited {
    pub fn from_maps(maps: &[Rc<PreviousMap>]) -> Self {
        Inherited {
            count: maps.len(),
            any_inline: maps.iter().any(|m| m.is_inline()),
            any_content: maps.iter().any(|m| m.with_content()),
            any_annotation: maps.iter().any(|m| m.has_annotation()),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.count > 0
    }
}

/// Whether a map is produced at all
pub fn map_needed(setting: Option<&MapSetting>, inherited: &Inherited) -> bool {
    match setting {
        Some(MapSetting::Flag(flag)) => *flag,
        Some(MapSetting::Options(_)) => true,
        None => inherited.has_previous(),
    }
}

/// Whether the map is embedded in the CSS instead of returned separately
///
/// With no previous maps this defaults to `true`, while [`map_needed`]
/// defaults to `false`; the two only meet when a map is requested.
pub fn inline(options: &MapOptions, inherited: &Inherited) -> bool {
    if let Some(inline) = options.inline {
        return inline;
    }
    // a custom or disabled annotation means the map lives in its own file
    if matches!(&options.annotation, Some(a) if *a != Annotation::Flag(true)) {
        return false;
    }
    if inherited.has_previous() {
        inherited.any_inline
    } else {
        true
    }
}

/// Whether the map embeds the text of its sources
pub fn sources_content(options: &MapOptions, inherited: &Inherited) -> bool {
    match options.sources_content {
        Some(value) => value,
        None if inherited.has_previous() => inherited.any_content,
        None => true,
    }
}

/// Whether an annotation comment is appended to the CSS
///
/// An explicit `annotation: false` always wins, even for inline maps; the
/// map is then dropped rather than embedded.
pub fn annotation_needed(options: &MapOptions, inherited: &Inherited) -> bool {
    if options.annotation == Some(Annotation::Flag(false)) {
        return false;
    }
    if inline(options, inherited) {
        return true;
    }
    match &options.annotation {
        Some(Annotation::Flag(flag)) => *flag,
        Some(Annotation::Path(_)) => true,
        None if inherited.has_previous() => inherited.any_annotation,
        None => true,
    }
}

/// Text of the annotation: a data URI, the custom path, or `<output>.map`
pub fn annotation_form(
    options: &MapOptions,
    inherited: &Inherited,
    map: &SourceMapGenerator,
    output_file: &str,
) -> String {
    if inline(options, inherited) {
        format!(
            "data:application/json;base64,{}",
            STANDARD.encode(map.to_json())
        )
    } else if let Some(Annotation::Path(path)) = &options.annotation {
        path.clone()
    } else {
        format!("{output_file}.map")
    }
}

/// Name of the generated file: `to`, else `from`, else [`DEFAULT_OUTPUT_FILE`]
pub fn output_file(ctx: &GenerationContext, paths: &mut PathResolver) -> String {
    match ctx.to.as_deref().or(ctx.from.as_deref()) {
        Some(file) => paths.relative(file),
        None => DEFAULT_OUTPUT_FILE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: Inherited = Inherited {
        count: 0,
        any_inline: false,
        any_content: false,
        any_annotation: false,
    };

    fn previous(any_inline: bool, any_content: bool, any_annotation: bool) -> Inherited {
        Inherited {
            count: 1,
            any_inline,
            any_content,
            any_annotation,
        }
    }

    fn options(inline: Option<bool>, annotation: Option<Annotation>) -> MapOptions {
        MapOptions {
            inline,
            annotation,
            ..MapOptions::default()
        }
    }

    #[test]
    fn test_map_needed() {
        assert!(!map_needed(None, &NONE));
        assert!(map_needed(None, &previous(false, false, false)));
        assert!(!map_needed(
            Some(&MapSetting::Flag(false)),
            &previous(true, true, true)
        ));
        assert!(map_needed(Some(&MapSetting::Flag(true)), &NONE));
        assert!(map_needed(
            Some(&MapSetting::Options(MapOptions::default())),
            &NONE
        ));
    }

    #[test]
    fn test_inline_defaults_and_inheritance() {
        let empty = MapOptions::default();
        assert!(inline(&empty, &NONE));
        assert!(inline(&empty, &previous(true, false, false)));
        assert!(!inline(&empty, &previous(false, false, false)));
    }

    #[test]
    fn test_inline_explicit_wins() {
        assert!(!inline(&options(Some(false), None), &previous(true, false, false)));
        assert!(inline(
            &options(Some(true), Some(Annotation::Flag(false))),
            &NONE
        ));
    }

    #[test]
    fn test_annotation_option_implies_external() {
        assert!(!inline(&options(None, Some(Annotation::Path("x.map".into()))), &NONE));
        assert!(!inline(&options(None, Some(Annotation::Flag(false))), &NONE));
        assert!(inline(&options(None, Some(Annotation::Flag(true))), &NONE));
    }

    #[test]
    fn test_sources_content() {
        let empty = MapOptions::default();
        assert!(sources_content(&empty, &NONE));
        assert!(!sources_content(&empty, &previous(false, false, false)));
        assert!(sources_content(&empty, &previous(false, true, false)));

        let disabled = MapOptions {
            sources_content: Some(false),
            ..MapOptions::default()
        };
        assert!(!sources_content(&disabled, &previous(false, true, false)));
    }

    #[test]
    fn test_annotation_needed() {
        // inline maps need their comment unless it is switched off
        assert!(annotation_needed(&MapOptions::default(), &NONE));
        assert!(annotation_needed(
            &options(Some(true), None),
            &previous(false, false, false)
        ));
        assert!(!annotation_needed(
            &options(Some(true), Some(Annotation::Flag(false))),
            &NONE
        ));

        let external = options(Some(false), None);
        assert!(annotation_needed(&external, &NONE));
        assert!(!annotation_needed(&external, &previous(false, false, false)));
        assert!(annotation_needed(&external, &previous(false, false, true)));

        assert!(!annotation_needed(
            &options(Some(false), Some(Annotation::Flag(false))),
            &previous(false, false, true)
        ));
        assert!(annotation_needed(
            &options(None, Some(Annotation::Path("x.map".into()))),
            &NONE
        ));
    }

    #[test]
    fn test_annotation_form() {
        let map = SourceMapGenerator::new(Some("out.css".into()));

        let external = options(Some(false), None);
        assert_eq!(
            annotation_form(&external, &NONE, &map, "out.css"),
            "out.css.map"
        );

        let custom = options(None, Some(Annotation::Path("maps/out.map".into())));
        assert_eq!(
            annotation_form(&custom, &NONE, &map, "out.css"),
            "maps/out.map"
        );

        let inline_form = annotation_form(&MapOptions::default(), &NONE, &map, "out.css");
        let encoded = inline_form
            .strip_prefix("data:application/json;base64,")
            .unwrap();
        let decoded = String::from_utf8(STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, map.to_json());
    }

    #[test]
    fn test_output_file_fallbacks() {
        let base = GenerationContext::new().with_cwd("/work");

        let ctx = base.clone().with_to("/work/dist/out.css").with_from("/work/a.css");
        let mut paths = PathResolver::new(&ctx);
        assert_eq!(output_file(&ctx, &mut paths), "out.css");

        let ctx = base.clone().with_from("/work/a.css");
        let mut paths = PathResolver::new(&ctx);
        assert_eq!(output_file(&ctx, &mut paths), "a.css");

        let mut paths = PathResolver::new(&base);
        assert_eq!(output_file(&base, &mut paths), DEFAULT_OUTPUT_FILE);
    }
}
