//! Per-run configuration
//!
//! The option types deserialize from the same JSON shapes CSS tooling
//! commonly accepts:
//!
//! ```json
//! { "from": "src/a.css", "to": "dist/a.css",
//!   "map": { "inline": false, "annotation": "maps/a.css.map", "sourcesContent": true } }
//! ```
//!
//! `map` may also be `true` or `false`, and `annotation` may be a boolean.

use std::borrow::Cow;

use cssmap_ast::{Input, PrevMapSource};
use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// The `map` option: a flag or a bag of map options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapSetting {
    Flag(bool),
    Options(MapOptions),
}

/// The `map.annotation` option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Annotation {
    /// `true` keeps the default annotation, `false` suppresses it
    Flag(bool),
    /// Custom annotation text, also the location the map file will live at
    Path(String),
}

/// Options recognized inside `map: { ... }`
///
/// `None` means the option was not given; decisions then fall back to what
/// maps of earlier passes did, then to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<bool>,
    /// Map of the pass that produced the input, see [`GenerationContext::input`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<PrevMapSource>,
}

/// Read-only configuration of one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Where the output CSS will be written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Where the input CSS was read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<MapSetting>,
    /// Directory relative paths are resolved against; the process working
    /// directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_map(mut self, map: MapSetting) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// The options bag; `map: true`, `map: false` and no `map` all read as
    /// an empty bag
    pub fn map_options(&self) -> Cow<'_, MapOptions> {
        match &self.map {
            Some(MapSetting::Options(options)) => Cow::Borrowed(options),
            _ => Cow::Owned(MapOptions::default()),
        }
    }

    /// Directory used to resolve relative paths
    pub fn working_dir(&self) -> String {
        if let Some(cwd) = &self.cwd {
            return cwd.clone();
        }
        std::env::current_dir()
            .map(|dir| dir.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "/".to_string())
    }

    /// Build the [`Input`] for `css` read from this context's `from`
    ///
    /// The previous map is taken from `map.prev` or from an inline
    /// annotation in `css`.
    pub fn input(&self, css: impl Into<String>) -> Result<Input, GenerateError> {
        let from = self.from.clone().unwrap_or_else(|| "<input css>".to_string());
        let options = self.map_options();
        Ok(Input::with_previous_map(css, from, options.prev.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_flags() {
        let ctx: GenerationContext = serde_json::from_str(r#"{"map": false}"#).unwrap();
        assert_eq!(ctx.map, Some(MapSetting::Flag(false)));

        let ctx: GenerationContext = serde_json::from_str(r#"{"to": "out.css"}"#).unwrap();
        assert_eq!(ctx.map, None);
        assert_eq!(ctx.to.as_deref(), Some("out.css"));
    }

    #[test]
    fn test_deserialize_options() {
        let ctx: GenerationContext = serde_json::from_str(
            r#"{"map": {"inline": false, "annotation": "maps/out.map", "sourcesContent": false}}"#,
        )
        .unwrap();
        let options = ctx.map_options();
        assert_eq!(options.inline, Some(false));
        assert_eq!(
            options.annotation,
            Some(Annotation::Path("maps/out.map".into()))
        );
        assert_eq!(options.sources_content, Some(false));
        assert_eq!(options.prev, None);
    }

    #[test]
    fn test_annotation_flag() {
        let options: MapOptions = serde_json::from_str(r#"{"annotation": false}"#).unwrap();
        assert_eq!(options.annotation, Some(Annotation::Flag(false)));
    }

    #[test]
    fn test_flag_map_reads_as_empty_options() {
        let ctx = GenerationContext::new().with_map(MapSetting::Flag(true));
        assert_eq!(*ctx.map_options(), MapOptions::default());
    }

    #[test]
    fn test_explicit_cwd() {
        let ctx = GenerationContext::new().with_cwd("/work");
        assert_eq!(ctx.working_dir(), "/work");
    }

    #[test]
    fn test_input_uses_prev_option() {
        let ctx = GenerationContext::new()
            .with_from("b.css")
            .with_map(MapSetting::Options(MapOptions {
                prev: Some(PrevMapSource::Text(
                    r#"{"version":3,"sources":["a.css"],"mappings":"AAAA"}"#.into(),
                )),
                ..MapOptions::default()
            }));
        let input = ctx.input("a{}").unwrap();
        assert_eq!(input.from, "b.css");
        let map = input.map.unwrap();
        assert_eq!(map.file(), "b.css");
    }

    #[test]
    fn test_input_reports_unreadable_prev() {
        let ctx = GenerationContext::new()
            .with_from("b.css")
            .with_map(MapSetting::Options(MapOptions {
                prev: Some(PrevMapSource::Text("{oops".into())),
                ..MapOptions::default()
            }));
        let err = ctx.input("a{}").unwrap_err();
        assert!(matches!(err, GenerateError::PreviousMap(_)));
    }
}
