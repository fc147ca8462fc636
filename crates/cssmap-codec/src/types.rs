//! Core types for source maps

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A position in text as the source map format counts it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (0-indexed, in UTF-16 code units)
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// A single entry of a source map
///
/// A mapping without `original` only marks a generated position as having
/// no source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Position in the generated text
    pub generated: Position,
    /// Position in the original text
    pub original: Option<Position>,
    /// Source the original position belongs to
    pub source: Option<String>,
    /// Original identifier name, if any
    pub name: Option<String>,
}

impl Mapping {
    /// Create a mapping from a generated position to a position in `source`
    pub fn original(generated: Position, source: impl Into<String>, original: Position) -> Self {
        Mapping {
            generated,
            original: Some(original),
            source: Some(source.into()),
            name: None,
        }
    }

    /// Create a mapping that only marks a generated position
    pub fn generated_only(generated: Position) -> Self {
        Mapping {
            generated,
            original: None,
            source: None,
            name: None,
        }
    }

    /// Attach an original name to this mapping
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Ordering used when serializing: generated position first, then
    /// source, original position and name.
    pub(crate) fn cmp_by_generated(&self, other: &Mapping) -> Ordering {
        self.generated
            .cmp(&other.generated)
            .then_with(|| self.source.cmp(&other.source))
            .then_with(|| self.original.cmp(&other.original))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// The JSON shape of a revision 3 source map
///
/// Field order follows what most tools emit so serialized maps diff cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
}

impl RawSourceMap {
    /// Parse map JSON without decoding the mappings
    pub fn from_json(text: &str) -> Result<Self, crate::CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Whether the map carries a non-empty `sourcesContent` list
    pub fn has_sources_content(&self) -> bool {
        self.sources_content
            .as_ref()
            .is_some_and(|contents| !contents.is_empty())
    }
}
