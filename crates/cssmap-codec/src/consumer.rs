//! Decoded, queryable source maps

use crate::error::CodecError;
use crate::types::{Mapping, Position, RawSourceMap};
use crate::utils::join;
use crate::vlq;

/// Result of looking up a generated position in a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
    /// Source path, already joined with the map's `sourceRoot`
    pub source: String,
    /// Line in the source (1-indexed)
    pub line: u32,
    /// Column in the source (0-indexed)
    pub column: u32,
    pub name: Option<String>,
}

/// A source map with its mappings decoded and sorted by generated position
#[derive(Debug, Clone)]
pub struct SourceMapConsumer {
    file: Option<String>,
    source_root: Option<String>,
    sources: Vec<String>,
    sources_content: Option<Vec<Option<String>>>,
    mappings: Vec<Mapping>,
}

impl SourceMapConsumer {
    /// Parse and decode map JSON
    pub fn from_json(text: &str) -> Result<Self, CodecError> {
        Self::from_raw(RawSourceMap::from_json(text)?)
    }

    /// Decode an already parsed map
    pub fn from_raw(raw: RawSourceMap) -> Result<Self, CodecError> {
        if raw.version != 3 {
            return Err(CodecError::UnsupportedVersion(raw.version));
        }

        let root = raw.source_root.as_deref().filter(|r| !r.is_empty());
        let sources: Vec<String> = raw
            .sources
            .iter()
            .map(|source| match root {
                Some(root) => join(root, source),
                None => source.clone(),
            })
            .collect();

        let mut mappings = decode_mappings(&raw.mappings, &sources, &raw.names)?;
        mappings.sort_by(|a, b| a.generated.cmp(&b.generated));

        Ok(SourceMapConsumer {
            file: raw.file,
            source_root: raw.source_root,
            sources,
            sources_content: raw.sources_content,
            mappings,
        })
    }

    /// The generated file this map describes, if declared
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// Sources, joined with `sourceRoot`
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// All mappings in generated order
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Whether the map embeds any source text list at all
    pub fn has_sources_content(&self) -> bool {
        self.sources_content
            .as_ref()
            .is_some_and(|contents| !contents.is_empty())
    }

    /// Embedded text for `source` (a path as returned by [`Self::sources`])
    pub fn source_content_for(&self, source: &str) -> Option<&str> {
        let index = self.sources.iter().position(|s| s == source)?;
        self.sources_content
            .as_ref()?
            .get(index)?
            .as_deref()
    }

    /// Drop every embedded source text, keeping the list shape
    pub fn without_sources_content(mut self) -> Self {
        if let Some(contents) = self.sources_content.as_mut() {
            for content in contents.iter_mut() {
                *content = None;
            }
        }
        self
    }

    /// Find where a generated position came from
    ///
    /// Uses the closest mapping at or before `column` on the same generated
    /// `line`. When several mappings share that position the first one wins.
    pub fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition> {
        let needle = Position::new(line, column);
        let upper = self.mappings.partition_point(|m| m.generated <= needle);
        if upper == 0 {
            return None;
        }

        let target = self.mappings[upper - 1].generated;
        if target.line != line {
            return None;
        }
        let first = self.mappings.partition_point(|m| m.generated < target);
        let mapping = &self.mappings[first];

        Some(OriginalPosition {
            source: mapping.source.clone()?,
            line: mapping.original?.line,
            column: mapping.original?.column,
            name: mapping.name.clone(),
        })
    }
}

fn decode_mappings(
    encoded: &str,
    sources: &[String],
    names: &[String],
) -> Result<Vec<Mapping>, CodecError> {
    let mut mappings = Vec::new();
    let mut segment_index = 0usize;

    // Everything but the generated column is relative across lines
    let mut source_index: i64 = 0;
    let mut original_line: i64 = 0;
    let mut original_column: i64 = 0;
    let mut name_index: i64 = 0;

    for (line_index, line) in encoded.split(';').enumerate() {
        let mut generated_column: i64 = 0;

        for segment in line.split(',') {
            if segment.is_empty() {
                continue;
            }
            let invalid = |reason: String| CodecError::InvalidMapping {
                segment: segment_index,
                reason,
            };

            let values = vlq::decode_segment(segment).map_err(invalid)?;
            if !matches!(values.len(), 1 | 4 | 5) {
                return Err(invalid(format!(
                    "expected 1, 4 or 5 fields, found {}",
                    values.len()
                )));
            }

            generated_column = offset(generated_column, values[0])
                .ok_or_else(|| invalid("generated column out of range".to_string()))?;
            let generated = Position::new(
                line_number(line_index)
                    .ok_or_else(|| invalid("generated line out of range".to_string()))?,
                to_u32(generated_column)
                    .ok_or_else(|| invalid("generated column out of range".to_string()))?,
            );

            let mut mapping = Mapping::generated_only(generated);
            if values.len() >= 4 {
                source_index = source_index
                    .checked_add(values[1])
                    .ok_or_else(|| invalid("source index out of range".to_string()))?;
                original_line = offset(original_line, values[2])
                    .ok_or_else(|| invalid("original line out of range".to_string()))?;
                original_column = offset(original_column, values[3])
                    .ok_or_else(|| invalid("original column out of range".to_string()))?;

                let source = usize::try_from(source_index)
                    .ok()
                    .and_then(|i| sources.get(i))
                    .ok_or(CodecError::IndexOutOfRange {
                        kind: "source",
                        index: source_index,
                    })?;
                let line = to_u32(original_line)
                    .and_then(|line| line.checked_add(1))
                    .ok_or_else(|| invalid("original line out of range".to_string()))?;
                let column = to_u32(original_column)
                    .ok_or_else(|| invalid("original column out of range".to_string()))?;
                mapping.source = Some(source.clone());
                mapping.original = Some(Position::new(line, column));
            }
            if values.len() == 5 {
                name_index = name_index
                    .checked_add(values[4])
                    .ok_or_else(|| invalid("name index out of range".to_string()))?;
                let name = usize::try_from(name_index)
                    .ok()
                    .and_then(|i| names.get(i))
                    .ok_or(CodecError::IndexOutOfRange {
                        kind: "name",
                        index: name_index,
                    })?;
                mapping.name = Some(name.clone());
            }

            mappings.push(mapping);
            segment_index += 1;
        }
    }

    Ok(mappings)
}

/// Apply a relative delta; `None` on overflow or a negative result
fn offset(value: i64, delta: i64) -> Option<i64> {
    value.checked_add(delta).filter(|v| *v >= 0)
}

fn to_u32(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

fn line_number(line_index: usize) -> Option<u32> {
    u32::try_from(line_index).ok()?.checked_add(1)
}
