//! Incremental construction of source maps

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexSet;

use crate::consumer::SourceMapConsumer;
use crate::error::CodecError;
use crate::types::{Mapping, RawSourceMap};
use crate::utils::join;
use crate::vlq;

/// A source map under construction
///
/// Mappings may be added in any order; they are sorted by generated
/// position when the map is serialized.
#[derive(Debug, Clone, Default)]
pub struct SourceMapGenerator {
    file: Option<String>,
    sources: IndexSet<String>,
    names: IndexSet<String>,
    mappings: Vec<Mapping>,
    sources_content: HashMap<String, String>,
}

impl SourceMapGenerator {
    /// Create an empty map for the generated file `file`
    pub fn new(file: Option<String>) -> Self {
        SourceMapGenerator {
            file,
            ..Default::default()
        }
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Sources in first-use order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    /// Record one mapping
    pub fn add_mapping(&mut self, mapping: Mapping) {
        if let Some(source) = &mapping.source {
            self.sources.insert(source.clone());
        }
        if let Some(name) = &mapping.name {
            self.names.insert(name.clone());
        }
        self.mappings.push(mapping);
    }

    /// Set or clear the embedded text of `source`
    pub fn set_source_content(&mut self, source: impl Into<String>, content: Option<String>) {
        let source = source.into();
        match content {
            Some(content) => {
                self.sources_content.insert(source, content);
            }
            None => {
                self.sources_content.remove(&source);
            }
        }
    }

    pub fn source_content(&self, source: &str) -> Option<&str> {
        self.sources_content.get(source).map(String::as_str)
    }

    /// Rewrite every mapping into `source_file` through `consumer`
    ///
    /// `consumer` must map the text of `source_file` to its own sources.
    /// Each mapping that points at `source_file` is redirected to wherever
    /// `consumer` says that position came from, so two chained maps
    /// collapse into one. Sources of `consumer` are joined onto
    /// `source_map_path`, the directory of `consumer` relative to this map.
    /// Embedded source text of `consumer` is carried over.
    ///
    /// When `source_file` is `None` the consumer's `file` field is used.
    pub fn apply_source_map(
        &mut self,
        consumer: &SourceMapConsumer,
        source_file: Option<&str>,
        source_map_path: Option<&str>,
    ) -> Result<(), CodecError> {
        let source_file = match source_file {
            Some(file) => file.to_string(),
            None => consumer.file().ok_or(CodecError::MissingFile)?.to_string(),
        };
        let relocate = |source: &str| match source_map_path {
            Some(path) => join(path, source),
            None => source.to_string(),
        };

        let mut sources = IndexSet::new();
        let mut names = IndexSet::new();

        for mapping in &mut self.mappings {
            if mapping.source.as_deref() == Some(source_file.as_str())
                && let Some(original) = mapping.original
                && let Some(found) = consumer.original_position_for(original.line, original.column)
            {
                mapping.source = Some(relocate(&found.source));
                mapping.original = Some(crate::Position::new(found.line, found.column));
                if found.name.is_some() {
                    mapping.name = found.name;
                }
            }

            if let Some(source) = &mapping.source {
                sources.insert(source.clone());
            }
            if let Some(name) = &mapping.name {
                names.insert(name.clone());
            }
        }

        self.sources = sources;
        self.names = names;

        for source in consumer.sources() {
            if let Some(content) = consumer.source_content_for(source) {
                self.set_source_content(relocate(source), Some(content.to_string()));
            }
        }

        Ok(())
    }

    /// Build the JSON shape of this map
    pub fn to_raw(&self) -> RawSourceMap {
        let mut ordered: Vec<&Mapping> = self.mappings.iter().collect();
        ordered.sort_by(|a, b| a.cmp_by_generated(b));

        let sources_content = if self.sources_content.is_empty() {
            None
        } else {
            Some(
                self.sources
                    .iter()
                    .map(|source| self.sources_content.get(source).cloned())
                    .collect(),
            )
        };

        RawSourceMap {
            version: 3,
            sources: self.sources.iter().cloned().collect(),
            names: self.names.iter().cloned().collect(),
            mappings: self.serialize_mappings(&ordered),
            file: self.file.clone(),
            source_root: None,
            sources_content,
        }
    }

    /// Serialized JSON text of this map
    pub fn to_json(&self) -> String {
        self.to_string()
    }

    fn serialize_mappings(&self, ordered: &[&Mapping]) -> String {
        let mut out = String::new();
        let mut previous_line = 1;
        let mut previous_column: i64 = 0;
        let mut previous_source: i64 = 0;
        let mut previous_original_line: i64 = 0;
        let mut previous_original_column: i64 = 0;
        let mut previous_name: i64 = 0;

        for (i, mapping) in ordered.iter().enumerate() {
            if mapping.generated.line != previous_line {
                previous_column = 0;
                while mapping.generated.line != previous_line {
                    out.push(';');
                    previous_line += 1;
                }
            } else if i > 0 {
                if mapping.cmp_by_generated(ordered[i - 1]).is_eq() {
                    continue;
                }
                out.push(',');
            }

            let column = i64::from(mapping.generated.column);
            vlq::encode(column - previous_column, &mut out);
            previous_column = column;

            let (Some(source), Some(original)) = (&mapping.source, mapping.original) else {
                continue;
            };
            let source_index = self.sources.get_index_of(source).unwrap_or_default() as i64;
            vlq::encode(source_index - previous_source, &mut out);
            previous_source = source_index;

            let original_line = i64::from(original.line) - 1;
            vlq::encode(original_line - previous_original_line, &mut out);
            previous_original_line = original_line;

            let original_column = i64::from(original.column);
            vlq::encode(original_column - previous_original_column, &mut out);
            previous_original_column = original_column;

            if let Some(name) = &mapping.name {
                let name_index = self.names.get_index_of(name).unwrap_or_default() as i64;
                vlq::encode(name_index - previous_name, &mut out);
                previous_name = name_index;
            }
        }

        out
    }
}

impl fmt::Display for SourceMapGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.to_raw()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
