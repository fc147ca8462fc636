//! Error types for map decoding and composition.

use thiserror::Error;

/// Errors that can occur while reading or composing source maps
#[derive(Debug, Error)]
pub enum CodecError {
    /// The map text is not valid JSON or does not have the v3 shape
    #[error("Invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Only revision 3 of the format is understood
    #[error("Unsupported source map version: {0}")]
    UnsupportedVersion(u32),

    /// A `mappings` segment could not be decoded
    #[error("Invalid VLQ mapping data at segment {segment}: {reason}")]
    InvalidMapping { segment: usize, reason: String },

    /// A segment refers to a source or name index outside the declared lists
    #[error("Mapping refers to unknown {kind} index {index}")]
    IndexOutOfRange { kind: &'static str, index: i64 },

    /// Composition needs a source name and the map declares no `file`
    #[error("apply_source_map requires a source file name when the map has no `file` field")]
    MissingFile,
}
