//! Error types for map generation.

use cssmap_ast::PreviousMapError;
use cssmap_codec::CodecError;
use thiserror::Error;

/// Errors that can occur while generating a map
///
/// Generation itself cannot fail; every variant comes from reading a map
/// of an earlier pass, either while building an input
/// ([`GenerationContext::input`](crate::GenerationContext::input)) or while
/// merging it.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A previous map could not be decoded or composed
    #[error("Failed to merge previous source map: {0}")]
    Codec(#[from] CodecError),

    /// A previous map could not be loaded for an input
    #[error("Failed to load previous source map: {0}")]
    PreviousMap(#[from] PreviousMapError),
}
