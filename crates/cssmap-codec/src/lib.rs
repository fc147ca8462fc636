//! Source map v3 codec
//!
//! This crate implements the wire format used by browsers and tooling to
//! trace generated text back to its sources: Base64 VLQ segment encoding,
//! an incremental [`SourceMapGenerator`], a queryable [`SourceMapConsumer`],
//! and composition of one map through another
//! ([`SourceMapGenerator::apply_source_map`]).
//!
//! # Example
//!
//! ```rust
//! use cssmap_codec::*;
//!
//! let mut map = SourceMapGenerator::new(Some("out.css".into()));
//! map.add_mapping(Mapping::original(
//!     Position::new(1, 0),
//!     "in.css",
//!     Position::new(3, 4),
//! ));
//!
//! let consumer = SourceMapConsumer::from_json(&map.to_string()).unwrap();
//! let found = consumer.original_position_for(1, 0).unwrap();
//! assert_eq!(found.source, "in.css");
//! assert_eq!(found.line, 3);
//! assert_eq!(found.column, 4);
//! ```

pub mod consumer;
pub mod error;
pub mod generator;
pub mod types;
pub mod utils;
pub mod vlq;

// Re-export main types
pub use consumer::{OriginalPosition, SourceMapConsumer};
pub use error::CodecError;
pub use generator::SourceMapGenerator;
pub use types::{Mapping, Position, RawSourceMap};
pub use utils::{dirname, is_absolute, join, normalize};
