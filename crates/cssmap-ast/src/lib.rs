//! CSS node model for mapped stringification
//!
//! This crate holds the tree side of source map generation: nodes that
//! remember where they came from ([`Source`]), the input they were read from
//! ([`Input`], possibly carrying a [`PreviousMap`] from an earlier pass), and
//! a stringifier that reports every emitted fragment to a [`Builder`].
//!
//! Parsing is not provided; trees are built with the constructors on each
//! node type.

mod node;
mod previous_map;
mod stringify;

pub use node::{AtRule, Comment, Declaration, Input, Location, Node, Raws, Root, Rule, Source};
pub use previous_map::{ANNOTATION_MARKER, PrevMapSource, PreviousMap, PreviousMapError};
pub use stringify::{Builder, FragmentRole};
