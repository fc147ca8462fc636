//! Source map generation for stringified CSS
//!
//! Given a [`Root`](cssmap_ast::Root) and a [`GenerationContext`], this crate
//! produces the output CSS and, when one is wanted, a source map for it. Maps
//! from earlier passes found on the tree's inputs are folded into the new map
//! so that a chain of transformations ends up with a single map pointing at
//! the original files.
//!
//! # Overview
//!
//! - [`policy`]: decides whether a map is produced, inlined, embeds source
//!   text and gets an annotation comment
//! - [`paths`]: relative source paths, cached per run
//! - [`previous`]: finds the maps of earlier passes on the tree
//! - [`accumulator`]: records mappings while the tree is stringified
//! - [`merge`]: composes the new map with the earlier ones
//! - [`annotation`]: removes stale annotation comments and writes the new one
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use cssmap_ast::{Declaration, Input, Location, Root, Rule, Source};
//! use cssmap_generator::{GenerationContext, MapOptions, MapSetting, generate};
//!
//! let input = Rc::new(Input::new("a{color:red}", "/src/a.css"));
//! let mut root = Root::new().append(
//!     Rule::new("a")
//!         .with_source(Source::new(&input, Location::new(1, 1), Location::new(1, 12)))
//!         .append(Declaration::new("color", "red")),
//! );
//!
//! let ctx = GenerationContext::new()
//!     .with_from("/src/a.css")
//!     .with_to("/dist/a.css")
//!     .with_map(MapSetting::Options(MapOptions {
//!         inline: Some(false),
//!         ..MapOptions::default()
//!     }));
//!
//! let output = generate(&mut root, &ctx).unwrap();
//! assert_eq!(output.css, "a{color:red}\n/*# sourceMappingURL=a.css.map */");
//! assert!(output.map.is_some());
//! ```

pub mod accumulator;
pub mod annotation;
pub mod context;
pub mod error;
pub mod generator;
pub mod merge;
pub mod paths;
pub mod policy;
pub mod previous;

pub use context::{Annotation, GenerationContext, MapOptions, MapSetting};
pub use error::GenerateError;
pub use generator::{MapGenerator, OutputArtifact, generate};
pub use paths::PathResolver;
