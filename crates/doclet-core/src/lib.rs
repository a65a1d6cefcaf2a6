#![deny(clippy::all)]

//! JSDoc comment parsing.
//!
//! This crate provides:
//! - A tokenizer that splits a `/** ... */` comment into description, tags
//!   and code examples.
//! - A tag normalizer driven by a static table of tag synonyms and
//!   capabilities.
//! - A parser for Closure-Compiler style type expressions
//!   (`Array.<string>`, `function(this:T, ...number): ?Object`, ...), with a
//!   canonical serializer via [`Type`]'s `Display`.
//! - An OXC-backed extractor that finds documentation comments in
//!   JavaScript and TypeScript sources.
//!
//! ```
//! use doclet_core::{parse_comment, ParseOptions, Type};
//!
//! let comment = parse_comment("/** @param {string} name - description */", &ParseOptions::default())?;
//! let tag = &comment.tags[0];
//! assert_eq!(tag.title, "param");
//! assert_eq!(tag.description.as_deref(), Some("description"));
//! assert_eq!(tag.single_type(), Some(&Type::name("string")));
//! # Ok::<(), doclet_core::DocError>(())
//! ```

pub mod error;
pub mod extract;
pub mod flags;
pub mod model;
pub mod normalize;
pub mod options;
pub mod parser;
pub mod pluralize;
pub mod split;
pub mod tags;
pub mod tokenizer;
pub mod type_parser;
pub mod types;

pub use error::{DocError, Result};
pub use extract::{CommentExtractor, OxcCommentExtractor, RawComment};
pub use model::{Comment, CommentToken, ExampleBlock, ExampleKind, RawTagLine, Tag, TagType};
pub use options::{CommentParserHook, ParseOptions, Parsers, TagParserHook, TypeParserHook};
pub use parser::{DocParser, parse_comment};
pub use pluralize::{Pluralizer, pluralize};
pub use tokenizer::strip_stars;
pub use type_parser::{MAX_DEPTH, parse_param_type, parse_type};
pub use types::{FieldType, Type};

/// Tokenize an unwrapped comment body with the built-in tokenizer.
pub fn tokenize(body: &str) -> CommentToken {
    tokenizer::tokenize(body)
}
