//! Command implementations for the doclet CLI.
//!
//! - [`comment`] - Parse one comment
//! - [`source`] - Parse every comment in source files
//! - [`type_expr`] - Parse a type expression
//! - [`tokenize`] - Show tokenizer output
//!
//! Each command writes its JSON result to the given writer; `execute`
//! wrappers write to stdout.

pub mod comment;
pub mod source;
pub mod tokenize;
pub mod type_expr;
pub(crate) mod utils;

pub use comment::execute as comment_execute;
pub use source::execute as source_execute;
pub use tokenize::execute as tokenize_execute;
pub use type_expr::execute as type_execute;
