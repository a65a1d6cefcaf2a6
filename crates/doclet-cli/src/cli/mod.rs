//! Command-line interface definition for doclet.
//!
//! # Command Structure
//!
//! - `doclet comment` - Parse one `/** ... */` comment
//! - `doclet source` - Parse every doc comment in JavaScript / TypeScript files
//! - `doclet type` - Parse a type expression
//! - `doclet tokenize` - Show the raw tokenizer output for a comment

mod commands;
mod validation;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{Command, CommentArgs, ParseFlags, SourceArgs, TokenizeArgs, TypeArgs};
pub use validation::parse_tag_filter;

/// doclet - JSDoc comment and type expression parser
#[derive(Parser, Debug)]
#[command(
    name = "doclet",
    version,
    about = "Parse JSDoc comments and Closure-style type expressions into JSON",
    long_about = "doclet parses JSDoc comments into a structured description, tags and\n\
                  examples, and Closure Compiler type expressions into a typed AST.\n\
                  Results are written to stdout as JSON."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Reports dropped tags, recovered errors and extractor statistics.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a doclet.config.json or doclet.config.toml file
    ///
    /// Without this flag, doclet.config.json and then doclet.config.toml are
    /// looked up in the current directory.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
