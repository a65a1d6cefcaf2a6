use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::validation::parse_tag_filter;

/// Available doclet subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a single documentation comment
    ///
    /// Reads a `/** ... */` comment from a file (or `-` for stdin) and prints
    /// its description, tags and examples as JSON.
    Comment(CommentArgs),

    /// Parse every documentation comment in source files
    ///
    /// Comments are located with a JavaScript / TypeScript parser; the
    /// dialect is picked from each file's extension.
    Source(SourceArgs),

    /// Parse a type expression
    ///
    /// Examples:
    ///   doclet type 'Array.<string>|null'
    ///   doclet type --param '?='
    Type(TypeArgs),

    /// Show the tokenizer output for a comment
    ///
    /// Prints the description, raw tag lines and examples before any tag is
    /// normalized. Useful when a tag is not parsed the way you expect.
    Tokenize(TokenizeArgs),
}

/// Parsing switches shared by the comment and source commands.
///
/// Every switch only turns an option on; settings from the config file or
/// the environment apply otherwise.
#[derive(Args, Debug, Default, Clone)]
pub struct ParseFlags {
    /// Enable strict validation of names and marker tags
    #[arg(long)]
    pub strict: bool,

    /// Accept `[name]` optional parameters without complaint in strict mode
    #[arg(long)]
    pub sloppy: bool,

    /// Record malformed tags as errors on the tag instead of failing
    #[arg(long)]
    pub recoverable: bool,

    /// Attach one-based source line numbers to tags
    #[arg(long)]
    pub line_numbers: bool,

    /// Accept `/* ... */` comments as well as `/** ... */`
    #[arg(long)]
    pub allow_single_star: bool,

    /// Treat the input as an already unwrapped comment body
    #[arg(long)]
    pub no_unwrap: bool,

    /// Keep only these tags (comma-separated canonical titles)
    ///
    /// Example: --tags param,returns
    #[arg(long, value_delimiter = ',', value_parser = parse_tag_filter, value_name = "TAGS")]
    pub tags: Option<Vec<String>>,

    /// Group tags by pluralized title (`params`, `returns`, ...)
    #[arg(long)]
    pub grouped: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the comment command
#[derive(Args, Debug)]
pub struct CommentArgs {
    /// File holding the comment, or `-` to read stdin
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub flags: ParseFlags,
}

/// Arguments for the source command
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// JavaScript or TypeScript files to scan
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub flags: ParseFlags,
}

/// Arguments for the type command
#[derive(Args, Debug)]
pub struct TypeArgs {
    /// The type expression, without surrounding braces
    #[arg(value_name = "EXPR", allow_hyphen_values = true)]
    pub expression: String,

    /// Parse in parameter position, where a bare `?=` is allowed
    #[arg(long)]
    pub param: bool,

    /// Print the canonical type string instead of the JSON AST
    #[arg(long)]
    pub canonical: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the tokenize command
#[derive(Args, Debug)]
pub struct TokenizeArgs {
    /// File holding the comment, or `-` to read stdin
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Accept `/* ... */` comments as well as `/** ... */`
    #[arg(long)]
    pub allow_single_star: bool,

    /// Treat the input as an already unwrapped comment body
    #[arg(long)]
    pub no_unwrap: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}
