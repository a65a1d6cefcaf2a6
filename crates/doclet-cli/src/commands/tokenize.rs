//! Tokenize command implementation.

use std::io::Write;
use std::path::Path;

use doclet_core::{DocParser, strip_stars};

use crate::cli::{ParseFlags, TokenizeArgs};
use crate::commands::utils::{read_input, write_json};
use crate::config::{ConfigOverrides, DocletConfig};
use crate::error::Result;

/// Execute the tokenize command, writing to stdout.
pub fn execute(args: TokenizeArgs, config_path: Option<&Path>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, config_path, &mut out)
}

/// Unwrap and tokenize a comment without normalizing its tags.
pub fn run(args: &TokenizeArgs, config_path: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let flags = ParseFlags {
        allow_single_star: args.allow_single_star,
        no_unwrap: args.no_unwrap,
        pretty: args.pretty,
        ..ParseFlags::default()
    };
    let config = DocletConfig::load(&ConfigOverrides::from(&flags), config_path)?;
    let text = read_input(&args.input)?;

    let body = if config.unwrap {
        strip_stars(&text, config.allow_single_star)?
    } else {
        text
    };
    let token = DocParser::new(config.to_parse_options()).tokenize(&body)?;
    write_json(out, &token, config.pretty)
}
