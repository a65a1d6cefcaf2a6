//! Type command implementation.

use std::io::Write;
use std::path::Path;

use doclet_core::DocParser;

use crate::cli::TypeArgs;
use crate::commands::utils::write_json;
use crate::config::{ConfigOverrides, DocletConfig};
use crate::error::Result;

/// Execute the type command, writing to stdout.
pub fn execute(args: TypeArgs, config_path: Option<&Path>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, config_path, &mut out)
}

/// Parse `args.expression` and write its AST (or canonical form) to `out`.
pub fn run(args: &TypeArgs, config_path: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let overrides = ConfigOverrides {
        pretty: args.pretty.then_some(true),
        ..ConfigOverrides::default()
    };
    let config = DocletConfig::load(&overrides, config_path)?;
    let parser = DocParser::new(config.to_parse_options());

    let ty = if args.param {
        parser.parse_param_type(&args.expression)?
    } else {
        parser.parse_type(&args.expression)?
    };

    if args.canonical {
        writeln!(out, "{ty}")?;
        Ok(())
    } else {
        write_json(out, &ty, config.pretty)
    }
}
