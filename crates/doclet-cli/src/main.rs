//! doclet CLI entry point: argument parsing, logging setup and command
//! dispatch.

use clap::Parser;
use doclet_cli::{cli, commands, error, logger};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let config_path = args.config.as_deref();
    let result = match args.command {
        cli::Command::Comment(comment_args) => commands::comment_execute(comment_args, config_path),
        cli::Command::Source(source_args) => commands::source_execute(source_args, config_path),
        cli::Command::Type(type_args) => commands::type_execute(type_args, config_path),
        cli::Command::Tokenize(tokenize_args) => {
            commands::tokenize_execute(tokenize_args, config_path)
        }
    };

    result.map_err(error::cli_error_to_miette)
}
