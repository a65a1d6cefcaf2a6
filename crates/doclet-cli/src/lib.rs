//! doclet CLI - JSDoc comment and type expression parser.
//!
//! - [`cli`] - Argument definitions (clap)
//! - [`commands`] - Command implementations
//! - [`config`] - Layered configuration (figment)
//! - [`error`] - Error types and miette conversion
//! - [`logger`] - Structured logging with tracing

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;

pub use error::{CliError, ConfigError, Result, ResultExt};
