//! Configuration for the doclet CLI with multi-source loading.
//!
//! Merges settings from CLI flags, environment variables and config files.
//! Priority: CLI > Environment (`DOCLET_*`) > File > Defaults

mod conversions;
mod loading;
mod validation;

use serde::{Deserialize, Serialize};

pub use loading::{CONFIG_FILE_NAMES, ConfigOverrides};
pub use validation::validate_tag_filter;

/// doclet configuration - loaded from doclet.config.json / doclet.config.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocletConfig {
    /// Strip `/**`, `*/` and leading `*` before tokenizing
    #[serde(default = "default_unwrap")]
    pub unwrap: bool,

    /// Accept `/* ... */` comments
    #[serde(default)]
    pub allow_single_star: bool,

    /// Accept `[name]` optional syntax in strict mode
    #[serde(default)]
    pub sloppy: bool,

    /// Strict name and marker-tag validation
    #[serde(default)]
    pub strict: bool,

    /// Record structural errors on tags instead of failing
    #[serde(default)]
    pub recoverable: bool,

    /// Attach source line numbers to tags
    #[serde(default)]
    pub line_numbers: bool,

    /// Allow-list of canonical tag titles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Group tags by pluralized title in the output
    #[serde(default)]
    pub grouped: bool,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

fn default_unwrap() -> bool {
    true
}

impl Default for DocletConfig {
    fn default() -> Self {
        Self {
            unwrap: default_unwrap(),
            allow_single_star: false,
            sloppy: false,
            strict: false,
            recoverable: false,
            line_numbers: false,
            tags: None,
            grouped: false,
            pretty: false,
        }
    }
}

impl DocletConfig {
    /// Example doclet.config.json content.
    pub fn example_config() -> String {
        let example = Self {
            strict: true,
            recoverable: true,
            line_numbers: true,
            tags: Some(vec!["param".to_string(), "returns".to_string()]),
            pretty: true,
            ..Self::default()
        };
        serde_json::to_string_pretty(&example).unwrap_or_default()
    }
}
