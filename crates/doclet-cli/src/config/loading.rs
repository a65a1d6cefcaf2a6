use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
    value::Uncased,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::ParseFlags;
use crate::config::DocletConfig;
use crate::error::{ConfigError, Result};

/// Config files looked up in the working directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["doclet.config.json", "doclet.config.toml"];

/// Values set on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unwrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_single_star: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sloppy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recoverable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_numbers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grouped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

impl From<&ParseFlags> for ConfigOverrides {
    fn from(flags: &ParseFlags) -> Self {
        Self {
            unwrap: flags.no_unwrap.then_some(false),
            allow_single_star: flags.allow_single_star.then_some(true),
            sloppy: flags.sloppy.then_some(true),
            strict: flags.strict.then_some(true),
            recoverable: flags.recoverable.then_some(true),
            line_numbers: flags.line_numbers.then_some(true),
            tags: flags.tags.clone(),
            grouped: flags.grouped.then_some(true),
            pretty: flags.pretty.then_some(true),
        }
    }
}

impl DocletConfig {
    /// Load configuration from all sources, looking for config files in the
    /// current directory.
    pub fn load(overrides: &ConfigOverrides, config_path: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(&cwd, overrides, config_path)
    }

    /// Load configuration, looking for config files in `base_dir`.
    /// Priority: CLI overrides > environment > config file > defaults
    pub fn load_from(
        base_dir: &Path,
        overrides: &ConfigOverrides,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = Self::config_file(base_dir, config_path)? {
            debug!(path = %path.display(), "loading config file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("json") => figment.merge(Json::file(&path)),
                Some("toml") => figment.merge(Toml::file(&path)),
                _ => return Err(ConfigError::UnsupportedFormat(path).into()),
            };
        }

        // DOCLET_LINE_NUMBERS=true -> lineNumbers
        figment = figment.merge(Env::prefixed("DOCLET_").lowercase(false).map(env_key));

        figment = figment.merge(Serialized::defaults(overrides));

        let config: Self = figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "configuration".to_string(),
            value: e.to_string(),
            hint: "Check doclet.config.json syntax and field types; `tags` must be a list of strings"
                .to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn config_file(base_dir: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            };
            if !path.is_file() {
                return Err(ConfigError::NotFound(path).into());
            }
            return Ok(Some(path));
        }

        Ok(CONFIG_FILE_NAMES
            .iter()
            .map(|name| base_dir.join(name))
            .find(|path| path.is_file()))
    }
}

/// Map an environment key (prefix already stripped) to its camelCase field.
fn env_key(key: &figment::value::UncasedStr) -> Uncased<'_> {
    let mut field = String::with_capacity(key.as_str().len());
    let mut upper = false;
    for c in key.as_str().chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            field.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            field.push(c.to_ascii_lowercase());
        }
    }
    Uncased::from_owned(field)
}
