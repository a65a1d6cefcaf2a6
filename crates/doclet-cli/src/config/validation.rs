use crate::config::DocletConfig;
use crate::error::{ConfigError, Result};

/// Validate one allow-list entry: a non-empty tag title without `@` or
/// whitespace.
pub fn validate_tag_filter(entry: &str) -> Result<()> {
    let hint = if entry.is_empty() {
        "Tag titles cannot be empty"
    } else if entry.starts_with('@') {
        "Write tag titles without the leading '@'"
    } else if entry.contains(char::is_whitespace) {
        "Tag titles cannot contain whitespace"
    } else {
        return Ok(());
    };

    Err(ConfigError::InvalidValue {
        field: "tags".to_string(),
        value: format!("{entry:?}"),
        hint: hint.to_string(),
    }
    .into())
}

impl DocletConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        for entry in self.tags.iter().flatten() {
            validate_tag_filter(entry)?;
        }

        if self.sloppy && !self.strict {
            tracing::debug!("`sloppy` has no effect without `strict`");
        }

        Ok(())
    }
}
