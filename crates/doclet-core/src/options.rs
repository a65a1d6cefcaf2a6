//! Parse options and pluggable stage hooks.

use std::sync::Arc;

use bon::Builder;

use crate::error::{DocError, Result};
use crate::model::{CommentToken, RawTagLine, Tag};
use crate::tags;
use crate::types::Type;

/// Replaces the built-in type expression parser.
///
/// Hooks must be `Send + Sync` because one [`ParseOptions`] value may be
/// shared by parsers running on several threads.
pub trait TypeParserHook: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Parse the text between a tag's braces. `param` is set for tags whose
    /// types sit in parameter position.
    fn parse_type(&self, text: &str, param: bool) -> Result<Type>;
}

/// Replaces the built-in tag splitter and normalizer.
pub trait TagParserHook: Send + Sync {
    fn name(&self) -> &'static str;

    /// Build a tag from a raw tag line. `Ok(None)` drops the tag.
    fn parse_tag(&self, raw: &RawTagLine, options: &ParseOptions) -> Result<Option<Tag>>;
}

/// Replaces the built-in comment tokenizer.
pub trait CommentParserHook: Send + Sync {
    fn name(&self) -> &'static str;

    /// Split an unwrapped comment body into description, examples and tags.
    fn tokenize(&self, body: &str) -> Result<CommentToken>;
}

/// Optional replacements for the individual parsing stages.
#[derive(Clone, Default)]
pub struct Parsers {
    pub tag: Option<Arc<dyn TagParserHook>>,
    pub type_: Option<Arc<dyn TypeParserHook>>,
    pub comment: Option<Arc<dyn CommentParserHook>>,
}

impl std::fmt::Debug for Parsers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parsers")
            .field("tag", &self.tag.as_ref().map(|hook| hook.name()))
            .field("type", &self.type_.as_ref().map(|hook| hook.name()))
            .field("comment", &self.comment.as_ref().map(|hook| hook.name()))
            .finish()
    }
}

/// Options for comment parsing.
#[derive(Debug, Clone, Builder)]
pub struct ParseOptions {
    /// Strip `/**`, `*/` and leading `*` before tokenizing.
    #[builder(default = true)]
    pub unwrap: bool,

    /// Accept `/* ... */` comments as well as `/** ... */`.
    #[builder(default)]
    pub allow_single_star: bool,

    /// Accept `[name]` optional syntax without complaint in strict mode.
    #[builder(default)]
    pub sloppy: bool,

    /// Enable marker-tag and name-character validation and reject tags
    /// missing a required name.
    #[builder(default)]
    pub strict: bool,

    /// Record structural errors on the offending tag instead of failing.
    #[builder(default)]
    pub recoverable: bool,

    /// Attach one-based source line numbers to tags.
    #[builder(default)]
    pub line_numbers: bool,

    /// Keep only tags whose canonical title is listed.
    #[builder(into)]
    pub tags: Option<Vec<String>>,

    #[builder(default)]
    pub parsers: Parsers,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject allow-list entries that can never name a tag.
    pub fn validate(&self) -> Result<()> {
        for entry in self.tags.iter().flatten() {
            if entry.is_empty() || entry.starts_with('@') || entry.contains(char::is_whitespace) {
                return Err(DocError::invalid_input(format!(
                    "invalid tag filter entry `{entry}`"
                )));
            }
        }
        Ok(())
    }

    /// Whether a tag with canonical `title` survives the allow-list.
    pub fn allows_tag(&self, title: &str) -> bool {
        match &self.tags {
            None => true,
            Some(allowed) => allowed
                .iter()
                .any(|entry| tags::canonicalize(entry) == title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl TypeParserHook for Upper {
        fn name(&self) -> &'static str {
            "upper"
        }

        fn parse_type(&self, text: &str, _param: bool) -> Result<Type> {
            Ok(Type::name(text.to_uppercase()))
        }
    }

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert!(options.unwrap);
        assert!(!options.strict);
        assert!(!options.recoverable);
        assert!(options.tags.is_none());
        assert!(options.allows_tag("anything"));
    }

    #[test]
    fn test_allow_list_uses_canonical_titles() {
        let options = ParseOptions::builder()
            .tags(vec!["return".to_string(), "param".to_string()])
            .build();
        assert!(options.allows_tag("returns"));
        assert!(options.allows_tag("param"));
        assert!(!options.allows_tag("see"));
    }

    #[test]
    fn test_validate_rejects_bad_entries() {
        for bad in ["", "@param", "two words"] {
            let options = ParseOptions::builder().tags(vec![bad.to_string()]).build();
            assert!(options.validate().is_err(), "{bad:?} should be rejected");
        }
        assert!(ParseOptions::default().validate().is_ok());
    }

    #[test]
    fn test_debug_lists_hook_names() {
        let options = ParseOptions::builder()
            .parsers(Parsers {
                type_: Some(Arc::new(Upper)),
                ..Parsers::default()
            })
            .build();
        let debug = format!("{options:?}");
        assert!(debug.contains("upper"));
    }
}
