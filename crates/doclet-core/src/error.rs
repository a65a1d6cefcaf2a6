use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for comment and type parsing.
pub type Result<T> = std::result::Result<T, DocError>;

/// Structural failures raised while parsing comments, tags and type expressions.
///
/// Advisory problems (an unknown `@access` level, a description on a marker
/// tag in strict mode, ...) are never represented here; they are collected
/// into [`crate::Tag::errors`] instead.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum DocError {
    /// The input is not something the requested entry point can work on.
    #[error("invalid input: {message}")]
    #[diagnostic(code(doclet::invalid_input))]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// An opening `{`, `[`, `(`, `<` or quote was never closed, or a closer
    /// appeared without its opener.
    #[error("unbalanced delimiter `{delimiter}` at offset {offset}")]
    #[diagnostic(
        code(doclet::unbalanced_delimiter),
        help("check that every opening bracket or quote has a matching close")
    )]
    UnbalancedDelimiter {
        /// The delimiter that could not be matched.
        delimiter: char,
        /// Byte offset of the offending delimiter in the scanned text.
        offset: usize,
    },

    /// Malformed type expression.
    #[error("type syntax error: {reason} (at offset {offset})")]
    #[diagnostic(code(doclet::type_syntax))]
    TypeSyntax {
        /// Human-readable reason.
        reason: String,
        /// Byte offset in the type expression where parsing stopped.
        offset: usize,
    },

    /// Delimiter nesting exceeded the parser limit.
    #[error("type expression nests deeper than {limit} levels")]
    #[diagnostic(code(doclet::too_deeply_nested))]
    TooDeeplyNested {
        /// The nesting limit that was hit.
        limit: usize,
    },

    /// A tag carried a type or name it is not permitted to carry.
    #[error("@{tag} {reason}")]
    #[diagnostic(code(doclet::capability_violation))]
    CapabilityViolation {
        /// Canonical tag title.
        tag: String,
        /// What the tag is not allowed to carry.
        reason: String,
    },

    /// The comment extractor could not read the source text.
    #[error("failed to extract comments: {message}")]
    #[diagnostic(code(doclet::extract))]
    Extract {
        /// Aggregated extractor diagnostics.
        message: String,
    },
}

impl DocError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn unbalanced(delimiter: char, offset: usize) -> Self {
        Self::UnbalancedDelimiter { delimiter, offset }
    }

    pub fn syntax(reason: impl Into<String>, offset: usize) -> Self {
        Self::TypeSyntax {
            reason: reason.into(),
            offset,
        }
    }

    /// Helper to create an extraction error from multiple diagnostic strings.
    pub fn extract_error(diagnostics: &[String]) -> Self {
        Self::Extract {
            message: diagnostics.join("; "),
        }
    }

    /// Whether this error describes a structural problem in the parsed text
    /// (as opposed to a problem with how the parser was driven).
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedDelimiter { .. }
                | Self::TypeSyntax { .. }
                | Self::TooDeeplyNested { .. }
        )
    }
}
