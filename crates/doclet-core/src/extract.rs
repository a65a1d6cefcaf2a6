//! Locating documentation comments inside JavaScript / TypeScript sources.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::Comment;
use oxc_parser::Parser;
use oxc_span::SourceType;
use tracing::debug;

use crate::error::{DocError, Result};

/// A block comment as it appears in the source, delimiters included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComment {
    pub text: String,
    /// One-based line of the opening `/*`.
    pub start_line: usize,
    /// One-based line of the closing `*/`.
    pub end_line: usize,
}

/// Yields the raw comments of a source file.
pub trait CommentExtractor: Send + Sync {
    /// Return `/** */` comments, or every `/* */` comment when
    /// `allow_single_star` is set, in source order.
    fn extract(&self, source: &str, allow_single_star: bool) -> Result<Vec<RawComment>>;
}

/// [`CommentExtractor`] backed by the OXC parser.
#[derive(Debug, Clone, Copy)]
pub struct OxcCommentExtractor {
    source_type: SourceType,
}

impl Default for OxcCommentExtractor {
    fn default() -> Self {
        Self {
            source_type: SourceType::mjs(),
        }
    }
}

impl OxcCommentExtractor {
    pub fn new(source_type: SourceType) -> Self {
        Self { source_type }
    }

    /// Pick the source type from the file extension, defaulting to an ES module.
    pub fn for_path(path: impl AsRef<Path>) -> Self {
        let source_type = SourceType::from_path(path.as_ref()).unwrap_or(SourceType::mjs());
        Self { source_type }
    }
}

impl CommentExtractor for OxcCommentExtractor {
    fn extract(&self, source: &str, allow_single_star: bool) -> Result<Vec<RawComment>> {
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, source, self.source_type).parse();

        if parsed.panicked {
            let diagnostics: Vec<String> =
                parsed.errors.iter().map(|error| error.to_string()).collect();
            return Err(DocError::extract_error(&diagnostics));
        }
        if !parsed.errors.is_empty() {
            debug!(
                errors = parsed.errors.len(),
                "source has syntax errors; extracting comments anyway"
            );
        }

        let line_index = LineIndex::new(source);
        let comments: Vec<RawComment> = parsed
            .program
            .comments
            .iter()
            .filter(|comment| is_doc_comment(comment, source, allow_single_star))
            .map(|comment| {
                let start = comment.span.start as usize;
                let end = comment.span.end as usize;
                RawComment {
                    text: source[start..end].to_string(),
                    start_line: line_index.line(start),
                    end_line: line_index.line(end.saturating_sub(1)),
                }
            })
            .collect();

        debug!(
            total = parsed.program.comments.len(),
            kept = comments.len(),
            "extracted block comments"
        );
        Ok(comments)
    }
}

fn is_doc_comment(comment: &Comment, source: &str, allow_single_star: bool) -> bool {
    if !comment.is_block() {
        return false;
    }
    let text = &source[comment.span.start as usize..comment.span.end as usize];
    allow_single_star || (text.starts_with("/**") && text != "/**/")
}

/// Byte offset → one-based line lookup.
struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = Vec::with_capacity(128);
        line_starts.push(0);
        for (idx, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(idx + 1);
            }
        }
        Self { line_starts }
    }

    fn line(&self, offset: usize) -> usize {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        };
        idx + 1
    }
}
