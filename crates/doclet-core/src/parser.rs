//! The [`DocParser`] facade tying the pipeline stages together.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::Result;
use crate::extract::{CommentExtractor, OxcCommentExtractor};
use crate::model::{Comment, CommentToken, Tag};
use crate::normalize::normalize;
use crate::options::ParseOptions;
use crate::pluralize::Pluralizer;
use crate::tokenizer;
use crate::type_parser;
use crate::types::Type;

/// Parses documentation comments with one set of [`ParseOptions`].
///
/// A `DocParser` holds no per-call state and can be shared between threads.
///
/// ```
/// use doclet_core::{DocParser, ParseOptions};
///
/// let parser = DocParser::new(ParseOptions::default());
/// let comment = parser.parse_comment("/** @param {string} name - who */").unwrap();
/// assert_eq!(comment.tags[0].name.as_deref(), Some("name"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocParser {
    options: ParseOptions,
    pluralizer: Pluralizer,
}

impl DocParser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            pluralizer: Pluralizer::global().clone(),
        }
    }

    /// Use a dedicated pluralization cache instead of the process-wide one.
    pub fn with_pluralizer(mut self, pluralizer: Pluralizer) -> Self {
        self.pluralizer = pluralizer;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse one comment, delimiters included unless `unwrap` is off.
    pub fn parse_comment(&self, text: &str) -> Result<Comment> {
        self.parse_comment_at(text, 1)
    }

    /// Parse every documentation comment in a JavaScript module.
    pub fn parse_many_comments(&self, source: &str) -> Result<Vec<Comment>> {
        self.parse_many_comments_with(source, &OxcCommentExtractor::default())
    }

    /// Parse every comment the given extractor finds in `source`.
    pub fn parse_many_comments_with(
        &self,
        source: &str,
        extractor: &dyn CommentExtractor,
    ) -> Result<Vec<Comment>> {
        self.options.validate()?;
        let raw_comments = extractor.extract(source, self.options.allow_single_star)?;
        debug!(count = raw_comments.len(), "parsing extracted comments");

        raw_comments
            .into_iter()
            .map(|raw| {
                let mut comment = self.parse_comment_at(&raw.text, raw.start_line)?;
                comment.start_line = Some(raw.start_line);
                comment.end_line = Some(raw.end_line);
                Ok(comment)
            })
            .collect()
    }

    pub fn parse_type(&self, text: &str) -> Result<Type> {
        match &self.options.parsers.type_ {
            Some(hook) => hook.parse_type(text, false),
            None => type_parser::parse_type(text),
        }
    }

    /// Parse a type in parameter position, where `?=` is allowed.
    pub fn parse_param_type(&self, text: &str) -> Result<Type> {
        match &self.options.parsers.type_ {
            Some(hook) => hook.parse_type(text, true),
            None => type_parser::parse_param_type(text),
        }
    }

    /// Tokenize an already unwrapped comment body.
    pub fn tokenize(&self, body: &str) -> Result<CommentToken> {
        match &self.options.parsers.comment {
            Some(hook) => {
                trace!(hook = hook.name(), "tokenizing with comment hook");
                hook.tokenize(body)
            }
            None => Ok(tokenizer::tokenize(body)),
        }
    }

    /// Group a comment's tags under their pluralized titles, in first-seen order.
    pub fn group_tags(&self, comment: &Comment) -> IndexMap<String, Vec<Tag>> {
        let mut groups: IndexMap<String, Vec<Tag>> = IndexMap::new();
        for tag in &comment.tags {
            groups
                .entry(self.pluralizer.pluralize(&tag.title))
                .or_default()
                .push(tag.clone());
        }
        groups
    }

    fn parse_comment_at(&self, text: &str, first_line: usize) -> Result<Comment> {
        self.options.validate()?;

        let body = if self.options.unwrap {
            tokenizer::strip_stars(text, self.options.allow_single_star)?
        } else {
            text.to_string()
        };
        let token = self.tokenize(&body)?;

        let mut tags = Vec::with_capacity(token.tags.len());
        for raw in &token.tags {
            let tag = match &self.options.parsers.tag {
                Some(hook) => hook.parse_tag(raw, &self.options)?,
                None => normalize(raw, &self.options)?,
            };
            let Some(mut tag) = tag else {
                trace!(key = %raw.key, "tag dropped");
                continue;
            };
            if self.options.line_numbers {
                tag.line = Some(first_line + raw.line);
            }
            tags.push(tag);
        }

        Ok(Comment {
            description: token.description,
            footer: token.footer,
            examples: token.examples,
            tags,
            start_line: None,
            end_line: None,
        })
    }
}

/// Parse one comment with the given options.
pub fn parse_comment(text: &str, options: &ParseOptions) -> Result<Comment> {
    DocParser::new(options.clone()).parse_comment(text)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::RawTagLine;
    use crate::options::{CommentParserHook, Parsers, TagParserHook, TypeParserHook};

    struct Shout;

    impl TypeParserHook for Shout {
        fn name(&self) -> &'static str {
            "shout"
        }

        fn parse_type(&self, text: &str, _param: bool) -> Result<Type> {
            Ok(Type::name(text.to_uppercase()))
        }
    }

    struct TitleOnly;

    impl TagParserHook for TitleOnly {
        fn name(&self) -> &'static str {
            "title-only"
        }

        fn parse_tag(&self, raw: &RawTagLine, _options: &ParseOptions) -> Result<Option<Tag>> {
            Ok(Some(Tag::new(format!("x-{}", raw.key))))
        }
    }

    struct OneTag;

    impl CommentParserHook for OneTag {
        fn name(&self) -> &'static str {
            "one-tag"
        }

        fn tokenize(&self, _body: &str) -> Result<CommentToken> {
            Ok(CommentToken {
                description: "fixed".to_string(),
                tags: vec![RawTagLine {
                    raw: "@since 1.0".to_string(),
                    key: "since".to_string(),
                    value: "1.0".to_string(),
                    line: 0,
                }],
                ..CommentToken::default()
            })
        }
    }

    #[test]
    fn test_parse_comment_basic() {
        let parser = DocParser::default();
        let comment = parser
            .parse_comment("/**\n * Adds two numbers.\n * @param {number} a\n * @returns {number} sum\n */")
            .unwrap();
        assert_eq!(comment.description, "Adds two numbers.");
        assert_eq!(comment.tags.len(), 2);
        assert_eq!(comment.tags[1].title, "returns");
        assert_eq!(comment.tags[1].description.as_deref(), Some("sum"));
    }

    #[test]
    fn test_line_numbers() {
        let options = ParseOptions::builder().line_numbers(true).build();
        let comment = DocParser::new(options)
            .parse_comment("/**\n * Text.\n * @param a\n *\n * @since 2\n */")
            .unwrap();
        let lines: Vec<_> = comment.tags.iter().map(|tag| tag.line).collect();
        assert_eq!(lines, vec![Some(3), Some(5)]);
    }

    #[test]
    fn test_without_unwrap() {
        let options = ParseOptions::builder().unwrap(false).build();
        let comment = DocParser::new(options)
            .parse_comment("Plain body.\n@param {string} s")
            .unwrap();
        assert_eq!(comment.description, "Plain body.");
        assert_eq!(comment.tags[0].name.as_deref(), Some("s"));
    }

    #[test]
    fn test_missing_delimiters_is_invalid_input() {
        let err = DocParser::default().parse_comment("@param x").unwrap_err();
        assert!(matches!(err, crate::DocError::InvalidInput { .. }));
    }

    #[test]
    fn test_invalid_allow_list_fails_before_parsing() {
        let options = ParseOptions::builder().tags(vec!["@param".to_string()]).build();
        assert!(DocParser::new(options).parse_comment("/** x */").is_err());
    }

    #[test]
    fn test_type_hook_replaces_type_parser() {
        let options = ParseOptions::builder()
            .parsers(Parsers {
                type_: Some(Arc::new(Shout)),
                ..Parsers::default()
            })
            .build();
        let parser = DocParser::new(options);
        assert_eq!(parser.parse_type("abc").unwrap(), Type::name("ABC"));
        let comment = parser.parse_comment("/** @returns {abc} */").unwrap();
        assert_eq!(comment.tags[0].single_type(), Some(&Type::name("ABC")));
    }

    #[test]
    fn test_tag_and_comment_hooks() {
        let options = ParseOptions::builder()
            .parsers(Parsers {
                tag: Some(Arc::new(TitleOnly)),
                ..Parsers::default()
            })
            .build();
        let comment = DocParser::new(options)
            .parse_comment("/** @param {string} a */")
            .unwrap();
        assert_eq!(comment.tags[0].title, "x-param");

        let options = ParseOptions::builder()
            .parsers(Parsers {
                comment: Some(Arc::new(OneTag)),
                ..Parsers::default()
            })
            .build();
        let comment = DocParser::new(options).parse_comment("/** ignored */").unwrap();
        assert_eq!(comment.description, "fixed");
        assert_eq!(comment.tags[0].title, "since");
        assert_eq!(comment.tags[0].description.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_group_tags() {
        let parser = DocParser::default().with_pluralizer(Pluralizer::new());
        let comment = parser
            .parse_comment("/**\n * @param a\n * @returns {x}\n * @param b\n */")
            .unwrap();
        let groups = parser.group_tags(&comment);
        let keys: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["params", "returns"]);
        assert_eq!(groups["params"].len(), 2);
    }

    #[test]
    fn test_parse_many_comments() {
        let source = "/** First. */\nconst a = 1;\n\n/**\n * Second.\n * @type {number}\n */\nlet b = 2;\n";
        let options = ParseOptions::builder().line_numbers(true).build();
        let comments = DocParser::new(options).parse_many_comments(source).unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].description, "First.");
        assert_eq!(comments[0].start_line, Some(1));
        assert_eq!(comments[1].start_line, Some(4));
        assert_eq!(comments[1].end_line, Some(7));
        assert_eq!(comments[1].tags[0].line, Some(6));
    }
}
