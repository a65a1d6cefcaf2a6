//! Comment command implementation.

use std::io::Write;
use std::path::Path;

use doclet_core::{Comment, DocParser, ExampleBlock, Tag};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cli::CommentArgs;
use crate::commands::utils::{read_input, write_json};
use crate::config::{ConfigOverrides, DocletConfig};
use crate::error::Result;

/// Execute the comment command, writing to stdout.
pub fn execute(args: CommentArgs, config_path: Option<&Path>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, config_path, &mut out)
}

/// Parse the comment named by `args` and write it as JSON to `out`.
pub fn run(args: &CommentArgs, config_path: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let config = DocletConfig::load(&ConfigOverrides::from(&args.flags), config_path)?;
    let text = read_input(&args.input)?;

    let parser = DocParser::new(config.to_parse_options());
    let comment = parser.parse_comment(&text)?;
    debug!(tags = comment.tags.len(), "parsed comment");
    report_tag_errors(&comment);

    if config.grouped {
        write_json(out, &GroupedComment::new(&parser, &comment), config.pretty)
    } else {
        write_json(out, &comment, config.pretty)
    }
}

/// Log every error recorded on a tag in recoverable mode.
pub(crate) fn report_tag_errors(comment: &Comment) {
    for tag in &comment.tags {
        for error in &tag.errors {
            warn!(tag = %tag.title, "{error}");
        }
    }
}

/// A comment whose tags are keyed by pluralized title.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupedComment {
    description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    footer: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    examples: Vec<ExampleBlock>,
    tags: IndexMap<String, Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_line: Option<usize>,
}

impl GroupedComment {
    pub(crate) fn new(parser: &DocParser, comment: &Comment) -> Self {
        Self {
            description: comment.description.clone(),
            footer: comment.footer.clone(),
            examples: comment.examples.clone(),
            tags: parser.group_tags(comment),
            start_line: comment.start_line,
            end_line: comment.end_line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grouped_comment_serializes_groups_in_order() {
        let parser = DocParser::default();
        let comment = parser
            .parse_comment("/**\n * @returns {x}\n * @param a\n * @param b\n */")
            .unwrap();
        let json = serde_json::to_string(&GroupedComment::new(&parser, &comment)).unwrap();
        let returns = json.find("\"returns\"").unwrap();
        let params = json.find("\"params\"").unwrap();
        assert!(returns < params, "{json}");
        assert!(!json.contains("footer"));
    }
}
