//! Source command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use doclet_core::{Comment, DocParser, OxcCommentExtractor};
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::SourceArgs;
use crate::commands::comment::{GroupedComment, report_tag_errors};
use crate::commands::utils::{read_input, write_json};
use crate::config::{ConfigOverrides, DocletConfig};
use crate::error::Result;

/// Comments found in one file.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum FileComments {
    Plain {
        file: PathBuf,
        comments: Vec<Comment>,
    },
    Grouped {
        file: PathBuf,
        comments: Vec<GroupedComment>,
    },
}

/// Execute the source command, writing to stdout.
pub fn execute(args: SourceArgs, config_path: Option<&Path>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, config_path, &mut out)
}

/// Parse every documentation comment in the listed files.
pub fn run(args: &SourceArgs, config_path: Option<&Path>, out: &mut dyn Write) -> Result<()> {
    let config = DocletConfig::load(&ConfigOverrides::from(&args.flags), config_path)?;
    let parser = DocParser::new(config.to_parse_options());

    let mut results = Vec::with_capacity(args.files.len());
    let mut total = 0;
    for file in &args.files {
        let source = read_input(file)?;
        let extractor = OxcCommentExtractor::for_path(file);
        let comments = parser.parse_many_comments_with(&source, &extractor)?;
        debug!(file = %file.display(), comments = comments.len(), "parsed source file");
        comments.iter().for_each(report_tag_errors);
        total += comments.len();

        let file = file.clone();
        results.push(if config.grouped {
            let comments = comments
                .iter()
                .map(|comment| GroupedComment::new(&parser, comment))
                .collect();
            FileComments::Grouped { file, comments }
        } else {
            FileComments::Plain { file, comments }
        });
    }

    info!(files = args.files.len(), comments = total, "done");
    write_json(out, &results, config.pretty)
}
