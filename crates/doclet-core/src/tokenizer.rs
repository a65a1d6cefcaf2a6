//! Comment unwrapping and tokenizing.
//!
//! [`strip_stars`] turns `/** ... */` into its body, one output line per
//! input line. [`tokenize`] then splits that body into description, raw tag
//! lines, example blocks and footer text.

use crate::error::{DocError, Result};
use crate::model::{CommentToken, ExampleBlock, ExampleKind, RawTagLine};

/// Remove the comment delimiters and the leading `*` (plus one space) from
/// every line. The number of lines is preserved.
pub fn strip_stars(text: &str, allow_single_star: bool) -> Result<String> {
    let trimmed = text.trim();
    if trimmed == "/**/" {
        return Ok(String::new());
    }

    let body = match trimmed.strip_prefix("/**") {
        Some(body) => body,
        None if allow_single_star => trimmed.strip_prefix("/*").ok_or_else(|| {
            DocError::invalid_input("expected a comment starting with `/*`")
        })?,
        None => {
            return Err(DocError::invalid_input(
                "expected a comment starting with `/**`",
            ));
        }
    };
    let body = body
        .strip_suffix("*/")
        .ok_or_else(|| DocError::invalid_input("comment is not terminated by `*/`"))?;

    let lines: Vec<&str> = body
        .split('\n')
        .map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            match line.trim_start().strip_prefix('*') {
                Some(after) => after
                    .strip_prefix(' ')
                    .or_else(|| after.strip_prefix('\t'))
                    .unwrap_or(after),
                None if line.trim().is_empty() => "",
                None => line,
            }
        })
        .collect();
    Ok(lines.join("\n"))
}

/// Split an unwrapped comment body into its parts.
pub fn tokenize(body: &str) -> CommentToken {
    let lines: Vec<&str> = body.lines().collect();
    let mut state = TokenizerState::default();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];
        let trimmed = line.trim();

        if trimmed.is_empty() {
            state.close_tag();
            state.after_blank = true;
            idx += 1;
            continue;
        }

        if let Some(fence) = Fence::open(line) {
            state.close_tag();
            idx = state.read_fence(&lines, idx, fence);
            continue;
        }

        if let Some((key, rest)) = tag_start(trimmed) {
            state.close_tag();
            if key.eq_ignore_ascii_case("example") {
                idx = state.read_javadoc_example(&lines, idx, rest);
            } else {
                state.open_tag(idx, trimmed, key, rest);
                idx += 1;
            }
            continue;
        }

        if let Some(tag) = state.current_tag.as_mut() {
            tag.push_line(trimmed);
            idx += 1;
            continue;
        }

        if state.after_blank && is_indented(line) {
            idx = state.read_indented(&lines, idx);
            continue;
        }

        state.push_text(trimmed);
        idx += 1;
    }

    state.finish()
}

#[derive(Debug)]
struct TokenizerState {
    description: Vec<String>,
    footer: Vec<String>,
    examples: Vec<ExampleBlock>,
    tags: Vec<RawTagLine>,
    current_tag: Option<RawTagLine>,
    after_blank: bool,
    seen_block: bool,
}

impl Default for TokenizerState {
    fn default() -> Self {
        Self {
            description: Vec::new(),
            footer: Vec::new(),
            examples: Vec::new(),
            tags: Vec::new(),
            current_tag: None,
            after_blank: true,
            seen_block: false,
        }
    }
}

impl TokenizerState {
    fn open_tag(&mut self, line: usize, raw: &str, key: &str, rest: &str) {
        self.current_tag = Some(RawTagLine {
            raw: raw.to_string(),
            key: key.to_lowercase(),
            value: rest.to_string(),
            line,
        });
        self.after_blank = false;
        self.seen_block = true;
    }

    fn close_tag(&mut self) {
        if let Some(tag) = self.current_tag.take() {
            self.tags.push(tag);
        }
    }

    fn push_text(&mut self, text: &str) {
        let target = if self.seen_block {
            &mut self.footer
        } else {
            &mut self.description
        };
        target.push(text.to_string());
        self.after_blank = false;
    }

    fn push_example(&mut self, example: ExampleBlock) {
        self.examples.push(example);
        self.seen_block = true;
        self.after_blank = false;
    }

    fn read_fence(&mut self, lines: &[&str], start: usize, fence: Fence) -> usize {
        let close = (start + 1..lines.len()).find(|&idx| fence.closes(lines[idx]));
        let (inner_end, raw_end) = match close {
            Some(idx) => (idx, idx + 1),
            None => (lines.len(), lines.len()),
        };

        self.push_example(ExampleBlock {
            kind: ExampleKind::Gfm,
            language: fence.language,
            description: String::new(),
            raw: lines[start..raw_end].join("\n"),
            value: dedent(&lines[start + 1..inner_end]),
        });
        raw_end
    }

    fn read_indented(&mut self, lines: &[&str], start: usize) -> usize {
        let mut last_code = start;
        for (idx, line) in lines.iter().enumerate().skip(start) {
            if line.trim().is_empty() {
                continue;
            }
            if !is_indented(line) {
                break;
            }
            last_code = idx;
        }

        let block = &lines[start..=last_code];
        self.push_example(ExampleBlock {
            kind: ExampleKind::Indented,
            language: String::new(),
            description: String::new(),
            raw: block.join("\n"),
            value: dedent(block),
        });
        last_code + 1
    }

    /// `@example` owns every line up to the next tag.
    fn read_javadoc_example(&mut self, lines: &[&str], start: usize, rest: &str) -> usize {
        let end = (start + 1..lines.len())
            .find(|&idx| tag_start(lines[idx].trim()).is_some())
            .unwrap_or(lines.len());

        let mut body: Vec<&str> = Vec::with_capacity(end - start);
        body.push(rest);
        body.extend_from_slice(&lines[start + 1..end]);
        while body.len() > 1 && body.last().is_some_and(|line| line.trim().is_empty()) {
            body.pop();
        }

        let raw_tail = &lines[start + 1..start + body.len()];
        let mut raw = lines[start].trim_start().to_string();
        for line in raw_tail {
            raw.push('\n');
            raw.push_str(line);
        }

        let text = body.join("\n");
        let (description, code) = split_caption(&text);
        let code_lines: Vec<&str> = code.lines().collect();
        let (language, value) = match unfence(&code_lines) {
            Some((language, inner)) => (language, dedent(inner)),
            None => (String::new(), dedent(&code_lines)),
        };

        self.push_example(ExampleBlock {
            kind: ExampleKind::Javadoc,
            language,
            description,
            raw,
            value,
        });
        end
    }

    fn finish(mut self) -> CommentToken {
        self.close_tag();
        CommentToken {
            description: self.description.join("\n"),
            footer: self.footer.join("\n"),
            examples: self.examples,
            tags: self.tags,
        }
    }
}

impl RawTagLine {
    /// Append a continuation line. Lines inside an open `{...}` group keep
    /// their line break so multi-line types survive.
    fn push_line(&mut self, text: &str) {
        let separator = if open_braces(&self.raw) > 0 { '\n' } else { ' ' };
        self.raw.push(separator);
        self.raw.push_str(text);
        if !self.value.is_empty() {
            self.value.push(separator);
        }
        self.value.push_str(text);
    }
}

fn open_braces(text: &str) -> isize {
    text.chars().fold(0, |depth, c| match c {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

/// `@word rest` at the start of a trimmed line.
fn tag_start(trimmed: &str) -> Option<(&str, &str)> {
    let after = trimmed.strip_prefix('@')?;
    let len = after
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .unwrap_or(after.len());
    if len == 0 {
        return None;
    }
    Some((&after[..len], after[len..].trim()))
}

fn indent_width(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

fn is_indented(line: &str) -> bool {
    indent_width(line) >= 4
}

/// Remove the common leading whitespace and surrounding blank lines.
fn dedent(lines: &[&str]) -> String {
    let strip = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let body: Vec<&str> = lines
        .iter()
        .map(|line| strip_indent(line, strip).trim_end())
        .collect();
    let start = body.iter().position(|line| !line.is_empty()).unwrap_or(body.len());
    let end = body.iter().rposition(|line| !line.is_empty()).map_or(start, |idx| idx + 1);
    body[start..end].join("\n")
}

/// Drop up to `count` leading whitespace characters.
fn strip_indent(line: &str, count: usize) -> &str {
    let mut rest = line;
    for _ in 0..count {
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) if c.is_whitespace() => rest = chars.as_str(),
            _ => break,
        }
    }
    rest
}

/// Leading `<caption>...</caption>` of an `@example` body.
fn split_caption(text: &str) -> (String, &str) {
    let trimmed = text.trim_start();
    if let Some(after) = trimmed.strip_prefix("<caption>") {
        if let Some(close) = after.find("</caption>") {
            let caption = after[..close].trim().to_string();
            return (caption, &after[close + "</caption>".len()..]);
        }
    }
    (String::new(), text)
}

/// An `@example` body consisting of exactly one fenced block.
fn unfence<'a, 'b>(lines: &'b [&'a str]) -> Option<(String, &'b [&'a str])> {
    let first = lines.iter().position(|line| !line.trim().is_empty())?;
    let last = lines.iter().rposition(|line| !line.trim().is_empty())?;
    if last <= first {
        return None;
    }
    let fence = Fence::open(lines[first])?;
    if !fence.closes(lines[last]) {
        return None;
    }
    Some((fence.language, &lines[first + 1..last]))
}

#[derive(Debug)]
struct Fence {
    marker: char,
    len: usize,
    language: String,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next().filter(|&c| matches!(c, '`' | '~'))?;
        let len = trimmed.chars().take_while(|&c| c == marker).count();
        if len < 3 {
            return None;
        }
        let info = trimmed[len..].trim();
        if marker == '`' && info.contains('`') {
            return None;
        }
        let language = info.split_whitespace().next().unwrap_or("").to_string();
        Some(Self {
            marker,
            len,
            language,
        })
    }

    fn closes(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.chars().count() >= self.len && trimmed.chars().all(|c| c == self.marker)
    }
}
