//! Split one `@tag {Type} name description` line into its fragments.
//!
//! The splitter only delimits the type; parsing it is left to the caller so
//! that a tag which is not allowed to carry a type can be rejected without
//! ever touching the type grammar.

use crate::error::{DocError, Result};

/// Fragments of one tag line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitTag {
    /// Tag word without `@`, in its original case.
    pub key: String,
    /// The first `{...}` group, braces included.
    pub raw_type: Option<String>,
    /// Further `{...}` groups written directly after the first one.
    pub extra_types: Vec<String>,
    /// Everything after the type groups, for tags that take no name.
    pub remainder: Option<String>,
    pub name: Option<String>,
    /// The name was written as `[name]`.
    pub bracketed: bool,
    pub default: Option<String>,
    pub description: Option<String>,
}

impl SplitTag {
    /// Inner text of the first type group.
    pub fn type_text(&self) -> Option<&str> {
        self.raw_type.as_deref().map(strip_braces)
    }

    /// Inner text of every type group, in source order.
    pub fn type_texts(&self) -> impl Iterator<Item = &str> {
        self.raw_type
            .iter()
            .chain(self.extra_types.iter())
            .map(|raw| strip_braces(raw))
    }
}

/// `{T}` → `T`. Text without surrounding braces is returned as is.
pub fn strip_braces(raw: &str) -> &str {
    raw.strip_prefix('{')
        .and_then(|inner| inner.strip_suffix('}'))
        .unwrap_or(raw)
}

/// Split `raw` (optionally starting with `@key`) into its fragments.
///
/// `known_key` is used when `raw` has no leading `@key`.
pub fn split_tag(raw: &str, known_key: Option<&str>) -> Result<SplitTag> {
    let mut pos = skip_ws(raw, 0);

    let key = match raw[pos..].strip_prefix('@') {
        Some(after_at) => {
            let len = after_at.find(char::is_whitespace).unwrap_or(after_at.len());
            let key = after_at[..len].to_string();
            pos += 1 + len;
            key
        }
        None => known_key.unwrap_or_default().to_string(),
    };

    let mut groups = Vec::new();
    loop {
        pos = skip_ws(raw, pos);
        let rest = &raw[pos..];
        if !rest.starts_with('{') || rest.starts_with("{@") {
            break;
        }
        let end = scan_balanced(raw, pos)?;
        groups.push(raw[pos..end].to_string());
        pos = end;
    }
    let mut groups = groups.into_iter();
    let raw_type = groups.next();
    let extra_types = groups.collect();

    pos = skip_ws(raw, pos);
    let remainder = clean_description(&raw[pos..]);

    let mut split = SplitTag {
        key,
        raw_type,
        extra_types,
        remainder,
        ..SplitTag::default()
    };

    let rest = &raw[pos..];
    let description_start = if rest.starts_with('[') {
        let end = scan_balanced(raw, pos)?;
        let content = &raw[pos + 1..end - 1];
        let (name, default) = match content.split_once('=') {
            Some((name, default)) => (name.trim(), Some(default.trim().to_string())),
            None => (content.trim(), None),
        };
        split.bracketed = true;
        split.name = (!name.is_empty()).then(|| name.to_string());
        split.default = default;
        end
    } else if let Some(close) = rest
        .strip_prefix('`')
        .and_then(|after| after.find('`'))
    {
        let end = pos + close + 2;
        split.name = Some(raw[pos..end].to_string());
        end
    } else {
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        split.name = (len > 0).then(|| rest[..len].to_string());
        pos + len
    };

    split.description = clean_description(&raw[description_start..]);
    Ok(split)
}

fn skip_ws(text: &str, pos: usize) -> usize {
    let rest = &text[pos..];
    pos + (rest.len() - rest.trim_start().len())
}

/// Scan from the opener at `start` to its matching closer and return the
/// offset just past it. Nested `{[(<` groups and quoted strings are
/// skipped. A `<` that is never closed by `>` is treated as plain text.
pub(crate) fn scan_balanced(src: &str, start: usize) -> Result<usize> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut chars = src[start..].char_indices();

    while let Some((idx, c)) = chars.next() {
        let at = start + idx;
        match c {
            '{' | '[' | '(' | '<' => stack.push((c, at)),
            '"' | '\'' => {
                let mut escaped = false;
                let mut closed = false;
                for (_, q) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if q == '\\' {
                        escaped = true;
                    } else if q == c {
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(DocError::unbalanced(c, at));
                }
            }
            '>' => {
                if matches!(stack.last(), Some(('<', _))) {
                    stack.pop();
                }
            }
            '}' | ']' | ')' => {
                while matches!(stack.last(), Some(('<', _))) {
                    stack.pop();
                }
                match stack.last() {
                    Some(&(open, _)) if closer(open) == c => {
                        stack.pop();
                    }
                    _ => return Err(DocError::unbalanced(c, at)),
                }
                if stack.is_empty() {
                    return Ok(at + 1);
                }
            }
            _ => {}
        }
    }

    let (open, at) = stack.first().copied().unwrap_or(('{', start));
    Err(DocError::unbalanced(open, at))
}

fn closer(open: char) -> char {
    match open {
        '{' => '}',
        '[' => ']',
        '(' => ')',
        _ => '>',
    }
}

/// Trim, drop a leading `- ` separator and any closing braces left over
/// from a type that was continued across lines.
fn clean_description(text: &str) -> Option<String> {
    let mut text = text.trim();
    if let Some(after) = text.strip_prefix('-') {
        if after.is_empty() || after.starts_with(char::is_whitespace) {
            text = after.trim_start();
        }
    }

    let opens = text.matches('{').count();
    let mut closes = text.matches('}').count();
    while closes > opens {
        match text.strip_suffix('}') {
            Some(trimmed) => {
                text = trimmed.trim_end();
                closes -= 1;
            }
            None => break,
        }
    }

    (!text.is_empty()).then(|| text.to_string())
}
