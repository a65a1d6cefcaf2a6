use serde::{Deserialize, Serialize};

use crate::types::Type;

/// A fully parsed documentation comment.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Free text before the first tag.
    pub description: String,
    /// Free text after the last tag.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub footer: String,
    /// Code examples, in source order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<ExampleBlock>,
    /// Normalized tags, in source order.
    pub tags: Vec<Tag>,
    /// One-based line of the opening `/**` in the source file.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start_line: Option<usize>,
    /// One-based line of the closing `*/` in the source file.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_line: Option<usize>,
}

impl Comment {
    /// Returns `true` if the comment carries no description, examples or tags.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.footer.is_empty()
            && self.examples.is_empty()
            && self.tags.is_empty()
    }

    /// Tags with the given canonical title.
    pub fn tags_titled<'a>(&'a self, title: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| tag.title == title)
    }

    /// Whether any tag recorded an error.
    pub fn has_errors(&self) -> bool {
        self.tags.iter().any(|tag| !tag.errors.is_empty())
    }
}

/// One normalized tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Canonical tag title (`param`, `returns`, ...).
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub ty: Option<TagType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nullable: Option<bool>,
    /// `@access` level.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub access: Option<String>,
    /// `@kind` value.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<String>,
    /// `@variation` number.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub variation: Option<f64>,
    /// One-based source line, when line numbers were requested.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<String>,
}

impl Tag {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            name: None,
            ty: None,
            description: None,
            default: None,
            optional: false,
            nullable: None,
            access: None,
            kind: None,
            variation: None,
            line: None,
            errors: Vec::new(),
        }
    }

    /// The tag's type when it carries exactly one.
    pub fn single_type(&self) -> Option<&Type> {
        match &self.ty {
            Some(TagType::Single(ty)) => Some(ty),
            _ => None,
        }
    }

    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }
}

/// The type carried by a tag: usually one, occasionally several adjacent
/// `{A} {B}` groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagType {
    Single(Type),
    List(Vec<Type>),
}

impl TagType {
    pub fn types(&self) -> &[Type] {
        match self {
            Self::Single(ty) => std::slice::from_ref(ty),
            Self::List(types) => types,
        }
    }
}

/// Output of the comment tokenizer, before any tag is normalized.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentToken {
    pub description: String,
    pub footer: String,
    pub examples: Vec<ExampleBlock>,
    pub tags: Vec<RawTagLine>,
}

/// One `@key value` tag as written, continuation lines joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTagLine {
    /// The tag text starting at `@`, original case.
    pub raw: String,
    /// Lowercased tag word.
    pub key: String,
    /// Text after the tag word.
    pub value: String,
    /// Zero-based line of the tag within the comment.
    pub line: usize,
}

/// A code example found in a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleBlock {
    pub kind: ExampleKind,
    pub language: String,
    /// `<caption>` text of an `@example`.
    pub description: String,
    /// Verbatim text including fences or the `@example` marker.
    pub raw: String,
    /// Code with fences and common indentation removed.
    pub value: String,
}

/// How an example block was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExampleKind {
    /// Fenced with ``` or ~~~.
    #[serde(rename = "GFM")]
    Gfm,
    /// Indented by four or more columns after a blank line.
    Indented,
    /// Introduced by an `@example` tag.
    Javadoc,
}
