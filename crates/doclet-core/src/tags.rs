//! Tag synonyms and per-tag capabilities.
//!
//! Every tag title maps to one [`TagSpec`] that says whether the tag takes a
//! name, whether it takes a type, and which bespoke rule (if any) applies to
//! it. Titles not listed here get [`TagSpec::UNKNOWN`].

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;

/// Whether a tag takes a name or a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Required,
    Optional,
    /// Presence is a capability violation.
    Never,
}

/// Behavior beyond the generic name / type / description handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticRule {
    /// `@access public|private|protected`
    Access,
    /// `@kind <symbol kind>`
    Kind,
    /// `@variation <number>`
    Variation,
    /// `@this Name`
    This,
    /// Boolean marker tags such as `@static`.
    Marker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    pub name: Capability,
    pub ty: Capability,
    pub rule: Option<SemanticRule>,
    /// Types are parsed in parameter position (`?=` allowed).
    pub param_type: bool,
    /// Free-text tag: everything after the title is the description,
    /// braces included.
    pub text: bool,
}

impl TagSpec {
    pub const UNKNOWN: TagSpec = TagSpec::new(Capability::Never, Capability::Optional);

    const fn new(name: Capability, ty: Capability) -> Self {
        Self {
            name,
            ty,
            rule: None,
            param_type: false,
            text: false,
        }
    }

    const fn param() -> Self {
        Self {
            name: Capability::Required,
            ty: Capability::Optional,
            rule: None,
            param_type: true,
            text: false,
        }
    }

    const fn text() -> Self {
        Self {
            text: true,
            ..Self::new(Capability::Never, Capability::Never)
        }
    }

    const fn rule(rule: SemanticRule) -> Self {
        Self {
            name: Capability::Never,
            ty: Capability::Never,
            rule: Some(rule),
            param_type: false,
            text: false,
        }
    }
}

/// Values accepted by `@access`.
pub const ACCESS_LEVELS: &[&str] = &["public", "private", "protected"];

/// Values accepted by `@kind`.
pub const KINDS: &[&str] = &[
    "class",
    "constant",
    "event",
    "external",
    "file",
    "function",
    "member",
    "mixin",
    "module",
    "namespace",
    "typedef",
];

static SYNONYMS: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("const", "constant"),
        ("constant", "constant"),
        ("ctor", "ctor"),
        ("constructor", "ctor"),
        ("arg", "param"),
        ("argument", "param"),
        ("param", "param"),
        ("parameter", "param"),
        ("prop", "prop"),
        ("property", "prop"),
        ("return", "returns"),
        ("returns", "returns"),
        ("var", "variable"),
        ("variable", "variable"),
        ("fn", "function"),
        ("func", "function"),
        ("function", "function"),
        ("extends", "augments"),
        ("exception", "throws"),
        ("yield", "yields"),
        ("desc", "description"),
        ("virtual", "abstract"),
        ("emits", "fires"),
        ("defaultvalue", "default"),
        ("host", "external"),
        ("fileoverview", "file"),
        ("overview", "file"),
    ]
    .into_iter()
    .collect()
});

static SPECS: Lazy<FxHashMap<&'static str, TagSpec>> = Lazy::new(|| {
    use Capability::{Never, Optional};

    let mut specs = FxHashMap::default();
    specs.insert("param", TagSpec::param());
    specs.insert("prop", TagSpec::param());

    for title in ["returns", "throws", "yields", "enum", "define", "type"] {
        specs.insert(title, TagSpec::new(Never, Optional));
    }
    for title in [
        "typedef", "constant", "variable", "member", "class", "ctor", "augments",
        "implements", "namespace", "module", "interface",
    ] {
        specs.insert(title, TagSpec::new(Optional, Optional));
    }
    specs.insert("callback", TagSpec::new(Optional, Never));
    specs.insert(
        "this",
        TagSpec {
            rule: Some(SemanticRule::This),
            ..TagSpec::new(Optional, Optional)
        },
    );

    for title in [
        "function", "method", "name", "alias", "memberof", "lends", "mixes", "mixin", "event",
        "fires", "listens", "requires", "external",
    ] {
        specs.insert(title, TagSpec::new(Optional, Never));
    }
    for title in ["override", "abstract", "ignore", "async", "generator", "hideconstructor"] {
        specs.insert(title, TagSpec::new(Never, Never));
    }

    specs.insert("access", TagSpec::rule(SemanticRule::Access));
    specs.insert("kind", TagSpec::rule(SemanticRule::Kind));
    specs.insert("variation", TagSpec::rule(SemanticRule::Variation));
    for title in ["global", "static", "instance", "inner", "readonly"] {
        specs.insert(title, TagSpec::rule(SemanticRule::Marker));
    }

    for title in [
        "description", "summary", "deprecated", "since", "version", "author", "see", "todo",
        "license", "copyright", "file", "tutorial", "default", "borrows",
    ] {
        specs.insert(title, TagSpec::text());
    }
    specs
});

/// Dotted, hashed, tilde and module namepaths, optional `[]` segments and
/// quoted members. Backtick-quoted names are accepted verbatim.
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?:`[^`]+`|[\p{L}_$@][\p{L}\p{N}_$\-]*(?:(?:\[\])*[.#~:/](?:[\p{L}\p{N}_$\-]+|"[^"]*"|'[^']*'))*(?:\[\])*)$"#,
    )
    .expect("name pattern is a valid regex")
});

/// Canonical title for a tag key, or `None` if the key has no synonyms.
pub fn canonical_title(key: &str) -> Option<&'static str> {
    SYNONYMS.get(key.to_lowercase().as_str()).copied()
}

/// Canonical title, falling back to `key` itself for unrecognized tags.
pub fn canonicalize(key: &str) -> String {
    match canonical_title(key) {
        Some(title) => title.to_string(),
        None => key.to_string(),
    }
}

/// Capabilities of a canonical title.
pub fn lookup(title: &str) -> TagSpec {
    SPECS
        .get(title)
        .or_else(|| SPECS.get(title.to_lowercase().as_str()))
        .copied()
        .unwrap_or(TagSpec::UNKNOWN)
}

/// Whether `name` is a well-formed namepath.
pub fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms() {
        assert_eq!(canonicalize("arg"), "param");
        assert_eq!(canonicalize("Argument"), "param");
        assert_eq!(canonicalize("return"), "returns");
        assert_eq!(canonicalize("func"), "function");
        assert_eq!(canonicalize("constructor"), "ctor");
        assert_eq!(canonicalize("extends"), "augments");
        assert_eq!(canonicalize("fileoverview"), "file");
        assert_eq!(canonicalize("CustomTag"), "CustomTag");
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("param"), TagSpec::param());
        assert_eq!(lookup("method").ty, Capability::Never);
        assert_eq!(lookup("access").rule, Some(SemanticRule::Access));
        assert_eq!(lookup("readonly").rule, Some(SemanticRule::Marker));
        assert_eq!(lookup("this").rule, Some(SemanticRule::This));
        assert!(lookup("default").text);
        assert_eq!(lookup("somethingElse"), TagSpec::UNKNOWN);
    }

    #[test]
    fn test_name_validation() {
        for name in [
            "userName",
            "options.size",
            "employees[].name",
            "Foo#bar",
            "Foo~inner",
            "module:foo/bar",
            "$el",
            "obj.\"quoted key\"",
            "`weird name`",
        ] {
            assert!(is_valid_name(name), "{name} should be valid");
        }
        for name in ["1abc", "a b", "a..b", "", "a.", "{x}"] {
            assert!(!is_valid_name(name), "{name:?} should be invalid");
        }
    }
}
