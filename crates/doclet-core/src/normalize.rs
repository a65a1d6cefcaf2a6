//! Turn a [`RawTagLine`] into a [`Tag`].
//!
//! Structural problems (unbalanced delimiters, malformed types) either fail
//! the call or, with `recoverable`, are recorded on the tag. Semantic
//! problems (an unknown `@access` level, a description on a marker tag in
//! strict mode) are always recorded on the tag. A tag carrying a type it
//! does not accept is dropped.

use tracing::debug;

use crate::error::{DocError, Result};
use crate::flags::strip_flags;
use crate::model::{RawTagLine, Tag, TagType};
use crate::options::ParseOptions;
use crate::split::{SplitTag, split_tag};
use crate::tags::{self, ACCESS_LEVELS, Capability, KINDS, SemanticRule, TagSpec};
use crate::type_parser;
use crate::types::Type;

/// Normalize one raw tag. `Ok(None)` means the tag was dropped.
pub fn normalize(raw: &RawTagLine, options: &ParseOptions) -> Result<Option<Tag>> {
    let title = tags::canonicalize(raw_key(raw));

    if !options.allows_tag(&title) {
        debug!(tag = %title, "dropping tag not in allow-list");
        return Ok(None);
    }

    let spec = tags::lookup(&title);
    if spec.text {
        let mut tag = Tag::new(title);
        tag.description = non_empty(raw.value.trim());
        return Ok(Some(tag));
    }

    let split = match split_tag(&raw.raw, Some(&raw.key)) {
        Ok(split) => split,
        Err(err) => return recover(title, raw, err, options),
    };

    if split.raw_type.is_some() && spec.ty == Capability::Never {
        let violation = DocError::CapabilityViolation {
            tag: title,
            reason: "does not accept a type".to_string(),
        };
        debug!(error = %violation, "dropping tag");
        return Ok(None);
    }

    let mut tag = Tag::new(title);
    match parse_types(&split, spec, options) {
        Ok(ty) => tag.ty = ty,
        Err(err) if options.recoverable => {
            debug!(tag = %tag.title, error = %err, "recovered from type error");
            tag.push_error(err.to_string());
        }
        Err(err) => return Err(err),
    }
    if let Some(TagType::Single(ty)) = &tag.ty {
        apply_type_flags(&mut tag.optional, &mut tag.nullable, ty, spec.param_type);
    }

    match spec.rule {
        Some(SemanticRule::This) => this_tag(&mut tag, &split),
        Some(rule) => {
            tag.description = split.remainder.clone();
            apply_rule(&mut tag, rule, options);
        }
        None => match spec.name {
            Capability::Never => tag.description = split.remainder.clone(),
            Capability::Optional | Capability::Required => name_tag(&mut tag, split, options),
        },
    }

    if spec.ty == Capability::Required && tag.ty.is_none() && options.strict {
        tag.push_error(
            DocError::CapabilityViolation {
                tag: tag.title.clone(),
                reason: "requires a type".to_string(),
            }
            .to_string(),
        );
    }

    if spec.name == Capability::Required && tag.name.is_none() && options.strict {
        let violation = DocError::CapabilityViolation {
            tag: tag.title.clone(),
            reason: "requires a name".to_string(),
        };
        if !options.recoverable {
            debug!(error = %violation, "dropping tag");
            return Ok(None);
        }
        tag.push_error(violation.to_string());
    }

    Ok(Some(tag))
}

/// The tag word as written, falling back to the lowercased key.
fn raw_key(raw: &RawTagLine) -> &str {
    raw.raw
        .trim_start()
        .strip_prefix('@')
        .map(|rest| {
            let len = rest
                .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
                .unwrap_or(rest.len());
            &rest[..len]
        })
        .filter(|key| !key.is_empty())
        .unwrap_or(&raw.key)
}

fn recover(
    title: String,
    raw: &RawTagLine,
    err: DocError,
    options: &ParseOptions,
) -> Result<Option<Tag>> {
    if !options.recoverable {
        return Err(err);
    }
    debug!(tag = %title, error = %err, "recovered from malformed tag");
    let mut tag = Tag::new(title);
    tag.description = non_empty(raw.value.trim());
    tag.push_error(err.to_string());
    Ok(Some(tag))
}

fn parse_types(split: &SplitTag, spec: TagSpec, options: &ParseOptions) -> Result<Option<TagType>> {
    let mut types = split
        .type_texts()
        .map(|text| parse_tag_type(text, spec.param_type, options))
        .collect::<Result<Vec<_>>>()?;

    Ok(match types.len() {
        0 => None,
        1 => types.pop().map(TagType::Single),
        _ => Some(TagType::List(types)),
    })
}

fn parse_tag_type(text: &str, param: bool, options: &ParseOptions) -> Result<Type> {
    if let Some(hook) = &options.parsers.type_ {
        return hook.parse_type(text, param);
    }
    if param {
        type_parser::parse_param_type(text)
    } else {
        type_parser::parse_type(text)
    }
}

/// `{T=}` marks a parameter optional; `{?T}` / `{!T}` set `nullable`.
fn apply_type_flags(optional: &mut bool, nullable: &mut Option<bool>, ty: &Type, param: bool) {
    let inner = match ty {
        Type::OptionalType { expression } if param => {
            *optional = true;
            expression.as_ref()
        }
        other => other,
    };
    match inner {
        Type::NullableType { .. } => *nullable = Some(true),
        Type::NonNullableType { .. } => *nullable = Some(false),
        _ => {}
    }
}

fn name_tag(tag: &mut Tag, split: SplitTag, options: &ParseOptions) {
    tag.description = split.description;
    tag.default = split.default;

    if split.bracketed {
        tag.optional = true;
        if options.strict && !options.sloppy {
            tag.push_error("[name] optional syntax requires the sloppy option in strict mode");
        }
    }

    let Some(name) = split.name else {
        return;
    };
    let stripped = strip_flags(&name);
    let name = if !stripped.flags.suffix.is_empty()
        && stripped.flags.prefix.is_empty()
        && !stripped.flags.rest
        && !stripped.core.is_empty()
    {
        tag.optional = true;
        stripped.core.to_string()
    } else {
        name
    };

    if options.strict && !tags::is_valid_name(&name) {
        tag.push_error(format!("invalid name `{name}`"));
    }
    tag.name = Some(name);
}

/// `@this {Name}` or `@this Name`.
fn this_tag(tag: &mut Tag, split: &SplitTag) {
    match &tag.ty {
        Some(TagType::Single(Type::NameExpression { name })) => {
            tag.name = Some(name.clone());
            tag.description = split.remainder.clone();
        }
        Some(_) => {
            tag.description = split.remainder.clone();
            tag.push_error("@this type must be a simple name");
        }
        None => {
            tag.name = split.name.clone();
            tag.description = split.description.clone();
            if tag.name.is_none() && tag.errors.is_empty() {
                tag.push_error("@this requires a name");
            }
        }
    }
}

fn apply_rule(tag: &mut Tag, rule: SemanticRule, options: &ParseOptions) {
    match rule {
        SemanticRule::Access => {
            let value = tag.description.take();
            match value.as_deref() {
                Some(level) if ACCESS_LEVELS.contains(&level) => {}
                Some(level) => tag.push_error(format!("invalid access level `{level}`")),
                None => tag.push_error("@access requires a level"),
            }
            tag.access = value;
        }
        SemanticRule::Kind => {
            let value = tag.description.take();
            match value.as_deref() {
                Some(kind) if KINDS.contains(&kind) => {}
                Some(kind) => tag.push_error(format!("invalid kind `{kind}`")),
                None => tag.push_error("@kind requires a value"),
            }
            tag.kind = value;
        }
        SemanticRule::Variation => match tag.description.take() {
            Some(text) => match text.parse::<f64>() {
                Ok(value) if value.is_finite() => tag.variation = Some(value),
                _ => tag.push_error(format!("invalid variation `{text}`")),
            },
            None => tag.push_error("@variation requires a number"),
        },
        SemanticRule::Marker => {
            if options.strict && tag.description.is_some() {
                let message = format!("@{} cannot have a description in strict mode", tag.title);
                tag.push_error(message);
            }
        }
        SemanticRule::This => {}
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}
