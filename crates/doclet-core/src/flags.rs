//! Nullability / optionality / rest markers.
//!
//! A type token or tag name may carry a leading and a trailing run of `?`,
//! `!` and `=` characters, optionally preceded by `...`. The resolver strips
//! them and rebuilds the equivalent wrapper types around the core.

use crate::types::Type;

/// One marker character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// `?`
    Nullable,
    /// `!`
    NonNullable,
    /// `=`
    Optional,
}

impl Flag {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '?' => Some(Self::Nullable),
            '!' => Some(Self::NonNullable),
            '=' => Some(Self::Optional),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Nullable => '?',
            Self::NonNullable => '!',
            Self::Optional => '=',
        }
    }

    /// The literal a marker stands for when it has no operand (`{?}`, `{!}`).
    pub fn literal(self) -> Option<Type> {
        match self {
            Self::Nullable => Some(Type::NullableLiteral),
            Self::NonNullable => Some(Type::NonNullableLiteral),
            Self::Optional => None,
        }
    }

    fn wrap(self, ty: Type, prefix: bool) -> Type {
        match self {
            Self::Nullable => Type::nullable(ty, prefix),
            Self::NonNullable => Type::non_nullable(ty, prefix),
            Self::Optional => Type::optional(ty),
        }
    }
}

/// Markers collected around one core token.
///
/// `prefix` is stored in source order, so its last entry sits next to the
/// core. `suffix` is stored in source order too, so its first entry sits next
/// to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSet {
    pub rest: bool,
    pub prefix: Vec<Flag>,
    pub suffix: Vec<Flag>,
}

impl FlagSet {
    pub fn is_empty(&self) -> bool {
        !self.rest && self.prefix.is_empty() && self.suffix.is_empty()
    }

    pub fn is_optional(&self) -> bool {
        self.prefix.contains(&Flag::Optional) || self.suffix.contains(&Flag::Optional)
    }

    pub fn is_nullable(&self) -> bool {
        self.prefix.contains(&Flag::Nullable) || self.suffix.contains(&Flag::Nullable)
    }

    /// Wrap `core` in the collected markers. The marker closest to the core
    /// text becomes the innermost wrapper; suffix markers wrap the prefixed
    /// core and rest wraps everything.
    pub fn apply(&self, core: Type) -> Type {
        let mut ty = core;
        for flag in self.prefix.iter().rev() {
            ty = flag.wrap(ty, true);
        }
        for flag in &self.suffix {
            ty = flag.wrap(ty, false);
        }
        if self.rest {
            ty = Type::rest(Some(ty));
        }
        ty
    }
}

/// A token with its markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped<'a> {
    pub core: &'a str,
    pub flags: FlagSet,
}

/// Strip `...`, then the leading marker run, then the trailing marker run.
pub fn strip_flags(token: &str) -> Stripped<'_> {
    let mut flags = FlagSet::default();
    let mut core = token.trim();

    if let Some(rest) = core.strip_prefix("...") {
        flags.rest = true;
        core = rest;
    }

    while let Some(flag) = core.chars().next().and_then(Flag::from_char) {
        flags.prefix.push(flag);
        core = &core[1..];
    }

    let mut suffix = Vec::new();
    while let Some(flag) = core.chars().next_back().and_then(Flag::from_char) {
        suffix.push(flag);
        core = &core[..core.len() - 1];
    }
    suffix.reverse();
    flags.suffix = suffix;

    Stripped { core, flags }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_name_markers() {
        let stripped = strip_flags("name=");
        assert_eq!(stripped.core, "name");
        assert!(stripped.flags.is_optional());

        let stripped = strip_flags("...args");
        assert_eq!(stripped.core, "args");
        assert!(stripped.flags.rest);

        let stripped = strip_flags("plain");
        assert_eq!(stripped.core, "plain");
        assert!(stripped.flags.is_empty());
    }

    #[test]
    fn test_closest_marker_is_innermost() {
        let stripped = strip_flags("?!T");
        assert_eq!(stripped.flags.prefix, vec![Flag::Nullable, Flag::NonNullable]);
        let ty = stripped.flags.apply(Type::name(stripped.core));
        assert_eq!(
            ty,
            Type::nullable(Type::non_nullable(Type::name("T"), true), true)
        );

        let stripped = strip_flags("T?=");
        assert_eq!(stripped.flags.suffix, vec![Flag::Nullable, Flag::Optional]);
        let ty = stripped.flags.apply(Type::name(stripped.core));
        assert_eq!(ty, Type::optional(Type::nullable(Type::name("T"), false)));
    }

    #[test]
    fn test_prefix_wraps_before_suffix() {
        let stripped = strip_flags("?T=");
        let ty = stripped.flags.apply(Type::name(stripped.core));
        assert_eq!(ty, Type::optional(Type::nullable(Type::name("T"), true)));
    }

    #[test]
    fn test_rest_is_outermost() {
        let stripped = strip_flags("...number=");
        let ty = stripped.flags.apply(Type::name(stripped.core));
        assert_eq!(ty, Type::rest(Some(Type::optional(Type::name("number")))));
    }
}
