//! Memoizing English pluralizer for tag titles (`param` → `params`).

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Words that are already plural or have no plural form in tag grouping.
const UNCOUNTABLE: &[&str] = &[
    "access",
    "returns",
    "throws",
    "yields",
    "fires",
    "listens",
    "requires",
    "mixes",
    "augments",
    "implements",
    "borrows",
    "lends",
    "this",
    "kind",
    "since",
    "deprecated",
    "license",
    "copyright",
    "static",
    "inner",
    "global",
    "readonly",
];

const IRREGULAR: &[(&str, &str)] = &[("alias", "aliases"), ("child", "children"), ("person", "people")];

/// Pluralizer with a shared cache. Cloning shares the cache.
#[derive(Debug, Clone, Default)]
pub struct Pluralizer {
    cache: Arc<RwLock<FxHashMap<String, String>>>,
}

static GLOBAL: Lazy<Pluralizer> = Lazy::new(Pluralizer::default);

impl Pluralizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance.
    pub fn global() -> &'static Pluralizer {
        &GLOBAL
    }

    pub fn pluralize(&self, word: &str) -> String {
        if let Some(cached) = self.cache.read().get(word) {
            return cached.clone();
        }
        let plural = inflect(word);
        self.cache.write().insert(word.to_string(), plural.clone());
        plural
    }

    /// Number of memoized words.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }
}

/// Convenience wrapper over [`Pluralizer::global`].
pub fn pluralize(word: &str) -> String {
    Pluralizer::global().pluralize(word)
}

fn inflect(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return (*plural).to_string();
    }

    let mut chars = lower.chars().rev();
    let last = chars.next();
    let before_last = chars.next();
    match (before_last, last) {
        (Some(prev), Some('y')) if !"aeiou".contains(prev) => {
            format!("{}ies", &word[..word.len() - 1])
        }
        (_, Some('s' | 'x' | 'z')) => format!("{word}es"),
        (Some('c' | 's'), Some('h')) => format!("{word}es"),
        _ => format!("{word}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_plurals() {
        let pluralizer = Pluralizer::new();
        assert_eq!(pluralizer.pluralize("param"), "params");
        assert_eq!(pluralizer.pluralize("property"), "properties");
        assert_eq!(pluralizer.pluralize("day"), "days");
        assert_eq!(pluralizer.pluralize("class"), "classes");
        assert_eq!(pluralizer.pluralize("match"), "matches");
        assert_eq!(pluralizer.pluralize("alias"), "aliases");
    }

    #[test]
    fn test_uncountable_words_are_unchanged() {
        let pluralizer = Pluralizer::new();
        assert_eq!(pluralizer.pluralize("returns"), "returns");
        assert_eq!(pluralizer.pluralize("throws"), "throws");
        assert_eq!(pluralizer.pluralize("access"), "access");
    }

    #[test]
    fn test_cache_is_shared_between_clones() {
        let pluralizer = Pluralizer::new();
        let clone = pluralizer.clone();
        pluralizer.pluralize("example");
        pluralizer.pluralize("example");
        assert_eq!(clone.cached(), 1);
        assert_eq!(clone.pluralize("example"), "examples");
    }
}
