//! Name casing and pluralization for generated identifiers.
//!
//! Rules receive an [`Inflector`] through the registry instead of reaching for
//! shared global state.

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// Stateless string transforms used by rule bodies
pub trait Inflector: Send + Sync {
    fn plural(&self, word: &str) -> String;

    fn snake(&self, word: &str) -> String {
        word.to_snake_case()
    }

    fn lower_camel(&self, word: &str) -> String {
        word.to_lower_camel_case()
    }

    fn upper_camel(&self, word: &str) -> String {
        word.to_upper_camel_case()
    }
}

/// English pluralization covering the regular suffix rules and a short list
/// of irregular nouns
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInflector;

const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("datum", "data"),
    ("index", "indices"),
];

const UNCOUNTABLE: &[&str] = &["data", "equipment", "information", "metadata", "series", "species"];

impl Inflector for DefaultInflector {
    fn plural(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        let lower = word.to_lowercase();

        if UNCOUNTABLE.iter().any(|u| word_suffix(word, u).is_some()) {
            return word.to_string();
        }
        for (singular, plural) in IRREGULAR {
            if let Some(start) = word_suffix(word, singular) {
                let replacement = match_case(&word[start..], plural);
                return format!("{}{replacement}", &word[..start]);
            }
        }

        let upper = word.chars().last().is_some_and(char::is_uppercase);
        let suffix = |s: &str| if upper { s.to_uppercase() } else { s.to_string() };

        if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
            return format!("{}{}", &word[..word.len() - 1], suffix("ies"));
        }
        if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
            return format!("{word}{}", suffix("es"));
        }
        format!("{word}{}", suffix("s"))
    }
}

/// Start of `suffix` in `word` when it ends the word and forms a whole
/// segment of it: the entire word, after `_`, or a capitalized camel-case part
fn word_suffix(word: &str, suffix: &str) -> Option<usize> {
    let start = word.len().checked_sub(suffix.len())?;
    if !word.is_char_boundary(start) || !word[start..].eq_ignore_ascii_case(suffix) {
        return None;
    }
    let Some(previous) = word[..start].chars().next_back() else {
        return Some(start);
    };
    let first = word[start..].chars().next()?;
    let camel = first.is_uppercase() && !previous.is_uppercase();
    (previous == '_' || camel).then_some(start)
}

fn ends_with_vowel_y(lower: &str) -> bool {
    let mut chars = lower.chars().rev();
    chars.next();
    matches!(chars.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

fn match_case(original: &str, replacement: &str) -> String {
    match original.chars().next() {
        Some(first) if first.is_uppercase() => {
            let mut chars = replacement.chars();
            chars
                .next()
                .map(|c| c.to_uppercase().chain(chars).collect())
                .unwrap_or_default()
        }
        _ => replacement.to_string(),
    }
}
