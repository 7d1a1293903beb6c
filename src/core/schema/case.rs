use crate::core::types::KeyCase;
use std::borrow::Cow;

/// Convert a snake/kebab key into lowerCamelCase.
///
/// Separators (`_`, `-`, space) split words and runs of separators collapse. Words written
/// entirely in upper case are lowered first (`API_KEY` becomes `apiKey`); otherwise inner
/// capitalisation is kept so already-camel keys are left alone. Digits stay attached to the
/// word they appear in.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let words = key
        .split(['_', '-', ' '])
        .filter(|word| !word.is_empty());
    for (index, word) in words.enumerate() {
        let word: Cow<'_, str> = if word.chars().any(char::is_lowercase) {
            Cow::Borrowed(word)
        } else {
            Cow::Owned(word.to_lowercase())
        };
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            if index == 0 {
                out.extend(first.to_lowercase());
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() {
        key.to_string()
    } else {
        out
    }
}

/// Render a schema key for the requested case convention.
pub fn render_key(key: &str, case: KeyCase) -> Cow<'_, str> {
    match case {
        KeyCase::Plain => Cow::Borrowed(key),
        KeyCase::Camel => Cow::Owned(camel_case(key)),
    }
}
