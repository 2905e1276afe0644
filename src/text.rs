//! Token normalisation matching the ConceptNet URI conventions.

use once_cell::sync::Lazy;
use regex::Regex;

const STOPWORDS: &[&str] = &["the", "a", "an"];
const DROP_FIRST: &[&str] = &["to"];

/// Remove English articles and a leading infinitive marker.
///
/// Falls back to the untouched tokens when filtering would leave nothing,
/// so a phrase like `["the"]` still produces a lookup.
pub fn english_filter(tokens: &[String]) -> Vec<String> {
    let kept: Vec<&String> = tokens
        .iter()
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
        .collect();
    let start = kept
        .iter()
        .position(|token| !DROP_FIRST.contains(&token.as_str()))
        .unwrap_or(kept.len());
    if start == kept.len() {
        return tokens.to_vec();
    }
    kept[start..].iter().map(|token| (*token).clone()).collect()
}

/// Fold digits to `#` for terms containing a multi-digit number.
///
/// Numberbatch stores such terms with every digit replaced, so `1990s`
/// becomes `####s` while `4th` is left alone.
pub fn replace_numbers(term: &str) -> String {
    static DOUBLE_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9][0-9]").expect("valid regex"));
    static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]").expect("valid regex"));
    if DOUBLE_DIGIT.is_match(term) {
        DIGIT.replace_all(term, "#").into_owned()
    } else {
        term.to_string()
    }
}

/// Lowercase each token of a node phrase.
pub fn lowercase(phrase: &[String]) -> Vec<String> {
    phrase.iter().map(|token| token.to_lowercase()).collect()
}
