//! Shared utility functions

use crate::numeric::NumericKind;

/// Levenshtein edit distance, over chars, with two rolling rows
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closest candidate within `threshold` edits. Case differences are free.
pub fn find_similar_name<'a>(name: &str, candidates: &[&'a str], threshold: usize) -> Option<&'a str> {
    let needle = name.to_ascii_lowercase();
    candidates
        .iter()
        .map(|candidate| (levenshtein_distance(&needle, &candidate.to_ascii_lowercase()), *candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Closest numeric type name to an unknown one
pub fn suggest_numeric_kind(name: &str) -> Option<&'static str> {
    let candidates: Vec<&'static str> = NumericKind::ALL.iter().map(|kind| kind.java_name()).collect();
    let simple = name.rsplit('.').next().unwrap_or(name);
    find_similar_name(simple, &candidates, (simple.len() / 3).max(1))
}

/// "did you mean" hint appended to an error message
pub fn format_suggestion_hint(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(name) => format!("\n  hint: did you mean `{name}`?"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("Long", "Long"), 0);
    }

    #[test]
    fn test_similar_name_ignores_case() {
        assert_eq!(find_similar_name("atomiclong", &["AtomicLong", "AtomicInteger"], 1), Some("AtomicLong"));
    }

    #[test]
    fn test_suggest_numeric_kind() {
        assert_eq!(suggest_numeric_kind("AtomicLonng"), Some("AtomicLong"));
        assert_eq!(suggest_numeric_kind("Interger"), Some("Integer"));
        assert_eq!(suggest_numeric_kind("java.math.BigDecimals"), Some("BigDecimal"));
        assert_eq!(suggest_numeric_kind("UUID"), None);
    }

    #[test]
    fn test_format_hint() {
        assert_eq!(format_suggestion_hint(Some("int")), "\n  hint: did you mean `int`?");
        assert_eq!(format_suggestion_hint(None), "");
    }
}
