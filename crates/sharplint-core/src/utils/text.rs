//! Identifier and comment text helpers.

/// Uppercases the first character of `text`.
///
/// ```
/// use sharplint_core::utils::first_char_to_upper;
/// assert_eq!(first_char_to_upper("runAll"), "RunAll");
/// assert_eq!(first_char_to_upper(""), "");
/// ```
#[must_use]
pub fn first_char_to_upper(text: &str) -> String {
    map_first(text, char::to_uppercase)
}

/// Lowercases the first character of `text`.
#[must_use]
pub fn first_char_to_lower(text: &str) -> String {
    map_first(text, char::to_lowercase)
}

fn map_first<I>(text: &str, f: impl FnOnce(char) -> I) -> String
where
    I: Iterator<Item = char>,
{
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => f(first).chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces the first occurrence of `search` in `text` with `replace`.
///
/// ```
/// use sharplint_core::utils::replace_first;
/// assert_eq!(replace_first("// fix this", 'f', "F"), "// Fix this");
/// ```
#[must_use]
pub fn replace_first(text: &str, search: char, replace: &str) -> String {
    match text.find(search) {
        Some(at) => {
            let mut out = String::with_capacity(text.len() + replace.len());
            out.push_str(&text[..at]);
            out.push_str(replace);
            out.push_str(&text[at + search.len_utf8()..]);
            out
        }
        None => text.to_string(),
    }
}

/// Returns true if the first character is uppercase.
#[must_use]
pub fn starts_with_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

/// Returns true if the first character is a lowercase letter that has an
/// uppercase form. `ª` is lowercase but has none.
#[must_use]
pub fn starts_with_lowercase(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_lowercase() && !c.to_uppercase().eq([c]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_char_case() {
        assert_eq!(first_char_to_upper("count"), "Count");
        assert_eq!(first_char_to_lower("Count"), "count");
        assert_eq!(first_char_to_upper("_count"), "_count");
        assert_eq!(first_char_to_upper("ärger"), "Ärger");
    }

    #[test]
    fn test_replace_first() {
        assert_eq!(replace_first("a, b, a", 'a', "A"), "A, b, a");
        assert_eq!(replace_first("none", 'x', "y"), "none");
        assert_eq!(replace_first("// ßig", 'ß', "SS"), "// SSig");
    }

    #[test]
    fn test_starts_with() {
        assert!(starts_with_uppercase("Run"));
        assert!(!starts_with_uppercase("_Run"));
        assert!(starts_with_lowercase("run"));
        assert!(!starts_with_lowercase(""));
        assert!(!starts_with_lowercase("ªnote"));
    }
}
