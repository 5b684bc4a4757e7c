//! Character-level classification and case folding for Cyrillic/Latin text.
//!
//! Case mappings that expand to more than one char (e.g. `İ` → `i̇`) are treated
//! as caseless so that folded and original text always have the same length.

fn maps_to_self(mut mapped: impl Iterator<Item = char>, c: char) -> bool {
    mapped.next() == Some(c) && mapped.next().is_none()
}

fn single(mut mapped: impl Iterator<Item = char>, c: char) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(m), None) => m,
        _ => c,
    }
}

/// Lowercase a single char, keeping it as-is when the mapping is not 1:1.
pub fn fold_lower(c: char) -> char {
    single(c.to_lowercase(), c)
}

/// Uppercase a single char, keeping it as-is when the mapping is not 1:1.
pub fn fold_upper(c: char) -> char {
    single(c.to_uppercase(), c)
}

/// A char is uppercase when uppercasing keeps it and lowercasing changes it.
pub fn is_upper(c: char) -> bool {
    maps_to_self(c.to_uppercase(), c) && !maps_to_self(c.to_lowercase(), c)
}

pub fn is_lower(c: char) -> bool {
    maps_to_self(c.to_lowercase(), c) && !maps_to_self(c.to_uppercase(), c)
}

/// Lowercase Cyrillic letter of the Russian alphabet (а..я plus ё).
pub fn is_cyrillic_lower(c: char) -> bool {
    ('а'..='я').contains(&c) || c == 'ё'
}

/// Russian Cyrillic letter in either case.
pub fn is_cyrillic(c: char) -> bool {
    is_cyrillic_lower(fold_lower(c))
}

/// ASCII Latin letter or Russian Cyrillic letter.
pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || ('А'..='я').contains(&c) || c == 'ё' || c == 'Ё'
}

/// Chars that open (or continue) a literal run: Latin letters, after folding,
/// and the bare apostrophe.
pub fn is_literal(c: char) -> bool {
    let lower = fold_lower(c);
    lower.is_ascii_lowercase() || lower == '\''
}

/// A string is lowercase when folding it to lowercase changes nothing.
pub fn is_all_lower(chars: &[char]) -> bool {
    chars.iter().all(|&c| fold_lower(c) == c)
}

pub fn is_all_upper(chars: &[char]) -> bool {
    chars.iter().all(|&c| fold_upper(c) == c)
}

/// Uppercase the first char and lowercase the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}
