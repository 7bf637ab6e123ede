//! Slug generation: turns a post title into a URL-friendly identifier.
//!
//! Slugs are cosmetic. Post URLs carry the numeric id as well, so two posts
//! with the same title happily share a slug.

use unicode_normalization::UnicodeNormalization;

/// Maximum slug length, in characters.
pub const MAX_SLUG_LEN: usize = 100;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r')
}

/// Turn `title` into slug form.
///
/// Accents are decomposed and dropped, anything that is not an ASCII word
/// character, whitespace or a dash is removed, dashes and whitespace runs
/// collapse into single dashes, and the result is cut to [`MAX_SLUG_LEN`]
/// characters and lowercased.
///
/// ```
/// use wordless_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Crème Brûlée!"), "creme-brulee");
/// ```
pub fn slugify(title: &str) -> String {
    let cleaned: String = title
        .nfd()
        .filter(|&c| is_word_char(c) || is_space(c) || c == '-')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();

    cleaned
        .split(is_space)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(MAX_SLUG_LEN)
        .collect::<String>()
        .to_ascii_lowercase()
}
