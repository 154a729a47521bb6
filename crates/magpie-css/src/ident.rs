//! CSS identifier escaping.
//!
//! Class names and ids taken from a document are arbitrary strings; before
//! they can appear in a selector they must be serialized as CSS identifiers
//! per [§ 2.1 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization).
//! Identifiers that already satisfy the identifier grammar pass through
//! unchanged, so escaping is a no-op on well-behaved names.

use std::fmt::Write;

/// Whether `s` is a bare CSS identifier needing no escapes.
///
/// The accepted grammar is `-?[A-Za-z_][A-Za-z0-9_-]*`: an optional leading
/// hyphen, an ASCII letter or underscore, then ASCII letters, digits,
/// underscores, and hyphens.
#[must_use]
pub fn is_bare_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(mut first) = chars.next() else {
        return false;
    };
    if first == '-' {
        match chars.next() {
            Some(c) => first = c,
            None => return false,
        }
    }
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A code point that may appear unescaped inside an identifier.
///
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
/// extended with everything at or above U+00A0, which serializers pass
/// through verbatim.
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || c >= '\u{A0}'
}

/// Whether the first character must be escaped even when it is otherwise an
/// identifier character: identifiers may not begin with a digit, nor with a
/// hyphen followed by a digit or another hyphen.
fn must_escape_first(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('-') => matches!(chars.next(), Some(c) if c.is_ascii_digit() || c == '-'),
        _ => false,
    }
}

/// Escape a string so it can be used as a CSS identifier.
///
/// Bare identifiers are returned unchanged. Otherwise each character outside
/// the identifier set with a code point below U+00A0 is emitted as `\` plus
/// the two-digit lowercase hex of its code point, followed by a space unless
/// it is the last character of the string. The first character is
/// force-escaped when the string begins with a digit or with `-` followed by
/// a digit or `-`:
///
/// ```
/// use magpie_css::ident::escape_identifier;
///
/// assert_eq!(escape_identifier("about"), "about");
/// assert_eq!(escape_identifier("1st"), "\\31 st");
/// assert_eq!(escape_identifier("a.b"), "a\\2e b");
/// ```
#[must_use]
pub fn escape_identifier(ident: &str) -> String {
    if is_bare_identifier(ident) {
        return ident.to_string();
    }

    let escape_first = must_escape_first(ident);
    let last = ident.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(ident.len());
    for (i, c) in ident.chars().enumerate() {
        if (i == 0 && escape_first) || !is_ident_char(c) {
            // Infallible on String.
            let _ = write!(out, "\\{:02x}", u32::from(c));
            if i != last {
                out.push(' ');
            }
        } else {
            out.push(c);
        }
    }
    out
}
