//! Character reference decoding.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! The tokenizer hands text through verbatim; consumers decode it with
//! [`unescape`] when they need the character data.

use std::borrow::Cow;

use super::named_character_references::{LONGEST_LEGACY_NAME, lookup_entity};

/// U+FFFD REPLACEMENT CHARACTER
const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

/// Decode every character reference in `input`.
///
/// Unknown references are left as written. Returns the input unchanged
/// (borrowed) when it contains no `&`.
///
/// # Example
/// ```ignore
/// assert_eq!(unescape("Degraded&nbsp;Performance"), "Degraded\u{a0}Performance");
/// assert_eq!(unescape("&#x2713; done"), "\u{2713} done");
/// ```
#[must_use]
pub fn unescape(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let consumed = if let Some(numeric) = after.strip_prefix('#') {
            decode_numeric(numeric, &mut out).map(|n| n + 1)
        } else {
            decode_named(after, &mut out)
        };
        match consumed {
            Some(n) => rest = &after[n..],
            None => {
                // "Flush code points consumed as a character reference"
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
///
/// "Consume the maximum number of characters possible, where the consumed
/// characters are one of the identifiers in the named character references
/// table."
///
/// Returns the number of bytes consumed after the '&'.
fn decode_named(s: &str, out: &mut String) -> Option<usize> {
    let name_len = s.bytes().take_while(u8::is_ascii_alphanumeric).count();
    if name_len == 0 {
        return None;
    }

    // STEP 1: Full name terminated by a semicolon.
    if s[name_len..].starts_with(';')
        && let Some(replacement) = lookup_entity(&s[..=name_len])
    {
        out.push_str(replacement);
        return Some(name_len + 1);
    }

    // STEP 2: Longest legacy entity that is a prefix of the name.
    for len in (1..=name_len.min(LONGEST_LEGACY_NAME)).rev() {
        if let Some(replacement) = lookup_entity(&s[..len]) {
            out.push_str(replacement);
            return Some(len);
        }
    }
    None
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
///
/// `s` starts after the '#'. Returns the number of bytes consumed from `s`.
fn decode_numeric(s: &str, out: &mut String) -> Option<usize> {
    let (radix, prefix_len) = match s.as_bytes().first() {
        Some(b'x' | b'X') => (16, 1),
        _ => (10, 0),
    };
    let digits = &s[prefix_len..];
    let digit_len = digits
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();

    // "absence-of-digits-in-numeric-character-reference parse error"
    if digit_len == 0 {
        return None;
    }

    // Overflowing values are out of range just like values above U+10FFFF.
    let code = u32::from_str_radix(&digits[..digit_len], radix).unwrap_or(u32::MAX);
    out.push(numeric_reference_replacement(code));

    let terminated = digits[digit_len..].starts_with(';');
    Some(prefix_len + digit_len + usize::from(terminated))
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
fn numeric_reference_replacement(code: u32) -> char {
    match code {
        // "If the number is 0x00, then this is a null-character-reference parse error."
        // "If the number is greater than 0x10FFFF, then this is a
        // character-reference-outside-unicode-range parse error."
        0 | 0x11_0000..=u32::MAX => REPLACEMENT_CHARACTER,
        // "If the number is one of the numbers in the first column of the
        // following table, then find the row with that number in the first
        // column, and set the character reference code to the number in the
        // second column."
        0x80..=0x9F => windows_1252_replacement(code)
            .or_else(|| char::from_u32(code))
            .unwrap_or(REPLACEMENT_CHARACTER),
        // "If the number is a surrogate, then this is a surrogate-character-reference
        // parse error." from_u32 rejects surrogates.
        _ => char::from_u32(code).unwrap_or(REPLACEMENT_CHARACTER),
    }
}

const fn windows_1252_replacement(code: u32) -> Option<char> {
    let c = match code {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(unescape("Operational"), Cow::Borrowed("Operational")));
    }

    #[test]
    fn named_references() {
        assert_eq!(unescape("Degraded&nbsp;Performance"), "Degraded\u{a0}Performance");
        assert_eq!(unescape("AT&amp;T"), "AT&T");
        assert_eq!(unescape("&lt;b&gt;"), "<b>");
    }

    #[test]
    fn legacy_references_without_semicolon() {
        assert_eq!(unescape("AT&ampT"), "AT&T");
        assert_eq!(unescape("&copy 2024"), "\u{a9} 2024");
        // Longest legacy prefix wins; the remainder stays as text.
        assert_eq!(unescape("&notreal;"), "\u{ac}real;");
        assert_eq!(unescape("a&notb"), "a\u{ac}b");
        assert_eq!(unescape("&frac34s"), "\u{be}s");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("&ltx"), "<x");
    }

    #[test]
    fn references_across_the_full_table() {
        assert_eq!(unescape("&Ecirc;dge &oelig; &hyphen; &Ocirc;"), "\u{ca}dge \u{153} \u{2010} \u{d4}");
        assert_eq!(unescape("Degraded&ThinSpace;x"), "Degraded\u{2009}x");
        // Two code points
        assert_eq!(unescape("&NotEqualTilde;"), "\u{2242}\u{338}");
        // Names without a legacy form need the semicolon
        assert_eq!(unescape("&hyphen x"), "&hyphen x");
    }

    #[test]
    fn numeric_references() {
        assert_eq!(unescape("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(unescape("&#65 unterminated"), "A unterminated");
        assert_eq!(unescape("&#0;"), "\u{FFFD}");
        assert_eq!(unescape("&#xD800;"), "\u{FFFD}");
        assert_eq!(unescape("&#x110000;"), "\u{FFFD}");
        assert_eq!(unescape("&#99999999999999999999;"), "\u{FFFD}");
        assert_eq!(unescape("&#x80;"), "\u{20AC}");
        assert_eq!(unescape("&#x81;"), "\u{81}");
    }

    #[test]
    fn malformed_references_are_kept() {
        assert_eq!(unescape("a & b"), "a & b");
        assert_eq!(unescape("&#;"), "&#;");
        assert_eq!(unescape("&#x;"), "&#x;");
        assert_eq!(unescape("trailing &"), "trailing &");
    }
}
