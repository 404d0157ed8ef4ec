//! Character reference decoding and output escaping
//!
//! Decoding and escaping are inverses on everything the gate emits, which is
//! what makes sanitization idempotent.

mod named;

use named::{LEGACY_NAMES, MAX_LEGACY_LEN, MAX_NAME_LEN, NAMED_REFERENCES};

/// Longest numeric reference body considered, `#x0010FFFF` fits
const MAX_NUMERIC_LEN: usize = 12;

/// Where a reference appears; legacy names decode differently in attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Text,
    Attribute,
}

/// Decodes character references in text content
///
/// Handles every HTML named reference, decimal and hex numeric references,
/// and the legacy names browsers accept without a trailing `;`. Anything
/// else is kept literally. NUL and invalid code points become U+FFFD.
pub fn decode(input: &str) -> String {
    decode_in(input, Context::Text)
}

/// Decodes character references in an attribute value
///
/// Same as [`decode`], except a legacy name followed by an alphanumeric or
/// `=` is left alone, as browsers do inside attributes.
pub fn decode_attribute(input: &str) -> String {
    decode_in(input, Context::Attribute)
}

fn decode_in(input: &str, context: Context) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_reference(&tail[1..], context, &mut out) {
            Some(consumed) => rest = &tail[1 + consumed..],
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    if out.contains('\0') {
        out = out.replace('\0', "\u{FFFD}");
    }
    out
}

/// Decodes one reference from `body` (the text after `&`) into `out`
///
/// Returns the number of bytes of `body` consumed.
fn decode_reference(body: &str, context: Context, out: &mut String) -> Option<usize> {
    if let Some(numeric) = body.strip_prefix('#') {
        let (ch, consumed) = decode_numeric(numeric)?;
        out.push(ch);
        return Some(consumed + 1);
    }

    let bytes = body.as_bytes();
    let name_len = bytes
        .iter()
        .take(MAX_NAME_LEN + 1)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if name_len == 0 {
        return None;
    }

    if bytes.get(name_len) == Some(&b';') {
        if let Some(value) = lookup(&body[..name_len]) {
            out.push_str(value);
            return Some(name_len + 1);
        }
    }

    // Longest legacy name that prefixes the run
    for len in (2..=name_len.min(MAX_LEGACY_LEN)).rev() {
        let name = &body[..len];
        if LEGACY_NAMES.binary_search(&name).is_err() {
            continue;
        }
        let next = bytes.get(len).copied();
        if context == Context::Attribute
            && next.is_some_and(|b| b.is_ascii_alphanumeric() || b == b'=')
        {
            return None;
        }
        let value = lookup(name)?;
        out.push_str(value);
        return Some(len);
    }
    None
}

fn lookup(name: &str) -> Option<&'static str> {
    NAMED_REFERENCES
        .binary_search_by(|(candidate, _)| candidate.cmp(&name))
        .ok()
        .map(|index| NAMED_REFERENCES[index].1)
}

/// Decodes `digits;` or `xhex;` after `&#`; returns the char and bytes consumed
fn decode_numeric(numeric: &str) -> Option<(char, usize)> {
    let semi = numeric
        .char_indices()
        .take(MAX_NUMERIC_LEN + 1)
        .find(|&(_, c)| c == ';')
        .map(|(i, _)| i)?;
    let body = &numeric[..semi];

    let (digits, radix) = match body.strip_prefix('x').or_else(|| body.strip_prefix('X')) {
        Some(hex) => (hex, 16),
        None => (body, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let code_point = u32::from_str_radix(digits, radix).unwrap_or(u32::MAX);
    let ch = char::from_u32(code_point)
        .filter(|&c| c != '\0')
        .unwrap_or('\u{FFFD}');
    Some((ch, semi + 1))
}

/// Escapes text content: `& < >`
pub fn escape_text(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

/// Escapes a double-quoted attribute value: `& < > "`
pub fn escape_attribute(input: &str, out: &mut String) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
