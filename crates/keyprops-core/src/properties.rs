//! Reading and writing the Java `.properties` text format.
//!
//! Gradle loads `key.properties` with `java.util.Properties`, so the parser
//! follows the same lexical rules: `#`/`!` comments, `=`, `:` or whitespace
//! separators, backslash line continuations and `\uXXXX` escapes.
//! Parsing never fails; anything unrecognised is kept literally.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::str::Chars;

/// Whitespace as defined by the properties format (space, tab, form feed).
const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// Parses properties content into a key/value map.
///
/// A key that appears more than once keeps its last value.
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    logical_lines(content)
        .iter()
        .map(|line| split_key_value(line))
        .collect()
}

/// Decodes raw file bytes as ISO-8859-1.
///
/// This is the encoding `Properties.load(InputStream)` uses, so the result is
/// exactly what Gradle sees, even for files saved as UTF-8. A warning is logged
/// when the bytes are valid UTF-8 that reads differently.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let latin1: String = bytes.iter().copied().map(char::from).collect();

    if !bytes.is_ascii() && std::str::from_utf8(bytes).is_ok() {
        tracing::warn!(
            "Properties file has non-ASCII UTF-8 text, which Gradle reads as ISO-8859-1; \
             use \\uXXXX escapes for non-ASCII characters"
        );
    }

    latin1
}

/// Formats a single `key=value` line (without the trailing newline).
pub fn format_entry(key: &str, value: &str) -> String {
    format!("{}={}", escape(key, true), escape(value, false))
}

/// Joins physical lines into logical ones, dropping blanks and comments.
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut continuing = false;

    for raw in physical_lines(content) {
        let line = raw.trim_start_matches(WHITESPACE);

        if !continuing && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        if ends_with_continuation(line) {
            current.push_str(&line[..line.len() - 1]);
            continuing = true;
        } else {
            current.push_str(line);
            lines.push(std::mem::take(&mut current));
            continuing = false;
        }
    }

    if continuing && !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Splits on `\r\n`, `\r` and `\n`, the line terminators `Properties.load` accepts.
fn physical_lines(content: &str) -> impl Iterator<Item = &str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(end) => {
                let line = &rest[..end];
                let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + terminator..];
                Some(line)
            }
            None => Some(std::mem::take(&mut rest)),
        }
    })
}

/// A line continues when it ends with an odd number of backslashes.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Splits a logical line into its unescaped key and value.
fn split_key_value(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                has_separator = true;
                break;
            }
            ' ' | '\t' | '\x0c' => {
                key_end = i;
                value_start = i + 1;
                break;
            }
            _ => {}
        }
    }

    let mut rest = line[value_start..].trim_start_matches(WHITESPACE);
    if !has_separator {
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped.trim_start_matches(WHITESPACE);
        }
    }

    (unescape(&line[..key_end]), unescape(rest))
}

/// Decodes backslash escapes.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => match read_unicode_escape(&mut chars) {
                Some(decoded) => out.push(decoded),
                None => out.push_str("\\u"),
            },
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

/// Reads the four hex digits after `\u`, combining a surrogate pair when the
/// next escape completes it. Leaves `chars` untouched on failure.
fn read_unicode_escape(chars: &mut Chars<'_>) -> Option<char> {
    let mut lookahead = chars.clone();
    let unit = read_hex4(&mut lookahead)?;

    if let Some(decoded) = char::from_u32(u32::from(unit)) {
        *chars = lookahead;
        return Some(decoded);
    }

    if (0xD800..0xDC00).contains(&unit)
        && lookahead.next() == Some('\\')
        && lookahead.next() == Some('u')
    {
        let low = read_hex4(&mut lookahead)?;
        if let Some(Ok(decoded)) = char::decode_utf16([unit, low]).next() {
            *chars = lookahead;
            return Some(decoded);
        }
    }

    None
}

fn read_hex4(chars: &mut Chars<'_>) -> Option<u16> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(&hex, 16).ok()
}

/// Escapes a key or value so that `parse_properties` reads it back unchanged.
///
/// Keys escape every space; values only a leading one. Non-ASCII characters
/// are written as `\uXXXX` so the file stays readable as ISO-8859-1.
fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());

    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c < ' ' || c > '~' => {
                for unit in c.encode_utf16(&mut [0u16; 2]) {
                    let _ = write!(out, "\\u{:04X}", unit);
                }
            }
            c => out.push(c),
        }
    }

    out
}
