//! Literal decoding
//!
//! Turns Go literal source text into [`LiteralValue`]s. Text that cannot be
//! decoded (overflowing integers, invalid escapes) comes back as `None` and
//! the caller keeps it as a raw literal.

use crate::features::cpg::{LiteralValue, Type};
use crate::features::parsing::domain::LitKind;

/// Decode one basic literal and give its default type
pub fn decode_literal(kind: LitKind, text: &str) -> (LiteralValue, Type) {
    let raw = || LiteralValue::Raw(text.to_string());
    match kind {
        LitKind::Int => (
            parse_int(text).map(LiteralValue::Int).unwrap_or_else(raw),
            Type::primitive("int"),
        ),
        LitKind::Float => (
            parse_float(text).map(LiteralValue::Float).unwrap_or_else(raw),
            Type::primitive("float64"),
        ),
        LitKind::Imag => (
            LiteralValue::Imaginary(text.to_string()),
            Type::primitive("complex128"),
        ),
        LitKind::Rune => (
            decode_rune(text).map(LiteralValue::Rune).unwrap_or_else(raw),
            Type::primitive("rune"),
        ),
        LitKind::String => (
            decode_string(text).map(LiteralValue::String).unwrap_or_else(raw),
            Type::primitive("string"),
        ),
    }
}

/// Integer literal in any Go base, with `_` separators
pub fn parse_int(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    let (radix, body) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };
    if body.is_empty() {
        return None;
    }
    u64::from_str_radix(body, radix).ok()
}

/// Decimal or hexadecimal (`0x1.8p3`) floating-point literal
pub fn parse_float(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(|&c| c != '_').collect();
    let lower = digits.to_ascii_lowercase();
    match lower.strip_prefix("0x") {
        Some(hex) => parse_hex_float(hex),
        None => lower.parse().ok(),
    }
}

fn parse_hex_float(hex: &str) -> Option<f64> {
    let (mantissa, exponent) = match hex.split_once('p') {
        Some((m, e)) => (m, e.parse::<i32>().ok()?),
        None => (hex, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let mut value = 0f64;
    for c in int_part.chars() {
        value = value * 16.0 + c.to_digit(16)? as f64;
    }
    let mut scale = 1.0 / 16.0;
    for c in frac_part.chars() {
        value += c.to_digit(16)? as f64 * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exponent))
}

/// `'a'`, `'\n'`, `'\u00e9'`
pub fn decode_rune(text: &str) -> Option<char> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    let bytes = unescape(inner, '\'')?;
    let decoded = String::from_utf8(bytes).ok()?;
    let mut chars = decoded.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(c)
}

/// Interpreted (`"..."`) or raw (`` `...` ``) string literal
pub fn decode_string(text: &str) -> Option<String> {
    if let Some(raw) = text.strip_prefix('`').and_then(|t| t.strip_suffix('`')) {
        return Some(raw.replace('\r', ""));
    }
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let bytes = unescape(inner, '"')?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Resolve Go escape sequences into bytes; `\x` and octal escapes are raw bytes
fn unescape(inner: &str, quote: char) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        let escaped = chars.next()?;
        let simple = match escaped {
            'a' => Some(0x07),
            'b' => Some(0x08),
            'f' => Some(0x0c),
            'n' => Some(b'\n'),
            'r' => Some(b'\r'),
            't' => Some(b'\t'),
            'v' => Some(0x0b),
            '\\' => Some(b'\\'),
            c if c == quote => Some(c as u8),
            _ => None,
        };
        if let Some(byte) = simple {
            out.push(byte);
            continue;
        }
        match escaped {
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                out.push(u8::from_str_radix(&hex, 16).ok()?);
            }
            'u' | 'U' => {
                let len = if escaped == 'u' { 4 } else { 8 };
                let hex: String = (0..len).filter_map(|_| chars.next()).collect();
                if hex.len() != len {
                    return None;
                }
                let c = char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            '0'..='7' => {
                let mut octal = escaped.to_string();
                for _ in 0..2 {
                    octal.push(chars.next()?);
                }
                let value = u16::from_str_radix(&octal, 8).ok()?;
                out.push(u8::try_from(value).ok()?);
            }
            _ => return None,
        }
    }
    Some(out)
}
