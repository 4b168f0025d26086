//! Decoding of literal source text: string escapes, template cooking, JSX
//! entities and numeric literals.

/// Decodes the escape sequences of a string or template body. Returns `None`
/// for a malformed escape, which templates report as a `null` cooked value.
pub(crate) fn unescape(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\r' {
            // Line terminators normalize to \n in cooked template text.
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
            continue;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = chars.next()?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|c| c.is_ascii_digit()) => out.push('\0'),
            '1'..='7' | '0' => {
                let mut value = escaped.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) if value * 8 + digit <= 0o377 => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        _ => break,
                    }
                }
                out.push(char::from_u32(value)?);
            }
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return None;
                }
                out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
            }
            'u' => {
                let code = if chars.peek() == Some(&'{') {
                    chars.next();
                    let hex: String = chars.by_ref().take_while(|c| *c != '}').collect();
                    u32::from_str_radix(&hex, 16).ok()?
                } else {
                    let hex: String = chars.by_ref().take(4).collect();
                    if hex.len() != 4 {
                        return None;
                    }
                    u32::from_str_radix(&hex, 16).ok()?
                };
                push_code_unit(&mut out, code, &mut chars)?;
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    Some(out)
}

/// Pushes a UTF-16 code unit, pairing a high surrogate with a following
/// `\uXXXX` low surrogate when present.
fn push_code_unit(
    out: &mut String,
    code: u32,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Option<()> {
    if (0xD800..0xDC00).contains(&code) {
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
            let hex: String = lookahead.by_ref().take(4).collect();
            if let Ok(low) = u32::from_str_radix(&hex, 16) {
                if (0xDC00..0xE000).contains(&low) {
                    *chars = lookahead;
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(combined)?);
                    return Some(());
                }
            }
        }
        out.push('\u{FFFD}');
        return Some(());
    }
    if (0xDC00..0xE000).contains(&code) {
        out.push('\u{FFFD}');
        return Some(());
    }
    out.push(char::from_u32(code)?);
    Some(())
}

/// Value of a quoted string literal, given its raw text including quotes.
pub(crate) fn string_value(raw: &str) -> String {
    let inner = raw
        .get(1..raw.len().saturating_sub(1))
        .unwrap_or_default();
    unescape(inner).unwrap_or_else(|| inner.to_string())
}

/// Numeric value of a numeric literal's raw text.
pub(crate) fn number_value(raw: &str) -> f64 {
    let clean: String = raw.chars().filter(|c| *c != '_').collect();
    let lower = clean.to_ascii_lowercase();
    let radix = |digits: &str, radix: u32| {
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0f64, |acc, d| acc * radix as f64 + d as f64)
    };
    if let Some(hex) = lower.strip_prefix("0x") {
        return radix(hex, 16);
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return radix(oct, 8);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return radix(bin, 2);
    }
    let legacy_octal = lower.len() > 1
        && lower.starts_with('0')
        && lower.chars().all(|c| c.is_ascii_digit())
        && lower.chars().all(|c| c < '8');
    if legacy_octal {
        return radix(&lower[1..], 8);
    }
    lower.parse().unwrap_or(f64::NAN)
}

/// Digits of a bigint literal without the `n` suffix and separators.
pub(crate) fn bigint_value(raw: &str) -> String {
    raw.trim_end_matches('n')
        .chars()
        .filter(|c| *c != '_')
        .collect()
}

const JSX_ENTITIES: &[(&str, char)] = &[
    ("quot", '"'),
    ("amp", '&'),
    ("apos", '\''),
    ("lt", '<'),
    ("gt", '>'),
    ("nbsp", '\u{A0}'),
    ("iexcl", '¡'),
    ("cent", '¢'),
    ("pound", '£'),
    ("yen", '¥'),
    ("sect", '§'),
    ("copy", '©'),
    ("laquo", '«'),
    ("reg", '®'),
    ("deg", '°'),
    ("plusmn", '±'),
    ("middot", '·'),
    ("raquo", '»'),
    ("times", '×'),
    ("divide", '÷'),
    ("ndash", '–'),
    ("mdash", '—'),
    ("lsquo", '‘'),
    ("rsquo", '’'),
    ("ldquo", '“'),
    ("rdquo", '”'),
    ("bull", '•'),
    ("hellip", '…'),
    ("euro", '€'),
    ("trade", '™'),
    ("larr", '←'),
    ("rarr", '→'),
    ("hearts", '♥'),
];

/// Decodes HTML character references in JSX text and attribute strings.
pub(crate) fn decode_jsx_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after.find(';').filter(|end| *end <= 10).and_then(|end| {
            let name = &after[..end];
            let c = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                JSX_ENTITIES
                    .iter()
                    .find(|(entity, _)| *entity == name)
                    .map(|(_, c)| *c)
            };
            c.map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_escapes() {
        assert_eq!(unescape(r"a\nb\tc").as_deref(), Some("a\nb\tc"));
        assert_eq!(unescape(r"\x41B\u{43}").as_deref(), Some("ABC"));
        assert_eq!(unescape(r"\'\q").as_deref(), Some("'q"));
    }

    #[test]
    fn surrogate_pairs_combine() {
        assert_eq!(unescape(r"\uD83D\uDE00").as_deref(), Some("😀"));
    }

    #[test]
    fn line_continuation_is_dropped() {
        assert_eq!(unescape("a\\\nb").as_deref(), Some("ab"));
    }

    #[test]
    fn malformed_escape_is_none() {
        assert_eq!(unescape(r"\u{zz}"), None);
        assert_eq!(unescape(r"\x4"), None);
    }

    #[test]
    fn string_values_strip_quotes() {
        assert_eq!(string_value("'it\\'s'"), "it's");
        assert_eq!(string_value("\"\""), "");
    }

    #[test]
    fn numeric_values() {
        assert_eq!(number_value("42"), 42.0);
        assert_eq!(number_value("0x1F"), 31.0);
        assert_eq!(number_value("0b101"), 5.0);
        assert_eq!(number_value("1_000"), 1000.0);
        assert_eq!(number_value("1.5e3"), 1500.0);
        assert_eq!(number_value("017"), 15.0);
        assert_eq!(number_value(".5"), 0.5);
    }

    #[test]
    fn bigint_digits() {
        assert_eq!(bigint_value("1_000n"), "1000");
    }

    #[test]
    fn jsx_entities() {
        assert_eq!(decode_jsx_entities("a &amp; b"), "a & b");
        assert_eq!(decode_jsx_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_jsx_entities("&unknown; &"), "&unknown; &");
    }
}
