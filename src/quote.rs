//! Quoted config values.
//!
//! A quoted value is a double-quoted run of characters where `"` and `\`
//! only appear escaped. Escapes are `\a \b \f \n \r \t \v \" \\`, three
//! octal digits, `\x` with two hex digits, `\u` with four and `\U` with
//! eight. Octal and `\x` escapes denote bytes; the decoded bytes must form
//! valid UTF-8.

/// Characters allowed in a plain (unquoted) value.
pub fn is_plain_char(c: char) -> bool {
    !(c.is_whitespace() || c.is_control() || matches!(c, '"' | '#' | '\'' | '=' | '\\'))
}

/// Whether `s` has to be quoted to survive a trip through a config file.
pub fn needs_quoting(s: &str) -> bool {
    s.is_empty() || !s.chars().all(is_plain_char)
}

/// Decode the quoted value at the start of `s`.
///
/// Returns the decoded text and the number of bytes consumed, including
/// both quotes, or `None` if `s` does not start with a well-formed quoted
/// value.
pub fn unquote(s: &str) -> Option<(String, usize)> {
    let mut chars = s.char_indices();
    if chars.next()?.1 != '"' {
        return None;
    }
    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                let text = String::from_utf8(out).ok()?;
                return Some((text, i + 1));
            }
            '\\' => {
                let (_, e) = chars.next()?;
                match e {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '"' | '\\' => out.push(e as u8),
                    '0'..='7' => {
                        let mut n = e.to_digit(8)?;
                        for _ in 0..2 {
                            n = n * 8 + chars.next()?.1.to_digit(8)?;
                        }
                        out.push(u8::try_from(n).ok()?);
                    }
                    'x' => out.push(u8::try_from(hex(&mut chars, 2)?).ok()?),
                    'u' | 'U' => {
                        let digits = if e == 'u' { 4 } else { 8 };
                        let c = char::from_u32(hex(&mut chars, digits)?)?;
                        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    }
                    _ => return None,
                }
            }
            c if c.is_control() => return None,
            c => out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes()),
        }
    }
    None
}

fn hex(chars: &mut std::str::CharIndices<'_>, digits: usize) -> Option<u32> {
    let mut n = 0u32;
    for _ in 0..digits {
        n = n * 16 + chars.next()?.1.to_digit(16)?;
    }
    Some(n)
}

/// Encode `s` as a quoted value that [`unquote`] turns back into `s`.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
