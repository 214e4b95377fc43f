//! Config file parser.
//!
//! Reads the stream line by line, splits each line into an identifier and a
//! plain or quoted value, and hands the decoded value to the matching
//! [`Var`](crate::Var). Parsing stops at the first error.

use std::io::{self, BufRead};

use tracing::{debug, trace};

use crate::error::{Error, ParseError, ParseErrorKind};
use crate::quote::{is_plain_char, unquote};
use crate::registry::Registry;

/// Longest accepted line, not counting the line terminator.
pub const MAX_LINE: usize = 4096;

enum Line {
    Text,
    TooLong,
    Eof,
}

/// Per-line parse state that ends up in error records.
struct Parser<'a> {
    file: &'a str,
    line: usize,
    ident: String,
    value: String,
}

impl Parser<'_> {
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            file: self.file.to_owned(),
            line: self.line,
            ident: self.ident.clone(),
            value: self.value.clone(),
            kind,
        }
    }

    fn parse_line(&mut self, line: &str, registry: &mut Registry) -> Result<(), ParseError> {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let ident_len = ident_len(line);
        self.ident = line[..ident_len].to_owned();
        let rest = line[ident_len..].trim_start();
        let Some(rest) = rest.strip_prefix('=').filter(|_| ident_len > 0) else {
            return Err(self.error(ParseErrorKind::Syntax));
        };
        let rest = rest.trim_start();

        let plain_len = rest
            .char_indices()
            .find(|&(_, c)| !is_plain_char(c))
            .map_or(rest.len(), |(i, _)| i);
        let (decoded, consumed) = if plain_len > 0 {
            (rest[..plain_len].to_owned(), plain_len)
        } else {
            match unquote(rest) {
                Some(found) => found,
                None => {
                    self.value = rest.to_owned();
                    return Err(self.error(ParseErrorKind::Syntax));
                }
            }
        };
        self.value = rest[..consumed].to_owned();

        let tail = rest[consumed..].trim_start();
        if !tail.is_empty() && !tail.starts_with('#') {
            return Err(self.error(ParseErrorKind::Syntax));
        }

        self.assign(&decoded, registry)
    }

    fn assign(&self, decoded: &str, registry: &mut Registry) -> Result<(), ParseError> {
        let Some(id) = registry.by_name(&self.ident) else {
            return Err(self.error(ParseErrorKind::UnknownVariable));
        };
        let var = registry.var_mut(id);
        let marks = var.marks();
        if marks.file {
            return Err(self.error(ParseErrorKind::AlreadyDefined));
        }
        if marks.cli {
            trace!(file = self.file, line = self.line, ident = %self.ident, "kept command-line value");
        } else {
            var.value_mut()
                .set(decoded)
                .map_err(|e| self.error(e.into()))?;
            debug!(file = self.file, line = self.line, ident = %self.ident, "assigned");
        }
        var.mark_file();
        Ok(())
    }
}

fn ident_len(s: &str) -> usize {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'-' || b == b'_' => {}
        _ => return 0,
    }
    1 + bytes
        .take_while(|&b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        .count()
}

/// Read one `[CR]LF`-terminated line into `buf`, without the terminator.
///
/// Stops buffering once the line is known to be too long; the remainder of
/// that line is left unread.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Line> {
    buf.clear();
    loop {
        let (done, used) = {
            let available = match reader.fill_buf() {
                Ok(b) => b,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                if buf.is_empty() {
                    return Ok(Line::Eof);
                }
                break;
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    buf.extend_from_slice(&available[..i]);
                    (true, i + 1)
                }
                None => {
                    buf.extend_from_slice(available);
                    (false, available.len())
                }
            }
        };
        reader.consume(used);
        if done {
            break;
        }
        // One extra byte for a CR that may precede the LF.
        if buf.len() > MAX_LINE + 1 {
            return Ok(Line::TooLong);
        }
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    if buf.len() > MAX_LINE {
        return Ok(Line::TooLong);
    }
    Ok(Line::Text)
}

/// Parse a config file from `reader` into `registry`.
///
/// `filename` labels errors; empty means `"stdin"`. Returns the first
/// [`ParseError`] met, or the reader's I/O error unchanged.
///
/// A Var already set from the command line keeps its value: the assignment
/// is skipped but still counts for the required check. Assigning the same
/// identifier twice in one file is an error. After the last line every
/// required Var must have been set from some source.
///
/// Decoding happens before the Var sees the text, so `"\x32\u0033"` sets a
/// number Var exactly like the plain `23`.
///
/// ```
/// use conflag::{Registry, Value, Var, conf};
///
/// let mut reg = Registry::new();
/// let addr = reg.add(Var::new(Value::text("")).name("ipv6-addr"));
/// conf::parse("ipv6-addr = [::1]:23  # no quotes\n".as_bytes(), "app.conf", &mut reg)?;
/// assert_eq!(reg.text(addr), Some("[::1]:23"));
/// # Ok::<(), conflag::Error>(())
/// ```
pub fn parse<R: BufRead>(mut reader: R, filename: &str, registry: &mut Registry) -> Result<(), Error> {
    let file = if filename.is_empty() { "stdin" } else { filename };
    let mut parser = Parser {
        file,
        line: 0,
        ident: String::new(),
        value: String::new(),
    };
    let mut buf = Vec::with_capacity(MAX_LINE);
    loop {
        parser.line += 1;
        parser.ident.clear();
        parser.value.clear();
        match read_line(&mut reader, &mut buf)? {
            Line::Eof => break,
            Line::TooLong => return Err(parser.error(ParseErrorKind::LineTooLong).into()),
            Line::Text => {}
        }
        let Ok(text) = std::str::from_utf8(&buf) else {
            return Err(parser.error(ParseErrorKind::Syntax).into());
        };
        parser.parse_line(text, registry)?;
    }
    registry.check_required(file)?;
    Ok(())
}
