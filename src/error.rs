use std::fmt;

use thiserror::Error;

/// Error returned by a [`Value`](crate::Value) that rejects its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("syntax error")]
    Syntax,

    #[error("value out of range")]
    Range,

    /// Message from a caller-supplied setter.
    #[error("{0}")]
    Invalid(String),
}

impl ValueError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// What went wrong on a config file line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("syntax error")]
    Syntax,

    #[error("line too long")]
    LineTooLong,

    #[error("unknown variable")]
    UnknownVariable,

    #[error("already defined")]
    AlreadyDefined,

    #[error("required but not set")]
    RequiredNotSet,

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// A config file error, with enough context to point at the offending line.
///
/// Renders as `file:line: ident: message`. The line is omitted when it is 0
/// (the end-of-file required check), the identifier when it is empty. The raw
/// value is kept for callers but never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// File name, or `"stdin"`.
    pub file: String,
    /// 1-based line number, or 0.
    pub line: usize,
    /// Identifier, if one was read.
    pub ident: String,
    /// Value as it appears in the input, possibly quoted.
    pub value: String,
    pub kind: ParseErrorKind,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.file)?;
        if self.line != 0 {
            write!(f, "{}:", self.line)?;
        }
        if !self.ident.is_empty() {
            write!(f, " {}:", self.ident)?;
        }
        write!(f, " {}", self.kind)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Value(e) => Some(e),
            _ => None,
        }
    }
}

/// What went wrong with a command-line flag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagErrorKind {
    #[error("illegal option")]
    IllegalOption,

    #[error("option requires an argument")]
    MissingArgument,

    #[error("junk at end of option")]
    JunkAtEnd,

    #[error("option already set")]
    AlreadySet,

    #[error(transparent)]
    Value(#[from] ValueError),
}

/// A command-line error.
///
/// Renders as `message -- token`, where the token is the offending value if
/// there is one, else the long name, else the short flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagError {
    pub flag: Option<char>,
    pub long: String,
    pub value: String,
    pub kind: FlagErrorKind,
}

impl FlagError {
    pub(crate) fn new(flag: Option<char>, long: &str, value: &str, kind: FlagErrorKind) -> Self {
        Self {
            flag,
            long: long.to_owned(),
            value: value.to_owned(),
            kind,
        }
    }

    /// The token shown after ` -- `.
    pub fn token(&self) -> String {
        if !self.value.is_empty() {
            self.value.clone()
        } else if !self.long.is_empty() {
            self.long.clone()
        } else {
            self.flag.map(String::from).unwrap_or_default()
        }
    }
}

impl fmt::Display for FlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -- {}", self.kind, self.token())
    }
}

impl std::error::Error for FlagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            FlagErrorKind::Value(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Flag(#[from] FlagError),

    /// Read or open failure, passed through untouched.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error(line: usize, ident: &str, kind: ParseErrorKind) -> ParseError {
        ParseError {
            file: "app.conf".into(),
            line,
            ident: ident.into(),
            value: String::new(),
            kind,
        }
    }

    #[test]
    fn parse_error_with_ident() {
        let err = parse_error(3, "port", ParseErrorKind::UnknownVariable);
        assert_eq!(err.to_string(), "app.conf:3: port: unknown variable");
    }

    #[test]
    fn parse_error_without_ident() {
        let err = parse_error(7, "", ParseErrorKind::LineTooLong);
        assert_eq!(err.to_string(), "app.conf:7: line too long");
    }

    #[test]
    fn required_error_omits_line() {
        let err = parse_error(0, "key", ParseErrorKind::RequiredNotSet);
        assert_eq!(err.to_string(), "app.conf: key: required but not set");
    }

    #[test]
    fn parse_error_never_shows_raw_value() {
        let mut err = parse_error(1, "n", ValueError::Range.into());
        err.value = "\"secret\"".into();
        assert_eq!(err.to_string(), "app.conf:1: n: value out of range");
    }

    #[test]
    fn flag_error_prefers_value() {
        let err = FlagError::new(
            Some('n'),
            "number",
            "abc",
            ValueError::Syntax.into(),
        );
        assert_eq!(err.to_string(), "syntax error -- abc");
    }

    #[test]
    fn flag_error_falls_back_to_long_then_flag() {
        let err = FlagError::new(None, "verbose", "", FlagErrorKind::JunkAtEnd);
        assert_eq!(err.to_string(), "junk at end of option -- verbose");

        let err = FlagError::new(Some('x'), "", "", FlagErrorKind::IllegalOption);
        assert_eq!(err.to_string(), "illegal option -- x");
    }

    #[test]
    fn io_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = Error::from(io);
        assert_eq!(err.to_string(), "no such file");
        assert!(matches!(err, Error::Io(_)));
    }
}
