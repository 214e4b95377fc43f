//! The values a [`Var`](crate::Var) can hold.
//!
//! Both parsers hand a Value the raw text after unquoting; the Value decodes
//! it or reports a [`ValueError`]. Numbers follow the C convention for base
//! prefixes, so `255`, `0377` and `0xff` are the same number.

use std::fmt;

use crate::error::ValueError;

const FALSEY: &[&str] = &["0", "false", "f", "off", "no", "n", "disabled"];
const TRUTHY: &[&str] = &["1", "true", "t", "on", "yes", "y", "enabled"];

type Setter = Box<dyn FnMut(&str) -> Result<(), ValueError>>;

/// A typed setting value.
///
/// The built-in variants store their decoded value and can be read back
/// through [`Registry`](crate::Registry) accessors. [`Value::custom`] wraps
/// caller logic; the closure keeps whatever state it needs.
pub enum Value {
    Text(String),
    Bool(bool),
    Int(i64),
    Uint(u64),
    Custom {
        setter: Setter,
        /// Last input the setter accepted.
        last: Option<String>,
    },
}

impl Value {
    pub fn text(default: impl Into<String>) -> Self {
        Self::Text(default.into())
    }

    pub const fn bool(default: bool) -> Self {
        Self::Bool(default)
    }

    pub const fn int(default: i64) -> Self {
        Self::Int(default)
    }

    pub const fn uint(default: u64) -> Self {
        Self::Uint(default)
    }

    /// Wrap a closure that validates and stores the raw text itself.
    ///
    /// ```
    /// use conflag::{Value, ValueError};
    ///
    /// let mut port = Value::custom(|s| match s.parse::<u16>() {
    ///     Ok(p) if p != 0 => Ok(()),
    ///     _ => Err(ValueError::invalid("not a port")),
    /// });
    /// assert!(port.set("8080").is_ok());
    /// assert!(port.set("0").is_err());
    /// ```
    pub fn custom<F>(setter: F) -> Self
    where
        F: FnMut(&str) -> Result<(), ValueError> + 'static,
    {
        Self::Custom {
            setter: Box::new(setter),
            last: None,
        }
    }

    /// Decode `raw` and store it. On error the previous value is kept.
    pub fn set(&mut self, raw: &str) -> Result<(), ValueError> {
        match self {
            Self::Text(v) => {
                raw.clone_into(v);
            }
            Self::Bool(v) => *v = parse_bool(raw)?,
            Self::Int(v) => *v = parse_i64(raw)?,
            Self::Uint(v) => *v = parse_u64(raw)?,
            Self::Custom { setter, last } => {
                setter(raw)?;
                *last = Some(raw.to_owned());
            }
        }
        Ok(())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Text that would set this value to what it holds now, if any.
    ///
    /// `None` only for a custom value that never accepted input.
    pub fn to_raw(&self) -> Option<String> {
        match self {
            Self::Custom { last, .. } => last.clone(),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            Self::Custom { last, .. } => f.write_str(last.as_deref().unwrap_or_default()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Self::Custom { last, .. } => f
                .debug_struct("Custom")
                .field("last", last)
                .finish_non_exhaustive(),
        }
    }
}

/// Case-insensitive boolean synonyms.
pub fn parse_bool(s: &str) -> Result<bool, ValueError> {
    let matches = |list: &[&str]| list.iter().any(|w| w.eq_ignore_ascii_case(s));
    if matches(FALSEY) {
        Ok(false)
    } else if matches(TRUTHY) {
        Ok(true)
    } else {
        Err(ValueError::Syntax)
    }
}

/// Signed integer with optional sign and C base prefix.
pub fn parse_i64(s: &str) -> Result<i64, ValueError> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = parse_magnitude(digits)?;
    if negative {
        if magnitude > i64::MIN.unsigned_abs() {
            return Err(ValueError::Range);
        }
        Ok(0i64.wrapping_sub_unsigned(magnitude))
    } else {
        i64::try_from(magnitude).map_err(|_| ValueError::Range)
    }
}

/// Unsigned integer with C base prefix. A well-formed negative number is out
/// of range rather than malformed.
pub fn parse_u64(s: &str) -> Result<u64, ValueError> {
    if let Some(digits) = s.strip_prefix('-') {
        return match parse_magnitude(digits)? {
            0 => Ok(0),
            _ => Err(ValueError::Range),
        };
    }
    parse_magnitude(s)
}

fn parse_magnitude(s: &str) -> Result<u64, ValueError> {
    let (radix, digits) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (16, hex)
    } else if s.len() > 1 && s.starts_with('0') {
        (8, &s[1..])
    } else {
        (10, s)
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ValueError::Syntax);
    }
    u64::from_str_radix(digits, radix).map_err(|_| ValueError::Range)
}
