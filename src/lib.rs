//! Typed settings from simple config files and getopt-style command lines.
//! Declare your settings once, then fill them from either source.
//!
//! ```ignore
//! let mut reg = Registry::new();
//! let conf = reg.add(Var::new(Value::text("example.conf")).flag('c'));
//! let port = reg.add(Var::new(Value::uint(8080)).flag('p').name("port"));
//!
//! let rest = Loader::new(&mut reg)
//!     .dialect(Dialect::Gnu)
//!     .file_from(conf)
//!     .load()?;
//! let port = reg.uint(port);
//! ```
//!
//! That call parses `-c FILE`, `-p N` and `--port=N` from the process
//! arguments, then reads `port = N` from the config file, keeping whatever
//! the command line already set.
//!
//! # Settings
//!
//! A [`Var`] describes one setting: an optional short flag, an optional long
//! name (which doubles as the config file identifier), the [`Value`] it
//! controls, how it takes an argument ([`Kind`]), and whether it is
//! required. Vars live in a [`Registry`] and are addressed by [`VarId`].
//!
//! Values are a closed set: text, boolean, signed and unsigned 64-bit
//! integers, and a custom variant wrapping a closure for anything else.
//! Booleans accept `0 false f off no n disabled` and `1 true t on yes y
//! enabled`, in any case. Integers take C-style base prefixes, so `255`,
//! `0377` and `0xff` are equal.
//!
//! Each Var remembers separately whether the file and the command line have
//! set it. Each source may set a Var once. The file never overwrites a
//! command-line value, and either source satisfies `required`.
//!
//! # Config files
//!
//! [`conf::parse`] reads UTF-8 lines of at most 4096 bytes, ending in LF or
//! CR LF:
//!
//! ```text
//! ipv6-addr = [::1]:23         # no quotes needed
//! file      = /etc/passwd      # comments after settings are fine
//! --        = "hello, world\n" # identifiers can be odd
//! ```
//!
//! Identifiers match `[-_A-Za-z][-_A-Za-z0-9]*`. Plain values are any run of
//! characters other than whitespace, control characters and `" # ' = \`.
//! Anything else goes in double quotes with C escapes (`\n`, `\t`, `\"`,
//! `\\`, `\101`, `\x41`, `\u00e9`, `\U0001F600`, ...). Quoted values may be
//! empty; plain ones may not. Whitespace between tokens is ignored, and `#`
//! starts a comment.
//!
//! Parsing stops at the first problem: bad syntax, an unknown identifier, an
//! identifier assigned twice, a value the Var rejects, or a line that is too
//! long. Once the whole file is read, every required Var must have been set.
//!
//! # Command lines
//!
//! [`getopt::parse`] implements three dialects with one tokenizer:
//!
//! - [`Dialect::Traditional`]: `-nhparam` clusters of short flags.
//! - [`Dialect::Gnu`]: the same, plus `--name` and `--name=value`.
//! - [`Dialect::X11`]: `-name` to set, `+name` to clear, names only.
//!
//! Processing stops at `--` (dropped), `-`, or the first argument that is
//! not a flag. What remains is returned for the caller, e.g. as input file
//! names. A [`Kind::LineArg`] flag also stops processing, leaving everything
//! after it to the caller.
//!
//! # Errors
//!
//! Config file errors render as `file:line: ident: message` and command-line
//! errors as `message -- token`, ready to show to the user. I/O errors are
//! passed through unchanged. See [`error`] for the full set.
//!
//! # Logging
//!
//! Assignments, flags and loader decisions are reported as `tracing` events
//! at debug and trace level. Install a subscriber to see them.

pub mod conf;
pub mod error;
pub mod file;
pub mod getopt;
pub mod quote;
pub mod template;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod registry;
mod value;

pub use builder::Loader;
#[cfg(feature = "clap")]
pub use cli::{command, usage};
pub use error::{Error, FlagError, FlagErrorKind, ParseError, ParseErrorKind, ValueError};
pub use getopt::{getopt, getopt_long, getopt_long_only};
pub use registry::{Marks, Registry, Var};
pub use types::{Dialect, Kind, SearchPath, VarId};
pub use value::Value;
