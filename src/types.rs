use std::path::PathBuf;

/// How a flag consumes its argument on the command line.
///
/// The configuration-file parser ignores the kind: every file assignment
/// carries a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Kind {
    /// The flag takes a value, either attached (`-hvalue`, `--long=value`)
    /// or as the next argument.
    #[default]
    HasArg,
    /// The flag takes no value. Its Value receives `"true"`, or `"false"`
    /// for `+name` in the X11 dialect.
    NoArg,
    /// The flag receives `""` and ends command-line processing. The
    /// arguments after it are left in the residual list for the caller.
    LineArg,
}

/// Command-line dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Traditional Unix `getopt`: `-abc` clusters of single-character flags.
    #[default]
    Traditional,
    /// GNU `getopt_long`: short clusters plus `--name` and `--name=value`.
    Gnu,
    /// X11 long-only: `-name` and `+name`, matched by name only.
    X11,
}

/// Handle to a [`Var`](crate::Var) inside a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarId(pub(crate) usize);

/// Where to look for a config file.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit path.
    Path(PathBuf),
}
