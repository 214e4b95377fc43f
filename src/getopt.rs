//! Command-line parser for three dialects.
//!
//! One tokenizer serves all three; the [`Dialect`] only changes how an
//! argument is classified and how a flag is matched:
//!
//! | argument     | `Traditional`   | `Gnu`              | `X11`              |
//! |--------------|-----------------|--------------------|--------------------|
//! | `-abc`       | flags a, b, c   | flags a, b, c      | name `abc`, true   |
//! | `--name=v`   | flags -, n, ... | name `name`, `v`   | name `-name=v`     |
//! | `+name`      | stop            | stop               | name `name`, false |
//! | `--`         | skip, stop      | skip, stop         | skip, stop         |
//! | `-`, `x`     | stop            | stop               | stop               |
//!
//! Processing is left to right and stops at the first non-flag argument;
//! arguments after a non-flag are never permuted forward. The unconsumed
//! arguments are returned to the caller.

use tracing::debug;

use crate::error::{FlagError, FlagErrorKind};
use crate::registry::Registry;
use crate::types::{Dialect, Kind};

/// How one command-line argument was classified.
#[derive(Debug, PartialEq, Eq)]
enum Arg<'a> {
    /// Cluster of short flags, dash removed.
    Short(&'a str),
    /// `--name` or `--name=value`, dashes removed.
    GnuLong(&'a str),
    /// X11 `-name`.
    Long(&'a str),
    /// X11 `+name`.
    False(&'a str),
    /// Stop, leaving the argument in place.
    End,
    /// `--`: drop it and stop.
    EndSkip,
}

fn classify(arg: &str, dialect: Dialect) -> Arg<'_> {
    if arg.len() <= 1 {
        return Arg::End;
    }
    if let Some(rest) = arg.strip_prefix('-') {
        if let Some(long) = rest.strip_prefix('-') {
            if long.is_empty() {
                return Arg::EndSkip;
            }
            if dialect == Dialect::Gnu {
                return Arg::GnuLong(long);
            }
        }
        return match dialect {
            Dialect::X11 => Arg::Long(rest),
            _ => Arg::Short(rest),
        };
    }
    match arg.strip_prefix('+') {
        Some(rest) if dialect == Dialect::X11 => Arg::False(rest),
        _ => Arg::End,
    }
}

/// One flag taken off the front of an argument.
struct Flag<'a> {
    short: Option<char>,
    long: &'a str,
    /// Text after `=` in `--name=value`.
    inline: Option<&'a str>,
}

impl<'a> Flag<'a> {
    /// Split the next flag off `this`, returning what remains of the cluster.
    fn next(this: &'a str, arg: &Arg<'_>) -> (Self, &'a str) {
        match arg {
            Arg::Short(_) => {
                let mut chars = this.chars();
                let short = chars.next();
                let flag = Self {
                    short,
                    long: "",
                    inline: None,
                };
                (flag, chars.as_str())
            }
            Arg::GnuLong(_) => {
                let (long, inline) = match this.split_once('=') {
                    Some((long, value)) => (long, Some(value)),
                    None => (this, None),
                };
                let flag = Self {
                    short: None,
                    long,
                    inline,
                };
                (flag, "")
            }
            _ => {
                let flag = Self {
                    short: None,
                    long: this,
                    inline: None,
                };
                (flag, "")
            }
        }
    }

    fn error(&self, value: &str, kind: FlagErrorKind) -> FlagError {
        FlagError::new(self.short, self.long, value, kind)
    }
}

/// Parse `args` (without the program name) into `registry`.
///
/// Returns the arguments left after processing stopped. The first error ends
/// the call; unknown flags are never skipped. A flag that was already set on
/// this command line is rejected with "option already set".
///
/// What a matched flag's Value receives depends on its [`Kind`]:
///
/// - `NoArg` gets `"true"`, or `"false"` for X11 `+name`, and the cluster
///   continues with its next character.
/// - `HasArg` gets the rest of the cluster, or the `=value` of a GNU long
///   flag, or else the next argument. A missing argument is an error.
/// - `LineArg` gets `""`, requires the rest of the cluster to be empty, and
///   stops processing. Everything after it is returned untouched.
///
/// Required Vars are not checked here; see
/// [`Registry::check_required`](crate::Registry::check_required).
pub fn parse<I, S>(registry: &mut Registry, dialect: Dialect, args: I) -> Result<Vec<String>, FlagError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let mut next = 0;

    'args: while next < args.len() {
        let arg = classify(&args[next], dialect);
        match arg {
            Arg::End => break,
            Arg::EndSkip => {
                next += 1;
                break;
            }
            _ => {}
        }
        next += 1;
        let mut this = match arg {
            Arg::Short(s) | Arg::GnuLong(s) | Arg::Long(s) | Arg::False(s) => s,
            Arg::End | Arg::EndSkip => "",
        };

        while !this.is_empty() {
            let (flag, rest) = Flag::next(this, &arg);
            this = rest;

            let found = match flag.short {
                Some(c) if matches!(arg, Arg::Short(_)) => registry.by_flag(c),
                _ => registry.by_name(flag.long),
            };
            let Some(id) = found else {
                return Err(flag.error("", FlagErrorKind::IllegalOption));
            };
            let var = registry.var_mut(id);
            if var.marks().cli {
                return Err(flag.error("", FlagErrorKind::AlreadySet));
            }

            let kind = var.arg_kind();
            let param: String = match (&arg, kind) {
                (Arg::False(_), Kind::NoArg) => "false".into(),
                (Arg::False(_), _) => return Err(flag.error("", FlagErrorKind::IllegalOption)),
                (_, Kind::NoArg) => {
                    if flag.inline.is_some() {
                        return Err(flag.error("", FlagErrorKind::JunkAtEnd));
                    }
                    "true".into()
                }
                (_, Kind::LineArg) => {
                    let junk = flag.inline.unwrap_or(this);
                    if !junk.is_empty() {
                        return Err(FlagError::new(None, "", junk, FlagErrorKind::JunkAtEnd));
                    }
                    String::new()
                }
                (_, Kind::HasArg) => {
                    if let Some(value) = flag.inline {
                        value.into()
                    } else if !this.is_empty() {
                        std::mem::take(&mut this).into()
                    } else if let Some(value) = args.get(next) {
                        next += 1;
                        value.clone()
                    } else {
                        return Err(flag.error("", FlagErrorKind::MissingArgument));
                    }
                }
            };

            if let Err(e) = var.value_mut().set(&param) {
                let shown = if kind == Kind::NoArg { "" } else { param.as_str() };
                return Err(flag.error(shown, e.into()));
            }
            var.mark_cli();
            debug!(flag = ?flag.short, long = flag.long, "flag set");

            if kind == Kind::LineArg {
                break 'args;
            }
        }
    }

    Ok(args.into_iter().skip(next).collect())
}

/// Traditional Unix `getopt`: short flag clusters only, names ignored.
///
/// With `n` as `NoArg` and `h` as `HasArg`, these are equivalent and all
/// leave `["arg0", "arg1"]`:
///
/// ```text
/// -n -h param -- arg0 arg1
/// -nh param arg0 arg1
/// -nhparam arg0 arg1
/// ```
pub fn getopt<I, S>(registry: &mut Registry, args: I) -> Result<Vec<String>, FlagError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parse(registry, Dialect::Traditional, args)
}

/// GNU `getopt_long`: short clusters plus `--name` and `--name=value`.
///
/// The `=value` form is only valid for `HasArg` flags; a bare `--name` on a
/// `HasArg` flag takes the next argument.
pub fn getopt_long<I, S>(registry: &mut Registry, args: I) -> Result<Vec<String>, FlagError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parse(registry, Dialect::Gnu, args)
}

/// X11 long-only flags: `-name` sets, `+name` clears a `NoArg` flag.
///
/// Short flag characters are ignored. `HasArg` flags always take the next
/// argument, so `-t +f -h param arg0 arg1` sets `t` true, `f` false, `h` to
/// `param` and leaves `["arg0", "arg1"]`.
pub fn getopt_long_only<I, S>(registry: &mut Registry, args: I) -> Result<Vec<String>, FlagError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parse(registry, Dialect::X11, args)
}

/// Parse the process arguments, skipping the program name.
///
/// Arguments that are not valid Unicode are converted lossily.
pub fn parse_env(registry: &mut Registry, dialect: Dialect) -> Result<Vec<String>, FlagError> {
    let args = std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned());
    parse(registry, dialect, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValueError;
    use crate::registry::Var;
    use crate::types::VarId;
    use crate::value::Value;

    struct Fixture {
        reg: Registry,
        n: VarId,
        h: VarId,
        long: VarId,
    }

    fn fixture() -> Fixture {
        let mut reg = Registry::new();
        let n = reg.add(Var::new(Value::bool(false)).flag('n').name("n").kind(Kind::NoArg));
        let h = reg.add(Var::new(Value::text("")).flag('h').name("h"));
        let long = reg.add(Var::new(Value::text("")).flag('l').name("long"));
        Fixture { reg, n, h, long }
    }

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn classify_per_dialect() {
        use Dialect::*;
        assert_eq!(classify("-abc", Traditional), Arg::Short("abc"));
        assert_eq!(classify("-abc", X11), Arg::Long("abc"));
        assert_eq!(classify("--long", Traditional), Arg::Short("-long"));
        assert_eq!(classify("--long", Gnu), Arg::GnuLong("long"));
        assert_eq!(classify("--long", X11), Arg::Long("-long"));
        assert_eq!(classify("+f", X11), Arg::False("f"));
        assert_eq!(classify("+f", Gnu), Arg::End);
        for d in [Traditional, Gnu, X11] {
            assert_eq!(classify("--", d), Arg::EndSkip);
            assert_eq!(classify("-", d), Arg::End);
            assert_eq!(classify("+", d), Arg::End);
            assert_eq!(classify("", d), Arg::End);
            assert_eq!(classify("file", d), Arg::End);
        }
    }

    #[test]
    fn traditional_cluster_forms_agree() {
        for args in [
            &["-n", "-h", "param", "--", "arg0", "arg1"][..],
            &["-n", "-h", "param", "arg0", "arg1"][..],
            &["-nh", "param", "arg0", "arg1"][..],
            &["-nhparam", "arg0", "arg1"][..],
        ] {
            let mut f = fixture();
            let rest = getopt(&mut f.reg, args.iter().copied()).unwrap();
            assert_eq!(rest, strings(&["arg0", "arg1"]), "{args:?}");
            assert_eq!(f.reg.bool(f.n), Some(true));
            assert_eq!(f.reg.text(f.h), Some("param"));
        }
    }

    #[test]
    fn traditional_stops_at_dash_and_non_flags() {
        let mut f = fixture();
        let rest = getopt(&mut f.reg, ["-n", "-", "-h", "x"]).unwrap();
        assert_eq!(rest, strings(&["-", "-h", "x"]));

        let mut f = fixture();
        let rest = getopt(&mut f.reg, ["file", "-n"]).unwrap();
        assert_eq!(rest, strings(&["file", "-n"]));
        assert_eq!(f.reg.bool(f.n), Some(false));
    }

    #[test]
    fn traditional_ignores_names() {
        let mut f = fixture();
        let err = getopt(&mut f.reg, ["--long=x"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::IllegalOption);
        assert_eq!(err.to_string(), "illegal option -- -");
    }

    #[test]
    fn missing_argument() {
        let mut f = fixture();
        let err = getopt(&mut f.reg, ["-nh"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::MissingArgument);
        assert_eq!(err.to_string(), "option requires an argument -- h");
    }

    #[test]
    fn has_arg_takes_flag_looking_next_argument() {
        let mut f = fixture();
        let rest = getopt(&mut f.reg, ["-h", "-n"]).unwrap();
        assert!(rest.is_empty());
        assert_eq!(f.reg.text(f.h), Some("-n"));
        assert_eq!(f.reg.bool(f.n), Some(false));
    }

    #[test]
    fn gnu_long_with_equals() {
        let mut f = fixture();
        let rest = getopt_long(&mut f.reg, ["--long=value", "x"]).unwrap();
        assert_eq!(f.reg.text(f.long), Some("value"));
        assert_eq!(rest, strings(&["x"]));
    }

    #[test]
    fn gnu_long_takes_next_argument() {
        let mut f = fixture();
        let rest = getopt_long(&mut f.reg, ["-nhparam", "--long", "very", "arg0"]).unwrap();
        assert_eq!(f.reg.text(f.long), Some("very"));
        assert_eq!(f.reg.text(f.h), Some("param"));
        assert_eq!(rest, strings(&["arg0"]));
    }

    #[test]
    fn gnu_long_empty_inline_value() {
        let mut f = fixture();
        getopt_long(&mut f.reg, ["--long=", "next"]).unwrap();
        assert_eq!(f.reg.text(f.long), Some(""));
    }

    #[test]
    fn gnu_no_arg_rejects_inline_value() {
        let mut f = fixture();
        let err = getopt_long(&mut f.reg, ["--n=1"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::JunkAtEnd);
        assert_eq!(err.to_string(), "junk at end of option -- n");
    }

    #[test]
    fn gnu_unknown_long() {
        let mut f = fixture();
        let err = getopt_long(&mut f.reg, ["--nope"]).unwrap_err();
        assert_eq!(err.to_string(), "illegal option -- nope");
    }

    #[test]
    fn gnu_double_dash_is_dropped() {
        let mut f = fixture();
        let rest = getopt_long(&mut f.reg, ["--long=v", "--", "--x"]).unwrap();
        assert_eq!(f.reg.text(f.long), Some("v"));
        assert_eq!(rest, strings(&["--x"]));
    }

    #[test]
    fn x11_double_dash_is_dropped() {
        let mut f = fixture();
        let rest = getopt_long_only(&mut f.reg, ["-n", "--", "-h", "x"]).unwrap();
        assert_eq!(f.reg.bool(f.n), Some(true));
        assert_eq!(f.reg.text(f.h), Some(""));
        assert_eq!(rest, strings(&["-h", "x"]));
    }

    #[test]
    fn x11_true_false_and_has_arg() {
        let mut reg = Registry::new();
        let t = reg.add(Var::new(Value::bool(false)).name("t").kind(Kind::NoArg));
        let f = reg.add(Var::new(Value::bool(true)).name("f").kind(Kind::NoArg));
        let h = reg.add(Var::new(Value::text("")).flag('x').name("h"));

        let rest = getopt_long_only(&mut reg, ["-t", "+f", "-h", "param", "arg0", "arg1"]).unwrap();
        assert_eq!(reg.bool(t), Some(true));
        assert_eq!(reg.bool(f), Some(false));
        assert_eq!(reg.text(h), Some("param"));
        assert_eq!(rest, strings(&["arg0", "arg1"]));
    }

    #[test]
    fn x11_ignores_short_flags() {
        let mut f = fixture();
        let err = getopt_long_only(&mut f.reg, ["-l", "v"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::IllegalOption);
        assert_eq!(err.to_string(), "illegal option -- l");
    }

    #[test]
    fn x11_plus_requires_no_arg() {
        let mut f = fixture();
        let err = getopt_long_only(&mut f.reg, ["+long"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::IllegalOption);
        assert_eq!(err.to_string(), "illegal option -- long");
    }

    #[test]
    fn x11_has_arg_never_splits_the_name() {
        let mut f = fixture();
        let err = getopt_long_only(&mut f.reg, ["-hvalue"]).unwrap_err();
        assert_eq!(err.to_string(), "illegal option -- hvalue");
    }

    #[test]
    fn flag_set_twice_is_rejected() {
        let mut f = fixture();
        let err = getopt(&mut f.reg, ["-h", "a", "-h", "b"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::AlreadySet);
        assert_eq!(err.to_string(), "option already set -- h");
        assert_eq!(f.reg.text(f.h), Some("a"));

        let mut f = fixture();
        let err = getopt(&mut f.reg, ["-nn"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::AlreadySet);
    }

    #[test]
    fn value_errors_carry_the_value() {
        let mut reg = Registry::new();
        reg.add(Var::new(Value::uint(0)).flag('c').name("count"));
        let err = getopt_long(&mut reg, ["--count=-1"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::Value(ValueError::Range));
        assert_eq!(err.to_string(), "value out of range -- -1");
    }

    #[test]
    fn no_arg_value_error_shows_flag() {
        let mut reg = Registry::new();
        reg.add(Var::new(Value::uint(0)).flag('q').kind(Kind::NoArg));
        let err = getopt(&mut reg, ["-q"]).unwrap_err();
        assert_eq!(err.to_string(), "syntax error -- q");
    }

    fn line_fixture() -> (Registry, VarId, VarId) {
        let mut reg = Registry::new();
        let v = reg.add(Var::new(Value::bool(false)).flag('v').name("v").kind(Kind::NoArg));
        let exec = reg.add(
            Var::new(Value::text("unset"))
                .flag('e')
                .name("exec")
                .kind(Kind::LineArg)
                .required(),
        );
        (reg, v, exec)
    }

    #[test]
    fn line_arg_stops_processing() {
        let (mut reg, v, exec) = line_fixture();
        let rest = getopt(&mut reg, ["-ve", "cmd", "-v", "--", "x"]).unwrap();
        assert_eq!(rest, strings(&["cmd", "-v", "--", "x"]));
        assert_eq!(reg.text(exec), Some(""));
        assert_eq!(reg.bool(v), Some(true));
    }

    #[test]
    fn line_arg_rejects_trailing_cluster() {
        let (mut reg, _, _) = line_fixture();
        let err = getopt(&mut reg, ["-ev"]).unwrap_err();
        assert_eq!(err.kind, FlagErrorKind::JunkAtEnd);
        assert_eq!(err.to_string(), "junk at end of option -- v");

        let (mut reg, _, _) = line_fixture();
        let err = getopt_long(&mut reg, ["--exec=now"]).unwrap_err();
        assert_eq!(err.to_string(), "junk at end of option -- now");
    }

    #[test]
    fn line_arg_counts_as_set_for_required_check() {
        let (mut reg, _, _) = line_fixture();
        assert!(reg.check_required("cmdline").is_err());
        getopt_long_only(&mut reg, ["-exec", "ls", "-l"]).unwrap();
        assert!(reg.check_required("cmdline").is_ok());
    }

    #[test]
    fn required_is_not_checked_on_the_command_line() {
        let (mut reg, _, _) = line_fixture();
        let rest = getopt(&mut reg, ["-v"]).unwrap();
        assert!(rest.is_empty());
        assert!(reg.check_required("cmdline").is_err());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn flag_events_leave_out_values() {
        let sink = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(sink.clone())
            .finish();
        let mut f = fixture();
        tracing::subscriber::with_default(subscriber, || {
            getopt_long(&mut f.reg, ["-hsecret", "--long", "hidden"]).unwrap();
        });

        let logged = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("flag set"), "{logged}");
        assert!(logged.contains("long=\"long\""), "{logged}");
        assert!(!logged.contains("secret"), "{logged}");
        assert!(!logged.contains("hidden"), "{logged}");
    }

    #[test]
    fn non_ascii_short_flags() {
        let mut reg = Registry::new();
        let id = reg.add(Var::new(Value::bool(false)).flag('é').kind(Kind::NoArg));
        getopt(&mut reg, ["-é"]).unwrap();
        assert_eq!(reg.bool(id), Some(true));
    }
}
