//! Clap adapter for help and usage output.
//!
//! Parsing stays with [`getopt`](crate::getopt); this module only mirrors a
//! [`Registry`] as a [`clap::Command`] so clap can render the help screen.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! Clap's own `-h/--help` and `-V/--version` flags are disabled so they never
//! collide with flags the registry declares.

use clap::{Arg, ArgAction, Command};

use crate::registry::{Registry, Var};
use crate::types::Kind;

/// Build a [`Command`] describing every Var that has a flag or a name.
///
/// Vars with neither are left out. `LineArg` Vars are shown as taking the
/// remaining arguments.
pub fn command(registry: &Registry, name: &'static str) -> Command {
    let mut cmd = Command::new(name)
        .disable_help_flag(true)
        .disable_version_flag(true);
    for (id, var) in registry.iter() {
        if var.flag_char().is_none() && var.name_str().is_none() {
            continue;
        }
        cmd = cmd.arg(to_arg(format!("var{}", id.0), var));
    }
    cmd
}

fn to_arg(id: String, var: &Var) -> Arg {
    let mut arg = Arg::new(id).required(var.is_required());
    if let Some(c) = var.flag_char() {
        arg = arg.short(c);
    }
    if let Some(name) = var.name_str() {
        arg = arg.long(name.to_owned());
    }
    if let Some(help) = var.help_str() {
        arg = arg.help(help.to_owned());
    }
    match var.arg_kind() {
        Kind::NoArg => arg.action(ArgAction::SetTrue),
        Kind::HasArg => arg.action(ArgAction::Set).value_name("VALUE"),
        Kind::LineArg => arg
            .action(ArgAction::Append)
            .num_args(0..)
            .value_name("ARGS"),
    }
}

/// Render the help screen for `registry`.
pub fn usage(registry: &Registry, name: &'static str) -> String {
    command(registry, name).render_help().to_string()
}
