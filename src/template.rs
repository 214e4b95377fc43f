//! Render a registry back into config file syntax.

use std::fmt;

use crate::quote::{needs_quoting, quote};
use crate::registry::Registry;

/// A registry shown in config file syntax.
///
/// Every named Var becomes `name = value`, preceded by its help text. Values
/// that are not valid plain values are quoted, so parsing the output into a
/// registry with the same Vars reproduces the current values. A custom value
/// that never accepted input is written commented out.
pub struct Template<'a> {
    registry: &'a Registry,
}

impl<'a> Template<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

impl fmt::Display for Template<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (_, var) in self.registry.iter() {
            let Some(name) = var.name_str() else {
                continue;
            };
            if !first {
                writeln!(f)?;
            }
            first = false;
            if let Some(help) = var.help_str() {
                for line in help.lines() {
                    writeln!(f, "# {line}")?;
                }
            }
            match var.value().to_raw() {
                Some(raw) if needs_quoting(&raw) => writeln!(f, "{name} = {}", quote(&raw))?,
                Some(raw) => writeln!(f, "{name} = {raw}")?,
                None => writeln!(f, "# {name} =")?,
            }
        }
        Ok(())
    }
}

/// Render `registry` as a config file; see [`Template`].
///
/// ```
/// use conflag::{Registry, Value, Var, template};
///
/// let mut reg = Registry::new();
/// reg.add(Var::new(Value::text("hello, world")).name("greeting").help("Printed at startup."));
/// assert_eq!(
///     template::render(&reg),
///     "# Printed at startup.\ngreeting = \"hello, world\"\n",
/// );
/// ```
pub fn render(registry: &Registry) -> String {
    Template::new(registry).to_string()
}
