//! Setting descriptors and the registry both parsers write into.

use crate::error::{ParseError, ParseErrorKind};
use crate::types::{Kind, VarId};
use crate::value::Value;

/// Which sources have assigned a [`Var`].
///
/// Each origin is tracked on its own, so a Var may be set once from the
/// command line and once from the file. The file parser checks `cli` to
/// leave command-line values in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marks {
    pub file: bool,
    pub cli: bool,
}

impl Marks {
    pub const fn any(self) -> bool {
        self.file || self.cli
    }
}

/// One named and/or flagged setting.
///
/// A Var without a name is command-line only; a Var without a flag is only
/// reachable by name (config file, `--name`, or `-name` in the X11 dialect).
///
/// ```
/// use conflag::{Kind, Value, Var};
///
/// let verbose = Var::new(Value::bool(false)).flag('v').name("verbose").kind(Kind::NoArg);
/// assert_eq!(verbose.flag_char(), Some('v'));
/// ```
#[derive(Debug)]
pub struct Var {
    flag: Option<char>,
    name: Option<String>,
    help: Option<String>,
    value: Value,
    kind: Kind,
    required: bool,
    marks: Marks,
}

impl Var {
    pub fn new(value: Value) -> Self {
        Self {
            flag: None,
            name: None,
            help: None,
            value,
            kind: Kind::default(),
            required: false,
            marks: Marks::default(),
        }
    }

    /// Short flag character. `'\0'` means none.
    pub fn flag(mut self, flag: char) -> Self {
        self.flag = (flag != '\0').then_some(flag);
        self
    }

    /// Long name, also the config file identifier. Empty means none.
    pub fn name(mut self, name: &str) -> Self {
        self.name = (!name.is_empty()).then(|| name.to_owned());
        self
    }

    /// One-line description used by templates and help output.
    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_owned());
        self
    }

    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = kind;
        self
    }

    /// Fail the end-of-file check unless some source sets this Var.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn flag_char(&self) -> Option<char> {
        self.flag
    }

    pub fn name_str(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn help_str(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn arg_kind(&self) -> Kind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn marks(&self) -> Marks {
        self.marks
    }

    pub(crate) fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub(crate) fn mark_file(&mut self) {
        self.marks.file = true;
    }

    pub(crate) fn mark_cli(&mut self) {
        self.marks.cli = true;
    }
}

/// Ordered collection of [`Var`]s, addressed by [`VarId`].
///
/// Built once before parsing; parsers update values and [`Marks`] in place.
#[derive(Debug, Default)]
pub struct Registry {
    vars: Vec<Var>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, var: Var) -> VarId {
        self.vars.push(var);
        VarId(self.vars.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// The Var behind `id`, or `None` if `id` came from another registry.
    pub fn get(&self, id: VarId) -> Option<&Var> {
        self.vars.get(id.0)
    }

    /// # Panics
    ///
    /// If `id` was not returned by this registry's [`add`](Self::add).
    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id.0]
    }

    /// # Panics
    ///
    /// If `id` was not returned by this registry's [`add`](Self::add).
    pub fn value(&self, id: VarId) -> &Value {
        &self.vars[id.0].value
    }

    /// Text of a text Var. `None` for other Values or a foreign `id`.
    pub fn text(&self, id: VarId) -> Option<&str> {
        self.get(id)?.value.as_str()
    }

    pub fn bool(&self, id: VarId) -> Option<bool> {
        self.get(id)?.value.as_bool()
    }

    pub fn int(&self, id: VarId) -> Option<i64> {
        self.get(id)?.value.as_i64()
    }

    pub fn uint(&self, id: VarId) -> Option<u64> {
        self.get(id)?.value.as_u64()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Var)> {
        self.vars.iter().enumerate().map(|(i, v)| (VarId(i), v))
    }

    /// First Var whose name is `name`.
    pub fn by_name(&self, name: &str) -> Option<VarId> {
        self.vars
            .iter()
            .position(|v| v.name.as_deref() == Some(name))
            .map(VarId)
    }

    /// First Var whose short flag is `flag`.
    pub fn by_flag(&self, flag: char) -> Option<VarId> {
        self.vars
            .iter()
            .position(|v| v.flag == Some(flag))
            .map(VarId)
    }

    /// Only called with ids from [`add`](Self::add) or the lookups above.
    pub(crate) fn var_mut(&mut self, id: VarId) -> &mut Var {
        &mut self.vars[id.0]
    }

    /// Fail on the first required Var that no source has set.
    ///
    /// `file` only labels the error.
    pub fn check_required(&self, file: &str) -> Result<(), ParseError> {
        match self.vars.iter().find(|v| v.required && !v.marks.any()) {
            Some(v) => Err(ParseError {
                file: file.to_owned(),
                line: 0,
                ident: v.name.clone().unwrap_or_else(|| v.flag.map(String::from).unwrap_or_default()),
                value: String::new(),
                kind: ParseErrorKind::RequiredNotSet,
            }),
            None => Ok(()),
        }
    }

    /// Forget which sources have set which Vars. Values are kept.
    pub fn clear_marks(&mut self) {
        for v in &mut self.vars {
            v.marks = Marks::default();
        }
    }
}
