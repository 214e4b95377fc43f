use std::path::PathBuf;

use tracing::debug;

use crate::error::Error;
use crate::file;
use crate::getopt;
use crate::registry::Registry;
use crate::types::{Dialect, SearchPath, VarId};

/// Where the config file comes from.
#[derive(Debug, Clone)]
enum Source {
    None,
    Path(PathBuf),
    /// Text Var holding the path, read after the command line ran.
    Var(VarId),
    Search,
}

/// Runs the command line first, then the config file, so explicit flags win.
///
/// ```no_run
/// use conflag::{Dialect, Kind, Loader, Registry, Value, Var};
///
/// let mut reg = Registry::new();
/// let conf = reg.add(Var::new(Value::text("example.conf")).flag('c'));
/// let verbose = reg.add(Var::new(Value::bool(false)).flag('v').name("verbose").kind(Kind::NoArg));
///
/// let rest = Loader::new(&mut reg)
///     .dialect(Dialect::Gnu)
///     .file_from(conf)
///     .load()?;
/// # Ok::<(), conflag::Error>(())
/// ```
pub struct Loader<'r> {
    registry: &'r mut Registry,
    dialect: Dialect,
    args: Option<Vec<String>>,
    source: Source,
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    optional: bool,
}

impl<'r> Loader<'r> {
    pub fn new(registry: &'r mut Registry) -> Self {
        Self {
            registry,
            dialect: Dialect::default(),
            args: None,
            source: Source::None,
            app_name: None,
            file_name: None,
            search_paths: None,
            optional: false,
        }
    }

    /// Command-line dialect (default: [`Dialect::Traditional`]).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Arguments to parse, without the program name. Defaults to the
    /// process arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Parse this file after the command line.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Source::Path(path.into());
        self
    }

    /// Parse the file named by a text Var, as it stands after the command
    /// line, e.g. a `-c file` flag with a compiled-in default.
    pub fn file_from(mut self, var: VarId) -> Self {
        self.source = Source::Var(var);
        self
    }

    /// Set the application name. This derives sensible defaults:
    /// - `file_name` → `"{app_name}.conf"`
    /// - `search_paths` → `[SearchPath::Platform]`
    ///
    /// and makes the loader search for its file.
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_owned());
        self.source = Source::Search;
        self
    }

    /// Override the searched file name (default: `"{app_name}.conf"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_owned());
        self.source = Source::Search;
        self
    }

    /// Replace the default search paths entirely.
    ///
    /// Paths are listed in **priority-ascending** order: the last entry has the
    /// highest priority.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self.source = Source::Search;
        self
    }

    /// Treat a missing file as empty instead of an I/O error. Required Vars
    /// are still checked.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Parse the command line, then the file. Returns the residual arguments.
    pub fn load(self) -> Result<Vec<String>, Error> {
        let rest = match self.args {
            Some(args) => getopt::parse(self.registry, self.dialect, args)?,
            None => getopt::parse_env(self.registry, self.dialect)?,
        };
        debug!(dialect = ?self.dialect, residual = rest.len(), "command line parsed");

        // `label` names the file in a required-check error when none is parsed.
        let (path, label) = match self.source {
            Source::None => (None, "stdin".to_owned()),
            Source::Path(p) => {
                let label = p.display().to_string();
                (Some(p), label)
            }
            Source::Var(id) => match self.registry.text(id) {
                Some(name) => (Some(PathBuf::from(name)), name.to_owned()),
                None => (None, "stdin".to_owned()),
            },
            Source::Search => {
                let app_name = self.app_name.unwrap_or_default();
                let file_name = self
                    .file_name
                    .unwrap_or_else(|| format!("{app_name}.conf"));
                let paths = self
                    .search_paths
                    .unwrap_or_else(|| vec![SearchPath::Platform]);
                (file::find_config_file(&paths, &file_name, &app_name), file_name)
            }
        };

        match path {
            Some(p) if !self.optional || p.is_file() => file::parse_path(&p, self.registry)?,
            Some(p) => {
                debug!(path = %p.display(), "optional config file missing");
                self.registry.check_required(&label)?;
            }
            None => {
                debug!(label = %label, "no config file");
                self.registry.check_required(&label)?;
            }
        }
        Ok(rest)
    }
}
