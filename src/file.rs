//! Config file discovery and loading.
//!
//! Each [`SearchPath`] resolves to one directory. Lists are
//! **priority-ascending**: the last directory that holds `{dir}/{file_name}`
//! wins, and only that one file is parsed. Merging several files would make
//! every repeated identifier "already defined", so there is no merge mode.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::conf;
use crate::error::Error;
use crate::registry::Registry;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// `app_name` is used by `SearchPath::Platform` to construct the platform-specific
/// config directory (e.g. `~/.config/{app_name}/` on Linux).
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Find the highest-priority existing `{dir}/{file_name}`.
pub fn find_config_file(search_paths: &[SearchPath], file_name: &str, app_name: &str) -> Option<PathBuf> {
    search_paths
        .iter()
        .rev()
        .filter_map(|sp| resolve_search_path(sp, app_name))
        .map(|dir| dir.join(file_name))
        .find(|candidate| {
            let found = candidate.is_file();
            if !found {
                trace!(path = %candidate.display(), "no config file");
            }
            found
        })
}

/// Open `path` and parse it into `registry`.
///
/// The file is closed on return, whether parsing succeeded or not. Open and
/// read failures come back as [`Error::Io`] untouched; parse errors are
/// labelled with the path as given.
pub fn parse_path(path: &Path, registry: &mut Registry) -> Result<(), Error> {
    let file = File::open(path)?;
    debug!(path = %path.display(), "parsing config file");
    conf::parse(BufReader::new(file), &path.display().to_string(), registry)
}
