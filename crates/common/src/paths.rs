//! Config folder resolution
//!
//! All persistent files live in one per-user folder:
//! - `$APPDATA/filter-usb` when `APPDATA` is set (Windows)
//! - `$XDG_CONFIG_HOME/filter-usb` when `XDG_CONFIG_HOME` is set
//! - `$HOME/.config/filter-usb` otherwise
//!
//! Empty environment variables are treated as unset.

use crate::{Error, Result};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application folder name inside the config base directory
pub const APP_FOLDER: &str = "filter-usb";

/// Operator settings filename
pub const CONFIG_FILENAME: &str = "config.toml";

/// Denylist snapshot filename
pub const SNAPSHOT_FILENAME: &str = "denylist.bin";

/// Resolve the config base directory from an environment lookup
///
/// Split out from [`ConfigFolder::resolve`] so the fallback chain can be
/// tested without touching the process environment.
pub fn resolve_config_base<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<OsString>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(appdata) = non_empty("APPDATA") {
        return Some(PathBuf::from(appdata));
    }
    if let Some(xdg) = non_empty("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }

    let home = non_empty("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)?;
    Some(home.join(".config"))
}

/// The per-user folder holding `config.toml` and the denylist snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFolder {
    root: PathBuf,
}

impl ConfigFolder {
    /// Use an explicit folder (tests, `--storage` overrides)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the folder from the process environment
    pub fn resolve() -> Result<Self> {
        let base = resolve_config_base(|key| std::env::var_os(key)).ok_or_else(|| {
            Error::Config("Failed to determine config directory (HOME not set?)".to_string())
        })?;
        Ok(Self::new(base.join(APP_FOLDER)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILENAME)
    }

    pub fn snapshot_file(&self) -> PathBuf {
        self.root.join(SNAPSHOT_FILENAME)
    }

    /// Create the folder and an empty `config.toml` if they are missing
    ///
    /// Existing files are never truncated.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| Error::Filesystem {
            path: self.root.clone(),
            source,
        })?;

        touch(&self.config_file())?;
        debug!("Config folder ready at {}", self.root.display());
        Ok(())
    }
}

/// Create `path` as an empty file unless it already exists
pub fn touch(path: &Path) -> Result<()> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| Error::Filesystem {
            path: path.to_path_buf(),
            source,
        })
}
