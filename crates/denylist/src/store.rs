//! Persistent denylist store
//!
//! [`DenylistStore`] owns one [`Denylist`] and the snapshot file backing it.
//! File handles are opened and closed inside each load/save call; nothing is
//! held open between operations.
//!
//! # Save policy
//!
//! [`DenylistStore::add`] and [`DenylistStore::remove`] only stage a change in
//! memory. [`DenylistStore::clear`] and [`DenylistStore::unflatten`] persist
//! immediately. Callers that mutate single pairs must call
//! [`DenylistStore::save`] themselves (for example when quitting). This
//! asymmetry is inherited from earlier releases and may not have been
//! intentional; wrappers that want stronger durability can save after every
//! mutation.

use crate::error::{DecodeError, DenylistError, Result};
use crate::flat::{RejectedLine, parse_lines};
use crate::model::Denylist;
use common::ConfigFolder;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// A store shared between threads behind a single lock
pub type SharedStore = Arc<Mutex<DenylistStore>>;

/// What [`DenylistStore::load`] found on disk
#[derive(Debug)]
pub enum LoadOutcome {
    /// Snapshot decoded successfully
    Loaded { pairs: usize },
    /// Snapshot file was empty or missing; nothing saved yet
    Fresh,
    /// Snapshot was unreadable; the store fell back to an empty denylist
    Recovered(DenylistError),
}

impl LoadOutcome {
    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadOutcome::Recovered(_))
    }
}

/// Result of [`DenylistStore::unflatten`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Well-formed lines, duplicates included
    pub accepted: usize,
    /// Pairs in the denylist after the import
    pub pairs: usize,
    pub rejected: Vec<RejectedLine>,
}

impl ImportReport {
    /// The rejected lines as errors, for callers that report them uniformly
    pub fn errors(&self) -> impl Iterator<Item = DenylistError> + '_ {
        self.rejected.iter().map(|r| DenylistError::MalformedEntry {
            line: r.line.clone(),
            reason: r.reason,
        })
    }
}

/// Denylist with snapshot persistence
#[derive(Debug)]
pub struct DenylistStore {
    path: PathBuf,
    denylist: Denylist,
    last_load: LoadOutcome,
}

impl DenylistStore {
    /// Open the store backed by `storage_path`
    ///
    /// Creates the parent directory and an empty snapshot file if needed (an
    /// existing file is left untouched), then loads it. Only failure to
    /// create the directory or file is an error; an unreadable snapshot is
    /// recovered as an empty denylist (see [`DenylistStore::load_outcome`]).
    pub fn open(storage_path: impl Into<PathBuf>) -> Result<Self> {
        let path = storage_path.into();
        prepare_storage(&path)?;

        let mut store = Self {
            path,
            denylist: Denylist::new(),
            last_load: LoadOutcome::Fresh,
        };
        store.last_load = store.load();
        Ok(store)
    }

    /// Open the store at the snapshot path of a config folder
    pub fn open_in(folder: &ConfigFolder) -> Result<Self> {
        Self::open(folder.snapshot_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    /// Outcome of the most recent [`DenylistStore::load`]
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.last_load
    }

    pub fn is_denylisted(&self, vendor_id: &str, product_id: &str) -> bool {
        self.denylist.contains(vendor_id, product_id)
    }

    /// Stage a pair; not persisted until [`DenylistStore::save`]
    pub fn add(&mut self, vendor_id: &str, product_id: &str) {
        if self.denylist.insert(vendor_id, product_id) {
            debug!("Denylisted {}:{}", vendor_id, product_id);
        }
    }

    /// Unstage a pair if present; not persisted until [`DenylistStore::save`]
    pub fn remove(&mut self, vendor_id: &str, product_id: &str) {
        if self.is_denylisted(vendor_id, product_id) {
            self.denylist.remove(vendor_id, product_id);
            debug!("Removed {}:{} from denylist", vendor_id, product_id);
        }
    }

    /// Empty the denylist and persist immediately
    pub fn clear(&mut self) -> Result<()> {
        self.denylist = Denylist::new();
        self.save()?;
        info!("Denylist cleared");
        Ok(())
    }

    /// Every pair as a `vendor:product` string, sorted
    pub fn flatten(&self) -> Vec<String> {
        self.denylist.flatten()
    }

    /// Replace the whole denylist with the given flat text lines
    ///
    /// Malformed lines are skipped and listed in the report. The result is
    /// saved once at the end. The in-memory denylist is replaced even if
    /// that save fails.
    pub fn unflatten<I, S>(&mut self, lines: I) -> Result<ImportReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = parse_lines(lines);
        self.denylist = parsed.denylist;

        let report = ImportReport {
            accepted: parsed.accepted,
            pairs: self.denylist.len(),
            rejected: parsed.rejected,
        };

        self.save()?;

        info!(
            "Imported {} entries ({} rejected)",
            report.pairs,
            report.rejected.len()
        );
        Ok(report)
    }

    /// Overwrite the snapshot file with the current denylist
    ///
    /// Writes a sibling temp file, syncs it and renames it over the
    /// snapshot, so an interrupted save leaves the previous snapshot intact.
    pub fn save(&self) -> Result<()> {
        let body = self.denylist.to_snapshot();
        let tmp = temp_path(&self.path);

        let write = || -> snapshot::Result<()> {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            snapshot::write_snapshot(&mut writer, &body)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)?;
            Ok(())
        };

        if let Err(source) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(DenylistError::StorageWrite {
                path: self.path.clone(),
                source,
            });
        }

        debug!(
            "Saved {} denylist entries to {}",
            self.denylist.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Replace the in-memory denylist with the snapshot on disk
    ///
    /// Never fails: an empty or missing file yields an empty denylist, and a
    /// corrupt one is reported through the returned outcome and a warning
    /// while the store continues with an empty denylist.
    pub fn load(&mut self) -> LoadOutcome {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return self.recover(DecodeError::Read(e)),
        };

        if bytes.is_empty() {
            info!(
                "Denylist snapshot {} is empty, starting with an empty denylist",
                self.path.display()
            );
            self.denylist = Denylist::new();
            return LoadOutcome::Fresh;
        }

        let decoded = snapshot::decode_snapshot(&bytes)
            .map_err(DecodeError::from)
            .and_then(Denylist::from_snapshot);

        match decoded {
            Ok(denylist) => {
                let pairs = denylist.len();
                self.denylist = denylist;
                debug!(
                    "Loaded {} denylist entries from {}",
                    pairs,
                    self.path.display()
                );
                LoadOutcome::Loaded { pairs }
            }
            Err(source) => self.recover(source),
        }
    }

    /// Move the store behind a mutex for multi-threaded hosts
    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    fn recover(&mut self, source: DecodeError) -> LoadOutcome {
        let err = DenylistError::StorageDecode {
            path: self.path.clone(),
            source,
        };
        warn!("{}; continuing with an empty denylist", err);
        self.denylist = Denylist::new();
        LoadOutcome::Recovered(err)
    }
}

fn prepare_storage(path: &Path) -> Result<()> {
    let unavailable = |source| DenylistError::StorageUnavailable {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(unavailable)?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(unavailable)?;

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
