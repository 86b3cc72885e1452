//! Read/modify/write access to a `shortcuts.vdf` file.
//!
//! Every mutation rewrites the whole file. When the file already exists a
//! timestamped backup is taken first and old backups are pruned; backup
//! failures are logged and never block the write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::SteamError;
use crate::backup::{self, BackupFile};
use crate::paths::Paths;
use crate::shortcuts::{ShortcutRecord, names_match};
use crate::vdf::{self, TaggedDict, Value};

/// Number of backups kept when not configured otherwise.
pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Root key holding the shortcut entries.
const SHORTCUTS_KEY: &str = "shortcuts";

/// Source of backup timestamps.
pub trait Clock: Send + Sync {
    /// Current time as Unix seconds.
    fn now(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Where the store lives and how many backups it keeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub shortcuts_path: PathBuf,
    /// Backups kept after each write. `0` disables backups.
    pub max_backups: usize,
}

impl StoreConfig {
    pub fn new(shortcuts_path: impl Into<PathBuf>) -> Self {
        Self {
            shortcuts_path: shortcuts_path.into(),
            max_backups: DEFAULT_MAX_BACKUPS,
        }
    }

    /// Config for an account's `shortcuts.vdf` inside a Steam installation.
    pub fn for_account(paths: &Paths, account_id: &str) -> Self {
        Self::new(paths.shortcuts_path(account_id))
    }

    pub fn with_max_backups(mut self, max_backups: usize) -> Self {
        self.max_backups = max_backups;
        self
    }
}

/// Manages the shortcut entries of one `shortcuts.vdf` file.
///
/// Holds no lock; callers sharing a store must serialize their calls.
pub struct ShortcutStore {
    config: StoreConfig,
    clock: Box<dyn Clock>,
}

impl ShortcutStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }

    /// Creates a store that timestamps backups with `clock`.
    pub fn with_clock(config: StoreConfig, clock: impl Clock + 'static) -> Self {
        Self {
            config,
            clock: Box::new(clock),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.shortcuts_path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Reads all shortcuts, failing on unreadable or malformed files.
    ///
    /// A missing file yields an empty list.
    pub fn load(&self) -> Result<Vec<ShortcutRecord>, SteamError> {
        let path = self.path();
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(SteamError::Io(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        let root = vdf::decode(&data)?;
        Ok(records_from_root(&root))
    }

    /// Reads all shortcuts.
    ///
    /// A missing file yields an empty list. An unreadable or malformed file
    /// is logged and also yields an empty list.
    pub fn read_all(&self) -> Vec<ShortcutRecord> {
        match self.load() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    path = %self.path().display(),
                    error = %e,
                    "failed to read shortcuts, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Replaces the file contents with `records`, in order.
    pub fn write_all(&self, records: &[ShortcutRecord]) -> Result<(), SteamError> {
        let path = self.path();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SteamError::Io(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let previous = if path.exists() {
            self.backup_current();
            self.previous_root()
        } else {
            None
        };

        let data = vdf::encode(&root_from_records(previous, records))?;
        write_replacing(path, &data)?;

        tracing::info!(count = records.len(), path = %path.display(), "wrote shortcuts");
        Ok(())
    }

    /// Appends `record` unless a shortcut with the same name exists.
    ///
    /// Returns `false` without writing when the name is taken.
    pub fn add(&self, record: ShortcutRecord) -> Result<bool, SteamError> {
        let mut records = self.read_all();
        if records.iter().any(|r| names_match(&r.name, &record.name)) {
            tracing::debug!(name = %record.name, "shortcut already exists");
            return Ok(false);
        }

        tracing::info!(name = %record.name, app_id = record.app_id, "adding shortcut");
        records.push(record);
        self.write_all(&records)?;
        Ok(true)
    }

    /// Removes every shortcut named `name`.
    ///
    /// Returns `false` without writing when nothing matches.
    pub fn remove(&self, name: &str) -> Result<bool, SteamError> {
        let records = self.read_all();
        let before = records.len();
        let kept: Vec<_> = records
            .into_iter()
            .filter(|r| !names_match(&r.name, name))
            .collect();

        if kept.len() == before {
            return Ok(false);
        }

        tracing::info!(name, removed = before - kept.len(), "removing shortcut");
        self.write_all(&kept)?;
        Ok(true)
    }

    /// Returns true if a shortcut named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Returns the first shortcut named `name`.
    pub fn find(&self, name: &str) -> Option<ShortcutRecord> {
        self.read_all()
            .into_iter()
            .find(|r| names_match(&r.name, name))
    }

    /// Lists existing backups, newest first.
    pub fn backups(&self) -> Result<Vec<BackupFile>, SteamError> {
        backup::list_backups(self.path())
    }

    /// The current file's root, used as the template for the next write.
    fn previous_root(&self) -> Option<TaggedDict> {
        let data = fs::read(self.path()).ok()?;
        match vdf::decode(&data) {
            Ok(root) => Some(root),
            Err(e) => {
                tracing::debug!(error = %e, "existing shortcuts file not reused");
                None
            }
        }
    }

    fn backup_current(&self) {
        if self.config.max_backups == 0 {
            return;
        }

        let path = self.path();
        match backup::create_backup(path, self.clock.now()) {
            Ok(created) => {
                tracing::debug!(path = %created.path.display(), "created backup");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to create backup");
                return;
            }
        }

        if let Err(e) = backup::prune_backups(path, self.config.max_backups) {
            tracing::warn!(error = %e, "failed to prune backups");
        }
    }
}

fn records_from_root(root: &TaggedDict) -> Vec<ShortcutRecord> {
    let Some(entries) = root.get_dict(SHORTCUTS_KEY) else {
        return Vec::new();
    };
    entries
        .values()
        .filter_map(Value::as_dict)
        .map(ShortcutRecord::from_dict)
        .collect()
}

/// Builds the root to write from the previous root, if any.
///
/// Root keys other than `shortcuts` and non-dictionary values inside it
/// keep their place. Entry dictionaries are filled with `records` in order
/// and keyed by position.
fn root_from_records(previous: Option<TaggedDict>, records: &[ShortcutRecord]) -> TaggedDict {
    let mut root = previous.unwrap_or_default();
    let mut fresh = records.iter().map(ShortcutRecord::to_dict).enumerate();

    let mut entries = TaggedDict::new();
    if let Some(old) = root.get_dict(SHORTCUTS_KEY) {
        for (key, value) in old.iter() {
            if value.as_dict().is_none() {
                entries.push(key, value.clone());
            } else if let Some((i, dict)) = fresh.next() {
                entries.push(i.to_string(), dict);
            }
        }
    }
    for (i, dict) in fresh {
        entries.push(i.to_string(), dict);
    }

    root.insert(SHORTCUTS_KEY, entries);
    root
}

/// Writes `data` to a temporary file next to `path` and renames it over
/// `path`, so readers never see a partially written file.
fn write_replacing(path: &Path, data: &[u8]) -> Result<(), SteamError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |e: std::io::Error| {
        SteamError::Io(format!("failed to write {}: {e}", path.display()))
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(data).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
