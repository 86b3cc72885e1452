//! Timestamped copies of a file, kept next to it as `<name>.bak.<unix-time>`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::SteamError;

/// A backup copy and the Unix timestamp embedded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFile {
    pub path: PathBuf,
    pub timestamp: i64,
}

/// Returns the backup path for `path` taken at `timestamp`.
pub fn backup_path(path: &Path, timestamp: i64) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".bak.{timestamp}"));
    path.with_file_name(name)
}

/// Copies `path` to its backup name for `timestamp`.
///
/// An existing backup with the same name is left untouched, so the first
/// copy taken within a second is the one kept.
pub fn create_backup(path: &Path, timestamp: i64) -> Result<BackupFile, SteamError> {
    let backup = backup_path(path, timestamp);
    let copy_err = |e: io::Error| {
        SteamError::Io(format!(
            "failed to back up {} to {}: {e}",
            path.display(),
            backup.display()
        ))
    };

    let mut source = File::open(path).map_err(copy_err)?;
    let mut target = match OpenOptions::new().write(true).create_new(true).open(&backup) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            tracing::debug!(path = %backup.display(), "backup already exists, keeping it");
            return Ok(BackupFile {
                path: backup.clone(),
                timestamp,
            });
        }
        Err(e) => return Err(copy_err(e)),
    };

    if let Err(e) = io::copy(&mut source, &mut target) {
        drop(target);
        let _ = fs::remove_file(&backup);
        return Err(copy_err(e));
    }

    Ok(BackupFile {
        path: backup,
        timestamp,
    })
}

/// Lists the backups of `path`, newest first by embedded timestamp.
///
/// Files whose suffix is not a plain decimal timestamp are ignored.
pub fn list_backups(path: &Path) -> Result<Vec<BackupFile>, SteamError> {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };
    let prefix = format!("{file_name}.bak.");
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(SteamError::Io(format!(
                "failed to list {}: {e}",
                dir.display()
            )));
        }
    };

    let mut backups = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(suffix) = name.strip_prefix(&prefix) else {
            continue;
        };
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let Ok(timestamp) = suffix.parse::<i64>() else {
            continue;
        };
        backups.push(BackupFile {
            path: entry.path(),
            timestamp,
        });
    }

    backups.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.path.cmp(&a.path))
    });
    Ok(backups)
}

/// Deletes all but the `keep` newest backups of `path`.
///
/// Returns the number of files removed. A file that cannot be removed is
/// logged and skipped.
pub fn prune_backups(path: &Path, keep: usize) -> Result<usize, SteamError> {
    let backups = list_backups(path)?;
    let mut removed = 0;

    for old in backups.iter().skip(keep) {
        match fs::remove_file(&old.path) {
            Ok(()) => {
                removed += 1;
                tracing::debug!(path = %old.path.display(), "removed old backup");
            }
            Err(e) => {
                tracing::warn!(path = %old.path.display(), error = %e, "failed to remove old backup");
            }
        }
    }
    Ok(removed)
}
