//! Non-Steam shortcut support for Steam's `shortcuts.vdf`.
//!
//! - [`vdf`]: binary VDF codec.
//! - [`appid`]: ids Steam derives from a shortcut's executable and name.
//! - [`store`]: read/add/remove shortcuts with backups.

pub mod appid;
pub mod backup;
pub mod paths;
pub mod shortcuts;
pub mod store;
pub mod users;
pub mod vdf;

// Re-export primary types.
pub use appid::{
    ShortcutIds, big_picture_app_id, preliminary_id, short_app_id, shortcut_app_id,
};
pub use backup::BackupFile;
pub use paths::{ArtworkType, Paths};
pub use shortcuts::{GameEntry, ShortcutRecord, Tags, names_match};
pub use store::{Clock, ShortcutStore, StoreConfig, SystemClock};
pub use users::{Account, first_account_with_shortcuts, list_accounts};
pub use vdf::{TaggedDict, Value, VdfError};

/// Errors for Steam operations.
#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("steam userdata directory not found")]
    NotFound,

    #[error("steam account not found: {0}")]
    AccountNotFound(String),

    #[error("VDF format error: {0}")]
    Vdf(#[from] VdfError),

    #[error("I/O error: {0}")]
    Io(String),
}
