use std::fs;

use serde::{Deserialize, Serialize};

use crate::SteamError;
use crate::paths::Paths;

/// A Steam account directory under `userdata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub has_shortcuts: bool,
}

/// Returns the accounts found in the userdata directory, sorted by id.
pub fn list_accounts(paths: &Paths) -> Result<Vec<Account>, SteamError> {
    let user_data_dir = paths.user_data_dir();

    let entries = fs::read_dir(&user_data_dir).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SteamError::NotFound
        } else {
            SteamError::Io(format!(
                "failed to read {}: {e}",
                user_data_dir.display()
            ))
        }
    })?;

    let mut accounts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SteamError::Io(e.to_string()))?;

        if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }

        let name = entry.file_name();
        let name = name.to_string_lossy();

        // Account directories are numeric ids
        if name.parse::<u64>().is_err() {
            continue;
        }

        // "0" is a scratch directory Steam creates before login
        if name == "0" {
            continue;
        }

        let has_shortcuts = paths.has_shortcuts(&name);
        accounts.push(Account {
            id: name.into_owned(),
            has_shortcuts,
        });
    }

    accounts.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(accounts)
}

/// Returns the first account that has shortcuts, or the first account if none do.
pub fn first_account_with_shortcuts(paths: &Paths) -> Result<Option<Account>, SteamError> {
    let accounts = list_accounts(paths)?;

    if let Some(account) = accounts.iter().find(|a| a.has_shortcuts) {
        return Ok(Some(account.clone()));
    }

    Ok(accounts.into_iter().next())
}
