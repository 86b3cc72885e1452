use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::appid::ShortcutIds;

/// Kind of locally cached artwork for a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtworkType {
    /// 600x900 vertical capsule.
    Cover,
    /// 460x215 horizontal capsule.
    Header,
    /// 1920x620 library hero.
    Hero,
    /// Transparent logo.
    Logo,
    /// Big Picture grid image, named with the 64-bit id.
    BigPicture,
}

impl ArtworkType {
    /// Returns all artwork types.
    pub fn all() -> &'static [ArtworkType] {
        &[
            ArtworkType::Cover,
            ArtworkType::Header,
            ArtworkType::Hero,
            ArtworkType::Logo,
            ArtworkType::BigPicture,
        ]
    }

    /// Returns the file name Steam looks for.
    pub fn filename(&self, ids: &ShortcutIds) -> String {
        match self {
            ArtworkType::Cover => format!("{}p.jpg", ids.short_id),
            ArtworkType::Header => format!("{}.jpg", ids.short_id),
            ArtworkType::Hero => format!("{}_hero.jpg", ids.short_id),
            ArtworkType::Logo => format!("{}_logo.png", ids.short_id),
            ArtworkType::BigPicture => format!("{}.jpg", ids.preliminary),
        }
    }
}

impl fmt::Display for ArtworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtworkType::Cover => write!(f, "cover"),
            ArtworkType::Header => write!(f, "header"),
            ArtworkType::Hero => write!(f, "hero"),
            ArtworkType::Logo => write!(f, "logo"),
            ArtworkType::BigPicture => write!(f, "big_picture"),
        }
    }
}

/// Layout of a Steam installation's per-account files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    /// Creates a `Paths` rooted at a Steam installation directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the Steam base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the userdata directory.
    pub fn user_data_dir(&self) -> PathBuf {
        self.base_dir.join("userdata")
    }

    /// Returns the directory for a specific account.
    pub fn user_dir(&self, account_id: &str) -> PathBuf {
        self.user_data_dir().join(account_id)
    }

    /// Returns the config directory for an account.
    pub fn config_dir(&self, account_id: &str) -> PathBuf {
        self.user_dir(account_id).join("config")
    }

    /// Returns the path to shortcuts.vdf for an account.
    pub fn shortcuts_path(&self, account_id: &str) -> PathBuf {
        self.config_dir(account_id).join("shortcuts.vdf")
    }

    /// Returns the grid artwork directory for an account.
    pub fn grid_dir(&self, account_id: &str) -> PathBuf {
        self.config_dir(account_id).join("grid")
    }

    /// Returns true if the account has a shortcuts.vdf file.
    pub fn has_shortcuts(&self, account_id: &str) -> bool {
        self.shortcuts_path(account_id).exists()
    }

    /// Returns the path for one artwork type of a shortcut.
    pub fn artwork_path(&self, account_id: &str, ids: &ShortcutIds, art_type: ArtworkType) -> PathBuf {
        self.grid_dir(account_id).join(art_type.filename(ids))
    }

    /// Returns all artwork paths for the shortcut identified by `exe` and `name`.
    pub fn artwork_paths(
        &self,
        account_id: &str,
        exe: &str,
        name: &str,
    ) -> HashMap<ArtworkType, PathBuf> {
        let ids = ShortcutIds::derive(exe, name);
        ArtworkType::all()
            .iter()
            .map(|&art_type| (art_type, self.artwork_path(account_id, &ids, art_type)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_layout() {
        let paths = Paths::new("/home/deck/.steam/steam");
        assert_eq!(
            paths.shortcuts_path("43925226"),
            PathBuf::from("/home/deck/.steam/steam/userdata/43925226/config/shortcuts.vdf")
        );
        assert_eq!(
            paths.grid_dir("43925226"),
            PathBuf::from("/home/deck/.steam/steam/userdata/43925226/config/grid")
        );
    }

    #[test]
    fn artwork_file_names() {
        let paths = Paths::new("/steam");
        let map = paths.artwork_paths("1", "\"/opt/Heroic/heroic\"", "Celeste");
        let grid = PathBuf::from("/steam/userdata/1/config/grid");

        assert_eq!(map.len(), 5);
        assert_eq!(map[&ArtworkType::Cover], grid.join("4208718904p.jpg"));
        assert_eq!(map[&ArtworkType::Header], grid.join("4208718904.jpg"));
        assert_eq!(map[&ArtworkType::Hero], grid.join("4208718904_hero.jpg"));
        assert_eq!(map[&ArtworkType::Logo], grid.join("4208718904_logo.png"));
        assert_eq!(
            map[&ArtworkType::BigPicture],
            grid.join("18076310050770518016.jpg")
        );
    }

    #[test]
    fn has_shortcuts_checks_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::new(tmp.path());
        assert!(!paths.has_shortcuts("7"));

        std::fs::create_dir_all(paths.config_dir("7")).unwrap();
        std::fs::write(paths.shortcuts_path("7"), [0x08]).unwrap();
        assert!(paths.has_shortcuts("7"));
    }

    #[test]
    fn artwork_type_display() {
        assert_eq!(ArtworkType::BigPicture.to_string(), "big_picture");
        assert_eq!(ArtworkType::Cover.to_string(), "cover");
    }
}
