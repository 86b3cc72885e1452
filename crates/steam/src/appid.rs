//! Identifiers Steam derives for non-Steam shortcuts.
//!
//! Everything is computed from the stored executable string (quotes
//! included) and the display name. The same values name the artwork files
//! Steam caches under `config/grid`, so they must match bit for bit.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

/// Low 32 bits of every preliminary id.
pub const PRELIMINARY_LOW_BITS: u64 = 0x0200_0000;

/// Bit forced on in the CRC before it becomes the high half.
const HIGH_BIT: u32 = 0x8000_0000;

/// Returns the 64-bit id all other shortcut ids are derived from.
pub fn preliminary_id(exe: &str, name: &str) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(exe.as_bytes());
    hasher.update(name.as_bytes());
    let top = hasher.finalize() | HIGH_BIT;
    (u64::from(top) << 32) | PRELIMINARY_LOW_BITS
}

/// Returns the id used for grid, hero and logo artwork file names.
pub fn short_app_id(exe: &str, name: &str) -> String {
    short_id(exe, name).to_string()
}

/// Returns the id used for Big Picture grid artwork file names.
pub fn big_picture_app_id(exe: &str, name: &str) -> String {
    preliminary_id(exe, name).to_string()
}

/// Returns the signed `appid` value stored in `shortcuts.vdf`.
///
/// Always negative, since the top bit of the short id is set.
pub fn shortcut_app_id(exe: &str, name: &str) -> i32 {
    short_id(exe, name) as i32
}

fn short_id(exe: &str, name: &str) -> u32 {
    (preliminary_id(exe, name) >> 32) as u32
}

/// All ids derived for one shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortcutIds {
    pub preliminary: u64,
    pub short_id: u32,
    pub app_id: i32,
}

impl ShortcutIds {
    pub fn derive(exe: &str, name: &str) -> Self {
        let preliminary = preliminary_id(exe, name);
        let short_id = (preliminary >> 32) as u32;
        Self {
            preliminary,
            short_id,
            app_id: short_id as i32,
        }
    }

    /// Short id as used in artwork file names.
    pub fn short_name(&self) -> String {
        self.short_id.to_string()
    }

    /// Big Picture id as used in artwork file names.
    pub fn big_picture_name(&self) -> String {
        self.preliminary.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXE: &str = "\"/opt/Heroic/heroic\"";
    const NAME: &str = "Celeste";

    #[test]
    fn known_values() {
        // crc32("\"/opt/Heroic/heroic\"Celeste") | 0x80000000 == 0xfadbf438
        assert_eq!(preliminary_id(EXE, NAME), 0xfadb_f438_0200_0000);
        assert_eq!(short_app_id(EXE, NAME), "4208718904");
        assert_eq!(big_picture_app_id(EXE, NAME), "18076310050770518016");
        assert_eq!(shortcut_app_id(EXE, NAME), -86_248_392);
        assert_eq!(i64::from(shortcut_app_id(EXE, NAME)), 4_208_718_904 - 0x1_0000_0000);
    }

    #[test]
    fn deterministic() {
        assert_eq!(shortcut_app_id(EXE, NAME), shortcut_app_id(EXE, NAME));
        assert_eq!(ShortcutIds::derive(EXE, NAME), ShortcutIds::derive(EXE, NAME));
    }

    #[test]
    fn quotes_are_part_of_the_input() {
        assert_ne!(
            preliminary_id("\"/usr/bin/game\"", "My Game"),
            preliminary_id("/usr/bin/game", "My Game")
        );
        assert_eq!(shortcut_app_id("\"/usr/bin/game\"", "My Game"), -1_177_524_115);
    }

    #[test]
    fn distinct_inputs_give_distinct_ids() {
        let a = ShortcutIds::derive("/bin/a", "Game A");
        let b = ShortcutIds::derive("/bin/b", "Game B");
        let c = ShortcutIds::derive("/bin/a", "Game B");
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn structural_properties() {
        for (exe, name) in [("", ""), ("/bin/x", "X"), (EXE, NAME), ("\"C:\\Games\\ü.exe\"", "Ünïcode")] {
            let ids = ShortcutIds::derive(exe, name);
            assert!(ids.app_id < 0);
            assert_eq!(ids.preliminary & 0xffff_ffff, PRELIMINARY_LOW_BITS);
            assert_eq!(u64::from(ids.short_id), ids.preliminary >> 32);
            assert_eq!(ids.short_name(), short_app_id(exe, name));
            assert_eq!(ids.big_picture_name(), big_picture_app_id(exe, name));
            assert_eq!(ids.app_id, shortcut_app_id(exe, name));
            assert_eq!(i64::from(ids.app_id), i64::from(ids.short_id) - 0x1_0000_0000);
        }
    }

    #[test]
    fn ids_json_field_names() {
        let json = serde_json::to_string(&ShortcutIds::derive(EXE, NAME)).unwrap();
        assert!(json.contains("\"shortId\""));
        assert!(json.contains("\"appId\""));
    }
}
