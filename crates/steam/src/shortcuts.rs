use serde::{Deserialize, Serialize};

use crate::appid::ShortcutIds;
use crate::vdf::{TaggedDict, Value};

/// A single non-Steam game entry from `shortcuts.vdf`.
///
/// `exe` and `start_dir` are stored the way Steam keeps them, wrapped in
/// double quotes when they hold a path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShortcutRecord {
    pub app_id: i32,
    pub name: String,
    pub exe: String,
    pub start_dir: String,
    pub icon: String,
    pub shortcut_path: String,
    pub launch_options: String,
    pub hidden: bool,
    pub allow_desktop_config: bool,
    pub allow_overlay: bool,
    pub open_vr: bool,
    pub devkit: bool,
    pub devkit_game_id: String,
    pub devkit_override_app_id: i64,
    pub last_play_time: i64,
    pub flatpak_app_id: String,
    pub sort_as: String,
    pub tags: Tags,

    /// Dictionary this record was decoded from, if any.
    #[serde(skip)]
    source: Option<TaggedDict>,
}

impl Default for ShortcutRecord {
    fn default() -> Self {
        Self {
            app_id: 0,
            name: String::new(),
            exe: String::new(),
            start_dir: String::new(),
            icon: String::new(),
            shortcut_path: String::new(),
            launch_options: String::new(),
            hidden: false,
            allow_desktop_config: true,
            allow_overlay: true,
            open_vr: false,
            devkit: false,
            devkit_game_id: String::new(),
            devkit_override_app_id: 0,
            last_play_time: 0,
            flatpak_app_id: String::new(),
            sort_as: String::new(),
            tags: Tags::new(),
            source: None,
        }
    }
}

impl PartialEq for ShortcutRecord {
    fn eq(&self, other: &Self) -> bool {
        Field::ALL
            .iter()
            .all(|&field| self.field_value(field) == other.field_value(field))
    }
}

/// Collection labels of a shortcut, keyed by their index in the `tags`
/// dictionary.
///
/// Indices are kept exactly as read. New labels take the index after the
/// highest numeric one. Serializes as a JSON object in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<(String, String)>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(index, label)` pairs in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn get(&self, index: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == index)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }

    /// Sets the label at `index`, replacing it in place if present.
    pub fn insert(&mut self, index: impl Into<String>, label: impl Into<String>) {
        let index = index.into();
        let label = label.into();
        match self.0.iter_mut().find(|(k, _)| *k == index) {
            Some(slot) => slot.1 = label,
            None => self.0.push((index, label)),
        }
    }

    /// Appends `label` under the next free index and returns that index.
    pub fn push(&mut self, label: impl Into<String>) -> String {
        let next = self
            .0
            .iter()
            .filter_map(|(k, _)| k.parse::<u64>().ok())
            .max()
            .map_or(0, |n| n + 1);
        let index = next.to_string();
        self.0.push((index.clone(), label.into()));
        index
    }

    /// Removes the label at `index`.
    pub fn remove(&mut self, index: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == index)?;
        Some(self.0.remove(pos).1)
    }

    /// Reads the string entries of a `tags` dictionary.
    fn from_dict(dict: &TaggedDict) -> Self {
        Self(
            dict.iter()
                .filter_map(|(k, v)| Some((k.to_owned(), v.as_str()?.to_owned())))
                .collect(),
        )
    }
}

impl<L: Into<String>> FromIterator<L> for Tags {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut tags = Tags::new();
        for label in iter {
            tags.push(label);
        }
        tags
    }
}

impl Serialize for Tags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TagsVisitor;

        impl<'de> serde::de::Visitor<'de> for TagsVisitor {
            type Value = Tags;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map from tag index to label")
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut map: A,
            ) -> Result<Tags, A::Error> {
                let mut tags = Tags::new();
                while let Some((index, label)) = map.next_entry::<String, String>()? {
                    tags.insert(index, label);
                }
                Ok(tags)
            }
        }

        deserializer.deserialize_map(TagsVisitor)
    }
}

/// A game offered for adding to Steam by a library scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameEntry {
    pub name: String,
    /// Path to the game's executable.
    pub executable: String,
    /// Launcher command used instead of the executable when present
    /// (`heroic://...`, `flatpak run ...`, `lutris:rungame/...`).
    pub launch_command: Option<String>,
    pub install_dir: Option<String>,
    pub icon: Option<String>,
    pub category: Option<String>,
}

impl ShortcutRecord {
    /// Creates a record for `exe` and `name` with a derived `app_id`.
    ///
    /// `exe` must already be in stored form (quoted if it is a path).
    pub fn new(name: impl Into<String>, exe: impl Into<String>) -> Self {
        let name = name.into();
        let exe = exe.into();
        Self {
            app_id: ShortcutIds::derive(&exe, &name).app_id,
            name,
            exe,
            ..Self::default()
        }
    }

    /// Builds a record for a game found by a library scanner.
    pub fn from_game(game: &GameEntry) -> Self {
        let exe = stored_exe(game);
        let start_dir = match game.install_dir.as_deref() {
            Some(dir) if !dir.is_empty() => quote(dir),
            _ => quote("./"),
        };

        Self {
            start_dir,
            icon: game.icon.clone().unwrap_or_default(),
            tags: game.category.iter().cloned().collect(),
            ..Self::new(game.name.clone(), exe)
        }
    }

    /// Ids derived from the stored executable and name.
    pub fn ids(&self) -> ShortcutIds {
        ShortcutIds::derive(&self.exe, &self.name)
    }

    /// Executable path without the surrounding quotes.
    pub fn unquoted_exe(&self) -> &str {
        self.exe.trim_matches('"')
    }

    /// Builds a record from one entry of the `shortcuts` dictionary.
    ///
    /// Missing keys fall back to defaults; the entry itself is remembered
    /// so that [`to_dict`](Self::to_dict) can reproduce it.
    pub fn from_dict(dict: &TaggedDict) -> Self {
        let keys = FieldKeys::resolve(dict);
        let defaults = Self::default();

        let string = |field: Field, default: &str| {
            keys.value(dict, field)
                .and_then(Value::as_str)
                .map_or_else(|| default.to_owned(), str::to_owned)
        };
        let integer = |field: Field| keys.value(dict, field).and_then(Value::as_integer);
        let flag = |field: Field, default: bool| integer(field).map_or(default, |v| v != 0);

        Self {
            // Some writers store the id unsigned; keep its low 32 bits.
            app_id: integer(Field::AppId).map_or(0, |v| v as u32 as i32),
            name: string(Field::AppName, ""),
            exe: string(Field::Exe, ""),
            start_dir: string(Field::StartDir, ""),
            icon: string(Field::Icon, ""),
            shortcut_path: string(Field::ShortcutPath, ""),
            launch_options: string(Field::LaunchOptions, ""),
            hidden: flag(Field::IsHidden, defaults.hidden),
            allow_desktop_config: flag(Field::AllowDesktopConfig, defaults.allow_desktop_config),
            allow_overlay: flag(Field::AllowOverlay, defaults.allow_overlay),
            open_vr: flag(Field::OpenVr, defaults.open_vr),
            devkit: flag(Field::Devkit, defaults.devkit),
            devkit_game_id: string(Field::DevkitGameId, ""),
            devkit_override_app_id: integer(Field::DevkitOverrideAppId).map_or(0, |v| v as i64),
            last_play_time: integer(Field::LastPlayTime).map_or(0, |v| v as i64),
            flatpak_app_id: string(Field::FlatpakAppId, ""),
            sort_as: string(Field::SortAs, ""),
            tags: keys
                .value(dict, Field::Tags)
                .and_then(Value::as_dict)
                .map(Tags::from_dict)
                .unwrap_or_default(),
            source: Some(dict.clone()),
        }
    }

    /// Converts the record into a `shortcuts` entry dictionary.
    ///
    /// Records read from a file start from their original dictionary: keys
    /// whose value is unchanged keep their spelling, type and position (or
    /// stay absent), and unknown keys are carried over. Changed fields missing
    /// from the source are appended in Steam's order.
    pub fn to_dict(&self) -> TaggedDict {
        let Some(source) = &self.source else {
            return Field::ALL
                .iter()
                .map(|&field| (field.canonical(), self.field_value(field)))
                .collect();
        };

        let original = Self::from_dict(source);
        let keys = FieldKeys::resolve(source);
        let mut dict = source.clone();

        for field in Field::ALL {
            let value = self.field_value(field);
            if value == original.field_value(field) {
                continue;
            }
            match keys.key(field) {
                Some(key) => {
                    dict.insert(key, value);
                }
                None => dict.push(field.canonical(), value),
            }
        }
        dict
    }

    fn field_value(&self, field: Field) -> Value {
        match field {
            Field::AppId => Value::Int32(self.app_id),
            Field::AppName => self.name.as_str().into(),
            Field::Exe => self.exe.as_str().into(),
            Field::StartDir => self.start_dir.as_str().into(),
            Field::Icon => self.icon.as_str().into(),
            Field::ShortcutPath => self.shortcut_path.as_str().into(),
            Field::LaunchOptions => self.launch_options.as_str().into(),
            Field::IsHidden => self.hidden.into(),
            Field::AllowDesktopConfig => self.allow_desktop_config.into(),
            Field::AllowOverlay => self.allow_overlay.into(),
            Field::OpenVr => self.open_vr.into(),
            Field::Devkit => self.devkit.into(),
            Field::DevkitGameId => self.devkit_game_id.as_str().into(),
            Field::DevkitOverrideAppId => self.devkit_override_app_id.into(),
            Field::LastPlayTime => self.last_play_time.into(),
            Field::FlatpakAppId => self.flatpak_app_id.as_str().into(),
            Field::SortAs => self.sort_as.as_str().into(),
            Field::Tags => Value::Dict(self.tags.iter().collect()),
        }
    }
}

/// Case-insensitive display name comparison used for deduplication.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Returns the executable string as stored in `shortcuts.vdf`.
fn stored_exe(game: &GameEntry) -> String {
    if let Some(cmd) = game.launch_command.as_deref().filter(|c| !c.is_empty()) {
        if cmd.contains("://") || cmd.starts_with("flatpak run") {
            return quote(cmd);
        }
        return cmd.to_owned();
    }
    quote(&game.executable)
}

fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

const FIELD_COUNT: usize = 18;

/// Known entry keys. `ALL` is the order Steam writes them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AppId,
    AppName,
    Exe,
    StartDir,
    Icon,
    ShortcutPath,
    LaunchOptions,
    IsHidden,
    AllowDesktopConfig,
    AllowOverlay,
    OpenVr,
    Devkit,
    DevkitGameId,
    DevkitOverrideAppId,
    LastPlayTime,
    FlatpakAppId,
    SortAs,
    Tags,
}

impl Field {
    const ALL: [Field; FIELD_COUNT] = [
        Field::AppId,
        Field::AppName,
        Field::Exe,
        Field::StartDir,
        Field::Icon,
        Field::ShortcutPath,
        Field::LaunchOptions,
        Field::IsHidden,
        Field::AllowDesktopConfig,
        Field::AllowOverlay,
        Field::OpenVr,
        Field::Devkit,
        Field::DevkitGameId,
        Field::DevkitOverrideAppId,
        Field::LastPlayTime,
        Field::FlatpakAppId,
        Field::SortAs,
        Field::Tags,
    ];

    /// Accepted spellings, in precedence order. The first one is written
    /// for new keys.
    fn spellings(self) -> &'static [&'static str] {
        match self {
            Field::AppId => &["appid", "AppID", "AppId"],
            Field::AppName => &["appname", "AppName"],
            Field::Exe => &["exe", "Exe"],
            Field::StartDir => &["StartDir", "startdir"],
            Field::Icon => &["icon", "Icon"],
            Field::ShortcutPath => &["ShortcutPath", "shortcutpath"],
            Field::LaunchOptions => &["LaunchOptions", "launchoptions"],
            Field::IsHidden => &["IsHidden", "ishidden"],
            Field::AllowDesktopConfig => &["AllowDesktopConfig", "allowdesktopconfig"],
            Field::AllowOverlay => &["AllowOverlay", "allowoverlay"],
            Field::OpenVr => &["OpenVR", "openvr"],
            Field::Devkit => &["Devkit", "devkit"],
            Field::DevkitGameId => &["DevkitGameID", "devkitgameid"],
            Field::DevkitOverrideAppId => &["DevkitOverrideAppID", "devkitoverrideappid"],
            Field::LastPlayTime => &["LastPlayTime", "lastplaytime"],
            Field::FlatpakAppId => &["FlatpakAppID", "flatpakappid"],
            Field::SortAs => &["sortas", "SortAs"],
            Field::Tags => &["tags", "Tags"],
        }
    }

    fn canonical(self) -> &'static str {
        self.spellings()[0]
    }
}

/// The spelling each field uses in one entry, resolved once.
struct FieldKeys {
    keys: [Option<&'static str>; FIELD_COUNT],
}

impl FieldKeys {
    fn resolve(dict: &TaggedDict) -> Self {
        let mut keys = [None; FIELD_COUNT];
        for (slot, field) in keys.iter_mut().zip(Field::ALL) {
            *slot = field
                .spellings()
                .iter()
                .copied()
                .find(|s| dict.contains_key(s));
        }
        Self { keys }
    }

    fn key(&self, field: Field) -> Option<&'static str> {
        self.keys[field as usize]
    }

    fn value<'d>(&self, dict: &'d TaggedDict, field: Field) -> Option<&'d Value> {
        self.key(field).and_then(|k| dict.get(k))
    }
}
