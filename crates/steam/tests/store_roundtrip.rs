//! End-to-end checks against files laid out the way the Steam client writes them.

use std::fs;

use steamlib_steam::vdf::{self, TaggedDict, Value};
use steamlib_steam::{GameEntry, Paths, ShortcutRecord, ShortcutStore, StoreConfig};

/// Appends a `(tag, key)` header.
fn header(out: &mut Vec<u8>, tag: u8, key: &str) {
    out.push(tag);
    out.extend_from_slice(key.as_bytes());
    out.push(0x00);
}

fn string(out: &mut Vec<u8>, key: &str, value: &str) {
    header(out, 0x01, key);
    out.extend_from_slice(value.as_bytes());
    out.push(0x00);
}

fn int32(out: &mut Vec<u8>, key: &str, value: i32) {
    header(out, 0x02, key);
    out.extend_from_slice(&value.to_le_bytes());
}

/// Two entries in the client's key order, one with lowercase spellings
/// and a key this library does not model.
fn client_file() -> Vec<u8> {
    let mut d = Vec::new();
    header(&mut d, 0x00, "shortcuts");

    header(&mut d, 0x00, "0");
    int32(&mut d, "appid", -86_248_392);
    string(&mut d, "AppName", "Celeste");
    string(&mut d, "Exe", "\"/opt/Heroic/heroic\"");
    string(&mut d, "StartDir", "\"/opt/Heroic/\"");
    string(&mut d, "icon", "");
    string(&mut d, "ShortcutPath", "");
    string(&mut d, "LaunchOptions", "heroic://launch/celeste");
    int32(&mut d, "IsHidden", 0);
    int32(&mut d, "AllowDesktopConfig", 1);
    int32(&mut d, "AllowOverlay", 1);
    int32(&mut d, "OpenVR", 0);
    int32(&mut d, "Devkit", 0);
    string(&mut d, "DevkitGameID", "");
    int32(&mut d, "DevkitOverrideAppID", 0);
    int32(&mut d, "LastPlayTime", 1_712_345_678);
    string(&mut d, "FlatpakAppID", "");
    header(&mut d, 0x00, "tags");
    string(&mut d, "0", "Platformer");
    string(&mut d, "1", "favorite");
    d.push(0x08);
    d.push(0x08);

    header(&mut d, 0x00, "1");
    int32(&mut d, "appid", -1_177_524_115);
    string(&mut d, "appname", "My Game");
    string(&mut d, "exe", "\"/usr/bin/game\"");
    string(&mut d, "startdir", "\"/usr/bin/\"");
    int32(&mut d, "ishidden", 1);
    header(&mut d, 0x07, "CustomCounter");
    d.extend_from_slice(&9u64.to_le_bytes());
    header(&mut d, 0x00, "tags");
    d.push(0x08);
    d.push(0x08);

    d.push(0x08);
    d.push(0x08);
    d
}

fn store_with(tmp: &tempfile::TempDir, bytes: &[u8]) -> ShortcutStore {
    let paths = Paths::new(tmp.path());
    let config = StoreConfig::for_account(&paths, "43925226");
    fs::create_dir_all(config.shortcuts_path.parent().unwrap()).unwrap();
    fs::write(&config.shortcuts_path, bytes).unwrap();
    ShortcutStore::new(config)
}

#[test]
fn codec_round_trips_client_file() {
    let bytes = client_file();
    let dict = vdf::decode(&bytes).unwrap();
    assert_eq!(vdf::encode(&dict).unwrap(), bytes);
}

#[test]
fn store_reads_both_spellings() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with(&tmp, &client_file());
    let records = store.read_all();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Celeste");
    assert_eq!(records[0].start_dir, "\"/opt/Heroic/\"");
    assert_eq!(records[0].last_play_time, 1_712_345_678);
    assert_eq!(
        records[0].tags.iter().collect::<Vec<_>>(),
        vec![("0", "Platformer"), ("1", "favorite")]
    );
    assert_eq!(records[0].app_id, records[0].ids().app_id);

    assert_eq!(records[1].name, "My Game");
    assert_eq!(records[1].start_dir, "\"/usr/bin/\"");
    assert!(records[1].hidden);
    assert!(records[1].allow_overlay);
    assert!(records[1].tags.is_empty());
}

#[test]
fn unchanged_records_rewrite_identical_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let bytes = client_file();
    let store = store_with(&tmp, &bytes);

    let records = store.read_all();
    store.write_all(&records).unwrap();

    assert_eq!(fs::read(store.path()).unwrap(), bytes);
    let backups = store.backups().unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read(&backups[0].path).unwrap(), bytes);
}

#[test]
fn adding_keeps_existing_entries_intact() {
    let tmp = tempfile::tempdir().unwrap();
    let bytes = client_file();
    let store = store_with(&tmp, &bytes);

    let game = GameEntry {
        name: "Hades".into(),
        executable: "/games/hades/Hades".into(),
        install_dir: Some("/games/hades".into()),
        category: Some("Roguelike".into()),
        ..GameEntry::default()
    };
    assert!(store.add(ShortcutRecord::from_game(&game)).unwrap());
    assert!(!store.add(ShortcutRecord::new("celeste", "\"/x\"")).unwrap());

    let root = vdf::decode(&fs::read(store.path()).unwrap()).unwrap();
    let entries = root.get_dict("shortcuts").unwrap();
    assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["0", "1", "2"]);

    // The first two entries are byte-for-byte what the client wrote.
    let original = vdf::decode(&bytes).unwrap();
    let original_entries = original.get_dict("shortcuts").unwrap();
    for key in ["0", "1"] {
        assert_eq!(entries.get(key), original_entries.get(key));
    }

    let hades = entries.get_dict("2").unwrap();
    assert_eq!(hades.get("appname").and_then(Value::as_str), Some("Hades"));
    assert_eq!(
        hades.get("exe").and_then(Value::as_str),
        Some("\"/games/hades/Hades\"")
    );
    let tags = hades.get_dict("tags").unwrap();
    assert_eq!(tags.get("0").and_then(Value::as_str), Some("Roguelike"));
}

#[test]
fn editing_a_record_touches_only_that_field() {
    let tmp = tempfile::tempdir().unwrap();
    let store = store_with(&tmp, &client_file());

    let mut records = store.read_all();
    records[1].hidden = false;
    store.write_all(&records).unwrap();

    let root = vdf::decode(&fs::read(store.path()).unwrap()).unwrap();
    let entry = root.get_dict("shortcuts").unwrap().get_dict("1").unwrap();
    assert_eq!(entry.get("ishidden"), Some(&Value::Int32(0)));
    assert!(!entry.contains_key("IsHidden"));
    assert_eq!(entry.get("CustomCounter"), Some(&Value::UInt64(9)));
}

#[test]
fn shortcuts_written_from_scratch_decode_cleanly() {
    let tmp = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(tmp.path().join("nested/dir/shortcuts.vdf"));
    let store = ShortcutStore::new(config);

    let mut record = ShortcutRecord::new("Celeste", "\"/opt/Heroic/heroic\"");
    record.tags.push("Platformer");
    store.write_all(&[record.clone()]).unwrap();

    let root: TaggedDict = vdf::decode(&fs::read(store.path()).unwrap()).unwrap();
    assert_eq!(root.keys().collect::<Vec<_>>(), vec!["shortcuts"]);
    assert_eq!(store.read_all(), vec![record]);
}
