//! Subcommand implementations. Output goes to the writer passed in.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use steamlib_steam::vdf::{self, TaggedDict, Value};
use steamlib_steam::{
    ArtworkType, GameEntry, Paths, ShortcutIds, ShortcutRecord, ShortcutStore, SteamError,
    StoreConfig, first_account_with_shortcuts, list_accounts,
};

use crate::cli::{Cli, Commands};
use crate::config::Config;

pub fn run(cli: &Cli, config: &Config, out: &mut dyn Write) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Ids { exe, name, json } => ids(exe, name, *json, out),
        Commands::Dump { path } => dump(path, out),
        Commands::Accounts { json } => accounts(&steam_paths(cli, config), *json, out),
        Commands::List { json } => list(&open_store(cli, config)?, *json, out),
        Commands::Add {
            name,
            exe,
            launch,
            start_dir,
            icon,
            category,
        } => {
            let game = GameEntry {
                name: name.clone(),
                executable: exe.clone().unwrap_or_default(),
                launch_command: launch.clone(),
                install_dir: start_dir.clone(),
                icon: icon.clone(),
                category: category.clone(),
            };
            add(&open_store(cli, config)?, &game, out)
        }
        Commands::Remove { name } => {
            let store = open_store(cli, config)?;
            if store.remove(name)? {
                writeln!(out, "removed {name}")?;
            } else {
                writeln!(out, "no shortcut named {name}")?;
            }
            Ok(())
        }
        Commands::Has { name } => {
            let found = open_store(cli, config)?.contains(name);
            writeln!(out, "{found}")?;
            Ok(())
        }
        Commands::Grid { name } => grid(&open_store(cli, config)?, name, out),
        Commands::Backups => {
            for backup in open_store(cli, config)?.backups()? {
                writeln!(out, "{}\t{}", backup.timestamp, backup.path.display())?;
            }
            Ok(())
        }
    }
}

fn steam_paths(cli: &Cli, config: &Config) -> Paths {
    Paths::new(cli.steam_dir.clone().unwrap_or_else(|| config.steam_dir.clone()))
}

/// Opens the store selected by `--file`, `--account` or the config file.
fn open_store(cli: &Cli, config: &Config) -> anyhow::Result<ShortcutStore> {
    let store_config = match &cli.file {
        Some(file) => StoreConfig::new(file),
        None => {
            let paths = steam_paths(cli, config);
            let account = match cli.account.clone().or_else(|| config.account_id.clone()) {
                Some(id) => {
                    if !paths.user_dir(&id).is_dir() {
                        return Err(SteamError::AccountNotFound(id).into());
                    }
                    id
                }
                None => first_account_with_shortcuts(&paths)?
                    .map(|a| a.id)
                    .ok_or_else(|| SteamError::AccountNotFound("no accounts in userdata".into()))?,
            };
            tracing::debug!(account = %account, "using Steam account");
            StoreConfig::for_account(&paths, &account)
        }
    };

    Ok(ShortcutStore::new(
        store_config.with_max_backups(config.max_backups),
    ))
}

fn list(store: &ShortcutStore, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let records = store.read_all();
    if json {
        serde_json::to_writer_pretty(&mut *out, &records)?;
        writeln!(out)?;
        return Ok(());
    }

    for r in &records {
        let tags = if r.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", r.tags.labels().collect::<Vec<_>>().join(", "))
        };
        writeln!(out, "{:>12}  {}  {}{}", r.app_id, r.name, r.exe, tags)?;
    }
    Ok(())
}

fn add(store: &ShortcutStore, game: &GameEntry, out: &mut dyn Write) -> anyhow::Result<()> {
    let record = ShortcutRecord::from_game(game);
    let app_id = record.app_id;
    if store.add(record)? {
        writeln!(out, "added {} (appid {app_id})", game.name)?;
    } else {
        writeln!(out, "skipped {}: already exists", game.name)?;
    }
    Ok(())
}

fn ids(exe: &str, name: &str, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let ids = ShortcutIds::derive(exe, name);
    if json {
        serde_json::to_writer_pretty(&mut *out, &ids)?;
        writeln!(out)?;
    } else {
        writeln!(out, "appid        {}", ids.app_id)?;
        writeln!(out, "short id     {}", ids.short_name())?;
        writeln!(out, "big picture  {}", ids.big_picture_name())?;
    }
    Ok(())
}

fn grid(store: &ShortcutStore, name: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let record = store
        .find(name)
        .with_context(|| format!("no shortcut named {name}"))?;
    let grid_dir = grid_dir_for(store.path());
    let ids = record.ids();

    for art_type in ArtworkType::all() {
        let path = grid_dir.join(art_type.filename(&ids));
        writeln!(out, "{:<12} {}", art_type.to_string(), path.display())?;
    }
    Ok(())
}

/// Artwork lives in `grid` next to shortcuts.vdf.
fn grid_dir_for(shortcuts_path: &Path) -> PathBuf {
    shortcuts_path
        .parent()
        .map(|p| p.join("grid"))
        .unwrap_or_else(|| PathBuf::from("grid"))
}

fn accounts(paths: &Paths, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let accounts = list_accounts(paths)?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &accounts)?;
        writeln!(out)?;
        return Ok(());
    }
    for a in &accounts {
        let marker = if a.has_shortcuts { "shortcuts" } else { "-" };
        writeln!(out, "{}\t{marker}", a.id)?;
    }
    Ok(())
}

fn dump(path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let root = vdf::decode(&data).with_context(|| format!("failed to decode {}", path.display()))?;
    write_dict(&root, 0, out)
}

fn write_dict(dict: &TaggedDict, depth: usize, out: &mut dyn Write) -> anyhow::Result<()> {
    let indent = "  ".repeat(depth);
    for (key, value) in dict.iter() {
        match value {
            Value::Dict(inner) => {
                writeln!(out, "{indent}{key:?} {{")?;
                write_dict(inner, depth + 1, out)?;
                writeln!(out, "{indent}}}")?;
            }
            Value::String(s) => writeln!(out, "{indent}{key:?} = {s:?}")?,
            Value::WideString(s) => writeln!(out, "{indent}{key:?} = {s:?} (wide)")?,
            Value::Int32(v) => writeln!(out, "{indent}{key:?} = {v}")?,
            Value::Float32(v) => writeln!(out, "{indent}{key:?} = {v} (float)")?,
            Value::Pointer(v) => writeln!(out, "{indent}{key:?} = {v:#x} (pointer)")?,
            Value::Color(v) => writeln!(out, "{indent}{key:?} = {v:#010x} (color)")?,
            Value::UInt64(v) => writeln!(out, "{indent}{key:?} = {v} (uint64)")?,
            Value::Int64(v) => writeln!(out, "{indent}{key:?} = {v} (int64)")?,
        }
    }
    Ok(())
}
