use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Manage Steam non-Steam game shortcuts", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the per-user config location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Steam installation directory, overrides the config file
    #[arg(long, global = true)]
    pub steam_dir: Option<PathBuf>,

    /// Steam account id (userdata directory name), overrides the config file
    #[arg(long, global = true)]
    pub account: Option<String>,

    /// Operate on this shortcuts.vdf directly instead of an account's file
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List shortcuts
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a shortcut unless one with the same name exists
    Add {
        #[arg(long)]
        name: String,
        /// Path to the executable (stored quoted)
        #[arg(long, required_unless_present = "launch")]
        exe: Option<String>,
        /// Launcher command used instead of an executable path
        #[arg(long, conflicts_with = "exe")]
        launch: Option<String>,
        /// Working directory
        #[arg(long)]
        start_dir: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        /// Category tag
        #[arg(long)]
        category: Option<String>,
    },

    /// Remove all shortcuts with this name (case-insensitive)
    Remove { name: String },

    /// Check whether a shortcut with this name exists
    Has { name: String },

    /// Print the ids Steam derives for an executable and name
    Ids {
        /// Executable exactly as stored, quotes included
        #[arg(long)]
        exe: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        json: bool,
    },

    /// Print the artwork file paths of a stored shortcut
    Grid { name: String },

    /// List Steam accounts in the installation
    Accounts {
        #[arg(long)]
        json: bool,
    },

    /// List backups of the shortcuts file, newest first
    Backups,

    /// Print the decoded contents of any binary VDF file
    Dump { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_exe() {
        let cli = Cli::try_parse_from([
            "steamlib", "add", "--name", "Celeste", "--exe", "/opt/celeste", "--category", "Indie",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                name,
                exe,
                launch,
                category,
                ..
            } => {
                assert_eq!(name, "Celeste");
                assert_eq!(exe.as_deref(), Some("/opt/celeste"));
                assert!(launch.is_none());
                assert_eq!(category.as_deref(), Some("Indie"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_requires_exe_or_launch() {
        assert!(Cli::try_parse_from(["steamlib", "add", "--name", "X"]).is_err());
        assert!(
            Cli::try_parse_from(["steamlib", "add", "--name", "X", "--launch", "heroic://x"])
                .is_ok()
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["steamlib", "list", "--file", "/tmp/s.vdf"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/s.vdf")));
    }
}
