use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".university-records";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "university.sqlite";
/// Log file written next to the database while the menu owns the terminal.
const LOG_FILE_NAME: &str = "university-records.log";

/// Manage students, teachers, courses, exams and grades from the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// SQLite database file [default: ~/.university-records/university.sqlite]
    #[arg(long, env = "UNIVERSITY_DB", global = true)]
    pub db: Option<PathBuf>,

    /// Log file [default: alongside the database]
    #[arg(long, env = "UNIVERSITY_LOG", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level (ignored when RUST_LOG is set)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive menu (the default)
    Menu,
    /// Drop and recreate every table, destroying all records
    Reset {
        /// Confirm that all data should be destroyed
        #[arg(long)]
        yes: bool,
    },
}

/// Paths resolved from the command line, environment and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub verbose: bool,
}

impl Cli {
    pub fn settings(&self) -> Result<Settings> {
        let db_path = match &self.db {
            Some(path) => path.clone(),
            None => default_data_dir()?.join(DB_FILE_NAME),
        };
        let log_path = match &self.log_file {
            Some(path) => path.clone(),
            None => db_path
                .parent()
                .map(|dir| dir.join(LOG_FILE_NAME))
                .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME)),
        };
        Ok(Settings {
            db_path,
            log_path,
            verbose: self.verbose,
        })
    }

    /// Reject a destructive command that lacks its confirmation flag. Runs
    /// before anything touches the filesystem.
    pub fn confirm(&self) -> Result<()> {
        if let Some(Command::Reset { yes: false }) = self.command {
            bail!("refusing to erase every record without --yes");
        }
        Ok(())
    }
}

/// Resolve the application data directory inside the user's home.
fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
