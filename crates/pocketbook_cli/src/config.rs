//! Command-line flags and resolved runtime paths.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "pocketbook";
const DB_FILE_NAME: &str = "pocketbook.db";
const LOG_DIR_NAME: &str = "logs";

/// Personal assistant for contacts and notes.
#[derive(Debug, Parser)]
#[command(name = "pocketbook", version, about)]
pub struct Cli {
    /// Directory holding the database and logs.
    #[arg(long, env = "POCKETBOOK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
    /// Log level: trace, debug, info, warn or error.
    #[arg(long, env = "POCKETBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Fully resolved settings for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Resolves flags against platform defaults and the working directory.
    pub fn resolve(cli: Cli) -> Result<Self> {
        let data_dir = match cli.data_dir {
            Some(dir) => dir,
            None => match dirs::data_dir() {
                Some(base) => base.join(APP_DIR_NAME),
                None => bail!("no platform data directory; pass --data-dir"),
            },
        };
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        Ok(Self::from_parts(
            &cwd,
            data_dir,
            cli.log_level
                .unwrap_or_else(|| pocketbook_core::default_log_level().to_string()),
        ))
    }

    fn from_parts(cwd: &Path, data_dir: PathBuf, log_level: String) -> Self {
        let data_dir = if data_dir.is_absolute() {
            data_dir
        } else {
            cwd.join(data_dir)
        };
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            data_dir,
            log_level,
        }
    }
}
