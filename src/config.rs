//! Configuration loaded from `~/.tasksched/rc`
//!
//! The rc file holds `key=value` lines; blank lines and `#` comments are
//! ignored. Recognised keys:
//! - `data.location` - database file (relative paths resolve against the rc directory)
//! - `list.limit` - maximum number of tasks shown by `list`

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the database location
pub const DB_ENV_VAR: &str = "TASKSCHED_DB";

pub const DEFAULT_LIST_LIMIT: usize = 50;

const CONFIG_DIR: &str = ".tasksched";
const CONFIG_FILE: &str = "rc";
const DEFAULT_DB_FILE: &str = "scheduler.db";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_location: PathBuf,
    pub list_limit: usize,
}

impl Config {
    /// Load configuration from the rc file in the home directory
    ///
    /// A missing rc file is not an error. `TASKSCHED_DB` takes precedence
    /// over `data.location`.
    pub fn load() -> Result<Self> {
        let config_dir = Self::config_dir()?;
        let rc_path = config_dir.join(CONFIG_FILE);

        let mut config = if rc_path.exists() {
            let content = std::fs::read_to_string(&rc_path)
                .with_context(|| format!("Failed to read config file: {}", rc_path.display()))?;
            Self::parse(&content, &config_dir)
                .with_context(|| format!("Invalid config file: {}", rc_path.display()))?
        } else {
            Self::defaults(&config_dir)
        };

        if let Some(path) = std::env::var_os(DB_ENV_VAR).filter(|p| !p.is_empty()) {
            config.data_location = PathBuf::from(path);
        }

        log::debug!("Using database at {}", config.data_location.display());
        Ok(config)
    }

    /// Parse rc file content; `base_dir` anchors relative paths
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let mut config = Self::defaults(base_dir);

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                anyhow::bail!("line {}: expected key=value, got '{}'", line_no + 1, line);
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                "data.location" => {
                    let path = PathBuf::from(value);
                    config.data_location = if path.is_relative() {
                        base_dir.join(path)
                    } else {
                        path
                    };
                }
                "list.limit" => {
                    let limit: usize = value
                        .parse()
                        .with_context(|| format!("line {}: list.limit must be a number", line_no + 1))?;
                    if limit == 0 {
                        anyhow::bail!("line {}: list.limit must be greater than 0", line_no + 1);
                    }
                    config.list_limit = limit;
                }
                _ => log::warn!("Ignoring unknown config key '{}'", key),
            }
        }

        Ok(config)
    }

    fn defaults(config_dir: &Path) -> Self {
        Config {
            data_location: config_dir.join(DEFAULT_DB_FILE),
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }

    /// Directory holding the rc file and the default database
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(home.join(CONFIG_DIR))
    }
}
