use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".bow-ties";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "bowties.sqlite";
/// Log file written next to the database; the terminal belongs to the TUI.
const LOG_FILE_NAME: &str = "bow-ties.log";
/// Overrides the data directory when set.
pub const HOME_ENV: &str = "BOW_TIES_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppConfig {
    /// Resolve paths from `BOW_TIES_HOME`, falling back to `~/.bow-ties`.
    pub fn from_env() -> Result<Self> {
        match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => Ok(Self::in_dir(Path::new(&dir))),
            _ => {
                let base_dirs =
                    BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
                Ok(Self::in_dir(&base_dirs.home_dir().join(DATA_DIR_NAME)))
            }
        }
    }

    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            db_path: data_dir.join(DB_FILE_NAME),
            log_path: data_dir.join(LOG_FILE_NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_inside_data_dir() {
        let config = AppConfig::in_dir(Path::new("/tmp/bow-ties-test"));
        assert_eq!(config.db_path, Path::new("/tmp/bow-ties-test/bowties.sqlite"));
        assert_eq!(config.log_path, Path::new("/tmp/bow-ties-test/bow-ties.log"));
    }
}
