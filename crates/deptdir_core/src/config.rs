//! Process configuration read from the environment.
//!
//! | variable            | meaning                          | default                 |
//! |---------------------|----------------------------------|-------------------------|
//! | `DEPTDIR_DB_PATH`   | SQLite file for the directory    | private in-memory store |
//! | `DEPTDIR_LOG_LEVEL` | trace/debug/info/warn/error      | `default_log_level()`   |
//! | `DEPTDIR_LOG_DIR`   | absolute directory for log files | logging disabled        |

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, init_logging, LoggingError};
use rusqlite::Connection;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "DEPTDIR_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "DEPTDIR_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "DEPTDIR_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable is set but blank.
    Empty(&'static str),
    /// Variable is set but its value is not usable.
    Invalid { var: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(var) => write!(f, "{var} is set but empty"),
            Self::Invalid { var, message } => write!(f, "invalid {var}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved startup settings for one directory process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// `None` leaves logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl DirectoryConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Reads settings from explicit key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();
        let mut config = Self::default();

        if let Some(path) = non_empty(&vars, DB_PATH_VAR)? {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(level) = non_empty(&vars, LOG_LEVEL_VAR)? {
            config.log_level = level.to_ascii_lowercase();
        }

        if let Some(dir) = non_empty(&vars, LOG_DIR_VAR)? {
            let dir = PathBuf::from(dir);
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid {
                    var: LOG_DIR_VAR,
                    message: format!("`{}` is not an absolute path", dir.display()),
                });
            }
            config.log_dir = Some(dir);
        }

        Ok(config)
    }

    /// Starts logging when a log directory is configured.
    pub fn init_logging(&self) -> Result<bool, LoggingError> {
        match self.log_dir.as_deref() {
            Some(dir) => init_logging(&self.log_level, dir).map(|()| true),
            None => Ok(false),
        }
    }

    /// Opens the configured store with migrations applied.
    pub fn open_store(&self) -> DbResult<Connection> {
        match self.db_path.as_deref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

fn non_empty<'a>(
    vars: &'a HashMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, ConfigError> {
    match vars.get(var).map(|value| value.trim()) {
        Some("") => Err(ConfigError::Empty(var)),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DirectoryConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::logging::default_log_level;
    use std::path::PathBuf;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn missing_vars_fall_back_to_defaults() {
        let config = DirectoryConfig::from_vars(Vec::new()).unwrap();
        assert_eq!(config.db_path, None);
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
        assert!(!config.init_logging().unwrap());
    }

    #[test]
    fn vars_override_defaults() {
        let config = DirectoryConfig::from_vars(vars(&[
            (DB_PATH_VAR, "/var/lib/deptdir/directory.db"),
            (LOG_LEVEL_VAR, "WARN"),
            (LOG_DIR_VAR, "/var/log/deptdir"),
        ]))
        .unwrap();

        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/deptdir/directory.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/deptdir")));
    }

    #[test]
    fn blank_and_relative_values_are_rejected() {
        let blank = DirectoryConfig::from_vars(vars(&[(DB_PATH_VAR, "  ")])).unwrap_err();
        assert_eq!(blank, ConfigError::Empty(DB_PATH_VAR));

        let relative = DirectoryConfig::from_vars(vars(&[(LOG_DIR_VAR, "logs")])).unwrap_err();
        assert!(matches!(relative, ConfigError::Invalid { var, .. } if var == LOG_DIR_VAR));
    }

    #[test]
    fn open_store_uses_file_path_when_configured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.db");
        let config = DirectoryConfig {
            db_path: Some(path.clone()),
            ..DirectoryConfig::default()
        };

        drop(config.open_store().unwrap());
        assert!(path.exists());
    }
}
