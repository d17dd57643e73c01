//! Logging configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for this crate's targets (trace, debug, info, warn, error)
    pub level: String,

    /// Human-readable output on stderr
    pub console_output: bool,

    /// Directory for JSON log files (None = no file logging)
    pub log_directory: Option<PathBuf>,

    /// Include file and line in console output
    pub include_file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            console_output: true,
            log_directory: None,
            include_file_location: false,
        }
    }
}

impl LoggingConfig {
    /// Map `-v`/`-q` counts onto a level: warn by default, error when quiet.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };

        Self {
            level: level.to_string(),
            include_file_location: verbose >= 3,
            ..Self::default()
        }
    }

    pub fn with_log_directory(mut self, dir: Option<PathBuf>) -> Self {
        self.log_directory = dir;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !VALID_LEVELS.contains(&self.level.as_str()) {
            return Err(format!(
                "Invalid level: {}. Must be one of: {:?}",
                self.level, VALID_LEVELS
            ));
        }

        if let Some(ref log_dir) = self.log_directory {
            if log_dir.exists() && !log_dir.is_dir() {
                return Err(format!("Log path is not a directory: {:?}", log_dir));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
        assert!(config.console_output);
        assert!(config.log_directory.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(LoggingConfig::from_verbosity(0, false).level, "warn");
        assert_eq!(LoggingConfig::from_verbosity(1, false).level, "info");
        assert_eq!(LoggingConfig::from_verbosity(2, false).level, "debug");
        assert_eq!(LoggingConfig::from_verbosity(5, false).level, "trace");
        assert_eq!(LoggingConfig::from_verbosity(2, true).level, "error");
        assert!(LoggingConfig::from_verbosity(3, false).include_file_location);
    }

    #[test]
    fn test_invalid_level_rejected() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
