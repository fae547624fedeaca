//! Engine limits.
//!
//! Defaults match the classic heisenfs bounds: 256 files of 256 bytes each,
//! names up to 36 characters (a hyphenated UUID). Limits can be loaded from
//! TOML:
//!
//! ```toml
//! max_files = 64
//! max_file_size = 1024
//! max_name_len = 36
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum number of files in the table.
pub const DEFAULT_MAX_FILES: usize = 256;

/// Default per-file buffer capacity in bytes.
pub const DEFAULT_MAX_FILE_SIZE: usize = 256;

/// Default maximum name length in characters.
pub const DEFAULT_MAX_NAME_LEN: usize = 36;

/// Largest accepted `max_files`.
pub const LIMIT_MAX_FILES: usize = 65_536;

/// Largest accepted `max_file_size`. Every record allocates its full buffer.
pub const LIMIT_MAX_FILE_SIZE: usize = 64 * 1024;

/// Largest accepted `max_name_len` (NAME_MAX on common filesystems).
pub const LIMIT_MAX_NAME_LEN: usize = 255;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0} must be greater than zero")]
    Zero(&'static str),

    #[error("invalid config: {field} must be at most {max}")]
    TooLarge { field: &'static str, max: usize },
}

/// Fixed limits the file table is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FsConfig {
    /// Maximum number of files.
    pub max_files: usize,
    /// Capacity of each file's buffer.
    pub max_file_size: usize,
    /// Maximum name length in characters.
    pub max_name_len: usize,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl FsConfig {
    /// Set the file count limit.
    pub fn with_max_files(mut self, n: usize) -> Self {
        self.max_files = n;
        self
    }

    /// Set the per-file capacity.
    pub fn with_max_file_size(mut self, n: usize) -> Self {
        self.max_file_size = n;
        self
    }

    /// Set the name length limit.
    pub fn with_max_name_len(mut self, n: usize) -> Self {
        self.max_name_len = n;
        self
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: FsConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject zero limits and limits past the fixed upper bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("max_files", self.max_files, LIMIT_MAX_FILES),
            ("max_file_size", self.max_file_size, LIMIT_MAX_FILE_SIZE),
            ("max_name_len", self.max_name_len, LIMIT_MAX_NAME_LEN),
        ];
        for (field, value, max) in limits {
            if value == 0 {
                return Err(ConfigError::Zero(field));
            }
            if value > max {
                return Err(ConfigError::TooLarge { field, max });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = FsConfig::default();
        assert_eq!(cfg.max_files, 256);
        assert_eq!(cfg.max_file_size, 256);
        assert_eq!(cfg.max_name_len, 36);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = FsConfig::from_toml_str("max_files = 8\n").unwrap();
        assert_eq!(cfg.max_files, 8);
        assert_eq!(cfg.max_file_size, DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(FsConfig::from_toml_str("").unwrap(), FsConfig::default());
    }

    #[test]
    fn test_zero_rejected() {
        let err = FsConfig::from_toml_str("max_file_size = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Zero("max_file_size")));
    }

    #[test]
    fn test_oversized_rejected() {
        let err = FsConfig::from_toml_str("max_files = 9223372036854775807").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooLarge {
                field: "max_files",
                max: LIMIT_MAX_FILES
            }
        ));

        let err = FsConfig::default()
            .with_max_file_size(LIMIT_MAX_FILE_SIZE + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { field: "max_file_size", .. }));

        let err = FsConfig::default().with_max_name_len(256).validate().unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { field: "max_name_len", .. }));
    }

    #[test]
    fn test_upper_bounds_accepted() {
        let cfg = FsConfig::default()
            .with_max_files(LIMIT_MAX_FILES)
            .with_max_file_size(LIMIT_MAX_FILE_SIZE)
            .with_max_name_len(LIMIT_MAX_NAME_LEN);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = FsConfig::from_toml_str("max_dirs = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_files = 4\nmax_name_len = 12").unwrap();
        let cfg = FsConfig::load(file.path()).unwrap();
        assert_eq!(cfg.max_files, 4);
        assert_eq!(cfg.max_name_len, 12);
    }

    #[test]
    fn test_load_missing_file() {
        let err = FsConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
