//! Storage configuration.
//!
//! Provides where the session and identity records live on disk.

use std::{env, path::PathBuf};

use crate::identity::IdentityStore;
use crate::store::{FileStorage, SessionStore};
use crate::table::TableService;

pub const DEFAULT_DATA_DIR: &str = ".tinpatti";
pub const DEFAULT_SESSION_FILE: &str = "tinpatti-game-session.json";
pub const DEFAULT_IDENTITY_FILE: &str = "tinpatti-session.json";

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding both records
    pub data_dir: PathBuf,

    /// File name of the shared session record
    pub session_file: String,

    /// File name of the local identity record
    pub identity_file: String,
}

impl StorageConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `TINPATTI_DATA_DIR`: Directory for records (default: `.tinpatti`)
    /// - `TINPATTI_SESSION_FILE`: Session record file name
    ///   (default: `tinpatti-game-session.json`)
    /// - `TINPATTI_IDENTITY_FILE`: Identity record file name
    ///   (default: `tinpatti-session.json`)
    pub fn from_env() -> Self {
        Self {
            data_dir: env::var("TINPATTI_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            session_file: env::var("TINPATTI_SESSION_FILE")
                .unwrap_or_else(|_| DEFAULT_SESSION_FILE.to_string()),
            identity_file: env::var("TINPATTI_IDENTITY_FILE")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_FILE.to_string()),
        }
    }

    /// Validate configuration after loading
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for empty names, names containing a
    /// path separator, or both records pointing at the same file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                var: "TINPATTI_DATA_DIR".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        for (var, name) in [
            ("TINPATTI_SESSION_FILE", &self.session_file),
            ("TINPATTI_IDENTITY_FILE", &self.identity_file),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: "Must not be empty".to_string(),
                });
            }
            if name.contains(['/', '\\']) {
                return Err(ConfigError::Invalid {
                    var: var.to_string(),
                    reason: "Must be a file name, not a path".to_string(),
                });
            }
        }

        if self.session_file == self.identity_file {
            return Err(ConfigError::Invalid {
                var: "TINPATTI_IDENTITY_FILE".to_string(),
                reason: "Must differ from the session file".to_string(),
            });
        }

        Ok(())
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(&self.session_file)
    }

    pub fn identity_path(&self) -> PathBuf {
        self.data_dir.join(&self.identity_file)
    }

    /// Open the shared table backed by the session file.
    pub fn open_table(&self) -> TableService<FileStorage> {
        TableService::open(SessionStore::new(FileStorage::new(self.session_path())))
    }

    pub fn identity_store(&self) -> IdentityStore<FileStorage> {
        IdentityStore::new(FileStorage::new(self.identity_path()))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            session_file: DEFAULT_SESSION_FILE.to_string(),
            identity_file: DEFAULT_IDENTITY_FILE.to_string(),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}
