//! User settings for fab
//!
//! Fixed names and numbers the backup pipeline depends on: the transfer port,
//! the names of files in the shared directory, and the names of the
//! transient directories used during restore.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backup::layout::AppDataLayout;
use crate::error::{FabError, FabResult};
use crate::logging::LogFormat;
use crate::shell::safe_path::is_safe;

/// Default port used to exchange backup data
pub const DEFAULT_PORT: u16 = 12101;

/// Settings for fab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Loopback port the backup archive is streamed to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Parent of the per-package shared directories
    #[serde(default = "default_shared_root")]
    pub shared_root: String,

    /// Archive file name in the shared directory
    #[serde(default = "default_archive_name")]
    pub archive_name: String,

    /// Log file name in the shared directory
    #[serde(default = "default_log_name")]
    pub log_name: String,

    /// Extraction directory, created inside `cache/`
    #[serde(default = "default_staging_name")]
    pub staging_name: String,

    /// Displaced originals, created inside `cache/`
    #[serde(default = "default_trash_name")]
    pub trash_name: String,

    /// Holding area used while swapping `cache/` itself
    #[serde(default = "default_cache_trash_name")]
    pub cache_trash_name: String,

    /// Diagnostic log output format
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_shared_root() -> String {
    "/sdcard/Android/data".to_string()
}

fn default_archive_name() -> String {
    "firefox-android-backup.tar.gz".to_string()
}

fn default_log_name() -> String {
    "firefox-android-backup.log".to_string()
}

fn default_staging_name() -> String {
    "firefox-android-backup.tmp".to_string()
}

fn default_trash_name() -> String {
    "firefox-android-trash.tmp".to_string()
}

fn default_cache_trash_name() -> String {
    "firefox-android-cache-trash.tmp".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: default_port(),
            shared_root: default_shared_root(),
            archive_name: default_archive_name(),
            log_name: default_log_name(),
            staging_name: default_staging_name(),
            trash_name: default_trash_name(),
            cache_trash_name: default_cache_trash_name(),
            log_format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, or use defaults if none is given or it doesn't exist
    pub fn load_or_default(path: Option<&Path>) -> FabResult<Self> {
        let settings = match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    FabError::Io(format!("Failed to read settings file: {}", e))
                })?;

                serde_json::from_str(&contents).map_err(|e| {
                    FabError::Config(format!("Failed to parse settings file: {}", e))
                })?
            }
            _ => Settings::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, path: &Path) -> FabResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| FabError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| FabError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Check names and numbers before they are used to build commands
    pub fn validate(&self) -> FabResult<()> {
        if self.port == 0 {
            return Err(FabError::Config("port must not be 0".into()));
        }

        let names = [
            ("archive_name", &self.archive_name),
            ("log_name", &self.log_name),
            ("staging_name", &self.staging_name),
            ("trash_name", &self.trash_name),
            ("cache_trash_name", &self.cache_trash_name),
        ];

        for (field, name) in names {
            if name == "." || name == ".." || name.contains('/') || !is_safe(&format!("/{}", name)) {
                return Err(FabError::Config(format!(
                    "{} must be a single file name, got '{}'",
                    field, name
                )));
            }
        }

        // The transient directories share `cache/` and the app directory with
        // the live data, so they must not shadow any of it or each other.
        let layout = AppDataLayout::default();
        let transient = &names[2..];
        for (i, (field, name)) in transient.iter().enumerate() {
            if layout.is_known(name) {
                return Err(FabError::Config(format!(
                    "{} collides with app data entry '{}'",
                    field, name
                )));
            }
            if transient[i + 1..].iter().any(|(_, other)| other == name) {
                return Err(FabError::Config(format!(
                    "{} '{}' is used more than once",
                    field, name
                )));
            }
        }

        if self.archive_name == self.log_name {
            return Err(FabError::Config(
                "archive_name and log_name must differ".into(),
            ));
        }

        Ok(())
    }
}
