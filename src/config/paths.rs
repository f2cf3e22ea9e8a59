//! Path management for fab
//!
//! Resolves the two directory roots every command is built from.
//!
//! ## Path Resolution Order
//!
//! Private app directory:
//! 1. `--private-dir` / `GRE_HOME`
//!
//! Shared app directory:
//! 1. `--shared-dir` / `FAB_SHARED_DIR`
//! 2. `<shared_root>/<package>` with the package from `--package` /
//!    `MOZ_ANDROID_PACKAGE_NAME`
//!
//! Both must pass the path validator.

use crate::config::settings::Settings;
use crate::error::{FabError, FabResult};
use crate::shell::SafePath;

/// Manages all paths used by fab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Private app directory, e.g. `/data/user/0/org.mozilla.firefox`
    private_dir: SafePath,
    /// Shared app directory, e.g. `/sdcard/Android/data/org.mozilla.firefox`
    shared_dir: SafePath,
    archive_file: SafePath,
    log_file: SafePath,
}

impl AppPaths {
    /// Build paths from already-known roots
    pub fn new(private_dir: SafePath, shared_dir: SafePath, settings: &Settings) -> FabResult<Self> {
        let archive_file = shared_dir.join(&settings.archive_name)?;
        let log_file = shared_dir.join(&settings.log_name)?;
        Ok(Self {
            private_dir,
            shared_dir,
            archive_file,
            log_file,
        })
    }

    /// Resolve paths from lookups, in the order documented above
    ///
    /// # Errors
    ///
    /// Returns `Config` if a root cannot be determined and `PathRejected` if
    /// a root is unsafe to use in a shell command.
    pub fn resolve(
        private_dir: Option<&str>,
        shared_dir: Option<&str>,
        package: Option<&str>,
        settings: &Settings,
    ) -> FabResult<Self> {
        let private_dir = private_dir
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                FabError::Config("Private app directory unknown: set GRE_HOME or --private-dir".into())
            })
            .and_then(SafePath::new)?;

        let shared_dir = match shared_dir.filter(|p| !p.is_empty()) {
            Some(dir) => SafePath::new(dir)?,
            None => {
                let package = package.filter(|p| !p.is_empty()).ok_or_else(|| {
                    FabError::Config(
                        "Shared app directory unknown: set MOZ_ANDROID_PACKAGE_NAME, --package or --shared-dir"
                            .into(),
                    )
                })?;
                SafePath::new(settings.shared_root.as_str())?.join(package)?
            }
        };

        Self::new(private_dir, shared_dir, settings)
    }

    pub fn private_dir(&self) -> &SafePath {
        &self.private_dir
    }

    pub fn shared_dir(&self) -> &SafePath {
        &self.shared_dir
    }

    /// Backup archive in the shared directory
    pub fn archive_file(&self) -> &SafePath {
        &self.archive_file
    }

    /// Captured command output in the shared directory
    pub fn log_file(&self) -> &SafePath {
        &self.log_file
    }
}
