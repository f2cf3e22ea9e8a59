//! Transfer file housekeeping
//!
//! The archive and the log are left in the shared directory after a run so
//! the operator can inspect them; these helpers report on and remove them.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::AppPaths;
use crate::error::{FabError, FabResult};
use crate::shell::SafePath;

/// Metadata about a file in the shared directory
#[derive(Debug, Clone)]
pub struct TransferFileInfo {
    pub path: PathBuf,
    /// `None` if the file doesn't exist
    pub size_bytes: Option<u64>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl TransferFileInfo {
    pub fn inspect(path: &SafePath) -> Self {
        let metadata = fs::metadata(path.as_path()).ok().filter(|m| m.is_file());
        Self {
            path: path.as_path().to_path_buf(),
            size_bytes: metadata.as_ref().map(|m| m.len()),
            modified_at: metadata
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Utc>::from),
        }
    }

    pub fn exists(&self) -> bool {
        self.size_bytes.is_some()
    }
}

/// Delete the log and the archive from the shared directory
///
/// Returns the files that were actually removed; missing files are skipped.
pub fn cleanup_transfer_files(paths: &AppPaths) -> FabResult<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for file in [paths.log_file(), paths.archive_file()] {
        match fs::remove_file(file.as_path()) {
            Ok(()) => {
                debug!(path = %file, "removed");
                removed.push(file.as_path().to_path_buf());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(FabError::Io(format!("Failed to remove {}: {}", file, e)));
            }
        }
    }

    Ok(removed)
}

/// Read the log of the last captured command
pub fn read_last_log(paths: &AppPaths) -> FabResult<String> {
    let log = paths.log_file();
    if !log.as_path().exists() {
        return Err(FabError::NotFound {
            entity_type: "Log file",
            identifier: log.to_string(),
        });
    }
    crate::exec::read_log(log)
}
