//! Configuration module for fab
//!
//! This module provides configuration management including:
//! - Directory roots resolved from environment-style lookups
//! - Settings persistence (ports, file and directory names)

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::Settings;

/// Everything the backup pipelines are built from
#[derive(Debug, Clone)]
pub struct BackupConfig {
    pub paths: AppPaths,
    pub settings: Settings,
}

impl BackupConfig {
    pub fn new(paths: AppPaths, settings: Settings) -> Self {
        Self { paths, settings }
    }
}
