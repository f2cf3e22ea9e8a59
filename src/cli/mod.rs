//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup and exec layers.

pub mod backup;
pub mod exec;

pub use backup::{handle_backup_command, BackupCommands};
pub use exec::{handle_exec, handle_log, handle_sanity_check};
