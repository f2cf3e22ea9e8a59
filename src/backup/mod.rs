//! Backup system for fab
//!
//! Copies an app's private data directory out as a compressed tar stream and
//! swaps an archive back in on another device.
//!
//! # Architecture
//!
//! - `BackupCreator`: archives the app data entries and streams them to a
//!   loopback port
//! - `RestoreOrchestrator`: extracts an archive and swaps it in for the live
//!   data, then terminates the app process
//! - `cleanup`: reports on and removes the archive and log
//!
//! Both pipelines only build shell scripts; running them goes through
//! `CapturedExecutor`, so the full shell trace ends up in the shared log.
//!
//! # Example
//!
//! ```rust,ignore
//! use fab::backup::RestoreOrchestrator;
//! use fab::exec::{CapturedExecutor, PosixEngine};
//!
//! let engine = PosixEngine::new();
//! let executor = CapturedExecutor::new(&engine, shared_dir, log_file);
//! let orchestrator = RestoreOrchestrator::new(&config)?;
//! // Only returns if something went wrong.
//! let err = orchestrator.restore(&executor).unwrap_err();
//! ```

pub mod cleanup;
mod create;
pub mod layout;
mod restore;

pub use cleanup::{cleanup_transfer_files, read_last_log, TransferFileInfo};
pub use create::BackupCreator;
pub use layout::AppDataLayout;
pub use restore::{terminate_command, RestoreOrchestrator, RestoreWorkspace};
