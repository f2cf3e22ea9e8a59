//! fab - Android app data backup and restore
//!
//! This library copies an application's private data directory out to a
//! compressed archive and replays such an archive onto another device,
//! swapping it in for the live data. It is meant to run inside the app's own
//! process, reached through a privileged debugging channel.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Directory roots and settings
//! - `error`: Custom error types
//! - `shell`: Path validation and typed shell command construction
//! - `exec`: fork/exec/wait engine and output-capturing executor
//! - `backup`: Backup creation and restore pipelines
//! - `logging`: Diagnostic log setup
//! - `cli`: Command-line handlers
//!
//! Pipelines only build commands; `exec::PosixEngine` is the only part that
//! touches process primitives.
//!
//! # Example
//!
//! ```rust,ignore
//! use fab::config::{AppPaths, BackupConfig, Settings};
//! use fab::backup::BackupCreator;
//! use fab::exec::{CapturedExecutor, PosixEngine};
//!
//! let settings = Settings::default();
//! let paths = AppPaths::resolve(Some("/data/user/0/org.mozilla.firefox"), None,
//!     Some("org.mozilla.firefox"), &settings)?;
//! let engine = PosixEngine::new();
//! let executor = CapturedExecutor::for_paths(&engine, &paths);
//! let config = BackupConfig::new(paths, settings);
//! BackupCreator::new(&config).run(&executor)?;
//! ```

#[cfg(not(unix))]
compile_error!("fab only supports POSIX systems");

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod shell;

pub use error::{FabError, FabResult};
