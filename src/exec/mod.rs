//! Command execution
//!
//! - `engine`: fork/exec/wait primitive and process replacement
//! - `captured`: runs a command with its output captured to the shared log

pub mod captured;
pub mod engine;

pub use captured::{read_log, CapturedExecutor, CapturedOutput};
pub use engine::{sanity_check, ExecutionResult, PosixEngine, ProcessEngine};
