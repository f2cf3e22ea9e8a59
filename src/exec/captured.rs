//! Output-capturing execution
//!
//! Redirects everything a command prints into the shared log file, runs it,
//! and reads the log back so the operator can see what happened.

use std::fs;

use tracing::{info, warn};

use super::engine::ProcessEngine;
use crate::config::AppPaths;
use crate::error::{FabError, FabResult};
use crate::shell::{Command, SafePath};

/// Result of a captured command that exited with status 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: u8,
    /// Log contents, `None` if the log could not be read back
    pub output: Option<String>,
}

/// Runs commands with their combined output captured to a log file
pub struct CapturedExecutor<'e, E: ProcessEngine> {
    engine: &'e E,
    shared_dir: SafePath,
    log_file: SafePath,
    echo: bool,
}

impl<'e, E: ProcessEngine> CapturedExecutor<'e, E> {
    pub fn new(engine: &'e E, shared_dir: SafePath, log_file: SafePath) -> Self {
        Self {
            engine,
            shared_dir,
            log_file,
            echo: false,
        }
    }

    /// Executor writing to the log file in the shared app directory
    pub fn for_paths(engine: &'e E, paths: &AppPaths) -> Self {
        Self::new(engine, paths.shared_dir().clone(), paths.log_file().clone())
    }

    /// Print captured output to stdout after every run, failed or not
    pub fn echo_output(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn engine(&self) -> &'e E {
        self.engine
    }

    pub fn log_file(&self) -> &SafePath {
        &self.log_file
    }

    /// The command actually handed to the shell
    pub fn wrap(&self, command: &Command) -> Command {
        Command::builder()
            .text("mkdir -p ")
            .path(&self.shared_dir)
            .text("\nexec 2>")
            .path(&self.log_file)
            .line(" 1>&2")
            .line("")
            .command(command)
            .build()
    }

    /// Run a command, capturing stdout and stderr to the log file
    ///
    /// # Errors
    ///
    /// Returns `CommandFailed` with the exit code and whatever was captured
    /// when the command exits non-zero, or `EngineFault` if it could not run.
    pub fn run_captured(&self, command: &Command) -> FabResult<CapturedOutput> {
        let result = self.engine.spawn(&self.wrap(command))?;
        let output = match read_log(&self.log_file) {
            Ok(output) => {
                if self.echo {
                    print!("{}", output);
                }
                Some(output)
            }
            Err(e) => {
                warn!(log = %self.log_file, error = %e, "failed to read captured output");
                None
            }
        };

        if !result.success() {
            return Err(FabError::CommandFailed {
                exit_code: result.exit_code,
                output: output.unwrap_or_default(),
            });
        }

        info!(log = %self.log_file, "command finished");
        Ok(CapturedOutput {
            exit_code: result.exit_code,
            output,
        })
    }
}

/// Read a log file written by a captured command
pub fn read_log(log_file: &SafePath) -> FabResult<String> {
    fs::read(log_file.as_path())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| FabError::LogRead(format!("{}: {}", log_file, e)))
}
