//! Backup creation
//!
//! Archives the app data entries with `tar` and streams the result to a
//! loopback port, where `adb reverse` forwards it to a listener on the
//! operator's machine.

use tracing::info;

use super::layout::AppDataLayout;
use crate::config::BackupConfig;
use crate::error::FabResult;
use crate::exec::{CapturedExecutor, CapturedOutput, ProcessEngine};
use crate::shell::Command;

/// Builds and runs the archive-and-stream command
pub struct BackupCreator<'a> {
    config: &'a BackupConfig,
    layout: AppDataLayout,
}

impl<'a> BackupCreator<'a> {
    pub fn new(config: &'a BackupConfig) -> Self {
        Self::with_layout(config, AppDataLayout::default())
    }

    pub fn with_layout(config: &'a BackupConfig, layout: AppDataLayout) -> Self {
        Self { config, layout }
    }

    /// The shell script that creates and streams the archive
    pub fn command(&self) -> Command {
        let private_dir = self.config.paths.private_dir();
        let port = self.config.settings.port;
        let archive = self.config.paths.archive_file();

        let mut builder = Command::builder()
            // Shells without pipefail stop here.
            .line("set -e -o pipefail")
            .text("echo Streaming archive to 127.0.0.1:")
            .number(port)
            .line("")
            .line("echo The listener should have been set up with:")
            .text("echo '$ adb reverse tcp:")
            .number(port)
            .text(" tcp:")
            .number(port)
            .line("'")
            .text("echo '$ nc -l -s 127.0.0.1 -p ")
            .number(port)
            .text(" >' ")
            .file_name(archive)
            .line("")
            .line("set -x")
            .text("tar cz -C ")
            .path(private_dir)
            .text(" \\\n ");

        for entry in self.layout.entries() {
            builder = builder.text(" ").text(*entry);
        }

        builder
            .text(" \\\n  | nc 127.0.0.1 ")
            .number(port)
            .line("")
            .line("")
            .line("echo \"DONE: backup create finished.\"")
            .build()
    }

    /// Create the archive and stream it out
    pub fn run<E: ProcessEngine>(&self, executor: &CapturedExecutor<'_, E>) -> FabResult<CapturedOutput> {
        let command = self.command();
        info!(
            private_dir = %self.config.paths.private_dir(),
            port = self.config.settings.port,
            "streaming backup"
        );
        let output = executor.run_captured(&command)?;
        info!("backup successfully created and transferred");
        Ok(output)
    }
}
