//! Backup CLI commands
//!
//! Implements CLI commands for creating, restoring and housekeeping backups.

use clap::Subcommand;

use crate::backup::{
    cleanup_transfer_files, BackupCreator, RestoreOrchestrator, TransferFileInfo,
};
use crate::config::BackupConfig;
use crate::error::FabResult;
use crate::exec::{sanity_check, CapturedExecutor, ProcessEngine};

use super::exec::print_captured;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Archive the app data and stream it to the loopback port
    Create,

    /// Replace the app data with the archive in the shared directory
    ///
    /// The app process is terminated afterwards.
    Restore {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show the archive and log in the shared directory
    Info,

    /// Delete the archive and log from the shared directory
    Cleanup,
}

/// Handle a backup command
pub fn handle_backup_command<E: ProcessEngine>(
    config: &BackupConfig,
    engine: &E,
    cmd: BackupCommands,
) -> FabResult<()> {
    let executor = CapturedExecutor::for_paths(engine, &config.paths);

    match cmd {
        BackupCommands::Create => {
            sanity_check(engine)?;

            let port = config.settings.port;
            println!("Streaming {} to 127.0.0.1:{}", config.settings.archive_name, port);
            println!("The listener should have been set up with:");
            println!("  $ adb reverse tcp:{} tcp:{}", port, port);
            println!(
                "  $ nc -l -s 127.0.0.1 -p {} > {}",
                port, config.settings.archive_name
            );
            println!();

            let result = BackupCreator::new(config).run(&executor);
            print_captured(&result);
            result?;
            println!("Backup successfully created and transferred!");
        }

        BackupCommands::Restore { force } => {
            let orchestrator = RestoreOrchestrator::new(config)?;
            let archive = TransferFileInfo::inspect(config.paths.archive_file());

            println!("Restore");
            println!("=======");
            print_file_info("Archive", &archive);
            println!("App directory: {}", config.paths.private_dir());
            println!("Staging:       {}", orchestrator.workspace().staging);
            println!("Trash:         {}", orchestrator.workspace().trash);
            println!();

            if !force {
                println!("WARNING: This will replace the app data with the archive contents!");
                println!("The app will be force-stopped afterwards to avoid data corruption.");
                println!("To proceed, run again with --force flag:");
                println!("  fab backup restore --force");
                return Ok(());
            }

            sanity_check(engine)?;
            println!("Restoring from backup...");
            println!("Logs: {}", config.paths.log_file());
            // Output has to be shown before the process is replaced.
            let executor = executor.echo_output(true);
            let never = orchestrator.restore(&executor)?;
            match never {}
        }

        BackupCommands::Info => {
            println!("Backup Details");
            println!("==============");
            print_file_info("Archive", &TransferFileInfo::inspect(config.paths.archive_file()));
            print_file_info("Log", &TransferFileInfo::inspect(config.paths.log_file()));
        }

        BackupCommands::Cleanup => {
            let removed = cleanup_transfer_files(&config.paths)?;
            if removed.is_empty() {
                println!("Nothing to clean up.");
            }
            for path in removed {
                println!("Removed {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_file_info(label: &str, info: &TransferFileInfo) {
    println!("{}: {}", label, info.path.display());
    if !info.exists() {
        println!("  (missing)");
        return;
    }
    if let Some(size) = info.size_bytes {
        println!("  Size: {}", format_size(size));
    }
    if let Some(modified) = info.modified_at {
        let age = chrono::Utc::now().signed_duration_since(modified);
        println!(
            "  Modified: {} ({} ago)",
            modified.format("%Y-%m-%d %H:%M:%S UTC"),
            format_duration(age)
        );
    }
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    format!("{}d", hours / 24)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
