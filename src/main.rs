use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fab::cli::{handle_backup_command, handle_exec, handle_log, handle_sanity_check};
use fab::config::{AppPaths, BackupConfig, Settings};
use fab::exec::PosixEngine;
use fab::logging::{init_logging, DEFAULT_LOG_LEVEL};

#[derive(Parser)]
#[command(
    name = "fab",
    version,
    about = "Back up and restore an Android app's private data directory",
    long_about = "fab copies an app's private data directory out to a tar.gz archive \
                  streamed over a loopback port, and replays such an archive onto \
                  another device, swapping it in for the live data and stopping \
                  the app afterwards."
)]
struct Cli {
    /// Private app directory
    #[arg(long, global = true, env = "GRE_HOME")]
    private_dir: Option<String>,

    /// Shared app directory holding the archive and the log
    #[arg(long, global = true, env = "FAB_SHARED_DIR")]
    shared_dir: Option<String>,

    /// Package name used to derive the shared app directory
    #[arg(long, global = true, env = "MOZ_ANDROID_PACKAGE_NAME")]
    package: Option<String>,

    /// Settings file (JSON)
    #[arg(long, global = true, env = "FAB_SETTINGS")]
    settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify that commands can be executed on this device
    SanityCheck,

    /// Backup management commands
    #[command(subcommand)]
    Backup(fab::cli::BackupCommands),

    /// Run a shell command with its output captured to the log
    Exec {
        /// Command to run through /bin/sh -c
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Show the log of the last captured command
    Log,

    /// Show current configuration and paths
    Config {
        /// Write the effective settings to the --settings file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_or_default(cli.settings.as_deref())?;
    let level = if cli.verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    init_logging(level, settings.log_format)?;

    let engine = PosixEngine::new();

    let Some(command) = cli.command else {
        println!("fab - Android app data backup and restore");
        println!();
        println!("Run 'fab --help' for usage information.");
        println!("Run 'fab sanity-check' to verify that commands can run on this device.");
        return Ok(());
    };

    let resolve_paths = || {
        AppPaths::resolve(
            cli.private_dir.as_deref(),
            cli.shared_dir.as_deref(),
            cli.package.as_deref(),
            &settings,
        )
    };

    match command {
        Commands::SanityCheck => handle_sanity_check(&engine)?,
        Commands::Backup(cmd) => {
            let config = BackupConfig::new(resolve_paths()?, settings.clone());
            handle_backup_command(&config, &engine, cmd)?;
        }
        Commands::Exec { command } => handle_exec(&resolve_paths()?, &engine, &command)?,
        Commands::Log => handle_log(&resolve_paths()?)?,
        Commands::Config { save } => {
            if save {
                let path = cli
                    .settings
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("--save needs --settings or FAB_SETTINGS"))?;
                settings.save(path)?;
                println!("Settings written to {}", path.display());
                println!();
            }

            let paths = resolve_paths()?;
            println!("fab Configuration");
            println!("=================");
            println!("Private directory: {}", paths.private_dir());
            println!("Shared directory:  {}", paths.shared_dir());
            println!("Archive:           {}", paths.archive_file());
            println!("Log:               {}", paths.log_file());
            println!();
            println!("Settings:");
            println!("  Port: {}", settings.port);
            println!("  Staging directory name: {}", settings.staging_name);
            println!("  Trash directory name: {}", settings.trash_name);
            println!("  Cache trash directory name: {}", settings.cache_trash_name);
            println!("  Log format: {:?}", settings.log_format);
        }
    }

    Ok(())
}
