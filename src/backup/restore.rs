//! Backup restoration
//!
//! Replaces the live app data entries with the ones from the archive in the
//! shared directory. There is no transactional rename for directories, so the
//! swap is a sequence of moves run by one `set -e` shell script:
//!
//! 1. Remove leftovers of an interrupted run, create staging and trash.
//! 2. Extract the archive into staging.
//! 3. For each extracted entry except `lib`, `.nomedia` and `cache`, move the
//!    live entry (if any) to trash and the staged entry into its place.
//! 4. If the archive has `cache`, swap it last with its own ordering: staging
//!    and trash both live inside the live `cache`.
//! 5. Delete trash and staging.
//!
//! A failure stops the script where it is. Entries already swapped stay
//! swapped and the displaced originals of the failing step remain in trash;
//! nothing is rolled back.
//!
//! After a successful swap the app process is replaced by `exit 0`, because
//! it would otherwise keep running against data that changed underneath it.

use std::convert::Infallible;

use tracing::{info, warn};

use super::layout::{AppDataLayout, CACHE_ENTRY, EXCLUDED_ENTRIES};
use crate::config::{BackupConfig, Settings};
use crate::error::FabResult;
use crate::exec::{CapturedExecutor, CapturedOutput, ProcessEngine};
use crate::shell::{Command, SafePath};

/// Transient directories owned by a single restore run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreWorkspace {
    /// `<private>/cache/<staging_name>`, extraction target
    pub staging: SafePath,
    /// `<private>/cache/<trash_name>`, displaced originals
    pub trash: SafePath,
    /// `<private>/<cache_trash_name>`, used only while swapping `cache`
    pub cache_trash: SafePath,
    /// Where the staged `cache` ends up once the live `cache` is moved into
    /// `cache_trash`
    pub nested_cache: SafePath,
}

impl RestoreWorkspace {
    pub fn new(private_dir: &SafePath, settings: &Settings) -> FabResult<Self> {
        // Kept under cache/ so the user can clear leftovers via App Info.
        let live_cache = private_dir.join(CACHE_ENTRY)?;
        let cache_trash = private_dir.join(&settings.cache_trash_name)?;
        let nested_cache = cache_trash
            .join(CACHE_ENTRY)?
            .join(&settings.staging_name)?
            .join(CACHE_ENTRY)?;

        Ok(Self {
            staging: live_cache.join(&settings.staging_name)?,
            trash: live_cache.join(&settings.trash_name)?,
            cache_trash,
            nested_cache,
        })
    }
}

/// Builds and runs the directory swap, then terminates the app
pub struct RestoreOrchestrator<'a> {
    config: &'a BackupConfig,
    layout: AppDataLayout,
    workspace: RestoreWorkspace,
}

impl<'a> RestoreOrchestrator<'a> {
    pub fn new(config: &'a BackupConfig) -> FabResult<Self> {
        let workspace = RestoreWorkspace::new(config.paths.private_dir(), &config.settings)?;
        Ok(Self {
            config,
            layout: AppDataLayout::default(),
            workspace,
        })
    }

    pub fn workspace(&self) -> &RestoreWorkspace {
        &self.workspace
    }

    /// The swap script
    pub fn command(&self) -> Command {
        let app = self.config.paths.private_dir();
        let archive = self.config.paths.archive_file();
        let ws = &self.workspace;

        let mut builder = Command::builder()
            .line("set -ex")
            .text("rm -rf ")
            .paths([&ws.staging, &ws.trash, &ws.cache_trash])
            .line("")
            .text("mkdir -p ")
            .paths([&ws.staging, &ws.trash])
            .line("")
            .text("echo Retrieving backup from ")
            .path(archive)
            .line("")
            .text("tar xz -C ")
            .path(&ws.staging)
            .text(" -f ")
            .path(archive)
            .line("")
            .text("cd ")
            .path(&ws.staging)
            .line("")
            .line("for entry in * ; do")
            // An empty archive leaves the glob unexpanded.
            .line("  [ -e \"$entry\" ] || [ -L \"$entry\" ] || continue");

        for skipped in EXCLUDED_ENTRIES.iter().chain([&CACHE_ENTRY]) {
            builder = builder
                .text("  [ \"$entry\" != ")
                .text(*skipped)
                .line(" ] || continue");
        }

        let builder = builder
            .text("  if [ -e ")
            .path(app)
            .text("/\"$entry\" ] || [ -L ")
            .path(app)
            .line("/\"$entry\" ] ; then")
            .text("    mv ")
            .path(app)
            .text("/\"$entry\" ")
            .path(&ws.trash)
            .line("/")
            .line("  fi")
            .text("  mv ")
            .path(&ws.staging)
            .text("/\"$entry\" ")
            .path(app)
            .line("/")
            .line("done")
            .line("cd /");

        let builder = if self.layout.includes_cache() {
            // The live cache holds staging and trash, so it cannot be moved
            // into trash directly.
            builder
                .text("if [ -d ")
                .path(&ws.staging)
                .text("/")
                .text(CACHE_ENTRY)
                .line(" ] ; then")
                .text("  mv ")
                .paths([&ws.trash, &ws.cache_trash])
                .line("")
                .text("  mv ")
                .path(app)
                .text("/")
                .text(CACHE_ENTRY)
                .text(" ")
                .path(&ws.cache_trash)
                .line("/")
                .text("  mv ")
                .path(&ws.nested_cache)
                .text(" ")
                .path(app)
                .text("/")
                .line(CACHE_ENTRY)
                .text("  mv ")
                .paths([&ws.cache_trash, &ws.trash])
                .line("")
                .line("fi")
        } else {
            builder
        };

        builder
            .text("rm -rf ")
            .paths([&ws.trash, &ws.staging])
            .line("")
            .line("")
            .line("echo \"DONE: backup restore finished.\"")
            .build()
    }

    /// Swap the archive contents in for the live data
    ///
    /// # Errors
    ///
    /// Returns `CommandFailed` if any step of the swap fails. The app
    /// directory may then hold a mix of restored and original entries.
    pub fn restore_data<E: ProcessEngine>(
        &self,
        executor: &CapturedExecutor<'_, E>,
    ) -> FabResult<CapturedOutput> {
        info!(
            archive = %self.config.paths.archive_file(),
            app_dir = %self.config.paths.private_dir(),
            "restoring backup"
        );
        let output = executor.run_captured(&self.command()).map_err(|e| {
            if e.is_command_failed() {
                warn!(
                    trash = %self.workspace.trash,
                    "restore aborted; displaced originals may remain in trash"
                );
            }
            e
        })?;
        info!("backup restored");
        Ok(output)
    }

    /// Restore the data, then replace the current process so the app stops
    ///
    /// Only returns on failure.
    pub fn restore<E: ProcessEngine>(
        &self,
        executor: &CapturedExecutor<'_, E>,
    ) -> FabResult<Infallible> {
        self.restore_data(executor)?;
        info!("terminating app process to avoid data corruption");
        executor.engine().spawn_replacing(&terminate_command())
    }
}

/// Replaces the app process once the swap is done
pub fn terminate_command() -> Command {
    Command::builder().text("exit 0").build()
}
