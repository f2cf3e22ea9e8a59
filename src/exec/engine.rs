//! Process execution engine
//!
//! Runs a command through `/bin/sh -c` using `fork`, `execv` and `waitpid`
//! directly, or replaces the calling process with the shell.

use std::convert::Infallible;
use std::ffi::{c_char, CString, NulError};
use std::io::Write;
use std::ptr;

use nix::errno::Errno;
use nix::libc;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, ForkResult};
use tracing::{debug, warn};

use crate::error::{FabError, FabResult};
use crate::shell::Command;

const SHELL: &str = "/bin/sh";

/// Outcome of a command that ran to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    pub exit_code: u8,
}

impl ExecutionResult {
    /// Decode an exit status, keeping only the low byte
    pub fn from_exit_status(status: i32) -> Self {
        Self {
            exit_code: (status & 0xFF) as u8,
        }
    }

    /// Encode termination by signal the way shells report it
    pub fn from_signal(signal: i32) -> Self {
        Self::from_exit_status(128 + signal)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Something that can run shell commands
pub trait ProcessEngine {
    /// Run `command` in a child process and wait for it to exit
    ///
    /// # Errors
    ///
    /// Returns `EngineFault` if the child could not be created or reaped.
    /// A command that fails on its own is reported through the exit code.
    fn spawn(&self, command: &Command) -> FabResult<ExecutionResult>;

    /// Replace the current process image with `command`
    ///
    /// Never returns on success.
    ///
    /// # Errors
    ///
    /// Returns `EngineFault` if the image could not be replaced; the caller
    /// keeps running in that case.
    fn spawn_replacing(&self, command: &Command) -> FabResult<Infallible>;
}

/// [`ProcessEngine`] backed by POSIX process primitives
#[derive(Debug, Clone, Copy)]
pub struct PosixEngine {
    shell: &'static str,
}

impl PosixEngine {
    pub fn new() -> Self {
        Self::with_shell(SHELL)
    }

    /// Engine running commands through another POSIX shell binary
    pub fn with_shell(shell: &'static str) -> Self {
        Self { shell }
    }

    pub fn shell(&self) -> &'static str {
        self.shell
    }
}

impl Default for PosixEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessEngine for PosixEngine {
    fn spawn(&self, command: &Command) -> FabResult<ExecutionResult> {
        // The child must not allocate: argv is fully built before forking.
        let argv = ShellArgv::new(self.shell, command)?;

        debug!(command = %command, shell = self.shell, "forking shell");
        // SAFETY: the child only calls execv and _exit, both async-signal-safe.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                let errno = argv.exec();
                // SAFETY: leaves without running atexit handlers or flushing
                // stdio buffers inherited from the parent.
                unsafe { libc::_exit(errno as i32) }
            }
            Ok(ForkResult::Parent { child }) => loop {
                match waitpid(child, None) {
                    Ok(WaitStatus::Exited(_, status)) => {
                        let result = ExecutionResult::from_exit_status(status);
                        debug!(pid = %child, exit_code = result.exit_code, "child exited");
                        return Ok(result);
                    }
                    Ok(WaitStatus::Signaled(_, signal, core_dumped)) => {
                        warn!(pid = %child, ?signal, core_dumped, "child terminated by signal");
                        return Ok(ExecutionResult::from_signal(signal as i32));
                    }
                    Ok(_) | Err(Errno::EINTR) => continue,
                    Err(errno) => return Err(FabError::engine("waitpid", errno)),
                }
            },
            Err(errno) => Err(FabError::engine("fork", errno)),
        }
    }

    fn spawn_replacing(&self, command: &Command) -> FabResult<Infallible> {
        let argv = ShellArgv::new(self.shell, command)?;

        debug!(command = %command, shell = self.shell, "replacing process image");
        // Buffered output would be lost with the old image.
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();

        Err(FabError::engine("execv", argv.exec()))
    }
}

/// Exit code `sanity_check` expects back from the shell
pub const SANITY_EXIT_CODE: u8 = 123;

/// Verify that commands can be run and their exit code observed
///
/// # Errors
///
/// Returns `SanityCheckFailed` if the shell reports a different exit code.
pub fn sanity_check<E: ProcessEngine>(engine: &E) -> FabResult<()> {
    let command = Command::builder().text("exit 123").build();
    let result = engine.spawn(&command)?;
    if result.exit_code != SANITY_EXIT_CODE {
        debug!(expected = SANITY_EXIT_CODE, got = result.exit_code, "sanity check mismatch");
        return Err(FabError::SanityCheckFailed {
            expected: SANITY_EXIT_CODE,
            actual: result.exit_code,
        });
    }
    Ok(())
}

/// `sh -c <command>` as C strings, with the null-terminated pointer array
/// `execv` expects
struct ShellArgv {
    path: CString,
    // Owns the strings `ptrs` points into.
    _args: [CString; 3],
    ptrs: [*const c_char; 4],
}

impl ShellArgv {
    fn new(shell: &str, command: &Command) -> FabResult<Self> {
        let nul = |_: NulError| FabError::engine("execv", Errno::EINVAL);
        let path = CString::new(shell).map_err(nul)?;
        let args = [
            CString::new("sh").map_err(nul)?,
            CString::new("-c").map_err(nul)?,
            CString::new(command.as_str()).map_err(nul)?,
        ];
        let ptrs = [args[0].as_ptr(), args[1].as_ptr(), args[2].as_ptr(), ptr::null()];
        Ok(Self {
            path,
            _args: args,
            ptrs,
        })
    }

    /// Replace the process image; only returns on failure
    fn exec(&self) -> Errno {
        // SAFETY: `path` and every non-null entry of `ptrs` point into
        // CStrings owned by `self`, and `ptrs` ends with a null pointer.
        unsafe { libc::execv(self.path.as_ptr(), self.ptrs.as_ptr()) };
        Errno::last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str) -> u8 {
        PosixEngine::new()
            .spawn(&Command::operator(script))
            .unwrap()
            .exit_code
    }

    #[test]
    fn test_exit_codes_match_shell() {
        assert_eq!(run("exit 0"), 0);
        assert_eq!(run("exit 1"), 1);
        assert_eq!(run("exit 123"), 123);
    }

    #[test]
    fn test_exit_code_keeps_low_byte() {
        assert_eq!(run("exit 255"), 255);
        assert_eq!(ExecutionResult::from_exit_status(256 + 7).exit_code, 7);
    }

    #[test]
    fn test_signal_reported_shell_style() {
        assert_eq!(run("kill -9 $$"), 128 + 9);
    }

    #[test]
    fn test_command_not_found_is_not_an_engine_fault() {
        assert_eq!(run("/nonexistent/binary/for/fab"), 127);
    }

    #[test]
    fn test_sanity_check() {
        assert!(sanity_check(&PosixEngine::new()).is_ok());
    }

    #[test]
    fn test_missing_shell_reported_through_exit_code() {
        let engine = PosixEngine::with_shell("/nonexistent/fab/sh");
        let result = engine.spawn(&Command::operator("exit 0")).unwrap();
        assert_eq!(result.exit_code, Errno::ENOENT as u8);
    }

    #[test]
    fn test_interior_nul_in_shell_rejected() {
        let err = PosixEngine::with_shell("/bin/\0sh")
            .spawn(&Command::operator("exit 0"))
            .unwrap_err();
        assert!(matches!(err, FabError::EngineFault { operation: "execv", .. }));
    }

    #[test]
    fn test_interior_nul_rejected() {
        let err = PosixEngine::new()
            .spawn(&Command::operator("exit\0 1"))
            .unwrap_err();
        assert!(matches!(err, FabError::EngineFault { operation: "execv", .. }));
    }
}
