//! Every child the engine starts is waited for.
//!
//! Kept in its own test binary: a process-wide `waitpid` would race with
//! children started by other tests.

use fab::exec::{PosixEngine, ProcessEngine};
use fab::shell::Command;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag};

#[test]
fn test_no_child_outlives_spawn() {
    let engine = PosixEngine::new();

    let commands = [
        "true",
        "exit 7",
        "kill -9 $$",
        "exec /nonexistent/binary",
        "echo to stdout; echo to stderr 1>&2",
    ];
    for script in commands {
        engine.spawn(&Command::operator(script)).unwrap();
    }

    // The child fails before its image is replaced.
    let missing_shell = PosixEngine::with_shell("/nonexistent/fab/sh");
    let result = missing_shell.spawn(&Command::operator("exit 0")).unwrap();
    assert_eq!(result.exit_code, Errno::ENOENT as u8);

    assert_eq!(
        waitpid(None, Some(WaitPidFlag::WNOHANG)).unwrap_err(),
        Errno::ECHILD
    );
}
