//! Command execution CLI commands
//!
//! Direct access to the execution engine: a sanity check, running an
//! operator-typed command with its output captured, and showing the log.

use crate::backup::read_last_log;
use crate::config::AppPaths;
use crate::error::FabResult;
use crate::exec::{sanity_check, CapturedExecutor, CapturedOutput, ProcessEngine};
use crate::shell::Command;

/// Verify that fab can run code on this device
pub fn handle_sanity_check<E: ProcessEngine>(engine: &E) -> FabResult<()> {
    sanity_check(engine)?;
    println!("Sanity check passed: commands run and report their exit code.");
    Ok(())
}

/// Run an operator command with its output captured to the log
pub fn handle_exec<E: ProcessEngine>(
    paths: &AppPaths,
    engine: &E,
    words: &[String],
) -> FabResult<()> {
    let command = Command::operator(words.join(" "));
    let executor = CapturedExecutor::for_paths(engine, paths);
    let result = executor.run_captured(&command);
    print_captured(&result);
    result.map(|_| ())
}

/// Print what a captured command wrote, whether it failed or not
pub(crate) fn print_captured(result: &FabResult<CapturedOutput>) {
    let output = match result {
        Ok(captured) => captured.output.as_deref(),
        Err(e) => e.captured_output(),
    };
    if let Some(output) = output {
        print!("{}", output);
    }
}

/// Print the log of the last captured command
pub fn handle_log(paths: &AppPaths) -> FabResult<()> {
    print!("{}", read_last_log(paths)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::PosixEngine;
    use crate::shell::SafePath;
    use tempfile::TempDir;

    fn paths_in(temp: &TempDir) -> AppPaths {
        let root = SafePath::try_from(temp.path()).unwrap();
        AppPaths::new(
            root.join("app").unwrap(),
            root.join("shared").unwrap(),
            &crate::config::Settings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_exec_failure_keeps_log() {
        let temp = TempDir::new().unwrap();
        let paths = paths_in(&temp);
        let words = vec!["echo".to_string(), "hi;".to_string(), "exit 3".to_string()];

        let err = handle_exec(&paths, &PosixEngine::new(), &words).unwrap_err();
        assert_eq!(err.captured_output(), Some("hi\n"));
        assert_eq!(read_last_log(&paths).unwrap(), "hi\n");
    }

    #[test]
    fn test_sanity_check_handler() {
        assert!(handle_sanity_check(&PosixEngine::new()).is_ok());
    }
}
