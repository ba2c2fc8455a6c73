//! Subprocess execution and supervised command runs
//!
//! `execute` is the raw, domain-free layer: it launches a command,
//! blocks until exit, and captures output. `CommandRunner` layers the
//! diagnostic handling on top: captured stderr is always logged before
//! classification so the operator has context for any later prompt,
//! then the classifier decides whether to continue, abort, or ask.

use crate::classify::{classify, Classification};
use crate::error::{LayerError, Result};
use crate::gate::{ConfirmGate, Resolution};
use std::ffi::OsStr;
use std::process::Command;
use tracing::{debug, error, info, warn};

/// Result of one command invocation
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// Exit code (-1 if terminated by signal)
    pub exit_code: i32,

    /// Captured stdout
    pub stdout: String,

    /// Captured stderr
    pub stderr: String,

    /// Whether the process exited with status 0
    pub success: bool,
}

impl ProcessResult {
    /// Whether the invocation exited cleanly
    pub fn passed(&self) -> bool {
        self.success && self.exit_code == 0
    }
}

/// Launch a command and block until it exits, capturing output.
///
/// A launch failure (binary not found, permission denied) is structural:
/// it returns `LayerError::Launch` and is never classified or confirmed.
/// Any exit code after a successful launch is `Ok` — a non-zero exit or
/// non-empty stderr does not by itself indicate failure here.
pub fn execute<I, S>(program: &str, args: I) -> Result<ProcessResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|source| LayerError::Launch {
            command: program.to_string(),
            source,
        })?;

    Ok(ProcessResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    })
}

/// Command runner with diagnostic classification and a confirmation gate
pub struct CommandRunner<'g> {
    gate: &'g mut dyn ConfirmGate,
}

impl<'g> CommandRunner<'g> {
    pub fn new(gate: &'g mut dyn ConfirmGate) -> Self {
        CommandRunner { gate }
    }

    /// Run a command and route its stderr through the classifier.
    ///
    /// Fatal diagnostics abort the run; ambiguous ones suspend on the
    /// gate, where Abort raises `UserAborted` and Continue resumes the
    /// current step as if it had succeeded.
    pub fn run<I, S>(&mut self, program: &str, args: I) -> Result<ProcessResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let result = execute(program, args)?;

        if result.stderr.trim().is_empty() {
            return Ok(result);
        }

        // Always surface stderr before deciding anything, so the
        // operator has context for the prompt below.
        info!("{program} stderr:\n{}", result.stderr.trim_end());

        match classify(&result.stderr) {
            Classification::FalsePositive => {
                debug!("known benign installer diagnostic, continuing");
            }
            Classification::Warning => {
                warn!("{program} emitted warnings only, continuing");
            }
            Classification::Fatal => {
                error!("{program} stdout:\n{}", result.stdout.trim_end());
                return Err(LayerError::Docker(result.stderr.trim().to_string()));
            }
            Classification::Ambiguous => {
                error!("{program} stdout:\n{}", result.stdout.trim_end());
                let resolution = self.gate.confirm(
                    &format!("`{program}` produced the diagnostics above. Continue packaging?"),
                    "continuing at operator's request",
                    "aborting packaging run",
                );
                if resolution == Resolution::Abort {
                    return Err(LayerError::UserAborted);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::PolicyGate;

    #[test]
    fn test_execute_captures_stdout() {
        let result = execute("echo", ["hello"]).expect("execute failed");
        assert!(result.passed());
        assert_eq!(result.exit_code, 0);
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn test_execute_nonzero_exit_is_ok() {
        let result = execute("false", std::iter::empty::<&str>()).expect("execute failed");
        assert!(!result.passed());
        assert_ne!(result.exit_code, 0);
    }

    #[test]
    fn test_execute_missing_binary_is_launch_error() {
        let err = execute("definitely-not-a-real-binary", ["--version"]).unwrap_err();
        assert!(matches!(err, LayerError::Launch { .. }));
    }

    #[test]
    fn test_run_quiet_command_skips_classification() {
        let mut gate = PolicyGate(Resolution::Abort);
        let mut runner = CommandRunner::new(&mut gate);
        let result = runner.run("echo", ["ok"]).expect("run failed");
        assert!(result.passed());
    }

    #[test]
    fn test_run_warning_stderr_continues() {
        let mut gate = PolicyGate(Resolution::Abort);
        let mut runner = CommandRunner::new(&mut gate);
        let result = runner
            .run("sh", ["-c", "echo 'WARNING: old wrapper' >&2"])
            .expect("run failed");
        assert!(result.passed());
    }

    #[test]
    fn test_run_docker_stderr_is_fatal() {
        let mut gate = PolicyGate(Resolution::Continue);
        let mut runner = CommandRunner::new(&mut gate);
        let err = runner
            .run("sh", ["-c", "echo 'docker: Error response from daemon' >&2"])
            .unwrap_err();
        assert!(matches!(err, LayerError::Docker(_)));
    }

    #[test]
    fn test_run_ambiguous_stderr_honors_abort_policy() {
        let mut gate = PolicyGate(Resolution::Abort);
        let mut runner = CommandRunner::new(&mut gate);
        let err = runner
            .run("sh", ["-c", "echo 'no matching distribution found' >&2"])
            .unwrap_err();
        assert!(matches!(err, LayerError::UserAborted));
    }

    #[test]
    fn test_run_ambiguous_stderr_honors_continue_policy() {
        let mut gate = PolicyGate(Resolution::Continue);
        let mut runner = CommandRunner::new(&mut gate);
        let result = runner
            .run("sh", ["-c", "echo 'no matching distribution found' >&2"])
            .expect("run failed");
        assert!(result.passed());
    }
}
