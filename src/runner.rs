//! External process execution.
//!
//! Editors and git run as blocking child processes. Interactive runs share
//! the caller's terminal so editors and credential prompts behave normally;
//! capture runs collect stdout for advisory checks.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::ZetError;

/// Trait for running external programs.
///
/// Every call names the working directory explicitly. Implementations must
/// not depend on the process-wide current directory.
pub trait ProcessRunner {
    /// Runs `program` with the caller's stdin, stdout, and stderr attached.
    ///
    /// Blocks until the program exits. A non-zero exit is an error; the
    /// caller decides whether it is fatal.
    fn run_interactive(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<(), ZetError>;

    /// Runs `program` and returns its standard output.
    ///
    /// Failures are logged and produce an empty string.
    fn run_capture(&self, cwd: &Path, program: &str, args: &[&str]) -> String;
}

/// [`ProcessRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

fn check_cwd(cwd: &Path) -> Result<(), ZetError> {
    if cwd.is_dir() {
        Ok(())
    } else {
        Err(ZetError::io(cwd, io::Error::from(io::ErrorKind::NotFound)))
    }
}

fn spawn_error(program: &str, source: io::Error) -> ZetError {
    match source.kind() {
        io::ErrorKind::NotFound => ZetError::ExecutableNotFound(program.to_string()),
        _ => ZetError::Spawn {
            program: program.to_string(),
            source,
        },
    }
}

impl ProcessRunner for SystemRunner {
    fn run_interactive(&self, cwd: &Path, program: &str, args: &[&str]) -> Result<(), ZetError> {
        if program.is_empty() {
            return Err(ZetError::MissingExecutable);
        }
        check_cwd(cwd)?;
        debug!(program, ?args, cwd = %cwd.display(), "exec");

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| spawn_error(program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(ZetError::CommandFailed {
                program: program.to_string(),
                code: status.code(),
            })
        }
    }

    fn run_capture(&self, cwd: &Path, program: &str, args: &[&str]) -> String {
        if program.is_empty() {
            warn!("{}", ZetError::MissingExecutable);
            return String::new();
        }
        if check_cwd(cwd).is_err() {
            warn!(cwd = %cwd.display(), "working directory does not exist");
            return String::new();
        }
        debug!(program, ?args, cwd = %cwd.display(), "capture");

        let output = match Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                warn!(program, error = %e, "failed to start");
                return String::new();
            }
        };

        if !output.status.success() {
            let err = ZetError::CommandFailed {
                program: program.to_string(),
                code: output.status.code(),
            };
            warn!(stderr = %String::from_utf8_lossy(&output.stderr).trim(), "{err}");
            return String::new();
        }
        String::from_utf8_lossy(&output.stdout).into_owned()
    }
}
