// src/exec/windows.rs

use std::process::ExitStatus;

use crate::errors::ProcessError;

/// Windows always reports an exit code; a missing one is treated as an
/// abnormal termination.
pub(crate) fn check_exit(pid: u32, status: ExitStatus) -> Result<(), ProcessError> {
    if status.success() {
        return Ok(());
    }

    match status.code() {
        Some(code) => Err(ProcessError::NonZeroExit { pid, code }),
        None => Err(ProcessError::Terminated { pid, signal: None }),
    }
}
