// src/exec/unix.rs

use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use crate::errors::ProcessError;

/// Map a POSIX wait status onto the process error taxonomy.
///
/// A status without an exit code means the child was killed by a signal.
pub(crate) fn check_exit(pid: u32, status: ExitStatus) -> Result<(), ProcessError> {
    if status.success() {
        return Ok(());
    }

    match status.code() {
        Some(code) => Err(ProcessError::NonZeroExit { pid, code }),
        None => Err(ProcessError::Terminated {
            pid,
            signal: status.signal(),
        }),
    }
}
