//! Top-level runtime errors and their process exit codes.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::ScriptRef;

/// Errors a run of the runtime can fail with.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The named script was never registered.
    #[error("script not found: {0}")]
    ScriptNotFound(ScriptRef),

    /// The wall-clock `--timeout` elapsed before quiescence.
    #[error("run exceeded its timeout")]
    TimedOut,

    /// Configuration failed validation before the run could start.
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl RuntimeError {
    /// The exit code the CLI should return for this error.
    ///
    /// Mirrors the original driver's exit-code convention: `1` for a
    /// missing/invalid script, `2` for a timeout, anything else fatal.
    pub fn exit_code(&self) -> i32 {
        match self {
            RuntimeError::ScriptNotFound(_) | RuntimeError::ConfigError(_) => 1,
            RuntimeError::TimedOut => 2,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RuntimeError::TimedOut)
    }
}
