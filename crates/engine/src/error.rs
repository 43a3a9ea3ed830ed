// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the templating-and-execution pipeline.

/// Plumbing error from the process executor.
///
/// Exit-code failures are *not* errors at this layer — the executor returns
/// an [`crate::ExecutionOutcome`] for every termination mode and leaves the
/// failure decision to the runner. Only a command that could not be started
/// at all fails the call.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The shell could not be spawned (missing interpreter, bad cwd, ...).
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
}

/// Per-item failure surfaced at the batch boundary.
///
/// Every variant names the offending command and item position, so an abort
/// message always identifies where the batch stopped.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The resolved command was empty after trimming whitespace. Never
    /// suppressed by `ignore_errors` — that flag only governs process exit
    /// codes.
    #[error("command cannot be empty (item {item_index})")]
    EmptyCommand { item_index: usize },

    /// The process exited with a non-zero status.
    #[error("command `{command}` failed with exit code {exit_code} (item {item_index}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
        item_index: usize,
    },

    /// The process was killed at the wall-clock timeout.
    #[error("command `{command}` timed out after {timeout_millis}ms (item {item_index})")]
    TimedOut {
        command: String,
        timeout_millis: u64,
        item_index: usize,
    },

    /// Captured output exceeded the ceiling and execution was aborted.
    #[error("command `{command}` exceeded the {limit_bytes}-byte output ceiling (item {item_index})")]
    OutputOverflow {
        command: String,
        limit_bytes: usize,
        item_index: usize,
    },

    /// The command could not be started.
    #[error("failed to spawn `{command}` (item {item_index}): {source}")]
    Spawn {
        command: String,
        item_index: usize,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    /// Position of the item that raised this error.
    pub fn item_index(&self) -> usize {
        match self {
            RunError::EmptyCommand { item_index }
            | RunError::CommandFailed { item_index, .. }
            | RunError::TimedOut { item_index, .. }
            | RunError::OutputOverflow { item_index, .. }
            | RunError::Spawn { item_index, .. } => *item_index,
        }
    }
}
