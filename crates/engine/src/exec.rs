// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell-mode child-process execution with timeout and output-ceiling
//! enforcement.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tokio::io::AsyncReadExt;

use crate::error::ExecError;

/// Fixed ceiling on captured output, combined across stdout and stderr.
pub const OUTPUT_CEILING_BYTES: usize = 10 * 1024 * 1024;

const READ_CHUNK_BYTES: usize = 8192;

/// Captured result of running one resolved command.
///
/// Produced exactly once per executed command, for every termination mode —
/// normal exit, non-zero exit, timeout kill, and output overflow all yield an
/// outcome rather than an error.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    /// Real exit status on normal exit; `-1` sentinel when the process was
    /// killed (timeout, overflow, signal) and no status is available.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Process was still running at the wall-clock deadline and was killed.
    pub timed_out: bool,
    /// Combined output hit the ceiling and execution was aborted.
    pub truncated: bool,
}

impl ExecutionOutcome {
    /// True only when the process exited normally with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.timed_out && !self.truncated
    }
}

/// Runs resolved commands through `/bin/sh -c`.
///
/// The base environment is an explicit snapshot injected at construction, not
/// ambient process state read at run time — tests substitute a controlled
/// environment via [`ProcessExecutor::with_base_env`]. Each execution gets an
/// independent copy overlaid with the per-item overrides.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    base_env: HashMap<String, String>,
    output_ceiling: usize,
}

impl Default for ProcessExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessExecutor {
    /// Executor over a snapshot of the current process environment.
    pub fn new() -> Self {
        Self::with_base_env(std::env::vars().collect())
    }

    /// Executor over an explicit base environment.
    pub fn with_base_env(base_env: HashMap<String, String>) -> Self {
        Self {
            base_env,
            output_ceiling: OUTPUT_CEILING_BYTES,
        }
    }

    /// Override the output ceiling (tests exercise overflow without
    /// generating 10 MiB).
    pub fn with_output_ceiling(mut self, bytes: usize) -> Self {
        self.output_ceiling = bytes;
        self
    }

    pub fn output_ceiling(&self) -> usize {
        self.output_ceiling
    }

    /// Run a resolved command to completion within the execution budget.
    ///
    /// The timeout is a hard kill, not cooperative; the outcome keeps
    /// whatever partial output had been buffered. Only a spawn failure fails
    /// the call itself.
    pub async fn run(
        &self,
        command: &str,
        cwd: &Path,
        timeout: Duration,
        env_overrides: &IndexMap<String, String>,
    ) -> Result<ExecutionOutcome, ExecError> {
        let start = Instant::now();

        // Tracing span.
        let cmd_span = tracing::info_span!(
            "batch.cmd",
            cmd = %command,
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );

        let mut process = tokio::process::Command::new("/bin/sh");
        process.arg("-c").arg(command);
        process.current_dir(cwd);
        // Injected snapshot overlaid by per-item overrides; overlay wins.
        process.env_clear();
        process.envs(&self.base_env);
        for (name, value) in env_overrides {
            process.env(name, value);
        }
        process.stdin(Stdio::null());
        process.stdout(Stdio::piped());
        process.stderr(Stdio::piped());
        process.kill_on_drop(true);

        let mut child = process.spawn().map_err(|source| ExecError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let (mut stdout, mut stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => (out, err),
            _ => {
                return Err(ExecError::Spawn {
                    command: command.to_string(),
                    source: std::io::Error::other("failed to capture child stdio"),
                })
            }
        };

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        let mut out_buf: Vec<u8> = Vec::new();
        let mut err_buf: Vec<u8> = Vec::new();
        let mut out_chunk = [0u8; READ_CHUNK_BYTES];
        let mut err_chunk = [0u8; READ_CHUNK_BYTES];
        let mut out_open = true;
        let mut err_open = true;
        let mut timed_out = false;
        let mut truncated = false;

        // Drain both streams concurrently until EOF, the deadline, or the
        // output ceiling — whichever comes first.
        while out_open || err_open {
            tokio::select! {
                () = &mut deadline => {
                    timed_out = true;
                    let _ = child.start_kill();
                    break;
                }
                read = stdout.read(&mut out_chunk), if out_open => match read {
                    Ok(0) | Err(_) => out_open = false,
                    Ok(n) => {
                        if !append_capped(&mut out_buf, &out_chunk[..n], err_buf.len(), self.output_ceiling) {
                            truncated = true;
                            let _ = child.start_kill();
                            break;
                        }
                    }
                },
                read = stderr.read(&mut err_chunk), if err_open => match read {
                    Ok(0) | Err(_) => err_open = false,
                    Ok(n) => {
                        if !append_capped(&mut err_buf, &err_chunk[..n], out_buf.len(), self.output_ceiling) {
                            truncated = true;
                            let _ = child.start_kill();
                            break;
                        }
                    }
                },
            }
        }

        // Collect the exit status. A child killed above exits promptly; one
        // that closed its stdio but kept running still has to respect the
        // remaining deadline.
        let wait_result = if timed_out || truncated {
            child.wait().await
        } else {
            let remaining = timeout.saturating_sub(start.elapsed());
            match tokio::time::timeout(remaining, child.wait()).await {
                Ok(result) => result,
                Err(_) => {
                    timed_out = true;
                    let _ = child.start_kill();
                    child.wait().await
                }
            }
        };
        let status = wait_result.map_err(|source| ExecError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let duration = start.elapsed();
        let exit_code = status.code().unwrap_or(-1);

        // Record tracing fields.
        cmd_span.record("exit_code", exit_code);
        cmd_span.record("duration_ms", duration.as_millis() as u64);

        Ok(ExecutionOutcome {
            exit_code,
            stdout: String::from_utf8_lossy(&out_buf).into_owned(),
            stderr: String::from_utf8_lossy(&err_buf).into_owned(),
            timed_out,
            truncated,
        })
    }
}

/// Append a chunk to `buf` if the combined capture stays under `ceiling`.
///
/// On overflow, appends only what fits and returns false.
fn append_capped(buf: &mut Vec<u8>, chunk: &[u8], other_len: usize, ceiling: usize) -> bool {
    let used = buf.len() + other_len;
    let room = ceiling.saturating_sub(used);
    if chunk.len() <= room {
        buf.extend_from_slice(chunk);
        true
    } else {
        buf.extend_from_slice(&chunk[..room]);
        false
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
