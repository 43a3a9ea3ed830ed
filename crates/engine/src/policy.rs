// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch configuration and per-item policy resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default per-command timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 60_000;

/// One environment-variable override as configured by the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Static batch-level configuration, read per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchConfig {
    /// Command template; field references are substituted per record.
    pub command: String,
    /// Working directory for command execution. Defaults to the home
    /// directory when unset.
    pub cwd: Option<PathBuf>,
    /// Maximum execution time in milliseconds.
    pub timeout_millis: u64,
    /// Treat a non-zero exit (or timeout/overflow) as a normal outcome for
    /// the item instead of a failure.
    pub ignore_errors: bool,
    /// Environment overrides, applied on top of the base environment in
    /// configured order. Entries without a name are skipped.
    pub env: Vec<EnvVar>,
    /// Attach both streams (`stdout`/`stderr`) instead of the default
    /// `output`/`stderr?` summary.
    pub return_full_output: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            cwd: None,
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
            ignore_errors: false,
            env: Vec::new(),
            return_full_output: false,
        }
    }
}

/// Per-item settings, resolved fresh for each record.
///
/// The configuration is static across the batch, but it is re-read for every
/// item to match the host's per-item parameter resolution.
#[derive(Debug, Clone)]
pub struct ItemPolicy {
    pub template: String,
    pub working_dir: PathBuf,
    pub timeout: Duration,
    pub ignore_errors: bool,
    pub env_overrides: IndexMap<String, String>,
    pub return_full_output: bool,
}

impl ItemPolicy {
    /// Read the batch configuration for one item slot.
    pub fn resolve(config: &BatchConfig, index: usize) -> Self {
        tracing::trace!(item = index, "resolving item policy");

        let mut env_overrides = IndexMap::new();
        for var in &config.env {
            if var.name.is_empty() {
                continue;
            }
            env_overrides.insert(var.name.clone(), var.value.clone());
        }

        Self {
            template: config.command.clone(),
            working_dir: config.cwd.clone().unwrap_or_else(default_working_dir),
            timeout: Duration::from_millis(config.timeout_millis),
            ignore_errors: config.ignore_errors,
            env_overrides,
            return_full_output: config.return_full_output,
        }
    }
}

/// Default working directory: the invoking user's home, falling back to `/`.
fn default_working_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
