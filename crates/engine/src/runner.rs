// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Batch orchestration: policy → template → execution → shaping.

use crate::error::{ExecError, RunError};
use crate::exec::ProcessExecutor;
use crate::policy::{BatchConfig, ItemPolicy};
use crate::record::{InputRecord, OutputRecord};
use crate::template;

/// Drives a batch of records through the per-item pipeline, strictly in
/// input order, one at a time.
///
/// Failure policy is layered: the per-item `ignore_errors` flag (part of
/// [`BatchConfig`]) turns process exit-code failures into normal finalized
/// records; the batch-level `continue_on_error` policy set here converts any
/// remaining per-item error into an `{error}` record at that slot instead of
/// aborting the whole batch.
pub struct BatchRunner {
    executor: ProcessExecutor,
    continue_on_error: bool,
}

impl BatchRunner {
    pub fn new(executor: ProcessExecutor) -> Self {
        Self {
            executor,
            continue_on_error: false,
        }
    }

    /// Enable the batch-level continue-on-error policy.
    pub fn continue_on_error(mut self, enabled: bool) -> Self {
        self.continue_on_error = enabled;
        self
    }

    /// Process a batch.
    ///
    /// Under continue-on-error the output always has one record per input,
    /// order preserved. Otherwise the first unrecovered item failure aborts
    /// the batch: the error is returned, and no further items are processed.
    pub async fn run(
        &self,
        config: &BatchConfig,
        items: &[InputRecord],
    ) -> Result<Vec<OutputRecord>, RunError> {
        let mut output = Vec::with_capacity(items.len());

        for item in items {
            match self.run_item(config, item).await {
                Ok(record) => output.push(record),
                Err(err) if self.continue_on_error => {
                    tracing::warn!(item = item.index, error = %err, "item failed, continuing");
                    output.push(OutputRecord::recovered(item.index, &err.to_string()));
                }
                Err(err) => return Err(err),
            }
        }

        Ok(output)
    }

    /// One item through `Pending → Resolved → Executed → Finalized`.
    async fn run_item(
        &self,
        config: &BatchConfig,
        item: &InputRecord,
    ) -> Result<OutputRecord, RunError> {
        let policy = ItemPolicy::resolve(config, item.index);

        let command = template::resolve(&policy.template, &item.fields);
        if command.trim().is_empty() {
            return Err(RunError::EmptyCommand {
                item_index: item.index,
            });
        }
        tracing::debug!(item = item.index, command = %command, "resolved command");

        let outcome = self
            .executor
            .run(
                &command,
                &policy.working_dir,
                policy.timeout,
                &policy.env_overrides,
            )
            .await
            .map_err(|err| match err {
                ExecError::Spawn { command, source } => RunError::Spawn {
                    command,
                    item_index: item.index,
                    source,
                },
            })?;

        // Exit-code failure is a business decision made here, not in the
        // executor. With ignore_errors the captured outcome is still shaped
        // into the record rather than swallowed.
        if !outcome.success() && !policy.ignore_errors {
            return Err(if outcome.timed_out {
                RunError::TimedOut {
                    command,
                    timeout_millis: policy.timeout.as_millis() as u64,
                    item_index: item.index,
                }
            } else if outcome.truncated {
                RunError::OutputOverflow {
                    command,
                    limit_bytes: self.executor.output_ceiling(),
                    item_index: item.index,
                }
            } else {
                RunError::CommandFailed {
                    command,
                    exit_code: outcome.exit_code,
                    stderr: outcome.stderr.trim_end().to_string(),
                    item_index: item.index,
                }
            });
        }

        Ok(OutputRecord::finalized(
            item,
            &command,
            &outcome,
            policy.return_full_output,
        ))
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
