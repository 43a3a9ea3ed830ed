// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input and output records flowing through a batch.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::exec::ExecutionOutcome;

/// One unit of input data, identified by its slot in the batch.
///
/// Never mutated by this crate; output records are built from a copy of the
/// fields.
#[derive(Debug, Clone)]
pub struct InputRecord {
    /// Position index within the batch.
    pub index: usize,
    /// Open-ended field mapping supplied by the host.
    pub fields: Map<String, Value>,
}

impl InputRecord {
    pub fn new(index: usize, fields: Map<String, Value>) -> Self {
        Self { index, fields }
    }

    /// Build a batch from host-supplied field maps, assigning position
    /// indices in order.
    pub fn from_batch(batch: Vec<Map<String, Value>>) -> Vec<Self> {
        batch
            .into_iter()
            .enumerate()
            .map(|(index, fields)| Self::new(index, fields))
            .collect()
    }
}

/// One unit of output data, paired back to the input slot it derives from.
///
/// `paired_item` is a lookup relation only — output `i` always derives from
/// input `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "json")]
    pub fields: Map<String, Value>,
    #[serde(rename = "pairedItem")]
    pub paired_item: usize,
}

impl OutputRecord {
    /// Merge the original fields with the shaped execution summary.
    ///
    /// Default shaping attaches `exec: { command, exitCode, output, stderr? }`
    /// with `stderr` present only when non-empty; full-output shaping attaches
    /// `exec: { command, exitCode, stdout, stderr }` unconditionally.
    pub fn finalized(
        item: &InputRecord,
        command: &str,
        outcome: &ExecutionOutcome,
        full_output: bool,
    ) -> Self {
        let mut exec = Map::new();
        exec.insert("command".into(), Value::String(command.to_string()));
        exec.insert("exitCode".into(), Value::from(outcome.exit_code));
        if full_output {
            exec.insert("stdout".into(), Value::String(outcome.stdout.clone()));
            exec.insert("stderr".into(), Value::String(outcome.stderr.clone()));
        } else {
            exec.insert("output".into(), Value::String(outcome.stdout.clone()));
            if !outcome.stderr.is_empty() {
                exec.insert("stderr".into(), Value::String(outcome.stderr.clone()));
            }
        }

        let mut fields = item.fields.clone();
        fields.insert("exec".into(), Value::Object(exec));
        Self {
            fields,
            paired_item: item.index,
        }
    }

    /// Error shape for a recovered per-item failure. The original fields are
    /// dropped; only the error message survives at this slot.
    pub fn recovered(index: usize, message: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("error".into(), Value::String(message.to_string()));
        Self {
            fields,
            paired_item: index,
        }
    }
}
