// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! runbatch-engine: per-record templating-and-execution pipeline.
//!
//! Given a batch of input records, renders a command template against each
//! record's fields, runs the resolved command through a shell under a bounded
//! execution budget (timeout + output ceiling), and re-attaches the captured
//! outcome to the originating record. Items are processed strictly in input
//! order; failure policy is layered (per-item `ignore_errors` for exit codes,
//! batch-level continue-on-error at the boundary).
//!
//! Shell-mode execution is a capability the caller opts into: commands run
//! through `/bin/sh -c`, so pipes, redirection, and globbing behave as a user
//! expects. This crate is not a sandbox.

pub mod error;
pub mod exec;
pub mod policy;
pub mod record;
pub mod runner;
pub mod template;

pub use error::{ExecError, RunError};
pub use exec::{ExecutionOutcome, ProcessExecutor, OUTPUT_CEILING_BYTES};
pub use policy::{BatchConfig, EnvVar, ItemPolicy, DEFAULT_TIMEOUT_MILLIS};
pub use record::{InputRecord, OutputRecord};
pub use runner::BatchRunner;
pub use template::resolve;
