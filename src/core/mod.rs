// src/core/mod.rs

// The `core` module holds everything that does not touch the terminal:
// the data model, the probes, the fan-out and the result file.

/// Targets, probe outcomes, scan results and the run configuration.
pub mod models;

/// Error enums for probes, target input, export and progress.
pub mod error;

/// The probe functions and the per-host scanner that runs them.
pub mod scanner;

/// Concurrent fan-out of host scans and single-task result collection.
pub mod coordinator;

/// Completion counter for a run.
pub mod progress;

/// Target list construction: single host, bulk list, CIDR range.
pub mod targets;

/// Reading and writing the JSON result file.
pub mod export;
