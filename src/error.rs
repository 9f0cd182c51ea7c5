// src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a simulation run.
///
/// A run either completes and returns consistent ledgers, or fails with
/// one of these before/while mutating state. There is no partial-run
/// recovery mode.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Malformed demand input. Raised during ingestion, before the run
    /// starts, so nothing is ever partially processed.
    #[error("invalid demand row {row} (item '{item_code}'): {reason}")]
    InvalidDemandRow {
        row: usize,
        item_code: String,
        reason: String,
    },

    /// Malformed inventory input. Raised during ingestion, before the
    /// run starts.
    #[error("invalid inventory row {row} (item '{item_code}', batch {batch_id}): {reason}")]
    InvalidInventoryRow {
        row: usize,
        item_code: String,
        batch_id: u32,
        reason: String,
    },

    /// A closed batch was offered for consumption, or a consume
    /// overdrew a batch. The engine skips closed batches before every
    /// consume, so this indicates an engine bug. Fatal, never retried.
    #[error("invariant violation on batch {batch_id} (item '{item_code}', {date}): {reason}")]
    InvariantViolation {
        item_code: String,
        batch_id: u32,
        date: NaiveDate,
        reason: String,
    },

    #[error("csv processing failed")]
    Csv(#[from] csv::Error),

    #[error("i/o failure")]
    Io(#[from] std::io::Error),
}

/// Failure of the comparison allocator.
///
/// The FEFO KPIs remain valid when this surfaces; callers skip the
/// optimized row and report the rest.
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("optimizer unavailable: {0}")]
    Unavailable(String),
}
