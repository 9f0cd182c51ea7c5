// src/strategy/traits.rs

use std::fmt::Debug;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::OptimizerError;
use crate::model::records::ResidualBatch;

/// One unserved (item, day) demand remainder, extracted from the
/// fulfillment ledger after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortageLine {
    pub item_code: String,
    pub demand_date: NaiveDate,
    pub quantity: u32,
}

/// Per-batch, per-day usage an allocator adds on top of a FEFO run.
/// Usage never exceeds the batch's residual availability.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizerUsage {
    pub batch_id: u32,
    pub day: NaiveDate,
    pub quantity_used: u32,
}

/// Seam for the comparison allocator.
///
/// The production implementation is an external linear-programming
/// solver; this crate only fixes the contract: availability in (the
/// end-of-horizon residual ledger), a per-(batch, day) usage allocation
/// out. An `Err` means no solution was produced — callers skip the
/// optimized KPI row and the FEFO-only KPIs stand on their own.
///
/// `Send + Sync` so scenario sweeps can share one allocator across
/// parallel runs.
pub trait InventoryOptimizer: Debug + Send + Sync {
    fn allocate(
        &self,
        availability: &[ResidualBatch],
        shortages: &[ShortageLine],
    ) -> Result<Vec<OptimizerUsage>, OptimizerError>;
}
