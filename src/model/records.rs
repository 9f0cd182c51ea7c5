// src/model/records.rs

use chrono::NaiveDate;
use serde::Serialize;

// Ledger rows are append-only: the engine never rewrites a row once it
// is emitted. All of them Serialize so they can go straight to CSV.

/// One row per (demand line, batch) pairing actually used, plus one
/// shortage row per demand line that could not be fully served.
#[derive(Debug, Clone, Serialize)]
pub struct FulfillmentRecord {
    pub item_code: String,
    pub demand_date: NaiveDate,
    pub nominal_demand_quantity: u32,
    /// Units this particular batch contributed. Zero on shortage rows.
    pub fulfilled_quantity: u32,
    pub remaining_demand_after: u32,
    /// Expiration of the batch drawn from. `None` on shortage rows,
    /// which have no batch.
    pub batch_expiration_date: Option<NaiveDate>,
}

impl FulfillmentRecord {
    /// A shortage row: demand left over after every eligible batch was
    /// offered (or the item had no batches at all).
    pub fn is_shortage(&self) -> bool {
        self.fulfilled_quantity == 0 && self.remaining_demand_after > 0
    }
}

/// One row per batch touched on a given day, plus one trailing row per
/// batch still holding stock when the horizon ends.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryUsageRecord {
    pub item_code: String,
    pub batch_id: u32,
    pub nominal_quantity: u32,
    pub start_quantity: u32,
    pub used_quantity: u32,
    pub end_quantity: u32,
    pub expiration_date: NaiveDate,
    pub last_processed_date: NaiveDate,
}

/// One row per batch expiration event. A batch expires at most once.
#[derive(Debug, Clone, Serialize)]
pub struct WasteRecord {
    pub item_code: String,
    pub batch_id: u32,
    pub nominal_quantity: u32,
    pub expired_quantity: u32,
    pub expiration_date: NaiveDate,
}

/// End-of-horizon availability per batch, handed to the comparison
/// allocator: the units FEFO never delivered (leftovers plus waste).
#[derive(Debug, Clone, Serialize)]
pub struct ResidualBatch {
    pub item_code: String,
    pub batch_id: u32,
    pub expiration_date: NaiveDate,
    pub residual_quantity: u32,
}
