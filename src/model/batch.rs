// src/model/batch.rs

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::SimulationError;

/// One pre-aggregated demand row: how much of one item a single day
/// asks for. The engine tracks the unfulfilled remainder separately;
/// the line itself is never rewritten.
#[derive(Debug, Clone, Serialize)]
pub struct DemandLine {
    pub item_code: String,
    pub demand_date: NaiveDate,
    pub required_quantity: u32,
}

impl DemandLine {
    pub fn new(item_code: impl Into<String>, demand_date: NaiveDate, required_quantity: u32) -> Self {
        Self {
            item_code: item_code.into(),
            demand_date,
            required_quantity,
        }
    }
}

/// Where a batch is in its lifecycle.
///
/// The two terminal states are mutually exclusive: a batch either
/// expires with stock left, or is consumed down to zero. There is no
/// transition out of a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BatchState {
    Active,
    Expired,
    Depleted,
}

/// A discrete purchased lot of one item with its own quantity and
/// expiration date.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryBatch {
    // Identity
    pub batch_id: u32,
    pub item_code: String,

    // Immutable once purchased
    pub nominal_quantity: u32,
    pub expiration_date: NaiveDate,

    // State Variables
    // Invariant: remaining + consumed + wasted == nominal at all times.
    pub remaining_quantity: u32,
    pub wasted_quantity: u32,
}

impl InventoryBatch {
    pub fn new(
        batch_id: u32,
        item_code: impl Into<String>,
        nominal_quantity: u32,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            batch_id,
            item_code: item_code.into(),
            nominal_quantity,
            expiration_date,
            remaining_quantity: nominal_quantity,
            wasted_quantity: 0,
        }
    }

    pub fn state(&self) -> BatchState {
        if self.remaining_quantity > 0 {
            BatchState::Active
        } else if self.wasted_quantity > 0 {
            BatchState::Expired
        } else {
            BatchState::Depleted
        }
    }

    /// Units already delivered to demand.
    pub fn consumed_quantity(&self) -> u32 {
        self.nominal_quantity - self.remaining_quantity - self.wasted_quantity
    }

    /// Closes the batch by expiration if it is stale as of `as_of` and
    /// still holds stock. Returns the quantity written off, or `None`
    /// if nothing happened.
    ///
    /// Idempotent: already-closed batches are a no-op, so an expiration
    /// is never recorded twice.
    pub fn expire(&mut self, as_of: NaiveDate) -> Option<u32> {
        if self.expiration_date <= as_of && self.remaining_quantity > 0 {
            let expired = self.remaining_quantity;
            self.wasted_quantity = expired;
            self.remaining_quantity = 0;
            Some(expired)
        } else {
            None
        }
    }

    /// Draws `quantity` units out of the batch.
    ///
    /// Callers must skip closed batches and cap the draw at the
    /// remaining quantity; anything else is an engine bug surfaced as
    /// an invariant violation. `on` is only used for error context.
    pub fn consume(&mut self, quantity: u32, on: NaiveDate) -> Result<(), SimulationError> {
        if self.remaining_quantity == 0 {
            return Err(SimulationError::InvariantViolation {
                item_code: self.item_code.clone(),
                batch_id: self.batch_id,
                date: on,
                reason: "consume offered a closed batch".to_string(),
            });
        }
        if quantity == 0 || quantity > self.remaining_quantity {
            return Err(SimulationError::InvariantViolation {
                item_code: self.item_code.clone(),
                batch_id: self.batch_id,
                date: on,
                reason: format!(
                    "consume of {} units against {} remaining",
                    quantity, self.remaining_quantity
                ),
            });
        }
        self.remaining_quantity -= quantity;
        Ok(())
    }

    /// Units the batch never delivered: end-of-run leftovers plus
    /// whatever expired unused.
    pub fn undelivered_quantity(&self) -> u32 {
        self.remaining_quantity + self.wasted_quantity
    }
}
