// src/simulation/engine.rs

use chrono::NaiveDate;
use rand::Rng;

use crate::error::SimulationError;
use crate::model::batch::{DemandLine, InventoryBatch};
use crate::model::records::{
    FulfillmentRecord, InventoryUsageRecord, ResidualBatch, WasteRecord,
};
use crate::model::store::BatchStore;
use crate::simulation::disorder;

/// The three append-only ledgers a run produces, plus the end-of-horizon
/// availability handed to the comparison allocator. Immutable once the
/// run returns them.
#[derive(Debug, Default)]
pub struct RunLedgers {
    pub fulfillments: Vec<FulfillmentRecord>,
    pub usage: Vec<InventoryUsageRecord>,
    pub waste: Vec<WasteRecord>,
    pub residual: Vec<ResidualBatch>,
}

/// One First-Expired-First-Out allocation run.
///
/// Demand lines are processed strictly in date order; each line first
/// writes off stale stock for its item, then draws from the item's
/// batch list in its current walk order. The walk order is FEFO unless
/// a disorder fraction perturbed it, which is the whole experiment.
///
/// Single-threaded by design: every line mutates per-item batch state
/// that later lines depend on. Independent scenarios parallelize at the
/// run level instead, each with its own store snapshot and generator.
pub struct FefoSimulation {
    demand: Vec<DemandLine>,
    store: BatchStore,
    ledgers: RunLedgers,
    last_processed_date: Option<NaiveDate>,
}

impl FefoSimulation {
    /// A run over an already-built store. Demand is sorted by date
    /// ascending; the sort is stable so same-day lines keep input order.
    pub fn new(mut demand: Vec<DemandLine>, store: BatchStore) -> Self {
        demand.sort_by_key(|line| line.demand_date);
        Self {
            demand,
            store,
            ledgers: RunLedgers::default(),
            last_processed_date: None,
        }
    }

    /// The usual entry point: expiration-sort the batches, perturb the
    /// sequence with the disorder fraction, and group per item without
    /// re-sorting (re-sorting would undo the injected error).
    pub fn with_disorder<R: Rng>(
        demand: Vec<DemandLine>,
        mut batches: Vec<InventoryBatch>,
        disorder_fraction: f64,
        rng: &mut R,
    ) -> Self {
        batches.sort_by_key(|batch| batch.expiration_date);
        let batches = disorder::inject(batches, disorder_fraction, rng);
        Self::new(demand, BatchStore::from_sequence(batches))
    }

    /// Processes every demand line, then sweeps the horizon, and hands
    /// the ledgers over. A returned error means the run aborted and its
    /// ledgers were discarded; there are no partial results.
    pub fn run(mut self) -> Result<RunLedgers, SimulationError> {
        let demand = std::mem::take(&mut self.demand);
        for line in &demand {
            self.process_line(line)?;
        }
        self.final_sweep();
        Ok(self.ledgers)
    }

    fn process_line(&mut self, line: &DemandLine) -> Result<(), SimulationError> {
        self.last_processed_date = Some(line.demand_date);

        let ledgers = &mut self.ledgers;
        let Some(batches) = self.store.batches_mut(&line.item_code) else {
            // Item with demand but no batches at all: a referential gap
            // is data, not an error. Full shortage, no inventory rows.
            if line.required_quantity > 0 {
                ledgers.fulfillments.push(FulfillmentRecord {
                    item_code: line.item_code.clone(),
                    demand_date: line.demand_date,
                    nominal_demand_quantity: line.required_quantity,
                    fulfilled_quantity: 0,
                    remaining_demand_after: line.required_quantity,
                    batch_expiration_date: None,
                });
            }
            return Ok(());
        };

        // Expire pass. Always runs before fulfillment, so a batch can
        // never be counted as both used and wasted on the same date. A
        // batch expiring exactly on the demand date is unusable today.
        for batch in batches.iter_mut() {
            if let Some(expired) = batch.expire(line.demand_date) {
                ledgers.waste.push(WasteRecord {
                    item_code: batch.item_code.clone(),
                    batch_id: batch.batch_id,
                    nominal_quantity: batch.nominal_quantity,
                    expired_quantity: expired,
                    expiration_date: batch.expiration_date,
                });
            }
        }

        // Fulfill pass: walk the list in its current order. Closed
        // batches are skipped, never consumed, which keeps the two
        // terminal causes mutually exclusive.
        let mut remaining = line.required_quantity;
        for batch in batches.iter_mut() {
            if remaining == 0 {
                break;
            }
            if batch.remaining_quantity == 0 {
                continue;
            }

            let use_quantity = remaining.min(batch.remaining_quantity);
            let start_quantity = batch.remaining_quantity;
            batch.consume(use_quantity, line.demand_date)?;
            remaining -= use_quantity;

            ledgers.fulfillments.push(FulfillmentRecord {
                item_code: line.item_code.clone(),
                demand_date: line.demand_date,
                nominal_demand_quantity: line.required_quantity,
                fulfilled_quantity: use_quantity,
                remaining_demand_after: remaining,
                batch_expiration_date: Some(batch.expiration_date),
            });
            ledgers.usage.push(InventoryUsageRecord {
                item_code: batch.item_code.clone(),
                batch_id: batch.batch_id,
                nominal_quantity: batch.nominal_quantity,
                start_quantity,
                used_quantity: use_quantity,
                end_quantity: batch.remaining_quantity,
                expiration_date: batch.expiration_date,
                last_processed_date: line.demand_date,
            });
        }

        // Unmet demand after every eligible batch was offered.
        if remaining > 0 {
            ledgers.fulfillments.push(FulfillmentRecord {
                item_code: line.item_code.clone(),
                demand_date: line.demand_date,
                nominal_demand_quantity: line.required_quantity,
                fulfilled_quantity: 0,
                remaining_demand_after: remaining,
                batch_expiration_date: None,
            });
        }
        Ok(())
    }

    /// End-of-horizon sweep: expire whatever is stale as of the last
    /// processed date, emit one trailing usage row per batch still
    /// holding stock, and build the residual ledger for the optimizer.
    fn final_sweep(&mut self) {
        let ledgers = &mut self.ledgers;

        if let Some(horizon) = self.last_processed_date {
            for (_, batches) in self.store.iter_mut() {
                for batch in batches.iter_mut() {
                    if let Some(expired) = batch.expire(horizon) {
                        ledgers.waste.push(WasteRecord {
                            item_code: batch.item_code.clone(),
                            batch_id: batch.batch_id,
                            nominal_quantity: batch.nominal_quantity,
                            expired_quantity: expired,
                            expiration_date: batch.expiration_date,
                        });
                    }
                }
                for batch in batches.iter() {
                    if batch.remaining_quantity > 0 {
                        ledgers.usage.push(InventoryUsageRecord {
                            item_code: batch.item_code.clone(),
                            batch_id: batch.batch_id,
                            nominal_quantity: batch.nominal_quantity,
                            start_quantity: batch.remaining_quantity,
                            used_quantity: 0,
                            end_quantity: batch.remaining_quantity,
                            expiration_date: batch.expiration_date,
                            last_processed_date: horizon,
                        });
                    }
                }
            }
        }

        for (_, batches) in self.store.iter() {
            for batch in batches {
                if batch.undelivered_quantity() > 0 {
                    ledgers.residual.push(ResidualBatch {
                        item_code: batch.item_code.clone(),
                        batch_id: batch.batch_id,
                        expiration_date: batch.expiration_date,
                        residual_quantity: batch.undelivered_quantity(),
                    });
                }
            }
        }
    }
}
