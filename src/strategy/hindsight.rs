// src/strategy/hindsight.rs

use std::collections::BTreeMap;

use crate::error::OptimizerError;
use crate::model::records::ResidualBatch;
use crate::strategy::traits::{InventoryOptimizer, OptimizerUsage, ShortageLine};

/// Greedy hindsight allocator, a stand-in for the external LP solver.
///
/// Walks shortages date-ascending and serves each from the item's
/// residual batches, soonest-expiring first, under the same eligibility
/// rule the engine enforces: a batch can only serve demand dated
/// strictly before its expiration. This is a lower bound on what the
/// real solver recovers — the LP additionally exploits bill-of-material
/// bundling and capacity slack, which are outside this crate.
#[derive(Debug, Clone, Default)]
pub struct GreedyHindsightOptimizer;

impl GreedyHindsightOptimizer {
    pub fn new() -> Self {
        Self
    }
}

impl InventoryOptimizer for GreedyHindsightOptimizer {
    fn allocate(
        &self,
        availability: &[ResidualBatch],
        shortages: &[ShortageLine],
    ) -> Result<Vec<OptimizerUsage>, OptimizerError> {
        // Per-item pools, soonest-expiring first; ties go to the lower
        // batch id so the allocation is deterministic.
        let mut pools: BTreeMap<&str, Vec<(ResidualBatch, u32)>> = BTreeMap::new();
        for batch in availability {
            pools
                .entry(batch.item_code.as_str())
                .or_default()
                .push((batch.clone(), batch.residual_quantity));
        }
        for pool in pools.values_mut() {
            pool.sort_by_key(|(batch, _)| (batch.expiration_date, batch.batch_id));
        }

        let mut ordered: Vec<&ShortageLine> = shortages.iter().collect();
        ordered.sort_by_key(|line| line.demand_date);

        let mut usages = Vec::new();
        for shortage in ordered {
            let Some(pool) = pools.get_mut(shortage.item_code.as_str()) else {
                continue;
            };
            let mut needed = shortage.quantity;
            for (batch, left) in pool.iter_mut() {
                if needed == 0 {
                    break;
                }
                if *left == 0 || batch.expiration_date <= shortage.demand_date {
                    continue;
                }
                let take = needed.min(*left);
                *left -= take;
                needed -= take;
                usages.push(OptimizerUsage {
                    batch_id: batch.batch_id,
                    day: shortage.demand_date,
                    quantity_used: take,
                });
            }
        }
        Ok(usages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn residual(id: u32, item: &str, qty: u32, expires: u32) -> ResidualBatch {
        ResidualBatch {
            item_code: item.to_string(),
            batch_id: id,
            expiration_date: day(expires),
            residual_quantity: qty,
        }
    }

    fn shortage(item: &str, d: u32, qty: u32) -> ShortageLine {
        ShortageLine {
            item_code: item.to_string(),
            demand_date: day(d),
            quantity: qty,
        }
    }

    #[test]
    fn serves_shortages_soonest_expiring_first() {
        let optimizer = GreedyHindsightOptimizer::new();
        let usage = optimizer
            .allocate(
                &[residual(2, "A", 40, 9), residual(1, "A", 40, 5)],
                &[shortage("A", 2, 60)],
            )
            .unwrap();

        assert_eq!(usage.len(), 2);
        assert_eq!(usage[0].batch_id, 1);
        assert_eq!(usage[0].quantity_used, 40);
        assert_eq!(usage[1].batch_id, 2);
        assert_eq!(usage[1].quantity_used, 20);
    }

    #[test]
    fn never_serves_a_day_on_or_after_expiration() {
        let optimizer = GreedyHindsightOptimizer::new();
        let usage = optimizer
            .allocate(
                &[residual(1, "A", 50, 4)],
                &[shortage("A", 4, 10), shortage("A", 6, 10)],
            )
            .unwrap();
        assert!(usage.is_empty());
    }

    #[test]
    fn usage_never_exceeds_availability() {
        let optimizer = GreedyHindsightOptimizer::new();
        let usage = optimizer
            .allocate(
                &[residual(1, "A", 30, 9)],
                &[shortage("A", 1, 25), shortage("A", 2, 25)],
            )
            .unwrap();

        let total: u32 = usage.iter().map(|u| u.quantity_used).sum();
        assert_eq!(total, 30);
        // Day 1 takes 25, day 2 gets the 5 that are left.
        assert_eq!(usage[0].quantity_used, 25);
        assert_eq!(usage[1].quantity_used, 5);
    }

    #[test]
    fn items_without_availability_are_skipped() {
        let optimizer = GreedyHindsightOptimizer::new();
        let usage = optimizer
            .allocate(&[residual(1, "A", 30, 9)], &[shortage("B", 1, 10)])
            .unwrap();
        assert!(usage.is_empty());
    }

    #[test]
    fn shortages_are_served_in_date_order() {
        let optimizer = GreedyHindsightOptimizer::new();
        let usage = optimizer
            .allocate(
                &[residual(1, "A", 20, 9)],
                &[shortage("A", 5, 20), shortage("A", 1, 20)],
            )
            .unwrap();

        // The earlier day wins the scarce units even though it came
        // second in the input.
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].day, day(1));
    }
}
