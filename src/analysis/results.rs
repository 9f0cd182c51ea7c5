// src/analysis/results.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::records::{FulfillmentRecord, WasteRecord};
use crate::strategy::traits::{OptimizerUsage, ShortageLine};

/// One row of the scenario comparison table.
#[derive(Debug, Clone, Serialize)]
pub struct KpiRecord {
    pub model: String,
    pub error_pct: f64,
    pub waste_units: u32,
    pub shortage_units: u32,
    pub loss_pct: f64,
    pub fulfilled_units: u32,
    pub fulfilled_pct: f64,
}

/// Total demand over the run: nominal quantities summed over distinct
/// (item, date) pairs. The fulfillment ledger repeats the nominal on
/// every row of a line, so summing without deduplication would
/// double-count multi-batch lines.
pub fn total_nominal_demand(fulfillments: &[FulfillmentRecord]) -> u32 {
    let mut per_line: BTreeMap<(&str, NaiveDate), u32> = BTreeMap::new();
    for row in fulfillments {
        per_line
            .entry((row.item_code.as_str(), row.demand_date))
            .or_insert(row.nominal_demand_quantity);
    }
    per_line.values().sum()
}

/// Final unmet remainder per (item, date): only the last recorded
/// remainder of each line counts — intermediate rows show demand still
/// being worked down, not a shortage.
pub fn unmet_demand(fulfillments: &[FulfillmentRecord]) -> Vec<ShortageLine> {
    let mut last_remaining: BTreeMap<(&str, NaiveDate), u32> = BTreeMap::new();
    for row in fulfillments {
        last_remaining.insert(
            (row.item_code.as_str(), row.demand_date),
            row.remaining_demand_after,
        );
    }
    last_remaining
        .into_iter()
        .filter(|(_, quantity)| *quantity > 0)
        .map(|((item_code, demand_date), quantity)| ShortageLine {
            item_code: item_code.to_string(),
            demand_date,
            quantity,
        })
        .collect()
}

fn shortage_units(fulfillments: &[FulfillmentRecord]) -> u32 {
    unmet_demand(fulfillments).iter().map(|s| s.quantity).sum()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn pct_of(units: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(units as f64 / total as f64 * 100.0)
}

/// Reduces one run's ledgers to a KPI row.
pub fn summarize(
    fulfillments: &[FulfillmentRecord],
    waste: &[WasteRecord],
    total_nominal_demand: u32,
    label: &str,
    error_fraction: f64,
) -> KpiRecord {
    let waste_units: u32 = waste.iter().map(|w| w.expired_quantity).sum();
    let fulfilled_units: u32 = fulfillments.iter().map(|f| f.fulfilled_quantity).sum();
    let shortage_units = shortage_units(fulfillments);

    KpiRecord {
        model: label.to_string(),
        error_pct: error_fraction * 100.0,
        waste_units,
        shortage_units,
        loss_pct: pct_of(waste_units + shortage_units, total_nominal_demand),
        fulfilled_units,
        fulfilled_pct: pct_of(fulfilled_units, total_nominal_demand),
    }
}

/// Folds the comparison allocator's extra usage into the zero-error
/// FEFO baseline.
///
/// Per batch, `optimized_waste = fefo_waste - optimizer_usage`, floored
/// at zero — usage beyond the recorded waste would mean delivering
/// units that never existed, so the difference is clipped. Wasted
/// batches the allocator never touched keep their full waste. Fulfilled
/// units are the baseline's plus everything the allocator placed.
pub fn summarize_with_optimizer(
    fulfillments: &[FulfillmentRecord],
    waste: &[WasteRecord],
    usage: &[OptimizerUsage],
    total_nominal_demand: u32,
    label: &str,
) -> KpiRecord {
    let mut usage_per_batch: BTreeMap<u32, u32> = BTreeMap::new();
    for row in usage {
        *usage_per_batch.entry(row.batch_id).or_default() += row.quantity_used;
    }

    let optimized_waste: u32 = waste
        .iter()
        .map(|w| {
            let used = usage_per_batch.get(&w.batch_id).copied().unwrap_or(0);
            w.expired_quantity.saturating_sub(used)
        })
        .sum();

    let baseline_fulfilled: u32 = fulfillments.iter().map(|f| f.fulfilled_quantity).sum();
    let extra_fulfilled: u32 = usage.iter().map(|u| u.quantity_used).sum();
    let fulfilled_units = baseline_fulfilled + extra_fulfilled;
    let shortage_units = shortage_units(fulfillments);

    KpiRecord {
        model: label.to_string(),
        error_pct: 0.0,
        waste_units: optimized_waste,
        shortage_units,
        loss_pct: pct_of(optimized_waste + shortage_units, total_nominal_demand),
        fulfilled_units,
        fulfilled_pct: pct_of(fulfilled_units, total_nominal_demand),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn fulfillment(
        item: &str,
        d: u32,
        nominal: u32,
        fulfilled: u32,
        remaining: u32,
    ) -> FulfillmentRecord {
        FulfillmentRecord {
            item_code: item.to_string(),
            demand_date: day(d),
            nominal_demand_quantity: nominal,
            fulfilled_quantity: fulfilled,
            remaining_demand_after: remaining,
            batch_expiration_date: None,
        }
    }

    fn waste(id: u32, item: &str, nominal: u32, expired: u32) -> WasteRecord {
        WasteRecord {
            item_code: item.to_string(),
            batch_id: id,
            nominal_quantity: nominal,
            expired_quantity: expired,
            expiration_date: day(9),
        }
    }

    #[test]
    fn nominal_demand_counts_each_line_once() {
        // Two rows for the same (item, day) line, one for another day.
        let rows = vec![
            fulfillment("A", 1, 100, 60, 40),
            fulfillment("A", 1, 100, 40, 0),
            fulfillment("A", 2, 50, 50, 0),
        ];
        assert_eq!(total_nominal_demand(&rows), 150);
    }

    #[test]
    fn only_the_final_remainder_counts_as_shortage() {
        let rows = vec![
            fulfillment("A", 1, 100, 60, 40),
            fulfillment("A", 1, 100, 25, 15),
            fulfillment("B", 1, 30, 0, 30),
            fulfillment("B", 2, 10, 10, 0),
        ];
        let shortages = unmet_demand(&rows);
        assert_eq!(
            shortages,
            vec![
                ShortageLine {
                    item_code: "A".to_string(),
                    demand_date: day(1),
                    quantity: 15
                },
                ShortageLine {
                    item_code: "B".to_string(),
                    demand_date: day(1),
                    quantity: 30
                },
            ]
        );
    }

    #[test]
    fn summarize_uses_the_parenthesized_loss_formula() {
        let rows = vec![
            fulfillment("A", 1, 100, 85, 15),
            fulfillment("B", 2, 100, 100, 0),
        ];
        let waste_rows = vec![waste(1, "A", 40, 10)];
        let kpi = summarize(&rows, &waste_rows, 200, "Imperfect FEFO", 0.03);

        assert_eq!(kpi.waste_units, 10);
        assert_eq!(kpi.shortage_units, 15);
        // (10 + 15) / 200 * 100, not 10 + 15/200*100.
        assert_eq!(kpi.loss_pct, 12.5);
        assert_eq!(kpi.fulfilled_units, 185);
        assert_eq!(kpi.fulfilled_pct, 92.5);
        assert_eq!(kpi.error_pct, 3.0);
    }

    #[test]
    fn zero_total_demand_reports_zero_percentages() {
        let kpi = summarize(&[], &[], 0, "Perfect FEFO", 0.0);
        assert_eq!(kpi.loss_pct, 0.0);
        assert_eq!(kpi.fulfilled_pct, 0.0);
    }

    #[test]
    fn optimizer_usage_offsets_waste_per_batch_with_clipping() {
        let rows = vec![fulfillment("A", 1, 100, 80, 20)];
        let waste_rows = vec![
            waste(1, "A", 40, 30), // partly rescued
            waste(2, "A", 20, 20), // untouched, keeps full waste
            waste(3, "A", 10, 5),  // over-claimed, clips to zero
        ];
        let usage = vec![
            OptimizerUsage {
                batch_id: 1,
                day: day(1),
                quantity_used: 10,
            },
            OptimizerUsage {
                batch_id: 1,
                day: day(2),
                quantity_used: 5,
            },
            OptimizerUsage {
                batch_id: 3,
                day: day(1),
                quantity_used: 9,
            },
        ];

        let kpi = summarize_with_optimizer(&rows, &waste_rows, &usage, 100, "+ Optimization");

        // batch 1: 30 - 15 = 15; batch 2: 20; batch 3: max(0, 5 - 9) = 0.
        assert_eq!(kpi.waste_units, 35);
        assert_eq!(kpi.shortage_units, 20);
        assert_eq!(kpi.fulfilled_units, 80 + 24);
        assert_eq!(kpi.error_pct, 0.0);
        assert_eq!(kpi.loss_pct, 55.0);
        assert_eq!(kpi.fulfilled_pct, 104.0);
    }

    #[test]
    fn rounding_is_to_two_decimals() {
        let rows = vec![fulfillment("A", 1, 3, 1, 2)];
        let kpi = summarize(&rows, &[], 3, "FEFO", 0.0);
        // 1/3 and 2/3 of 100, rounded.
        assert_eq!(kpi.fulfilled_pct, 33.33);
        assert_eq!(kpi.loss_pct, 66.67);
    }
}
