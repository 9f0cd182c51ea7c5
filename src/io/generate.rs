// src/io/generate.rs

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::model::batch::{DemandLine, InventoryBatch};

/// Catalogue entry driving the synthetic dataset: how much of an item a
/// day asks for on average, and how long a purchased lot keeps.
#[derive(Debug, Clone)]
pub struct ItemProfile {
    pub item_code: String,
    pub mean_daily_demand: f64,
    pub std_dev_demand: f64,
    pub shelf_life_days: u32,
}

impl ItemProfile {
    pub fn new(
        item_code: impl Into<String>,
        mean_daily_demand: f64,
        std_dev_demand: f64,
        shelf_life_days: u32,
    ) -> Self {
        Self {
            item_code: item_code.into(),
            mean_daily_demand,
            std_dev_demand,
            shelf_life_days,
        }
    }
}

/// Generates one pre-aggregated demand row per item per day from a
/// Normal (Bell Curve) distribution, clamped at zero. Days that sample
/// to nothing produce no row.
pub fn generate_demand<R: Rng>(
    items: &[ItemProfile],
    start_date: NaiveDate,
    days: u32,
    rng: &mut R,
) -> Vec<DemandLine> {
    let mut lines = Vec::new();
    for profile in items {
        let normal = Normal::new(profile.mean_daily_demand, profile.std_dev_demand.max(0.0)).unwrap();
        for offset in 0..days {
            let date = start_date + Duration::days(i64::from(offset));
            let sample: f64 = normal.sample(rng);
            let quantity = sample.round();
            if quantity >= 1.0 {
                lines.push(DemandLine::new(
                    profile.item_code.clone(),
                    date,
                    quantity as u32,
                ));
            }
        }
    }
    lines
}

/// Purchasing heuristics: how demand turns into batches on a shelf.
///
/// Shelf life picks a tier (fresh / semi-fresh / long-life); the tier
/// sets how far apart demand lines may sit and still be covered by one
/// purchase order, and how much over-buying the buyer allows.
#[derive(Debug, Clone)]
pub struct PurchasePolicy {
    /// Shelf life at or below which an item counts as fresh.
    pub fresh_shelf_life: u32,
    /// Shelf life at or below which an item counts as semi-fresh;
    /// anything longer is long-life.
    pub semi_fresh_shelf_life: u32,
    pub fresh_buffer: f64,
    pub semi_fresh_buffer: f64,
    pub long_life_buffer: f64,
    pub fresh_window_days: i64,
    pub semi_fresh_window_days: i64,
    pub long_life_window_days: i64,
    /// Suppliers do not ship less than this.
    pub min_purchase: u32,
    /// A purchase larger than one pallet is split into pallet-sized
    /// batches.
    pub max_pallet: u32,
}

impl Default for PurchasePolicy {
    fn default() -> Self {
        Self {
            fresh_shelf_life: 9,
            semi_fresh_shelf_life: 21,
            fresh_buffer: 1.005,
            semi_fresh_buffer: 1.1,
            long_life_buffer: 1.5,
            fresh_window_days: 1,
            semi_fresh_window_days: 2,
            long_life_window_days: 7,
            min_purchase: 10,
            max_pallet: 1000,
        }
    }
}

impl PurchasePolicy {
    fn window_days(&self, shelf_life: u32) -> i64 {
        if shelf_life <= self.fresh_shelf_life {
            self.fresh_window_days
        } else if shelf_life <= self.semi_fresh_shelf_life {
            self.semi_fresh_window_days
        } else {
            self.long_life_window_days
        }
    }

    fn buffer(&self, shelf_life: u32) -> f64 {
        if shelf_life <= self.fresh_shelf_life {
            self.fresh_buffer
        } else if shelf_life <= self.semi_fresh_shelf_life {
            self.semi_fresh_buffer
        } else {
            self.long_life_buffer
        }
    }

    fn expiration_offset<R: Rng>(&self, shelf_life: u32, rng: &mut R) -> i64 {
        let tier_min: u32 = if shelf_life <= self.fresh_shelf_life {
            2
        } else if shelf_life <= self.semi_fresh_shelf_life {
            4
        } else {
            15
        };
        let min_days = tier_min.min(shelf_life);
        let max_days = shelf_life.max(min_days + 1);
        i64::from(rng.gen_range(min_days..=max_days))
    }
}

// One aggregated purchase order before palletization.
#[derive(Debug)]
struct PurchaseOrder {
    item_code: String,
    demand_date: NaiveDate,
    quantity: u32,
    shelf_life: u32,
}

/// Turns a demand sequence into purchased inventory batches.
///
/// Demand lines of one item closer together than the shelf-life tier's
/// window merge into a single order (purchase orders are not
/// fragmented day by day). Each order is over-bought by a tier buffer,
/// floored at the minimum purchase, given an expiration offset from the
/// order's first demand date, and split into pallets. Batch ids are
/// assigned sequentially from 1 in purchase order.
pub fn purchase_inventory<R: Rng>(
    items: &[ItemProfile],
    demand: &[DemandLine],
    policy: &PurchasePolicy,
    rng: &mut R,
) -> Vec<InventoryBatch> {
    let shelf_life_by_item: BTreeMap<&str, u32> = items
        .iter()
        .map(|p| (p.item_code.as_str(), p.shelf_life_days))
        .collect();

    let mut ordered: Vec<&DemandLine> = demand.iter().collect();
    ordered.sort_by(|a, b| {
        a.item_code
            .cmp(&b.item_code)
            .then(a.demand_date.cmp(&b.demand_date))
    });

    // Merge nearby demand into purchase orders. The window is measured
    // from the order's first demand date.
    let mut orders: Vec<PurchaseOrder> = Vec::new();
    for line in ordered {
        let shelf_life = shelf_life_by_item
            .get(line.item_code.as_str())
            .copied()
            .unwrap_or(9);
        let window = policy.window_days(shelf_life);
        match orders.last_mut() {
            Some(last)
                if last.item_code == line.item_code
                    && (line.demand_date - last.demand_date).num_days() < window =>
            {
                last.quantity += line.required_quantity;
            }
            _ => orders.push(PurchaseOrder {
                item_code: line.item_code.clone(),
                demand_date: line.demand_date,
                quantity: line.required_quantity,
                shelf_life,
            }),
        }
    }

    // Buffer, floor, date, palletize.
    let mut batches = Vec::new();
    let mut next_batch_id: u32 = 1;
    for order in &orders {
        let buffer = policy.buffer(order.shelf_life);
        let factor = if buffer > 1.0 {
            rng.gen_range(1.0..buffer)
        } else {
            1.0
        };
        let mut quantity = ((order.quantity as f64) * factor) as u32;
        quantity = quantity.max(policy.min_purchase);

        let expiration =
            order.demand_date + Duration::days(policy.expiration_offset(order.shelf_life, rng));

        while quantity > policy.max_pallet {
            batches.push(InventoryBatch::new(
                next_batch_id,
                order.item_code.clone(),
                policy.max_pallet,
                expiration,
            ));
            next_batch_id += 1;
            quantity -= policy.max_pallet;
        }
        batches.push(InventoryBatch::new(
            next_batch_id,
            order.item_code.clone(),
            quantity,
            expiration,
        ));
        next_batch_id += 1;
    }
    batches
}
