mod analysis;
mod error;
mod io;
mod model;
mod simulation;
mod strategy;

use std::fs::File;

use anyhow::Context;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::analysis::results::{self, KpiRecord};
use crate::io::generate::{self, ItemProfile, PurchasePolicy};
use crate::io::{input, reporting};
use crate::simulation::config::ScenarioConfig;
use crate::simulation::engine::{FefoSimulation, RunLedgers};
use crate::strategy::hindsight::GreedyHindsightOptimizer;
use crate::strategy::traits::InventoryOptimizer;

fn file_slug(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "_")
}

fn main() -> anyhow::Result<()> {
    println!("=== FEFO Perishable-Inventory Simulation ===");

    // 1. SETUP CATALOGUE & HORIZON
    let items = vec![
        ItemProfile::new("FRS-01", 45.0, 9.0, 7),  // leafy greens
        ItemProfile::new("FRS-02", 30.0, 6.0, 9),  // berries
        ItemProfile::new("SEM-01", 25.0, 5.0, 14), // soft cheese
        ItemProfile::new("SEM-02", 20.0, 4.0, 21), // cured meat
        ItemProfile::new("LNG-01", 15.0, 3.0, 60), // canned stock
    ];
    let start_date = NaiveDate::from_ymd_opt(2025, 5, 1).context("invalid start date")?;
    let horizon_days = 42;

    // 2. GENERATE DEMAND & PURCHASED INVENTORY
    // One dataset shared by every scenario; each run works on its own
    // snapshot of it.
    let mut data_rng = StdRng::seed_from_u64(42);
    let generated_demand = generate::generate_demand(&items, start_date, horizon_days, &mut data_rng);
    let purchased = generate::purchase_inventory(
        &items,
        &generated_demand,
        &PurchasePolicy::default(),
        &mut data_rng,
    );

    // Persist the tables and reload them through the validation gate,
    // so the runs consume exactly what a real feed would deliver.
    reporting::write_ledger("demand_table.csv", &generated_demand)?;
    let purchase_rows: Vec<input::RawInventoryRow> =
        purchased.iter().map(input::RawInventoryRow::from).collect();
    reporting::write_ledger("inventory_table.csv", &purchase_rows)?;
    let demand = input::read_demand_csv(File::open("demand_table.csv")?)?;
    let inventory = input::read_inventory_csv(File::open("inventory_table.csv")?)?;
    println!(
        "Loaded {} demand lines and {} inventory batches over {} days.",
        demand.len(),
        inventory.len(),
        horizon_days
    );

    // 3. DEFINE SCENARIOS
    // Perfect FEFO is the baseline; the imperfect runs relocate 3% and
    // 10% of batches to simulate sloppy shelf rotation.
    let scenarios = vec![
        ScenarioConfig::new("Perfect FEFO", 0.0, 101),
        ScenarioConfig::new("Imperfect FEFO 3%", 0.03, 102),
        ScenarioConfig::new("Imperfect FEFO 10%", 0.10, 103),
    ];

    // 4. RUN SCENARIOS
    let mut table: Vec<KpiRecord> = Vec::new();
    let mut baseline: Option<RunLedgers> = None;
    for scenario in &scenarios {
        let mut rng = StdRng::seed_from_u64(scenario.rng_seed);
        let ledgers = FefoSimulation::with_disorder(
            demand.clone(),
            inventory.clone(),
            scenario.disorder_fraction,
            &mut rng,
        )
        .run()?;

        let total = results::total_nominal_demand(&ledgers.fulfillments);
        table.push(results::summarize(
            &ledgers.fulfillments,
            &ledgers.waste,
            total,
            &scenario.label,
            scenario.disorder_fraction,
        ));
        println!(
            "{}: {} fulfillment rows, {} waste rows, {} residual batches.",
            scenario.label,
            ledgers.fulfillments.len(),
            ledgers.waste.len(),
            ledgers.residual.len()
        );

        let slug = file_slug(&scenario.label);
        reporting::write_ledger(format!("{slug}_demand.csv"), &ledgers.fulfillments)?;
        reporting::write_ledger(format!("{slug}_inventory.csv"), &ledgers.usage)?;
        reporting::write_ledger(format!("{slug}_waste.csv"), &ledgers.waste)?;

        if scenario.disorder_fraction == 0.0 && baseline.is_none() {
            baseline = Some(ledgers);
        }
    }

    // 5. OPTIMIZER COMPARISON
    // The comparison allocator re-plans the baseline run's undelivered
    // units. If it cannot produce a solution the FEFO rows above still
    // stand; only this row is skipped.
    if let Some(ledgers) = &baseline {
        let total = results::total_nominal_demand(&ledgers.fulfillments);
        let optimizer = GreedyHindsightOptimizer::new();
        let shortages = results::unmet_demand(&ledgers.fulfillments);
        match optimizer.allocate(&ledgers.residual, &shortages) {
            Ok(usage) => {
                reporting::write_ledger("optimizer_usage.csv", &usage)?;
                table.push(results::summarize_with_optimizer(
                    &ledgers.fulfillments,
                    &ledgers.waste,
                    &usage,
                    total,
                    "+ Optimization",
                ));
            }
            Err(e) => eprintln!("Skipping optimized KPIs: {e}"),
        }
    }

    // 6. EXPORT RESULTS
    match reporting::write_ledger("results.csv", &table) {
        Ok(()) => println!("Success! Comparison table written to ./results.csv"),
        Err(e) => eprintln!("Error writing CSV: {e}"),
    }

    // 7. PRINT COMPARISON
    println!();
    reporting::print_kpi_table(&table);
    println!("\nSimulation Complete.");
    Ok(())
}
