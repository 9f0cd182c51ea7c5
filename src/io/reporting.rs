// src/io/reporting.rs

use std::path::Path;

use serde::Serialize;

use crate::analysis::results::KpiRecord;
use crate::error::SimulationError;

/// Writes any serializable ledger to a CSV file.
pub fn write_ledger<T: Serialize, P: AsRef<Path>>(
    path: P,
    rows: &[T],
) -> Result<(), SimulationError> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Prints the scenario comparison table.
pub fn print_kpi_table(records: &[KpiRecord]) {
    println!(
        "{:<22} {:>9} {:>11} {:>14} {:>9} {:>15} {:>13}",
        "model", "error_pct", "waste_pcs", "shortage_pcs", "loss_pct", "fulfilled_pcs", "fulfilled_pct"
    );
    for record in records {
        println!(
            "{:<22} {:>9.1} {:>11} {:>14} {:>9.2} {:>15} {:>13.2}",
            record.model,
            record.error_pct,
            record.waste_units,
            record.shortage_units,
            record.loss_pct,
            record.fulfilled_units,
            record.fulfilled_pct
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::records::WasteRecord;
    use chrono::NaiveDate;

    #[test]
    fn ledger_round_trips_through_csv() {
        let rows = vec![WasteRecord {
            item_code: "APL-01".to_string(),
            batch_id: 3,
            nominal_quantity: 40,
            expired_quantity: 12,
            expiration_date: NaiveDate::from_ymd_opt(2025, 5, 9).unwrap(),
        }];

        let path = std::env::temp_dir().join("fefo_reporting_test_waste.csv");
        write_ledger(&path, &rows).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "item_code,batch_id,nominal_quantity,expired_quantity,expiration_date"
        );
        assert_eq!(lines.next().unwrap(), "APL-01,3,40,12,2025-05-09");
    }
}
