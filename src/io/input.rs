// src/io/input.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::model::batch::{DemandLine, InventoryBatch};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw demand row as it arrives from CSV. Everything lands as text so
/// validation can attach row context instead of surfacing an opaque
/// deserialization failure halfway through a run.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDemandRow {
    pub item_code: String,
    pub demand_date: String,
    pub required_quantity: String,
}

/// Raw inventory row as it arrives from (or is persisted to) CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawInventoryRow {
    pub batch_id: String,
    pub item_code: String,
    pub quantity: String,
    pub expiration_date: String,
}

impl From<&InventoryBatch> for RawInventoryRow {
    fn from(batch: &InventoryBatch) -> Self {
        Self {
            batch_id: batch.batch_id.to_string(),
            item_code: batch.item_code.clone(),
            quantity: batch.nominal_quantity.to_string(),
            expiration_date: batch.expiration_date.format(DATE_FORMAT).to_string(),
        }
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| format!("unparseable date '{}'", text))
}

fn parse_quantity(text: &str) -> Result<u32, String> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| format!("non-numeric quantity '{}'", text))?;
    u32::try_from(value).map_err(|_| format!("negative or oversized quantity '{}'", text))
}

/// Validates raw demand rows into typed lines. The whole input is
/// rejected on the first bad row — a run starts with clean data or not
/// at all.
pub fn demand_from_rows(rows: &[RawDemandRow]) -> Result<Vec<DemandLine>, SimulationError> {
    let mut lines = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let fail = |reason: String| SimulationError::InvalidDemandRow {
            row: index + 1,
            item_code: row.item_code.clone(),
            reason,
        };
        if row.item_code.trim().is_empty() {
            return Err(fail("missing item code".to_string()));
        }
        let demand_date = parse_date(&row.demand_date).map_err(fail)?;
        let required_quantity = parse_quantity(&row.required_quantity).map_err(fail)?;
        lines.push(DemandLine::new(row.item_code.trim(), demand_date, required_quantity));
    }
    Ok(lines)
}

/// Validates raw inventory rows into typed batches, same fail-fast
/// policy as the demand side.
pub fn inventory_from_rows(rows: &[RawInventoryRow]) -> Result<Vec<InventoryBatch>, SimulationError> {
    let mut batches = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let batch_id: u32 = row.batch_id.trim().parse().map_err(|_| {
            SimulationError::InvalidInventoryRow {
                row: index + 1,
                item_code: row.item_code.clone(),
                batch_id: 0,
                reason: format!("non-numeric batch id '{}'", row.batch_id),
            }
        })?;
        let fail = |reason: String| SimulationError::InvalidInventoryRow {
            row: index + 1,
            item_code: row.item_code.clone(),
            batch_id,
            reason,
        };
        if row.item_code.trim().is_empty() {
            return Err(fail("missing item code".to_string()));
        }
        let expiration_date = parse_date(&row.expiration_date).map_err(fail)?;
        let quantity = parse_quantity(&row.quantity).map_err(fail)?;
        batches.push(InventoryBatch::new(
            batch_id,
            row.item_code.trim(),
            quantity,
            expiration_date,
        ));
    }
    Ok(batches)
}

/// Reads and validates a demand CSV with headers
/// `item_code,demand_date,required_quantity`.
pub fn read_demand_csv<R: std::io::Read>(reader: R) -> Result<Vec<DemandLine>, SimulationError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let rows: Vec<RawDemandRow> = csv_reader
        .deserialize()
        .collect::<Result<_, csv::Error>>()?;
    demand_from_rows(&rows)
}

/// Reads and validates an inventory CSV with headers
/// `batch_id,item_code,quantity,expiration_date`.
pub fn read_inventory_csv<R: std::io::Read>(
    reader: R,
) -> Result<Vec<InventoryBatch>, SimulationError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let rows: Vec<RawInventoryRow> = csv_reader
        .deserialize()
        .collect::<Result<_, csv::Error>>()?;
    inventory_from_rows(&rows)
}
