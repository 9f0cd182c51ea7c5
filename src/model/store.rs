// src/model/store.rs

use std::collections::BTreeMap;

use crate::model::batch::InventoryBatch;

/// Per-run arena of inventory batches, grouped by item code.
///
/// Each run owns its store outright; batches are never aliased across
/// concurrent runs. Within a group the walk order is whatever sequence
/// the store was built from, which is how an injected disorder survives
/// into the allocation walk. A `BTreeMap` keeps item iteration
/// deterministic, so ledgers come out in the same order on every run.
#[derive(Debug, Clone)]
pub struct BatchStore {
    by_item: BTreeMap<String, Vec<InventoryBatch>>,
}

impl BatchStore {
    /// Groups batches in First-Expired-First-Out order: expiration
    /// ascending, ties broken by input order (stable sort).
    pub fn from_batches(mut batches: Vec<InventoryBatch>) -> Self {
        batches.sort_by_key(|b| b.expiration_date);
        Self::from_sequence(batches)
    }

    /// Groups batches preserving the sequence order as-is. Used after
    /// the disorder injector has perturbed an expiration-sorted
    /// sequence; re-sorting here would undo the injected error.
    pub fn from_sequence(batches: Vec<InventoryBatch>) -> Self {
        let mut by_item: BTreeMap<String, Vec<InventoryBatch>> = BTreeMap::new();
        for batch in batches {
            by_item.entry(batch.item_code.clone()).or_default().push(batch);
        }
        Self { by_item }
    }

    pub fn batches(&self, item_code: &str) -> Option<&[InventoryBatch]> {
        self.by_item.get(item_code).map(Vec::as_slice)
    }

    pub fn batches_mut(&mut self, item_code: &str) -> Option<&mut [InventoryBatch]> {
        self.by_item.get_mut(item_code).map(Vec::as_mut_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[InventoryBatch])> {
        self.by_item.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut [InventoryBatch])> {
        self.by_item
            .iter_mut()
            .map(|(k, v)| (k.as_str(), v.as_mut_slice()))
    }

    pub fn batch_count(&self) -> usize {
        self.by_item.values().map(Vec::len).sum()
    }
}
