// src/simulation/config.rs

/// One scenario of the sweep: a label for the results table, how much
/// FEFO execution error to inject, and the seed its private RNG starts
/// from. Each scenario runs on its own batch-store snapshot with its
/// own generator, so runs are independent and reproducible from the
/// seed alone.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    pub label: String,
    /// Share of batches relocated within the expiration-sorted
    /// sequence, in [0, 1]. Zero is the perfect-FEFO baseline.
    pub disorder_fraction: f64,
    pub rng_seed: u64,
}

impl ScenarioConfig {
    pub fn new(label: impl Into<String>, disorder_fraction: f64, rng_seed: u64) -> Self {
        Self {
            label: label.into(),
            disorder_fraction,
            rng_seed,
        }
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            label: "Perfect FEFO".to_string(),
            disorder_fraction: 0.0,
            rng_seed: 42,
        }
    }
}
