//! Host-owned memoization of simulation runs.
//!
//! A run is fully determined by its template, scenario, horizon and base
//! volume, so identical inputs can share one [`SimulationResult`].

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::simulation::SimulationRunner;
use crate::models::{CostScenario, CostTemplate, SimulationResult};

/// Everything a simulation result depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationKey {
    pub template: CostTemplate,
    pub scenario: CostScenario,
    pub years: u32,
    pub base_volume: Decimal,
}

/// Cache of completed runs keyed by [`SimulationKey`].
///
/// `Decimal` hashes by value, so `1000` and `1000.00` share an entry.
#[derive(Debug, Default)]
pub struct SimulationCache {
    entries: HashMap<SimulationKey, Arc<SimulationResult>>,
    hits: u64,
    misses: u64,
}

impl SimulationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for these inputs, running the simulation on
    /// a miss.
    pub fn get_or_run(
        &mut self,
        template: &CostTemplate,
        scenario: &CostScenario,
        years: u32,
        base_volume: Decimal,
    ) -> Arc<SimulationResult> {
        let key = SimulationKey {
            template: template.clone(),
            scenario: scenario.clone(),
            years,
            base_volume,
        };

        if let Some(result) = self.entries.get(&key) {
            self.hits += 1;
            debug!(years, base_volume = %base_volume, "simulation cache hit");
            return Arc::clone(result);
        }

        self.misses += 1;
        debug!(years, base_volume = %base_volume, "simulation cache miss");
        let result = Arc::new(SimulationRunner::new(template, scenario).run(years, base_volume));
        self.entries.insert(key, Arc::clone(&result));
        result
    }

    /// Looks up a result without running anything or touching the counters.
    pub fn peek(
        &self,
        key: &SimulationKey,
    ) -> Option<Arc<SimulationResult>> {
        self.entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Hit and miss counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
