use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::SimulationResult;

/// A persisted simulation run together with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: i64,
    pub name: String,
    pub template_id: i64,
    pub scenario_id: i64,
    pub years: u32,
    pub base_volume: Decimal,
    pub result: SimulationResult,
    pub created_at: DateTime<Utc>,
}

/// For saving a new result (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSimulationRecord {
    pub name: String,
    pub template_id: i64,
    pub scenario_id: i64,
    pub years: u32,
    pub base_volume: Decimal,
    pub result: SimulationResult,
}
