use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CostScenario;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub scenario: CostScenario,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating new scenarios (no id or timestamps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewScenarioRecord {
    pub name: String,
    pub description: Option<String>,
    pub scenario: CostScenario,
}
