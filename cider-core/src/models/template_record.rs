use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CostTemplate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub template: CostTemplate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating new templates (no id or timestamps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTemplateRecord {
    pub name: String,
    pub description: Option<String>,
    pub template: CostTemplate,
}
