use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    NewScenarioRecord, NewSimulationRecord, NewTemplateRecord, ScenarioRecord, SimulationRecord,
    TemplateRecord,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Storage for cost templates, scenarios and saved simulation results.
///
/// The projection engine never touches this trait; callers load inputs,
/// run the simulation and hand the result back for saving.
#[async_trait]
pub trait SimulationRepository: Send + Sync {
    // Cost templates
    async fn create_template(
        &self,
        template: NewTemplateRecord,
    ) -> Result<TemplateRecord, RepositoryError>;

    async fn get_template(&self, id: i64) -> Result<TemplateRecord, RepositoryError>;

    async fn update_template(
        &self,
        template: &TemplateRecord,
    ) -> Result<(), RepositoryError>;

    async fn delete_template(&self, id: i64) -> Result<(), RepositoryError>;

    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, RepositoryError>;

    // Cost scenarios
    async fn create_scenario(
        &self,
        scenario: NewScenarioRecord,
    ) -> Result<ScenarioRecord, RepositoryError>;

    async fn get_scenario(&self, id: i64) -> Result<ScenarioRecord, RepositoryError>;

    async fn update_scenario(
        &self,
        scenario: &ScenarioRecord,
    ) -> Result<(), RepositoryError>;

    async fn delete_scenario(&self, id: i64) -> Result<(), RepositoryError>;

    async fn list_scenarios(&self) -> Result<Vec<ScenarioRecord>, RepositoryError>;

    // Simulation results
    async fn save_result(
        &self,
        result: NewSimulationRecord,
    ) -> Result<SimulationRecord, RepositoryError>;

    async fn get_result(&self, id: i64) -> Result<SimulationRecord, RepositoryError>;

    async fn delete_result(&self, id: i64) -> Result<(), RepositoryError>;

    /// Saved results, newest first, optionally only those for one template.
    async fn list_results(
        &self,
        template_id: Option<i64>,
    ) -> Result<Vec<SimulationRecord>, RepositoryError>;
}
