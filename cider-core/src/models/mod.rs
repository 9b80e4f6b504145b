mod cost_scenario;
mod cost_template;
mod projection;
mod scenario_record;
mod simulation_record;
mod template_record;
mod validation;

pub use cost_scenario::{CostScenario, reference_scenario};
pub use cost_template::{CostTemplate, reference_template};
pub use projection::{SimulationResult, YearlyProjection};
pub use scenario_record::{NewScenarioRecord, ScenarioRecord};
pub use simulation_record::{NewSimulationRecord, SimulationRecord};
pub use template_record::{NewTemplateRecord, TemplateRecord};
pub use validation::InputValidationError;
