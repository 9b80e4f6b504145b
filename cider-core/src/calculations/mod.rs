//! Financial projection calculations for cider production.
//!
//! The pipeline runs strictly downward: [`YearProjector`] computes one year,
//! [`SimulationRunner`] strings years together into a [`SimulationResult`],
//! and [`recommend`] reads the result back as a list of insights.
//!
//! [`SimulationResult`]: crate::models::SimulationResult

pub mod cache;
pub mod common;
pub mod projection;
pub mod recommendations;
pub mod simulation;

pub use cache::{SimulationCache, SimulationKey};
pub use projection::YearProjector;
pub use recommendations::{
    Recommendation, RecommendationKind, recommend, recommendation_messages,
};
pub use simulation::{
    DEFAULT_BASE_VOLUME_LITERS, DEFAULT_PROJECTION_YEARS, SimulationRunner, run_simulation,
};
