//! Multi-year financial projections for cider production.
//!
//! Start with [`run_simulation`] or [`SimulationRunner`], feed the result to
//! [`recommend`], and render figures with [`format`].

pub mod calculations;
pub mod db;
pub mod format;
pub mod models;

pub use calculations::{
    Recommendation, RecommendationKind, SimulationCache, SimulationRunner, YearProjector,
    recommend, run_simulation,
};
pub use db::repository::{RepositoryError, SimulationRepository};
pub use models::*;
