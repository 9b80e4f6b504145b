//! SQLite storage for cost templates, scenarios and saved simulation results.
//!
//! Decimal inputs live in REAL columns; a saved [`cider_core::SimulationResult`]
//! is kept whole as JSON so that reloading it gives back exactly the figures
//! that were computed.

mod decimal;
pub mod factory;
pub mod repository;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteRepository;
