//! CSV import of cost templates and scenarios, and CSV/JSON export of
//! simulation results.

pub mod export;
pub mod loader;

pub use export::{ExportError, PROJECTION_COLUMNS, write_projections_csv, write_result_json};
pub use loader::{
    CsvImportError, ScenarioCsvLoader, ScenarioCsvRecord, TemplateCsvLoader, TemplateCsvRecord,
};
