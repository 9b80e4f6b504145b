use std::collections::HashMap;
use std::io::Read;

use cider_core::{
    CostScenario, CostTemplate, InputValidationError, NewScenarioRecord, NewTemplateRecord,
    RepositoryError, SimulationRepository,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when importing templates or scenarios.
#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Row '{name}' is invalid: {source}")]
    Invalid {
        name: String,
        #[source]
        source: InputValidationError,
    },

    #[error("Name '{0}' appears more than once in the file")]
    DuplicateName(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for CsvImportError {
    fn from(err: csv::Error) -> Self {
        CsvImportError::CsvParse(err.to_string())
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// One row of a template CSV. Column names match [`CostTemplate`] fields,
/// preceded by `name` and an optional `description`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TemplateCsvRecord {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub description: Option<String>,
    pub juice_per_liter: Decimal,
    pub yeast_per_1000l: Decimal,
    pub sugar_per_kg: Decimal,
    pub other_per_bottle: Decimal,
    pub bottle_75cl: Decimal,
    pub bottle_150cl: Decimal,
    pub label: Decimal,
    pub cap: Decimal,
    pub box_cost: Decimal,
    pub hourly_rate: Decimal,
    pub hours_per_batch: Decimal,
    pub monthly_fixed_labor: Decimal,
    pub monthly_fixed_overhead: Decimal,
    pub overhead_per_liter: Decimal,
    pub overhead_percent_of_cogs: Decimal,
    pub wastage_percent: Decimal,
    pub yield_efficiency: Decimal,
    pub bottle_75cl_price: Decimal,
    pub bottle_150cl_price: Decimal,
    pub price_inflation_yearly: Decimal,
    pub depreciation_yearly: Decimal,
    pub interest_expense_yearly: Decimal,
    pub tax_rate: Decimal,
}

impl TemplateCsvRecord {
    pub fn template(&self) -> CostTemplate {
        CostTemplate {
            juice_per_liter: self.juice_per_liter,
            yeast_per_1000l: self.yeast_per_1000l,
            sugar_per_kg: self.sugar_per_kg,
            other_per_bottle: self.other_per_bottle,
            bottle_75cl: self.bottle_75cl,
            bottle_150cl: self.bottle_150cl,
            label: self.label,
            cap: self.cap,
            box_cost: self.box_cost,
            hourly_rate: self.hourly_rate,
            hours_per_batch: self.hours_per_batch,
            monthly_fixed_labor: self.monthly_fixed_labor,
            monthly_fixed_overhead: self.monthly_fixed_overhead,
            overhead_per_liter: self.overhead_per_liter,
            overhead_percent_of_cogs: self.overhead_percent_of_cogs,
            wastage_percent: self.wastage_percent,
            yield_efficiency: self.yield_efficiency,
            bottle_75cl_price: self.bottle_75cl_price,
            bottle_150cl_price: self.bottle_150cl_price,
            price_inflation_yearly: self.price_inflation_yearly,
            depreciation_yearly: self.depreciation_yearly,
            interest_expense_yearly: self.interest_expense_yearly,
            tax_rate: self.tax_rate,
        }
    }
}

/// One row of a scenario CSV. The two cap columns may be left empty.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioCsvRecord {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub description: Option<String>,
    pub volume_multiplier: Decimal,
    pub price_multiplier: Decimal,
    pub cost_multiplier: Decimal,
    pub labor_multiplier: Decimal,
    pub demand_growth_yearly: Decimal,
    pub direct_sales_percent: Decimal,
    pub wholesale_percent: Decimal,
    pub retail_percent: Decimal,
    pub wholesale_discount_percent: Decimal,
    pub retail_discount_percent: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub max_production_liters_yearly: Option<Decimal>,
    #[serde(default)]
    pub max_storage_bottles: Option<i64>,
    pub holding_cost_per_bottle_monthly: Decimal,
}

impl ScenarioCsvRecord {
    pub fn scenario(&self) -> CostScenario {
        CostScenario {
            volume_multiplier: self.volume_multiplier,
            price_multiplier: self.price_multiplier,
            cost_multiplier: self.cost_multiplier,
            labor_multiplier: self.labor_multiplier,
            demand_growth_yearly: self.demand_growth_yearly,
            direct_sales_percent: self.direct_sales_percent,
            wholesale_percent: self.wholesale_percent,
            retail_percent: self.retail_percent,
            wholesale_discount_percent: self.wholesale_discount_percent,
            retail_discount_percent: self.retail_discount_percent,
            max_production_liters_yearly: self.max_production_liters_yearly,
            max_storage_bottles: self.max_storage_bottles,
            holding_cost_per_bottle_monthly: self.holding_cost_per_bottle_monthly,
        }
    }
}

fn parse_records<R, T>(reader: R) -> Result<Vec<T>, CsvImportError>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: T = result?;
        records.push(record);
    }

    Ok(records)
}

fn ensure_unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), CsvImportError> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CsvImportError::DuplicateName(name.to_string()));
        }
    }
    Ok(())
}

/// Imports cost templates from CSV.
///
/// Loading is idempotent: a row whose name matches a stored template
/// replaces that template's values instead of adding a second one.
pub struct TemplateCsvLoader;

impl TemplateCsvLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TemplateCsvRecord>, CsvImportError> {
        parse_records(reader)
    }

    /// Validates every record, then writes them all.
    ///
    /// Returns how many templates were created or updated. Nothing is
    /// written when any record fails validation.
    pub async fn load<R: SimulationRepository + ?Sized>(
        repo: &R,
        records: &[TemplateCsvRecord],
    ) -> Result<usize, CsvImportError> {
        ensure_unique_names(records.iter().map(|r| r.name.as_str()))?;
        for record in records {
            record
                .template()
                .validate()
                .map_err(|source| CsvImportError::Invalid {
                    name: record.name.clone(),
                    source,
                })?;
        }

        let mut existing: HashMap<String, _> = repo
            .list_templates()
            .await?
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();

        let mut written = 0;
        for record in records {
            match existing.remove(&record.name) {
                Some(mut stored) => {
                    stored.description = record.description.clone();
                    stored.template = record.template();
                    repo.update_template(&stored).await?;
                    debug!(id = stored.id, name = %record.name, "updated template");
                }
                None => {
                    let created = repo
                        .create_template(NewTemplateRecord {
                            name: record.name.clone(),
                            description: record.description.clone(),
                            template: record.template(),
                        })
                        .await?;
                    debug!(id = created.id, name = %record.name, "created template");
                }
            }
            written += 1;
        }

        Ok(written)
    }
}

/// Imports cost scenarios from CSV, updating stored scenarios by name.
pub struct ScenarioCsvLoader;

impl ScenarioCsvLoader {
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScenarioCsvRecord>, CsvImportError> {
        parse_records(reader)
    }

    /// Same contract as [`TemplateCsvLoader::load`].
    pub async fn load<R: SimulationRepository + ?Sized>(
        repo: &R,
        records: &[ScenarioCsvRecord],
    ) -> Result<usize, CsvImportError> {
        ensure_unique_names(records.iter().map(|r| r.name.as_str()))?;
        for record in records {
            record
                .scenario()
                .validate()
                .map_err(|source| CsvImportError::Invalid {
                    name: record.name.clone(),
                    source,
                })?;
        }

        let mut existing: HashMap<String, _> = repo
            .list_scenarios()
            .await?
            .into_iter()
            .map(|s| (s.name.clone(), s))
            .collect();

        let mut written = 0;
        for record in records {
            match existing.remove(&record.name) {
                Some(mut stored) => {
                    stored.description = record.description.clone();
                    stored.scenario = record.scenario();
                    repo.update_scenario(&stored).await?;
                    debug!(id = stored.id, name = %record.name, "updated scenario");
                }
                None => {
                    let created = repo
                        .create_scenario(NewScenarioRecord {
                            name: record.name.clone(),
                            description: record.description.clone(),
                            scenario: record.scenario(),
                        })
                        .await?;
                    debug!(id = created.id, name = %record.name, "created scenario");
                }
            }
            written += 1;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use cider_core::models::{reference_scenario, reference_template};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const TEMPLATE_HEADER: &str = "name,description,juice_per_liter,yeast_per_1000l,sugar_per_kg,other_per_bottle,bottle_75cl,bottle_150cl,label,cap,box_cost,hourly_rate,hours_per_batch,monthly_fixed_labor,monthly_fixed_overhead,overhead_per_liter,overhead_percent_of_cogs,wastage_percent,yield_efficiency,bottle_75cl_price,bottle_150cl_price,price_inflation_yearly,depreciation_yearly,interest_expense_yearly,tax_rate";

    const SCENARIO_HEADER: &str = "name,description,volume_multiplier,price_multiplier,cost_multiplier,labor_multiplier,demand_growth_yearly,direct_sales_percent,wholesale_percent,retail_percent,wholesale_discount_percent,retail_discount_percent,max_production_liters_yearly,max_storage_bottles,holding_cost_per_bottle_monthly";

    fn template_csv(rows: &[&str]) -> String {
        format!("{}\n{}\n", TEMPLATE_HEADER, rows.join("\n"))
    }

    fn scenario_csv(rows: &[&str]) -> String {
        format!("{}\n{}\n", SCENARIO_HEADER, rows.join("\n"))
    }

    // =========================================================================
    // Template parsing tests
    // =========================================================================

    #[test]
    fn test_parse_reference_template_row() {
        let csv = template_csv(&[
            "Reference,Small cidery,8,741,0.1,10.96,3,5,4,0.1,2,350,8,0,10000,0.5,15,5,95,110,200,3,50000,0,22",
        ]);

        let records = TemplateCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Reference");
        assert_eq!(records[0].description.as_deref(), Some("Small cidery"));
        assert_eq!(records[0].template(), reference_template());
    }

    #[test]
    fn test_parse_template_empty_description_is_none() {
        let csv = template_csv(&[
            "Plain,,8,741,0.1,10.96,3,5,4,0.1,2,350,8,0,10000,0.5,15,5,95,110,200,3,50000,0,22",
        ]);

        let records = TemplateCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].description, None);
    }

    #[test]
    fn test_parse_template_missing_column() {
        let csv = "name,juice_per_liter\nShort,8";

        let err = TemplateCsvLoader::parse(csv.as_bytes()).expect_err("Should fail");

        let CsvImportError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(msg.contains("missing field"), "got: {}", msg);
    }

    #[test]
    fn test_parse_template_bad_decimal() {
        let csv = template_csv(&[
            "Bad,,eight,741,0.1,10.96,3,5,4,0.1,2,350,8,0,10000,0.5,15,5,95,110,200,3,50000,0,22",
        ]);

        let err = TemplateCsvLoader::parse(csv.as_bytes()).expect_err("Should fail");

        assert!(matches!(err, CsvImportError::CsvParse(_)));
    }

    #[test]
    fn test_parse_empty_template_csv() {
        let csv = format!("{}\n", TEMPLATE_HEADER);

        let records = TemplateCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    // =========================================================================
    // Scenario parsing tests
    // =========================================================================

    #[test]
    fn test_parse_scenario_without_caps() {
        let csv = scenario_csv(&["Growth,,1,1,1,1,50,40,40,20,15,10,,,0.5"]);

        let records = ScenarioCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].max_production_liters_yearly, None);
        assert_eq!(records[0].max_storage_bottles, None);
        assert_eq!(records[0].scenario(), reference_scenario());
    }

    #[test]
    fn test_parse_scenario_with_caps() {
        let csv = scenario_csv(&["Capped,Small barn,1,1,1,1,50,40,40,20,15,10, 2000 ,1500,0.5"]);

        let records = ScenarioCsvLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].max_production_liters_yearly, Some(dec!(2000)));
        assert_eq!(records[0].max_storage_bottles, Some(1500));
    }

    #[test]
    fn test_parse_scenario_fractional_storage_cap_is_rejected() {
        let csv = scenario_csv(&["Capped,,1,1,1,1,50,40,40,20,15,10,,1500.5,0.5"]);

        assert!(matches!(
            ScenarioCsvLoader::parse(csv.as_bytes()),
            Err(CsvImportError::CsvParse(_))
        ));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn test_unique_names_accepts_distinct() {
        assert!(ensure_unique_names(["a", "b"].into_iter()).is_ok());
    }

    #[test]
    fn test_unique_names_reports_duplicate() {
        match ensure_unique_names(["a", "b", "a"].into_iter()) {
            Err(CsvImportError::DuplicateName(name)) => assert_eq!(name, "a"),
            other => panic!("expected DuplicateName, got {other:?}"),
        }
    }
}
