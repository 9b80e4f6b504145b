use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cider_core::{
    CostScenario, CostTemplate, NewScenarioRecord, NewSimulationRecord, NewTemplateRecord,
    RepositoryError, ScenarioRecord, SimulationRecord, SimulationRepository, SimulationResult,
    TemplateRecord,
};
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use tracing::debug;

use crate::decimal::{decimal_to_f64, get_decimal, get_optional_decimal};

/// Decimal columns of `cost_template`, in the order [`template_values`]
/// returns them.
const TEMPLATE_COLUMNS: [&str; 23] = [
    "juice_per_liter",
    "yeast_per_1000l",
    "sugar_per_kg",
    "other_per_bottle",
    "bottle_75cl",
    "bottle_150cl",
    "label",
    "cap",
    "box_cost",
    "hourly_rate",
    "hours_per_batch",
    "monthly_fixed_labor",
    "monthly_fixed_overhead",
    "overhead_per_liter",
    "overhead_percent_of_cogs",
    "wastage_percent",
    "yield_efficiency",
    "bottle_75cl_price",
    "bottle_150cl_price",
    "price_inflation_yearly",
    "depreciation_yearly",
    "interest_expense_yearly",
    "tax_rate",
];

/// Required decimal columns of `cost_scenario`, in the order
/// [`scenario_values`] returns them. The two optional caps follow.
const SCENARIO_COLUMNS: [&str; 11] = [
    "volume_multiplier",
    "price_multiplier",
    "cost_multiplier",
    "labor_multiplier",
    "demand_growth_yearly",
    "direct_sales_percent",
    "wholesale_percent",
    "retail_percent",
    "wholesale_discount_percent",
    "retail_discount_percent",
    "holding_cost_per_bottle_monthly",
];

const SCENARIO_CAP_COLUMNS: [&str; 2] = ["max_production_liters_yearly", "max_storage_bottles"];

const RESULT_COLUMNS: &str =
    "id, name, template_id, scenario_id, years, base_volume, result_json, created_at";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connects to `database_url`, creating the database file if needed.
    ///
    /// Accepts sqlx URLs (`sqlite:cider.db?mode=rwc`), bare paths and
    /// `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Executes every `.sql` file in `seeds_dir`, in file name order.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn template_values(t: &CostTemplate) -> [Decimal; 23] {
    [
        t.juice_per_liter,
        t.yeast_per_1000l,
        t.sugar_per_kg,
        t.other_per_bottle,
        t.bottle_75cl,
        t.bottle_150cl,
        t.label,
        t.cap,
        t.box_cost,
        t.hourly_rate,
        t.hours_per_batch,
        t.monthly_fixed_labor,
        t.monthly_fixed_overhead,
        t.overhead_per_liter,
        t.overhead_percent_of_cogs,
        t.wastage_percent,
        t.yield_efficiency,
        t.bottle_75cl_price,
        t.bottle_150cl_price,
        t.price_inflation_yearly,
        t.depreciation_yearly,
        t.interest_expense_yearly,
        t.tax_rate,
    ]
}

fn scenario_values(s: &CostScenario) -> [Decimal; 11] {
    [
        s.volume_multiplier,
        s.price_multiplier,
        s.cost_multiplier,
        s.labor_multiplier,
        s.demand_growth_yearly,
        s.direct_sales_percent,
        s.wholesale_percent,
        s.retail_percent,
        s.wholesale_discount_percent,
        s.retail_discount_percent,
        s.holding_cost_per_bottle_monthly,
    ]
}

fn template_select() -> String {
    format!(
        "SELECT id, name, description, {}, created_at, updated_at FROM cost_template",
        TEMPLATE_COLUMNS.join(", ")
    )
}

fn scenario_select() -> String {
    format!(
        "SELECT id, name, description, {}, {}, created_at, updated_at FROM cost_scenario",
        SCENARIO_COLUMNS.join(", "),
        SCENARIO_CAP_COLUMNS.join(", ")
    )
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn assignments(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|c| format!("{} = ?", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn get_column<'r, T>(
    row: &'r SqliteRow,
    column: &str,
) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get {}: {}", column, e)))
}

fn row_to_template(row: &SqliteRow) -> Result<TemplateRecord, RepositoryError> {
    let d = |column: &str| get_decimal(row, column);
    Ok(TemplateRecord {
        id: get_column(row, "id")?,
        name: get_column(row, "name")?,
        description: get_column(row, "description")?,
        template: CostTemplate {
            juice_per_liter: d("juice_per_liter")?,
            yeast_per_1000l: d("yeast_per_1000l")?,
            sugar_per_kg: d("sugar_per_kg")?,
            other_per_bottle: d("other_per_bottle")?,
            bottle_75cl: d("bottle_75cl")?,
            bottle_150cl: d("bottle_150cl")?,
            label: d("label")?,
            cap: d("cap")?,
            box_cost: d("box_cost")?,
            hourly_rate: d("hourly_rate")?,
            hours_per_batch: d("hours_per_batch")?,
            monthly_fixed_labor: d("monthly_fixed_labor")?,
            monthly_fixed_overhead: d("monthly_fixed_overhead")?,
            overhead_per_liter: d("overhead_per_liter")?,
            overhead_percent_of_cogs: d("overhead_percent_of_cogs")?,
            wastage_percent: d("wastage_percent")?,
            yield_efficiency: d("yield_efficiency")?,
            bottle_75cl_price: d("bottle_75cl_price")?,
            bottle_150cl_price: d("bottle_150cl_price")?,
            price_inflation_yearly: d("price_inflation_yearly")?,
            depreciation_yearly: d("depreciation_yearly")?,
            interest_expense_yearly: d("interest_expense_yearly")?,
            tax_rate: d("tax_rate")?,
        },
        created_at: get_column::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get_column::<DateTime<Utc>>(row, "updated_at")?,
    })
}

fn row_to_scenario(row: &SqliteRow) -> Result<ScenarioRecord, RepositoryError> {
    let d = |column: &str| get_decimal(row, column);
    Ok(ScenarioRecord {
        id: get_column(row, "id")?,
        name: get_column(row, "name")?,
        description: get_column(row, "description")?,
        scenario: CostScenario {
            volume_multiplier: d("volume_multiplier")?,
            price_multiplier: d("price_multiplier")?,
            cost_multiplier: d("cost_multiplier")?,
            labor_multiplier: d("labor_multiplier")?,
            demand_growth_yearly: d("demand_growth_yearly")?,
            direct_sales_percent: d("direct_sales_percent")?,
            wholesale_percent: d("wholesale_percent")?,
            retail_percent: d("retail_percent")?,
            wholesale_discount_percent: d("wholesale_discount_percent")?,
            retail_discount_percent: d("retail_discount_percent")?,
            max_production_liters_yearly: get_optional_decimal(
                row,
                "max_production_liters_yearly",
            )?,
            max_storage_bottles: get_column(row, "max_storage_bottles")?,
            holding_cost_per_bottle_monthly: d("holding_cost_per_bottle_monthly")?,
        },
        created_at: get_column::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get_column::<DateTime<Utc>>(row, "updated_at")?,
    })
}

fn row_to_result(row: &SqliteRow) -> Result<SimulationRecord, RepositoryError> {
    let json: String = get_column(row, "result_json")?;
    let result: SimulationResult = serde_json::from_str(&json)
        .map_err(|e| RepositoryError::Serialization(format!("Invalid result_json: {}", e)))?;
    let years: i64 = get_column(row, "years")?;

    Ok(SimulationRecord {
        id: get_column(row, "id")?,
        name: get_column(row, "name")?,
        template_id: get_column(row, "template_id")?,
        scenario_id: get_column(row, "scenario_id")?,
        years: u32::try_from(years)
            .map_err(|e| RepositoryError::Database(format!("Invalid years {}: {}", years, e)))?,
        base_volume: get_decimal(row, "base_volume")?,
        result,
        created_at: get_column::<DateTime<Utc>>(row, "created_at")?,
    })
}

/// Maps a UNIQUE violation to a readable error; anything else is passed on.
fn write_error(
    table: &str,
    name: &str,
    err: sqlx::Error,
) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Database(
            format!("{} named '{}' already exists", table, name),
        ),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            RepositoryError::NotFound
        }
        _ => RepositoryError::Database(err.to_string()),
    }
}

#[async_trait]
impl SimulationRepository for SqliteRepository {
    async fn create_template(
        &self,
        template: NewTemplateRecord,
    ) -> Result<TemplateRecord, RepositoryError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO cost_template (name, description, {}, created_at, updated_at)
             VALUES (?, ?, {}, ?, ?)",
            TEMPLATE_COLUMNS.join(", "),
            placeholders(TEMPLATE_COLUMNS.len())
        );

        let mut query = sqlx::query(&sql)
            .bind(&template.name)
            .bind(&template.description);
        for value in template_values(&template.template) {
            query = query.bind(decimal_to_f64(value));
        }
        let result = query
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("template", &template.name, e))?;

        self.get_template(result.last_insert_rowid()).await
    }

    async fn get_template(
        &self,
        id: i64,
    ) -> Result<TemplateRecord, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", template_select()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        row_to_template(&row)
    }

    async fn update_template(
        &self,
        template: &TemplateRecord,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "UPDATE cost_template SET name = ?, description = ?, {}, updated_at = ?
             WHERE id = ?",
            assignments(&TEMPLATE_COLUMNS)
        );

        let mut query = sqlx::query(&sql)
            .bind(&template.name)
            .bind(&template.description);
        for value in template_values(&template.template) {
            query = query.bind(decimal_to_f64(value));
        }
        let result = query
            .bind(Utc::now())
            .bind(template.id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("template", &template.name, e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_template(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cost_template WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<TemplateRecord>, RepositoryError> {
        let rows = sqlx::query(&format!("{} ORDER BY name", template_select()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_template).collect()
    }

    async fn create_scenario(
        &self,
        scenario: NewScenarioRecord,
    ) -> Result<ScenarioRecord, RepositoryError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO cost_scenario (name, description, {}, {}, created_at, updated_at)
             VALUES (?, ?, {}, ?, ?, ?, ?)",
            SCENARIO_COLUMNS.join(", "),
            SCENARIO_CAP_COLUMNS.join(", "),
            placeholders(SCENARIO_COLUMNS.len())
        );

        let caps = &scenario.scenario;
        let mut query = sqlx::query(&sql)
            .bind(&scenario.name)
            .bind(&scenario.description);
        for value in scenario_values(caps) {
            query = query.bind(decimal_to_f64(value));
        }
        let result = query
            .bind(caps.max_production_liters_yearly.map(decimal_to_f64))
            .bind(caps.max_storage_bottles)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("scenario", &scenario.name, e))?;

        self.get_scenario(result.last_insert_rowid()).await
    }

    async fn get_scenario(
        &self,
        id: i64,
    ) -> Result<ScenarioRecord, RepositoryError> {
        let row = sqlx::query(&format!("{} WHERE id = ?", scenario_select()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        row_to_scenario(&row)
    }

    async fn update_scenario(
        &self,
        scenario: &ScenarioRecord,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "UPDATE cost_scenario SET name = ?, description = ?, {}, {}, updated_at = ?
             WHERE id = ?",
            assignments(&SCENARIO_COLUMNS),
            assignments(&SCENARIO_CAP_COLUMNS)
        );

        let caps = &scenario.scenario;
        let mut query = sqlx::query(&sql)
            .bind(&scenario.name)
            .bind(&scenario.description);
        for value in scenario_values(caps) {
            query = query.bind(decimal_to_f64(value));
        }
        let result = query
            .bind(caps.max_production_liters_yearly.map(decimal_to_f64))
            .bind(caps.max_storage_bottles)
            .bind(Utc::now())
            .bind(scenario.id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("scenario", &scenario.name, e))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_scenario(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cost_scenario WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_scenarios(&self) -> Result<Vec<ScenarioRecord>, RepositoryError> {
        let rows = sqlx::query(&format!("{} ORDER BY name", scenario_select()))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_scenario).collect()
    }

    async fn save_result(
        &self,
        record: NewSimulationRecord,
    ) -> Result<SimulationRecord, RepositoryError> {
        let json = serde_json::to_string(&record.result)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO simulation_result (
                name, template_id, scenario_id, years, base_volume, result_json, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.name)
        .bind(record.template_id)
        .bind(record.scenario_id)
        .bind(i64::from(record.years))
        .bind(decimal_to_f64(record.base_volume))
        .bind(json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error("result", &record.name, e))?;

        debug!(
            id = result.last_insert_rowid(),
            template_id = record.template_id,
            scenario_id = record.scenario_id,
            "saved simulation result"
        );
        self.get_result(result.last_insert_rowid()).await
    }

    async fn get_result(
        &self,
        id: i64,
    ) -> Result<SimulationRecord, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM simulation_result WHERE id = ?",
            RESULT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_result(&row)
    }

    async fn delete_result(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM simulation_result WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn list_results(
        &self,
        template_id: Option<i64>,
    ) -> Result<Vec<SimulationRecord>, RepositoryError> {
        let rows = match template_id {
            Some(id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM simulation_result WHERE template_id = ?
                     ORDER BY created_at DESC, id DESC",
                    RESULT_COLUMNS
                ))
                .bind(id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM simulation_result ORDER BY created_at DESC, id DESC",
                    RESULT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_result).collect()
    }
}

#[cfg(test)]
mod tests {
    use cider_core::calculations::run_simulation;
    use cider_core::models::{reference_scenario, reference_template};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    fn new_template(name: &str) -> NewTemplateRecord {
        NewTemplateRecord {
            name: name.to_string(),
            description: Some("test template".to_string()),
            template: reference_template(),
        }
    }

    fn new_scenario(name: &str) -> NewScenarioRecord {
        NewScenarioRecord {
            name: name.to_string(),
            description: None,
            scenario: reference_scenario(),
        }
    }

    async fn saved_result(
        repo: &SqliteRepository,
        name: &str,
        template_id: i64,
        scenario_id: i64,
    ) -> SimulationRecord {
        let result = run_simulation(&reference_template(), &reference_scenario(), 3, dec!(1000));
        repo.save_result(NewSimulationRecord {
            name: name.to_string(),
            template_id,
            scenario_id,
            years: 3,
            base_volume: dec!(1000),
            result,
        })
        .await
        .expect("Should save result")
    }

    // =========================================================================
    // Template tests
    // =========================================================================

    #[tokio::test]
    async fn test_create_and_get_template() {
        let repo = setup_test_db().await;

        let created = repo
            .create_template(new_template("Orchard"))
            .await
            .expect("Should create template");
        let fetched = repo
            .get_template(created.id)
            .await
            .expect("Should get template");

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Orchard");
        assert_eq!(fetched.description.as_deref(), Some("test template"));
        assert_eq!(fetched.template, reference_template());
    }

    #[tokio::test]
    async fn test_get_template_not_found() {
        let repo = setup_test_db().await;

        assert_eq!(repo.get_template(999).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_duplicate_template_name_is_rejected() {
        let repo = setup_test_db().await;
        repo.create_template(new_template("Orchard"))
            .await
            .expect("Should create template");

        let err = repo.create_template(new_template("Orchard")).await;

        assert_eq!(
            err,
            Err(RepositoryError::Database(
                "template named 'Orchard' already exists".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_update_template() {
        let repo = setup_test_db().await;
        let mut record = repo
            .create_template(new_template("Orchard"))
            .await
            .expect("Should create template");

        record.name = "Orchard v2".to_string();
        record.template.bottle_75cl_price = dec!(125.5);
        repo.update_template(&record)
            .await
            .expect("Should update template");

        let fetched = repo.get_template(record.id).await.expect("Should get template");
        assert_eq!(fetched.name, "Orchard v2");
        assert_eq!(fetched.template.bottle_75cl_price, dec!(125.5));
        assert_eq!(fetched.updated_at >= record.updated_at, true);
    }

    #[tokio::test]
    async fn test_update_missing_template() {
        let repo = setup_test_db().await;
        let mut record = repo
            .create_template(new_template("Orchard"))
            .await
            .expect("Should create template");
        record.id = 999;

        assert_eq!(repo.update_template(&record).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_template() {
        let repo = setup_test_db().await;
        let record = repo
            .create_template(new_template("Orchard"))
            .await
            .expect("Should create template");

        repo.delete_template(record.id)
            .await
            .expect("Should delete template");

        assert_eq!(repo.get_template(record.id).await, Err(RepositoryError::NotFound));
        assert_eq!(repo.delete_template(record.id).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_templates_sorted_by_name() {
        let repo = setup_test_db().await;
        repo.create_template(new_template("Zest")).await.expect("create");
        repo.create_template(new_template("Apple")).await.expect("create");

        let names: Vec<String> = repo
            .list_templates()
            .await
            .expect("Should list templates")
            .into_iter()
            .map(|t| t.name)
            .collect();

        assert_eq!(names, vec!["Apple".to_string(), "Zest".to_string()]);
    }

    // =========================================================================
    // Scenario tests
    // =========================================================================

    #[tokio::test]
    async fn test_create_scenario_without_caps() {
        let repo = setup_test_db().await;

        let created = repo
            .create_scenario(new_scenario("Growth"))
            .await
            .expect("Should create scenario");

        assert_eq!(created.scenario, reference_scenario());
        assert_eq!(created.scenario.max_production_liters_yearly, None);
        assert_eq!(created.scenario.max_storage_bottles, None);
        assert_eq!(created.description, None);
    }

    #[tokio::test]
    async fn test_scenario_caps_round_trip() {
        let repo = setup_test_db().await;
        let mut scenario = new_scenario("Capped");
        scenario.scenario.max_production_liters_yearly = Some(dec!(2000));
        scenario.scenario.max_storage_bottles = Some(1500);

        let created = repo
            .create_scenario(scenario)
            .await
            .expect("Should create scenario");

        assert_eq!(created.scenario.max_production_liters_yearly, Some(dec!(2000)));
        assert_eq!(created.scenario.max_storage_bottles, Some(1500));
    }

    #[tokio::test]
    async fn test_update_scenario_clears_cap() {
        let repo = setup_test_db().await;
        let mut scenario = new_scenario("Capped");
        scenario.scenario.max_storage_bottles = Some(1500);
        let mut record = repo
            .create_scenario(scenario)
            .await
            .expect("Should create scenario");

        record.scenario.max_storage_bottles = None;
        record.scenario.demand_growth_yearly = dec!(12.5);
        repo.update_scenario(&record)
            .await
            .expect("Should update scenario");

        let fetched = repo.get_scenario(record.id).await.expect("Should get scenario");
        assert_eq!(fetched.scenario.max_storage_bottles, None);
        assert_eq!(fetched.scenario.demand_growth_yearly, dec!(12.5));
    }

    #[tokio::test]
    async fn test_delete_scenario_not_found() {
        let repo = setup_test_db().await;

        assert_eq!(repo.delete_scenario(42).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_scenarios() {
        let repo = setup_test_db().await;
        repo.create_scenario(new_scenario("B")).await.expect("create");
        repo.create_scenario(new_scenario("A")).await.expect("create");

        let scenarios = repo.list_scenarios().await.expect("Should list scenarios");

        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].name, "A");
    }

    // =========================================================================
    // Result tests
    // =========================================================================

    #[tokio::test]
    async fn test_save_and_get_result_is_exact() {
        let repo = setup_test_db().await;
        let template = repo.create_template(new_template("T")).await.expect("create");
        let scenario = repo.create_scenario(new_scenario("S")).await.expect("create");

        let saved = saved_result(&repo, "run 1", template.id, scenario.id).await;
        let fetched = repo.get_result(saved.id).await.expect("Should get result");

        assert_eq!(fetched, saved);
        assert_eq!(fetched.years, 3);
        assert_eq!(fetched.result.yearly_projections.len(), 3);
        assert_eq!(fetched.result.yearly_projections[0].ebitda, dec!(-37641.944));
    }

    #[tokio::test]
    async fn test_save_result_for_missing_template() {
        let repo = setup_test_db().await;
        let scenario = repo.create_scenario(new_scenario("S")).await.expect("create");

        let result = run_simulation(&reference_template(), &reference_scenario(), 1, dec!(1000));
        let err = repo
            .save_result(NewSimulationRecord {
                name: "orphan".to_string(),
                template_id: 999,
                scenario_id: scenario.id,
                years: 1,
                base_volume: dec!(1000),
                result,
            })
            .await;

        assert_eq!(err, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_results_filters_by_template() {
        let repo = setup_test_db().await;
        let first = repo.create_template(new_template("First")).await.expect("create");
        let second = repo.create_template(new_template("Second")).await.expect("create");
        let scenario = repo.create_scenario(new_scenario("S")).await.expect("create");

        saved_result(&repo, "a", first.id, scenario.id).await;
        saved_result(&repo, "b", first.id, scenario.id).await;
        saved_result(&repo, "c", second.id, scenario.id).await;

        let all = repo.list_results(None).await.expect("Should list results");
        let only_first = repo
            .list_results(Some(first.id))
            .await
            .expect("Should list results");

        assert_eq!(all.len(), 3);
        assert_eq!(
            only_first.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["b", "a"]
        );
    }

    #[tokio::test]
    async fn test_deleting_template_removes_its_results() {
        let repo = setup_test_db().await;
        let template = repo.create_template(new_template("T")).await.expect("create");
        let scenario = repo.create_scenario(new_scenario("S")).await.expect("create");
        let saved = saved_result(&repo, "run", template.id, scenario.id).await;

        repo.delete_template(template.id)
            .await
            .expect("Should delete template");

        assert_eq!(repo.get_result(saved.id).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_result() {
        let repo = setup_test_db().await;
        let template = repo.create_template(new_template("T")).await.expect("create");
        let scenario = repo.create_scenario(new_scenario("S")).await.expect("create");
        let saved = saved_result(&repo, "run", template.id, scenario.id).await;

        repo.delete_result(saved.id).await.expect("Should delete result");

        assert_eq!(repo.delete_result(saved.id).await, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_corrupt_result_json_is_a_serialization_error() {
        let repo = setup_test_db().await;
        let template = repo.create_template(new_template("T")).await.expect("create");
        let scenario = repo.create_scenario(new_scenario("S")).await.expect("create");
        let saved = saved_result(&repo, "run", template.id, scenario.id).await;

        sqlx::query("UPDATE simulation_result SET result_json = '{' WHERE id = ?")
            .bind(saved.id)
            .execute(repo.pool())
            .await
            .expect("Failed to corrupt row");

        assert!(matches!(
            repo.get_result(saved.id).await,
            Err(RepositoryError::Serialization(_))
        ));
    }

    // =========================================================================
    // Seed tests
    // =========================================================================

    #[tokio::test]
    async fn test_seeds_load_reference_data_once() {
        let repo = setup_test_db().await;
        let seeds = Path::new(env!("CARGO_MANIFEST_DIR")).join("seeds");

        repo.run_seeds(&seeds).await.expect("Should run seeds");
        repo.run_seeds(&seeds).await.expect("Seeds should be idempotent");

        let templates = repo.list_templates().await.expect("Should list templates");
        let scenarios = repo.list_scenarios().await.expect("Should list scenarios");

        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].template, reference_template());
        assert_eq!(scenarios.len(), 2);
        assert_eq!(
            scenarios
                .iter()
                .find(|s| s.name == "Reference growth")
                .map(|s| s.scenario.clone()),
            Some(reference_scenario())
        );
    }
}
