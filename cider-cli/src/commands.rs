use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use cider_core::calculations::{DEFAULT_BASE_VOLUME_LITERS, DEFAULT_PROJECTION_YEARS};
use cider_core::db::RepositoryRegistry;
use cider_core::format::NumberFormat;
use cider_core::{
    NewSimulationRecord, SimulationCache, SimulationRepository, SimulationResult,
    SimulationRunner,
};
use cider_data::{write_projections_csv, write_result_json};
use cider_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

use crate::cli::{CompareArgs, HorizonArgs, ResultsArgs, RunArgs, StoredArgs};
use crate::inputs::InputFile;
use crate::report::{render_comparison, render_report, render_saved_results};

/// Registry with every backend this binary links.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

impl HorizonArgs {
    fn years_or_default(&self) -> u32 {
        self.years.unwrap_or(DEFAULT_PROJECTION_YEARS)
    }

    fn base_volume_or_default(&self) -> rust_decimal::Decimal {
        self.base_volume.unwrap_or(DEFAULT_BASE_VOLUME_LITERS)
    }
}

fn export(
    result: &SimulationResult,
    csv: Option<&Path>,
    json: Option<&Path>,
) -> Result<()> {
    if let Some(path) = csv {
        let file = File::create(path)
            .with_context(|| format!("Failed to create: {}", path.display()))?;
        write_projections_csv(result, file)
            .with_context(|| format!("Failed to write CSV: {}", path.display()))?;
        info!(file = %path.display(), "wrote projections CSV");
    }
    if let Some(path) = json {
        let file = File::create(path)
            .with_context(|| format!("Failed to create: {}", path.display()))?;
        write_result_json(result, file)
            .with_context(|| format!("Failed to write JSON: {}", path.display()))?;
        info!(file = %path.display(), "wrote result JSON");
    }
    Ok(())
}

/// `run`: simulate a TOML inputs file and return the rendered report.
pub fn run_inputs(
    args: &RunArgs,
    fmt: &NumberFormat,
) -> Result<String> {
    let inputs = InputFile::load(&args.inputs)
        .with_context(|| format!("Failed to load inputs: {}", args.inputs.display()))?
        .resolve(args.horizon.years, args.horizon.base_volume);

    if args.no_validate {
        debug!("input validation skipped");
    } else {
        inputs.validate().context("Inputs rejected")?;
    }

    let result = SimulationRunner::new(&inputs.template, &inputs.scenario)
        .run(inputs.years, inputs.base_volume);
    export(&result, args.csv.as_deref(), args.json.as_deref())?;

    Ok(render_report(&result, inputs.base_volume, fmt))
}

/// `stored`: simulate a stored template and scenario, optionally saving the
/// result.
pub async fn run_stored(
    repo: &dyn SimulationRepository,
    args: &StoredArgs,
    fmt: &NumberFormat,
) -> Result<String> {
    let template = repo
        .get_template(args.template)
        .await
        .with_context(|| format!("Failed to load template {}", args.template))?;
    let scenario = repo
        .get_scenario(args.scenario)
        .await
        .with_context(|| format!("Failed to load scenario {}", args.scenario))?;

    let years = args.horizon.years_or_default();
    let base_volume = args.horizon.base_volume_or_default();
    let result =
        SimulationRunner::new(&template.template, &scenario.scenario).run(years, base_volume);

    let mut report = format!(
        "Template: {}\nScenario: {}\n\n{}",
        template.name,
        scenario.name,
        render_report(&result, base_volume, fmt)
    );

    if let Some(name) = &args.save {
        let saved = repo
            .save_result(NewSimulationRecord {
                name: name.clone(),
                template_id: template.id,
                scenario_id: scenario.id,
                years,
                base_volume,
                result,
            })
            .await
            .context("Failed to save result")?;
        info!(id = saved.id, name = %saved.name, "saved simulation result");
        report.push_str(&format!("\n\nSaved as result {}.", saved.id));
    }

    Ok(report)
}

/// `compare`: one template against several scenarios. Repeated scenario ids
/// are served from the cache.
pub async fn compare(
    repo: &dyn SimulationRepository,
    args: &CompareArgs,
    cache: &mut SimulationCache,
    fmt: &NumberFormat,
) -> Result<String> {
    let template = repo
        .get_template(args.template)
        .await
        .with_context(|| format!("Failed to load template {}", args.template))?;

    let years = args.horizon.years_or_default();
    let base_volume = args.horizon.base_volume_or_default();

    let mut rows = Vec::with_capacity(args.scenario.len());
    for id in &args.scenario {
        let scenario = repo
            .get_scenario(*id)
            .await
            .with_context(|| format!("Failed to load scenario {}", id))?;
        let result = cache.get_or_run(&template.template, &scenario.scenario, years, base_volume);
        rows.push((scenario.name, result));
    }
    debug!(
        hits = cache.hits(),
        misses = cache.misses(),
        "comparison finished"
    );

    let borrowed: Vec<(String, &SimulationResult)> = rows
        .iter()
        .map(|(name, result)| (name.clone(), result.as_ref()))
        .collect();

    Ok(format!(
        "Template: {} ({} years from {} L)\n\n{}",
        template.name,
        years,
        fmt.number(base_volume, 0),
        render_comparison(&borrowed, fmt)
    ))
}

/// `results`: saved results, newest first.
pub async fn list_results(
    repo: &dyn SimulationRepository,
    args: &ResultsArgs,
    fmt: &NumberFormat,
) -> Result<String> {
    let records = repo
        .list_results(args.template)
        .await
        .context("Failed to list saved results")?;

    Ok(render_saved_results(&records, fmt))
}
