use clap::{Parser, Subcommand, ValueEnum};
use mx_app::{
    AppError, AppResult, BatchRequest, BatchResponse, GenerateOptions, generate_service,
    project_service, reconcile_service,
};
use mx_catalog::{InMemoryCatalog, SaveAction, SavePlan};
use mx_mix::{GeneratedRecipe, band_completion};
use mx_results::RecipeCache;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "mx-cli")]
#[command(about = "MixFlow CLI - Ready-mix concrete recipe generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a project file and report configuration diagnostics
    Validate {
        /// Path to the project file
        project_path: PathBuf,
    },
    /// Generate the recipe batch of a project
    Generate {
        /// Path to the project file
        project_path: PathBuf,
        /// Skip cache and force regeneration
        #[arg(long)]
        no_cache: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
        /// Output file (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show cement-band completion of the additive rules
    Bands {
        /// Path to the project file
        project_path: PathBuf,
    },
    /// Reconcile the generated batch against a catalog snapshot
    Reconcile {
        /// Path to the project file
        project_path: PathBuf,
        /// Catalog snapshot JSON
        catalog_path: PathBuf,
        /// Replace a final code, as RECIPE=CODE (repeatable)
        #[arg(long = "override", value_name = "RECIPE=CODE")]
        overrides: Vec<String>,
        /// Write the save requests as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List stored batches for a project
    Batches {
        /// Path to the project file
        project_path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Generate {
            project_path,
            no_cache,
            format,
            output,
        } => cmd_generate(&project_path, !no_cache, format, output.as_deref()),
        Commands::Bands { project_path } => cmd_bands(&project_path),
        Commands::Reconcile {
            project_path,
            catalog_path,
            overrides,
            output,
        } => cmd_reconcile(&project_path, &catalog_path, &overrides, output.as_deref()),
        Commands::Batches { project_path } => cmd_batches(&project_path),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    let report = project_service::validate_project(&project)?;

    for diagnostic in &report.diagnostics {
        println!("  {}", diagnostic);
    }
    if report.has_errors() {
        let errors = report.diagnostics.len() - report.warning_count();
        return Err(AppError::Validation(format!(
            "{} blocking finding(s)",
            errors
        )));
    }
    println!(
        "✓ Project is valid ({} recipes, {} warnings)",
        report.batch_size,
        report.warning_count()
    );
    Ok(())
}

fn batch(project_path: &Path, use_cache: bool) -> AppResult<BatchResponse> {
    let request = BatchRequest {
        project_path,
        options: GenerateOptions {
            use_cache,
            ..GenerateOptions::default()
        },
    };
    let mut cache = RecipeCache::default();
    generate_service::ensure_batch(&request, &mut cache)
}

fn cmd_generate(
    project_path: &Path,
    use_cache: bool,
    format: Format,
    output: Option<&Path>,
) -> AppResult<()> {
    let response = batch(project_path, use_cache)?;
    if response.loaded_from_cache() {
        eprintln!("✓ Loaded from cache: {}", response.key);
    } else {
        eprintln!(
            "✓ Generated {} recipes in {:.3}s: {}",
            response.recipes.len(),
            response.elapsed_s,
            response.key
        );
    }

    let rendered = match format {
        Format::Table => recipe_table(&response.recipes),
        Format::Json => serde_json::to_string_pretty(response.recipes.as_ref())
            .map_err(|e| AppError::Results(format!("Failed to serialize recipes: {}", e)))?,
    };
    emit(&rendered, output)
}

fn recipe_table(recipes: &[GeneratedRecipe]) -> String {
    let mut out = format!(
        "{:<16} {:>7} {:>6} {:>8} {:>8} {:>8} {:>8} {:>9} {:>9}\n",
        "code", "FCR", "A/C", "cement", "water", "sand", "gravel", "kg/m3", "cost"
    );
    for r in recipes {
        let sand: f64 = r.materials_ssd.sands.iter().map(|m| m.kg).sum();
        let gravel: f64 = r.materials_ssd.gravels.iter().map(|m| m.kg).sum();
        out.push_str(&format!(
            "{:<16} {:>7.2} {:>6.3} {:>8.0} {:>8.1} {:>8.1} {:>8.1} {:>9.1} {:>9.2}\n",
            r.code,
            r.fcr,
            r.ac_ratio,
            r.materials_ssd.cement_kg,
            r.materials_ssd.water_l,
            sand,
            gravel,
            r.unit_mass.ssd_kg,
            r.costs.total
        ));
    }
    out
}

fn cmd_bands(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let config = &project.additive_system;
    let bands = band_completion(config);

    if bands.is_empty() {
        println!("No additive rules defined");
        return Ok(());
    }
    println!("Cement bands (kg/m³):");
    for band in bands {
        let mark = if band.is_complete() { "✓" } else { "!" };
        println!(
            "  {} [{}, {})  {:.1} %",
            mark, band.start, band.end, band.total_percentage
        );
        for &idx in &band.rules {
            if let Some(rule) = config.rules.get(idx) {
                println!("      {} {:.1} %", rule.additive, rule.cc_percentage);
            }
        }
        for (additive, pct) in &band.over_allocated {
            println!("      over-allocated: {} {:.1} %", additive, pct);
        }
    }
    Ok(())
}

fn cmd_reconcile(
    project_path: &Path,
    catalog_path: &Path,
    overrides: &[String],
    output: Option<&Path>,
) -> AppResult<()> {
    let overrides = reconcile_service::parse_overrides(overrides)?;
    let response = batch(project_path, true)?;
    let catalog = InMemoryCatalog::new(reconcile_service::load_catalog_snapshot(catalog_path)?);

    let plan = reconcile_service::plan_save(
        &response.project,
        &response.recipes,
        &catalog,
        &overrides,
    )?;
    print_plan(&plan);

    let finalized = plan.finalize();
    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&finalized)
            .map_err(|e| AppError::Reconcile(format!("Failed to serialize save requests: {}", e)))?;
        std::fs::write(path, json)?;
        println!(
            "✓ Wrote {} save requests to {}",
            finalized.requests.len(),
            path.display()
        );
    }
    if !finalized.blocked.is_empty() {
        println!(
            "! {} recipe(s) need a distinct code: {}",
            finalized.blocked.len(),
            finalized.blocked.join(", ")
        );
    }
    Ok(())
}

fn print_plan(plan: &SavePlan) {
    println!("Save plan for plant '{}':", plan.scope().plant_id);
    for d in plan.decisions() {
        let action = match &d.action {
            SaveAction::UpdateVariant { recipe_id } => format!("update {}", recipe_id),
            SaveAction::CreateVariant { master_id } => format!("variant of {}", master_id),
            SaveAction::NewMaster { master_code } => format!("new master {}", master_code),
        };
        let status = match &d.collision {
            None => String::new(),
            Some(collision) => format!("  BLOCKED {:?}", collision),
        };
        println!(
            "  {:<16} {:<26} {:<10} {}{}",
            d.recipe_code, d.final_code, d.short_code, action, status
        );
    }
}

fn cmd_batches(project_path: &Path) -> AppResult<()> {
    let batches = generate_service::list_batches(project_path)?;

    if batches.is_empty() {
        println!("No stored batches for project: {}", project_path.display());
    } else {
        println!("Stored batches:");
        for manifest in batches {
            println!(
                "  {} ({}, {} recipes, engine {})",
                manifest.key, manifest.timestamp, manifest.recipe_count, manifest.engine_version
            );
        }
    }
    Ok(())
}

fn emit(content: &str, output: Option<&Path>) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, content)?;
        println!("✓ Wrote {}", path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}
