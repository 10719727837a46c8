//! Batch generation and caching service.
//!
//! A batch is looked up in the in-memory cache, then in the on-disk store next to
//! the project file, and only computed when both miss.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use mx_mix::{GeneratedRecipe, MixContext};
use mx_project::Project;
use mx_results::{BatchManifest, BatchStore, GenerationInputs, RecipeCache, compute_batch_key};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::project_service;

/// Options for generating a batch.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to generate the batch of one project file.
pub struct BatchRequest<'a> {
    pub project_path: &'a Path,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSource {
    Memory,
    Disk,
    Computed,
}

#[derive(Debug, Clone)]
pub struct BatchResponse {
    pub key: String,
    pub project: Project,
    pub recipes: Arc<Vec<GeneratedRecipe>>,
    pub source: BatchSource,
    pub elapsed_s: f64,
}

impl BatchResponse {
    pub fn loaded_from_cache(&self) -> bool {
        self.source != BatchSource::Computed
    }
}

/// Compute the full strength × water-definition batch of `project`.
pub fn generate_recipes(project: &Project) -> AppResult<Vec<GeneratedRecipe>> {
    let materials = project.materials.resolve()?;
    let recipes = MixContext::new(
        &project.design,
        &materials,
        &project.additive_system,
        project.aggregate_size_mm,
    )
    .with_fcr_overrides(&project.fcr_overrides)
    .generate_batch(&project.strengths, &project.water_definitions)?;
    Ok(recipes)
}

/// Load or generate the batch for a project file.
///
/// With `use_cache` off both caches are bypassed on read but refreshed with the result.
pub fn ensure_batch(request: &BatchRequest, cache: &mut RecipeCache) -> AppResult<BatchResponse> {
    let started = Instant::now();

    let project = project_service::load_project(request.project_path)?;
    let key = compute_batch_key(
        &GenerationInputs::from(&project),
        &request.options.engine_version,
    );
    let store = BatchStore::for_project(request.project_path)?;

    if request.options.use_cache {
        if let Some(recipes) = cache.get(&key) {
            info!(key = %key, recipes = recipes.len(), "batch served from memory");
            return Ok(BatchResponse {
                key,
                project,
                recipes,
                source: BatchSource::Memory,
                elapsed_s: started.elapsed().as_secs_f64(),
            });
        }

        if store.has_batch(&key) {
            let recipes = Arc::new(store.load_recipes(&key)?);
            cache.insert(key.clone(), Arc::clone(&recipes));
            info!(key = %key, recipes = recipes.len(), "batch loaded from disk");
            return Ok(BatchResponse {
                key,
                project,
                recipes,
                source: BatchSource::Disk,
                elapsed_s: started.elapsed().as_secs_f64(),
            });
        }
    }

    debug!(key = %key, project = %project.name, "generating batch");
    let recipes = Arc::new(generate_recipes(&project)?);

    let manifest = BatchManifest::new(
        key.clone(),
        &project.name,
        &request.options.engine_version,
        recipes.len(),
    );
    store.save_batch(&manifest, &recipes)?;
    cache.insert(key.clone(), Arc::clone(&recipes));

    Ok(BatchResponse {
        key,
        project,
        recipes,
        source: BatchSource::Computed,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

/// Stored batches of a project, newest first.
pub fn list_batches(project_path: &Path) -> AppResult<Vec<BatchManifest>> {
    let project = project_service::load_project(project_path)?;
    let store = BatchStore::for_project(project_path)?;
    Ok(store.list_batches(&project.name)?)
}
