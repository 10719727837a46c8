//! Reconciliation of a generated batch against a catalog.

use std::collections::BTreeMap;
use std::path::Path;

use mx_catalog::{CatalogReader, CatalogScope, CatalogSnapshot, SavePlan, reconcile};
use mx_mix::GeneratedRecipe;
use mx_project::Project;

use crate::error::{AppError, AppResult};

/// Load a catalog snapshot from a JSON file.
pub fn load_catalog_snapshot(path: &Path) -> AppResult<CatalogSnapshot> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::CatalogFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content)
        .map_err(|e| AppError::Catalog(format!("Failed to parse catalog snapshot: {}", e)))
}

/// Parse `RECIPE=CODE` pairs into an override map.
pub fn parse_overrides(pairs: &[String]) -> AppResult<BTreeMap<String, String>> {
    let mut overrides = BTreeMap::new();
    for pair in pairs {
        let (recipe, code) = pair
            .split_once('=')
            .map(|(r, c)| (r.trim(), c.trim()))
            .filter(|(r, c)| !r.is_empty() && !c.is_empty())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("override '{}' is not RECIPE=CODE", pair))
            })?;
        if overrides.insert(recipe.to_string(), code.to_string()).is_some() {
            return Err(AppError::InvalidInput(format!(
                "recipe '{}' is overridden twice",
                recipe
            )));
        }
    }
    Ok(overrides)
}

/// Plan the save of `recipes` in the project's catalog partition, then apply
/// `overrides` on top of the default plan.
pub fn plan_save<C>(
    project: &Project,
    recipes: &[GeneratedRecipe],
    catalog: &C,
    overrides: &BTreeMap<String, String>,
) -> AppResult<SavePlan>
where
    C: CatalogReader + ?Sized,
{
    if project.plant_id.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "project has no plant_id to reconcile against".to_string(),
        ));
    }
    let scope = CatalogScope::new(project.plant_id.trim());

    let plan = reconcile(recipes, &project.naming, catalog, &scope)?;
    if overrides.is_empty() {
        return Ok(plan);
    }
    Ok(plan.with_overrides(overrides, catalog)?)
}
