//! Read port onto the external recipe catalog.

use crate::error::CatalogResult;
use serde::{Deserialize, Serialize};

/// Partition of the catalog a reconciliation pass runs against (plant/site).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogScope {
    pub plant_id: String,
}

impl CatalogScope {
    pub fn new(plant_id: impl Into<String>) -> Self {
        Self {
            plant_id: plant_id.into(),
        }
    }
}

/// Existing recipe as stored in the catalog. Placement is free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingRecipeRecord {
    pub id: String,
    pub code: String,
    pub strength: u32,
    #[serde(default)]
    pub age_days: Option<u32>,
    #[serde(default)]
    pub age_hours: Option<u32>,
    pub placement: String,
    pub slump: u32,
    pub aggregate_size: u32,
    #[serde(default)]
    pub master_id: Option<String>,
}

/// Existing master (recipe family).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingMasterRecord {
    pub id: String,
    pub code: String,
    pub strength: u32,
    #[serde(default)]
    pub age_days: Option<u32>,
    #[serde(default)]
    pub age_hours: Option<u32>,
    pub placement: String,
    pub slump: u32,
    pub aggregate_size: u32,
}

/// Bulk, read-only access to the catalog.
///
/// Every method is one query for the whole scope; reconciliation never asks per
/// recipe. Any error aborts the caller's pass.
pub trait CatalogReader {
    /// All recipes in scope.
    fn fetch_recipes(&self, scope: &CatalogScope) -> CatalogResult<Vec<ExistingRecipeRecord>>;

    /// All masters in scope.
    fn fetch_masters(&self, scope: &CatalogScope) -> CatalogResult<Vec<ExistingMasterRecord>>;

    /// The subset of `codes` already used by a recipe or master in scope.
    fn existing_codes(&self, scope: &CatalogScope, codes: &[String])
    -> CatalogResult<Vec<String>>;
}
