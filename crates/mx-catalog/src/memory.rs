//! In-memory catalog, loaded from a snapshot file or built in tests.

use crate::error::{CatalogError, CatalogResult};
use crate::port::{CatalogReader, CatalogScope, ExistingMasterRecord, ExistingRecipeRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogPartition {
    #[serde(default)]
    pub recipes: Vec<ExistingRecipeRecord>,
    #[serde(default)]
    pub masters: Vec<ExistingMasterRecord>,
}

/// Catalog contents keyed by plant id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub partitions: BTreeMap<String, CatalogPartition>,
}

/// Plants absent from a snapshot have no recipes or masters yet.
static EMPTY_PARTITION: CatalogPartition = CatalogPartition {
    recipes: Vec::new(),
    masters: Vec::new(),
};

/// `CatalogReader` over a snapshot. Counts bulk queries and can be switched to fail.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    snapshot: CatalogSnapshot,
    queries: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot,
            queries: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    /// Number of bulk queries served (or failed) so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    fn partition(
        &self,
        scope: &CatalogScope,
        query: &'static str,
    ) -> CatalogResult<&CatalogPartition> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            return Err(CatalogError::Query {
                query,
                message: "catalog unavailable".into(),
            });
        }
        Ok(self
            .snapshot
            .partitions
            .get(&scope.plant_id)
            .unwrap_or(&EMPTY_PARTITION))
    }
}

impl CatalogReader for InMemoryCatalog {
    fn fetch_recipes(&self, scope: &CatalogScope) -> CatalogResult<Vec<ExistingRecipeRecord>> {
        Ok(self.partition(scope, "recipes")?.recipes.clone())
    }

    fn fetch_masters(&self, scope: &CatalogScope) -> CatalogResult<Vec<ExistingMasterRecord>> {
        Ok(self.partition(scope, "masters")?.masters.clone())
    }

    fn existing_codes(
        &self,
        scope: &CatalogScope,
        codes: &[String],
    ) -> CatalogResult<Vec<String>> {
        let partition = self.partition(scope, "existing codes")?;
        Ok(codes
            .iter()
            .filter(|code| {
                partition.recipes.iter().any(|r| &r.code == *code)
                    || partition.masters.iter().any(|m| &m.code == *code)
            })
            .cloned()
            .collect())
    }
}
