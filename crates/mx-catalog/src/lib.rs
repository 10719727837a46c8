//! mx-catalog: ARKIK recipe codes and catalog reconciliation.
//!
//! Provides:
//! - `NamingConfig` and the long/short code generator with per-recipe PCE detection
//! - Spec-match key with placement normalization, age equivalence and aggregate tolerance
//! - `CatalogReader` port for bulk catalog reads, plus an in-memory implementation
//! - Reconciliation into an immutable `SavePlan` of per-recipe decisions
//!
//! Reconciliation is a planning step only. Nothing here writes to the catalog.

pub mod codes;
pub mod error;
pub mod memory;
pub mod port;
pub mod reconcile;
pub mod spec_match;

pub use codes::{ArkikCode, NamingConfig, aggregate_class, generate_codes, master_code};
pub use error::{CatalogError, CatalogResult, PlanError, PlanResult, ReconcileError};
pub use memory::{CatalogPartition, CatalogSnapshot, InMemoryCatalog};
pub use port::{CatalogReader, CatalogScope, ExistingMasterRecord, ExistingRecipeRecord};
pub use reconcile::{
    Collision, Finalized, SaveAction, SaveDecision, SavePlan, SaveRequest, reconcile,
};
pub use spec_match::{AgeSpec, PlacementClass, SpecKey, normalize_placement};
