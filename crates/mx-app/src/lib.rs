//! Shared application service layer for mixflow.
//!
//! Frontends go through this crate for project management, cached batch
//! generation and reconciliation against a catalog.

pub mod error;
pub mod generate_service;
pub mod project_service;
pub mod reconcile_service;

pub use error::{AppError, AppResult};
pub use generate_service::{
    BatchRequest, BatchResponse, BatchSource, GenerateOptions, ensure_batch, generate_recipes,
    list_batches,
};
pub use project_service::{ProjectReport, load_project, save_project, validate_project};
pub use reconcile_service::{load_catalog_snapshot, parse_overrides, plan_save};
