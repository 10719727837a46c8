//! Error types for the mx-app service layer.

use std::path::PathBuf;

/// Unified error for every frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Failed to read project file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write project file: {path}")]
    ProjectFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read catalog snapshot: {path}")]
    CatalogFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("Materials error: {0}")]
    Materials(String),

    #[error("Proportioning error: {0}")]
    Mix(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Reconciliation error: {0}")]
    Reconcile(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mx-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<mx_project::ProjectError> for AppError {
    fn from(err: mx_project::ProjectError) -> Self {
        match err {
            mx_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<mx_project::ValidationError> for AppError {
    fn from(err: mx_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<mx_materials::MaterialError> for AppError {
    fn from(err: mx_materials::MaterialError) -> Self {
        AppError::Materials(err.to_string())
    }
}

impl From<mx_mix::MixError> for AppError {
    fn from(err: mx_mix::MixError) -> Self {
        AppError::Mix(err.to_string())
    }
}

impl From<mx_results::ResultsError> for AppError {
    fn from(err: mx_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}

impl From<mx_catalog::CatalogError> for AppError {
    fn from(err: mx_catalog::CatalogError) -> Self {
        AppError::Catalog(err.to_string())
    }
}

impl From<mx_catalog::ReconcileError> for AppError {
    fn from(err: mx_catalog::ReconcileError) -> Self {
        AppError::Reconcile(err.to_string())
    }
}

impl From<mx_catalog::PlanError> for AppError {
    fn from(err: mx_catalog::PlanError) -> Self {
        AppError::Reconcile(err.to_string())
    }
}
