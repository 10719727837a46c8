use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;
pub type PlanResult<T> = Result<T, PlanError>;

/// Failure of a bulk catalog read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog query '{query}' failed: {message}")]
    Query {
        query: &'static str,
        message: String,
    },
}

/// Reconciliation aborts as a whole; no partial plan is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconcileError {
    #[error("Reconciliation aborted: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Duplicate generated recipe code: {code}")]
    DuplicateRecipe { code: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("No decision for recipe {code}")]
    UnknownRecipe { code: String },

    #[error("Recipe {code} updates an existing variant; its code cannot be overridden")]
    OverrideOnUpdate { code: String },

    #[error("Override code for recipe {code} is empty")]
    EmptyCode { code: String },

    #[error("Override check failed: {0}")]
    Catalog(#[from] CatalogError),
}
