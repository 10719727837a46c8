//! Error types for mix proportioning.

use mx_core::{MaterialId, MxError};
use mx_materials::MaterialError;
use thiserror::Error;

/// Result type for mix operations.
pub type MixResult<T> = Result<T, MixError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MixError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A residual volume came out negative; the configuration cannot be batched.
    #[error("Non-physical {what} for recipe {recipe}: {value:.3}")]
    NonPhysical {
        what: &'static str,
        recipe: String,
        value: f64,
    },

    #[error("Blend references unknown {role} material {id}")]
    UnknownBlendMaterial { role: &'static str, id: MaterialId },

    #[error("Material error: {0}")]
    Material(#[from] MaterialError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] MxError),
}
