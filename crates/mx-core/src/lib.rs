//! mx-core: stable foundation for mixflow.
//!
//! Contains:
//! - units (uom SI types + constructors for mass, volume and density)
//! - numeric (Real + tolerances + float and rounding helpers)
//! - ids (stable material identifiers)
//! - diagnostics (non-fatal configuration findings)
//! - error (shared error types)

pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use diagnostics::{Diagnostic, Severity};
pub use error::{MxError, MxResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
