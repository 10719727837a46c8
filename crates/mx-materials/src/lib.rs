//! mx-materials: constituent materials of a concrete mix.
//!
//! Provides:
//! - Material definitions as configured (density, absorption, unit cost may be missing)
//! - Resolution into `MixMaterials`, reporting every missing property at once
//! - The saturated-surface-dry (SSD) ↔ oven-dry state converter
//!
//! Densities are specific gravities (g/cm³, numerically kg/L), absorption rates are
//! percentages of oven-dry mass and unit costs are per kilogram.

pub mod error;
pub mod material;
pub mod state;

pub use error::{MaterialError, MaterialIssue, MaterialProperty, MaterialResult};
pub use material::{
    AdditiveMaterial, Material, MaterialRole, MaterialSet, MixMaterials, ResolvedAdditive,
    ResolvedMaterial,
};
pub use state::{
    AggregateFraction, StateConversion, WaterByState, absorbed_water, convert_aggregates,
    oven_dry_mass, ssd_mass,
};
