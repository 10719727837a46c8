//! mx-mix: absolute-volume mix proportioning for ready-mix concrete.
//!
//! Provides:
//! - Design parameters (design type, age, standard deviation, resistance factors,
//!   air content, mortar volume table, aggregate blends) and water definitions
//! - Additive distribution engine driven by cement-range rules
//! - Absolute-volume partitioner enforcing the 1000 L balance
//! - Proportioning calculator producing immutable `GeneratedRecipe` values
//!
//! # Method
//!
//! For one (strength, slump, placement, water dosage) target:
//! 1. `FCR = f'c + f'c × σ%/100`
//! 2. `A/C = (factor1 / FCR)^(1/factor2)`
//! 3. cement = water / (A/C), rounded to a multiple of 5 kg
//! 4. additives are dosed from the cement mass
//! 5. sand and gravel volumes are the residuals of the mortar volume and of 1000 L
//! 6. SSD masses follow from densities, oven-dry masses from absorption
//!
//! Every step is a pure function of its inputs, so a full strength × water-definition
//! cross product can be recomputed eagerly whenever any input changes.

pub mod additives;
pub mod calculator;
pub mod design;
pub mod error;
pub mod partition;
pub mod recipe;

pub use additives::{
    AdditiveRule, AdditiveSystemConfig, BandCompletion, CalculatedAdditive, DosingMode,
    band_completion, diagnose_additive_system, dose_additives,
};
pub use calculator::{
    DEFAULT_STANDARD_DEVIATION_PCT, MixContext, RecipeTarget, cement_content, critical_strength,
    recipe_code, water_cement_ratio,
};
pub use design::{
    AgeUnit, AggregateBlend, AggregateBlends, AirContent, BlendShare, DesignAge, DesignParameters,
    DesignType, MortarVolumeTable, Placement, ResistanceFactors, StandardDeviation,
    WaterDefinition, diagnose_blends, diagnose_water_definitions,
};
pub use error::{MixError, MixResult};
pub use partition::{FractionVolume, PartitionInput, VolumeBreakdown, partition_volumes, split_fractions};
pub use recipe::{
    AdditiveDose, AggregateMass, CostBreakdown, GeneratedRecipe, MaterialCost, MaterialsByState,
    UnitMass,
};
