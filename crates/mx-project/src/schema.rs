//! Project schema definitions.

use mx_catalog::NamingConfig;
use mx_materials::MaterialSet;
use mx_mix::{AdditiveSystemConfig, DesignParameters, WaterDefinition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything one generation pass is computed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub version: u32,
    pub name: String,
    /// Catalog partition used for reconciliation.
    #[serde(default)]
    pub plant_id: String,
    pub design: DesignParameters,
    pub materials: MaterialSet,
    /// Nominal strengths in scope [kg/cm²].
    pub strengths: Vec<u32>,
    pub aggregate_size_mm: u32,
    pub water_definitions: Vec<WaterDefinition>,
    #[serde(default)]
    pub additive_system: AdditiveSystemConfig,
    #[serde(default)]
    pub naming: NamingConfig,
    /// FCR by working code, replacing the computed value.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fcr_overrides: BTreeMap<String, f64>,
}

impl Project {
    /// Number of recipes one pass generates.
    pub fn batch_size(&self) -> usize {
        self.strengths.len() * self.water_definitions.iter().filter(|d| d.enabled).count()
    }
}
