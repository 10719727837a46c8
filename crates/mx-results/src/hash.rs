//! Content-based hashing for batch keys.

use mx_materials::MaterialSet;
use mx_mix::{AdditiveSystemConfig, DesignParameters, WaterDefinition};
use mx_project::Project;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// The parts of a project a generated batch depends on.
///
/// Name, plant and naming settings do not change recipe values and are left out.
#[derive(Debug, Serialize)]
pub struct GenerationInputs<'a> {
    pub design: &'a DesignParameters,
    pub materials: &'a MaterialSet,
    pub strengths: &'a [u32],
    pub aggregate_size_mm: u32,
    pub water_definitions: &'a [WaterDefinition],
    pub additive_system: &'a AdditiveSystemConfig,
    pub fcr_overrides: &'a BTreeMap<String, f64>,
}

impl<'a> From<&'a Project> for GenerationInputs<'a> {
    fn from(p: &'a Project) -> Self {
        Self {
            design: &p.design,
            materials: &p.materials,
            strengths: &p.strengths,
            aggregate_size_mm: p.aggregate_size_mm,
            water_definitions: &p.water_definitions,
            additive_system: &p.additive_system,
            fcr_overrides: &p.fcr_overrides,
        }
    }
}

pub fn compute_batch_key(inputs: &GenerationInputs<'_>, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let inputs_json = serde_json::to_string(inputs).unwrap_or_default();
    hasher.update(inputs_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
