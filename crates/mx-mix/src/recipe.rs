//! Generated recipe values.

use crate::additives::CalculatedAdditive;
use crate::design::{DesignAge, DesignType, Placement};
use crate::partition::VolumeBreakdown;
use mx_core::MaterialId;
use serde::{Deserialize, Serialize};

/// Mass of one aggregate fraction [kg].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMass {
    pub material: MaterialId,
    pub name: String,
    pub kg: f64,
}

/// Volume of one additive [L].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveDose {
    pub material: MaterialId,
    pub name: String,
    pub liters: f64,
}

/// Batch quantities per cubic meter in one material state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialsByState {
    pub cement_kg: f64,
    pub water_l: f64,
    pub sands: Vec<AggregateMass>,
    pub gravels: Vec<AggregateMass>,
    pub additives: Vec<AdditiveDose>,
}

impl MaterialsByState {
    pub fn sand(&self, id: &MaterialId) -> Option<&AggregateMass> {
        self.sands.iter().find(|m| &m.material == id)
    }

    pub fn gravel(&self, id: &MaterialId) -> Option<&AggregateMass> {
        self.gravels.iter().find(|m| &m.material == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitMass {
    pub ssd_kg: f64,
    pub dry_kg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCost {
    pub material: MaterialId,
    pub cost: f64,
}

/// Cost per cubic meter, SSD quantities × unit cost per kg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub cement: f64,
    pub water: f64,
    pub sands: Vec<MaterialCost>,
    pub gravels: Vec<MaterialCost>,
    pub additives: Vec<MaterialCost>,
    pub total: f64,
}

/// One recipe. Replaced wholesale on recompute, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRecipe {
    /// Working code, e.g. `FC200-10D-28D`.
    pub code: String,
    pub design_type: DesignType,
    pub strength: u32,
    pub age: DesignAge,
    pub slump: u32,
    pub placement: Placement,
    pub aggregate_size_mm: u32,
    pub water_dosage_l: f64,
    pub fcr: f64,
    pub ac_ratio: f64,
    pub materials_ssd: MaterialsByState,
    pub materials_dry: MaterialsByState,
    pub volumes: VolumeBreakdown,
    pub unit_mass: UnitMass,
    pub costs: CostBreakdown,
    /// Absorption correction added to the dry-state water [L].
    pub extra_water_l: f64,
    pub calculated_additives: Vec<CalculatedAdditive>,
}
