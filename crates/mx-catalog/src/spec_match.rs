//! Specification match key between generated recipes and catalog records.
//!
//! - strength and slump: exact
//! - placement: equivalence classes over the catalog's spellings
//! - aggregate size: within ±1 mm
//! - age: same unit and value, or 24 h ≡ 1 day in either direction

use crate::port::{ExistingMasterRecord, ExistingRecipeRecord};
use mx_mix::{AgeUnit, GeneratedRecipe, Placement};

const AGGREGATE_TOLERANCE_MM: u32 = 1;
const HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlacementClass {
    Direct,
    Pumped,
    /// Unrecognized spelling, upper-cased. Equal only to itself.
    Other(String),
}

impl From<Placement> for PlacementClass {
    fn from(p: Placement) -> Self {
        match p {
            Placement::Direct => Self::Direct,
            Placement::Pumped => Self::Pumped,
        }
    }
}

pub fn normalize_placement(raw: &str) -> PlacementClass {
    let upper = raw.trim().to_uppercase();
    match upper.as_str() {
        "D" | "TD" | "DIRECT" | "DIRECTO" | "TIRO DIRECTO" => PlacementClass::Direct,
        "B" | "BOMB" | "BOMBA" | "BOMBEO" | "BOMBEADO" | "PUMPED" => PlacementClass::Pumped,
        _ => PlacementClass::Other(upper),
    }
}

/// Age as stored in the catalog. Zero means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgeSpec {
    pub days: Option<u32>,
    pub hours: Option<u32>,
}

impl AgeSpec {
    pub fn new(days: Option<u32>, hours: Option<u32>) -> Self {
        Self {
            days: days.filter(|&d| d > 0),
            hours: hours.filter(|&h| h > 0),
        }
    }

    fn matches(&self, value: u32, unit: AgeUnit) -> bool {
        match unit {
            AgeUnit::Days => {
                self.days == Some(value)
                    || value
                        .checked_mul(HOURS_PER_DAY)
                        .is_some_and(|h| self.hours == Some(h))
            }
            AgeUnit::Hours => {
                self.hours == Some(value)
                    || self
                        .days
                        .and_then(|d| d.checked_mul(HOURS_PER_DAY))
                        .is_some_and(|h| h == value)
            }
        }
    }
}

/// Specification of a catalog record, normalized for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecKey {
    pub strength: u32,
    pub slump: u32,
    pub placement: PlacementClass,
    pub aggregate_size: u32,
    pub age: AgeSpec,
}

impl From<&ExistingRecipeRecord> for SpecKey {
    fn from(r: &ExistingRecipeRecord) -> Self {
        Self {
            strength: r.strength,
            slump: r.slump,
            placement: normalize_placement(&r.placement),
            aggregate_size: r.aggregate_size,
            age: AgeSpec::new(r.age_days, r.age_hours),
        }
    }
}

impl From<&ExistingMasterRecord> for SpecKey {
    fn from(m: &ExistingMasterRecord) -> Self {
        Self {
            strength: m.strength,
            slump: m.slump,
            placement: normalize_placement(&m.placement),
            aggregate_size: m.aggregate_size,
            age: AgeSpec::new(m.age_days, m.age_hours),
        }
    }
}

impl SpecKey {
    /// Whether this catalog spec describes the same product as `recipe`.
    pub fn matches(&self, recipe: &GeneratedRecipe) -> bool {
        self.strength == recipe.strength
            && self.slump == recipe.slump
            && self.placement == PlacementClass::from(recipe.placement)
            && self.aggregate_size.abs_diff(recipe.aggregate_size_mm) <= AGGREGATE_TOLERANCE_MM
            && self.age.matches(recipe.age.value, recipe.age.unit)
    }
}
