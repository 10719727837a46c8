//! Saturated-surface-dry (SSD) ↔ oven-dry conversion.
//!
//! Aggregate masses are batched in SSD state. The oven-dry mass of a fraction is
//! `ssd / (1 + a/100)` and the water it would absorb from the mix is `ssd × a/100`,
//! where `a` is the absorption rate in percent. Additives do not absorb water and
//! are the same in both states.

use crate::material::ResolvedMaterial;
use mx_core::{Mass, MaterialId, as_kg};

/// Oven-dry mass of an aggregate fraction.
pub fn oven_dry_mass(ssd: Mass, absorption_pct: f64) -> Mass {
    ssd / (1.0 + absorption_pct / 100.0)
}

/// SSD mass of an aggregate fraction given its oven-dry mass.
pub fn ssd_mass(dry: Mass, absorption_pct: f64) -> Mass {
    dry * (1.0 + absorption_pct / 100.0)
}

/// Water [kg ≡ L] held by an SSD fraction.
pub fn absorbed_water(ssd: Mass, absorption_pct: f64) -> Mass {
    ssd * (absorption_pct / 100.0)
}

/// One aggregate fraction in both states.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateFraction {
    pub material: MaterialId,
    pub ssd_kg: f64,
    pub dry_kg: f64,
    pub absorbed_water_kg: f64,
}

/// Result of converting every sand and gravel fraction of a recipe.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateConversion {
    pub fractions: Vec<AggregateFraction>,
    /// Water to add in oven-dry state, summed over all fractions [L].
    pub absorption_correction_l: f64,
}

impl StateConversion {
    pub fn fraction(&self, id: &MaterialId) -> Option<&AggregateFraction> {
        self.fractions.iter().find(|f| &f.material == id)
    }
}

/// Convert SSD masses of aggregate fractions to oven-dry state.
pub fn convert_aggregates<'a, I>(fractions: I) -> StateConversion
where
    I: IntoIterator<Item = (&'a ResolvedMaterial, Mass)>,
{
    let mut out = StateConversion::default();
    for (material, ssd) in fractions {
        let absorbed = absorbed_water(ssd, material.absorption_pct);
        out.absorption_correction_l += as_kg(absorbed);
        out.fractions.push(AggregateFraction {
            material: material.id.clone(),
            ssd_kg: as_kg(ssd),
            dry_kg: as_kg(oven_dry_mass(ssd, material.absorption_pct)),
            absorbed_water_kg: as_kg(absorbed),
        });
    }
    out
}

/// Mixing water in each state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterByState {
    /// User dosage, unmodified [L].
    pub ssd_l: f64,
    /// Dosage plus absorption correction [L].
    pub dry_l: f64,
}

impl WaterByState {
    pub fn new(dosage_l: f64, conversion: &StateConversion) -> Self {
        Self {
            ssd_l: dosage_l,
            dry_l: dosage_l + conversion.absorption_correction_l,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use mx_core::{Tolerances, kg, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ssd_dry_round_trip(ssd in 0.0_f64..3000.0, absorption in 0.0_f64..100.0) {
            let dry = oven_dry_mass(kg(ssd), absorption);
            let back = ssd_mass(dry, absorption);
            let tol = Tolerances { abs: 1e-9, rel: 1e-12 };
            prop_assert!(nearly_equal(as_kg(back), ssd, tol));
        }

        #[test]
        fn dry_never_exceeds_ssd(ssd in 0.0_f64..3000.0, absorption in 0.0_f64..100.0) {
            let dry = as_kg(oven_dry_mass(kg(ssd), absorption));
            prop_assert!(dry <= ssd + 1e-9);
        }
    }
}
