//! Mix proportioning calculator.

use crate::additives::{AdditiveSystemConfig, CalculatedAdditive, dose_additives};
use crate::design::{DesignAge, DesignParameters, DesignType, Placement, WaterDefinition};
use crate::error::{MixError, MixResult};
use crate::partition::{FractionVolume, PartitionInput, partition_volumes, split_fractions};
use crate::recipe::{
    AdditiveDose, AggregateMass, CostBreakdown, GeneratedRecipe, MaterialCost, MaterialsByState,
    UnitMass,
};
use mx_core::{MaterialId, ensure_finite, kg, round_to_decimals, round_to_step};
use mx_materials::{
    MixMaterials, ResolvedMaterial, StateConversion, WaterByState, convert_aggregates,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Standard deviation used when neither a per-strength nor a scalar value is set [%].
pub const DEFAULT_STANDARD_DEVIATION_PCT: f64 = 23.0;

const CEMENT_STEP_KG: f64 = 5.0;

/// `FCR = f'c + f'c × σ/100`, rounded to 2 decimals.
pub fn critical_strength(strength: u32, std_dev_pct: f64) -> f64 {
    let fc = f64::from(strength);
    round_to_decimals(fc + fc * std_dev_pct / 100.0, 2)
}

/// `A/C = (factor1 / FCR)^(1/factor2)`, rounded to 3 decimals.
pub fn water_cement_ratio(fcr: f64, factor1: f64, factor2: f64) -> MixResult<f64> {
    if !fcr.is_finite() || fcr <= 0.0 {
        return Err(MixError::InvalidArg {
            what: "FCR must be positive",
        });
    }
    if factor2 == 0.0 {
        return Err(MixError::InvalidArg {
            what: "resistance factor2 must be non-zero",
        });
    }
    let ratio = ensure_finite((factor1 / fcr).powf(1.0 / factor2), "A/C ratio")?;
    Ok(round_to_decimals(ratio, 3))
}

/// Cement [kg/m³] for a water dosage, rounded to a multiple of 5.
pub fn cement_content(water_l: f64, ac_ratio: f64) -> MixResult<f64> {
    if !ac_ratio.is_finite() || ac_ratio <= 0.0 {
        return Err(MixError::InvalidArg {
            what: "A/C ratio must be positive",
        });
    }
    let raw = ensure_finite(water_l / ac_ratio, "cement content")?;
    Ok(round_to_step(raw, CEMENT_STEP_KG))
}

/// Working code, e.g. `FC200-10D-28D`.
pub fn recipe_code(
    design_type: DesignType,
    strength: u32,
    slump: u32,
    placement: Placement,
    age: DesignAge,
) -> String {
    format!(
        "{design_type}{strength}-{slump}{}-{age}",
        placement.letter()
    )
}

/// One (strength, slump, placement, water) target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecipeTarget {
    pub strength: u32,
    pub slump: u32,
    pub placement: Placement,
    pub water_l: f64,
}

/// Everything a recipe depends on besides its target.
#[derive(Debug, Clone, Copy)]
pub struct MixContext<'a> {
    pub design: &'a DesignParameters,
    pub materials: &'a MixMaterials,
    pub additives: &'a AdditiveSystemConfig,
    pub aggregate_size_mm: u32,
    pub fcr_overrides: Option<&'a BTreeMap<String, f64>>,
}

impl<'a> MixContext<'a> {
    pub fn new(
        design: &'a DesignParameters,
        materials: &'a MixMaterials,
        additives: &'a AdditiveSystemConfig,
        aggregate_size_mm: u32,
    ) -> Self {
        Self {
            design,
            materials,
            additives,
            aggregate_size_mm,
            fcr_overrides: None,
        }
    }

    pub fn with_fcr_overrides(mut self, overrides: &'a BTreeMap<String, f64>) -> Self {
        self.fcr_overrides = Some(overrides);
        self
    }

    /// Resolved standard deviation for `strength` [%].
    pub fn standard_deviation(&self, strength: u32) -> f64 {
        let value = self
            .design
            .standard_deviation
            .lookup(strength)
            .unwrap_or(DEFAULT_STANDARD_DEVIATION_PCT);
        if !value.is_finite() {
            warn!(
                strength,
                value, "invalid standard deviation, using the default"
            );
            return DEFAULT_STANDARD_DEVIATION_PCT;
        }
        round_to_decimals(value, 6)
    }

    /// Compute one recipe. Pure: identical inputs give an identical value.
    pub fn compute(&self, target: &RecipeTarget) -> MixResult<GeneratedRecipe> {
        let design = self.design;
        let code = recipe_code(
            design.design_type,
            target.strength,
            target.slump,
            target.placement,
            design.age,
        );

        let fcr = match self.fcr_overrides.and_then(|m| m.get(&code)) {
            Some(&fcr) => ensure_finite(fcr, "FCR override")?,
            None => critical_strength(target.strength, self.standard_deviation(target.strength)),
        };
        let ac_ratio = water_cement_ratio(
            fcr,
            design.resistance_factors.factor1,
            design.resistance_factors.factor2,
        )?;
        let cement_kg = cement_content(target.water_l, ac_ratio)?;

        let calculated_additives = dose_additives(cement_kg, self.additives, self.materials);
        let additive_doses = self.additive_doses(&calculated_additives);
        let additive_l: f64 = additive_doses.iter().map(|d| d.liters).sum();

        let volumes = partition_volumes(
            &PartitionInput {
                cement_kg,
                cement_density: self.materials.cement.density,
                water_l: target.water_l,
                air_content_pct: design.air_content.for_placement(target.placement),
                additive_l,
                mortar_l: design
                    .mortar_volume
                    .lookup(design.design_type, target.placement, target.slump),
            },
            &code,
        )?;

        let blend = design.blends.for_placement(target.placement);
        let sands = split_fractions(
            volumes.sand,
            &blend.sands,
            |id| self.materials.sand(id),
            "sand",
        )?;
        let gravels = split_fractions(
            volumes.gravel,
            &blend.gravels,
            |id| self.materials.gravel(id),
            "gravel",
        )?;

        let conversion = convert_aggregates(
            sands
                .iter()
                .chain(gravels.iter())
                .map(|(f, m)| (*m, kg(f.ssd_kg))),
        );
        let water = WaterByState::new(target.water_l, &conversion);

        let materials_ssd = MaterialsByState {
            cement_kg,
            water_l: water.ssd_l,
            sands: aggregate_masses(&sands, &conversion, false),
            gravels: aggregate_masses(&gravels, &conversion, false),
            additives: additive_doses.clone(),
        };
        let materials_dry = MaterialsByState {
            cement_kg,
            water_l: water.dry_l,
            sands: aggregate_masses(&sands, &conversion, true),
            gravels: aggregate_masses(&gravels, &conversion, true),
            additives: additive_doses,
        };

        let unit_mass = UnitMass {
            ssd_kg: self.unit_mass(&materials_ssd),
            dry_kg: self.unit_mass(&materials_dry),
        };
        let costs = self.costs(&materials_ssd);

        Ok(GeneratedRecipe {
            code,
            design_type: design.design_type,
            strength: target.strength,
            age: design.age,
            slump: target.slump,
            placement: target.placement,
            aggregate_size_mm: self.aggregate_size_mm,
            water_dosage_l: target.water_l,
            fcr,
            ac_ratio,
            materials_ssd,
            materials_dry,
            volumes,
            unit_mass,
            costs,
            extra_water_l: conversion.absorption_correction_l,
            calculated_additives,
        })
    }

    /// Full cross product of `strengths` × enabled water definitions, in that order.
    ///
    /// Fails fast on the first recipe that cannot be proportioned.
    pub fn generate_batch(
        &self,
        strengths: &[u32],
        water_definitions: &[WaterDefinition],
    ) -> MixResult<Vec<GeneratedRecipe>> {
        let enabled: Vec<&WaterDefinition> =
            water_definitions.iter().filter(|d| d.enabled).collect();
        debug!(
            strengths = strengths.len(),
            water_definitions = enabled.len(),
            "generating recipe batch"
        );

        let mut recipes = Vec::with_capacity(strengths.len() * enabled.len());
        for &strength in strengths {
            for def in &enabled {
                recipes.push(self.compute(&RecipeTarget {
                    strength,
                    slump: def.slump,
                    placement: def.placement,
                    water_l: def.water_l,
                })?);
            }
        }

        info!(
            design_type = %self.design.design_type,
            recipes = recipes.len(),
            "recipe batch generated"
        );
        Ok(recipes)
    }

    fn additive_doses(&self, calculated: &[CalculatedAdditive]) -> Vec<AdditiveDose> {
        calculated
            .iter()
            .map(|c| AdditiveDose {
                material: c.additive.clone(),
                name: c.name.clone(),
                liters: c.liters(),
            })
            .collect()
    }

    fn additive_kg(&self, dose: &AdditiveDose) -> f64 {
        self.materials
            .additive(&dose.material)
            .map_or(0.0, |a| dose.liters * a.material.specific_gravity())
    }

    fn unit_mass(&self, state: &MaterialsByState) -> f64 {
        state.cement_kg
            + state.water_l
            + state.sands.iter().map(|m| m.kg).sum::<f64>()
            + state.gravels.iter().map(|m| m.kg).sum::<f64>()
            + state
                .additives
                .iter()
                .map(|d| self.additive_kg(d))
                .sum::<f64>()
    }

    fn costs(&self, ssd: &MaterialsByState) -> CostBreakdown {
        let m = self.materials;
        let sands = priced(&ssd.sands, |id| m.sand(id).map_or(0.0, |s| s.unit_cost));
        let gravels = priced(&ssd.gravels, |id| m.gravel(id).map_or(0.0, |g| g.unit_cost));
        let additives: Vec<MaterialCost> = ssd
            .additives
            .iter()
            .map(|d| MaterialCost {
                material: d.material.clone(),
                cost: self.additive_kg(d)
                    * m.additive(&d.material).map_or(0.0, |a| a.material.unit_cost),
            })
            .collect();

        let cement = ssd.cement_kg * m.cement.unit_cost;
        let water = 0.0;
        let total = cement
            + water
            + sands.iter().map(|c| c.cost).sum::<f64>()
            + gravels.iter().map(|c| c.cost).sum::<f64>()
            + additives.iter().map(|c| c.cost).sum::<f64>();

        CostBreakdown {
            cement,
            water,
            sands,
            gravels,
            additives,
            total,
        }
    }
}

fn aggregate_masses(
    fractions: &[(FractionVolume, &ResolvedMaterial)],
    conversion: &StateConversion,
    dry: bool,
) -> Vec<AggregateMass> {
    fractions
        .iter()
        .map(|(f, _)| AggregateMass {
            material: f.material.clone(),
            name: f.name.clone(),
            kg: match (dry, conversion.fraction(&f.material)) {
                (true, Some(c)) => c.dry_kg,
                _ => f.ssd_kg,
            },
        })
        .collect()
}

fn priced<F>(masses: &[AggregateMass], unit_cost: F) -> Vec<MaterialCost>
where
    F: Fn(&MaterialId) -> f64,
{
    masses
        .iter()
        .map(|a| MaterialCost {
            material: a.material.clone(),
            cost: a.kg * unit_cost(&a.material),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_scenario_steps() {
        let fcr = critical_strength(200, 23.0);
        assert_eq!(fcr, 246.0);
        let ac = water_cement_ratio(fcr, 120.0, 1.626).unwrap();
        assert_eq!(ac, 0.643);
        assert_eq!(cement_content(180.0, ac).unwrap(), 280.0);
    }

    #[test]
    fn invalid_ratio_inputs() {
        assert!(water_cement_ratio(0.0, 120.0, 1.626).is_err());
        assert!(water_cement_ratio(246.0, 120.0, 0.0).is_err());
        assert!(cement_content(180.0, 0.0).is_err());
    }

    #[test]
    fn working_code() {
        assert_eq!(
            recipe_code(DesignType::FC, 200, 10, Placement::Direct, DesignAge::days(28)),
            "FC200-10D-28D"
        );
        assert_eq!(
            recipe_code(DesignType::MR, 45, 8, Placement::Pumped, DesignAge::hours(24)),
            "MR45-8B-24H"
        );
    }
}
