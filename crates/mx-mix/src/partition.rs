//! Absolute-volume partitioner.
//!
//! One cubic meter (1000 L) is shared by cement, water, air, additives, sand and
//! gravel. Sand and gravel are residuals:
//!
//! ```text
//! sand   = mortar − (water + cement + air + additive)
//! gravel = 1000 − mortar
//! ```
//!
//! so the six components add up to 1000 L by construction.

use crate::design::BlendShare;
use crate::error::{MixError, MixResult};
use mx_core::{
    BATCH_VOLUME_L, Density, MaterialId, as_kg, as_liters, ensure_finite, kg, liters, mass_of,
    volume_of,
};
use mx_materials::ResolvedMaterial;
use serde::{Deserialize, Serialize};

/// Inputs of one partition.
#[derive(Debug, Clone, Copy)]
pub struct PartitionInput {
    pub cement_kg: f64,
    pub cement_density: Density,
    /// Water is taken at 1 kg/L.
    pub water_l: f64,
    pub air_content_pct: f64,
    pub additive_l: f64,
    pub mortar_l: f64,
}

/// Absolute volumes of one cubic meter [L].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBreakdown {
    pub cement: f64,
    pub water: f64,
    pub air: f64,
    pub additive: f64,
    pub sand: f64,
    pub gravel: f64,
    pub mortar: f64,
}

impl VolumeBreakdown {
    /// Sum of the six components (mortar excluded).
    pub fn total(&self) -> f64 {
        self.cement + self.water + self.air + self.additive + self.sand + self.gravel
    }
}

/// Partition 1000 L. `recipe` only labels errors.
pub fn partition_volumes(input: &PartitionInput, recipe: &str) -> MixResult<VolumeBreakdown> {
    let cement = volume_of(kg(input.cement_kg), input.cement_density);
    let cement = ensure_finite(as_liters(cement), "cement volume")?;
    let water = ensure_finite(input.water_l, "water volume")?;
    let air = ensure_finite(
        BATCH_VOLUME_L * input.air_content_pct / 100.0,
        "air volume",
    )?;
    let additive = ensure_finite(input.additive_l, "additive volume")?;
    let mortar = ensure_finite(input.mortar_l, "mortar volume")?;

    let sand = mortar - (water + cement + air + additive);
    if sand < 0.0 {
        return Err(MixError::NonPhysical {
            what: "sand volume",
            recipe: recipe.to_owned(),
            value: sand,
        });
    }
    let gravel = BATCH_VOLUME_L - mortar;
    if gravel < 0.0 {
        return Err(MixError::NonPhysical {
            what: "gravel volume",
            recipe: recipe.to_owned(),
            value: gravel,
        });
    }

    Ok(VolumeBreakdown {
        cement,
        water,
        air,
        additive,
        sand,
        gravel,
        mortar,
    })
}

/// One aggregate fraction after splitting a group volume.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionVolume {
    pub material: MaterialId,
    pub name: String,
    pub volume_l: f64,
    pub ssd_kg: f64,
}

/// Split `total_l` across blend shares (used as given, not normalized) and convert
/// each share to SSD mass through its material's density.
pub fn split_fractions<'m, F>(
    total_l: f64,
    shares: &[BlendShare],
    mut lookup: F,
    role: &'static str,
) -> MixResult<Vec<(FractionVolume, &'m ResolvedMaterial)>>
where
    F: FnMut(&MaterialId) -> Option<&'m ResolvedMaterial>,
{
    shares
        .iter()
        .map(|share| {
            let material = lookup(&share.material).ok_or_else(|| MixError::UnknownBlendMaterial {
                role,
                id: share.material.clone(),
            })?;
            let volume_l = total_l * share.percent / 100.0;
            let ssd_kg = as_kg(mass_of(liters(volume_l), material.density));
            Ok((
                FractionVolume {
                    material: material.id.clone(),
                    name: material.name.clone(),
                    volume_l,
                    ssd_kg,
                },
                material,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_core::{Tolerances, nearly_equal, specific_gravity};

    fn input(mortar_l: f64) -> PartitionInput {
        PartitionInput {
            cement_kg: 315.0,
            cement_density: specific_gravity(3.15),
            water_l: 180.0,
            air_content_pct: 1.5,
            additive_l: 1.5,
            mortar_l,
        }
    }

    #[test]
    fn residuals() {
        let v = partition_volumes(&input(560.0), "FC200-10D-28D").unwrap();
        assert!(nearly_equal(v.cement, 100.0, Tolerances::default()));
        assert!(nearly_equal(v.air, 15.0, Tolerances::default()));
        assert!(nearly_equal(v.sand, 560.0 - 296.5, Tolerances::default()));
        assert!(nearly_equal(v.gravel, 440.0, Tolerances::default()));
        assert!(nearly_equal(v.total(), 1000.0, Tolerances::default()));
    }

    #[test]
    fn negative_sand_is_non_physical() {
        let err = partition_volumes(&input(250.0), "FC400-10D-28D").unwrap_err();
        match err {
            MixError::NonPhysical { what, recipe, value } => {
                assert_eq!(what, "sand volume");
                assert_eq!(recipe, "FC400-10D-28D");
                assert!(value < 0.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn split_uses_blend_as_given() {
        let sands = [
            ResolvedMaterial {
                id: "s1".into(),
                name: "Arena 1".into(),
                density: specific_gravity(2.5),
                absorption_pct: 3.0,
                unit_cost: 0.2,
            },
            ResolvedMaterial {
                id: "s2".into(),
                name: "Arena 2".into(),
                density: specific_gravity(2.0),
                absorption_pct: 1.0,
                unit_cost: 0.2,
            },
        ];
        let shares = [BlendShare::new("s1", 60.0), BlendShare::new("s2", 30.0)];
        let out = split_fractions(200.0, &shares, |id| sands.iter().find(|m| &m.id == id), "sand")
            .unwrap();
        assert!(nearly_equal(out[0].0.volume_l, 120.0, Tolerances::default()));
        assert!(nearly_equal(out[0].0.ssd_kg, 300.0, Tolerances::default()));
        assert!(nearly_equal(out[1].0.ssd_kg, 120.0, Tolerances::default()));

        let missing = [BlendShare::new("nope", 100.0)];
        assert!(matches!(
            split_fractions(200.0, &missing, |id| sands.iter().find(|m| &m.id == id), "sand"),
            Err(MixError::UnknownBlendMaterial { role: "sand", .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use mx_core::specific_gravity;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn six_components_sum_to_batch_volume(
            cement_kg in 150.0_f64..550.0,
            cement_sg in 2.9_f64..3.2,
            water_l in 140.0_f64..230.0,
            air in 0.5_f64..3.0,
            additive_l in 0.0_f64..6.0,
            mortar_l in 520.0_f64..700.0,
        ) {
            let input = PartitionInput {
                cement_kg,
                cement_density: specific_gravity(cement_sg),
                water_l,
                air_content_pct: air,
                additive_l,
                mortar_l,
            };
            if let Ok(v) = partition_volumes(&input, "prop") {
                prop_assert!((v.total() - BATCH_VOLUME_L).abs() < 1e-9);
                prop_assert!(v.sand >= 0.0 && v.gravel >= 0.0);
            }
        }
    }
}
