//! Material definitions and resolution.

use crate::error::{MaterialError, MaterialIssue, MaterialProperty, MaterialResult};
use core::fmt;
use mx_core::{Density, MaterialId, specific_gravity};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role a material plays in a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialRole {
    Cement,
    Sand,
    Gravel,
    Additive,
}

impl fmt::Display for MaterialRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cement => "cement",
            Self::Sand => "sand",
            Self::Gravel => "gravel",
            Self::Additive => "additive",
        })
    }
}

/// A material as configured. Properties may be missing until the material
/// catalog is complete; `MaterialSet::resolve` reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    /// Specific gravity [g/cm³].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    /// Absorption [% of oven-dry mass].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absorption_rate: Option<f64>,
    /// Cost per kilogram.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<f64>,
}

impl Material {
    pub fn new(
        id: impl Into<MaterialId>,
        name: impl Into<String>,
        density: f64,
        absorption_rate: f64,
        unit_cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            density: Some(density),
            absorption_rate: Some(absorption_rate),
            unit_cost: Some(unit_cost),
        }
    }
}

/// A chemical admixture. Carries its own dosage settings used by manual dosing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveMaterial {
    #[serde(flatten)]
    pub material: Material,
    /// Dosage concentration [cm³ per kg of cement].
    #[serde(default)]
    pub cc_per_kg: f64,
    /// Manual distribution percentage [0, 100].
    #[serde(default)]
    pub manual_percentage: f64,
    /// Built-in fallback used when no additive is selected.
    #[serde(default)]
    pub is_default: bool,
}

impl AdditiveMaterial {
    pub const BUILTIN_ID: &'static str = "builtin-additive";

    pub fn new(material: Material, cc_per_kg: f64, manual_percentage: f64) -> Self {
        Self {
            material,
            cc_per_kg,
            manual_percentage,
            is_default: false,
        }
    }

    /// Fallback plasticizer injected when the selection carries no additive.
    pub fn builtin_default() -> Self {
        Self {
            material: Material::new(Self::BUILTIN_ID, "PLASTOL 5000", 1.2, 0.0, 48.0),
            cc_per_kg: 5.0,
            manual_percentage: 0.3,
            is_default: true,
        }
    }
}

/// The materials selected for one generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSet {
    pub cement: Material,
    #[serde(default)]
    pub sands: Vec<Material>,
    #[serde(default)]
    pub gravels: Vec<Material>,
    #[serde(default)]
    pub additives: Vec<AdditiveMaterial>,
}

/// A material with every property present and checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMaterial {
    pub id: MaterialId,
    pub name: String,
    pub density: Density,
    pub absorption_pct: f64,
    pub unit_cost: f64,
}

impl ResolvedMaterial {
    pub fn specific_gravity(&self) -> f64 {
        mx_core::as_specific_gravity(self.density)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAdditive {
    pub material: ResolvedMaterial,
    pub cc_per_kg: f64,
    pub manual_percentage: f64,
    pub is_default: bool,
}

/// Materials ready for proportioning.
#[derive(Debug, Clone, PartialEq)]
pub struct MixMaterials {
    pub cement: ResolvedMaterial,
    pub sands: Vec<ResolvedMaterial>,
    pub gravels: Vec<ResolvedMaterial>,
    pub additives: Vec<ResolvedAdditive>,
}

impl MixMaterials {
    pub fn sand(&self, id: &MaterialId) -> Option<&ResolvedMaterial> {
        self.sands.iter().find(|m| &m.id == id)
    }

    pub fn gravel(&self, id: &MaterialId) -> Option<&ResolvedMaterial> {
        self.gravels.iter().find(|m| &m.id == id)
    }

    pub fn additive(&self, id: &MaterialId) -> Option<&ResolvedAdditive> {
        self.additives.iter().find(|a| &a.material.id == id)
    }
}

impl MaterialSet {
    /// Additives used for generation: the selection, or the built-in default when empty.
    pub fn effective_additives(&self) -> Vec<AdditiveMaterial> {
        if self.additives.is_empty() {
            vec![AdditiveMaterial::builtin_default()]
        } else {
            self.additives.clone()
        }
    }

    /// Every material in role order.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialRole, &Material)> {
        std::iter::once((MaterialRole::Cement, &self.cement))
            .chain(self.sands.iter().map(|m| (MaterialRole::Sand, m)))
            .chain(self.gravels.iter().map(|m| (MaterialRole::Gravel, m)))
            .chain(
                self.additives
                    .iter()
                    .map(|a| (MaterialRole::Additive, &a.material)),
            )
    }

    /// Itemized list of everything that blocks generation. Empty when usable.
    pub fn issues(&self) -> Vec<MaterialIssue> {
        let mut issues = Vec::new();

        if self.sands.is_empty() {
            issues.push(MaterialIssue::NoMaterials {
                role: MaterialRole::Sand,
            });
        }
        if self.gravels.is_empty() {
            issues.push(MaterialIssue::NoMaterials {
                role: MaterialRole::Gravel,
            });
        }

        let mut seen = HashSet::new();
        for (role, material) in self.iter() {
            if !seen.insert(&material.id) {
                issues.push(MaterialIssue::DuplicateId {
                    id: material.id.clone(),
                });
            }
            check_material(role, material, &mut issues);
        }

        issues
    }

    /// Resolve into `MixMaterials`, or list every issue found.
    pub fn resolve(&self) -> MaterialResult<MixMaterials> {
        let issues = self.issues();
        if !issues.is_empty() {
            return Err(MaterialError::Incomplete { issues });
        }

        let mut issues = Vec::new();
        let cement = resolve_one(MaterialRole::Cement, &self.cement, &mut issues);
        let sands = self
            .sands
            .iter()
            .filter_map(|m| resolve_one(MaterialRole::Sand, m, &mut issues))
            .collect();
        let gravels = self
            .gravels
            .iter()
            .filter_map(|m| resolve_one(MaterialRole::Gravel, m, &mut issues))
            .collect();
        let additives = self
            .effective_additives()
            .iter()
            .filter_map(|a| {
                resolve_one(MaterialRole::Additive, &a.material, &mut issues).map(|material| {
                    ResolvedAdditive {
                        material,
                        cc_per_kg: a.cc_per_kg,
                        manual_percentage: a.manual_percentage,
                        is_default: a.is_default,
                    }
                })
            })
            .collect();

        match cement {
            Some(cement) if issues.is_empty() => Ok(MixMaterials {
                cement,
                sands,
                gravels,
                additives,
            }),
            _ => Err(MaterialError::Incomplete { issues }),
        }
    }
}

fn check_material(role: MaterialRole, material: &Material, issues: &mut Vec<MaterialIssue>) {
    let checks = [
        (MaterialProperty::Density, material.density),
        (MaterialProperty::AbsorptionRate, material.absorption_rate),
        (MaterialProperty::UnitCost, material.unit_cost),
    ];

    for (property, value) in checks {
        match value {
            None => issues.push(MaterialIssue::MissingProperty {
                role,
                id: material.id.clone(),
                name: material.name.clone(),
                property,
            }),
            Some(v) if !is_valid(property, v) => issues.push(MaterialIssue::InvalidProperty {
                role,
                id: material.id.clone(),
                name: material.name.clone(),
                property,
                value: v,
            }),
            Some(_) => {}
        }
    }
}

fn is_valid(property: MaterialProperty, v: f64) -> bool {
    if !v.is_finite() {
        return false;
    }
    match property {
        MaterialProperty::Density => v > 0.0,
        MaterialProperty::AbsorptionRate => (0.0..100.0).contains(&v),
        MaterialProperty::UnitCost => v >= 0.0,
    }
}

fn resolve_one(
    role: MaterialRole,
    material: &Material,
    issues: &mut Vec<MaterialIssue>,
) -> Option<ResolvedMaterial> {
    let before = issues.len();
    check_material(role, material, issues);
    if issues.len() != before {
        return None;
    }
    // check_material guarantees all three are present
    let (Some(density), Some(absorption_pct), Some(unit_cost)) =
        (material.density, material.absorption_rate, material.unit_cost)
    else {
        return None;
    };
    Some(ResolvedMaterial {
        id: material.id.clone(),
        name: material.name.clone(),
        density: specific_gravity(density),
        absorption_pct,
        unit_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_set() -> MaterialSet {
        MaterialSet {
            cement: Material::new("c1", "CPC 40", 3.15, 0.0, 3.2),
            sands: vec![Material::new("s1", "ARENA BASALTICA", 2.53, 4.6, 0.24)],
            gravels: vec![Material::new("g1", "GRAVA 20MM", 2.65, 2.1, 0.26)],
            additives: vec![],
        }
    }

    #[test]
    fn resolves_complete_set_with_builtin_additive() {
        let materials = complete_set().resolve().unwrap();
        assert_eq!(materials.sands.len(), 1);
        assert_eq!(materials.additives.len(), 1);
        assert!(materials.additives[0].is_default);
        assert!((materials.cement.specific_gravity() - 3.15).abs() < 1e-12);
    }

    #[test]
    fn missing_properties_are_itemized() {
        let mut set = complete_set();
        set.sands[0].density = None;
        set.gravels[0].unit_cost = None;
        set.gravels[0].absorption_rate = None;

        let err = set.resolve().unwrap_err();
        let MaterialError::Incomplete { issues } = err;
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| matches!(i, MaterialIssue::MissingProperty { .. })));
    }

    #[test]
    fn negative_absorption_is_invalid() {
        let mut set = complete_set();
        set.sands[0].absorption_rate = Some(-1.0);
        let issues = set.issues();
        assert!(matches!(
            issues.as_slice(),
            [MaterialIssue::InvalidProperty {
                property: MaterialProperty::AbsorptionRate,
                ..
            }]
        ));
    }

    #[test]
    fn empty_roles_and_duplicates_reported() {
        let mut set = complete_set();
        set.gravels.clear();
        set.sands.push(Material::new("s1", "ARENA 2", 2.5, 1.0, 0.2));
        let issues = set.issues();
        assert!(issues.contains(&MaterialIssue::NoMaterials {
            role: MaterialRole::Gravel
        }));
        assert!(issues.contains(&MaterialIssue::DuplicateId { id: "s1".into() }));
    }

    #[test]
    fn lookups_by_id() {
        let materials = complete_set().resolve().unwrap();
        assert!(materials.sand(&"s1".into()).is_some());
        assert!(materials.gravel(&"s1".into()).is_none());
        assert!(materials.gravel(&"nope".into()).is_none());
        assert!(
            materials
                .additive(&AdditiveMaterial::BUILTIN_ID.into())
                .is_some()
        );
    }
}
