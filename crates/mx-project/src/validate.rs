//! Structural project validation.
//!
//! Errors here make a project unusable. Quality problems that still allow
//! generation are reported by [`crate::diagnose_project`] instead.

use crate::migrate::LATEST_VERSION;
use crate::schema::Project;
use mx_catalog::NamingConfig;
use mx_materials::MaterialSet;
use mx_mix::{AggregateBlends, DesignParameters, Placement};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }
    if project.name.trim().is_empty() {
        return Err(invalid("name", "", "must not be empty"));
    }
    if project.aggregate_size_mm == 0 {
        return Err(invalid("aggregate_size_mm", 0, "must be positive"));
    }

    let mut strengths = HashSet::new();
    for &s in &project.strengths {
        if s == 0 {
            return Err(invalid("strengths", s, "must be positive"));
        }
        if !strengths.insert(s) {
            return Err(ValidationError::DuplicateId {
                id: s.to_string(),
                context: "strengths".to_string(),
            });
        }
    }

    let mut water_keys = HashSet::new();
    for def in &project.water_definitions {
        if !water_keys.insert((def.slump, def.placement)) {
            return Err(ValidationError::DuplicateId {
                id: format!("{}cm {}", def.slump, def.placement),
                context: "water_definitions".to_string(),
            });
        }
        if !def.water_l.is_finite() {
            return Err(invalid("water_definitions.water_l", def.water_l, "must be finite"));
        }
    }

    validate_design(&project.design)?;
    validate_materials(&project.materials)?;
    validate_blends(&project.design.blends, &project.materials)?;
    validate_naming(&project.naming)?;

    if !project.additive_system.total_cc_per_kg_cement.is_finite() {
        return Err(invalid(
            "additive_system.total_cc_per_kg_cement",
            project.additive_system.total_cc_per_kg_cement,
            "must be finite",
        ));
    }

    for (code, fcr) in &project.fcr_overrides {
        if !fcr.is_finite() || *fcr <= 0.0 {
            return Err(invalid(
                &format!("fcr_overrides.{code}"),
                fcr,
                "must be positive",
            ));
        }
    }

    Ok(())
}

fn validate_design(design: &DesignParameters) -> Result<(), ValidationError> {
    let f = &design.resistance_factors;
    if !f.factor1.is_finite() || f.factor1 <= 0.0 {
        return Err(invalid("design.resistance_factors.factor1", f.factor1, "must be positive"));
    }
    if !f.factor2.is_finite() || f.factor2 <= 0.0 {
        return Err(invalid("design.resistance_factors.factor2", f.factor2, "must be positive"));
    }
    if design.age.value == 0 {
        return Err(invalid("design.age.value", 0, "must be positive"));
    }

    for (field, v) in [
        ("design.air_content.direct", design.air_content.direct),
        ("design.air_content.pumped", design.air_content.pumped),
    ] {
        if !(0.0..100.0).contains(&v) {
            return Err(invalid(field, v, "must be a percentage in [0, 100)"));
        }
    }

    let m = &design.mortar_volume;
    for (field, v) in [
        ("design.mortar_volume.fc_direct", m.fc_direct),
        ("design.mortar_volume.fc_pumped", m.fc_pumped),
        ("design.mortar_volume.mr_normal", m.mr_normal),
        ("design.mortar_volume.mr_high", m.mr_high),
    ] {
        if !(v > 0.0 && v <= mx_core::BATCH_VOLUME_L) {
            return Err(invalid(field, v, "must be in (0, 1000] L"));
        }
    }

    let sd = &design.standard_deviation;
    if let Some(p) = sd.percent.filter(|p| !p.is_finite() || *p < 0.0) {
        return Err(invalid("design.standard_deviation.percent", p, "must be non-negative"));
    }
    for (strength, p) in &sd.per_strength {
        if !p.is_finite() || *p < 0.0 {
            return Err(invalid(
                &format!("design.standard_deviation.per_strength.{strength}"),
                p,
                "must be non-negative",
            ));
        }
    }
    Ok(())
}

fn validate_materials(materials: &MaterialSet) -> Result<(), ValidationError> {
    let mut ids = HashSet::new();
    for (_, material) in materials.iter() {
        if material.id.as_str().trim().is_empty() {
            return Err(invalid("materials.id", "", "must not be empty"));
        }
        if !ids.insert(&material.id) {
            return Err(ValidationError::DuplicateId {
                id: material.id.to_string(),
                context: "materials".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_blends(blends: &AggregateBlends, materials: &MaterialSet) -> Result<(), ValidationError> {
    for placement in [Placement::Direct, Placement::Pumped] {
        let blend = blends.for_placement(placement);
        for (group, shares, known) in [
            ("sand", &blend.sands, &materials.sands),
            ("gravel", &blend.gravels, &materials.gravels),
        ] {
            for share in shares {
                if !known.iter().any(|m| m.id == share.material) {
                    return Err(ValidationError::MissingReference {
                        id: share.material.to_string(),
                        context: format!("{placement} {group} blend"),
                    });
                }
                if !share.percent.is_finite() || share.percent < 0.0 {
                    return Err(invalid(
                        &format!("design.blends.{placement}.{group}"),
                        share.percent,
                        "must be a non-negative percentage",
                    ));
                }
            }
        }
    }
    Ok(())
}

fn validate_naming(naming: &NamingConfig) -> Result<(), ValidationError> {
    for (field, value) in [
        ("naming.prefix", &naming.prefix),
        ("naming.type_letter", &naming.type_letter),
        ("naming.segment", &naming.segment),
        ("naming.variant", &naming.variant),
    ] {
        if value.is_empty() || value.contains('-') || value.contains(char::is_whitespace) {
            return Err(invalid(field, value, "must be a non-empty code field without '-'"));
        }
    }
    if naming.pce_auto_detect && naming.pce_marker.trim().is_empty() {
        return Err(invalid("naming.pce_marker", "", "required when PCE auto-detection is on"));
    }
    Ok(())
}
