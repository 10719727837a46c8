use mx_catalog::NamingConfig;
use mx_materials::{AdditiveMaterial, Material, MaterialSet};
use mx_mix::{
    AdditiveRule, AdditiveSystemConfig, AggregateBlend, AggregateBlends, AirContent, BlendShare,
    DesignAge, DesignParameters, DesignType, DosingMode, MortarVolumeTable, Placement,
    ResistanceFactors, StandardDeviation, WaterDefinition,
};
use mx_project::{
    LATEST_VERSION, Project, ProjectError, ValidationError, load, load_json, load_yaml, save_json,
    save_yaml, validate_project,
};
use std::collections::BTreeMap;

fn project() -> Project {
    let blend = AggregateBlend {
        sands: vec![BlendShare::new("s1", 100.0)],
        gravels: vec![BlendShare::new("g1", 100.0)],
    };
    let mut standard_deviation = StandardDeviation::uniform(23.0);
    standard_deviation.per_strength.insert(250, 18.5);
    Project {
        version: LATEST_VERSION,
        name: "Roundtrip".to_string(),
        plant_id: "P1".to_string(),
        design: DesignParameters {
            design_type: DesignType::FC,
            age: DesignAge::days(28),
            standard_deviation,
            resistance_factors: ResistanceFactors::default(),
            air_content: AirContent {
                direct: 1.5,
                pumped: 2.0,
            },
            mortar_volume: MortarVolumeTable {
                fc_direct: 560.0,
                fc_pumped: 600.0,
                mr_normal: 540.0,
                mr_high: 580.0,
                mr_high_slump_min: 14,
            },
            blends: AggregateBlends {
                direct: blend.clone(),
                pumped: blend,
            },
        },
        materials: MaterialSet {
            cement: Material::new("cem", "CPC 30R", 3.15, 0.0, 2.5),
            sands: vec![Material::new("s1", "Arena", 2.6, 2.0, 0.3)],
            gravels: vec![Material::new("g1", "Grava", 2.7, 1.0, 0.25)],
            additives: vec![AdditiveMaterial::new(
                Material::new("a1", "Reductor", 1.2, 0.0, 40.0),
                5.0,
                0.3,
            )],
        },
        strengths: vec![200, 250],
        aggregate_size_mm: 20,
        water_definitions: vec![
            WaterDefinition::new(10, Placement::Direct, 180.0),
            WaterDefinition::new(14, Placement::Pumped, 195.0),
        ],
        additive_system: AdditiveSystemConfig {
            total_cc_per_kg_cement: 5.0,
            mode: DosingMode::Rules,
            rules: vec![AdditiveRule::new("a1", 100.0, 0.0, 1000.0)],
        },
        naming: NamingConfig::default(),
        fcr_overrides: BTreeMap::from([("FC200-10D-28D".to_string(), 250.0)]),
    }
}

fn temp_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("mx_project_tests");
    std::fs::create_dir_all(&dir).unwrap();
    dir.join(name)
}

#[test]
fn roundtrip_yaml() {
    let project = project();
    validate_project(&project).unwrap();

    let path = temp_path("roundtrip.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_json() {
    let project = project();
    let path = temp_path("roundtrip.json");
    save_json(&path, &project).unwrap();
    assert_eq!(load_json(&path).unwrap(), project);
    assert_eq!(load(&path).unwrap(), project);
}

#[test]
fn minimal_yaml_gets_defaults_and_is_migrated() {
    let yaml = r#"
name: Minimal
design:
  design_type: MR
  air_content: { direct: 1.0, pumped: 1.5 }
  mortar_volume: { fc_direct: 560, fc_pumped: 600, mr_normal: 540, mr_high: 580 }
materials:
  cement: { id: cem, name: Cemento, density: 3.1, absorption_rate: 0, unit_cost: 2 }
  sands: [{ id: s1, name: Arena }]
  gravels: [{ id: g1, name: Grava, density: 2.7, absorption_rate: 1, unit_cost: 0.2 }]
strengths: [40, 45]
aggregate_size_mm: 40
water_definitions:
  - { slump: 8, placement: D, water_l: 170 }
"#;
    let path = temp_path("minimal.yaml");
    std::fs::write(&path, yaml).unwrap();
    let p = load_yaml(&path).unwrap();

    assert_eq!(p.version, LATEST_VERSION);
    assert_eq!(p.design.age, DesignAge::days(28));
    assert_eq!(p.design.mortar_volume.mr_high_slump_min, 14);
    assert_eq!(p.design.standard_deviation, StandardDeviation::default());
    assert_eq!(p.naming, NamingConfig::default());
    assert_eq!(p.additive_system.mode, DosingMode::Rules);
    assert!(p.water_definitions[0].enabled);
    assert_eq!(p.water_definitions[0].placement, Placement::Direct);
    assert_eq!(p.batch_size(), 2);
    // Incomplete sand is a diagnostic, not a structural error.
    assert_eq!(p.materials.sands[0].density, None);
}

#[test]
fn unsupported_version_is_rejected() {
    let mut p = project();
    p.version = LATEST_VERSION + 1;
    assert_eq!(
        validate_project(&p),
        Err(ValidationError::UnsupportedVersion {
            version: LATEST_VERSION + 1
        })
    );
}

#[test]
fn blend_reference_must_exist() {
    let mut p = project();
    p.design.blends.pumped.gravels = vec![BlendShare::new("g9", 100.0)];
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::MissingReference { ref id, .. }) if id == "g9"
    ));
}

#[test]
fn duplicates_are_rejected() {
    let mut p = project();
    p.strengths.push(200);
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::DuplicateId { ref context, .. }) if context == "strengths"
    ));

    let mut p = project();
    p.water_definitions
        .push(WaterDefinition::new(10, Placement::Direct, 185.0));
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::DuplicateId { ref context, .. }) if context == "water_definitions"
    ));

    let mut p = project();
    p.materials.gravels.push(Material::new("s1", "Dup", 2.7, 1.0, 0.2));
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::DuplicateId { ref context, .. }) if context == "materials"
    ));
}

#[test]
fn naming_fields_cannot_break_segments() {
    let mut p = project();
    p.naming.segment = "2-1".to_string();
    assert!(matches!(
        validate_project(&p),
        Err(ValidationError::InvalidValue { ref field, .. }) if field == "naming.segment"
    ));
}

#[test]
fn invalid_file_does_not_save() {
    let mut p = project();
    p.design.mortar_volume.fc_direct = 1200.0;
    let path = temp_path("invalid.yaml");
    let _ = std::fs::remove_file(&path);
    assert!(matches!(
        save_yaml(&path, &p),
        Err(ProjectError::Validation(_))
    ));
    assert!(!path.exists());
}
