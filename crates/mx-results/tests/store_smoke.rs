use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use mx_mix::{GeneratedRecipe, MixContext};
use mx_results::{BatchManifest, BatchStore, GenerationInputs, ResultsError, compute_batch_key};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn demo_batch() -> (mx_project::Project, Vec<GeneratedRecipe>) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos/plant1.yaml");
    let project = mx_project::load_yaml(&path).expect("demo project loads");
    let materials = project.materials.resolve().expect("demo materials are complete");
    let recipes = MixContext::new(
        &project.design,
        &materials,
        &project.additive_system,
        project.aggregate_size_mm,
    )
    .with_fcr_overrides(&project.fcr_overrides)
    .generate_batch(&project.strengths, &project.water_definitions)
    .expect("demo batch generates");
    (project, recipes)
}

#[test]
fn save_list_load_roundtrip() {
    let project_dir = unique_temp_dir("mx_results_project");
    fs::create_dir_all(&project_dir).expect("failed to create temp project dir");
    let project_path = project_dir.join("plant.yaml");
    fs::write(&project_path, "version: 1\nname: test\n").expect("failed to write project file");

    let store = BatchStore::for_project(&project_path).expect("failed to create batch store");
    assert!(store.root_dir().ends_with(".mixflow/batches"));

    let (project, recipes) = demo_batch();
    let key = compute_batch_key(&GenerationInputs::from(&project), "0.1.0");
    let manifest = BatchManifest::new(key.clone(), &project.name, "0.1.0", recipes.len());

    assert!(!store.has_batch(&key));
    store
        .save_batch(&manifest, &recipes)
        .expect("failed to save batch");
    assert!(store.has_batch(&key));

    let listed = store.list_batches(&project.name).expect("failed to list batches");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].key, key);
    assert_eq!(listed[0].recipe_count, recipes.len());
    assert!(store.list_batches("other").unwrap().is_empty());

    let loaded = store.load_recipes(&key).expect("failed to load recipes");
    assert_eq!(loaded, recipes);

    store.delete_batch(&key).expect("failed to delete batch");
    assert!(!store.has_batch(&key));

    let _ = fs::remove_dir_all(project_dir);
}

#[test]
fn missing_batch_is_reported() {
    let store = BatchStore::new(unique_temp_dir("mx_results_missing")).unwrap();
    assert!(matches!(
        store.load_manifest("nope"),
        Err(ResultsError::BatchNotFound { .. })
    ));
    assert!(matches!(
        store.load_recipes("nope"),
        Err(ResultsError::BatchNotFound { .. })
    ));
    store.delete_batch("nope").unwrap();
}

#[test]
fn manifest_timestamp_is_rfc3339() {
    let manifest = BatchManifest::new("k".into(), "p", "v1", 3);
    assert!(chrono::DateTime::parse_from_rfc3339(&manifest.timestamp).is_ok());
}
