//! Smoke tests for the mx-app service layer over the demo files.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use mx_app::{
    BatchRequest, BatchSource, GenerateOptions, ensure_batch, list_batches,
    load_catalog_snapshot, load_project, parse_overrides, plan_save, validate_project,
};
use mx_catalog::{Collision, InMemoryCatalog, SaveAction};
use mx_results::RecipeCache;

fn demo(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // go to crates
    path.pop(); // go to repo root
    path.push("demos");
    path.push(name);
    path
}

/// Copy the demo project into a fresh directory so batches land in a temp store.
fn scratch_project() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("mx_app_smoke_{}", nanos));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    let path = dir.join("plant1.yaml");
    fs::copy(demo("plant1.yaml"), &path).expect("failed to copy demo project");
    path
}

#[test]
fn demo_project_validates() {
    let project = load_project(&demo("plant1.yaml")).expect("Failed to load project");
    let report = validate_project(&project).expect("Validation should succeed");
    assert!(!report.has_errors(), "{:?}", report.diagnostics);
    assert_eq!(report.batch_size, 10);
}

#[test]
fn missing_project_file_is_a_read_error() {
    let err = load_project(&demo("does-not-exist.yaml")).unwrap_err();
    assert!(matches!(err, mx_app::AppError::ProjectFileRead { .. }));
}

#[test]
fn batch_is_computed_then_served_from_caches() {
    let project_path = scratch_project();
    let request = BatchRequest {
        project_path: &project_path,
        options: GenerateOptions::default(),
    };

    let mut cache = RecipeCache::default();
    let first = ensure_batch(&request, &mut cache).expect("first generation");
    assert_eq!(first.source, BatchSource::Computed);
    assert_eq!(first.recipes.len(), 10);

    let second = ensure_batch(&request, &mut cache).expect("memory hit");
    assert_eq!(second.source, BatchSource::Memory);
    assert_eq!(second.key, first.key);

    let mut cold = RecipeCache::default();
    let third = ensure_batch(&request, &mut cold).expect("disk hit");
    assert_eq!(third.source, BatchSource::Disk);
    assert!(third.loaded_from_cache());
    assert_eq!(third.recipes, first.recipes);

    let forced = BatchRequest {
        project_path: &project_path,
        options: GenerateOptions {
            use_cache: false,
            ..GenerateOptions::default()
        },
    };
    let fourth = ensure_batch(&forced, &mut cache).expect("forced regeneration");
    assert_eq!(fourth.source, BatchSource::Computed);
    assert_eq!(fourth.recipes, first.recipes);

    let stored = list_batches(&project_path).expect("list batches");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].recipe_count, 10);

    if let Some(dir) = project_path.parent() {
        let _ = fs::remove_dir_all(dir);
    }
}

#[test]
fn demo_batch_reconciles_against_demo_catalog() {
    let project = load_project(&demo("plant1.yaml")).expect("Failed to load project");
    let recipes = mx_app::generate_recipes(&project).expect("demo batch generates");
    let catalog = InMemoryCatalog::new(
        load_catalog_snapshot(&demo("catalog.json")).expect("Failed to load catalog"),
    );

    let plan = plan_save(&project, &recipes, &catalog, &BTreeMap::new()).expect("plan");
    assert_eq!(catalog.query_count(), 3);
    assert_eq!(plan.decisions().len(), 10);
    assert_eq!(plan.blocked_count(), 0);

    let existing = plan.decision("FC200-10D-28D").expect("decision for FC200");
    assert_eq!(
        existing.action,
        SaveAction::UpdateVariant {
            recipe_id: "rec-0101".into()
        }
    );
    let variant = plan.decision("FC250-10D-28D").expect("decision for FC250");
    assert_eq!(
        variant.action,
        SaveAction::CreateVariant {
            master_id: "mst-250-10-d".into()
        }
    );
    assert!(matches!(
        plan.decision("FC100-10D-28D").map(|d| &d.action),
        Some(SaveAction::NewMaster { .. })
    ));

    let overrides =
        parse_overrides(&["FC250-10D-28D=5-250-2-B-28-10-D-2-001".to_string()]).unwrap();
    let revised = plan_save(&project, &recipes, &catalog, &overrides).expect("revised plan");
    assert_eq!(
        revised.decision("FC250-10D-28D").and_then(|d| d.collision.clone()),
        Some(Collision::ExistingCode)
    );
    assert_eq!(revised.finalize().blocked, vec!["FC250-10D-28D".to_string()]);
}
