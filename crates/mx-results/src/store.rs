//! Batch storage API.
//!
//! Layout: `<root>/<key>/manifest.json` and `<root>/<key>/recipes.json`.

use crate::types::BatchManifest;
use crate::{ResultsError, ResultsResult};
use mx_mix::GeneratedRecipe;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone)]
pub struct BatchStore {
    root_dir: PathBuf,
}

impl BatchStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store next to a project file, under `.mixflow/batches`.
    pub fn for_project(project_path: &Path) -> ResultsResult<Self> {
        let project_dir = project_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "project path has no parent directory".to_string(),
            })?;
        let batches_dir = project_dir.join(".mixflow").join("batches");
        Self::new(batches_dir)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn batch_dir(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    pub fn has_batch(&self, key: &str) -> bool {
        let dir = self.batch_dir(key);
        dir.join("manifest.json").exists() && dir.join("recipes.json").exists()
    }

    pub fn save_batch(
        &self,
        manifest: &BatchManifest,
        recipes: &[GeneratedRecipe],
    ) -> ResultsResult<()> {
        let batch_dir = self.batch_dir(&manifest.key);
        fs::create_dir_all(&batch_dir)?;

        let recipes_json = serde_json::to_string_pretty(recipes)?;
        fs::write(batch_dir.join("recipes.json"), recipes_json)?;

        // Written last: a manifest marks a complete batch.
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(batch_dir.join("manifest.json"), manifest_json)?;

        Ok(())
    }

    pub fn load_manifest(&self, key: &str) -> ResultsResult<BatchManifest> {
        let manifest_path = self.batch_dir(key).join("manifest.json");

        if !manifest_path.exists() {
            return Err(ResultsError::BatchNotFound {
                key: key.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_recipes(&self, key: &str) -> ResultsResult<Vec<GeneratedRecipe>> {
        let recipes_path = self.batch_dir(key).join("recipes.json");

        if !recipes_path.exists() {
            return Err(ResultsError::BatchNotFound {
                key: key.to_string(),
            });
        }

        let content = fs::read_to_string(recipes_path)?;
        let recipes = serde_json::from_str(&content)?;
        Ok(recipes)
    }

    /// Manifests of every stored batch for `project_name`, newest first.
    pub fn list_batches(&self, project_name: &str) -> ResultsResult<Vec<BatchManifest>> {
        let mut batches = Vec::new();

        if !self.root_dir.exists() {
            return Ok(batches);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let key = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&key)
                    && manifest.project_name == project_name
                {
                    batches.push(manifest);
                }
            }
        }

        batches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(batches)
    }

    pub fn delete_batch(&self, key: &str) -> ResultsResult<()> {
        let batch_dir = self.batch_dir(key);
        if batch_dir.exists() {
            fs::remove_dir_all(batch_dir)?;
        }
        Ok(())
    }
}
