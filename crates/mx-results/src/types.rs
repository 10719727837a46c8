//! Stored batch data types.

use serde::{Deserialize, Serialize};

pub type BatchKey = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub key: BatchKey,
    pub project_name: String,
    /// RFC 3339, UTC.
    pub timestamp: String,
    pub engine_version: String,
    pub recipe_count: usize,
}

impl BatchManifest {
    pub fn new(key: BatchKey, project_name: &str, engine_version: &str, recipe_count: usize) -> Self {
        Self {
            key,
            project_name: project_name.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            engine_version: engine_version.to_string(),
            recipe_count,
        }
    }
}
