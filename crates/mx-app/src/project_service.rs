//! Project loading, saving and validation.

use mx_core::Diagnostic;
use mx_project::{Project, ProjectError};
use std::path::Path;

use crate::error::{AppError, AppResult};

/// Outcome of validating a structurally sound project.
#[derive(Debug, Clone)]
pub struct ProjectReport {
    /// Configuration-quality findings, errors first.
    pub diagnostics: Vec<Diagnostic>,
    /// Recipes one generation pass produces.
    pub batch_size: usize,
}

impl ProjectReport {
    /// Whether any finding blocks generation.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.is_error()).count()
    }
}

/// Load a project file (YAML, or JSON by extension). Migrates and validates structure.
pub fn load_project(path: &Path) -> AppResult<Project> {
    mx_project::load(path).map_err(|err| match err {
        ProjectError::Io(source) => AppError::ProjectFileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Save a project file; the format follows the extension.
pub fn save_project(path: &Path, project: &Project) -> AppResult<()> {
    mx_project::save(path, project).map_err(|err| match err {
        ProjectError::Io(source) => AppError::ProjectFileWrite {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })
}

/// Validate project structure, then collect configuration diagnostics.
///
/// Structural problems are errors; quality findings are returned in the report.
pub fn validate_project(project: &Project) -> AppResult<ProjectReport> {
    mx_project::validate_project(project)?;
    Ok(ProjectReport {
        diagnostics: mx_project::diagnose_project(project),
        batch_size: project.batch_size(),
    })
}
