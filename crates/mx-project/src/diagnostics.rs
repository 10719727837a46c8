//! Configuration-quality diagnostics. Generation proceeds despite warnings.

use crate::schema::Project;
use mx_core::{Diagnostic, MaterialId};
use mx_mix::{diagnose_additive_system, diagnose_blends, diagnose_water_definitions};

/// Every finding for `project`, materials first.
///
/// Material issues are errors: they block generation for the selected set.
pub fn diagnose_project(project: &Project) -> Vec<Diagnostic> {
    let mut out: Vec<Diagnostic> = project
        .materials
        .issues()
        .into_iter()
        .map(|issue| Diagnostic::error("materials", issue.to_string()))
        .collect();

    out.extend(diagnose_water_definitions(&project.water_definitions));

    let known: Vec<MaterialId> = project
        .materials
        .effective_additives()
        .into_iter()
        .map(|a| a.material.id)
        .collect();
    out.extend(diagnose_additive_system(&project.additive_system, &known));
    out.extend(diagnose_blends(&project.design.blends));

    if project.strengths.is_empty() {
        out.push(Diagnostic::warning("strengths", "no strength in scope"));
    }
    out
}
