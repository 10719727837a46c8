//! Material resolution errors.

use crate::material::MaterialRole;
use core::fmt;
use mx_core::MaterialId;
use thiserror::Error;

/// Result type for material operations.
pub type MaterialResult<T> = Result<T, MaterialError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialProperty {
    Density,
    AbsorptionRate,
    UnitCost,
}

impl fmt::Display for MaterialProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Density => "density",
            Self::AbsorptionRate => "absorption rate",
            Self::UnitCost => "unit cost",
        })
    }
}

/// One problem found while resolving a material set.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialIssue {
    MissingProperty {
        role: MaterialRole,
        id: MaterialId,
        name: String,
        property: MaterialProperty,
    },
    InvalidProperty {
        role: MaterialRole,
        id: MaterialId,
        name: String,
        property: MaterialProperty,
        value: f64,
    },
    NoMaterials {
        role: MaterialRole,
    },
    DuplicateId {
        id: MaterialId,
    },
}

impl fmt::Display for MaterialIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProperty {
                role,
                id,
                name,
                property,
            } => write!(f, "{role} '{name}' ({id}): missing {property}"),
            Self::InvalidProperty {
                role,
                id,
                name,
                property,
                value,
            } => write!(f, "{role} '{name}' ({id}): invalid {property} {value}"),
            Self::NoMaterials { role } => write!(f, "no {role} selected"),
            Self::DuplicateId { id } => write!(f, "material id {id} is used more than once"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// The selected materials cannot be used for generation; every issue is listed.
    #[error("Incomplete materials ({} issue(s)): {}", .issues.len(), join(.issues))]
    Incomplete { issues: Vec<MaterialIssue> },
}

fn join(issues: &[MaterialIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_lists_every_issue() {
        let err = MaterialError::Incomplete {
            issues: vec![
                MaterialIssue::MissingProperty {
                    role: MaterialRole::Sand,
                    id: "a1".into(),
                    name: "ARENA".to_string(),
                    property: MaterialProperty::Density,
                },
                MaterialIssue::NoMaterials {
                    role: MaterialRole::Gravel,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 issue(s)"));
        assert!(msg.contains("sand 'ARENA' (a1): missing density"));
        assert!(msg.contains("no gravel selected"));
    }
}
