//! ARKIK code generation.
//!
//! Long code, nine hyphen-delimited fields:
//!
//! ```text
//! {prefix}-{strength:03}-{aggClass}-{type}-{age}-{slump:02}-{placement}-{segment}-{variant}
//! 5-100-2-B-28-10-D-2-000
//! ```
//!
//! The short code is `{strength:03}{age:02}{aggClass}{slump:02}{placement}`. It is the
//! fallback composition of the export format and may change once the authoritative
//! abbreviation is known.

use mx_mix::{AgeUnit, DesignAge, GeneratedRecipe};
use serde::{Deserialize, Serialize};

fn default_prefix() -> String {
    "5".into()
}
fn default_type_letter() -> String {
    "B".into()
}
fn default_segment() -> String {
    "2".into()
}
fn default_variant() -> String {
    "000".into()
}
fn default_pce_marker() -> String {
    "PCE".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_type_letter")]
    pub type_letter: String,
    #[serde(default = "default_segment")]
    pub segment: String,
    /// Manual variant suffix.
    #[serde(default = "default_variant")]
    pub variant: String,
    #[serde(default)]
    pub pce_auto_detect: bool,
    /// Additive name substring that marks a PCE; also the variant token used when detected.
    #[serde(default = "default_pce_marker")]
    pub pce_marker: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            type_letter: default_type_letter(),
            segment: default_segment(),
            variant: default_variant(),
            pce_auto_detect: false,
            pce_marker: default_pce_marker(),
        }
    }
}

impl NamingConfig {
    /// Variant for one recipe: the PCE token if auto-detection is on and this recipe
    /// doses a PCE additive, otherwise the manual suffix.
    pub fn variant_for(&self, recipe: &GeneratedRecipe) -> &str {
        if self.pce_auto_detect && self.has_pce(recipe) {
            &self.pce_marker
        } else {
            &self.variant
        }
    }

    fn has_pce(&self, recipe: &GeneratedRecipe) -> bool {
        let marker = self.pce_marker.to_uppercase();
        !marker.is_empty()
            && recipe
                .calculated_additives
                .iter()
                .any(|a| a.total_cc > 0.0 && a.name.to_uppercase().contains(&marker))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArkikCode {
    pub long_code: String,
    pub short_code: String,
}

/// Aggregate-size class digit: 4 for ≥ 40 mm, else 2.
pub fn aggregate_class(size_mm: u32) -> char {
    if size_mm >= 40 { '4' } else { '2' }
}

fn age_field(age: DesignAge) -> String {
    match age.unit {
        AgeUnit::Days => format!("{:02}", age.value),
        AgeUnit::Hours => format!("{:02}H", age.value),
    }
}

pub fn generate_codes(recipe: &GeneratedRecipe, naming: &NamingConfig) -> ArkikCode {
    let class = aggregate_class(recipe.aggregate_size_mm);
    let age = age_field(recipe.age);
    let placement = recipe.placement.letter();

    let long_code = format!(
        "{}-{:03}-{class}-{}-{age}-{:02}-{placement}-{}-{}",
        naming.prefix,
        recipe.strength,
        naming.type_letter,
        recipe.slump,
        naming.segment,
        naming.variant_for(recipe),
    );
    let short_code = format!(
        "{:03}{:02}{class}{:02}{placement}",
        recipe.strength, recipe.age.value, recipe.slump
    );

    ArkikCode {
        long_code,
        short_code,
    }
}

/// Master code: the long code without its last two segments.
pub fn master_code(long_code: &str) -> String {
    let mut parts: Vec<&str> = long_code.split('-').collect();
    let keep = parts.len().saturating_sub(2);
    parts.truncate(keep);
    parts.join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_classes() {
        assert_eq!(aggregate_class(10), '2');
        assert_eq!(aggregate_class(19), '2');
        assert_eq!(aggregate_class(20), '2');
        assert_eq!(aggregate_class(25), '2');
        assert_eq!(aggregate_class(40), '4');
    }

    #[test]
    fn master_code_drops_segment_and_variant() {
        assert_eq!(master_code("5-100-2-B-28-10-D-2-000"), "5-100-2-B-28-10-D");
        assert_eq!(master_code("X"), "");
    }

    #[test]
    fn age_fields() {
        assert_eq!(age_field(DesignAge::days(7)), "07");
        assert_eq!(age_field(DesignAge::days(28)), "28");
        assert_eq!(age_field(DesignAge::hours(24)), "24H");
    }
}
