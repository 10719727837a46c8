//! Additive distribution engine.
//!
//! A rule applies to a cement dosage `c` iff `c ∈ [cement_min, cement_max)`.
//! Every applying rule contributes
//! `total_cc_per_kg_cement × c × cc_percentage / 100` to its additive. Incomplete
//! bands are not an engine error; see [`band_completion`].

use mx_core::{Diagnostic, MaterialId};
use mx_materials::MixMaterials;
use serde::{Deserialize, Serialize};

const PERCENT_TOLERANCE: f64 = 0.1;
const TOTAL_CC_TYPICAL_MAX: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DosingMode {
    /// Cement-range rules.
    #[default]
    Rules,
    /// Each additive's own `cc_per_kg × manual_percentage`.
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveRule {
    pub additive: MaterialId,
    /// Share of the total dosage, 0-100.
    pub cc_percentage: f64,
    pub cement_min: f64,
    /// Exclusive.
    pub cement_max: f64,
    /// Display ordering only.
    #[serde(default)]
    pub priority: i32,
}

impl AdditiveRule {
    pub fn new(
        additive: impl Into<MaterialId>,
        cc_percentage: f64,
        cement_min: f64,
        cement_max: f64,
    ) -> Self {
        Self {
            additive: additive.into(),
            cc_percentage,
            cement_min,
            cement_max,
            priority: 0,
        }
    }

    pub fn applies_to(&self, cement_kg: f64) -> bool {
        cement_kg >= self.cement_min && cement_kg < self.cement_max
    }

    fn overlaps(&self, start: f64, end: f64) -> bool {
        self.cement_min < end && self.cement_max > start
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditiveSystemConfig {
    pub total_cc_per_kg_cement: f64,
    #[serde(default)]
    pub mode: DosingMode,
    #[serde(default)]
    pub rules: Vec<AdditiveRule>,
}

impl Default for AdditiveSystemConfig {
    fn default() -> Self {
        Self {
            total_cc_per_kg_cement: 5.0,
            mode: DosingMode::Rules,
            rules: Vec::new(),
        }
    }
}

/// Dosage of one additive for one recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedAdditive {
    pub additive: MaterialId,
    pub name: String,
    pub cc_per_kg: f64,
    pub total_cc: f64,
}

impl CalculatedAdditive {
    pub fn liters(&self) -> f64 {
        self.total_cc / 1000.0
    }
}

/// Dose every additive for `cement_kg`, in material-set order.
///
/// Rules pointing at an additive that is not in `materials` are ignored. An
/// empty result is a normal outcome.
pub fn dose_additives(
    cement_kg: f64,
    config: &AdditiveSystemConfig,
    materials: &MixMaterials,
) -> Vec<CalculatedAdditive> {
    match config.mode {
        DosingMode::Rules => dose_by_rules(cement_kg, config, materials),
        DosingMode::Manual => dose_manually(cement_kg, materials),
    }
}

fn dose_by_rules(
    cement_kg: f64,
    config: &AdditiveSystemConfig,
    materials: &MixMaterials,
) -> Vec<CalculatedAdditive> {
    let applying: Vec<&AdditiveRule> = config
        .rules
        .iter()
        .filter(|r| r.applies_to(cement_kg))
        .collect();

    materials
        .additives
        .iter()
        .filter_map(|a| {
            let mut rules = applying
                .iter()
                .filter(|r| r.additive == a.material.id)
                .peekable();
            rules.peek()?;
            let pct: f64 = rules.map(|r| r.cc_percentage).sum();
            let cc_per_kg = config.total_cc_per_kg_cement * pct / 100.0;
            Some(CalculatedAdditive {
                additive: a.material.id.clone(),
                name: a.material.name.clone(),
                cc_per_kg,
                total_cc: cement_kg * cc_per_kg,
            })
        })
        .collect()
}

fn dose_manually(cement_kg: f64, materials: &MixMaterials) -> Vec<CalculatedAdditive> {
    materials
        .additives
        .iter()
        .filter(|a| a.manual_percentage > 0.0)
        .map(|a| {
            let cc_per_kg = a.cc_per_kg * a.manual_percentage / 100.0;
            CalculatedAdditive {
                additive: a.material.id.clone(),
                name: a.material.name.clone(),
                cc_per_kg,
                total_cc: cement_kg * cc_per_kg,
            }
        })
        .collect()
}

/// Status of one cement band between consecutive rule breakpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandCompletion {
    pub start: f64,
    pub end: f64,
    pub total_percentage: f64,
    /// Indices into `AdditiveSystemConfig::rules`.
    pub rules: Vec<usize>,
    /// Additives whose summed share in this band exceeds 100 %.
    pub over_allocated: Vec<(MaterialId, f64)>,
}

impl BandCompletion {
    pub fn is_complete(&self) -> bool {
        (self.total_percentage - 100.0).abs() <= PERCENT_TOLERANCE
    }
}

/// Per-band percentage totals. Read-only; never changes dosing.
pub fn band_completion(config: &AdditiveSystemConfig) -> Vec<BandCompletion> {
    let mut breakpoints: Vec<f64> = config
        .rules
        .iter()
        .flat_map(|r| [r.cement_min, r.cement_max])
        .filter(|v| v.is_finite())
        .collect();
    breakpoints.sort_by(f64::total_cmp);
    breakpoints.dedup();

    breakpoints
        .windows(2)
        .map(|w| {
            let (start, end) = (w[0], w[1]);
            let rules: Vec<usize> = config
                .rules
                .iter()
                .enumerate()
                .filter(|(_, r)| r.overlaps(start, end))
                .map(|(i, _)| i)
                .collect();
            let total_percentage = rules.iter().map(|&i| config.rules[i].cc_percentage).sum();

            let mut per_additive: Vec<(MaterialId, f64)> = Vec::new();
            for &i in &rules {
                let rule = &config.rules[i];
                match per_additive.iter_mut().find(|(id, _)| *id == rule.additive) {
                    Some((_, pct)) => *pct += rule.cc_percentage,
                    None => per_additive.push((rule.additive.clone(), rule.cc_percentage)),
                }
            }
            per_additive.retain(|(_, pct)| *pct > 100.0 + PERCENT_TOLERANCE);

            BandCompletion {
                start,
                end,
                total_percentage,
                rules,
                over_allocated: per_additive,
            }
        })
        .collect()
}

/// Configuration-quality findings for the additive system.
pub fn diagnose_additive_system(
    config: &AdditiveSystemConfig,
    known_additives: &[MaterialId],
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let total = config.total_cc_per_kg_cement;
    if !total.is_finite() || total <= 0.0 {
        out.push(Diagnostic::error(
            "additive system",
            format!("total cc per kg of cement must be positive, got {total}"),
        ));
    } else if total > TOTAL_CC_TYPICAL_MAX {
        out.push(Diagnostic::warning(
            "additive system",
            format!("total cc per kg of cement {total} is unusually high"),
        ));
    }

    if config.mode == DosingMode::Manual {
        return out;
    }

    for (i, rule) in config.rules.iter().enumerate() {
        let subject = format!("additive rule #{} ({})", i + 1, rule.additive);
        let pct_in_range = rule.cc_percentage > 0.0 && rule.cc_percentage <= 100.0;
        if !pct_in_range {
            out.push(Diagnostic::warning(
                subject.clone(),
                format!("percentage {} is outside (0, 100]", rule.cc_percentage),
            ));
        }
        let range_ok = rule.cement_min < rule.cement_max;
        if !range_ok {
            out.push(Diagnostic::error(
                subject.clone(),
                format!(
                    "cement range [{}, {}) is empty",
                    rule.cement_min, rule.cement_max
                ),
            ));
        }
        if !known_additives.contains(&rule.additive) {
            out.push(Diagnostic::warning(
                subject,
                "references an additive that is not selected",
            ));
        }
    }

    for band in band_completion(config) {
        let subject = format!("cement band [{}, {})", band.start, band.end);
        if !band.is_complete() {
            out.push(Diagnostic::warning(
                subject.clone(),
                format!(
                    "rules sum to {:.2} %, expected 100 %",
                    band.total_percentage
                ),
            ));
        }
        for (id, pct) in &band.over_allocated {
            out.push(Diagnostic::warning(
                subject.clone(),
                format!("additive {id} is allocated {pct:.2} %"),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_core::{Tolerances, nearly_equal, specific_gravity};
    use mx_materials::{ResolvedAdditive, ResolvedMaterial};

    fn resolved(id: &str, sg: f64) -> ResolvedMaterial {
        ResolvedMaterial {
            id: id.into(),
            name: id.to_uppercase(),
            density: specific_gravity(sg),
            absorption_pct: 0.0,
            unit_cost: 1.0,
        }
    }

    fn materials(additives: &[(&str, f64, f64)]) -> MixMaterials {
        MixMaterials {
            cement: resolved("cem", 3.15),
            sands: vec![resolved("s1", 2.6)],
            gravels: vec![resolved("g1", 2.7)],
            additives: additives
                .iter()
                .map(|&(id, cc, pct)| ResolvedAdditive {
                    material: resolved(id, 1.2),
                    cc_per_kg: cc,
                    manual_percentage: pct,
                    is_default: false,
                })
                .collect(),
        }
    }

    fn two_band_config() -> AdditiveSystemConfig {
        AdditiveSystemConfig {
            total_cc_per_kg_cement: 5.0,
            mode: DosingMode::Rules,
            rules: vec![
                AdditiveRule::new("a1", 100.0, 0.0, 300.0),
                AdditiveRule::new("a2", 100.0, 300.0, 1000.0),
            ],
        }
    }

    #[test]
    fn boundary_matches_only_upper_band() {
        let mats = materials(&[("a1", 5.0, 0.0), ("a2", 5.0, 0.0)]);
        let dosed = dose_additives(300.0, &two_band_config(), &mats);
        assert_eq!(dosed.len(), 1);
        assert_eq!(dosed[0].additive.as_str(), "a2");
        assert!(nearly_equal(dosed[0].total_cc, 1500.0, Tolerances::default()));
        assert!(nearly_equal(dosed[0].liters(), 1.5, Tolerances::default()));

        let below = dose_additives(299.0, &two_band_config(), &mats);
        assert_eq!(below.len(), 1);
        assert_eq!(below[0].additive.as_str(), "a1");
    }

    #[test]
    fn no_match_doses_nothing() {
        let mats = materials(&[("a1", 5.0, 0.0)]);
        assert!(dose_additives(1200.0, &two_band_config(), &mats).is_empty());
    }

    #[test]
    fn split_rules_consolidate_per_additive() {
        let config = AdditiveSystemConfig {
            total_cc_per_kg_cement: 4.0,
            mode: DosingMode::Rules,
            rules: vec![
                AdditiveRule::new("a2", 30.0, 0.0, 500.0),
                AdditiveRule::new("a1", 50.0, 0.0, 500.0),
                AdditiveRule::new("a2", 10.0, 200.0, 500.0),
                AdditiveRule::new("ghost", 10.0, 0.0, 500.0),
            ],
        };
        let mats = materials(&[("a1", 5.0, 0.0), ("a2", 5.0, 0.0)]);
        let dosed = dose_additives(250.0, &config, &mats);

        let ids: Vec<_> = dosed.iter().map(|d| d.additive.as_str()).collect();
        assert_eq!(ids, ["a1", "a2"]);
        assert!(nearly_equal(dosed[0].cc_per_kg, 2.0, Tolerances::default()));
        assert!(nearly_equal(dosed[1].cc_per_kg, 1.6, Tolerances::default()));
        assert!(nearly_equal(dosed[1].total_cc, 400.0, Tolerances::default()));
    }

    #[test]
    fn partial_band_is_returned_as_is() {
        let config = AdditiveSystemConfig {
            total_cc_per_kg_cement: 5.0,
            mode: DosingMode::Rules,
            rules: vec![AdditiveRule::new("a1", 60.0, 0.0, 400.0)],
        };
        let mats = materials(&[("a1", 5.0, 0.0)]);
        let dosed = dose_additives(200.0, &config, &mats);
        assert!(nearly_equal(dosed[0].total_cc, 600.0, Tolerances::default()));
    }

    #[test]
    fn manual_mode_uses_material_percentages() {
        let config = AdditiveSystemConfig {
            mode: DosingMode::Manual,
            ..two_band_config()
        };
        let mats = materials(&[("a1", 5.0, 0.3), ("a2", 8.0, 0.0)]);
        let dosed = dose_additives(300.0, &config, &mats);
        assert_eq!(dosed.len(), 1);
        assert!(nearly_equal(dosed[0].cc_per_kg, 0.015, Tolerances::default()));
        assert!(nearly_equal(dosed[0].total_cc, 4.5, Tolerances::default()));
    }

    #[test]
    fn bands_report_completion() {
        let config = AdditiveSystemConfig {
            total_cc_per_kg_cement: 5.0,
            mode: DosingMode::Rules,
            rules: vec![
                AdditiveRule::new("a1", 70.0, 0.0, 300.0),
                AdditiveRule::new("a2", 30.0, 200.0, 300.0),
                AdditiveRule::new("a2", 100.0, 300.0, 600.0),
            ],
        };
        let bands = band_completion(&config);
        assert_eq!(bands.len(), 3);
        assert_eq!((bands[0].start, bands[0].end), (0.0, 200.0));
        assert!(!bands[0].is_complete());
        assert!(bands[1].is_complete());
        assert_eq!(bands[1].rules, vec![0, 1]);
        assert!(bands[2].is_complete());
    }

    #[test]
    fn diagnostics_flag_bad_rules() {
        let config = AdditiveSystemConfig {
            total_cc_per_kg_cement: 25.0,
            mode: DosingMode::Rules,
            rules: vec![
                AdditiveRule::new("a1", 120.0, 0.0, 300.0),
                AdditiveRule::new("zz", 50.0, 300.0, 300.0),
            ],
        };
        let d = diagnose_additive_system(&config, &["a1".into()]);
        assert!(d.iter().any(|d| d.message.contains("unusually high")));
        assert!(d.iter().any(|d| d.message.contains("outside (0, 100]")));
        assert!(d.iter().any(|d| d.is_error() && d.message.contains("is empty")));
        assert!(d.iter().any(|d| d.message.contains("not selected")));
        assert!(d.iter().any(|d| d.message.contains("allocated 120.00 %")));
    }
}
