//! Design parameters and water definitions.

use core::fmt;
use mx_core::{Diagnostic, MaterialId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compressive (FC) or flexural (MR) design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DesignType {
    FC,
    MR,
}

impl fmt::Display for DesignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FC => "FC",
            Self::MR => "MR",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    #[serde(alias = "D")]
    Direct,
    #[serde(alias = "B")]
    Pumped,
}

impl Placement {
    /// Single-letter code: `D` direct, `B` pumped.
    pub fn letter(self) -> char {
        match self {
            Self::Direct => 'D',
            Self::Pumped => 'B',
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Direct => "direct",
            Self::Pumped => "pumped",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeUnit {
    #[serde(alias = "D")]
    Days,
    #[serde(alias = "H")]
    Hours,
}

impl AgeUnit {
    pub fn letter(self) -> char {
        match self {
            Self::Days => 'D',
            Self::Hours => 'H',
        }
    }
}

/// Design age, e.g. 28 days or 24 hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DesignAge {
    pub value: u32,
    pub unit: AgeUnit,
}

impl DesignAge {
    pub fn days(value: u32) -> Self {
        Self {
            value,
            unit: AgeUnit::Days,
        }
    }

    pub fn hours(value: u32) -> Self {
        Self {
            value,
            unit: AgeUnit::Hours,
        }
    }
}

impl Default for DesignAge {
    fn default() -> Self {
        Self::days(28)
    }
}

impl fmt::Display for DesignAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.letter())
    }
}

/// Standard deviation as a percentage of the nominal strength.
///
/// Per-strength entries take precedence over the scalar. Strengths with no
/// entry and no scalar use [`crate::DEFAULT_STANDARD_DEVIATION_PCT`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StandardDeviation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub per_strength: BTreeMap<u32, f64>,
}

impl StandardDeviation {
    pub fn uniform(percent: f64) -> Self {
        Self {
            percent: Some(percent),
            per_strength: BTreeMap::new(),
        }
    }

    /// Configured value for `strength`, before any default is applied.
    pub fn lookup(&self, strength: u32) -> Option<f64> {
        self.per_strength.get(&strength).copied().or(self.percent)
    }
}

/// Empirical constants of the water/cement relation `A/C = (factor1 / FCR)^(1/factor2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistanceFactors {
    pub factor1: f64,
    pub factor2: f64,
}

impl Default for ResistanceFactors {
    fn default() -> Self {
        Self {
            factor1: 120.0,
            factor2: 1.626,
        }
    }
}

/// Entrapped/entrained air by placement, percent of the batch volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirContent {
    pub direct: f64,
    pub pumped: f64,
}

impl AirContent {
    pub fn for_placement(&self, placement: Placement) -> f64 {
        match placement {
            Placement::Direct => self.direct,
            Placement::Pumped => self.pumped,
        }
    }
}

fn default_high_slump_min() -> u32 {
    14
}

/// Mortar volume [L/m³] by design type and placement (FC) or slump (MR).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortarVolumeTable {
    pub fc_direct: f64,
    pub fc_pumped: f64,
    pub mr_normal: f64,
    pub mr_high: f64,
    /// MR slumps at or above this value use `mr_high`.
    #[serde(default = "default_high_slump_min")]
    pub mr_high_slump_min: u32,
}

impl MortarVolumeTable {
    pub fn lookup(&self, design_type: DesignType, placement: Placement, slump: u32) -> f64 {
        match design_type {
            DesignType::FC => match placement {
                Placement::Direct => self.fc_direct,
                Placement::Pumped => self.fc_pumped,
            },
            DesignType::MR if slump >= self.mr_high_slump_min => self.mr_high,
            DesignType::MR => self.mr_normal,
        }
    }
}

/// Share of one material within its aggregate group, percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendShare {
    pub material: MaterialId,
    pub percent: f64,
}

impl BlendShare {
    pub fn new(material: impl Into<MaterialId>, percent: f64) -> Self {
        Self {
            material: material.into(),
            percent,
        }
    }
}

/// Split of the sand and gravel volumes among the selected materials.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateBlend {
    #[serde(default)]
    pub sands: Vec<BlendShare>,
    #[serde(default)]
    pub gravels: Vec<BlendShare>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateBlends {
    pub direct: AggregateBlend,
    pub pumped: AggregateBlend,
}

impl AggregateBlends {
    pub fn for_placement(&self, placement: Placement) -> &AggregateBlend {
        match placement {
            Placement::Direct => &self.direct,
            Placement::Pumped => &self.pumped,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignParameters {
    pub design_type: DesignType,
    #[serde(default)]
    pub age: DesignAge,
    #[serde(default)]
    pub standard_deviation: StandardDeviation,
    #[serde(default)]
    pub resistance_factors: ResistanceFactors,
    pub air_content: AirContent,
    pub mortar_volume: MortarVolumeTable,
    #[serde(default)]
    pub blends: AggregateBlends,
}

fn enabled_by_default() -> bool {
    true
}

/// Mixing water for one (slump, placement) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterDefinition {
    pub slump: u32,
    pub placement: Placement,
    pub water_l: f64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl WaterDefinition {
    pub fn new(slump: u32, placement: Placement, water_l: f64) -> Self {
        Self {
            slump,
            placement,
            water_l,
            enabled: true,
        }
    }
}

const WATER_TYPICAL_MIN_L: f64 = 100.0;
const WATER_TYPICAL_MAX_L: f64 = 300.0;
const PERCENT_TOLERANCE: f64 = 0.1;

/// Configuration-quality findings for the water table.
pub fn diagnose_water_definitions(defs: &[WaterDefinition]) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    if !defs.iter().any(|d| d.enabled) {
        out.push(Diagnostic::error(
            "water definitions",
            "no water definition is enabled",
        ));
    }
    for d in defs.iter().filter(|d| d.enabled) {
        let subject = format!("water {}cm {}", d.slump, d.placement);
        if !d.water_l.is_finite() || d.water_l <= 0.0 {
            out.push(Diagnostic::error(
                subject,
                format!("water amount must be positive, got {}", d.water_l),
            ));
        } else if !(WATER_TYPICAL_MIN_L..=WATER_TYPICAL_MAX_L).contains(&d.water_l) {
            out.push(Diagnostic::warning(
                subject,
                format!(
                    "{} L/m³ is outside the typical {WATER_TYPICAL_MIN_L}-{WATER_TYPICAL_MAX_L} L/m³ range",
                    d.water_l
                ),
            ));
        }
    }
    out
}

/// Blend percentages that do not add up to 100. Blends are used as given.
pub fn diagnose_blends(blends: &AggregateBlends) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for (placement, blend) in [
        (Placement::Direct, &blends.direct),
        (Placement::Pumped, &blends.pumped),
    ] {
        for (group, shares) in [("sand", &blend.sands), ("gravel", &blend.gravels)] {
            if shares.is_empty() {
                continue;
            }
            let total: f64 = shares.iter().map(|s| s.percent).sum();
            if (total - 100.0).abs() > PERCENT_TOLERANCE {
                out.push(Diagnostic::warning(
                    format!("{placement} {group} blend"),
                    format!("percentages sum to {total:.2}, expected 100"),
                ));
            }
        }
    }
    out
}
