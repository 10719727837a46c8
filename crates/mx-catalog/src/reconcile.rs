//! Reconciliation of generated recipes against the catalog.
//!
//! A pass issues exactly three bulk reads (recipes, masters, code existence) and
//! produces an immutable [`SavePlan`]. Default decision per recipe:
//!
//! 1. its long code already names a recipe in scope → `UpdateVariant`
//! 2. a master in scope matches its specification → `CreateVariant` under the master
//!    with the most matching variants (ties: master code, then id)
//! 3. otherwise → `NewMaster` with the long code minus its last two segments
//!
//! Create-type decisions whose final code is taken, or shared with a sibling, stay
//! blocked until the caller supplies another code. Codes are never disambiguated
//! automatically.

use crate::codes::{NamingConfig, generate_codes, master_code};
use crate::error::{PlanError, PlanResult, ReconcileError};
use crate::port::{CatalogReader, CatalogScope, ExistingMasterRecord, ExistingRecipeRecord};
use crate::spec_match::SpecKey;
use mx_mix::GeneratedRecipe;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SaveAction {
    UpdateVariant { recipe_id: String },
    CreateVariant { master_id: String },
    NewMaster { master_code: String },
}

impl SaveAction {
    pub fn is_create(&self) -> bool {
        !matches!(self, Self::UpdateVariant { .. })
    }
}

/// Why a create-type decision cannot be finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Collision {
    /// The final code is already registered.
    ExistingCode,
    /// Other candidates in the batch carry the same final code.
    SiblingCode { with: Vec<String> },
    /// The new master's code is already registered.
    ExistingMasterCode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveDecision {
    /// Working code of the generated recipe.
    pub recipe_code: String,
    pub long_code: String,
    pub short_code: String,
    pub action: SaveAction,
    /// Code to persist; the long code unless overridden.
    pub final_code: String,
    pub collision: Option<Collision>,
}

impl SaveDecision {
    pub fn is_blocked(&self) -> bool {
        self.collision.is_some()
    }
}

/// One entry of the save contract handed to the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub recipe_code: String,
    pub final_code: String,
    pub short_code: String,
    pub action: SaveAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalized {
    /// Unblocked decisions, in batch order. Apply all or nothing.
    pub requests: Vec<SaveRequest>,
    /// Recipe codes still waiting for a distinct code.
    pub blocked: Vec<String>,
}

/// Immutable set of decisions for one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavePlan {
    scope: CatalogScope,
    decisions: Vec<SaveDecision>,
    /// Codes known to be registered in scope.
    #[serde(skip)]
    taken: BTreeSet<String>,
}

/// Build the default plan for `recipes`.
///
/// Any failing catalog read aborts the whole pass.
pub fn reconcile<C>(
    recipes: &[GeneratedRecipe],
    naming: &NamingConfig,
    catalog: &C,
    scope: &CatalogScope,
) -> Result<SavePlan, ReconcileError>
where
    C: CatalogReader + ?Sized,
{
    let mut seen = HashSet::new();
    if let Some(dup) = recipes.iter().find(|r| !seen.insert(r.code.as_str())) {
        return Err(ReconcileError::DuplicateRecipe {
            code: dup.code.clone(),
        });
    }

    let existing_recipes = catalog.fetch_recipes(scope)?;
    let existing_masters = catalog.fetch_masters(scope)?;
    debug!(
        plant = %scope.plant_id,
        recipes = existing_recipes.len(),
        masters = existing_masters.len(),
        "catalog snapshot fetched"
    );

    let recipe_keys: Vec<SpecKey> = existing_recipes.iter().map(SpecKey::from).collect();
    let master_keys: Vec<SpecKey> = existing_masters.iter().map(SpecKey::from).collect();
    let by_code: BTreeMap<&str, &ExistingRecipeRecord> = existing_recipes
        .iter()
        .map(|r| (r.code.as_str(), r))
        .collect();

    let decisions: Vec<SaveDecision> = recipes
        .iter()
        .map(|recipe| {
            let codes = generate_codes(recipe, naming);
            let action = match by_code.get(codes.long_code.as_str()) {
                Some(existing) => SaveAction::UpdateVariant {
                    recipe_id: existing.id.clone(),
                },
                None => match best_master(
                    recipe,
                    &existing_masters,
                    &master_keys,
                    &existing_recipes,
                    &recipe_keys,
                ) {
                    Some(master) => SaveAction::CreateVariant {
                        master_id: master.id.clone(),
                    },
                    None => SaveAction::NewMaster {
                        master_code: master_code(&codes.long_code),
                    },
                },
            };
            SaveDecision {
                recipe_code: recipe.code.clone(),
                final_code: codes.long_code.clone(),
                long_code: codes.long_code,
                short_code: codes.short_code,
                action,
                collision: None,
            }
        })
        .collect();

    let intended = intended_codes(decisions.iter());
    let mut taken: BTreeSet<String> = catalog.existing_codes(scope, &intended)?.into_iter().collect();
    taken.extend(existing_recipes.iter().map(|r| r.code.clone()));
    taken.extend(existing_masters.iter().map(|m| m.code.clone()));

    let plan = SavePlan {
        scope: scope.clone(),
        decisions: assess(decisions, &taken),
        taken,
    };
    info!(
        plant = %scope.plant_id,
        decisions = plan.decisions.len(),
        blocked = plan.blocked_count(),
        "reconciliation planned"
    );
    Ok(plan)
}

fn best_master<'a>(
    recipe: &GeneratedRecipe,
    masters: &'a [ExistingMasterRecord],
    master_keys: &[SpecKey],
    recipes: &[ExistingRecipeRecord],
    recipe_keys: &[SpecKey],
) -> Option<&'a ExistingMasterRecord> {
    let matching_variants: Vec<&ExistingRecipeRecord> = recipes
        .iter()
        .zip(recipe_keys)
        .filter(|(_, key)| key.matches(recipe))
        .map(|(r, _)| r)
        .collect();

    masters
        .iter()
        .zip(master_keys)
        .filter(|(_, key)| key.matches(recipe))
        .map(|(m, _)| {
            let count = matching_variants
                .iter()
                .filter(|r| r.master_id.as_deref() == Some(m.id.as_str()))
                .count();
            (count, m)
        })
        .min_by(|(ca, a), (cb, b)| {
            cb.cmp(ca)
                .then_with(|| a.code.cmp(&b.code))
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|(_, m)| m)
}

/// Final codes of create-type decisions plus new master codes, deduplicated.
fn intended_codes<'a>(decisions: impl Iterator<Item = &'a SaveDecision>) -> Vec<String> {
    let mut codes = BTreeSet::new();
    for d in decisions.filter(|d| d.action.is_create()) {
        codes.insert(d.final_code.clone());
        if let SaveAction::NewMaster { master_code } = &d.action {
            codes.insert(master_code.clone());
        }
    }
    codes.into_iter().collect()
}

/// Recompute collisions for every decision against `taken` and each other.
fn assess(mut decisions: Vec<SaveDecision>, taken: &BTreeSet<String>) -> Vec<SaveDecision> {
    let mut by_final: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for d in decisions.iter().filter(|d| d.action.is_create()) {
        by_final
            .entry(d.final_code.clone())
            .or_default()
            .push(d.recipe_code.clone());
    }

    for d in &mut decisions {
        d.collision = match &d.action {
            SaveAction::UpdateVariant { .. } => None,
            _ if taken.contains(&d.final_code) => Some(Collision::ExistingCode),
            action => {
                let siblings: Vec<String> = by_final
                    .get(&d.final_code)
                    .into_iter()
                    .flatten()
                    .filter(|code| **code != d.recipe_code)
                    .cloned()
                    .collect();
                if !siblings.is_empty() {
                    Some(Collision::SiblingCode { with: siblings })
                } else if matches!(action, SaveAction::NewMaster { master_code } if taken.contains(master_code))
                {
                    Some(Collision::ExistingMasterCode)
                } else {
                    None
                }
            }
        };
    }
    decisions
}

impl SavePlan {
    pub fn scope(&self) -> &CatalogScope {
        &self.scope
    }

    pub fn decisions(&self) -> &[SaveDecision] {
        &self.decisions
    }

    pub fn decision(&self, recipe_code: &str) -> Option<&SaveDecision> {
        self.decisions.iter().find(|d| d.recipe_code == recipe_code)
    }

    pub fn blocked_count(&self) -> usize {
        self.decisions.iter().filter(|d| d.is_blocked()).count()
    }

    /// New plan with the final codes in `overrides` (recipe code → code) applied.
    ///
    /// Issues one bulk existence check for the new codes. A `NewMaster` takes its
    /// master code from the overridden final code.
    pub fn with_overrides<C>(
        &self,
        overrides: &BTreeMap<String, String>,
        catalog: &C,
    ) -> PlanResult<SavePlan>
    where
        C: CatalogReader + ?Sized,
    {
        let mut decisions = self.decisions.clone();
        for (recipe_code, code) in overrides {
            let decision = decisions
                .iter_mut()
                .find(|d| &d.recipe_code == recipe_code)
                .ok_or_else(|| PlanError::UnknownRecipe {
                    code: recipe_code.clone(),
                })?;
            let code = code.trim();
            if code.is_empty() {
                return Err(PlanError::EmptyCode {
                    code: recipe_code.clone(),
                });
            }
            match &mut decision.action {
                SaveAction::UpdateVariant { .. } => {
                    return Err(PlanError::OverrideOnUpdate {
                        code: recipe_code.clone(),
                    });
                }
                SaveAction::NewMaster { master_code: mc } => *mc = master_code(code),
                SaveAction::CreateVariant { .. } => {}
            }
            decision.final_code = code.to_owned();
        }

        let overridden = intended_codes(
            decisions
                .iter()
                .filter(|d| overrides.contains_key(&d.recipe_code)),
        );
        let mut taken = self.taken.clone();
        taken.extend(catalog.existing_codes(&self.scope, &overridden)?);

        debug!(overrides = overrides.len(), "save plan overrides applied");
        Ok(SavePlan {
            scope: self.scope.clone(),
            decisions: assess(decisions, &taken),
            taken,
        })
    }

    /// Requests for every unblocked decision plus the blocked recipe codes.
    pub fn finalize(&self) -> Finalized {
        let (ready, blocked): (Vec<&SaveDecision>, Vec<&SaveDecision>) =
            self.decisions.iter().partition(|d| !d.is_blocked());
        Finalized {
            requests: ready
                .into_iter()
                .map(|d| SaveRequest {
                    recipe_code: d.recipe_code.clone(),
                    final_code: d.final_code.clone(),
                    short_code: d.short_code.clone(),
                    action: d.action.clone(),
                })
                .collect(),
            blocked: blocked.into_iter().map(|d| d.recipe_code.clone()).collect(),
        }
    }
}
