//! Talent trigger processing

use super::TalentCatalog;
use crate::condition::ConditionCache;
use crate::config::TalentEffect;
use crate::property::PropertyState;
use ahash::AHashMap;
use rand::Rng;

/// Result of a talent trigger
#[derive(Debug, Clone, PartialEq)]
pub struct TalentTriggerResult {
    pub talent_id: i32,
    pub name: String,
    pub description: String,
    pub grade: i32,
    pub effect: Option<TalentEffect>,
}

/// Fire one selected talent if its condition holds and its trigger budget is
/// not used up. The effect lands on `state` immediately.
pub fn try_trigger<R: Rng + ?Sized>(
    talent_id: i32,
    state: &mut PropertyState,
    catalog: &TalentCatalog,
    conditions: &ConditionCache,
    trigger_counts: &mut AHashMap<i32, i32>,
    rng: &mut R,
) -> Option<TalentTriggerResult> {
    let talent = catalog.get(talent_id)?;

    let count = trigger_counts.get(&talent_id).copied().unwrap_or(0);
    if count >= talent.max_triggers {
        return None;
    }

    if let Some(ref condition) = talent.condition {
        if !conditions.holds(condition, state) {
            return None;
        }
    }

    *trigger_counts.entry(talent_id).or_insert(0) += 1;
    if let Some(ref effect) = talent.effect {
        state.apply_effect(effect, rng);
    }
    tracing::trace!("Talent {} fired at age {}", talent_id, state.age);

    Some(TalentTriggerResult {
        talent_id,
        name: talent.name.clone(),
        description: talent.description.clone(),
        grade: talent.grade,
        effect: talent.effect.clone(),
    })
}

/// Try every selected talent in selection order, so later talents see the
/// effects of earlier ones. Stops right after a fired talent leaves `state`
/// matching `halt`.
pub fn process_talents<R, F>(
    state: &mut PropertyState,
    catalog: &TalentCatalog,
    conditions: &ConditionCache,
    trigger_counts: &mut AHashMap<i32, i32>,
    rng: &mut R,
    halt: F,
) -> Vec<TalentTriggerResult>
where
    R: Rng + ?Sized,
    F: Fn(&PropertyState) -> bool,
{
    let mut results = Vec::new();
    for i in 0..state.tlt.len() {
        let talent_id = state.tlt[i];
        if let Some(result) = try_trigger(talent_id, state, catalog, conditions, trigger_counts, rng) {
            results.push(result);
            if halt(state) {
                break;
            }
        }
    }
    results
}
