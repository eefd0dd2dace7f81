//! Event eligibility checks and weighted random selection

use crate::condition::ConditionCache;
use crate::config::EventConfig;
use crate::property::PropertyState;
use rand::Rng;

/// Why an event in the current age window does not fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Only reachable through a branch
    NoRandom,
    /// Already fired in this life and not repeatable
    AlreadyFired,
    /// Another event of its group fired this year
    GroupTaken,
    /// Exclude predicate holds
    Excluded,
    /// Include predicate fails
    ConditionFailed,
}

/// Deterministic eligibility of an event for random firing this year.
/// The chance roll is separate, see [`roll_chance`].
pub fn check_eligible(
    event: &EventConfig,
    state: &PropertyState,
    fired_groups: &[&str],
    conditions: &ConditionCache,
) -> Result<(), Skip> {
    if event.no_random {
        return Err(Skip::NoRandom);
    }
    if !event.repeatable && state.has_event(event.id) {
        return Err(Skip::AlreadyFired);
    }
    if let Some(ref group) = event.group {
        if fired_groups.contains(&group.as_str()) {
            return Err(Skip::GroupTaken);
        }
    }
    if let Some(ref exclude) = event.exclude {
        if conditions.holds(exclude, state) {
            return Err(Skip::Excluded);
        }
    }
    if let Some(ref include) = event.condition {
        if !conditions.holds(include, state) {
            return Err(Skip::ConditionFailed);
        }
    }
    Ok(())
}

/// Roll the event's chance. Certain events consume no randomness.
#[inline]
pub fn roll_chance<R: Rng + ?Sized>(event: &EventConfig, rng: &mut R) -> bool {
    if event.chance >= 1.0 {
        return true;
    }
    if event.chance <= 0.0 {
        return false;
    }
    rng.gen_bool(event.chance)
}

/// Perform weighted random selection
#[inline]
pub fn weighted_random<T: Copy, R: Rng + ?Sized>(items: &[(T, f64)], rng: &mut R) -> Option<T> {
    if items.is_empty() {
        return None;
    }

    let total_weight: f64 = items.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return None;
    }

    let mut random_value = rng.gen::<f64>() * total_weight;

    for (item, weight) in items {
        random_value -= weight;
        if random_value <= 0.0 {
            return Some(*item);
        }
    }

    // Fallback to last item
    items.last().map(|(item, _)| *item)
}
