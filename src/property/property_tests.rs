//! Property tests for the property module

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::property::{Attribute, AttributeSet, Effect, PropertyState};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

fn attribute_set_strategy() -> impl Strategy<Value = AttributeSet> {
    (
        0..=2500i32,
        0..=2500i32,
        0..=2500i32,
        0..=2500i32,
        0..=20i32,
    )
        .prop_map(|(chr, int, str_, mny, spr)| AttributeSet::new(chr, int, str_, mny, spr))
}

fn effect_strategy() -> impl Strategy<Value = Effect> {
    (
        -500..=500i32,
        -500..=500i32,
        -500..=500i32,
        -500..=500i32,
        -5..=5i32,
        -50..=50i32,
    )
        .prop_map(|(chr, int, str_, mny, spr, rdm)| Effect {
            chr,
            int,
            str_,
            mny,
            spr,
            rdm,
        })
}

fn total(set: &AttributeSet) -> i32 {
    Attribute::ALL.iter().map(|a| set.get(*a)).sum()
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// The sum of all attributes moves by exactly the sum of the effect deltas
    #[test]
    fn prop_effect_total_is_conserved(
        initial in attribute_set_strategy(),
        effects in prop::collection::vec(effect_strategy(), 1..=20),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state = PropertyState::new(initial, &[]);
        let mut expected = total(&initial);

        for effect in &effects {
            state.apply_effect(effect, &mut rng);
            expected += effect.chr + effect.int + effect.str_ + effect.mny + effect.spr + effect.rdm;
        }

        prop_assert_eq!(total(&state.attributes), expected);
    }

    /// Effects without RDM never consume randomness
    #[test]
    fn prop_fixed_effects_are_deterministic(
        initial in attribute_set_strategy(),
        effect in effect_strategy(),
        seed_a in any::<u64>(),
        seed_b in any::<u64>()
    ) {
        let effect = Effect { rdm: 0, ..effect };
        let mut a = PropertyState::new(initial, &[]);
        let mut b = PropertyState::new(initial, &[]);

        a.apply_effect(&effect, &mut StdRng::seed_from_u64(seed_a));
        b.apply_effect(&effect, &mut StdRng::seed_from_u64(seed_b));

        prop_assert_eq!(a.attributes, b.attributes);
    }

    /// The event list never holds duplicates
    #[test]
    fn prop_evt_no_duplicates(
        event_ids in prop::collection::vec(10001..=10100i32, 1..=50)
    ) {
        let mut state = PropertyState::default();

        for id in &event_ids {
            state.record_event(*id);
        }

        let mut seen = std::collections::HashSet::new();
        for id in &state.evt {
            prop_assert!(seen.insert(*id), "Duplicate event ID: {}", id);
        }
        for id in &event_ids {
            prop_assert!(state.has_event(*id));
        }
    }

    /// Talent ids handed to a new state are de-duplicated but keep their order
    #[test]
    fn prop_tlt_keeps_first_occurrence_order(
        talent_ids in prop::collection::vec(1001..=1020i32, 0..=12)
    ) {
        let state = PropertyState::new(AttributeSet::default(), &talent_ids);

        let mut expected = Vec::new();
        for id in &talent_ids {
            if !expected.contains(id) {
                expected.push(*id);
            }
        }
        prop_assert_eq!(state.tlt, expected);
    }
}
