//! Event processing logic

use crate::condition::ConditionCache;
use crate::config::{EventConfig, EventEffect};
use crate::property::PropertyState;
use rand::Rng;

/// Result of processing an event
#[derive(Debug, Clone, PartialEq)]
pub struct EventResult {
    pub event_id: i32,
    pub description: String,
    pub grade: i32,
    pub effect: Option<EventEffect>,
    /// Follow-up chosen by the first matching branch
    pub next_event_id: Option<i32>,
    /// Only set when no branch matched
    pub post_event: Option<String>,
    pub ends_life: bool,
}

/// Resolve an event against the state it fires in. Branches are checked
/// before the event's own effect lands.
pub fn process_event(
    event: &EventConfig,
    state: &PropertyState,
    conditions: &ConditionCache,
) -> EventResult {
    let next_event_id = event
        .branch
        .iter()
        .find(|branch| conditions.holds(&branch.condition, state))
        .map(|branch| branch.event_id);

    EventResult {
        event_id: event.id,
        description: event.description.clone(),
        grade: event.grade,
        effect: event.effect.clone(),
        next_event_id,
        post_event: match next_event_id {
            Some(_) => None,
            None => event.post_event.clone(),
        },
        ends_life: event.ends_life,
    }
}

/// Record the event as fired and apply its effect
pub fn apply_event<R: Rng + ?Sized>(state: &mut PropertyState, result: &EventResult, rng: &mut R) {
    state.record_event(result.event_id);
    if let Some(ref effect) = result.effect {
        state.apply_effect(effect, rng);
    }
    tracing::trace!("Event {} fired at age {}", result.event_id, state.age);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::AttributeSet;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn event(json: &str) -> EventConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_process_simple_event() {
        let config = event(
            r#"{"id": 1, "description": "Test event", "grade": 1, "postEvent": "Post text"}"#,
        );
        let state = PropertyState::default();
        let result = process_event(&config, &state, &ConditionCache::new());

        assert_eq!(result.event_id, 1);
        assert_eq!(result.description, "Test event");
        assert_eq!(result.grade, 1);
        assert!(result.next_event_id.is_none());
        assert_eq!(result.post_event, Some("Post text".to_string()));
        assert!(!result.ends_life);
    }

    #[test]
    fn test_process_event_with_branch() {
        let config = event(
            r#"{"id": 1, "description": "Test event", "postEvent": "unused",
                "branch": [{"condition": "CHR>50", "event_id": 3}, {"condition": "CHR>5", "event_id": 2}]}"#,
        );
        let state = PropertyState::new(AttributeSet::new(10, 0, 0, 0, 0), &[]);
        let result = process_event(&config, &state, &ConditionCache::new());

        // First matching branch wins
        assert_eq!(result.next_event_id, Some(2));
        assert!(result.post_event.is_none());
    }

    #[test]
    fn test_apply_event() {
        let config = event(r#"{"id": 4, "description": "x", "effect": {"STR": -3, "SPR": 1}}"#);
        let mut state = PropertyState::new(AttributeSet::new(0, 0, 5, 0, 5), &[]);
        let result = process_event(&config, &state, &ConditionCache::new());
        apply_event(&mut state, &result, &mut StdRng::seed_from_u64(1));

        assert!(state.has_event(4));
        assert_eq!(state.attributes.str_, 2);
        assert_eq!(state.attributes.spr, 6);
    }
}
