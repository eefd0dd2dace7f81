//! Static registry of age-windowed events

use crate::config::EventConfig;
use crate::error::{LifeRestartError, Result};
use ahash::AHashMap;

/// Every event, in declaration order, with an id index
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: Vec<EventConfig>,
    index: AHashMap<i32, usize>,
}

impl EventTable {
    /// Build a table, rejecting duplicate ids, dangling branch targets and
    /// chances outside 0..=1
    pub fn new(events: Vec<EventConfig>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(events.len());
        for (i, event) in events.iter().enumerate() {
            if index.insert(event.id, i).is_some() {
                return Err(LifeRestartError::DeserializationError(format!(
                    "duplicate event id {}",
                    event.id
                )));
            }
        }

        for event in &events {
            if !(0.0..=1.0).contains(&event.chance) {
                return Err(LifeRestartError::DeserializationError(format!(
                    "event {} has chance {} outside 0..=1",
                    event.id, event.chance
                )));
            }
            if let Some(branch) = event.branch.iter().find(|b| !index.contains_key(&b.event_id)) {
                return Err(LifeRestartError::DeserializationError(format!(
                    "event {} branches to unknown event {}",
                    event.id, branch.event_id
                )));
            }
        }

        Ok(Self { events, index })
    }

    #[inline]
    pub fn get(&self, id: i32) -> Option<&EventConfig> {
        self.index.get(&id).map(|&i| &self.events[i])
    }

    pub fn all(&self) -> &[EventConfig] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events whose window contains `age`, in declaration order
    pub fn events_for_age(&self, age: i32) -> impl Iterator<Item = &EventConfig> + '_ {
        self.events.iter().filter(move |e| e.covers(age))
    }
}
