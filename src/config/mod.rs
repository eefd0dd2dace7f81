//! Configuration module: static game data and engine settings
//!
//! Talents, events and judge tables are plain JSON documents deserialized with
//! serde into a validated, immutable [`GameData`]. The reference data set ships
//! inside the crate and is parsed once per process by [`GameData::builtin`].

mod event;
mod judge;
mod settings;
mod talent;

pub use event::*;
pub use judge::*;
pub use settings::*;
pub use talent::*;

use crate::condition::ConditionCache;
use crate::error::{LifeRestartError, Result};
use crate::event::EventTable;
use crate::summary::JudgeTable;
use crate::talent::TalentCatalog;
use once_cell::sync::OnceCell;
use std::sync::Arc;

const TALENTS_JSON: &str = include_str!("../../data/talents.json");
const EVENTS_JSON: &str = include_str!("../../data/events.json");
const JUDGE_JSON: &str = include_str!("../../data/judge.json");

/// Reference data set, parsed on first use
static BUILTIN: OnceCell<Arc<GameData>> = OnceCell::new();

/// Immutable game data shared by every engine built on it
#[derive(Debug)]
pub struct GameData {
    pub talents: TalentCatalog,
    pub events: EventTable,
    pub judge: JudgeTable,
    /// Parsed trigger conditions, warmed up during validation
    pub conditions: ConditionCache,
}

impl GameData {
    /// Build and validate a data set
    pub fn new(
        talents: Vec<TalentConfig>,
        events: Vec<EventConfig>,
        judge: JudgeTable,
    ) -> Result<Self> {
        let data = Self {
            talents: TalentCatalog::new(talents)?,
            events: EventTable::new(events)?,
            judge,
            conditions: ConditionCache::new(),
        };
        data.judge.validate()?;
        data.warm_conditions()?;
        tracing::debug!(
            "Loaded game data: {} talents, {} events, {} cached conditions",
            data.talents.len(),
            data.events.len(),
            data.conditions.len()
        );
        Ok(data)
    }

    /// Deserialize the three JSON documents
    pub fn from_json(talents: &str, events: &str, judge: &str) -> Result<Self> {
        let talents: Vec<TalentConfig> = serde_json::from_str(talents)
            .map_err(|e| LifeRestartError::DeserializationError(format!("talents: {}", e)))?;
        let events: Vec<EventConfig> = serde_json::from_str(events)
            .map_err(|e| LifeRestartError::DeserializationError(format!("events: {}", e)))?;
        let judge: JudgeTable = serde_json::from_str(judge)
            .map_err(|e| LifeRestartError::DeserializationError(format!("judge: {}", e)))?;
        Self::new(talents, events, judge)
    }

    /// The data set bundled with the crate
    pub fn builtin() -> Result<Arc<GameData>> {
        BUILTIN
            .get_or_try_init(|| {
                GameData::from_json(TALENTS_JSON, EVENTS_JSON, JUDGE_JSON).map(Arc::new)
            })
            .cloned()
    }

    /// Parse every condition up front so bad data fails at load time
    fn warm_conditions(&self) -> Result<()> {
        let talent_conditions = self.talents.all().iter().filter_map(|t| t.condition.as_deref());
        let event_conditions = self.events.all().iter().flat_map(|e| {
            e.condition
                .as_deref()
                .into_iter()
                .chain(e.exclude.as_deref())
                .chain(e.branch.iter().map(|b| b.condition.as_str()))
        });

        for condition in talent_conditions.chain(event_conditions) {
            if !condition.trim().is_empty() {
                self.conditions.get_or_parse(condition)?;
            }
        }
        Ok(())
    }
}
