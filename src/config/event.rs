//! Event configuration structures

use crate::property::Effect;
use serde::{Deserialize, Serialize};

/// Event configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub id: i32,
    #[serde(alias = "event")]
    pub description: String,
    #[serde(default)]
    pub grade: i32,
    /// Exact age; takes precedence over `min_age`/`max_age`
    pub age: Option<i32>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    #[serde(alias = "include")]
    pub condition: Option<String>,
    pub exclude: Option<String>,
    pub effect: Option<EventEffect>,
    #[serde(alias = "postEvent")]
    pub post_event: Option<String>,
    #[serde(default)]
    pub branch: Vec<EventBranch>,
    /// At most one event of a group fires per age
    pub group: Option<String>,
    /// Probability of firing once every other check passed
    #[serde(default = "default_chance")]
    pub chance: f64,
    #[serde(default)]
    pub ends_life: bool,
    #[serde(default)]
    pub repeatable: bool,
    /// Only reachable as a branch follow-up
    #[serde(default, alias = "NoRandom")]
    pub no_random: bool,
}

fn default_chance() -> f64 {
    1.0
}

/// Event effect on properties
pub type EventEffect = Effect;

/// Event branch for conditional follow-ups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventBranch {
    pub condition: String,
    #[serde(alias = "eventId")]
    pub event_id: i32,
}

impl EventConfig {
    /// Inclusive age window
    pub fn window(&self) -> (i32, i32) {
        match self.age {
            Some(age) => (age, age),
            None => (
                self.min_age.unwrap_or(0),
                self.max_age.unwrap_or(i32::MAX),
            ),
        }
    }

    #[inline]
    pub fn covers(&self, age: i32) -> bool {
        let (min, max) = self.window();
        (min..=max).contains(&age)
    }
}
