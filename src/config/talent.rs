//! Talent configuration structures

use crate::property::Effect;
use serde::{Deserialize, Serialize};

/// Talent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentConfig {
    pub id: i32,
    pub name: String,
    pub description: String,
    /// Rarity tier, 0 (common) to 3 (legendary)
    #[serde(default)]
    pub grade: i32,
    /// How often the talent may fire in one life; 0 makes it passive
    #[serde(default = "default_max_triggers")]
    pub max_triggers: i32,
    /// Trigger condition; without one the talent fires at birth
    pub condition: Option<String>,
    pub effect: Option<TalentEffect>,
    /// Talents that cannot be held together with this one
    #[serde(default)]
    pub exclude: Vec<i32>,
    /// Points added to the attribute budget when selected
    #[serde(default)]
    pub budget_bonus: i32,
    /// Hidden from draws until carried forward from a previous life
    #[serde(default)]
    pub locked: bool,
}

fn default_max_triggers() -> i32 {
    1
}

/// Talent effect on properties
pub type TalentEffect = Effect;
