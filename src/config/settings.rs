//! Engine tuning knobs

use crate::error::{LifeRestartError, Result};
use serde::{Deserialize, Serialize};

/// Engine configuration. Every field has the reference default, so a partial
/// JSON document only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attribute points available before talent bonuses
    pub base_budget: i32,
    /// Lower bound of each allocatable attribute at allocation time
    pub attribute_min: i32,
    /// Upper bound of each allocatable attribute at allocation time
    pub attribute_max: i32,
    /// SPR at birth; not allocatable
    pub initial_spr: i32,
    /// Talents offered per draw
    pub draw_count: usize,
    /// Talents a player must pick before starting
    pub selection_limit: usize,
    /// A life ends at the latest when it reaches this age
    pub max_age: i32,
    /// Draw weight per talent grade, index = grade
    pub draw_weights: Vec<f64>,
    /// Longest chain of branch follow-ups resolved in one year
    pub max_branch_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_budget: 10_000,
            attribute_min: 0,
            attribute_max: 2_500,
            initial_spr: 5,
            draw_count: 10,
            selection_limit: 3,
            max_age: 110,
            // Per mille, from the original talent gacha
            draw_weights: vec![889.0, 100.0, 10.0, 1.0],
            max_branch_depth: 16,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the allocator and the draw cannot honor
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(LifeRestartError::DeserializationError(msg));

        if self.attribute_min < 0 || self.attribute_min > self.attribute_max {
            return invalid(format!(
                "attribute range {}..={} is empty or negative",
                self.attribute_min, self.attribute_max
            ));
        }
        let floors = self.attribute_min.saturating_mul(4);
        if self.base_budget < floors {
            return invalid(format!(
                "base budget {} cannot cover the attribute minimum of {} points",
                self.base_budget, floors
            ));
        }
        if self.max_age < 1 {
            return invalid(format!("max_age must be positive, got {}", self.max_age));
        }
        if self.selection_limit == 0 {
            return invalid("selection_limit must be at least 1".to_string());
        }
        if self.draw_weights.is_empty()
            || self.draw_weights.iter().any(|w| !w.is_finite() || *w < 0.0)
        {
            return invalid(format!("draw weights {:?} are not usable", self.draw_weights));
        }
        Ok(())
    }

    /// Draw weight for a grade; grades past the table reuse its last entry
    pub fn grade_weight(&self, grade: i32) -> f64 {
        let index = usize::try_from(grade).unwrap_or(0);
        self.draw_weights
            .get(index)
            .or_else(|| self.draw_weights.last())
            .copied()
            .unwrap_or(1.0)
    }
}
