//! The legacy value carried between lives

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a player keeps across restarts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legacy {
    /// Completed and acknowledged lives
    #[serde(default)]
    pub times: u32,
    /// Talents permanently unlocked for future draws
    #[serde(default)]
    pub unlocked: BTreeSet<i32>,
    /// Talent guaranteed a slot in the next draw
    #[serde(default)]
    pub extended: Option<i32>,
}

impl Legacy {
    /// Acknowledge a finished life, carrying `talent` forward when given
    pub fn extend(&mut self, talent: Option<i32>) {
        self.times += 1;
        if let Some(id) = talent {
            self.unlocked.insert(id);
        }
        self.extended = talent;
    }

    pub fn is_unlocked(&self, talent_id: i32) -> bool {
        self.unlocked.contains(&talent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend() {
        let mut legacy = Legacy::default();
        legacy.extend(Some(1004));
        assert_eq!(legacy.times, 1);
        assert!(legacy.is_unlocked(1004));
        assert_eq!(legacy.extended, Some(1004));

        // Declining to extend keeps the unlock but clears the carry-over
        legacy.extend(None);
        assert_eq!(legacy.times, 2);
        assert!(legacy.is_unlocked(1004));
        assert_eq!(legacy.extended, None);
    }

    #[test]
    fn test_partial_json() {
        let legacy: Legacy = serde_json::from_str(r#"{"times": 3}"#).unwrap();
        assert_eq!(legacy.times, 3);
        assert!(legacy.unlocked.is_empty());
        assert!(legacy.extended.is_none());
    }
}
