//! Judge configuration structures for the end-of-life summary

use serde::{Deserialize, Serialize};

/// Judge level for property evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeLevel {
    /// Minimum value for this level
    pub min: i32,
    /// Grade/tier of this level
    pub grade: i32,
    /// Display text for this level
    pub text: String,
}
