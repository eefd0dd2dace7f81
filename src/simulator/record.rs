//! Per-year history records

use crate::event::EventResult;
use crate::property::AttributeSet;
use crate::talent::TalentTriggerResult;
use serde::{Deserialize, Serialize};

/// What produced a content entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    #[serde(rename = "TLT")]
    Talent,
    #[serde(rename = "EVT")]
    Event,
}

/// One line of a year's narrative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearContent {
    pub kind: ContentKind,
    pub id: i32,
    pub description: String,
    pub grade: i32,
    /// Talent name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Event post text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_event: Option<String>,
}

impl From<TalentTriggerResult> for YearContent {
    fn from(result: TalentTriggerResult) -> Self {
        Self {
            kind: ContentKind::Talent,
            id: result.talent_id,
            description: result.description,
            grade: result.grade,
            name: Some(result.name),
            post_event: None,
        }
    }
}

impl From<EventResult> for YearContent {
    fn from(result: EventResult) -> Self {
        Self {
            kind: ContentKind::Event,
            id: result.event_id,
            description: result.description,
            grade: result.grade,
            name: None,
            post_event: result.post_event,
        }
    }
}

/// One year of a life: attributes after the year's effects and what happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeRecord {
    pub age: i32,
    pub attributes: AttributeSet,
    pub content: Vec<YearContent>,
    pub is_end: bool,
}
