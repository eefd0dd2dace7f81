//! Threshold tables mapping summary values to grades and texts

use crate::config::JudgeLevel;
use crate::error::{LifeRestartError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Values judged at the end of a life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SummaryKind {
    #[serde(rename = "CHR")]
    Chr,
    #[serde(rename = "INT")]
    Int,
    #[serde(rename = "STR")]
    Str,
    #[serde(rename = "MNY")]
    Mny,
    #[serde(rename = "SPR")]
    Spr,
    #[serde(rename = "AGE")]
    Age,
    #[serde(rename = "SUM")]
    Sum,
}

impl SummaryKind {
    /// Judgment order of a summary
    pub const ALL: [SummaryKind; 7] = [
        SummaryKind::Chr,
        SummaryKind::Int,
        SummaryKind::Str,
        SummaryKind::Mny,
        SummaryKind::Spr,
        SummaryKind::Age,
        SummaryKind::Sum,
    ];

    pub fn code(self) -> &'static str {
        match self {
            SummaryKind::Chr => "CHR",
            SummaryKind::Int => "INT",
            SummaryKind::Str => "STR",
            SummaryKind::Mny => "MNY",
            SummaryKind::Spr => "SPR",
            SummaryKind::Age => "AGE",
            SummaryKind::Sum => "SUM",
        }
    }
}

impl fmt::Display for SummaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One judgment of a summary value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyJudge {
    pub kind: SummaryKind,
    pub value: i32,
    pub grade: i32,
    pub text: String,
    /// grade / highest grade of the table, for progress bars
    pub progress: f64,
}

/// Judge levels per summary kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgeTable {
    levels: BTreeMap<SummaryKind, Vec<JudgeLevel>>,
}

impl JudgeTable {
    pub fn new(levels: BTreeMap<SummaryKind, Vec<JudgeLevel>>) -> Self {
        Self { levels }
    }

    /// Every kind needs at least one level
    pub fn validate(&self) -> Result<()> {
        match SummaryKind::ALL
            .iter()
            .find(|kind| self.levels.get(*kind).map_or(true, Vec::is_empty))
        {
            Some(kind) => Err(LifeRestartError::DeserializationError(format!(
                "judge table has no levels for {}",
                kind
            ))),
            None => Ok(()),
        }
    }

    pub fn levels(&self, kind: SummaryKind) -> &[JudgeLevel] {
        self.levels.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Level with the highest threshold not above `value`; values below every
    /// threshold get the lowest level
    pub fn judge(&self, kind: SummaryKind, value: i32) -> Option<PropertyJudge> {
        let levels = self.levels(kind);

        let level = levels
            .iter()
            .filter(|level| value >= level.min)
            .max_by_key(|level| level.min)
            .or_else(|| levels.iter().min_by_key(|level| level.min))?;

        let max_grade = levels.iter().map(|l| l.grade).max().unwrap_or(0);
        let progress = if max_grade > 0 {
            (level.grade as f64 / max_grade as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(PropertyJudge {
            kind,
            value,
            grade: level.grade,
            text: level.text.clone(),
            progress,
        })
    }
}
