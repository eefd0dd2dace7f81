//! Summary over a finished history

use super::{JudgeTable, PropertyJudge, SummaryKind};
use crate::error::{LifeRestartError, Result};
use crate::property::{Attribute, AttributeSet};
use crate::simulator::LifeRecord;
use serde::{Deserialize, Serialize};

/// Judgments of a life, in [`SummaryKind::ALL`] order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub judges: Vec<PropertyJudge>,
    /// The SUM score
    pub total: i32,
}

impl Summary {
    pub fn get(&self, kind: SummaryKind) -> Option<&PropertyJudge> {
        self.judges.iter().find(|j| j.kind == kind)
    }
}

/// Highest value each attribute reached over the history
pub fn attribute_maxima(records: &[LifeRecord]) -> AttributeSet {
    let mut maxima = AttributeSet::new(i32::MIN, i32::MIN, i32::MIN, i32::MIN, i32::MIN);
    for record in records {
        for attribute in Attribute::ALL {
            let max = maxima.get_mut(attribute);
            *max = (*max).max(record.attributes.get(attribute));
        }
    }
    maxima
}

/// `2 * (sum of attribute maxima) + age / 2`
pub fn total_score(maxima: &AttributeSet, age: i32) -> i32 {
    let sum: i64 = Attribute::ALL.iter().map(|a| maxima.get(*a) as i64).sum();
    let score = 2 * sum + (age / 2) as i64;
    score.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Judge a history. Fails with [`LifeRestartError::NoActiveRun`] when there
/// is nothing to judge.
pub fn summarize(records: &[LifeRecord], table: &JudgeTable) -> Result<Summary> {
    let last = records.last().ok_or(LifeRestartError::NoActiveRun)?;
    let maxima = attribute_maxima(records);
    let total = total_score(&maxima, last.age);

    let judges = SummaryKind::ALL
        .iter()
        .filter_map(|&kind| {
            let value = match kind {
                SummaryKind::Chr => maxima.chr,
                SummaryKind::Int => maxima.int,
                SummaryKind::Str => maxima.str_,
                SummaryKind::Mny => maxima.mny,
                SummaryKind::Spr => maxima.spr,
                SummaryKind::Age => last.age,
                SummaryKind::Sum => total,
            };
            table.judge(kind, value)
        })
        .collect();

    Ok(Summary { judges, total })
}
