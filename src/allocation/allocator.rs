//! Starting attribute budget and distribution

use crate::config::EngineConfig;
use crate::error::{AllocationIssue, LifeRestartError, Result};
use crate::property::{Attribute, AttributeSet};
use crate::talent::TalentCatalog;
use rand::Rng;
use smallvec::SmallVec;

/// Validates and generates starting attribute distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocator {
    base_budget: i32,
    min: i32,
    max: i32,
    initial_spr: i32,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl Allocator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            base_budget: config.base_budget,
            min: config.attribute_min,
            max: config.attribute_max,
            initial_spr: config.initial_spr,
        }
    }

    /// Points available for the selected talents, never negative
    pub fn budget(&self, catalog: &TalentCatalog, selected: &[i32]) -> i32 {
        (self.base_budget + catalog.allocation_bonus(selected)).max(0)
    }

    /// Check a player's distribution. Valid input comes back unchanged.
    pub fn normalize(&self, raw: AttributeSet, budget: i32) -> Result<AttributeSet> {
        for attribute in Attribute::ALLOCATABLE {
            let value = raw.get(attribute);
            if !(self.min..=self.max).contains(&value) {
                return Err(LifeRestartError::InvalidAllocation(
                    AllocationIssue::OutOfRange {
                        attribute,
                        value,
                        min: self.min,
                        max: self.max,
                    },
                ));
            }
        }

        let total = raw.allocated_total();
        if total > budget {
            return Err(LifeRestartError::InvalidAllocation(
                AllocationIssue::BudgetExceeded { total, budget },
            ));
        }

        Ok(raw)
    }

    /// Spread the budget over the allocatable attributes at random.
    ///
    /// A random chunk is repeatedly moved into a random attribute that can
    /// still take it; when none can, the chunk shrinks to the largest
    /// remaining room. Every round moves at least one point. The per-field
    /// minimum counts against the budget, so the result uses
    /// `min(budget, 4 * max)` points whenever the budget covers the minimums.
    /// SPR starts at its fixed initial value.
    pub fn random_allocate<R: Rng + ?Sized>(&self, budget: i32, rng: &mut R) -> AttributeSet {
        let mut attributes = AttributeSet::default();
        for attribute in Attribute::ALLOCATABLE {
            *attributes.get_mut(attribute) = self.min;
        }
        attributes.spr = self.initial_spr;

        let capacity = (self.max - self.min).max(0);
        let fields = Attribute::ALLOCATABLE.len() as i32;
        let mut remaining = (budget - self.min * fields).max(0).min(capacity * fields);

        while remaining > 0 {
            let mut chunk = rng.gen_range(1..=remaining.min(capacity));

            let mut open: SmallVec<[Attribute; 4]> = Attribute::ALLOCATABLE
                .iter()
                .copied()
                .filter(|a| self.max - attributes.get(*a) >= chunk)
                .collect();

            if open.is_empty() {
                let (widest, room) = Attribute::ALLOCATABLE
                    .iter()
                    .map(|a| (*a, self.max - attributes.get(*a)))
                    .max_by_key(|(_, room)| *room)
                    .unwrap_or((Attribute::Chr, 0));
                if room <= 0 {
                    break;
                }
                chunk = room;
                open.push(widest);
            }

            let target = open[rng.gen_range(0..open.len())];
            *attributes.get_mut(target) += chunk;
            remaining -= chunk;
        }

        attributes
    }
}
