//! Talent catalog: lookup, conflicts, budget bonuses and the talent draw

use crate::config::TalentConfig;
use crate::error::{LifeRestartError, Result};
use crate::event::selector::weighted_random;
use ahash::AHashMap;
use rand::Rng;
use smallvec::SmallVec;
use std::collections::{BTreeMap, BTreeSet};

/// Static registry of every talent, in declaration order
#[derive(Debug, Clone, Default)]
pub struct TalentCatalog {
    talents: Vec<TalentConfig>,
    index: AHashMap<i32, usize>,
}

impl TalentCatalog {
    /// Build a catalog, rejecting duplicate ids and dangling exclusions
    pub fn new(talents: Vec<TalentConfig>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(talents.len());
        for (i, talent) in talents.iter().enumerate() {
            if index.insert(talent.id, i).is_some() {
                return Err(LifeRestartError::DeserializationError(format!(
                    "duplicate talent id {}",
                    talent.id
                )));
            }
        }
        for talent in &talents {
            if let Some(missing) = talent.exclude.iter().find(|id| !index.contains_key(id)) {
                return Err(LifeRestartError::DeserializationError(format!(
                    "talent {} excludes unknown talent {}",
                    talent.id, missing
                )));
            }
        }
        Ok(Self { talents, index })
    }

    #[inline]
    pub fn get(&self, id: i32) -> Option<&TalentConfig> {
        self.index.get(&id).map(|&i| &self.talents[i])
    }

    pub fn contains(&self, id: i32) -> bool {
        self.index.contains_key(&id)
    }

    /// Every talent, including locked ones
    pub fn all(&self) -> &[TalentConfig] {
        &self.talents
    }

    pub fn len(&self) -> usize {
        self.talents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.talents.is_empty()
    }

    /// Talents eligible for the random draw: unlocked by default, or unlocked
    /// by a previous life
    pub fn unlocked_for_draw<'a, 'b>(
        &'a self,
        unlocked: &'b BTreeSet<i32>,
    ) -> impl Iterator<Item = &'a TalentConfig> + 'b
    where
        'a: 'b,
    {
        self.talents
            .iter()
            .filter(move |t| !t.locked || unlocked.contains(&t.id))
    }

    /// First talent in `selected` that conflicts with `candidate`, checking the
    /// exclusion lists of both sides
    pub fn exclusive(&self, selected: &[i32], candidate: i32) -> Option<i32> {
        let candidate_talent = self.get(candidate);

        for &talent_id in selected {
            if talent_id == candidate {
                continue;
            }
            if let Some(c) = candidate_talent {
                if c.exclude.contains(&talent_id) {
                    return Some(talent_id);
                }
            }
            if let Some(talent) = self.get(talent_id) {
                if talent.exclude.contains(&candidate) {
                    return Some(talent_id);
                }
            }
        }

        None
    }

    /// Sum of budget bonuses over the selected talents, each id counted once
    pub fn allocation_bonus(&self, selected: &[i32]) -> i32 {
        let mut seen: SmallVec<[i32; 8]> = SmallVec::new();
        let mut bonus = 0;
        for &id in selected {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            if let Some(talent) = self.get(id) {
                bonus += talent.budget_bonus;
            }
        }
        bonus
    }

    /// Draw up to `count` distinct talents.
    ///
    /// A grade is picked first, weighted by `grade_weight` among the grades
    /// that still have candidates, then one talent of that grade is taken out
    /// of the pool uniformly. A drawable `include` takes the first slot.
    pub fn draw<R, F>(
        &self,
        count: usize,
        unlocked: &BTreeSet<i32>,
        include: Option<i32>,
        grade_weight: F,
        rng: &mut R,
    ) -> Vec<&TalentConfig>
    where
        R: Rng + ?Sized,
        F: Fn(i32) -> f64,
    {
        let mut drawn = Vec::with_capacity(count);
        if count == 0 {
            return drawn;
        }

        let mut pool: BTreeMap<i32, Vec<&TalentConfig>> = BTreeMap::new();
        let mut included = None;
        for talent in self.unlocked_for_draw(unlocked) {
            if include == Some(talent.id) {
                included = Some(talent);
                continue;
            }
            pool.entry(talent.grade).or_default().push(talent);
        }

        if let Some(talent) = included {
            drawn.push(talent);
        }

        while drawn.len() < count {
            let grades: SmallVec<[(i32, f64); 4]> = pool
                .iter()
                .filter(|(_, bucket)| !bucket.is_empty())
                .map(|(grade, _)| (*grade, grade_weight(*grade)))
                .collect();
            if grades.is_empty() {
                break;
            }

            let grade = weighted_random(&grades, rng).unwrap_or(grades[0].0);
            let Some(bucket) = pool.get_mut(&grade) else {
                break;
            };
            let pick = rng.gen_range(0..bucket.len());
            drawn.push(bucket.remove(pick));
        }

        drawn
    }
}
