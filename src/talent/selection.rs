//! Caller-owned talent selection with the limit and conflicts enforced

use super::TalentCatalog;
use crate::config::EngineConfig;
use crate::error::{LifeRestartError, Result};
use serde::{Deserialize, Serialize};

/// Talents picked from a draw, in pick order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalentSelection {
    limit: usize,
    ids: Vec<i32>,
}

impl TalentSelection {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ids: Vec::with_capacity(limit),
        }
    }

    /// Empty selection sized by `selection_limit`
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.selection_limit)
    }

    /// Add a talent. Selecting an already selected id is a no-op.
    pub fn select(&mut self, catalog: &TalentCatalog, id: i32) -> Result<()> {
        if !catalog.contains(id) {
            return Err(LifeRestartError::TalentNotFound(id));
        }
        if self.ids.contains(&id) {
            return Ok(());
        }
        if let Some(selected) = catalog.exclusive(&self.ids, id) {
            return Err(LifeRestartError::TalentConflict {
                selected,
                candidate: id,
            });
        }
        if self.ids.len() >= self.limit {
            return Err(LifeRestartError::SelectionFull(self.limit));
        }
        self.ids.push(id);
        Ok(())
    }

    /// Remove a talent; returns whether it was selected
    pub fn deselect(&mut self, id: i32) -> bool {
        match self.ids.iter().position(|&x| x == id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Deselect when selected, select otherwise. Returns the new membership.
    pub fn toggle(&mut self, catalog: &TalentCatalog, id: i32) -> Result<bool> {
        if self.deselect(id) {
            return Ok(false);
        }
        self.select(catalog, id)?;
        Ok(true)
    }

    pub fn is_complete(&self) -> bool {
        self.ids.len() == self.limit
    }

    pub fn ids(&self) -> &[i32] {
        &self.ids
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
