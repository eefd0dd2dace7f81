//! Condition parsing cache
//!
//! Each [`GameData`](crate::config::GameData) owns one cache, so parsed
//! conditions are shared by every engine built on the same data set without
//! any process-wide state.

use crate::condition::ast::AstNode;
use crate::condition::{evaluator, parser};
use crate::error::Result;
use crate::property::PropertyState;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Memo of condition text to parsed AST, with fast hashing (ahash)
#[derive(Debug, Default)]
pub struct ConditionCache {
    inner: RwLock<AHashMap<String, Arc<AstNode>>>,
}

impl ConditionCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(AHashMap::with_capacity(256)),
        }
    }

    /// Get or parse a condition string
    #[inline]
    pub fn get_or_parse(&self, condition: &str) -> Result<Arc<AstNode>> {
        // Fast path: read lock only
        if let Some(ast) = self.inner.read().get(condition) {
            return Ok(Arc::clone(ast));
        }

        let ast = Arc::new(parser::parse(condition)?);
        self.inner
            .write()
            .insert(condition.to_string(), Arc::clone(&ast));
        Ok(ast)
    }

    /// Check a condition against a PropertyState. An empty condition always holds.
    #[inline]
    pub fn check(&self, condition: &str, state: &PropertyState) -> Result<bool> {
        if condition.trim().is_empty() {
            return Ok(true);
        }

        let ast = self.get_or_parse(condition)?;
        Ok(evaluator::check(&ast, state))
    }

    /// Like [`check`](Self::check), but a malformed condition counts as false
    pub fn holds(&self, condition: &str, state: &PropertyState) -> bool {
        match self.check(condition, state) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Treating unparseable condition {:?} as false: {}", condition, e);
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::AttributeSet;

    #[test]
    fn test_cache_hit() {
        let cache = ConditionCache::new();
        let state = PropertyState::new(AttributeSet::new(10, 0, 0, 0, 5), &[]);

        assert!(cache.check("CHR>5", &state).unwrap());
        assert_eq!(cache.len(), 1);

        assert!(cache.check("CHR>5", &state).unwrap());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_empty_condition() {
        let cache = ConditionCache::new();
        let state = PropertyState::default();
        assert!(cache.check("", &state).unwrap());
        assert!(cache.check("  ", &state).unwrap());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalid_condition_is_false() {
        let cache = ConditionCache::new();
        let state = PropertyState::default();
        assert!(cache.check("CHR>>", &state).is_err());
        assert!(!cache.holds("CHR>>", &state));
        assert!(cache.is_empty());
    }
}
