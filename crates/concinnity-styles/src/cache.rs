//! Request-scoped style collection cache.

use std::collections::HashMap;

use crate::key::{CacheId, RuleKey, StyleError};

/// Outcome of recording a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    /// First time this key was seen.
    Inserted,
    /// Same key with identical text; nothing changed.
    Duplicate,
    /// Same key with different text. The first text is kept.
    Conflict,
}

/// Registry of every style rule a component tree emits during one render.
///
/// One instance belongs to exactly one render request. It is never shared
/// between requests: a cache that outlives its request would leak one
/// visitor's styles into another visitor's page.
#[derive(Debug)]
pub struct StyleCollectionCache {
    id: CacheId,
    rules: Vec<(RuleKey, String)>,
    index: HashMap<RuleKey, usize>,
    conflicts: Vec<RuleKey>,
}

impl StyleCollectionCache {
    /// Allocate an empty cache.
    pub fn create(id: CacheId) -> Self {
        Self {
            id,
            rules: Vec::new(),
            index: HashMap::new(),
            conflicts: Vec::new(),
        }
    }

    /// Record a rule under `key`.
    ///
    /// Recording the same key with identical text is a no-op. Recording it
    /// with different text means a component is not using content-derived
    /// keys; the first text wins and a warning is logged.
    pub fn record(&mut self, key: &str, text: impl Into<String>) -> Result<Recorded, StyleError> {
        let key = RuleKey::new(key)?;
        Ok(self.record_key(key, text.into()))
    }

    /// Register a block of declarations and return the class name that
    /// references it.
    ///
    /// The rule is keyed by the declarations' hash; the class name is that
    /// key in this cache's namespace (`css-1x2y3z` for key `1x2y3z`).
    pub fn css(&mut self, declarations: &str) -> String {
        let key = RuleKey::derive(declarations);
        let class = key.class_name(&self.id);
        let text = format!(".{}{{{}}}", class, declarations);
        self.record_key(key, text);
        class
    }

    fn record_key(&mut self, key: RuleKey, text: String) -> Recorded {
        match self.index.get(&key) {
            Some(&i) if self.rules[i].1 == text => Recorded::Duplicate,
            Some(_) => {
                tracing::warn!(cache = %self.id, key = %key, "style rule re-registered with different text");
                if !self.conflicts.contains(&key) {
                    self.conflicts.push(key);
                }
                Recorded::Conflict
            }
            None => {
                self.index.insert(key.clone(), self.rules.len());
                self.rules.push((key, text));
                Recorded::Inserted
            }
        }
    }

    /// Cache identifier.
    pub fn id(&self) -> &CacheId {
        &self.id
    }

    /// Number of distinct rules recorded.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule has been recorded.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Keys re-recorded with different text, in the order first seen.
    pub fn conflicts(&self) -> &[RuleKey] {
        &self.conflicts
    }

    /// Whether a rule key has been recorded.
    pub fn contains(&self, key: &str) -> bool {
        RuleKey::new(key)
            .map(|key| self.index.contains_key(&key))
            .unwrap_or(false)
    }

    /// Read-only copy of the recorded rules in insertion order.
    pub fn snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            cache_id: self.id.clone(),
            rules: self.rules.clone(),
        }
    }

    /// Consume the cache, keeping its rules as a snapshot.
    pub fn into_snapshot(self) -> StyleSnapshot {
        StyleSnapshot {
            cache_id: self.id,
            rules: self.rules,
        }
    }
}

/// Rules recorded by one cache, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSnapshot {
    cache_id: CacheId,
    rules: Vec<(RuleKey, String)>,
}

impl StyleSnapshot {
    /// Identifier of the cache the rules came from.
    pub fn cache_id(&self) -> &CacheId {
        &self.cache_id
    }

    /// Look up a rule's text.
    pub fn get(&self, key: &str) -> Option<&str> {
        let key = RuleKey::new(key).ok()?;
        self.rules
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, text)| text.as_str())
    }

    /// Iterate `(key, text)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, &str)> {
        self.rules.iter().map(|(k, text)| (k, text.as_str()))
    }

    /// Rule keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &RuleKey> {
        self.rules.iter().map(|(k, _)| k)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the snapshot holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
