// src/watch/pending.rs

use crate::watch::patterns::OutputGlob;

/// Globs registered for one cache key that have not been seen changing yet.
///
/// Registration order is preserved. The set only ever shrinks; once it is
/// empty the owning key is dropped from the tracker.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    globs: Vec<OutputGlob>,
}

impl PendingSet {
    /// Build a pending set, keeping only the first occurrence of each pattern.
    pub fn new(globs: Vec<OutputGlob>) -> Self {
        let mut unique: Vec<OutputGlob> = Vec::with_capacity(globs.len());
        for glob in globs {
            if !unique.iter().any(|g| g.pattern() == glob.pattern()) {
                unique.push(glob);
            }
        }
        Self { globs: unique }
    }

    pub fn is_empty(&self) -> bool {
        self.globs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.globs.len()
    }

    /// Whether `pattern` (compared as a plain string) is still pending.
    pub fn contains(&self, pattern: &str) -> bool {
        self.globs.iter().any(|g| g.pattern() == pattern)
    }

    /// Pending patterns in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.globs.iter().map(|g| g.pattern())
    }

    pub fn globs(&self) -> impl Iterator<Item = &OutputGlob> {
        self.globs.iter()
    }

    /// Drop every glob matching `rel_path`; returns the removed patterns.
    pub fn remove_matching(&mut self, rel_path: &str) -> Vec<String> {
        let mut removed = Vec::new();
        self.globs.retain(|g| {
            if g.matches(rel_path) {
                removed.push(g.pattern().to_string());
                false
            } else {
                true
            }
        });
        removed
    }
}
