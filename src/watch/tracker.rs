// src/watch/tracker.rs

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::types::{CacheKey, ChangeEvent};
use crate::watch::path_utils::relative_str;
use crate::watch::patterns::compile_all;
use crate::watch::pending::PendingSet;
use crate::watch::router::apply_event;
use crate::watch::watcher::WatchSubscriber;

/// Tracks, per cache key, which output globs have not changed since the
/// cached artifact was produced.
///
/// A key is present exactly while it has at least one pending glob. An
/// absent key means "everything may have changed": either it was never
/// registered or all of its globs have since been invalidated.
///
/// One instance per repository root; share it behind an `Arc`.
#[derive(Debug)]
pub struct Tracker {
    root: PathBuf,
    subscriber: Arc<dyn WatchSubscriber>,
    hash_globs: Mutex<HashMap<CacheKey, PendingSet>>,
}

impl Tracker {
    /// `root` should already be absolute (and canonical, if event paths
    /// will be canonical).
    pub fn new(root: impl Into<PathBuf>, subscriber: Arc<dyn WatchSubscriber>) -> Self {
        Self {
            root: root.into(),
            subscriber,
            hash_globs: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn lock_map(&self) -> MutexGuard<'_, HashMap<CacheKey, PendingSet>> {
        // Every critical section leaves the map consistent, so a panic
        // elsewhere does not invalidate it.
        self.hash_globs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start tracking `globs` for `hash`, replacing any previous
    /// registration for the same key.
    ///
    /// Every pattern is compiled and every static directory prefix is
    /// subscribed before anything is installed; on error nothing changes.
    /// An empty `globs` list leaves `hash` untracked.
    pub fn watch_globs<S: AsRef<str>>(&self, hash: &str, globs: &[S]) -> Result<()> {
        let pending = PendingSet::new(compile_all(globs)?);

        if pending.is_empty() {
            if self.lock_map().remove(hash).is_some() {
                debug!(hash, "empty registration replaced tracked globs");
            }
            return Ok(());
        }

        let dirs: BTreeSet<&str> = pending.globs().map(|g| g.watch_dir()).collect();
        for dir in dirs {
            self.subscriber.subscribe(&self.abs_dir(dir))?;
        }

        let count = pending.len();
        let previous = self.lock_map().insert(hash.to_string(), pending);
        if previous.is_some() {
            debug!(hash, "re-registration replaced previous pending globs");
        }
        info!(hash, globs = count, "tracking output globs");
        Ok(())
    }

    /// The subset of `requested`, in its order, that may have changed.
    ///
    /// For an untracked key that is all of `requested`. For a tracked key it
    /// is every requested glob not currently pending.
    pub fn changed_globs<S: AsRef<str>>(&self, hash: &str, requested: &[S]) -> Result<Vec<String>> {
        let hash_globs = self.lock_map();
        let changed = match hash_globs.get(hash) {
            None => requested.iter().map(|g| g.as_ref().to_string()).collect(),
            Some(pending) => requested
                .iter()
                .map(AsRef::as_ref)
                .filter(|g| !pending.contains(g))
                .map(str::to_string)
                .collect(),
        };
        Ok(changed)
    }

    /// Apply one filesystem change. Events outside the root are ignored.
    pub fn on_file_watch_event(&self, event: &ChangeEvent) {
        let Some(rel) = relative_str(&self.root, &event.path) else {
            debug!(path = ?event.path, kind = %event.kind, "ignoring event outside root");
            return;
        };

        let outcome = apply_event(&mut self.lock_map(), &rel);
        if outcome.is_noop() {
            return;
        }

        for (hash, globs) in &outcome.matched {
            debug!(%hash, ?globs, path = %rel, kind = %event.kind, "output globs changed");
        }
        for hash in &outcome.expired {
            info!(%hash, path = %rel, "all output globs changed; no longer tracking");
        }
    }

    /// Forget every key: the watch backend may have missed events, so no
    /// pending set can be trusted.
    pub fn on_watch_lost(&self, reason: &str) {
        let mut hash_globs = self.lock_map();
        let dropped = hash_globs.len();
        hash_globs.clear();
        drop(hash_globs);
        warn!(dropped, reason, "file watching interrupted; invalidated all tracked outputs");
    }

    pub fn is_tracking(&self, hash: &str) -> bool {
        self.lock_map().contains_key(hash)
    }

    /// Number of keys currently tracked.
    pub fn tracked_count(&self) -> usize {
        self.lock_map().len()
    }

    /// Tracked keys, sorted.
    pub fn tracked_hashes(&self) -> Vec<CacheKey> {
        let mut hashes: Vec<CacheKey> = self.lock_map().keys().cloned().collect();
        hashes.sort();
        hashes
    }

    /// Globs still pending for `hash`, in registration order.
    pub fn pending_globs(&self, hash: &str) -> Option<Vec<String>> {
        self.lock_map()
            .get(hash)
            .map(|p| p.patterns().map(str::to_string).collect())
    }

    fn abs_dir(&self, rel_dir: &str) -> PathBuf {
        if rel_dir.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel_dir)
        }
    }
}
