// src/watch/router.rs

//! Applying change events to the tracked pending sets.
//!
//! Events arrive on a channel fed by the watch backend and are consumed by
//! a single task, one at a time, so event cadence never stalls API callers
//! and the backend's threads never re-enter the tracker.

use std::collections::HashMap;
use std::sync::Weak;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::types::{CacheKey, WatchMessage};
use crate::watch::pending::PendingSet;
use crate::watch::tracker::Tracker;

/// What a single event did to the tracking map.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    /// Keys that lost at least one glob, with the globs they lost.
    pub matched: Vec<(CacheKey, Vec<String>)>,
    /// Keys whose pending set became empty and were removed.
    pub expired: Vec<CacheKey>,
}

impl RouteOutcome {
    pub fn is_noop(&self) -> bool {
        self.matched.is_empty() && self.expired.is_empty()
    }
}

/// Test `rel_path` against every pending glob of every key, remove the
/// matches, then drop keys left with nothing pending.
///
/// Must run under the tracker's map lock so removal and deletion are atomic
/// with respect to registration.
pub fn apply_event(
    hash_globs: &mut HashMap<CacheKey, PendingSet>,
    rel_path: &str,
) -> RouteOutcome {
    let mut outcome = RouteOutcome::default();

    for (hash, pending) in hash_globs.iter_mut() {
        let removed = pending.remove_matching(rel_path);
        if removed.is_empty() {
            continue;
        }
        outcome.matched.push((hash.clone(), removed));
        if pending.is_empty() {
            outcome.expired.push(hash.clone());
        }
    }

    for hash in &outcome.expired {
        hash_globs.remove(hash);
    }

    outcome.matched.sort();
    outcome.expired.sort();
    outcome
}

/// Hand one backend message to the tracker.
pub fn dispatch(tracker: &Tracker, msg: WatchMessage) {
    match msg {
        WatchMessage::Change(event) => tracker.on_file_watch_event(&event),
        WatchMessage::Lost(reason) => tracker.on_watch_lost(&reason),
    }
}

/// Spawn the consumer task that drains `events` into the tracker.
///
/// Holds only a weak reference: the task ends when the channel closes or
/// when the last strong `Tracker` handle is dropped.
pub fn spawn_event_router(
    tracker: Weak<Tracker>,
    mut events: mpsc::UnboundedReceiver<WatchMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = events.recv().await {
            let Some(tracker) = tracker.upgrade() else {
                break;
            };
            dispatch(&tracker, msg);
        }
        debug!("event router finished");
    })
}
