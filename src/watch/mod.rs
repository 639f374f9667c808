// src/watch/mod.rs

//! Output invalidation tracking.
//!
//! This module is responsible for:
//! - Compiling output glob patterns anchored at the repository root.
//! - Keeping, per cache key, the globs not yet seen changing.
//! - Routing filesystem change events onto those pending sets.
//! - Subscribing a `notify` watcher to every directory a glob could match in.
//!
//! It never reads or hashes file contents; invalidation is derived purely
//! from the observed event stream.

pub mod path_utils;
pub mod patterns;
pub mod pending;
pub mod router;
pub mod tracker;
pub mod watcher;

pub use patterns::{compile_all, OutputGlob};
pub use pending::PendingSet;
pub use router::{apply_event, spawn_event_router, RouteOutcome};
pub use tracker::Tracker;
pub use watcher::{spawn_watcher, NotifySubscriber, WatchSubscriber};
