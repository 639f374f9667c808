// src/service.rs

//! Process-level wiring of the tracker, the `notify` watcher and the event
//! router task.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::errors::{GlobWatchError, Result};
use crate::fs::FileSystem;
use crate::watch::{NotifySubscriber, Tracker, spawn_event_router, spawn_watcher};

/// A running output tracker for one repository root.
///
/// Must be started from within a tokio runtime. Dropping the service stops
/// the router task; outstanding `Arc<Tracker>` handles keep answering
/// queries but no longer see filesystem changes.
#[derive(Debug)]
pub struct GlobWatchService {
    tracker: Arc<Tracker>,
    subscriber: Arc<NotifySubscriber>,
    router: JoinHandle<()>,
}

impl GlobWatchService {
    pub fn start(root: impl AsRef<Path>, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let root = root.as_ref();
        if !fs.is_dir(root) {
            return Err(GlobWatchError::ConfigError(format!(
                "watch root {:?} is not a directory",
                root
            )));
        }
        // Canonicalize once so event paths from the backend share our prefix.
        let root: PathBuf = fs.canonicalize(root)?;

        let (subscriber, events) = spawn_watcher(root.clone(), fs)?;
        let subscriber = Arc::new(subscriber);
        let tracker = Arc::new(Tracker::new(root.clone(), subscriber.clone()));
        let router = spawn_event_router(Arc::downgrade(&tracker), events);

        info!("output tracker started on {:?}", root);
        Ok(Self {
            tracker,
            subscriber,
            router,
        })
    }

    pub fn tracker(&self) -> Arc<Tracker> {
        Arc::clone(&self.tracker)
    }

    pub fn root(&self) -> &Path {
        self.tracker.root()
    }

    /// Directories the watcher currently observes recursively.
    pub fn watched_dirs(&self) -> Vec<PathBuf> {
        self.subscriber.watched_dirs()
    }
}

impl Drop for GlobWatchService {
    fn drop(&mut self) {
        self.router.abort();
    }
}
