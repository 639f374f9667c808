use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use globwatcher::errors::{GlobWatchError, Result};
use globwatcher::watch::WatchSubscriber;

/// `WatchSubscriber` that only records the directories it was asked for.
///
/// Lets tests drive the tracker with hand-made events, without a real
/// file watcher.
#[derive(Debug, Default)]
pub struct RecordingSubscriber {
    dirs: Mutex<Vec<PathBuf>>,
    fail: AtomicBool,
}

impl RecordingSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `subscribe` call fail.
    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every directory subscribed so far, in call order.
    pub fn subscribed(&self) -> Vec<PathBuf> {
        self.dirs.lock().unwrap().clone()
    }
}

impl WatchSubscriber for RecordingSubscriber {
    fn subscribe(&self, dir: &Path) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(GlobWatchError::ConfigError(format!(
                "refusing to watch {:?}",
                dir
            )));
        }
        self.dirs.lock().unwrap().push(dir.to_path_buf());
        Ok(())
    }
}
