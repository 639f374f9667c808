// src/watch/watcher.rs

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::errors::{GlobWatchError, Result};
use crate::fs::{FileSystem, nearest_existing_dir};
use crate::types::WatchMessage;

/// Something that can make sure a directory is observed for changes.
///
/// The tracker calls this for the static prefix of every glob it registers,
/// before the registration becomes visible.
pub trait WatchSubscriber: Send + Sync + fmt::Debug {
    /// Ensure `dir` (absolute, beneath the repository root) is watched
    /// recursively. `dir` may not exist yet.
    fn subscribe(&self, dir: &Path) -> Result<()>;
}

/// Outcome of asking [`WatchedDirs`] about a new directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    /// An already watched directory is an ancestor (or the same path).
    Covered,
    /// Needs a new recursive watch; the listed watches fall beneath it.
    Add { subsumes: Vec<PathBuf> },
}

/// Minimal covering set of recursively watched directories: no entry is
/// ever beneath another.
///
/// Subsumed directories leave this set but stay registered with the
/// backend. inotify shares one descriptor per inode between a child watch
/// and the ancestor's recursive watch, so unwatching the child would blind
/// the ancestor too.
#[derive(Debug, Default, Clone)]
pub struct WatchedDirs {
    dirs: BTreeSet<PathBuf>,
}

impl WatchedDirs {
    pub fn plan(&self, dir: &Path) -> Coverage {
        if self.dirs.iter().any(|d| dir.starts_with(d)) {
            return Coverage::Covered;
        }
        let subsumes = self
            .dirs
            .iter()
            .filter(|d| d.starts_with(dir))
            .cloned()
            .collect();
        Coverage::Add { subsumes }
    }

    pub fn commit(&mut self, dir: PathBuf, subsumes: &[PathBuf]) {
        for old in subsumes {
            self.dirs.remove(old);
        }
        self.dirs.insert(dir);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

struct SubscriberState {
    watcher: RecommendedWatcher,
    dirs: WatchedDirs,
}

/// [`WatchSubscriber`] backed by a `notify` recommended watcher.
///
/// Dropping it stops file watching and closes the event channel returned by
/// [`spawn_watcher`].
pub struct NotifySubscriber {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    state: Mutex<SubscriberState>,
}

impl fmt::Debug for NotifySubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifySubscriber")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl NotifySubscriber {
    /// Directories currently holding a recursive watch.
    pub fn watched_dirs(&self) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.dirs.iter().map(Path::to_path_buf).collect()
    }
}

impl NotifySubscriber {
    /// Directory that actually receives the recursive watch for `dir`.
    ///
    /// A watch follows the inode, so watching `dir` itself would miss a
    /// replacement of `dir` (rename away, then re-create). Its parent sees
    /// the new directory appear and the recursive watch extends into it.
    fn watch_target(&self, dir: &Path) -> Result<PathBuf> {
        let anchor = match dir.parent() {
            Some(parent) if dir != self.root && parent.starts_with(&self.root) => parent,
            _ => dir,
        };
        nearest_existing_dir(self.fs.as_ref(), &self.root, anchor).ok_or_else(|| {
            GlobWatchError::WatchError(
                notify::Error::path_not_found().add_path(self.root.clone()),
            )
        })
    }
}

impl WatchSubscriber for NotifySubscriber {
    fn subscribe(&self, dir: &Path) -> Result<()> {
        let target = self.watch_target(dir)?;

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state.dirs.plan(&target) {
            Coverage::Covered => {
                trace!(dir = ?target, "directory already covered by a watch");
                Ok(())
            }
            Coverage::Add { subsumes } => {
                state.watcher.watch(&target, RecursiveMode::Recursive)?;
                debug!(dir = ?target, subsumed = subsumes.len(), "watching directory");
                state.dirs.commit(target, &subsumes);
                Ok(())
            }
        }
    }
}

/// Create a `notify` watcher for `root` and the channel its events arrive on.
///
/// No directory is watched until something subscribes to it. The returned
/// receiver yields `None` once the subscriber is dropped.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    fs: Arc<dyn FileSystem>,
) -> Result<(NotifySubscriber, mpsc::UnboundedReceiver<WatchMessage>)> {
    let root = root.into();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<WatchMessage>();

    // Called synchronously on notify's own thread.
    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            for msg in WatchMessage::from_notify(res) {
                if event_tx.send(msg).is_err() {
                    trace!("event router gone; dropping notify event");
                    break;
                }
            }
        },
        Config::default(),
    )?;

    info!("file watcher created for {:?}", root);

    let subscriber = NotifySubscriber {
        root,
        fs,
        state: Mutex::new(SubscriberState {
            watcher,
            dirs: WatchedDirs::default(),
        }),
    };
    Ok((subscriber, event_rx))
}
