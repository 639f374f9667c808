use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use notify::EventKind;
use notify::event::ModifyKind;

/// Opaque identifier of one cached build output set (the task hash).
pub type CacheKey = String;

/// Kind of filesystem activity behind a [`ChangeEvent`].
///
/// The tracker does not discriminate on it: any event on a matching path
/// invalidates. It is kept for logging and for callers that build events by
/// hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Create,
    Write,
    Remove,
    Rename,
}

impl ChangeKind {
    /// Map a `notify` event kind onto a change kind.
    ///
    /// Returns `None` for pure access events (open/read/close without write),
    /// which can never modify an output.
    pub fn from_notify(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(ChangeKind::Create),
            EventKind::Modify(ModifyKind::Name(_)) => Some(ChangeKind::Rename),
            EventKind::Modify(_) => Some(ChangeKind::Write),
            EventKind::Remove(_) => Some(ChangeKind::Remove),
            EventKind::Access(_) => None,
            EventKind::Any | EventKind::Other => Some(ChangeKind::Write),
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Create => "create",
            ChangeKind::Write => "write",
            ChangeKind::Remove => "remove",
            ChangeKind::Rename => "rename",
        };
        f.write_str(s)
    }
}

impl FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(ChangeKind::Create),
            "write" => Ok(ChangeKind::Write),
            "remove" => Ok(ChangeKind::Remove),
            "rename" => Ok(ChangeKind::Rename),
            other => Err(format!(
                "invalid change kind: {other} (expected create, write, remove or rename)"
            )),
        }
    }
}

/// A single filesystem change at an absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Split a `notify` event into one `ChangeEvent` per affected path.
    pub fn from_notify(event: &notify::Event) -> Vec<ChangeEvent> {
        match ChangeKind::from_notify(&event.kind) {
            Some(kind) => event
                .paths
                .iter()
                .map(|p| ChangeEvent::new(p.clone(), kind))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Messages flowing from the watch backend into the event router.
#[derive(Debug, Clone)]
pub enum WatchMessage {
    /// A path changed.
    Change(ChangeEvent),
    /// The backend may have dropped events (error or queue overflow).
    /// Nothing tracked can be trusted afterwards.
    Lost(String),
}

impl WatchMessage {
    /// Translate a raw `notify` callback result into router messages.
    pub fn from_notify(res: notify::Result<notify::Event>) -> Vec<WatchMessage> {
        match res {
            Ok(event) if event.need_rescan() => {
                vec![WatchMessage::Lost("watch backend requested a rescan".to_string())]
            }
            Ok(event) => ChangeEvent::from_notify(&event)
                .into_iter()
                .map(WatchMessage::Change)
                .collect(),
            Err(err) => vec![WatchMessage::Lost(err.to_string())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, Flag, RemoveKind, RenameMode};

    #[test]
    fn notify_kinds_map_to_change_kinds() {
        assert_eq!(
            ChangeKind::from_notify(&EventKind::Create(CreateKind::File)),
            Some(ChangeKind::Create)
        );
        assert_eq!(
            ChangeKind::from_notify(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            Some(ChangeKind::Write)
        );
        assert_eq!(
            ChangeKind::from_notify(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            Some(ChangeKind::Rename)
        );
        assert_eq!(
            ChangeKind::from_notify(&EventKind::Remove(RemoveKind::Folder)),
            Some(ChangeKind::Remove)
        );
        assert_eq!(ChangeKind::from_notify(&EventKind::Any), Some(ChangeKind::Write));
        assert_eq!(ChangeKind::from_notify(&EventKind::Access(AccessKind::Any)), None);
    }

    #[test]
    fn rename_event_yields_one_change_per_path() {
        let event = notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(PathBuf::from("/repo/a"))
            .add_path(PathBuf::from("/repo/b"));

        let changes = ChangeEvent::from_notify(&event);
        assert_eq!(
            changes,
            vec![
                ChangeEvent::new("/repo/a", ChangeKind::Rename),
                ChangeEvent::new("/repo/b", ChangeKind::Rename),
            ]
        );
    }

    #[test]
    fn rescan_flag_becomes_lost_message() {
        let event = notify::Event::new(EventKind::Other).set_flag(Flag::Rescan);
        let msgs = WatchMessage::from_notify(Ok(event));
        assert!(matches!(msgs.as_slice(), [WatchMessage::Lost(_)]));
    }

    #[test]
    fn change_kind_parses_case_insensitively() {
        assert_eq!("Write".parse::<ChangeKind>(), Ok(ChangeKind::Write));
        assert!("chmod".parse::<ChangeKind>().is_err());
    }
}
