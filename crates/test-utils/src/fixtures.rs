use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use globwatcher::{ChangeEvent, ChangeKind};

/// The small monorepo used across the tracker tests:
///
/// ```text
/// <root>/
///   my-pkg/
///     irrelevant
///     dist/
///       dist-file
///       distChild/
///         child-file
///     .next/
///       next-file
/// ```
#[derive(Debug, Clone)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub const FILES: [&'static str; 4] = [
        "my-pkg/irrelevant",
        "my-pkg/dist/dist-file",
        "my-pkg/dist/distChild/child-file",
        "my-pkg/.next/next-file",
    ];

    /// Create the layout under `root` (which must exist).
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let layout = Self { root: root.into() };
        for rel in Self::FILES {
            layout.write(rel, "")?;
        }
        Ok(layout)
    }

    /// A layout rooted at `root` without touching the disk.
    pub fn virtual_at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/').fold(self.root.clone(), |acc, seg| acc.join(seg))
    }

    /// Write a file, creating parent directories as needed.
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// A hand-made change event for `rel` under this root.
    pub fn event(&self, rel: &str, kind: ChangeKind) -> ChangeEvent {
        ChangeEvent::new(self.path(rel), kind)
    }
}
