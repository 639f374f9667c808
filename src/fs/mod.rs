// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// The slice of filesystem access the watch layer needs.
///
/// The tracker never reads file contents; it only resolves which
/// directories exist so it can subscribe to them.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("canonicalizing {:?}", path))
    }
}

/// Walk up from `dir` to the closest directory that exists, never leaving
/// `root`. Returns `None` when not even `root` exists.
pub fn nearest_existing_dir(fs: &dyn FileSystem, root: &Path, dir: &Path) -> Option<PathBuf> {
    let mut current = dir;
    loop {
        if !current.starts_with(root) {
            return None;
        }
        if fs.is_dir(current) {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}
