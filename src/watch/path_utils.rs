// src/watch/path_utils.rs

//! Root-relative path normalization for incoming change events.

use std::path::{Component, Path};

/// Express `path` relative to `root` as a forward-slash string.
///
/// - Try a direct `strip_prefix(root)` first.
/// - If that fails (symlinked temp dirs, `/private/var` on macOS), retry
///   with both sides canonicalized. Paths that no longer exist (removals)
///   can only take the fast path.
///
/// Returns `None` for paths outside `root` or that are not valid UTF-8.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return to_slash(rel);
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return to_slash(rel);
        }
    }

    None
}

/// Join normal components with `/`; `.` is skipped and anything that would
/// climb out of the root is refused.
fn to_slash(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in rel.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(parts.join("/"))
}
