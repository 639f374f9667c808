// src/watch/patterns.rs

use std::fmt;

use globset::{GlobBuilder, GlobMatcher};

use crate::errors::{GlobWatchError, Result};

/// Characters that make a path segment non-literal for `globset`.
const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}', '\\'];

/// A compiled output glob, anchored at the repository root.
///
/// Patterns use `/`-separated segments:
///
/// - a segment without wildcards must match exactly (case-sensitive);
/// - `*` and `?` stay within one segment;
/// - a `**` segment matches zero or more segments, so `dist/**` matches
///   everything strictly beneath `dist` but not `dist` itself.
///
/// The matcher is built once at registration and never re-parsed.
#[derive(Clone)]
pub struct OutputGlob {
    pattern: String,
    matcher: GlobMatcher,
    watch_dir: String,
}

impl fmt::Debug for OutputGlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputGlob")
            .field("pattern", &self.pattern)
            .field("watch_dir", &self.watch_dir)
            .finish_non_exhaustive()
    }
}

impl OutputGlob {
    /// Compile `pattern`, rejecting anything that cannot be anchored under
    /// the root or that `globset` refuses to parse.
    pub fn compile(pattern: &str) -> Result<Self> {
        let normalized = pattern.strip_prefix("./").unwrap_or(pattern);

        if normalized.is_empty() {
            return Err(GlobWatchError::pattern(pattern, "pattern is empty"));
        }
        if normalized.starts_with('/') {
            return Err(GlobWatchError::pattern(
                pattern,
                "pattern must be relative to the repository root",
            ));
        }

        let segments: Vec<&str> = normalized.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(GlobWatchError::pattern(pattern, "empty path segment"));
        }
        if segments.iter().any(|s| *s == "..") {
            return Err(GlobWatchError::pattern(
                pattern,
                "'..' segments cannot be anchored under the root",
            ));
        }

        let matcher = GlobBuilder::new(normalized)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .map_err(|e| GlobWatchError::pattern(pattern, e.kind().to_string()))?
            .compile_matcher();

        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
            watch_dir: static_dir_prefix(&segments),
        })
    }

    /// The pattern exactly as it was registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Longest root-relative directory that contains every possible match.
    ///
    /// `""` stands for the root itself.
    pub fn watch_dir(&self) -> &str {
        &self.watch_dir
    }

    /// Whether a root-relative, forward-slash path satisfies this pattern.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }
}

/// Segments before the first wildcard; for fully literal patterns, the
/// parent directory of the named file.
fn static_dir_prefix(segments: &[&str]) -> String {
    let literal_len = segments
        .iter()
        .position(|s| s.contains(GLOB_META))
        .unwrap_or(segments.len().saturating_sub(1));
    segments[..literal_len].join("/")
}

/// Compile every pattern, stopping at the first failure.
pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<OutputGlob>> {
    patterns
        .iter()
        .map(|p| OutputGlob::compile(p.as_ref()))
        .collect()
}
