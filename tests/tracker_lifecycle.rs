// tests/tracker_lifecycle.rs

mod common;
use crate::common::{init_tracing, RecordingSubscriber, RepoLayout, TestResult, OUTPUT_GLOBS};

use std::path::PathBuf;
use std::sync::Arc;

use globwatcher::errors::GlobWatchError;
use globwatcher::watch::Tracker;
use globwatcher::ChangeKind;

fn setup() -> (Tracker, RepoLayout, Arc<RecordingSubscriber>) {
    init_tracing();
    let layout = RepoLayout::virtual_at("/repo");
    let subscriber = Arc::new(RecordingSubscriber::new());
    let tracker = Tracker::new(layout.root(), subscriber.clone());
    (tracker, layout, subscriber)
}

#[test]
fn track_outputs() -> TestResult {
    let (tracker, layout, _) = setup();
    let hash = "the-hash";

    tracker.watch_globs(hash, &OUTPUT_GLOBS)?;
    assert!(tracker.changed_globs(hash, &OUTPUT_GLOBS)?.is_empty());

    // Irrelevant change.
    tracker.on_file_watch_event(&layout.event("my-pkg/irrelevant", ChangeKind::Create));
    assert!(tracker.changed_globs(hash, &OUTPUT_GLOBS)?.is_empty());

    // Relevant change.
    tracker.on_file_watch_event(&layout.event("my-pkg/dist/foo", ChangeKind::Create));
    assert_eq!(tracker.changed_globs(hash, &OUTPUT_GLOBS)?, vec!["my-pkg/dist/**"]);

    // The other glob changes too; nothing is left to track.
    tracker.on_file_watch_event(&layout.event("my-pkg/.next/foo", ChangeKind::Create));
    assert_eq!(tracker.tracked_count(), 0);
    assert_eq!(tracker.changed_globs(hash, &OUTPUT_GLOBS)?, OUTPUT_GLOBS.to_vec());

    Ok(())
}

#[test]
fn watch_single_file() -> TestResult {
    let (tracker, layout, _) = setup();
    let globs = ["my-pkg/.next/next-file"];

    tracker.watch_globs("the-hash", &globs)?;
    assert_eq!(tracker.tracked_count(), 1);

    tracker.on_file_watch_event(&layout.event("my-pkg/.next/foo", ChangeKind::Create));
    assert_eq!(tracker.tracked_count(), 1);

    tracker.on_file_watch_event(&layout.event("my-pkg/.next/next-file", ChangeKind::Write));
    assert_eq!(tracker.tracked_count(), 0);

    Ok(())
}

#[test]
fn registration_subscribes_static_prefixes() -> TestResult {
    let (tracker, _, subscriber) = setup();
    tracker.watch_globs("the-hash", &OUTPUT_GLOBS)?;

    assert_eq!(
        subscriber.subscribed(),
        vec![
            PathBuf::from("/repo/my-pkg/.next"),
            PathBuf::from("/repo/my-pkg/dist"),
        ]
    );
    Ok(())
}

#[test]
fn failed_subscription_rejects_registration() {
    let (tracker, _, subscriber) = setup();
    subscriber.fail_next(true);

    let err = tracker.watch_globs("the-hash", &OUTPUT_GLOBS).unwrap_err();
    assert!(matches!(err, GlobWatchError::ConfigError(_)));
    assert!(!tracker.is_tracking("the-hash"));
}

#[test]
fn pattern_error_names_the_pattern() {
    let (tracker, _, _) = setup();
    let err = tracker
        .watch_globs("the-hash", &["my-pkg/dist/**", "my-pkg/{dist"])
        .unwrap_err();

    match err {
        GlobWatchError::PatternSyntax { pattern, .. } => assert_eq!(pattern, "my-pkg/{dist"),
        other => panic!("expected PatternSyntax, got {other:?}"),
    }
    assert_eq!(tracker.tracked_count(), 0);
}

#[test]
fn keys_are_independent() -> TestResult {
    let (tracker, layout, _) = setup();
    tracker.watch_globs("dist-hash", &["my-pkg/dist/**"])?;
    tracker.watch_globs("next-hash", &["my-pkg/.next/**"])?;

    tracker.on_file_watch_event(&layout.event("my-pkg/dist/distChild/child-file", ChangeKind::Remove));

    assert!(!tracker.is_tracking("dist-hash"));
    assert!(tracker.is_tracking("next-hash"));
    assert_eq!(tracker.tracked_hashes(), vec!["next-hash".to_string()]);
    Ok(())
}

#[test]
fn rename_of_anchor_is_not_beneath_glob() -> TestResult {
    let (tracker, layout, _) = setup();
    tracker.watch_globs("the-hash", &OUTPUT_GLOBS)?;

    tracker.on_file_watch_event(&layout.event("my-pkg/dist", ChangeKind::Rename));
    assert!(tracker.changed_globs("the-hash", &OUTPUT_GLOBS)?.is_empty());
    assert!(tracker.is_tracking("the-hash"));
    Ok(())
}

#[test]
fn rename_beneath_anchor_invalidates() -> TestResult {
    let (tracker, layout, _) = setup();
    tracker.watch_globs("the-hash", &OUTPUT_GLOBS)?;

    tracker.on_file_watch_event(&layout.event("my-pkg/dist/distChild", ChangeKind::Rename));
    assert_eq!(
        tracker.changed_globs("the-hash", &OUTPUT_GLOBS)?,
        vec!["my-pkg/dist/**"]
    );
    Ok(())
}
