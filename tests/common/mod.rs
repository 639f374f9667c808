#![allow(dead_code)]

use std::error::Error;

pub use globwatcher_test_utils::builders;
pub use globwatcher_test_utils::{
    init_tracing, wait_until, with_timeout, RecordingSubscriber, RepoLayout,
};

pub type TestResult = Result<(), Box<dyn Error>>;

pub const OUTPUT_GLOBS: [&str; 2] = ["my-pkg/dist/**", "my-pkg/.next/**"];
