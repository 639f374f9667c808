// tests/config_loading.rs

mod common;
use crate::common::builders::ConfigFileBuilder;
use crate::common::TestResult;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use globwatcher::config::load_and_validate;
use globwatcher::errors::GlobWatchError;

#[test]
fn demo_config_loads() -> TestResult {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/outputs.toml"))?;

    let outputs = cfg.outputs();
    assert_eq!(outputs.len(), 2);
    assert_eq!(
        outputs["the-hash"].globs,
        vec!["my-pkg/dist/**", "my-pkg/.next/**"]
    );
    assert_eq!(
        cfg.resolve_root(&manifest_dir.join("demos")),
        manifest_dir.join("demos").join("..")
    );
    Ok(())
}

#[test]
fn root_defaults_to_config_dir() {
    let cfg = ConfigFileBuilder::new()
        .with_output("h", &["dist/**"])
        .build();
    assert_eq!(cfg.resolve_root(Path::new("/work")), PathBuf::from("/work"));

    let cfg = ConfigFileBuilder::new()
        .with_root("/abs/repo")
        .with_output("h", &["dist/**"])
        .build();
    assert_eq!(cfg.resolve_root(Path::new("/work")), PathBuf::from("/abs/repo"));
}

#[test]
fn invalid_glob_returns_pattern_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[output.abc123]
globs = ["dist/**", "dist/[unclosed"]
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(GlobWatchError::PatternSyntax { pattern, .. }) => {
            assert_eq!(pattern, "dist/[unclosed");
        }
        Err(e) => panic!("Expected PatternSyntax error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_globs_field_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[output.abc123]
paths = ["dist/**"]
"#
    )
    .unwrap();

    assert!(matches!(
        load_and_validate(file.path()),
        Err(GlobWatchError::TomlError(_))
    ));
}

#[test]
fn builder_raw_config_fails_validation_without_outputs() {
    let raw = ConfigFileBuilder::new().raw();
    assert!(matches!(
        globwatcher::config::ConfigFile::try_from(raw),
        Err(GlobWatchError::ConfigError(_))
    ));
}
