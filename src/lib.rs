// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod service;
pub mod types;
pub mod watch;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::fs::RealFileSystem;
use crate::service::GlobWatchService;
use crate::watch::{Tracker, compile_all};

pub use crate::errors::GlobWatchError;
pub use crate::types::{CacheKey, ChangeEvent, ChangeKind};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the output tracker + file watcher
/// - registration of every configured output
/// - Ctrl-C handling and the final change report
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config.clone();
    let cfg = load_and_validate(&config_path)?;

    let root = match args.root {
        Some(ref root) => root.clone(),
        None => cfg.resolve_root(&config_root_dir(&config_path)),
    };

    if args.dry_run {
        print_dry_run(&cfg, &root)?;
        return Ok(());
    }

    let service = GlobWatchService::start(&root, Arc::new(RealFileSystem))?;
    let tracker = service.tracker();

    for (hash, output) in cfg.outputs() {
        tracker.watch_globs(hash, &output.globs)?;
    }

    info!(
        outputs = cfg.outputs().len(),
        dirs = ?service.watched_dirs(),
        "watching outputs; press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await?;
    debug!("Ctrl-C received; writing report");

    print_report(&cfg, &tracker)?;
    Ok(())
}

/// Directory the config lives in, falling back to the working directory
/// for a bare file name.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Print each output's changed globs, one line per hash.
fn print_report(cfg: &ConfigFile, tracker: &Tracker) -> Result<()> {
    for (hash, output) in cfg.outputs() {
        let changed = tracker.changed_globs(hash, &output.globs)?;
        if changed.is_empty() {
            println!("{hash}: unchanged");
        } else {
            println!("{hash}: {}", changed.join(", "));
        }
    }
    Ok(())
}

/// Simple dry-run output: print outputs, globs and the directories that
/// would be watched.
fn print_dry_run(cfg: &ConfigFile, root: &Path) -> Result<()> {
    println!("globwatcher dry-run");
    println!("  root = {}", root.display());
    println!();

    println!("outputs ({}):", cfg.outputs().len());
    for (hash, output) in cfg.outputs() {
        let compiled = compile_all(&output.globs)?;
        let dirs: BTreeSet<&str> = compiled.iter().map(|g| g.watch_dir()).collect();

        println!("  - {hash}");
        println!("      globs: {:?}", output.globs);
        println!("      watch: {:?}", dirs);
    }

    debug!("dry-run complete (no watching)");
    Ok(())
}
