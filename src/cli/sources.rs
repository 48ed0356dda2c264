//! Expansion of command-line paths into source files

use crate::detection::SourceKind;
use anyhow::{bail, Context, Result};
use ignore::{overrides::OverrideBuilder, WalkBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "bower_components"];

/// Resolves files and directories into the list of files to scan
///
/// Explicit files are kept as given. Directories are walked honoring
/// `.gitignore`, and only script and style files are kept. Results are
/// sorted per directory so runs are reproducible.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_file() {
            sources.push(path.clone());
        } else if path.is_dir() {
            let mut found = walk_directory(path)?;
            debug!(dir = %path.display(), files = found.len(), "Directory scanned");
            found.sort();
            sources.append(&mut found);
        } else {
            bail!("Source path does not exist: {}", path.display());
        }
    }

    Ok(sources)
}

fn walk_directory(root: &Path) -> Result<Vec<PathBuf>> {
    let mut override_builder = OverrideBuilder::new(root);
    for excluded in EXCLUDED_DIRS {
        override_builder
            .add(&format!("!{}/", excluded))
            .with_context(|| format!("Invalid exclusion pattern for {}", excluded))?;
    }
    let overrides = override_builder
        .build()
        .context("Failed to build directory exclusions")?;

    let mut files = Vec::new();
    for result in WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        .overrides(overrides)
        .build()
    {
        let entry = match result {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if SourceKind::classify(entry.path()).is_recognized() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
