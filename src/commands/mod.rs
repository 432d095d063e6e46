//! Subcommands

pub mod order;
pub mod run;
pub mod validate;

use anyhow::{Context, Result};
use clap::Args;
use damcascade::{CascadeConfig, FileRole, TableStore};
use std::path::{Path, PathBuf};
use tracing::error;

/// The three files every computation needs
#[derive(Args)]
pub struct NetworkFiles {
    /// Reservoir geometry file
    #[arg(long, default_value = "reservoir.dat")]
    pub reservoir: PathBuf,

    /// Routing (upstream → downstream) file
    #[arg(long, default_value = "routing.dat")]
    pub routing: PathBuf,

    /// Local runoff file
    #[arg(long, default_value = "runoff.dat")]
    pub runoff: PathBuf,
}

impl NetworkFiles {
    pub fn entries(&self) -> Vec<(FileRole, &Path)> {
        vec![
            (FileRole::Reservoir, self.reservoir.as_path()),
            (FileRole::Routing, self.routing.as_path()),
            (FileRole::Runoff, self.runoff.as_path()),
        ]
    }
}

/// Reads the JSON configuration, or the defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<CascadeConfig> {
    match path {
        Some(path) => CascadeConfig::from_json_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display())),
        None => Ok(CascadeConfig::default()),
    }
}

/// Loads every file into `store`.
///
/// A file that fails is reported and skipped so the others still load;
/// the computation then stops on the missing input. Returns the number of
/// failed loads.
pub fn load_files(store: &mut TableStore, files: &[(FileRole, &Path)]) -> usize {
    let mut failed = 0;
    for &(role, path) in files {
        if let Err(e) = store.load(role, path) {
            error!(%role, path = %path.display(), "{e}");
            failed += 1;
        }
    }
    failed
}
