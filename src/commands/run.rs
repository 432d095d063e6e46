//! Run the cascade
//!
//! Loads the input files, routes water (and sediment when asked) and writes
//! `<output-dir>/<name>.dat`.

use super::{load_config, load_files, NetworkFiles};
use anyhow::{Context, Result};
use clap::Args;
use damcascade::core::{parse_manual_density, parse_manual_efficiency};
use damcascade::{cascade, CascadeConfig, FileRole, SedimentParamMode, TableStore};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Run arguments
#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub files: NetworkFiles,

    /// Also route sediment
    #[arg(long)]
    pub sediment: bool,

    /// Sediment yield file
    #[arg(long, default_value = "sedyield.dat")]
    pub sedyield: PathBuf,

    /// Per-subbasin sediment parameter file
    #[arg(long, conflicts_with_all = ["density", "efficiency"])]
    pub sed_param: Option<PathBuf>,

    /// Global dry bulk density of the dam material, e.g. 1,5
    #[arg(long)]
    pub density: Option<String>,

    /// Global retention efficiency in percent, e.g. 50%
    #[arg(long)]
    pub efficiency: Option<String>,

    /// Result file name without extension
    #[arg(short, long)]
    pub name: Option<String>,

    /// Directory the result file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// JSON configuration file; explicit flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Applies the command line on top of `config`
    fn apply(&self, mut config: CascadeConfig) -> Result<CascadeConfig> {
        if self.sediment {
            config.simulate_sediment = true;
        }
        if self.density.is_some() || self.efficiency.is_some() {
            let density = self
                .density
                .as_deref()
                .map(parse_manual_density)
                .transpose()?
                .flatten();
            let efficiency_percent = self
                .efficiency
                .as_deref()
                .map(parse_manual_efficiency)
                .transpose()?
                .flatten();
            config.sediment_params = SedimentParamMode::Manual {
                density,
                efficiency_percent,
            };
        } else if self.sed_param.is_some() {
            config.sediment_params = SedimentParamMode::File;
        }
        if let Some(name) = &self.name {
            config.output_name = name.clone();
        }
        Ok(config)
    }

    fn files(&self, config: &CascadeConfig) -> Vec<(FileRole, &Path)> {
        let mut files = self.files.entries();
        if config.simulate_sediment {
            files.push((FileRole::SedimentYield, self.sedyield.as_path()));
            if config.sediment_params == SedimentParamMode::File {
                let path = self
                    .sed_param
                    .as_deref()
                    .unwrap_or(Path::new("sed_param.dat"));
                files.push((FileRole::SedimentParams, path));
            }
        }
        files
    }
}

/// Executes the run command
pub fn execute(args: RunArgs) -> Result<()> {
    let config = args.apply(load_config(args.config.as_deref())?)?;
    let started = Instant::now();

    let mut store = TableStore::with_options(config.load);
    let failed = load_files(&mut store, &args.files(&config));
    if failed > 0 {
        warn!(failed, "some input files could not be loaded");
    }

    let (outcome, path) = cascade::run_and_save(&store, &config, &args.output_dir)
        .context("cascade computation failed, no result was written")?;

    let breached = outcome.water.iter().filter(|(_, s)| s.breached).count();
    info!(
        run.id = %outcome.run_id,
        subbasins = outcome.order.len(),
        breached,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "result written to {}",
        path.display()
    );

    Ok(())
}
