//! Validate one input file

use super::load_config;
use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use damcascade::table::load_table;
use damcascade::{FileRole, LoadOptions};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Args)]
pub struct ValidateArgs {
    /// File role: reservoir, routing, runoff, sedyield or sed_param
    pub role: String,

    /// File to check
    pub file: PathBuf,

    /// JSON configuration file; its tokenizer settings are used
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Field delimiter, overrides the configuration
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Title lines to skip before the column-name row
    #[arg(long)]
    pub skip_lines: Option<usize>,
}

impl ValidateArgs {
    /// Tokenizer settings from the configuration with flags on top
    fn load_options(&self) -> Result<LoadOptions> {
        let mut options = load_config(self.config.as_deref())?.load;
        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                bail!("delimiter {delimiter:?} is not a single-byte character");
            }
            options.delimiter = delimiter as u8;
        }
        if let Some(skip) = self.skip_lines {
            options.skip_lines = skip;
        }
        Ok(options)
    }
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    let role: FileRole = args.role.parse().map_err(|e: String| anyhow!(e))?;
    let options = args.load_options()?;

    let table = load_table(&args.file, role, &options)
        .with_context(|| format!("{} is not a valid {role} file", args.file.display()))?;

    let schema = table.schema();
    info!(
        %role,
        rows = table.len(),
        columns = schema.width(),
        "{} matches the expected layout: {}",
        args.file.display(),
        schema.names.join(", ")
    );
    if table.degraded_cells() > 0 {
        warn!(
            cells = table.degraded_cells(),
            "some cells are not numeric and will be treated as missing"
        );
    }

    println!("{}\t{}\t{}", role, table.len(), table.degraded_cells());
    Ok(())
}
