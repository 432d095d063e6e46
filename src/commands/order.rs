//! Print the processing order

use super::{load_config, load_files, NetworkFiles};
use anyhow::{Context, Result};
use clap::Args;
use damcascade::{cascade, TableStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct OrderArgs {
    #[command(flatten)]
    pub files: NetworkFiles,

    /// Also write the network as Graphviz DOT to this path
    #[arg(long)]
    pub dot: Option<PathBuf>,

    /// JSON configuration file (sentinel and tokenizer settings)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn execute(args: OrderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let mut store = TableStore::with_options(config.load);
    load_files(&mut store, &args.files.entries());

    let (watershed, order) = cascade::processing_order(&store, &config)
        .context("could not establish a processing order")?;
    let network = &watershed.network;

    info!(
        subbasins = network.len(),
        headwaters = network.headwaters().len(),
        outlets = network.outlets().len(),
        "processing order established"
    );

    for (position, id) in order.ids(network).enumerate() {
        println!("{}\t{}", position + 1, id);
    }

    if let Some(path) = &args.dot {
        network
            .save_dot(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "network written as DOT");
    }

    Ok(())
}
