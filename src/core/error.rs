use crate::graph::GraphError;
use crate::routing::RoutingError;
use crate::table::{FileRole, LoadError};
use std::path::PathBuf;
use thiserror::Error;

/// Crate-level error type for a cascade run.
///
/// Each layer keeps its own error enum; this type wraps them with `#[from]`
/// so `?` works across layers while the full chain stays available.
///
/// Propagation: load errors are fatal to one file; every other variant
/// aborts the whole compute, since a cascade has no defined partial result.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An input table could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The drainage network could not be built or ordered.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A routing engine failed at a node.
    #[error(transparent)]
    Routing(#[from] RoutingError),

    /// A required table was never loaded before compute was requested.
    #[error("{role} was not loaded before compute was requested")]
    MissingInput { role: FileRole },

    /// A configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration file could not be read or parsed.
    #[error("failed to read configuration from {}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The result table could not be written.
    #[error("failed to write result to {}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
