//! damcascade: cascading dam-breach and sediment routing
//!
//! Given a network of small reservoirs (one per subbasin), the subbasins'
//! local runoff and the upstream → downstream routing between them,
//! `damcascade` decides which dams are overtopped and breach, propagates
//! water volume and peak discharge through the network in a single
//! topologically ordered pass, and optionally routes sediment mass along the
//! same path.
//!
//! # Quick Start
//!
//! ```no_run
//! use damcascade::prelude::*;
//!
//! fn main() -> damcascade::core::Result<()> {
//!     let mut store = TableStore::new();
//!     store.load(FileRole::Reservoir, "reservoir.dat")?;
//!     store.load(FileRole::Routing, "routing.dat")?;
//!     store.load(FileRole::Runoff, "runoff.dat")?;
//!
//!     let config = CascadeConfig::default();
//!     let (outcome, path) = run_and_save(&store, &config, ".")?;
//!     println!("{} rows written to {}", outcome.result.len(), path.display());
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! Each module hides one design decision that is likely to change:
//!
//! - [`core`]: error taxonomy, configuration, reporting rules
//! - [`table`]: input file format and cleaning (hides the tokenizer)
//! - [`graph`]: drainage network (hides the adjacency representation)
//! - [`routing`]: water and sediment engines (hides the traversal)
//! - [`report`]: result table and its text format
//! - [`cascade`]: the pipeline tying them together

pub mod cascade;
pub mod core;
pub mod graph;
pub mod report;
pub mod routing;
pub mod table;

pub use crate::cascade::{run, run_and_save, CascadeOutcome};
pub use crate::core::{CascadeConfig, Error, Result, SedimentParamMode};
pub use graph::{
    build_network, DrainageNetwork, GraphError, GraphResult, NetworkNode, ProcessingOrder,
    SubbasinAttributes, SubbasinId, Watershed,
};
pub use report::{ResultRow, ResultTable};
pub use routing::{RoutingError, SedimentParams, SedimentState, WaterState};
pub use table::{FileRole, LoadError, LoadOptions, Table, TableStore};

/// Prelude module for convenient glob imports
///
/// # Example
///
/// ```
/// use damcascade::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cascade::{run, run_and_save, CascadeOutcome};
    pub use crate::core::{CascadeConfig, Error, Result, SedimentParamMode};
    pub use crate::graph::{DrainageNetwork, GraphError, ProcessingOrder, SubbasinId};
    pub use crate::report::{ResultRow, ResultTable};
    pub use crate::routing::{RoutingError, SedimentParams};
    pub use crate::table::{FileRole, LoadOptions, TableStore};
}
