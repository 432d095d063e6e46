//! The cascade pipeline
//!
//! ```text
//! TableStore ─→ build_network ─→ topological_sort ─→ route_water
//!                                                        │
//!                         ResultTable ←─ (route_sediment)┘
//! ```
//!
//! A run either completes and returns every intermediate product, or fails
//! with the first error. Nothing is written to disk until the caller asks
//! for it with [`run_and_save`] or [`ResultTable::save`].

use crate::core::{CascadeConfig, Error, Result, SedimentParamMode};
use crate::graph::{build_network, ProcessingOrder, Watershed};
use crate::report::ResultTable;
use crate::routing::{
    route_sediment, route_water, NodeStates, SedimentInputs, SedimentParams, SedimentState,
    SedimentYield, WaterState,
};
use crate::table::{FileRole, TableStore};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, info_span};
use uuid::Uuid;

/// Every product of one completed run
#[derive(Debug, Clone)]
pub struct CascadeOutcome {
    /// Correlates the log lines of this run
    pub run_id: Uuid,
    pub watershed: Watershed,
    pub order: ProcessingOrder,
    pub water: NodeStates<WaterState>,
    pub sediment: Option<NodeStates<SedimentState>>,
    pub result: ResultTable,
}

/// Roles a run with this configuration reads
pub fn required_roles(config: &CascadeConfig) -> Vec<FileRole> {
    let mut roles = vec![FileRole::Reservoir, FileRole::Routing, FileRole::Runoff];
    if config.simulate_sediment {
        roles.push(FileRole::SedimentYield);
        if config.sediment_params == SedimentParamMode::File {
            roles.push(FileRole::SedimentParams);
        }
    }
    roles
}

/// Fails with [`Error::MissingInput`] for the first required role the store
/// does not hold.
pub fn check_inputs(store: &TableStore, config: &CascadeConfig) -> Result<()> {
    for role in required_roles(config) {
        store.require(role)?;
    }
    Ok(())
}

/// Resolves where sediment density and efficiency come from.
pub fn sediment_params(store: &TableStore, config: &CascadeConfig) -> Result<SedimentParams> {
    match config.sediment_params {
        SedimentParamMode::File => {
            let table = store.require(FileRole::SedimentParams)?;
            Ok(SedimentParams::per_node(table)?)
        }
        SedimentParamMode::Manual {
            density,
            efficiency_percent,
        } => {
            if let Some(d) = density.filter(|d| !d.is_finite() || *d < 0.0) {
                return Err(Error::Config(format!("density must be non-negative, got {d}")));
            }
            if let Some(e) = efficiency_percent.filter(|e| !(0.0..=100.0).contains(e)) {
                return Err(Error::Config(format!(
                    "efficiency must be between 0 and 100 percent, got {e}"
                )));
            }
            Ok(SedimentParams::global(
                density,
                efficiency_percent.map(|e| e / 100.0),
            ))
        }
    }
}

/// Builds the network and its processing order without routing anything.
pub fn processing_order(
    store: &TableStore,
    config: &CascadeConfig,
) -> Result<(Watershed, ProcessingOrder)> {
    let watershed = build_network(
        store.require(FileRole::Reservoir)?,
        store.require(FileRole::Routing)?,
        store.require(FileRole::Runoff)?,
        config.downstream_sentinel,
    )?;
    let order = watershed.network.topological_sort()?;
    Ok((watershed, order))
}

/// Runs the whole cascade over the tables held in `store`.
pub fn run(store: &TableStore, config: &CascadeConfig) -> Result<CascadeOutcome> {
    let run_id = Uuid::new_v4();
    let span = info_span!(
        "cascade",
        run.id = %run_id,
        sediment = config.simulate_sediment,
        result = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );
    let _entered = span.enter();
    let started = Instant::now();

    let outcome = run_inner(run_id, store, config);

    span.record("result", if outcome.is_ok() { "completed" } else { "failed" });
    span.record("duration_ms", started.elapsed().as_millis() as u64);
    outcome
}

fn run_inner(run_id: Uuid, store: &TableStore, config: &CascadeConfig) -> Result<CascadeOutcome> {
    check_inputs(store, config)?;

    // Parameters are resolved up front so a bad manual value fails before
    // any routing starts
    let sediment_inputs = if config.simulate_sediment {
        let sediment_yield = SedimentYield::from_table(store.require(FileRole::SedimentYield)?)?;
        Some((sediment_yield, sediment_params(store, config)?))
    } else {
        None
    };

    let (watershed, order) = processing_order(store, config)?;
    info!(subbasins = order.len(), "processing order established");

    let water = route_water(&watershed.network, &order)?;

    let sediment = match &sediment_inputs {
        Some((sediment_yield, params)) => Some(route_sediment(
            &watershed.network,
            &order,
            SedimentInputs {
                water: &water,
                merged: &watershed.merged,
                sediment_yield,
                params,
            },
        )?),
        None => None,
    };

    let result = ResultTable::assemble(
        store.require(FileRole::Runoff)?,
        &watershed.network,
        &water,
        sediment.as_ref(),
    );
    let unrouted = result.unrouted().count();
    info!(rows = result.len(), unrouted, "result assembled");

    Ok(CascadeOutcome {
        run_id,
        watershed,
        order,
        water,
        sediment,
        result,
    })
}

/// Runs the cascade and writes the result into `output_dir`.
///
/// The file is only created once the run has succeeded.
pub fn run_and_save(
    store: &TableStore,
    config: &CascadeConfig,
    output_dir: impl AsRef<Path>,
) -> Result<(CascadeOutcome, PathBuf)> {
    let outcome = run(store, config)?;
    let path = config.output_path(output_dir);
    outcome.result.save(&path)?;
    Ok((outcome, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;
    use crate::SubbasinId;

    fn id(raw: i64) -> SubbasinId {
        SubbasinId::new(raw)
    }

    fn store() -> TableStore {
        let mut store = TableStore::new();
        store.insert(
            Table::from_rows(
                FileRole::Reservoir,
                vec![
                    (id(1), vec![Some(10.0), Some(3.0), Some(1000.0)]),
                    (id(2), vec![Some(10.0), Some(3.0), Some(1000.0)]),
                ],
            )
            .unwrap(),
        );
        store.insert(
            Table::from_rows(
                FileRole::Routing,
                vec![
                    (id(1), vec![Some(1.0), Some(2.0)]),
                    (id(2), vec![Some(2.0), Some(-999.0)]),
                ],
            )
            .unwrap(),
        );
        store.insert(
            Table::from_rows(
                FileRole::Runoff,
                vec![
                    (id(1), vec![Some(100.0), Some(5.0)]),
                    (id(2), vec![Some(50.0), Some(3.0)]),
                ],
            )
            .unwrap(),
        );
        store
    }

    #[test]
    fn test_required_roles() {
        let mut config = CascadeConfig::default();
        assert_eq!(required_roles(&config).len(), 3);
        config.simulate_sediment = true;
        assert_eq!(required_roles(&config).len(), 5);
        config.sediment_params = SedimentParamMode::Manual {
            density: None,
            efficiency_percent: None,
        };
        assert!(!required_roles(&config).contains(&FileRole::SedimentParams));
    }

    #[test]
    fn test_run_water_only() {
        let outcome = run(&store(), &CascadeConfig::default()).unwrap();
        let order: Vec<_> = outcome.order.ids(&outcome.watershed.network).collect();
        assert_eq!(order, vec![id(1), id(2)]);
        assert!(outcome.sediment.is_none());

        let b = outcome.result.get(id(2)).unwrap();
        assert_eq!(b.volume_out, Some(150));
        assert_eq!(b.breached, Some(false));
    }

    #[test]
    fn test_missing_input_before_graph() {
        let mut store = store();
        store.remove(FileRole::Routing);
        let result = run(&store, &CascadeConfig::default());
        assert!(matches!(
            result,
            Err(Error::MissingInput {
                role: FileRole::Routing
            })
        ));
    }

    #[test]
    fn test_sediment_requires_yield() {
        let config = CascadeConfig {
            simulate_sediment: true,
            sediment_params: SedimentParamMode::Manual {
                density: None,
                efficiency_percent: Some(40.0),
            },
            ..CascadeConfig::default()
        };
        let result = run(&store(), &config);
        assert!(matches!(
            result,
            Err(Error::MissingInput {
                role: FileRole::SedimentYield
            })
        ));
    }

    #[test]
    fn test_manual_sediment_run() {
        let mut store = store();
        store.insert(
            Table::from_rows(
                FileRole::SedimentYield,
                vec![(id(1), vec![Some(10.0)]), (id(2), vec![Some(4.0)])],
            )
            .unwrap(),
        );
        let config = CascadeConfig {
            simulate_sediment: true,
            sediment_params: SedimentParamMode::Manual {
                density: None,
                efficiency_percent: Some(40.0),
            },
            ..CascadeConfig::default()
        };

        let outcome = run(&store, &config).unwrap();
        let b = outcome.result.get(id(2)).unwrap();
        // 0.4 * (4 + 0.4 * 10)
        assert_eq!(b.sediment_in, Some(8.0));
        assert_eq!(b.sediment_out, Some(3.2));
    }

    #[test]
    fn test_manual_efficiency_out_of_range() {
        let config = CascadeConfig {
            simulate_sediment: true,
            sediment_params: SedimentParamMode::Manual {
                density: None,
                efficiency_percent: Some(150.0),
            },
            ..CascadeConfig::default()
        };
        assert!(matches!(
            sediment_params(&store(), &config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_run_and_save_leaves_no_file_on_cycle() {
        let mut store = store();
        store.insert(
            Table::from_rows(
                FileRole::Routing,
                vec![
                    (id(1), vec![Some(1.0), Some(2.0)]),
                    (id(2), vec![Some(2.0), Some(1.0)]),
                ],
            )
            .unwrap(),
        );
        let dir = tempfile::tempdir().unwrap();
        let config = CascadeConfig::default();

        let result = run_and_save(&store, &config, dir.path());
        assert!(matches!(result, Err(Error::Graph(_))));
        assert!(!config.output_path(dir.path()).exists());
    }
}
