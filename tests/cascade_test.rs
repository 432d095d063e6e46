//! End-to-end cascade runs over files on disk
//!
//! Each test writes the input tables into a temporary directory, loads them
//! through the table store and checks the result file.

use damcascade::core::round2;
use damcascade::graph::Attribute;
use damcascade::prelude::*;
use damcascade::routing::{dam_break_peak, eroded_volume};
use damcascade::LoadError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RESERVOIR: &str = "Reservoir parameters
ID\tStorage\tHeight\tSpillway
1\t10,0\t3,0\t1000,0
2\t10,0\t3,0\t1000,0
3\t500\t4\t1
";

const ROUTING: &str = "Routing
ID\tFrom\tTo
1\t1\t2
2\t2\t3
3\t3\t-999
";

// Subbasin 4 has runoff but no reservoir
const RUNOFF: &str = "Runoff per subbasin
ID\tVolume\tPeak
1\t100\t5
2\t50\t3
3\t10\t10
4\t7\t1
";

const SEDYIELD: &str = "Sediment yield
ID\tInflow
1\t10
2\t5
3\t2
4\t1
";

struct Inputs {
    dir: TempDir,
}

impl Inputs {
    fn new() -> Self {
        let inputs = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        inputs.write("reservoir.dat", RESERVOIR);
        inputs.write("routing.dat", ROUTING);
        inputs.write("runoff.dat", RUNOFF);
        inputs.write("sedyield.dat", SEDYIELD);
        inputs
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn store(&self, roles: &[FileRole]) -> TableStore {
        let mut store = TableStore::new();
        for &role in roles {
            store.load(role, self.path().join(role.file_name())).unwrap();
        }
        store
    }

    fn water_store(&self) -> TableStore {
        self.store(&[FileRole::Reservoir, FileRole::Routing, FileRole::Runoff])
    }
}

#[test]
fn test_water_run_writes_result_file() {
    let inputs = Inputs::new();
    let store = inputs.water_store();
    let config = CascadeConfig::default();

    let (outcome, path) = run_and_save(&store, &config, inputs.path()).unwrap();
    assert_eq!(path, inputs.path().join("result_discharge.dat"));
    assert_eq!(outcome.result.len(), 4);

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "subbasin_id,volume_in,volume_out,peak_in,peak_out,breached"
    );
    assert_eq!(lines[1], "1,100,100,5.00,3.54,false");
    assert_eq!(lines[2], "2,150,150,6.54,4.62,false");

    // Subbasin 3 is overtopped: 0.707 × 14.62 > 1
    let expected_peak = format!("{:.2}", round2(dam_break_peak(660.0)));
    assert_eq!(lines[3], format!("3,160,660,14.62,{expected_peak},true"));

    // Runoff-only subbasin keeps its row with empty cells
    assert_eq!(lines[4], "4,,,,,");
}

#[test]
fn test_sediment_run_with_manual_parameters() {
    let inputs = Inputs::new();
    let store = inputs.store(&[
        FileRole::Reservoir,
        FileRole::Routing,
        FileRole::Runoff,
        FileRole::SedimentYield,
    ]);
    let config = CascadeConfig {
        simulate_sediment: true,
        sediment_params: SedimentParamMode::Manual {
            density: None,
            efficiency_percent: Some(50.0),
        },
        output_name: "with_sediment".to_string(),
        ..CascadeConfig::default()
    };

    let (outcome, path) = run_and_save(&store, &config, inputs.path()).unwrap();
    assert!(path.ends_with("with_sediment.dat"));

    let one = outcome.result.get(SubbasinId::new(1)).unwrap();
    assert_eq!(one.eroded_volume, Some(0.0));
    assert_eq!(one.sediment_in, Some(10.0));
    assert_eq!(one.sediment_out, Some(5.0));

    let three = outcome.result.get(SubbasinId::new(3)).unwrap();
    let eroded = eroded_volume(true, 660.0, 4.0);
    assert!(eroded > 0.0);
    assert_eq!(three.eroded_volume, Some(eroded));
    assert_eq!(three.sediment_in, Some(7.0));
    assert_eq!(three.sediment_out, Some(round2(7.0 + eroded * 1.5)));

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "subbasin_id,volume_in,volume_out,peak_in,peak_out,breached,eroded_volume,sediment_in,sediment_out"
    );
    assert_eq!(lines[1], "1,100,100,5.00,3.54,false,0.00,10.00,5.00");
    assert_eq!(lines[4], "4,,,,,,,,");
}

#[test]
fn test_sediment_run_with_parameter_file() {
    let inputs = Inputs::new();
    inputs.write("sed_param.dat", "Sediment parameters\nID\tDensity\tEfficiency\n1\t1.2\t0.8\n2\t1.2\t0.1\n");
    let store = inputs.store(&FileRole::ALL);
    let config = CascadeConfig {
        simulate_sediment: true,
        ..CascadeConfig::default()
    };

    let outcome = run(&store, &config).unwrap();
    let two = outcome.result.get(SubbasinId::new(2)).unwrap();
    // 0.1 × (5 + 0.8 × 10)
    assert_eq!(two.sediment_in, Some(13.0));
    assert_eq!(two.sediment_out, Some(1.3));
}

#[test]
fn test_cycle_aborts_without_output() {
    let inputs = Inputs::new();
    inputs.write("routing.dat", "Routing\nID\tFrom\tTo\n1\t1\t2\n2\t2\t1\n");
    let store = inputs.water_store();
    let config = CascadeConfig::default();

    let err = run_and_save(&store, &config, inputs.path()).unwrap_err();
    match &err {
        Error::Graph(GraphError::CyclicNetwork { nodes }) => {
            assert!(nodes.contains(&SubbasinId::new(1)));
            assert!(nodes.contains(&SubbasinId::new(2)));
        }
        other => panic!("expected a cycle error, got {other:?}"),
    }
    assert!(err.to_string().contains("not acyclic"));
    assert!(!config.output_path(inputs.path()).exists());
}

#[test]
fn test_missing_input_aborts_without_output() {
    let inputs = Inputs::new();
    let store = inputs.store(&[FileRole::Reservoir, FileRole::Routing]);
    let config = CascadeConfig::default();

    let err = run_and_save(&store, &config, inputs.path()).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingInput {
            role: FileRole::Runoff
        }
    ));
    assert!(!config.output_path(inputs.path()).exists());
}

#[test]
fn test_degraded_cell_fails_at_visit() {
    let inputs = Inputs::new();
    inputs.write(
        "reservoir.dat",
        "Reservoir parameters\nID\tStorage\tHeight\tSpillway\n1\t10\t3\t1000\n2\t10\t3\tn/a\n3\t500\t4\t1\n",
    );
    let store = inputs.water_store();
    assert_eq!(store.get(FileRole::Reservoir).unwrap().degraded_cells(), 1);

    let err = run(&store, &CascadeConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        Error::Routing(RoutingError::MissingAttributes {
            attribute: Attribute::SpillwayCapacity,
            ..
        })
    ));
}

#[test]
fn test_schema_mismatch_is_fatal_to_that_file() {
    let inputs = Inputs::new();
    let path = inputs.write("reservoir.dat", "Reservoir parameters\nID\tStorage\tHeight\n1\t10\t3\n");

    let mut store = TableStore::new();
    let err = store.load(FileRole::Reservoir, &path).unwrap_err();
    assert!(matches!(
        err,
        LoadError::SchemaMismatch {
            role: FileRole::Reservoir,
            line: 3,
            expected: 4,
            found: 3,
        }
    ));
    assert!(!store.contains(FileRole::Reservoir));

    // Other files still load
    store
        .load(FileRole::Runoff, inputs.path().join("runoff.dat"))
        .unwrap();
    assert!(store.contains(FileRole::Runoff));
}

#[test]
fn test_store_reads_title_and_column_name_rows() {
    let inputs = Inputs::new();
    let path = inputs.write(
        "runoff.dat",
        "Runoff per subbasin\nSubasin-ID\tVolume\tPeak\n1\t100\t5\n",
    );

    let mut store = TableStore::new();
    store.load(FileRole::Runoff, &path).unwrap();
    let runoff = store.get(FileRole::Runoff).unwrap();
    assert_eq!(runoff.ids(), &[SubbasinId::new(1)]);
    assert_eq!(runoff.value(0, 0), Some(100.0));
}

#[test]
fn test_json_config_drives_run() {
    let inputs = Inputs::new();
    let config_path = inputs.write(
        "cascade.json",
        r#"{
            "simulate_sediment": true,
            "sediment_params": { "mode": "manual", "density": 2.0, "efficiency_percent": 25 },
            "output_name": "scenario"
        }"#,
    );
    let config = CascadeConfig::from_json_file(&config_path).unwrap();
    let store = inputs.store(&[
        FileRole::Reservoir,
        FileRole::Routing,
        FileRole::Runoff,
        FileRole::SedimentYield,
    ]);

    let (outcome, path) = run_and_save(&store, &config, inputs.path()).unwrap();
    assert!(path.ends_with("scenario.dat"));
    let one = outcome.result.get(SubbasinId::new(1)).unwrap();
    assert_eq!(one.sediment_out, Some(2.5));
}

#[test]
fn test_order_is_deterministic() {
    let inputs = Inputs::new();
    let store = inputs.water_store();
    let config = CascadeConfig::default();

    let (first_shed, first) = damcascade::cascade::processing_order(&store, &config).unwrap();
    let (second_shed, second) = damcascade::cascade::processing_order(&store, &config).unwrap();

    let a: Vec<_> = first.ids(&first_shed.network).collect();
    let b: Vec<_> = second.ids(&second_shed.network).collect();
    assert_eq!(a, b);
    assert_eq!(
        a,
        vec![SubbasinId::new(1), SubbasinId::new(2), SubbasinId::new(3)]
    );
}
