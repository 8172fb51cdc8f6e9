use dofgraph::config::{load_config_from_file, load_config_from_str, DofHandlerConfig};
use dofgraph::reorder::DisconnectedPolicy;
use dofgraph::BasisOrder;
use std::path::PathBuf;

#[test]
fn config_round_trips_through_json() {
    let config = DofHandlerConfig {
        order: BasisOrder::CUBIC,
        renumber: true,
        disconnected_policy: DisconnectedPolicy::Reject,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(json, r#"{"order":3,"renumber":true,"disconnected_policy":"reject"}"#);
    assert_eq!(load_config_from_str(&json).unwrap(), config);
}

#[test]
fn load_config_from_file_reports_missing_file() {
    let path = PathBuf::from("data/unit_tests/config/does_not_exist.json");
    let error = load_config_from_file(&path).unwrap_err();
    assert!(format!("{:?}", error).contains("failed to read config file"));
}

#[test]
fn load_config_from_file_reads_json() {
    let dir = std::env::temp_dir().join("dofgraph_config_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("handler.json");
    std::fs::write(&path, r#"{ "order": 2, "renumber": true }"#).unwrap();

    let config = load_config_from_file(&path).unwrap();
    assert_eq!(config.order, BasisOrder::QUADRATIC);
    assert!(config.renumber);
    assert_eq!(config.disconnected_policy, DisconnectedPolicy::Consecutive);
}
