#![cfg(target_arch = "wasm32")]

use team_elo_sim::{run_experiment, SimulationEngine};
use wasm_bindgen_test::*;

#[wasm_bindgen_test]
fn engine_runs_and_reports() {
    let config = r#"{"total_rounds": 200, "total_players": 60, "team_size": 3}"#;
    let mut engine = SimulationEngine::new_with_config(1, config).unwrap();
    engine.run_to_completion().unwrap();
    assert_eq!(engine.get_rounds_played(), 200);

    let report: serde_json::Value = serde_json::from_str(&engine.get_report().unwrap()).unwrap();
    assert_eq!(report["levels"].as_array().unwrap().len(), 11);
}

#[wasm_bindgen_test]
fn engine_rejects_bad_config() {
    let config = r#"{"total_players": 4, "team_size": 3}"#;
    assert!(SimulationEngine::new_with_config(1, config).is_err());
}

#[wasm_bindgen_test]
fn experiment_sweeps_values() {
    let base = r#"{"total_rounds": 50, "total_players": 20, "team_size": 2}"#;
    let json = run_experiment(base, "k_factor", "[16, 32]", 3).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["results"].as_array().unwrap().len(), 2);
}
