pub mod error;
pub mod matchmaker;
pub mod outcome;
pub mod population;
pub mod rating;
pub mod report;
pub mod simulation;
pub mod types;

pub use error::SimulationError;
pub use outcome::{Outcome, OutcomeModel};
pub use population::Population;
pub use report::{RatingStats, RunReport, SkillLevelSummary};
pub use simulation::{RoundResult, Simulation, SweepResult};
pub use types::{Player, SimulationConfig, SimulationStats};

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn to_js(err: SimulationError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_config(config_json: &str) -> Result<SimulationConfig, JsValue> {
    serde_json::from_str(config_json)
        .map_err(|e| JsValue::from_str(&format!("Config parse error: {}", e)))
}

/// WASM-exposed simulation wrapper
#[wasm_bindgen]
pub struct SimulationEngine {
    sim: Simulation,
}

#[wasm_bindgen]
impl SimulationEngine {
    /// Create a new simulation with default config
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<SimulationEngine, JsValue> {
        let sim = Simulation::new(SimulationConfig::default(), seed).map_err(to_js)?;
        Ok(SimulationEngine { sim })
    }

    /// Create with custom config
    pub fn new_with_config(seed: u64, config_json: &str) -> Result<SimulationEngine, JsValue> {
        let config = parse_config(config_json)?;
        let sim = Simulation::new(config, seed).map_err(to_js)?;
        Ok(SimulationEngine { sim })
    }

    /// Play one round, returning it as JSON
    pub fn play_round(&mut self) -> Result<String, JsValue> {
        let result = self.sim.play_round().map_err(to_js)?;
        to_json(&result)
    }

    /// Play multiple rounds
    pub fn run(&mut self, rounds: usize) -> Result<(), JsValue> {
        self.sim.run(rounds).map_err(to_js)
    }

    /// Play the rest of the configured rounds and log the wall-clock time
    pub fn run_to_completion(&mut self) -> Result<f64, JsValue> {
        let start = js_sys::Date::now();
        self.sim.run_to_completion().map_err(to_js)?;
        let elapsed_ms = js_sys::Date::now() - start;
        web_sys::console::log_1(&JsValue::from_str(&format!(
            "{} rounds in {:.1} ms",
            self.sim.rounds_played(),
            elapsed_ms
        )));
        Ok(elapsed_ms)
    }

    pub fn get_rounds_played(&self) -> usize {
        self.sim.rounds_played()
    }

    /// Get the per-skill-level report as JSON
    pub fn get_report(&self) -> Result<String, JsValue> {
        to_json(&self.sim.report())
    }

    /// Get every player, highest skill first, as JSON
    pub fn get_players(&self) -> Result<String, JsValue> {
        to_json(&self.sim.population.players_by_skill())
    }

    /// Get statistics JSON
    pub fn get_stats(&self) -> Result<String, JsValue> {
        to_json(&self.sim.stats)
    }

    /// Get current simulation state as JSON
    pub fn get_state(&self) -> Result<String, JsValue> {
        self.sim.get_state_json().map_err(to_js)
    }

    pub fn get_config(&self) -> Result<String, JsValue> {
        to_json(&self.sim.config)
    }

    /// Get default config as JSON
    pub fn get_default_config() -> String {
        serde_json::to_string(&SimulationConfig::default()).unwrap_or_default()
    }
}

/// Run a parameter sweep experiment
#[wasm_bindgen]
pub fn run_experiment(
    base_config_json: &str,
    parameter: &str,
    values_json: &str,
    seed: u64,
) -> Result<String, JsValue> {
    let base_config = parse_config(base_config_json)?;

    let values: Vec<f64> = serde_json::from_str(values_json)
        .map_err(|e| JsValue::from_str(&format!("Values parse error: {}", e)))?;

    let start = js_sys::Date::now();
    let results = simulation::sweep(&base_config, parameter, &values, seed).map_err(to_js)?;

    to_json(&serde_json::json!({
        "parameter": parameter,
        "elapsed_ms": js_sys::Date::now() - start,
        "results": results,
    }))
}
