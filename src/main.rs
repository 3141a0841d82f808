use std::time::Instant;
use team_elo_sim::{Simulation, SimulationConfig, SimulationError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), SimulationError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();

    let config = SimulationConfig::default();
    let seed: u64 = rand::random();
    let mut sim = Simulation::new(config, seed)?;
    sim.run_to_completion()?;

    if sim.config.display_all_players {
        for player in sim.population.players_by_skill() {
            println!("{}", player);
        }
    }

    if sim.config.display_summary {
        let report = sim.report();
        for level in &report.levels {
            println!("{}", level);
        }
        tracing::info!(correlation = report.correlation, seed, "rating recovery");
    }

    println!("{:?}", start.elapsed());
    Ok(())
}
