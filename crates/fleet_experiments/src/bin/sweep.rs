//! Run the stock policy comparison sweep and export the results.
//!
//! ```text
//! cargo run --release --bin sweep
//! ```
//!
//! Writes `sweep.csv` and `sweep.json` into `experiment-results/`.

use std::fs;
use std::path::Path;

use env_logger::Env;
use fleet_core::dispatch::PolicyKind;
use fleet_experiments::{
    export_sweep_csv, export_to_json, run_parallel_experiments, ParameterSpace,
};

const EPISODES_PER_COMBINATION: usize = 20;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let space = ParameterSpace::grid()
        .num_taxis(vec![1, 2, 4])
        .num_passengers(vec![3, 6, 12])
        .policies(vec![
            PolicyKind::Nearest,
            PolicyKind::Quadrant,
            PolicyKind::Identity,
            PolicyKind::Greedy,
            PolicyKind::Random,
        ])
        .episodes(EPISODES_PER_COMBINATION);

    let parameter_sets = space.generate();
    log::info!(
        "running {} parameter combinations x {EPISODES_PER_COMBINATION} episodes",
        parameter_sets.len()
    );

    let summaries = run_parallel_experiments(&parameter_sets, None)?;

    let out_dir = Path::new("experiment-results");
    fs::create_dir_all(out_dir)?;
    export_sweep_csv(&out_dir.join("sweep.csv"), &parameter_sets, &summaries)?;
    export_to_json(&out_dir.join("sweep.json"), &parameter_sets, &summaries)?;

    for (set, summary) in parameter_sets.iter().zip(summaries.iter()) {
        log::info!(
            "{}: delivered {} of {} over {} episodes, avg waiting {:.1} ticks",
            set.experiment_id,
            summary.total_delivered,
            set.params.num_passengers * summary.episodes,
            summary.episodes,
            summary.avg_waiting_ticks,
        );
    }
    log::info!("results written to {}", out_dir.display());

    Ok(())
}
