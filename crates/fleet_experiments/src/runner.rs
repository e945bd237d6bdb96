//! Episode execution, sequential batches and rayon-parallel sweeps.

use fleet_core::dispatch::build_policy;
use fleet_core::error::SimulationError;
use fleet_core::scenario::{build_environment, ScenarioParams};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::metrics::{extract_metrics, summarize, EpisodeMetrics, ExperimentSummary};
use crate::parameters::ParameterSet;

/// Hard tick limit per episode. A policy that never delivers (Random, or a
/// partition with no matching passengers) would otherwise loop forever.
pub const MAX_TICKS: u64 = 10_000;

/// Run one episode to completion or to [`MAX_TICKS`].
pub fn run_episode(params: &ScenarioParams) -> Result<EpisodeMetrics, SimulationError> {
    let mut env = build_environment(params);
    let mut policy = build_policy(params.policy, params.seed);
    let mut observation = env.reset()?;
    for _ in 0..MAX_TICKS {
        let actions = policy.decide_all(&observation);
        let step = env.step(&actions)?;
        observation = step.observation;
        if step.done {
            break;
        }
    }
    if !env.done() {
        log::warn!(
            "episode hit the {MAX_TICKS}-tick limit with {} passengers undelivered",
            observation.passengers.len()
        );
    }
    Ok(extract_metrics(&env))
}

/// Run a parameter set's episodes sequentially, reseeding each episode so
/// they differ but the batch as a whole stays reproducible.
pub fn run_batch(param_set: &ParameterSet) -> Result<Vec<EpisodeMetrics>, SimulationError> {
    let base = param_set.scenario_params();
    (0..param_set.episodes)
        .map(|episode| {
            let params = match base.seed {
                Some(seed) => base.with_seed(seed.wrapping_add(episode as u64)),
                None => base,
            };
            run_episode(&params)
        })
        .collect()
}

/// Run multiple parameter sets in parallel.
///
/// Uses rayon to execute sweeps concurrently across available CPU cores.
/// Results come back in the same order as the input parameter sets.
pub fn run_parallel_experiments(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
) -> Result<Vec<ExperimentSummary>, SimulationError> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Same as [`run_parallel_experiments`] with an optional progress bar.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: &[ParameterSet],
    num_threads: Option<usize>,
    show_progress: bool,
) -> Result<Vec<ExperimentSummary>, SimulationError> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = num_threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build().expect("Failed to create thread pool");

    let pb_clone = pb.clone();
    let results: Result<Vec<ExperimentSummary>, SimulationError> = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let episodes = run_batch(param_set)?;
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                Ok(summarize(&episodes))
            })
            .collect()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}
