//! Result export to CSV and JSON.

use std::fs::File;
use std::path::Path;

use crate::metrics::{EpisodeMetrics, ExperimentSummary};
use crate::parameters::ParameterSet;

/// Write one CSV row per episode of a single experiment.
pub fn export_episodes_csv(
    path: &Path,
    episodes: &[EpisodeMetrics],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(File::create(path)?);

    wtr.write_record(["taxi_distance", "waiting_ticks", "travel_ticks", "n_ticks"])?;
    for episode in episodes {
        wtr.write_record([
            episode.avg_taxi_distance.to_string(),
            episode.avg_waiting_ticks.to_string(),
            episode.avg_travel_ticks.to_string(),
            episode.ticks.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write one CSV row per parameter set, pairing the combination with its
/// summary statistics.
pub fn export_sweep_csv(
    path: &Path,
    parameter_sets: &[ParameterSet],
    summaries: &[ExperimentSummary],
) -> Result<(), Box<dyn std::error::Error>> {
    check_lengths(parameter_sets, summaries)?;
    let mut wtr = csv::Writer::from_writer(File::create(path)?);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "num_taxis",
        "num_passengers",
        "policy",
        "episodes",
        "avg_waiting_ticks",
        "median_waiting_ticks",
        "p90_waiting_ticks",
        "avg_travel_ticks",
        "median_travel_ticks",
        "p90_travel_ticks",
        "avg_taxi_distance",
        "avg_ticks",
        "total_delivered",
    ])?;

    for (set, summary) in parameter_sets.iter().zip(summaries.iter()) {
        wtr.write_record([
            set.experiment_id.clone(),
            set.run_id.to_string(),
            set.params.num_taxis.to_string(),
            set.params.num_passengers.to_string(),
            format!("{:?}", set.params.policy),
            summary.episodes.to_string(),
            summary.avg_waiting_ticks.to_string(),
            summary.median_waiting_ticks.to_string(),
            summary.p90_waiting_ticks.to_string(),
            summary.avg_travel_ticks.to_string(),
            summary.median_travel_ticks.to_string(),
            summary.p90_travel_ticks.to_string(),
            summary.avg_taxi_distance.to_string(),
            summary.avg_ticks.to_string(),
            summary.total_delivered.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the full sweep as a JSON array of `{parameters, summary}` records.
pub fn export_to_json(
    path: &Path,
    parameter_sets: &[ParameterSet],
    summaries: &[ExperimentSummary],
) -> Result<(), Box<dyn std::error::Error>> {
    check_lengths(parameter_sets, summaries)?;

    let records: Vec<serde_json::Value> = parameter_sets
        .iter()
        .zip(summaries.iter())
        .map(|(set, summary)| {
            serde_json::json!({
                "parameters": set,
                "summary": summary,
            })
        })
        .collect();

    serde_json::to_writer_pretty(File::create(path)?, &records)?;
    Ok(())
}

fn check_lengths(
    parameter_sets: &[ParameterSet],
    summaries: &[ExperimentSummary],
) -> Result<(), Box<dyn std::error::Error>> {
    if parameter_sets.len() != summaries.len() {
        return Err(format!(
            "Summaries length ({}) doesn't match parameter_sets length ({})",
            summaries.len(),
            parameter_sets.len()
        )
        .into());
    }
    Ok(())
}
