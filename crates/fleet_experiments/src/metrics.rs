//! Metrics extraction from finished episodes.
//!
//! An [`EpisodeMetrics`] is read out of a terminated environment; a batch of
//! them collapses into an [`ExperimentSummary`] with average, median and p90
//! statistics over the per-episode figures.

use fleet_core::environment::Environment;

/// Aggregated figures from a single episode.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct EpisodeMetrics {
    /// Number of taxis in the fleet.
    pub num_taxis: usize,
    /// Number of passengers requested at reset.
    pub num_passengers: usize,
    /// Mean odometer reading per taxi.
    pub avg_taxi_distance: f64,
    /// Mean waiting ticks over completed trips.
    pub avg_waiting_ticks: f64,
    /// Mean travel ticks over completed trips.
    pub avg_travel_ticks: f64,
    /// Passengers delivered to their drop-off.
    pub delivered: usize,
    /// Ticks the episode ran for.
    pub ticks: u64,
}

/// Read metrics out of an environment. Meaningful once the episode is done,
/// but safe to call at any tick.
pub fn extract_metrics(env: &Environment) -> EpisodeMetrics {
    let trips = env.completed_trips();
    let delivered = trips.len();
    let (avg_waiting_ticks, avg_travel_ticks) = if delivered > 0 {
        let waiting: u32 = trips.iter().map(|t| t.waiting_ticks).sum();
        let travel: u32 = trips.iter().map(|t| t.travel_ticks).sum();
        (
            waiting as f64 / delivered as f64,
            travel as f64 / delivered as f64,
        )
    } else {
        (0.0, 0.0)
    };

    let num_taxis = env.taxis().len();
    let total_distance: u32 = env.taxis().iter().map(|t| t.distance).sum();
    let avg_taxi_distance = if num_taxis > 0 {
        total_distance as f64 / num_taxis as f64
    } else {
        0.0
    };

    EpisodeMetrics {
        num_taxis,
        num_passengers: delivered + env.passengers().count(),
        avg_taxi_distance,
        avg_waiting_ticks,
        avg_travel_ticks,
        delivered,
        ticks: env.tick(),
    }
}

/// Average, median and p90 statistics over a batch of episodes.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ExperimentSummary {
    pub episodes: usize,
    pub avg_waiting_ticks: f64,
    pub median_waiting_ticks: f64,
    pub p90_waiting_ticks: f64,
    pub avg_travel_ticks: f64,
    pub median_travel_ticks: f64,
    pub p90_travel_ticks: f64,
    pub avg_taxi_distance: f64,
    pub avg_ticks: f64,
    pub total_delivered: usize,
}

/// Calculate statistics from a vector of values.
pub(crate) fn calculate_stats(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let avg = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let median = if sorted.len() % 2 == 0 {
        (sorted[sorted.len() / 2 - 1] + sorted[sorted.len() / 2]) / 2.0
    } else {
        sorted[sorted.len() / 2]
    };
    let p90_idx = ((sorted.len() - 1) as f64 * 0.9) as usize;
    let p90 = sorted[p90_idx.min(sorted.len() - 1)];

    (avg, median, p90)
}

/// Collapse a batch of episodes into one summary.
pub fn summarize(episodes: &[EpisodeMetrics]) -> ExperimentSummary {
    let waiting: Vec<f64> = episodes.iter().map(|e| e.avg_waiting_ticks).collect();
    let travel: Vec<f64> = episodes.iter().map(|e| e.avg_travel_ticks).collect();
    let distance: Vec<f64> = episodes.iter().map(|e| e.avg_taxi_distance).collect();
    let ticks: Vec<f64> = episodes.iter().map(|e| e.ticks as f64).collect();

    let (avg_waiting_ticks, median_waiting_ticks, p90_waiting_ticks) = calculate_stats(&waiting);
    let (avg_travel_ticks, median_travel_ticks, p90_travel_ticks) = calculate_stats(&travel);
    let (avg_taxi_distance, _, _) = calculate_stats(&distance);
    let (avg_ticks, _, _) = calculate_stats(&ticks);

    ExperimentSummary {
        episodes: episodes.len(),
        avg_waiting_ticks,
        median_waiting_ticks,
        p90_waiting_ticks,
        avg_travel_ticks,
        median_travel_ticks,
        p90_travel_ticks,
        avg_taxi_distance,
        avg_ticks,
        total_delivered: episodes.iter().map(|e| e.delivered).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_stats_on_a_ten_point_spread() {
        let values: Vec<f64> = (1..=10).map(|v| (v * 10) as f64).collect();
        let (avg, median, p90) = calculate_stats(&values);
        assert_eq!(avg, 55.0);
        assert_eq!(median, 55.0);
        assert_eq!(p90, 90.0);
    }

    #[test]
    fn calculate_stats_on_empty_input() {
        assert_eq!(calculate_stats(&[]), (0.0, 0.0, 0.0));
    }

    #[test]
    fn summarize_counts_deliveries_across_episodes() {
        let episode = EpisodeMetrics {
            num_taxis: 2,
            num_passengers: 3,
            avg_taxi_distance: 20.0,
            avg_waiting_ticks: 5.0,
            avg_travel_ticks: 7.0,
            delivered: 3,
            ticks: 30,
        };
        let summary = summarize(&[episode, episode]);
        assert_eq!(summary.episodes, 2);
        assert_eq!(summary.total_delivered, 6);
        assert_eq!(summary.avg_waiting_ticks, 5.0);
        assert_eq!(summary.median_travel_ticks, 7.0);
        assert_eq!(summary.avg_taxi_distance, 20.0);
    }

    #[test]
    fn extracted_distance_is_the_per_taxi_mean() {
        use fleet_core::entities::{Action, Passenger, PassengerId, Taxi, TaxiId};
        use fleet_core::environment::Environment;
        use fleet_core::grid::{Direction, Position};
        use fleet_core::test_helpers::ring_map;

        let taxis = vec![
            Taxi::new(TaxiId(0), Position::new(1, 1), Direction::Up),
            Taxi::new(TaxiId(1), Position::new(3, 3), Direction::Up),
        ];
        let passengers = vec![Passenger::new(
            PassengerId(0),
            Position::new(0, 1),
            Position::new(4, 3),
        )];
        let mut env = Environment::from_parts(ring_map(), taxis, passengers);
        // Each taxi issues one directional action: two odometer ticks in
        // total, one per taxi on average.
        env.step(&[Action::Right, Action::Left]).expect("step");

        let metrics = extract_metrics(&env);
        assert_eq!(metrics.avg_taxi_distance, 1.0);
    }
}
