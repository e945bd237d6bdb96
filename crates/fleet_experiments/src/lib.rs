//! Parallel experimentation framework for dispatch policy sweeps.
//!
//! This crate runs many fleet_core episodes with varying parameters,
//! extracts per-episode metrics, and aggregates them to compare how the
//! dispatch policies trade passenger waiting time against distance driven.
//!
//! # Quick Start
//!
//! ```no_run
//! use fleet_core::dispatch::PolicyKind;
//! use fleet_experiments::{run_parallel_experiments, ParameterSpace};
//!
//! // Define parameter space (grid search)
//! let space = ParameterSpace::grid()
//!     .num_taxis(vec![2, 4])
//!     .num_passengers(vec![5, 10])
//!     .policies(vec![PolicyKind::Nearest, PolicyKind::Greedy])
//!     .episodes(20);
//!
//! // Generate parameter sets and run them in parallel
//! let parameter_sets = space.generate();
//! let summaries = run_parallel_experiments(&parameter_sets, None).unwrap();
//! ```

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;

pub use export::{export_episodes_csv, export_sweep_csv, export_to_json};
pub use metrics::{extract_metrics, summarize, EpisodeMetrics, ExperimentSummary};
pub use parameters::{ParameterSet, ParameterSpace};
pub use runner::{run_episode, run_parallel_experiments, MAX_TICKS};
