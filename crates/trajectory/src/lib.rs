//! Trajectory engine for the Projectile Calculator.
//!
//! [`TrajectoryEngine::compute`] validates a parameter set, dispatches to the
//! closed-form or numerical model, bounds the run in time and steps, and
//! derives summary metrics. [`TrajectoryCache`] and [`RunHistory`] are
//! optional layers for callers that repeat or compare runs.

pub mod adapter;
pub mod cache;
pub mod engine;
pub mod error;
pub mod history;
pub mod metrics;
pub mod validation;

pub use adapter::{IntegratedFlight, IntegratorAdapter, resample};
pub use cache::TrajectoryCache;
pub use engine::{EngineOptions, Outcome, TrajectoryEngine, TrajectoryRun, compute_trajectory};
pub use error::TrajectoryError;
pub use history::{HistoryEntry, RunHistory};
pub use metrics::{SeriesPoint, TrajectoryMetrics, TrajectorySeries, derive};
pub use validation::validate;
