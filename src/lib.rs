//! Projectile flight under gravity and air drag.
//!
//! The member crates are re-exported here so front-ends (CLI, plotting, batch
//! drivers) depend on a single library.

pub use projectile_config as config;
pub use projectile_core as model;
pub use projectile_dynamics as dynamics;
pub use projectile_export as export;
pub use projectile_integrator as integrator;
pub use projectile_trajectory as trajectory;

pub use projectile_core::{ModelKind, SimulationParameters, Trajectory, TrajectorySample};
pub use projectile_trajectory::{
    EngineOptions, Outcome, TrajectoryEngine, TrajectoryError, TrajectoryMetrics, TrajectoryRun,
    compute_trajectory,
};
