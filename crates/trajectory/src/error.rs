use projectile_integrator::IntegrationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("numerical integration failed: {0}")]
    NumericalFailure(#[from] IntegrationError),
    #[error("no ground impact detected before t = {t_bound} s")]
    NoGroundImpactDetected { t_bound: f64 },
    #[error("model produced no samples")]
    EmptyTrajectory,
}

impl TrajectoryError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        TrajectoryError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}
