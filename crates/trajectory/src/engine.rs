//! Model dispatch, safety bounds and the computed run.

use projectile_core::constants::{
    DEFAULT_ATOL, DEFAULT_MAX_STEPS, DEFAULT_RTOL, DEFAULT_SAMPLE_COUNT, DEFAULT_T_MAX_S,
    LAUNCH_EPSILON_M,
};
use projectile_core::{ModelKind, SimulationParameters, Trajectory};
use projectile_dynamics::{
    GroundContact, QuadraticDrag, SteppingLimits, StepStop, ground_event_config, step_until_ground,
};
use projectile_integrator::IntegrationError;
use serde::Serialize;

use crate::adapter::{IntegratorAdapter, resample};
use crate::error::TrajectoryError;
use crate::metrics::{self, TrajectoryMetrics, TrajectorySeries};
use crate::validation::validate;

/// Knobs shared by every run of an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Simulated time after which a flight is declared degenerate (s).
    pub t_max: f64,
    /// Evenly spaced output samples for the ODE path.
    pub samples: usize,
    /// Closed-form stepping cap.
    pub max_steps: usize,
    pub rtol: f64,
    pub atol: f64,
    /// Initial height of the ODE path (m).
    pub launch_height: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            t_max: DEFAULT_T_MAX_S,
            samples: DEFAULT_SAMPLE_COUNT,
            max_steps: DEFAULT_MAX_STEPS,
            rtol: DEFAULT_RTOL,
            atol: DEFAULT_ATOL,
            launch_height: LAUNCH_EPSILON_M,
        }
    }
}

impl EngineOptions {
    pub fn validate(&self) -> Result<(), TrajectoryError> {
        if !(self.t_max.is_finite() && self.t_max > 0.0) {
            return Err(TrajectoryError::invalid(
                "t_max",
                self.t_max,
                "time bound must be positive and finite",
            ));
        }
        if self.samples < 2 {
            return Err(TrajectoryError::invalid(
                "samples",
                self.samples as f64,
                "at least two samples are required",
            ));
        }
        if self.max_steps == 0 {
            return Err(TrajectoryError::invalid(
                "max_steps",
                0.0,
                "step bound must be positive",
            ));
        }
        for (name, value) in [("rtol", self.rtol), ("atol", self.atol)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TrajectoryError::invalid(
                    name,
                    value,
                    "tolerance must be positive and finite",
                ));
            }
        }
        if !(self.launch_height.is_finite() && self.launch_height >= 0.0) {
            return Err(TrajectoryError::invalid(
                "launch_height",
                self.launch_height,
                "launch height must be finite and not negative",
            ));
        }
        Ok(())
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The ground was reached.
    GroundImpact,
    /// A time or step bound stopped the run at `t_bound` before ground contact.
    SafetyBound { t_bound: f64 },
}

/// Immutable result of one computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryRun {
    pub model: ModelKind,
    pub parameters: SimulationParameters,
    pub trajectory: Trajectory,
    pub metrics: TrajectoryMetrics,
    pub outcome: Outcome,
}

impl TrajectoryRun {
    /// True when a safety bound, not the ground, ended the flight.
    pub fn is_degenerate(&self) -> bool {
        matches!(self.outcome, Outcome::SafetyBound { .. })
    }

    /// Reject degenerate runs for callers that need a complete flight.
    pub fn into_complete(self) -> Result<Self, TrajectoryError> {
        match self.outcome {
            Outcome::GroundImpact => Ok(self),
            Outcome::SafetyBound { t_bound } => {
                Err(TrajectoryError::NoGroundImpactDetected { t_bound })
            }
        }
    }

    pub fn series(&self) -> TrajectorySeries<'_> {
        TrajectorySeries::new(&self.trajectory)
    }
}

/// Stateless trajectory computation for either model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrajectoryEngine {
    options: EngineOptions,
}

impl TrajectoryEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Validate `params`, run the selected model, and derive metrics.
    pub fn compute(
        &self,
        params: &SimulationParameters,
        model: ModelKind,
    ) -> Result<TrajectoryRun, TrajectoryError> {
        self.options.validate()?;
        validate(params, model)?;

        let (trajectory, outcome) = match model {
            ModelKind::LinearClosedForm => self.closed_form(params)?,
            ModelKind::QuadraticNumeric => self.numeric(params)?,
        };
        let metrics = metrics::derive(&trajectory);

        Ok(TrajectoryRun {
            model,
            parameters: *params,
            trajectory,
            metrics,
            outcome,
        })
    }

    fn closed_form(
        &self,
        params: &SimulationParameters,
    ) -> Result<(Trajectory, Outcome), TrajectoryError> {
        let limits = SteppingLimits {
            t_max: self.options.t_max,
            max_steps: self.options.max_steps,
        };
        let path = step_until_ground(params, limits);
        let outcome = match path.stop {
            StepStop::GroundContact => Outcome::GroundImpact,
            StepStop::TimeBound { t } | StepStop::StepBound { t } => {
                Outcome::SafetyBound { t_bound: t }
            }
            StepStop::NonFinite { t } => {
                return Err(IntegrationError::NonFiniteState { t }.into());
            }
        };
        let trajectory =
            Trajectory::from_samples(path.samples).ok_or(TrajectoryError::EmptyTrajectory)?;
        Ok((trajectory, outcome))
    }

    fn numeric(
        &self,
        params: &SimulationParameters,
    ) -> Result<(Trajectory, Outcome), TrajectoryError> {
        let ode = QuadraticDrag::new(params);
        let initial_state = QuadraticDrag::initial_state(params, self.options.launch_height);
        let adapter =
            IntegratorAdapter::new(self.options.rtol, self.options.atol, ground_event_config());

        let flight = adapter.integrate(&ode, &initial_state, &GroundContact, self.options.t_max)?;
        let outcome = if flight.hit_ground() {
            Outcome::GroundImpact
        } else {
            Outcome::SafetyBound {
                t_bound: flight.t_end,
            }
        };
        let samples = resample(&flight, self.options.samples)?;
        let trajectory =
            Trajectory::from_samples(samples).ok_or(TrajectoryError::EmptyTrajectory)?;
        Ok((trajectory, outcome))
    }
}

/// Compute one trajectory with default engine options.
#[allow(clippy::too_many_arguments)]
pub fn compute_trajectory(
    model: ModelKind,
    v0_m_s: f64,
    angle_deg: f64,
    drag_coefficient: f64,
    mass_kg: f64,
    gravity_m_s2: f64,
    dt_s: f64,
    speed_factor: f64,
) -> Result<TrajectoryRun, TrajectoryError> {
    let params = SimulationParameters {
        v0_m_s,
        angle_deg,
        drag_coefficient,
        mass_kg,
        gravity_m_s2,
        dt_s,
        speed_factor,
    };
    TrajectoryEngine::default().compute(&params, model)
}
