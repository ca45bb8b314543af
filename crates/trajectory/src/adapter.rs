//! Drives a planar ODE through the adaptive integrator and turns the dense
//! solution into evenly spaced trajectory samples.
//!
//! States follow the `[x, y, vx, vy]` layout.

use projectile_core::TrajectorySample;
use projectile_integrator::{
    DenseOutput, DormandPrince, EventConfig, EventFunction, EventResult, IntegrationError,
    OdeSystem, Tolerances,
};

/// Dense solution of one flight.
#[derive(Debug, Clone)]
pub struct IntegratedFlight {
    pub dense: DenseOutput<4>,
    /// Located ground contact, `None` when the time bound came first.
    pub impact: Option<EventResult<4>>,
    /// Impact time, or the last integrated time when no event fired.
    pub t_end: f64,
}

impl IntegratedFlight {
    pub fn hit_ground(&self) -> bool {
        self.impact.is_some()
    }
}

/// Integrator settings shared by every flight of an engine.
#[derive(Debug, Clone, Copy)]
pub struct IntegratorAdapter {
    tolerances: Tolerances<4>,
    event: EventConfig,
}

impl IntegratorAdapter {
    pub fn new(rtol: f64, atol: f64, event: EventConfig) -> Self {
        Self {
            tolerances: Tolerances::new(atol, rtol),
            event,
        }
    }

    /// Integrate from `t = 0` until `termination_event` crosses zero in the
    /// configured direction or `t_max` is reached.
    pub fn integrate<S, E>(
        &self,
        ode: &S,
        initial_state: &[f64; 4],
        termination_event: &E,
        t_max: f64,
    ) -> Result<IntegratedFlight, IntegrationError>
    where
        S: OdeSystem<4>,
        E: EventFunction<4>,
    {
        let mut solver = DormandPrince::new(self.tolerances);
        let solution = solver.integrate_to_event(
            ode,
            termination_event,
            &self.event,
            0.0,
            initial_state,
            t_max,
        )?;
        let impact = solution.event().copied();
        let t_end = solution.t_final();
        Ok(IntegratedFlight {
            dense: solution.dense,
            impact,
            t_end,
        })
    }
}

/// Evaluate the dense solution at `count` evenly spaced times on `[0, t_end]`.
///
/// The last sample is taken exactly at `t_end`; when the flight ended on the
/// ground its height is pinned to zero.
pub fn resample(
    flight: &IntegratedFlight,
    count: usize,
) -> Result<Vec<TrajectorySample>, IntegrationError> {
    if count < 2 {
        return Err(IntegrationError::InvalidInput {
            message: format!("resampling needs at least 2 points, got {count}"),
        });
    }

    let t_start = flight.dense.t_start();
    let span = flight.t_end - t_start;
    let last = count - 1;
    let mut samples = Vec::with_capacity(count);

    for i in 0..count {
        let t = if i == last {
            flight.t_end
        } else {
            t_start + span * (i as f64 / last as f64)
        };
        let state = flight
            .dense
            .eval(t)
            .ok_or_else(|| IntegrationError::InvalidInput {
                message: format!("resample time {t} lies outside the integrated span"),
            })?;
        samples.push(TrajectorySample {
            t,
            x: state[0],
            y: state[1],
            velocity: Some([state[2], state[3]]),
        });
    }

    if flight.hit_ground() {
        samples[last].y = 0.0;
    }
    Ok(samples)
}
