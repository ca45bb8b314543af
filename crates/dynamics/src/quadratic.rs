//! Quadratic drag as a first-order ODE system.
//!
//! State is `[x, y, vx, vy]`. With `v = |(vx, vy)|` the drag deceleration is
//! `(b / m) v` along each velocity component:
//!
//! ```text
//! x' = vx
//! y' = vy
//! vx' = -(b/m) v vx
//! vy' = -g - (b/m) v vy
//! ```

use projectile_core::SimulationParameters;
use projectile_core::constants::LAUNCH_EPSILON_M;
use projectile_integrator::{EventConfig, EventDirection, EventFunction, OdeSystem};

/// Equations of motion for one launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticDrag {
    drag_per_mass: f64,
    gravity: f64,
}

impl QuadraticDrag {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            drag_per_mass: params.drag_coefficient / params.mass_kg,
            gravity: params.gravity_m_s2,
        }
    }

    /// Launch state, lifted `launch_height` metres so the ground event does
    /// not trigger at `t = 0`.
    pub fn initial_state(params: &SimulationParameters, launch_height: f64) -> [f64; 4] {
        let [vx, vy] = params.launch_velocity();
        [0.0, launch_height, vx, vy]
    }

    /// Launch state at the default epsilon height.
    pub fn launch_state(params: &SimulationParameters) -> [f64; 4] {
        Self::initial_state(params, LAUNCH_EPSILON_M)
    }

    /// Acceleration `(ax, ay)` for velocity `(vx, vy)`.
    pub fn acceleration(&self, vx: f64, vy: f64) -> [f64; 2] {
        let speed = vx.hypot(vy);
        [
            -self.drag_per_mass * speed * vx,
            -self.gravity - self.drag_per_mass * speed * vy,
        ]
    }
}

impl OdeSystem<4> for QuadraticDrag {
    fn rhs(&self, _t: f64, y: &[f64; 4], dydt: &mut [f64; 4]) {
        let [ax, ay] = self.acceleration(y[2], y[3]);
        dydt[0] = y[2];
        dydt[1] = y[3];
        dydt[2] = ax;
        dydt[3] = ay;
    }
}

/// Ground plane `y = 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundContact;

impl EventFunction<4> for GroundContact {
    fn eval(&self, _t: f64, y: &[f64; 4]) -> f64 {
        y[1]
    }
}

/// Ground contact only counts while descending.
pub fn ground_event_config() -> EventConfig {
    EventConfig::new(EventDirection::Falling)
}
