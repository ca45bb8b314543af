//! Closed-form flight under linear drag.
//!
//! Drag force `-k1 * v` decouples the horizontal and vertical motion. The
//! trajectory is evaluated from the closed form
//!
//! ```text
//! x(t) = (v0 m / k1) cos θ (1 - e^(-k1 t / m))
//! y(t) = [(v0 m / k1) sin θ + m g / k1] (1 - e^(-k1 t / m)) - m g t / k1
//! ```
//!
//! The formulas divide by `k1`; callers validate `k1 > 0` before building a
//! [`LinearDrag`].

use projectile_core::constants::{DEFAULT_MAX_STEPS, DEFAULT_T_MAX_S};
use projectile_core::vector::Vector2;
use projectile_core::{SimulationParameters, TrajectorySample};

/// Precomputed closed-form coefficients for one launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDrag {
    /// Terminal horizontal displacement `v0 m cos θ / k1`.
    x_scale: f64,
    /// Vertical amplitude `v0 m sin θ / k1 + m g / k1`.
    y_scale: f64,
    /// Sink coefficient `m g / k1`.
    sink_rate: f64,
    /// Inverse time constant `k1 / m`.
    decay: f64,
}

impl LinearDrag {
    pub fn new(params: &SimulationParameters) -> Self {
        let theta = params.angle_rad();
        let m = params.mass_kg;
        let k1 = params.drag_coefficient;
        let reach = params.v0_m_s * m / k1;
        let sink_rate = m * params.gravity_m_s2 / k1;
        Self {
            x_scale: reach * theta.cos(),
            y_scale: reach * theta.sin() + sink_rate,
            sink_rate,
            decay: k1 / m,
        }
    }

    /// False when `v0 m / k1` or `m g / k1` overflowed.
    pub fn is_finite(&self) -> bool {
        [self.x_scale, self.y_scale, self.sink_rate, self.decay]
            .iter()
            .all(|c| c.is_finite())
    }

    /// Position `(x, y)` in metres at `t >= 0` seconds.
    pub fn position_at(&self, t: f64) -> Vector2 {
        let relaxed = -(-self.decay * t).exp_m1();
        [
            self.x_scale * relaxed,
            self.y_scale * relaxed - self.sink_rate * t,
        ]
    }
}

/// Position at `t` for `params`; see [`LinearDrag::position_at`].
pub fn position_at(t: f64, params: &SimulationParameters) -> Vector2 {
    LinearDrag::new(params).position_at(t)
}

/// Hard limits that keep stepping finite when the ground is never reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteppingLimits {
    pub t_max: f64,
    pub max_steps: usize,
}

impl Default for SteppingLimits {
    fn default() -> Self {
        Self {
            t_max: DEFAULT_T_MAX_S,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Why stepping stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepStop {
    /// Height went negative; the final sample sits on the ground.
    GroundContact,
    /// The next grid point passes `t_max` with the projectile still airborne.
    TimeBound { t: f64 },
    /// `max_steps` samples were produced.
    StepBound { t: f64 },
    /// The closed form overflowed at `t`.
    NonFinite { t: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SteppedPath {
    pub samples: Vec<TrajectorySample>,
    pub stop: StepStop,
}

/// Sample the closed form every `dt * speed_factor` seconds from launch.
///
/// The first sample with `y < 0` (after `t = 0`) is appended with `y = 0`
/// and ends the path, even when it lies past `t_max`. The time bound only
/// stops a projectile that is still airborne at the next grid point. Sample
/// times are `n * interval`, so reruns are bitwise identical.
pub fn step_until_ground(params: &SimulationParameters, limits: SteppingLimits) -> SteppedPath {
    let model = LinearDrag::new(params);
    let interval = params.step_interval();
    let mut samples: Vec<TrajectorySample> = Vec::new();

    if !model.is_finite() {
        return SteppedPath {
            samples,
            stop: StepStop::NonFinite { t: 0.0 },
        };
    }

    let mut step: usize = 0;
    loop {
        let t = step as f64 * interval;
        let [x, y] = model.position_at(t);
        if !(x.is_finite() && y.is_finite()) {
            return SteppedPath {
                samples,
                stop: StepStop::NonFinite { t },
            };
        }

        if let Some(prev_t) = samples.last().map(|s| s.t) {
            if y < 0.0 {
                samples.push(TrajectorySample {
                    t,
                    x,
                    y: 0.0,
                    velocity: None,
                });
                return SteppedPath {
                    samples,
                    stop: StepStop::GroundContact,
                };
            }
            if t > limits.t_max || t <= prev_t {
                return SteppedPath {
                    samples,
                    stop: StepStop::TimeBound { t: prev_t },
                };
            }
        }

        samples.push(TrajectorySample {
            t,
            x,
            y,
            velocity: None,
        });
        step += 1;

        if step >= limits.max_steps {
            return SteppedPath {
                samples,
                stop: StepStop::StepBound { t },
            };
        }
    }
}
