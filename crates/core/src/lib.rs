//! Core constants, vector helpers, and the trajectory data model shared by the
//! Projectile Calculator workspace.

/// Physical constants and engine defaults expressed in SI units.
pub mod constants {
    /// Surface gravity used by the shipped presets (m/s²).
    pub const EARTH_GRAVITY_M_S2: f64 = 9.81;
    /// Upper bound on simulated flight time before a run is declared degenerate (s).
    pub const DEFAULT_T_MAX_S: f64 = 1_000.0;
    /// Number of evenly spaced samples produced by the numerical path.
    pub const DEFAULT_SAMPLE_COUNT: usize = 300;
    /// Upper bound on closed-form stepping iterations.
    pub const DEFAULT_MAX_STEPS: usize = 1_000_000;
    /// Closed-form stepping interval (s).
    pub const DEFAULT_DT_S: f64 = 0.005;
    /// Launch height for the numerical path, keeps the ground event from firing at t = 0 (m).
    pub const LAUNCH_EPSILON_M: f64 = 1e-6;
    /// Relative tolerance for the adaptive integrator.
    pub const DEFAULT_RTOL: f64 = 1e-7;
    /// Absolute tolerance for the adaptive integrator.
    pub const DEFAULT_ATOL: f64 = 1e-9;
}

/// Minimal planar vector helpers to avoid ad-hoc `[f64; 2]` math everywhere.
pub mod vector {
    /// Alias for a 2D vector in metres or m/s depending on context.
    pub type Vector2 = [f64; 2];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector2) -> f64 {
        v[0].hypot(v[1])
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] - b[0], a[1] - b[1]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector2, s: f64) -> Vector2 {
        [v[0] * s, v[1] * s]
    }
}

/// Launch parameters and model selection.
pub mod model {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Physical model used to generate a trajectory.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ModelKind {
        /// Drag proportional to velocity, solved in closed form and stepped at `dt`.
        #[serde(alias = "linear")]
        LinearClosedForm,
        /// Drag proportional to speed times velocity, integrated numerically.
        #[serde(alias = "quadratic")]
        QuadraticNumeric,
    }

    impl ModelKind {
        /// Short label used in tables and file names.
        pub fn label(self) -> &'static str {
            match self {
                ModelKind::LinearClosedForm => "linear",
                ModelKind::QuadraticNumeric => "quadratic",
            }
        }
    }

    impl fmt::Display for ModelKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    /// Immutable launch description for a single run.
    ///
    /// `drag_coefficient` is `k1` (kg/s) for the linear model and `b` (N·s²/m²)
    /// for the quadratic model. `dt_s` is only consumed by closed-form stepping.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct SimulationParameters {
        pub v0_m_s: f64,
        pub angle_deg: f64,
        pub drag_coefficient: f64,
        pub mass_kg: f64,
        pub gravity_m_s2: f64,
        pub dt_s: f64,
        pub speed_factor: f64,
    }

    impl SimulationParameters {
        /// Launch angle in radians.
        #[inline]
        pub fn angle_rad(&self) -> f64 {
            self.angle_deg.to_radians()
        }

        /// Initial velocity components `(vx, vy)` in m/s.
        pub fn launch_velocity(&self) -> [f64; 2] {
            let theta = self.angle_rad();
            [self.v0_m_s * theta.cos(), self.v0_m_s * theta.sin()]
        }

        /// Time advanced per closed-form step (s).
        #[inline]
        pub fn step_interval(&self) -> f64 {
            self.dt_s * self.speed_factor
        }
    }
}

/// Trajectory samples and the immutable sequence produced by one run.
pub mod sample {
    use serde::Serialize;

    use crate::vector::{self, Vector2};

    /// One point of a trajectory.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct TrajectorySample {
        pub t: f64,
        pub x: f64,
        pub y: f64,
        /// `(vx, vy)` when the model tracks velocity.
        pub velocity: Option<Vector2>,
    }

    impl TrajectorySample {
        pub fn position(&self) -> Vector2 {
            [self.x, self.y]
        }

        /// Speed magnitude if velocity is tracked.
        pub fn speed(&self) -> Option<f64> {
            self.velocity.as_ref().map(vector::norm)
        }
    }

    /// Time-ordered, non-empty sequence of samples.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    #[serde(transparent)]
    pub struct Trajectory {
        samples: Vec<TrajectorySample>,
    }

    impl Trajectory {
        /// Wrap a sample list; returns `None` when it is empty.
        pub fn from_samples(samples: Vec<TrajectorySample>) -> Option<Self> {
            if samples.is_empty() {
                None
            } else {
                Some(Self { samples })
            }
        }

        pub fn samples(&self) -> &[TrajectorySample] {
            &self.samples
        }

        pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
            self.samples.iter()
        }

        pub fn len(&self) -> usize {
            self.samples.len()
        }

        /// Always false; kept for API symmetry with slices.
        pub fn is_empty(&self) -> bool {
            self.samples.is_empty()
        }

        pub fn first(&self) -> &TrajectorySample {
            &self.samples[0]
        }

        pub fn last(&self) -> &TrajectorySample {
            // non-empty by construction
            &self.samples[self.samples.len() - 1]
        }

        /// True when every sample carries a velocity.
        pub fn tracks_velocity(&self) -> bool {
            self.samples.iter().all(|s| s.velocity.is_some())
        }
    }

    impl<'a> IntoIterator for &'a Trajectory {
        type Item = &'a TrajectorySample;
        type IntoIter = std::slice::Iter<'a, TrajectorySample>;

        fn into_iter(self) -> Self::IntoIter {
            self.samples.iter()
        }
    }
}

pub use model::{ModelKind, SimulationParameters};
pub use sample::{Trajectory, TrajectorySample};
