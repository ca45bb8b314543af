//! Summary metrics and derived time series for a computed trajectory.

use projectile_core::vector::{self, Vector2};
use projectile_core::{Trajectory, TrajectorySample};
use serde::Serialize;

/// Scalar summary of one flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryMetrics {
    pub max_height_m: f64,
    pub range_m: f64,
    pub flight_time_s: f64,
    pub final_speed_m_s: f64,
}

/// Compute max height, range, flight time and final speed.
///
/// Final speed uses the tracked velocity of the last sample when present and
/// otherwise a backward difference over the last two positions.
pub fn derive(trajectory: &Trajectory) -> TrajectoryMetrics {
    let max_height_m = trajectory
        .iter()
        .map(|s| s.y)
        .fold(f64::NEG_INFINITY, f64::max);
    let last = trajectory.last();

    TrajectoryMetrics {
        max_height_m,
        range_m: last.x,
        flight_time_s: last.t,
        final_speed_m_s: final_speed(trajectory.samples()),
    }
}

fn final_speed(samples: &[TrajectorySample]) -> f64 {
    match samples {
        [] => 0.0,
        [.., last] if last.velocity.is_some() => last.speed().unwrap_or(0.0),
        [only] => only.speed().unwrap_or(0.0),
        [.., prev, last] => {
            let dt = last.t - prev.t;
            if dt > 0.0 {
                vector::norm(&vector::sub(&last.position(), &prev.position())) / dt
            } else {
                0.0
            }
        }
    }
}

/// One row of the derived series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub t: f64,
    pub speed_m_s: f64,
    pub acceleration: Vector2,
    pub acceleration_m_s2: f64,
}

/// Speed and acceleration over time, recomputed on every call.
///
/// Velocity comes from the samples when tracked, otherwise from differencing
/// positions. Derivatives use central differences in the interior and
/// one-sided differences at both ends.
#[derive(Debug, Clone, Copy)]
pub struct TrajectorySeries<'a> {
    trajectory: &'a Trajectory,
}

impl<'a> TrajectorySeries<'a> {
    pub fn new(trajectory: &'a Trajectory) -> Self {
        Self { trajectory }
    }

    pub fn times(&self) -> Vec<f64> {
        self.trajectory.iter().map(|s| s.t).collect()
    }

    pub fn velocities(&self) -> Vec<Vector2> {
        if self.trajectory.tracks_velocity() {
            self.trajectory
                .iter()
                .map(|s| s.velocity.unwrap_or([0.0, 0.0]))
                .collect()
        } else {
            let positions: Vec<Vector2> = self.trajectory.iter().map(|s| s.position()).collect();
            gradient(&self.times(), &positions)
        }
    }

    pub fn speed(&self) -> Vec<f64> {
        self.velocities().iter().map(vector::norm).collect()
    }

    /// Per-component acceleration `(ax, ay)`.
    pub fn acceleration(&self) -> Vec<Vector2> {
        gradient(&self.times(), &self.velocities())
    }

    /// `sqrt(ax² + ay²)` per sample.
    pub fn acceleration_magnitude(&self) -> Vec<f64> {
        self.acceleration().iter().map(vector::norm).collect()
    }

    pub fn points(&self) -> Vec<SeriesPoint> {
        let times = self.times();
        let velocities = self.velocities();
        let accelerations = gradient(&times, &velocities);
        times
            .into_iter()
            .zip(velocities)
            .zip(accelerations)
            .map(|((t, v), a)| SeriesPoint {
                t,
                speed_m_s: vector::norm(&v),
                acceleration: a,
                acceleration_m_s2: vector::norm(&a),
            })
            .collect()
    }
}

/// Time derivative of `values` sampled at `times`.
fn gradient(times: &[f64], values: &[Vector2]) -> Vec<Vector2> {
    let n = values.len().min(times.len());
    if n < 2 {
        return vec![[0.0, 0.0]; n];
    }
    let slope = |hi: usize, lo: usize| -> Vector2 {
        let dt = times[hi] - times[lo];
        if dt > 0.0 {
            vector::scale(&vector::sub(&values[hi], &values[lo]), 1.0 / dt)
        } else {
            [0.0, 0.0]
        }
    };

    (0..n)
        .map(|i| match i {
            0 => slope(1, 0),
            i if i == n - 1 => slope(n - 1, n - 2),
            i => slope(i + 1, i - 1),
        })
        .collect()
}
