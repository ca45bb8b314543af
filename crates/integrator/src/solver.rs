//! Adaptive Dormand-Prince 5(4) solver.

use thiserror::Error;

use crate::coefficients::{A, B_ERR, C, EMBEDDED_ORDER, STAGES};
use crate::dense::{DenseOutput, HermiteSegment};
use crate::events::{
    BrentError, BrentSolver, EventConfig, EventFunction, EventResult, sign_change_detected,
};

/// First-order system `dy/dt = f(t, y)` with a fixed-size state.
pub trait OdeSystem<const N: usize> {
    /// Write `f(t, y)` into `dydt`.
    fn rhs(&self, t: f64, y: &[f64; N], dydt: &mut [f64; N]);
}

/// Outcome of a single attempted step.
#[derive(Debug, Clone, Copy)]
pub struct StepResult<const N: usize> {
    pub t: f64,
    /// 5th-order solution at `t`.
    pub y: [f64; N],
    /// Derivative at `(t, y)`; reused as the first stage of the next step.
    pub f: [f64; N],
    /// Scaled error estimate, accepted when `<= 1`.
    pub error: f64,
    pub h_next: f64,
    pub accepted: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub fn_evals: u64,
    pub accepted_steps: u64,
    pub rejected_steps: u64,
}

/// Integral step-size controller: `h_new = safety * h * err^(-1/(q+1))`.
#[derive(Debug, Clone, Copy)]
pub struct StepController {
    pub safety: f64,
    pub max_factor: f64,
    pub min_factor: f64,
    exponent: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            max_factor: 10.0,
            min_factor: 0.2,
            exponent: 1.0 / (f64::from(EMBEDDED_ORDER) + 1.0),
        }
    }
}

impl StepController {
    pub fn compute_factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }
        (self.safety * error.powf(-self.exponent)).clamp(self.min_factor, self.max_factor)
    }
}

/// Mixed absolute/relative error weights: `atol + rtol * max(|y|, |y_new|)`.
#[derive(Debug, Clone, Copy)]
pub struct Tolerances<const N: usize> {
    pub atol: [f64; N],
    pub rtol: [f64; N],
}

impl<const N: usize> Tolerances<N> {
    pub fn new(atol: f64, rtol: f64) -> Self {
        Self {
            atol: [atol; N],
            rtol: [rtol; N],
        }
    }

    fn scale(&self, i: usize, a: f64, b: f64) -> f64 {
        self.atol[i] + self.rtol[i] * a.abs().max(b.abs())
    }

    fn is_valid(&self) -> bool {
        self.atol
            .iter()
            .chain(self.rtol.iter())
            .all(|v| v.is_finite() && *v >= 0.0)
            && (0..N).all(|i| self.atol[i] > 0.0 || self.rtol[i] > 0.0)
    }
}

/// How an integration run ended.
#[derive(Debug, Clone, Copy)]
pub enum IntegrationResult<const N: usize> {
    /// Reached the final time without triggering the event.
    Completed { t: f64, y: [f64; N] },
    /// Stopped at a terminal event.
    Event(EventResult<N>),
}

/// Dense solution plus how the run terminated.
#[derive(Debug, Clone)]
pub struct Solution<const N: usize> {
    pub dense: DenseOutput<N>,
    pub result: IntegrationResult<N>,
    pub stats: Stats,
}

impl<const N: usize> Solution<N> {
    /// Time at which integration stopped.
    pub fn t_final(&self) -> f64 {
        match &self.result {
            IntegrationResult::Completed { t, .. } => *t,
            IntegrationResult::Event(ev) => ev.t,
        }
    }

    pub fn event(&self) -> Option<&EventResult<N>> {
        match &self.result {
            IntegrationResult::Event(ev) => Some(ev),
            IntegrationResult::Completed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("non-finite state encountered at t = {t}")]
    NonFiniteState { t: f64 },
    #[error("step size {h:e} too small at t = {t}")]
    StepSizeTooSmall { t: f64, h: f64 },
    #[error("exceeded {max_steps} integration steps")]
    MaxStepsExceeded { max_steps: u64 },
    #[error("event location failed: {0}")]
    EventFindingFailed(#[from] BrentError),
}

/// Placeholder event for runs that only stop at the final time.
struct NoEvent;

impl<const N: usize> EventFunction<N> for NoEvent {
    fn eval(&self, _t: f64, _y: &[f64; N]) -> f64 {
        1.0
    }
}

/// Forward-in-time Dormand-Prince 5(4) integrator with FSAL, adaptive steps,
/// terminal events and Hermite dense output.
///
/// ```ignore
/// struct Decay;
///
/// impl OdeSystem<1> for Decay {
///     fn rhs(&self, _t: f64, y: &[f64; 1], dydt: &mut [f64; 1]) {
///         dydt[0] = -y[0];
///     }
/// }
///
/// let mut solver = DormandPrince::new(Tolerances::new(1e-10, 1e-8));
/// let solution = solver.integrate(&Decay, 0.0, &[1.0], 2.0)?;
/// let mid = solution.dense.eval(1.0);
/// ```
#[derive(Debug, Clone)]
pub struct DormandPrince<const N: usize> {
    tol: Tolerances<N>,
    controller: StepController,
    h_min: f64,
    max_steps: u64,
    k: [[f64; N]; STAGES],
    stats: Stats,
}

impl<const N: usize> DormandPrince<N> {
    pub fn new(tol: Tolerances<N>) -> Self {
        Self {
            tol,
            controller: StepController::default(),
            h_min: 1e-12,
            max_steps: 100_000,
            k: [[0.0; N]; STAGES],
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Attempt one step of size `h` from `(t, y)` with `f0 = f(t, y)`.
    pub fn step<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        t: f64,
        y: &[f64; N],
        f0: &[f64; N],
        h: f64,
    ) -> StepResult<N> {
        self.k[0] = *f0;
        let mut y_new = *y;

        for stage in 1..STAGES {
            let mut y_stage = [0.0; N];
            for i in 0..N {
                let mut acc = 0.0;
                for j in 0..stage {
                    acc += A[stage][j] * self.k[j][i];
                }
                y_stage[i] = y[i] + h * acc;
            }
            let mut out = [0.0; N];
            sys.rhs(t + C[stage] * h, &y_stage, &mut out);
            self.k[stage] = out;
            // the last row of A holds the 5th-order weights
            if stage == STAGES - 1 {
                y_new = y_stage;
            }
        }
        self.stats.fn_evals += (STAGES - 1) as u64;

        let mut error: f64 = 0.0;
        for i in 0..N {
            let mut err_i = 0.0;
            for j in 0..STAGES {
                err_i += B_ERR[j] * self.k[j][i];
            }
            let scaled = (h * err_i).abs() / self.tol.scale(i, y[i], y_new[i]);
            error = error.max(scaled);
        }
        if error.is_nan() {
            error = f64::INFINITY;
        }

        let accepted = error <= 1.0;
        let mut factor = self.controller.compute_factor(error);
        if !accepted {
            factor = factor.min(1.0);
        }

        StepResult {
            t: t + h,
            y: y_new,
            f: self.k[STAGES - 1],
            error,
            h_next: h * factor,
            accepted,
        }
    }

    /// Starting step estimate (Hairer, Nørsett & Wanner, Solving ODEs I, II.4).
    pub fn initial_step<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        t0: f64,
        y0: &[f64; N],
        f0: &[f64; N],
        tf: f64,
    ) -> f64 {
        let span = tf - t0;
        let rms = |v: &dyn Fn(usize) -> f64| -> f64 {
            if N == 0 {
                return 0.0;
            }
            ((0..N).map(|i| v(i).powi(2)).sum::<f64>() / N as f64).sqrt()
        };
        let scale: [f64; N] = std::array::from_fn(|i| self.tol.scale(i, y0[i], 0.0));

        let d0 = rms(&|i| y0[i] / scale[i]);
        let d1 = rms(&|i| f0[i] / scale[i]);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        }
        .min(span);

        let mut y1 = [0.0; N];
        for i in 0..N {
            y1[i] = y0[i] + h0 * f0[i];
        }
        let mut f1 = [0.0; N];
        sys.rhs(t0 + h0, &y1, &mut f1);
        self.stats.fn_evals += 1;

        let d2 = rms(&|i| (f1[i] - f0[i]) / scale[i]) / h0;
        let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
            (h0 * 1e-3).max(1e-6)
        } else {
            (0.01 / d1.max(d2)).powf(1.0 / (f64::from(EMBEDDED_ORDER) + 1.0))
        };

        (100.0 * h0).min(h1).min(span).max(self.h_min)
    }

    /// Integrate from `t0` to `tf` and keep the dense solution.
    pub fn integrate<S: OdeSystem<N>>(
        &mut self,
        sys: &S,
        t0: f64,
        y0: &[f64; N],
        tf: f64,
    ) -> Result<Solution<N>, IntegrationError> {
        self.run(sys, &NoEvent, &EventConfig::default(), t0, y0, tf)
    }

    /// Integrate from `t0` towards `tf`, stopping at the first crossing of
    /// `event` in the configured direction.
    pub fn integrate_to_event<S, E>(
        &mut self,
        sys: &S,
        event: &E,
        config: &EventConfig,
        t0: f64,
        y0: &[f64; N],
        tf: f64,
    ) -> Result<Solution<N>, IntegrationError>
    where
        S: OdeSystem<N>,
        E: EventFunction<N>,
    {
        self.run(sys, event, config, t0, y0, tf)
    }

    fn run<S, E>(
        &mut self,
        sys: &S,
        event: &E,
        config: &EventConfig,
        t0: f64,
        y0: &[f64; N],
        tf: f64,
    ) -> Result<Solution<N>, IntegrationError>
    where
        S: OdeSystem<N>,
        E: EventFunction<N>,
    {
        if !t0.is_finite() || !tf.is_finite() || tf <= t0 {
            return Err(IntegrationError::InvalidInput {
                message: format!("integration interval [{t0}, {tf}] must be finite and increasing"),
            });
        }
        if y0.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::InvalidInput {
                message: "initial state contains non-finite values".to_string(),
            });
        }
        if !self.tol.is_valid() {
            return Err(IntegrationError::InvalidInput {
                message: "tolerances must be finite, non-negative and not both zero".to_string(),
            });
        }

        self.stats = Stats::default();
        let mut dense = DenseOutput::new(t0, *y0);
        let mut t = t0;
        let mut y = *y0;
        let mut f = [0.0; N];
        sys.rhs(t, &y, &mut f);
        self.stats.fn_evals += 1;
        if f.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFiniteState { t });
        }

        let mut g_prev = event.eval(t, &y);
        let mut h = self.initial_step(sys, t, &y, &f, tf);
        let mut attempts: u64 = 0;

        while t < tf {
            attempts += 1;
            if attempts > self.max_steps {
                return Err(IntegrationError::MaxStepsExceeded {
                    max_steps: self.max_steps,
                });
            }

            let hits_end = t + h >= tf;
            let h_try = if hits_end { tf - t } else { h };
            let mut result = self.step(sys, t, &y, &f, h_try);

            if !result.accepted {
                self.stats.rejected_steps += 1;
                if result.h_next < self.h_min {
                    return Err(IntegrationError::StepSizeTooSmall {
                        t,
                        h: result.h_next,
                    });
                }
                h = result.h_next;
                continue;
            }

            if hits_end {
                result.t = tf;
            }
            if result.y.iter().chain(result.f.iter()).any(|v| !v.is_finite()) {
                return Err(IntegrationError::NonFiniteState { t: result.t });
            }
            self.stats.accepted_steps += 1;

            let segment = HermiteSegment::new(t, result.t, y, result.y, f, result.f);
            let g_new = event.eval(result.t, &result.y);

            if sign_change_detected(g_prev, g_new, config.direction) {
                let solver = BrentSolver::new(config.root_tol, config.max_iter);
                let (t_event, g_value, iterations) = solver.find_root(
                    |tau| event.eval(tau, &segment.eval(tau)),
                    segment.t0,
                    segment.t1,
                    g_prev,
                    g_new,
                )?;
                let y_event = segment.eval(t_event);
                dense.push(segment);
                dense.truncate_at(t_event);
                return Ok(Solution {
                    dense,
                    result: IntegrationResult::Event(EventResult {
                        t: t_event,
                        y: y_event,
                        g_value,
                        iterations,
                    }),
                    stats: self.stats,
                });
            }

            dense.push(segment);
            t = result.t;
            y = result.y;
            f = result.f;
            g_prev = g_new;
            h = result.h_next.max(self.h_min);
        }

        Ok(Solution {
            dense,
            result: IntegrationResult::Completed { t, y },
            stats: self.stats,
        })
    }
}
