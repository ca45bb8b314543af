//! Terminal event detection.
//!
//! An event function `g(t, y)` is sampled at every accepted step. When it
//! changes sign in the configured direction, the crossing is refined with
//! Brent's method on the step's dense interpolant and integration stops there.

use thiserror::Error;

/// Scalar condition monitored during integration.
///
/// ```ignore
/// // Stop when the second state component reaches zero from above.
/// struct Floor;
///
/// impl EventFunction<4> for Floor {
///     fn eval(&self, _t: f64, y: &[f64; 4]) -> f64 {
///         y[1]
///     }
/// }
/// ```
pub trait EventFunction<const N: usize> {
    /// Value of the event function; zero marks the event.
    fn eval(&self, t: f64, y: &[f64; N]) -> f64;
}

/// Direction of zero crossing that triggers the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDirection {
    /// `g` increases through zero.
    Rising,
    /// `g` decreases through zero.
    Falling,
    #[default]
    Any,
}

/// Root refinement settings for an event.
#[derive(Debug, Clone, Copy)]
pub struct EventConfig {
    pub direction: EventDirection,
    /// Absolute tolerance on the event time.
    pub root_tol: f64,
    pub max_iter: usize,
}

impl EventConfig {
    pub fn new(direction: EventDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            direction: EventDirection::Any,
            root_tol: 1e-12,
            max_iter: 60,
        }
    }
}

/// Located event.
#[derive(Debug, Clone, Copy)]
pub struct EventResult<const N: usize> {
    pub t: f64,
    pub y: [f64; N],
    /// Residual `g(t, y)` at the located root.
    pub g_value: f64,
    pub iterations: usize,
}

/// Failure modes of the bracketing root finder.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BrentError {
    #[error("root not bracketed: f({a}) = {fa}, f({b}) = {fb}")]
    NotBracketed { a: f64, b: f64, fa: f64, fb: f64 },
    #[error("no convergence after {iterations} iterations (best estimate {best}, f = {f_value})")]
    MaxIterations {
        best: f64,
        f_value: f64,
        iterations: usize,
    },
}

/// Brent's bracketing root finder (bisection, secant and inverse quadratic
/// interpolation).
///
/// Reference: Brent, R.P. (1973). "Algorithms for Minimization without
/// Derivatives". Prentice-Hall.
#[derive(Debug, Clone, Copy)]
pub struct BrentSolver {
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for BrentSolver {
    fn default() -> Self {
        Self {
            tol: 1e-12,
            max_iter: 60,
        }
    }
}

impl BrentSolver {
    pub fn new(tol: f64, max_iter: usize) -> Self {
        Self { tol, max_iter }
    }

    /// Find a root of `f` in `[a, b]` given `fa = f(a)` and `fb = f(b)` of
    /// opposite sign. Returns `(root, f(root), iterations)`.
    pub fn find_root<F>(
        &self,
        mut f: F,
        mut a: f64,
        mut b: f64,
        mut fa: f64,
        mut fb: f64,
    ) -> Result<(f64, f64, usize), BrentError>
    where
        F: FnMut(f64) -> f64,
    {
        if fa == 0.0 {
            return Ok((a, fa, 0));
        }
        if fb == 0.0 {
            return Ok((b, fb, 0));
        }
        if fa * fb > 0.0 {
            return Err(BrentError::NotBracketed { a, b, fa, fb });
        }

        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut bisected = true;

        for iter in 0..self.max_iter {
            if fa.abs() < fb.abs() {
                std::mem::swap(&mut a, &mut b);
                std::mem::swap(&mut fa, &mut fb);
            }

            if fb == 0.0 || (b - a).abs() <= self.tol {
                return Ok((b, fb, iter + 1));
            }

            let candidate = if fa != fc && fb != fc {
                a * fb * fc / ((fa - fb) * (fa - fc))
                    + b * fa * fc / ((fb - fa) * (fb - fc))
                    + c * fa * fb / ((fc - fa) * (fc - fb))
            } else if fb != fa {
                b - fb * (b - a) / (fb - fa)
            } else {
                0.5 * (a + b)
            };

            let outside = (candidate - (3.0 * a + b) / 4.0) * (candidate - b) > 0.0;
            let slow = if bisected {
                (candidate - b).abs() >= (b - c).abs() / 2.0 || (b - c).abs() < self.tol
            } else {
                (candidate - b).abs() >= (c - d).abs() / 2.0 || (c - d).abs() < self.tol
            };

            let s = if outside || slow {
                bisected = true;
                0.5 * (a + b)
            } else {
                bisected = false;
                candidate
            };

            let fs = f(s);
            d = c;
            c = b;
            fc = fb;

            if fa * fs < 0.0 {
                b = s;
                fb = fs;
            } else {
                a = s;
                fa = fs;
            }
        }

        Err(BrentError::MaxIterations {
            best: b,
            f_value: fb,
            iterations: self.max_iter,
        })
    }
}

/// True when `g_old -> g_new` is a crossing in `direction`.
///
/// A start exactly on zero is not a new crossing; an end exactly on zero is.
pub fn sign_change_detected(g_old: f64, g_new: f64, direction: EventDirection) -> bool {
    if g_old == 0.0 || g_old * g_new > 0.0 {
        return false;
    }
    match direction {
        EventDirection::Rising => g_old < 0.0,
        EventDirection::Falling => g_old > 0.0,
        EventDirection::Any => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brent_finds_square_root() {
        let solver = BrentSolver::default();
        let (root, f_root, _) = solver
            .find_root(|x| x * x - 2.0, 0.0, 2.0, -2.0, 2.0)
            .unwrap();
        assert!(
            (root - 2.0_f64.sqrt()).abs() < 1e-12,
            "root {root} should be sqrt(2)"
        );
        assert!(f_root.abs() < 1e-11, "f(root) = {f_root}");
    }

    #[test]
    fn brent_finds_pi() {
        let solver = BrentSolver::default();
        let (root, _, iters) = solver
            .find_root(f64::sin, 3.0, 4.0, 3.0_f64.sin(), 4.0_f64.sin())
            .unwrap();
        assert!((root - std::f64::consts::PI).abs() < 1e-12);
        assert!(iters < 60);
    }

    #[test]
    fn brent_rejects_unbracketed_interval() {
        let solver = BrentSolver::default();
        let result = solver.find_root(|x| x * x + 1.0, -1.0, 1.0, 2.0, 2.0);
        assert!(matches!(result, Err(BrentError::NotBracketed { .. })));
    }

    #[test]
    fn brent_returns_endpoint_root() {
        let solver = BrentSolver::default();
        let (root, f_root, iters) = solver.find_root(|x| x + 1.0, -1.0, 1.0, 0.0, 2.0).unwrap();
        assert_eq!(root, -1.0);
        assert_eq!(f_root, 0.0);
        assert_eq!(iters, 0);
    }

    #[test]
    fn sign_changes_respect_direction() {
        assert!(sign_change_detected(-1.0, 1.0, EventDirection::Rising));
        assert!(!sign_change_detected(1.0, -1.0, EventDirection::Rising));
        assert!(sign_change_detected(1.0, -1.0, EventDirection::Falling));
        assert!(!sign_change_detected(-1.0, 1.0, EventDirection::Falling));
        assert!(sign_change_detected(1.0, -1.0, EventDirection::Any));
        assert!(!sign_change_detected(1.0, 2.0, EventDirection::Any));
        assert!(!sign_change_detected(-1.0, -2.0, EventDirection::Any));
    }

    #[test]
    fn zero_endpoints_are_handled() {
        assert!(sign_change_detected(1.0, 0.0, EventDirection::Falling));
        assert!(!sign_change_detected(-1.0, 0.0, EventDirection::Falling));
        assert!(!sign_change_detected(0.0, -1.0, EventDirection::Falling));
    }
}
