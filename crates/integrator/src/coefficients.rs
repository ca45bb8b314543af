//! Dormand-Prince 5(4) coefficients.
//!
//! Seven-stage embedded pair with the first-same-as-last property: the
//! derivative evaluated at the accepted point (stage 7) is reused as stage 1
//! of the next step.
//!
//! Reference: Dormand, J.R. & Prince, P.J. (1980). "A family of embedded
//! Runge-Kutta formulae". J. Comp. Appl. Math. 6(1), 19-26.

/// Number of stages, including the FSAL stage.
pub const STAGES: usize = 7;

/// Order of the embedded error estimate.
pub const EMBEDDED_ORDER: u8 = 4;

/// Nodes `c_i`.
pub const C: [f64; STAGES] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

/// Runge-Kutta matrix `a_ij` (lower triangular).
pub const A: [[f64; STAGES]; STAGES] = [
    [0.0; STAGES],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
];

/// 5th-order weights (identical to the last row of `A`).
pub const B: [f64; STAGES] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

/// Error weights `b - b_hat`, where `b_hat` is the embedded 4th-order solution.
pub const B_ERR: [f64; STAGES] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_sum_to_nodes() {
        for i in 0..STAGES {
            let row: f64 = A[i].iter().sum();
            assert!(
                (row - C[i]).abs() < 1e-14,
                "row {i} sums to {row}, expected c = {}",
                C[i]
            );
        }
    }

    #[test]
    fn weights_are_consistent() {
        let b_sum: f64 = B.iter().sum();
        assert!((b_sum - 1.0).abs() < 1e-14, "sum(b) = {b_sum}");
        let err_sum: f64 = B_ERR.iter().sum();
        assert!(err_sum.abs() < 1e-14, "sum(b - b_hat) = {err_sum}");
    }
}
