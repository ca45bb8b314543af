//! Continuous solution built from accepted steps.
//!
//! Each accepted step stores its endpoints and derivatives; the state inside
//! a step is reconstructed with a cubic Hermite interpolant, which is exact to
//! third order and matches the solver's values at both step boundaries.

/// One accepted step `[t0, t1]`.
#[derive(Debug, Clone, Copy)]
pub struct HermiteSegment<const N: usize> {
    pub t0: f64,
    pub t1: f64,
    pub y0: [f64; N],
    pub y1: [f64; N],
    pub f0: [f64; N],
    pub f1: [f64; N],
}

impl<const N: usize> HermiteSegment<N> {
    pub fn new(t0: f64, t1: f64, y0: [f64; N], y1: [f64; N], f0: [f64; N], f1: [f64; N]) -> Self {
        Self {
            t0,
            t1,
            y0,
            y1,
            f0,
            f1,
        }
    }

    /// Interpolated state at `t`. Values outside `[t0, t1]` are extrapolated.
    pub fn eval(&self, t: f64) -> [f64; N] {
        let h = self.t1 - self.t0;
        if h == 0.0 {
            return self.y0;
        }
        let s = (t - self.t0) / h;
        let s2 = s * s;
        let one_minus = 1.0 - s;
        let h00 = (1.0 + 2.0 * s) * one_minus * one_minus;
        let h10 = s * one_minus * one_minus;
        let h01 = s2 * (3.0 - 2.0 * s);
        let h11 = s2 * (s - 1.0);

        let mut out = [0.0; N];
        for i in 0..N {
            out[i] = h00 * self.y0[i]
                + h10 * h * self.f0[i]
                + h01 * self.y1[i]
                + h11 * h * self.f1[i];
        }
        out
    }
}

/// Piecewise Hermite interpolant over `[t_start, t_end]`.
#[derive(Debug, Clone)]
pub struct DenseOutput<const N: usize> {
    t_start: f64,
    y_start: [f64; N],
    t_end: f64,
    segments: Vec<HermiteSegment<N>>,
}

impl<const N: usize> DenseOutput<N> {
    pub fn new(t_start: f64, y_start: [f64; N]) -> Self {
        Self {
            t_start,
            y_start,
            t_end: t_start,
            segments: Vec::new(),
        }
    }

    /// Append a step; it must start where the previous one ended.
    pub fn push(&mut self, segment: HermiteSegment<N>) {
        debug_assert!(
            (segment.t0 - self.t_end).abs() <= f64::EPSILON * self.t_end.abs().max(1.0),
            "segments must be contiguous"
        );
        self.t_end = segment.t1;
        self.segments.push(segment);
    }

    /// Shorten the covered span to end at `t`, keeping the final segment's
    /// polynomial. Used when a terminal event lands inside the last step.
    pub fn truncate_at(&mut self, t: f64) {
        if t >= self.t_start && t <= self.t_end {
            self.t_end = t;
        }
    }

    pub fn t_start(&self) -> f64 {
        self.t_start
    }

    pub fn t_end(&self) -> f64 {
        self.t_end
    }

    pub fn segments(&self) -> &[HermiteSegment<N>] {
        &self.segments
    }

    /// Interpolated state, or `None` when `t` lies outside the covered span.
    pub fn eval(&self, t: f64) -> Option<[f64; N]> {
        if !t.is_finite() || t < self.t_start || t > self.t_end {
            return None;
        }
        if self.segments.is_empty() {
            return Some(self.y_start);
        }
        let idx = self
            .segments
            .partition_point(|seg| seg.t1 < t)
            .min(self.segments.len() - 1);
        Some(self.segments[idx].eval(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(t: f64) -> f64 {
        t * t * t - 2.0 * t + 1.0
    }

    fn cubic_prime(t: f64) -> f64 {
        3.0 * t * t - 2.0
    }

    #[test]
    fn hermite_reproduces_cubics() {
        let seg = HermiteSegment::new(
            0.5,
            2.0,
            [cubic(0.5)],
            [cubic(2.0)],
            [cubic_prime(0.5)],
            [cubic_prime(2.0)],
        );
        for t in [0.5, 0.9, 1.3, 1.77, 2.0] {
            let got = seg.eval(t)[0];
            assert!((got - cubic(t)).abs() < 1e-12, "t = {t}: {got} vs {}", cubic(t));
        }
    }

    #[test]
    fn eval_selects_segment_and_respects_span() {
        let mut dense = DenseOutput::new(0.0, [0.0]);
        dense.push(HermiteSegment::new(0.0, 1.0, [0.0], [1.0], [1.0], [1.0]));
        dense.push(HermiteSegment::new(1.0, 2.0, [1.0], [3.0], [2.0], [2.0]));

        assert_eq!(dense.eval(0.5), Some([0.5]));
        assert_eq!(dense.eval(1.5), Some([2.0]));
        assert_eq!(dense.eval(2.0), Some([3.0]));
        assert_eq!(dense.eval(2.5), None);
        assert_eq!(dense.eval(-0.1), None);

        dense.truncate_at(1.5);
        assert_eq!(dense.t_end(), 1.5);
        assert_eq!(dense.eval(1.5), Some([2.0]));
        assert_eq!(dense.eval(1.75), None);
    }

    #[test]
    fn empty_output_covers_only_start() {
        let dense = DenseOutput::new(3.0, [7.0, 8.0]);
        assert_eq!(dense.eval(3.0), Some([7.0, 8.0]));
        assert_eq!(dense.eval(3.1), None);
    }
}
