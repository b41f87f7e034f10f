//! Least-squares objective for a cubic-bezier fit.

use easefit_core::{ease_value_at, FitConfig, NormalizedSamples};

/// Weight of the quadratic penalty on x1, x2 leaving `[eps, 1 - eps]`.
pub const BOUNDARY_PENALTY_WEIGHT: f64 = 1e6;
/// Weight of the quadratic penalty on `x1 > x2` when ordering is enforced.
pub const ORDER_PENALTY_WEIGHT: f64 = 1e4;

/// Sum of squared residuals over the interior samples plus penalty terms.
///
/// Parameters are laid out as `[x1, y1, x2, y2]`.
#[derive(Debug, Clone, Copy)]
pub struct FitObjective<'a> {
    samples: &'a NormalizedSamples,
    epsilon: f64,
    clamp_y: bool,
    enforce_x_order: bool,
}

impl<'a> FitObjective<'a> {
    pub fn new(samples: &'a NormalizedSamples, config: &FitConfig) -> Self {
        Self {
            samples,
            epsilon: config.epsilon,
            clamp_y: config.clamp_y_to_unit,
            enforce_x_order: config.enforce_x_order,
        }
    }

    /// Penalty that keeps x(u) monotonic so the inverter's bisection
    /// fallback stays valid.
    pub fn penalty(&self, x1: f64, x2: f64) -> f64 {
        let lo = self.epsilon;
        let hi = 1.0 - self.epsilon;
        let mut p = 0.0;
        for x in [x1, x2] {
            if x < lo {
                p += (lo - x).powi(2) * BOUNDARY_PENALTY_WEIGHT;
            }
            if x > hi {
                p += (x - hi).powi(2) * BOUNDARY_PENALTY_WEIGHT;
            }
        }
        if self.enforce_x_order && x1 > x2 {
            p += (x1 - x2).powi(2) * ORDER_PENALTY_WEIGHT;
        }
        p
    }

    /// Squared residuals of the curve against the interior samples.
    pub fn data_term(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
        self.samples
            .interior()
            .iter()
            .map(|p| {
                let r = ease_value_at(p.t, x1, y1, x2, y2) - p.s;
                r * r
            })
            .sum()
    }

    /// Objective value at `[x1, y1, x2, y2]`. Any other length is infinitely
    /// bad.
    pub fn value(&self, params: &[f64]) -> f64 {
        let &[x1, mut y1, x2, mut y2] = params else {
            return f64::INFINITY;
        };

        let penalty = self.penalty(x1, x2);
        if self.clamp_y {
            y1 = y1.clamp(0.0, 1.0);
            y2 = y2.clamp(0.0, 1.0);
        }
        self.data_term(x1, y1, x2, y2) + penalty
    }
}
