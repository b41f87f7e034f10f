use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bezier::CubicBezier;

/// Best-found curve parameters and their objective value over one sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Sum of squared errors over the normalized interior samples (plus any
    /// penalty still active at the winning point).
    pub sse: f64,
}

impl FitResult {
    pub fn new(curve: CubicBezier, sse: f64) -> Self {
        Self {
            x1: curve.x1,
            y1: curve.y1,
            x2: curve.x2,
            y2: curve.y2,
            sse,
        }
    }

    /// The fitted timing curve.
    pub fn curve(&self) -> CubicBezier {
        CubicBezier::new(self.x1, self.y1, self.x2, self.y2)
    }

    /// Progress of the fitted curve at normalized time `t`.
    pub fn ease(&self, t: f64) -> f64 {
        self.curve().ease(t)
    }
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.curve())
    }
}

/// Worst reconstruction error of a fit, in original value units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorReport {
    pub max_error: f64,
    /// Index into the original sample set of the worst sample.
    pub worst_index: usize,
}
