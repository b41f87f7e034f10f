//! CSS-style cubic-bezier timing curves.
//!
//! The curve runs from P0 = (0, 0) to P3 = (1, 1) with two free control
//! points (x1, y1) and (x2, y2). Both coordinates share the same Bernstein
//! form, so the evaluator takes a pair of control coordinates and is used for
//! x and y alike.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EaseFitError, EaseFitResult};

/// Newton steps attempted before falling back to bisection.
pub const NEWTON_ITERATIONS: usize = 12;
/// Residual below which a Newton iterate is accepted.
pub const NEWTON_TOLERANCE: f64 = 1e-7;
/// Derivative magnitude below which Newton is abandoned.
pub const MIN_NEWTON_DERIVATIVE: f64 = 1e-9;
/// Fixed bisection budget for the fallback search.
pub const BISECTION_ITERATIONS: usize = 32;

/// Evaluate one coordinate of the curve at parameter `u`.
///
/// `c1` and `c2` are the matching coordinates of the two control points and
/// may be any real number.
#[inline]
pub fn evaluate_coordinate(u: f64, c1: f64, c2: f64) -> f64 {
    let om = 1.0 - u;
    3.0 * om * om * u * c1 + 3.0 * om * u * u * c2 + u * u * u
}

/// Derivative of [`evaluate_coordinate`] with respect to `u`.
#[inline]
pub fn evaluate_derivative(u: f64, c1: f64, c2: f64) -> f64 {
    let om = 1.0 - u;
    3.0 * om * om * c1 + 6.0 * om * u * (c2 - c1) + 3.0 * u * u * (1.0 - c2)
}

/// Solve `x(u) = target_x` for `u` in [0, 1].
///
/// Runs Newton from `u = target_x` and falls back to bisection when Newton
/// stalls, leaves the unit interval, or runs out of steps. The bisection
/// assumes x(u) is non-decreasing, which holds whenever x1 and x2 lie in
/// [0, 1].
pub fn invert(target_x: f64, x1: f64, x2: f64) -> f64 {
    let mut u = target_x;
    for _ in 0..NEWTON_ITERATIONS {
        let residual = evaluate_coordinate(u, x1, x2) - target_x;
        if residual.abs() < NEWTON_TOLERANCE {
            return u;
        }

        let slope = evaluate_derivative(u, x1, x2);
        if slope.abs() < MIN_NEWTON_DERIVATIVE {
            break;
        }

        let next = u - residual / slope;
        if !(0.0..=1.0).contains(&next) {
            break;
        }
        u = next;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if evaluate_coordinate(mid, x1, x2) < target_x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Progress of the curve at normalized time `t`.
pub fn ease_value_at(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let u = invert(t, x1, x2);
    evaluate_coordinate(u, y1, y2)
}

/// A cubic-bezier timing function `cubic-bezier(x1, y1, x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CubicBezier {
    pub const LINEAR: CubicBezier = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
    pub const EASE: CubicBezier = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
    pub const EASE_IN: CubicBezier = CubicBezier::new(0.42, 0.0, 1.0, 1.0);
    pub const EASE_OUT: CubicBezier = CubicBezier::new(0.0, 0.0, 0.58, 1.0);
    pub const EASE_IN_OUT: CubicBezier = CubicBezier::new(0.42, 0.0, 0.58, 1.0);

    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from `[x1, y1, x2, y2]`.
    pub fn from_array(params: [f64; 4]) -> Self {
        Self::new(params[0], params[1], params[2], params[3])
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Time coordinate at curve parameter `u`.
    pub fn x_at(&self, u: f64) -> f64 {
        evaluate_coordinate(u, self.x1, self.x2)
    }

    /// Progress coordinate at curve parameter `u`.
    pub fn y_at(&self, u: f64) -> f64 {
        evaluate_coordinate(u, self.y1, self.y2)
    }

    /// Curve parameter whose time coordinate is `t`.
    pub fn solve_parameter(&self, t: f64) -> f64 {
        invert(t, self.x1, self.x2)
    }

    /// Progress at normalized time `t`.
    pub fn ease(&self, t: f64) -> f64 {
        ease_value_at(t, self.x1, self.y1, self.x2, self.y2)
    }

    /// True when both x control coordinates lie inside [0, 1], which keeps
    /// x(u) monotonic.
    pub fn is_monotonic_in_time(&self) -> bool {
        (0.0..=1.0).contains(&self.x1) && (0.0..=1.0).contains(&self.x2)
    }

    /// Hard-clamp x1, x2 into `[epsilon, 1 - epsilon]`.
    pub fn with_clamped_x(mut self, epsilon: f64) -> Self {
        self.x1 = self.x1.clamp(epsilon, 1.0 - epsilon);
        self.x2 = self.x2.clamp(epsilon, 1.0 - epsilon);
        self
    }

    /// Clamp y1, y2 into [0, 1] (no anticipation or overshoot).
    pub fn with_clamped_y(mut self) -> Self {
        self.y1 = self.y1.clamp(0.0, 1.0);
        self.y2 = self.y2.clamp(0.0, 1.0);
        self
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        CubicBezier::LINEAR
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({:.6}, {:.6}, {:.6}, {:.6})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

impl FromStr for CubicBezier {
    type Err = EaseFitError;

    /// Accepts `cubic-bezier(a, b, c, d)` or a bare `a, b, c, d` list.
    fn from_str(s: &str) -> EaseFitResult<Self> {
        let body = s.trim();
        let body = body.strip_prefix("cubic-bezier").unwrap_or(body).trim();
        let body = match body.strip_prefix('(') {
            Some(inner) => inner
                .strip_suffix(')')
                .ok_or_else(|| EaseFitError::Parse(format!("missing ')' in '{}'", s)))?,
            None => body,
        };

        let mut params = [0.0; 4];
        let mut count = 0;
        for part in body.split(',') {
            if count == params.len() {
                return Err(EaseFitError::Parse(format!(
                    "expected 4 numbers in '{}', found more",
                    s
                )));
            }
            let part = part.trim();
            params[count] = part
                .parse::<f64>()
                .map_err(|e| EaseFitError::Parse(format!("invalid number '{}': {}", part, e)))?;
            count += 1;
        }
        if count != params.len() {
            return Err(EaseFitError::Parse(format!(
                "expected 4 numbers in '{}', found {}",
                s, count
            )));
        }
        if params.iter().any(|p| !p.is_finite()) {
            return Err(EaseFitError::Parse(format!("non-finite value in '{}'", s)));
        }

        Ok(CubicBezier::from_array(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for (c1, c2) in [(0.25, 0.75), (-0.5, 1.5), (0.0, 1.0), (3.0, -2.0)] {
            assert!(evaluate_coordinate(0.0, c1, c2).abs() < 1e-9);
            assert!((evaluate_coordinate(1.0, c1, c2) - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let (c1, c2) = (0.3, 0.9);
        let h = 1e-6;
        for i in 1..10 {
            let u = i as f64 / 10.0;
            let numeric =
                (evaluate_coordinate(u + h, c1, c2) - evaluate_coordinate(u - h, c1, c2)) / (2.0 * h);
            assert!((evaluate_derivative(u, c1, c2) - numeric).abs() < 1e-6);
        }
    }

    #[test]
    fn test_invert_round_trip() {
        let controls = [0.05, 0.25, 0.5, 0.75, 0.95];
        for &x1 in &controls {
            for &x2 in &controls {
                for i in 0..=20 {
                    let u = i as f64 / 20.0;
                    let x = evaluate_coordinate(u, x1, x2);
                    let solved = invert(x, x1, x2);
                    assert!(
                        (solved - u).abs() < 1e-5,
                        "x1={} x2={} u={} solved={}",
                        x1,
                        x2,
                        u,
                        solved
                    );
                }
            }
        }
    }

    #[test]
    fn test_invert_near_flat_start() {
        // x'(0) == 0 when x1 == 0
        let u = invert(0.0005, 0.0, 1.0);
        assert!((evaluate_coordinate(u, 0.0, 1.0) - 0.0005).abs() < 1e-7);
    }

    #[test]
    fn test_linear_ease_is_identity() {
        let curve = CubicBezier::new(0.3, 0.3, 0.7, 0.7);
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!((curve.ease(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_parameter_helpers_agree_with_ease() {
        let curve = CubicBezier::EASE;
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let u = curve.solve_parameter(t);
            assert!((curve.x_at(u) - t).abs() < 1e-7);
            assert_eq!(curve.y_at(u), curve.ease(t));
        }
    }

    #[test]
    fn test_ease_in_is_slow_at_start() {
        let e = CubicBezier::EASE_IN;
        assert!(e.ease(0.0).abs() < 1e-6);
        assert!(e.ease(0.5) < 0.5);
        assert!((e.ease(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_display_uses_six_decimals() {
        let curve = CubicBezier::new(0.25, 0.1, 0.25, 1.0);
        assert_eq!(
            curve.to_string(),
            "cubic-bezier(0.250000, 0.100000, 0.250000, 1.000000)"
        );
    }

    #[test]
    fn test_parse_css_and_bare_forms() {
        let a: CubicBezier = "cubic-bezier(0.42, 0, 0.58, 1)".parse().unwrap();
        assert_eq!(a, CubicBezier::EASE_IN_OUT);
        let b: CubicBezier = " 0.68,-0.55 ,0.27,1.55 ".parse().unwrap();
        assert_eq!(b, CubicBezier::new(0.68, -0.55, 0.27, 1.55));
        let round_trip: CubicBezier = CubicBezier::EASE.to_string().parse().unwrap();
        assert_eq!(round_trip, CubicBezier::EASE);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("cubic-bezier(0.1, 0.2, 0.3)".parse::<CubicBezier>().is_err());
        assert!("cubic-bezier(0.1, 0.2, 0.3, 0.4, 0.5)".parse::<CubicBezier>().is_err());
        assert!("cubic-bezier(0.1, a, 0.3, 0.4)".parse::<CubicBezier>().is_err());
        assert!("cubic-bezier(0.1, 0.2, 0.3, 0.4".parse::<CubicBezier>().is_err());
        assert!("NaN, 0, 1, 1".parse::<CubicBezier>().is_err());
    }

    #[test]
    fn test_clamping() {
        let curve = CubicBezier::new(-0.5, -0.2, 1.5, 1.3)
            .with_clamped_x(1e-8)
            .with_clamped_y();
        assert_eq!(curve.x1, 1e-8);
        assert_eq!(curve.x2, 1.0 - 1e-8);
        assert_eq!(curve.y1, 0.0);
        assert_eq!(curve.y2, 1.0);
        assert!(curve.is_monotonic_in_time());
    }
}
