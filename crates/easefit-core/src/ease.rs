//! Conversion from a fitted curve to keyframe temporal ease.
//!
//! Animation hosts describe a segment's easing as an outgoing handle on the
//! first key and an incoming handle on the last key, each with a speed in
//! value units per second and an influence in percent of the segment
//! duration. This module only computes those numbers; applying them to
//! keyframes is left to the host.

use serde::{Deserialize, Serialize};

use crate::bezier::CubicBezier;
use crate::error::{EaseFitError, EaseFitResult, RangeAxis};
use crate::sample::MIN_RANGE;

pub const MIN_INFLUENCE: f64 = 0.1;
pub const MAX_INFLUENCE: f64 = 100.0;

/// One side of a keyframe's temporal ease.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyEase {
    /// Speed magnitude in value units per second.
    pub speed: f64,
    /// Handle length in percent of the segment duration.
    pub influence: f64,
}

/// Ease for the outgoing side of the first key and the incoming side of the
/// last key of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemporalEase {
    pub outgoing: KeyEase,
    pub incoming: KeyEase,
}

impl TemporalEase {
    /// Convert `curve` over a segment spanning `time_span` seconds and
    /// `value_span` value units.
    ///
    /// `epsilon` floors the handle widths when deriving slopes.
    pub fn from_curve(
        curve: &CubicBezier,
        time_span: f64,
        value_span: f64,
        epsilon: f64,
    ) -> EaseFitResult<Self> {
        if time_span.abs() < MIN_RANGE {
            return Err(EaseFitError::degenerate(RangeAxis::Time, time_span));
        }

        let m0 = curve.y1 / curve.x1.max(epsilon);
        let m1 = (1.0 - curve.y2) / (1.0 - curve.x2).max(epsilon);
        let rate = value_span / time_span;

        Ok(Self {
            outgoing: KeyEase {
                speed: (m0 * rate).abs(),
                influence: (curve.x1 * 100.0).clamp(MIN_INFLUENCE, MAX_INFLUENCE),
            },
            incoming: KeyEase {
                speed: (m1 * rate).abs(),
                influence: ((1.0 - curve.x2) * 100.0).clamp(MIN_INFLUENCE, MAX_INFLUENCE),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_curve_has_constant_speed() {
        let curve = CubicBezier::new(0.25, 0.25, 0.75, 0.75);
        let ease = TemporalEase::from_curve(&curve, 2.0, 10.0, 1e-8).unwrap();
        assert!((ease.outgoing.speed - 5.0).abs() < 1e-12);
        assert!((ease.incoming.speed - 5.0).abs() < 1e-12);
        assert!((ease.outgoing.influence - 25.0).abs() < 1e-12);
        assert!((ease.incoming.influence - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_ease_in_out_starts_and_ends_at_rest() {
        let ease = TemporalEase::from_curve(&CubicBezier::EASE_IN_OUT, 1.0, 100.0, 1e-8).unwrap();
        assert!(ease.outgoing.speed.abs() < 1e-12);
        assert!(ease.incoming.speed.abs() < 1e-12);
        assert!((ease.outgoing.influence - 42.0).abs() < 1e-9);
        assert!((ease.incoming.influence - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_speed_is_a_magnitude_for_falling_values() {
        let curve = CubicBezier::new(0.5, 1.0, 0.5, 1.0);
        let ease = TemporalEase::from_curve(&curve, 1.0, -4.0, 1e-8).unwrap();
        assert!((ease.outgoing.speed - 8.0).abs() < 1e-12);
        assert!(ease.incoming.speed.abs() < 1e-12);
    }

    #[test]
    fn test_influence_is_clamped() {
        let curve = CubicBezier::new(0.0, 0.0, 1.0, 1.0);
        let ease = TemporalEase::from_curve(&curve, 1.0, 1.0, 1e-8).unwrap();
        assert_eq!(ease.outgoing.influence, MIN_INFLUENCE);
        assert_eq!(ease.incoming.influence, MIN_INFLUENCE);
    }

    #[test]
    fn test_zero_duration_is_rejected() {
        assert!(TemporalEase::from_curve(&CubicBezier::EASE, 0.0, 1.0, 1e-8).is_err());
    }
}
