//! Raw keyframe samples and their normalization into the unit square.

use serde::{Deserialize, Serialize};

use crate::error::{EaseFitError, EaseFitResult, RangeAxis};

/// Time or value spans smaller than this cannot be normalized.
pub const MIN_RANGE: f64 = 1e-12;
/// Floor for the finite-difference denominator in slope estimates.
pub const SLOPE_DENOMINATOR_FLOOR: f64 = 1e-6;

/// A sampled (time, value) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((time, value): (f64, f64)) -> Self {
        Sample::new(time, value)
    }
}

/// An ordered run of samples with strictly increasing, finite times.
///
/// Always holds at least two samples so the first and last can anchor a
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SampleSet {
    samples: Vec<Sample>,
}

impl SampleSet {
    pub fn new(samples: Vec<Sample>) -> EaseFitResult<Self> {
        if samples.len() < 2 {
            return Err(EaseFitError::insufficient(samples.len(), 2));
        }
        for (index, sample) in samples.iter().enumerate() {
            if !sample.time.is_finite() || !sample.value.is_finite() {
                return Err(EaseFitError::NonFiniteSample { index });
            }
            if index > 0 && sample.time <= samples[index - 1].time {
                return Err(EaseFitError::UnorderedSamples { index });
            }
        }
        Ok(Self { samples })
    }

    /// Build from `(time, value)` tuples.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> EaseFitResult<Self> {
        Self::new(pairs.iter().copied().map(Sample::from).collect())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn first(&self) -> Sample {
        self.samples[0]
    }

    pub fn last(&self) -> Sample {
        self.samples[self.samples.len() - 1]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }
}

impl<'de> Deserialize<'de> for SampleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let samples = Vec::<Sample>::deserialize(deserializer)?;
        SampleSet::new(samples).map_err(serde::de::Error::custom)
    }
}

/// A sample rescaled into normalized time `t` and progress `s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSample {
    pub t: f64,
    pub s: f64,
}

impl NormalizedSample {
    pub fn new(t: f64, s: f64) -> Self {
        Self { t, s }
    }
}

/// The affine map between original and normalized coordinates, anchored on
/// the first and last samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub t0: f64,
    pub dt: f64,
    pub v0: f64,
    pub dv: f64,
}

impl Normalization {
    /// Maps the unit square onto itself.
    pub const IDENTITY: Normalization = Normalization {
        t0: 0.0,
        dt: 1.0,
        v0: 0.0,
        dv: 1.0,
    };

    /// Derive the anchors of a sample set.
    pub fn from_samples(set: &SampleSet) -> EaseFitResult<Self> {
        let first = set.first();
        let last = set.last();
        let dt = last.time - first.time;
        let dv = last.value - first.value;

        if !dt.is_finite() {
            return Err(EaseFitError::RangeOverflow {
                axis: RangeAxis::Time,
            });
        }
        if !dv.is_finite() {
            return Err(EaseFitError::RangeOverflow {
                axis: RangeAxis::Value,
            });
        }
        if dt.abs() < MIN_RANGE {
            return Err(EaseFitError::degenerate(RangeAxis::Time, dt));
        }
        if dv.abs() < MIN_RANGE {
            return Err(EaseFitError::degenerate(RangeAxis::Value, dv));
        }

        Ok(Self {
            t0: first.time,
            dt,
            v0: first.value,
            dv,
        })
    }

    pub fn normalize(&self, sample: Sample) -> NormalizedSample {
        NormalizedSample::new(
            (sample.time - self.t0) / self.dt,
            (sample.value - self.v0) / self.dv,
        )
    }

    /// Original-scale value for normalized progress `s`.
    pub fn denormalize_value(&self, s: f64) -> f64 {
        self.v0 + self.dv * s
    }
}

/// Normalized samples together with the anchors that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSamples {
    normalization: Normalization,
    points: Vec<NormalizedSample>,
}

impl NormalizedSamples {
    /// Wrap points that are already normalized.
    pub fn from_points(points: Vec<NormalizedSample>) -> EaseFitResult<Self> {
        if points.len() < 2 {
            return Err(EaseFitError::insufficient(points.len(), 2));
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.t.is_finite() || !p.s.is_finite())
        {
            return Err(EaseFitError::NonFiniteSample { index });
        }
        Ok(Self {
            normalization: Normalization::IDENTITY,
            points,
        })
    }

    pub fn normalization(&self) -> &Normalization {
        &self.normalization
    }

    pub fn points(&self) -> &[NormalizedSample] {
        &self.points
    }

    /// Every point except the first and last, which the curve matches by
    /// construction.
    pub fn interior(&self) -> &[NormalizedSample] {
        &self.points[1..self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Normalize a sample set into the unit square.
///
/// Interior progress values may fall outside [0, 1] when the animation
/// overshoots or anticipates.
pub fn normalize(set: &SampleSet) -> EaseFitResult<NormalizedSamples> {
    let normalization = Normalization::from_samples(set)?;
    let points: Vec<NormalizedSample> = set.iter().map(|&s| normalization.normalize(s)).collect();
    if let Some(index) = points
        .iter()
        .position(|p| !p.t.is_finite() || !p.s.is_finite())
    {
        return Err(EaseFitError::NonFiniteSample { index });
    }
    Ok(NormalizedSamples {
        normalization,
        points,
    })
}

/// Finite-difference slopes at the start and end of a normalized curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointSlopes {
    pub m0: f64,
    pub m1: f64,
}

/// Estimate the endpoint slopes from the first two and last two points.
///
/// Only used to seed the optimizer.
pub fn estimate_endpoint_slopes(normalized: &NormalizedSamples) -> EndpointSlopes {
    let p = normalized.points();
    let n = p.len();
    let m0 = (p[1].s - p[0].s) / (p[1].t - p[0].t).max(SLOPE_DENOMINATOR_FLOOR);
    let m1 = (p[n - 1].s - p[n - 2].s) / (p[n - 1].t - p[n - 2].t).max(SLOPE_DENOMINATOR_FLOOR);
    EndpointSlopes { m0, m1 }
}
