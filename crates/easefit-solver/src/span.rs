//! Choosing which keyframes of a track become the fit's samples.
//!
//! The span always runs from the first to the last selected key. With three
//! or more keys selected, those keys are the samples. With exactly two
//! selected, every key inside the span is used instead, which is the usual
//! situation for a baked animation where only the endpoints get picked.

use serde::{Deserialize, Serialize};
use std::fmt;

use easefit_core::{EaseFitError, EaseFitResult, Sample, SampleSet};

use crate::fit::MIN_FIT_SAMPLES;

/// Slack when deciding whether a key time falls inside the span.
pub const SPAN_TIME_EPSILON: f64 = 1e-6;

fn default_selected() -> bool {
    true
}

/// One key on an animated one-dimensional property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f64,
    pub value: f64,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

impl Keyframe {
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            selected: true,
        }
    }

    pub fn unselected(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            selected: false,
        }
    }

    fn sample(&self) -> Sample {
        Sample::new(self.time, self.value)
    }
}

/// A named property with its keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTrack {
    pub name: String,
    pub keys: Vec<Keyframe>,
}

impl KeyframeTrack {
    pub fn new(name: impl Into<String>, keys: Vec<Keyframe>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }

    /// Build a track whose keys are all selected.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        Self::new(
            name,
            pairs.iter().map(|&(t, v)| Keyframe::new(t, v)).collect(),
        )
    }
}

/// Where the samples came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMode {
    SelectedKeys,
    AllKeysInSpan,
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleMode::SelectedKeys => write!(f, "selected keys"),
            SampleMode::AllKeysInSpan => write!(f, "all keys in span"),
        }
    }
}

/// The samples picked from a track.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanSelection {
    pub mode: SampleMode,
    pub samples: SampleSet,
}

fn sorted_by_time(mut keys: Vec<Keyframe>) -> Vec<Keyframe> {
    keys.sort_by(|a, b| a.time.total_cmp(&b.time));
    keys
}

/// Pick the samples for `track`.
pub fn select_samples(track: &KeyframeTrack) -> EaseFitResult<SpanSelection> {
    let selected = sorted_by_time(track.keys.iter().copied().filter(|k| k.selected).collect());
    if selected.len() < 2 {
        return Err(EaseFitError::TooFewSelectedKeys {
            found: selected.len(),
            required: 2,
        });
    }

    let (mode, keys) = if selected.len() >= MIN_FIT_SAMPLES {
        (SampleMode::SelectedKeys, selected)
    } else {
        let t0 = selected[0].time;
        let t1 = selected[1].time;
        let in_span = sorted_by_time(
            track
                .keys
                .iter()
                .copied()
                .filter(|k| k.time >= t0 - SPAN_TIME_EPSILON && k.time <= t1 + SPAN_TIME_EPSILON)
                .collect(),
        );
        if in_span.len() < MIN_FIT_SAMPLES {
            return Err(EaseFitError::SparseSpan {
                found: in_span.len(),
                required: MIN_FIT_SAMPLES,
            });
        }
        (SampleMode::AllKeysInSpan, in_span)
    };

    let samples = SampleSet::new(keys.iter().map(Keyframe::sample).collect())?;
    Ok(SpanSelection { mode, samples })
}
