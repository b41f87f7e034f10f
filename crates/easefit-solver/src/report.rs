use serde::{Deserialize, Serialize};
use std::fmt;

use easefit_core::{ErrorReport, FitConfig, FitResult, TemporalEase};

use crate::fit::fit_samples;
use crate::span::{select_samples, KeyframeTrack, SampleMode};

/// A successful fit with its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    pub fit: FitResult,
    pub error: ErrorReport,
    /// Time of the worst sample, in seconds.
    pub worst_time: f64,
    /// Frame of the worst sample at the report frame rate.
    pub worst_frame: i64,
    pub ease: TemporalEase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrackStatus {
    Ok(FitSummary),
    Skipped { reason: String },
}

/// Outcome of fitting one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackReport {
    pub name: String,
    #[serde(flatten)]
    pub status: TrackStatus,
    pub sample_mode: Option<SampleMode>,
    pub sample_count: usize,
}

impl TrackReport {
    fn skipped(name: &str, reason: String, sample_mode: Option<SampleMode>, sample_count: usize) -> Self {
        Self {
            name: name.to_string(),
            status: TrackStatus::Skipped { reason },
            sample_mode,
            sample_count,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self.status, TrackStatus::Ok(_))
    }

    pub fn summary(&self) -> Option<&FitSummary> {
        match &self.status {
            TrackStatus::Ok(summary) => Some(summary),
            TrackStatus::Skipped { .. } => None,
        }
    }

    /// The fitted curve as a CSS string, if the fit succeeded.
    pub fn cubic(&self) -> Option<String> {
        self.summary().map(|s| s.fit.to_string())
    }

    /// Multi-line description of the fit.
    pub fn detail(&self) -> String {
        let mut lines = vec![format!("Track: {}", self.name)];
        if let Some(mode) = self.sample_mode {
            lines.push(format!("Samples: {} ({})", mode, self.sample_count));
        }

        match &self.status {
            TrackStatus::Ok(s) => {
                lines.push(format!("Fit: {}", s.fit));
                lines.push(format!("  x1={:.6}  y1={:.6}", s.fit.x1, s.fit.y1));
                lines.push(format!("  x2={:.6}  y2={:.6}", s.fit.x2, s.fit.y2));
                lines.push(format!("SSE (normalized): {:.10}", s.fit.sse));
                lines.push(format!(
                    "Max abs error: {:.6} @ ~frame {} ({:.4}s)",
                    s.error.max_error, s.worst_frame, s.worst_time
                ));
                lines.push(format!(
                    "Out ease: speed {:.6}/s, influence {:.3}%",
                    s.ease.outgoing.speed, s.ease.outgoing.influence
                ));
                lines.push(format!(
                    "In ease:  speed {:.6}/s, influence {:.3}%",
                    s.ease.incoming.speed, s.ease.incoming.influence
                ));
            }
            TrackStatus::Skipped { reason } => {
                lines.push(format!("Skipped: {}", reason));
            }
        }
        lines.join("\n")
    }
}

impl fmt::Display for TrackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            TrackStatus::Ok(s) => {
                write!(
                    f,
                    "{} -> {} | maxErr={:.6} | sse={:.10}",
                    self.name, s.fit, s.error.max_error, s.fit.sse
                )?;
                if let Some(mode) = self.sample_mode {
                    write!(f, " | samples={}", mode)?;
                }
                Ok(())
            }
            TrackStatus::Skipped { reason } => write!(f, "{} -> SKIP ({})", self.name, reason),
        }
    }
}

/// Select samples from `track`, fit them and build the report.
///
/// Every failure becomes a skipped report; nothing here aborts a batch.
pub fn fit_track(track: &KeyframeTrack, config: &FitConfig, frame_rate: f64) -> TrackReport {
    let selection = match select_samples(track) {
        Ok(selection) => selection,
        Err(err) => {
            tracing::warn!(track = %track.name, "skipping track: {}", err);
            return TrackReport::skipped(&track.name, err.to_string(), None, 0);
        }
    };
    let count = selection.samples.len();

    let outcome = match fit_samples(&selection.samples, config) {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(track = %track.name, "skipping track: {}", err);
            return TrackReport::skipped(&track.name, err.to_string(), Some(selection.mode), count);
        }
    };

    let map = outcome.normalized.normalization();
    let ease = match TemporalEase::from_curve(&outcome.fit.curve(), map.dt, map.dv, config.epsilon) {
        Ok(ease) => ease,
        Err(err) => {
            tracing::warn!(track = %track.name, "skipping track: {}", err);
            return TrackReport::skipped(&track.name, err.to_string(), Some(selection.mode), count);
        }
    };

    let worst_time = selection.samples.samples()[outcome.error.worst_index].time;
    let worst_frame = if frame_rate.is_finite() && frame_rate > 0.0 {
        (worst_time * frame_rate).round() as i64
    } else {
        0
    };

    TrackReport {
        name: track.name.clone(),
        status: TrackStatus::Ok(FitSummary {
            fit: outcome.fit,
            error: outcome.error,
            worst_time,
            worst_frame,
            ease,
        }),
        sample_mode: Some(selection.mode),
        sample_count: count,
    }
}
