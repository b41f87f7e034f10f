//! Fitting many tracks at once.
//!
//! Fits share no state, so tracks are spread across the rayon pool. Output
//! order matches input order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use easefit_core::FitConfig;

use crate::report::{fit_track, TrackReport};
use crate::span::KeyframeTrack;

/// Counts of fitted and skipped tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub ok: usize,
    pub skipped: usize,
}

/// Fit every track in parallel. A failing track only affects its own report.
pub fn fit_tracks(tracks: &[KeyframeTrack], config: &FitConfig, frame_rate: f64) -> Vec<TrackReport> {
    let reports: Vec<TrackReport> = tracks
        .par_iter()
        .map(|track| fit_track(track, config, frame_rate))
        .collect();

    let summary = summarize(&reports);
    tracing::info!(
        ok = summary.ok,
        skipped = summary.skipped,
        "fitted {} track(s)",
        reports.len()
    );
    reports
}

pub fn summarize(reports: &[TrackReport]) -> BatchSummary {
    let ok = reports.iter().filter(|r| r.is_ok()).count();
    BatchSummary {
        ok,
        skipped: reports.len() - ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easefit_core::CubicBezier;

    #[test]
    fn test_failures_are_isolated_and_order_is_kept() {
        let good: Vec<(f64, f64)> = (0..=6)
            .map(|i| {
                let t = i as f64 / 6.0;
                (t, CubicBezier::EASE_IN_OUT.ease(t))
            })
            .collect();
        let tracks = vec![
            KeyframeTrack::from_pairs("a", &good),
            KeyframeTrack::from_pairs("broken", &[(0.0, 0.0), (1.0, 1.0)]),
            KeyframeTrack::from_pairs("c", &good),
        ];

        let reports = fit_tracks(&tracks, &FitConfig::default(), 30.0);
        let names: Vec<&str> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "broken", "c"]);
        assert_eq!(summarize(&reports), BatchSummary { ok: 2, skipped: 1 });
        // Identical input gives identical output on any worker.
        assert_eq!(reports[0].summary(), reports[2].summary());
    }
}
