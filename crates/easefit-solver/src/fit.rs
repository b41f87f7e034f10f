//! Multi-start fit driver.
//!
//! The objective is non-convex in the curve parameters, so a single
//! Nelder–Mead run can settle in a poor local minimum. The driver starts the
//! optimizer from a grid of seeds and keeps the best run.

use easefit_core::sample::EndpointSlopes;
use easefit_core::{
    estimate_endpoint_slopes, normalize, CubicBezier, EaseFitError, EaseFitResult, ErrorReport,
    FitConfig, FitResult, NormalizedSamples, SampleSet,
};

use crate::objective::FitObjective;
use crate::quality::compute_max_abs_error;
use crate::simplex::{Minimum, NelderMead};

/// A fit needs at least one interior sample.
pub const MIN_FIT_SAMPLES: usize = 3;
/// Candidate x1 values of the restart grid.
pub const RESTART_GRID_X1: [f64; 5] = [0.15, 0.25, 0.35, 0.50, 0.75];
/// Candidate x2 values of the restart grid.
pub const RESTART_GRID_X2: [f64; 4] = [0.50, 0.65, 0.80, 0.90];
/// Seed used when the restart grid is off.
pub const DEFAULT_SEED: (f64, f64) = (0.30, 0.70);
/// Initial simplex offsets for `[x1, y1, x2, y2]`.
pub const STEP_SIZES: [f64; 4] = [0.08, 0.20, 0.08, 0.20];

/// The `(x1, x2)` starting pairs for a configuration.
pub fn seed_pairs(config: &FitConfig) -> Vec<(f64, f64)> {
    if config.use_restart_grid {
        RESTART_GRID_X1
            .iter()
            .flat_map(|&x1| RESTART_GRID_X2.iter().map(move |&x2| (x1, x2)))
            .collect()
    } else {
        vec![DEFAULT_SEED]
    }
}

/// Complete a seed pair with y values that match the estimated endpoint
/// slopes.
pub fn make_seed(x1: f64, x2: f64, slopes: &EndpointSlopes, config: &FitConfig) -> [f64; 4] {
    let mut y1 = slopes.m0 * x1;
    let mut y2 = 1.0 - slopes.m1 * (1.0 - x2);
    if config.clamp_y_to_unit {
        y1 = y1.clamp(0.0, 1.0);
        y2 = y2.clamp(0.0, 1.0);
    }
    [x1, y1, x2, y2]
}

/// Fit one cubic-bezier to normalized samples.
pub fn fit(samples: &NormalizedSamples, config: &FitConfig) -> EaseFitResult<FitResult> {
    if samples.len() < MIN_FIT_SAMPLES {
        return Err(EaseFitError::insufficient(samples.len(), MIN_FIT_SAMPLES));
    }
    let config = config.normalized()?;

    let slopes = estimate_endpoint_slopes(samples);
    let objective = FitObjective::new(samples, &config);
    let optimizer =
        NelderMead::new(config.iterations()).with_tolerance(config.convergence_tolerance);

    let mut best: Option<Minimum> = None;
    for (x1, x2) in seed_pairs(&config) {
        let seed = make_seed(x1, x2, &slopes, &config);
        let run = optimizer.minimize(|p| objective.value(p), &seed, &STEP_SIZES)?;
        tracing::debug!(
            seed_x1 = x1,
            seed_x2 = x2,
            value = run.value,
            evaluations = run.evaluations,
            "seed finished"
        );
        if best.as_ref().map_or(true, |b| run.value < b.value) {
            best = Some(run);
        }
    }

    let best = best.ok_or_else(|| EaseFitError::invalid("no seeds to optimize"))?;
    let mut curve = CubicBezier::new(best.point[0], best.point[1], best.point[2], best.point[3])
        .with_clamped_x(config.epsilon);
    if config.clamp_y_to_unit {
        curve = curve.with_clamped_y();
    }

    if !best.value.is_finite() {
        return Err(EaseFitError::invalid(format!(
            "fit produced a non-finite error ({})",
            curve
        )));
    }

    Ok(FitResult::new(curve, best.value))
}

/// Everything produced by fitting one sample set.
#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub normalized: NormalizedSamples,
    pub fit: FitResult,
    pub error: ErrorReport,
}

/// Normalize, fit and measure a raw sample set.
pub fn fit_samples(set: &SampleSet, config: &FitConfig) -> EaseFitResult<FitOutcome> {
    if set.len() < MIN_FIT_SAMPLES {
        return Err(EaseFitError::insufficient(set.len(), MIN_FIT_SAMPLES));
    }
    let normalized = normalize(set)?;
    let fit = fit(&normalized, config)?;
    let error = compute_max_abs_error(set, &normalized, &fit)?;
    tracing::debug!(
        curve = %fit,
        sse = fit.sse,
        max_error = error.max_error,
        "fit complete"
    );
    Ok(FitOutcome {
        normalized,
        fit,
        error,
    })
}
