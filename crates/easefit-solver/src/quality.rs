use easefit_core::{EaseFitError, EaseFitResult, ErrorReport, FitResult, NormalizedSamples, SampleSet};

/// Largest absolute difference between the fitted curve and the original
/// samples, in original value units.
///
/// Ties keep the earliest sample. A non-finite error at any sample is an
/// error rather than a silent zero. Used for reporting only.
pub fn compute_max_abs_error(
    original: &SampleSet,
    normalized: &NormalizedSamples,
    fit: &FitResult,
) -> EaseFitResult<ErrorReport> {
    if original.len() != normalized.len() {
        return Err(EaseFitError::invalid(format!(
            "sample count mismatch: {} original vs {} normalized",
            original.len(),
            normalized.len()
        )));
    }

    let curve = fit.curve();
    let map = normalized.normalization();
    let mut report = ErrorReport::default();

    for (index, (sample, point)) in original.iter().zip(normalized.points()).enumerate() {
        let predicted = map.denormalize_value(curve.ease(point.t));
        let error = (predicted - sample.value).abs();
        if !error.is_finite() {
            return Err(EaseFitError::invalid(format!(
                "fit error at sample {} is not finite",
                index
            )));
        }
        if error > report.max_error {
            report = ErrorReport {
                max_error: error,
                worst_index: index,
            };
        }
    }

    Ok(report)
}
