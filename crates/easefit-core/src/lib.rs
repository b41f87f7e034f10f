//! # easefit-core
//!
//! Core types and primitives for the easefit curve fitter.
//! This crate contains the foundational pieces shared by the solver and the CLI:
//! cubic-bezier evaluation and inversion, samples and their normalization,
//! fit configuration, temporal ease conversion, and error types.

pub mod bezier;
pub mod config;
pub mod ease;
pub mod error;
pub mod sample;
pub mod types;

pub use bezier::{ease_value_at, evaluate_coordinate, evaluate_derivative, invert, CubicBezier};
pub use config::FitConfig;
pub use ease::{KeyEase, TemporalEase};
pub use error::{EaseFitError, EaseFitResult, RangeAxis};
pub use sample::{
    estimate_endpoint_slopes, normalize, EndpointSlopes, Normalization, NormalizedSample,
    NormalizedSamples, Sample, SampleSet,
};
pub use types::{ErrorReport, FitResult};
