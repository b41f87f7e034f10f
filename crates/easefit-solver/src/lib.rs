//! # easefit-solver
//!
//! Fits a single CSS-style cubic-bezier timing curve to baked keyframe
//! samples.
//!
//! The pipeline is: pick samples from a keyframe track ([`span`]), normalize
//! them (`easefit_core::sample`), minimize the least-squares objective
//! ([`objective`]) with multi-start Nelder–Mead ([`simplex`], [`fit`]), then
//! measure the reconstruction error ([`quality`]) and summarize the result
//! per track ([`report`], [`batch`]).

pub mod batch;
pub mod fit;
pub mod objective;
pub mod quality;
pub mod report;
pub mod simplex;
pub mod span;

pub use batch::{fit_tracks, summarize, BatchSummary};
pub use fit::{fit, fit_samples, FitOutcome};
pub use objective::FitObjective;
pub use quality::compute_max_abs_error;
pub use report::{fit_track, FitSummary, TrackReport, TrackStatus};
pub use simplex::{minimize, Minimum, NelderMead};
pub use span::{select_samples, Keyframe, KeyframeTrack, SampleMode, SpanSelection};
