use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use easefit_solver::KeyframeTrack;

pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Contents of a `fit` input file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitInput {
    /// Composition frame rate used to report the worst sample's frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    pub tracks: Vec<KeyframeTrack>,
}

impl FitInput {
    pub fn from_json(contents: &str) -> Result<Self> {
        let input: FitInput = serde_json::from_str(contents).context("Invalid fit input JSON")?;
        if let Some(rate) = input.frame_rate {
            validate_frame_rate(rate)?;
        }
        Ok(input)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

pub fn validate_frame_rate(rate: f64) -> Result<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        bail!("frame rate must be a positive number, got {}", rate);
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        let input = FitInput::from_json(
            r#"{
                "frame_rate": 24,
                "tracks": [
                    {"name": "x", "keys": [
                        {"time": 0.0, "value": 0.0},
                        {"time": 0.5, "value": 10.0, "selected": false},
                        {"time": 1.0, "value": 40.0}
                    ]}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(input.frame_rate, Some(24.0));
        assert_eq!(input.tracks.len(), 1);
        assert_eq!(input.tracks[0].keys.len(), 3);
        assert!(!input.tracks[0].keys[1].selected);
    }

    #[test]
    fn test_frame_rate_is_optional() {
        let input = FitInput::from_json(r#"{"tracks": []}"#).unwrap();
        assert!(input.frame_rate.is_none());
    }

    #[test]
    fn test_rejects_bad_frame_rate() {
        assert!(FitInput::from_json(r#"{"frame_rate": 0, "tracks": []}"#).is_err());
        assert!(validate_frame_rate(-24.0).is_err());
    }

    #[test]
    fn test_rejects_missing_tracks() {
        assert!(FitInput::from_json(r#"{"frame_rate": 24}"#).is_err());
    }
}
