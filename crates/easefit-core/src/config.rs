use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EaseFitError, EaseFitResult};

pub const DEFAULT_ITERATIONS: usize = 260;
pub const MIN_ITERATIONS: usize = 40;
pub const MAX_ITERATIONS: usize = 2000;
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// Options for one curve fit. Passed explicitly into every fit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Constrain y1, y2 into [0, 1] (no anticipation or overshoot).
    pub clamp_y_to_unit: bool,
    /// Penalize solutions where x1 > x2.
    pub enforce_x_order: bool,
    /// Start the optimizer from a grid of seeds instead of a single one.
    pub use_restart_grid: bool,
    /// Nelder–Mead iterations per seed, clamped to [40, 2000].
    pub max_iterations_per_seed: usize,
    /// Margin that keeps x1, x2 inside the open unit interval.
    pub epsilon: f64,
    /// Stop a seed early once the simplex values agree within this spread.
    /// Unset means every seed runs its full iteration budget.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub convergence_tolerance: Option<f64>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            clamp_y_to_unit: false,
            enforce_x_order: false,
            use_restart_grid: true,
            max_iterations_per_seed: DEFAULT_ITERATIONS,
            epsilon: DEFAULT_EPSILON,
            convergence_tolerance: None,
        }
    }
}

impl FitConfig {
    pub fn with_clamp_y(mut self, clamp: bool) -> Self {
        self.clamp_y_to_unit = clamp;
        self
    }

    pub fn with_x_order(mut self, enforce: bool) -> Self {
        self.enforce_x_order = enforce;
        self
    }

    pub fn with_restart_grid(mut self, enabled: bool) -> Self {
        self.use_restart_grid = enabled;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations_per_seed = iterations;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = Some(tolerance);
        self
    }

    /// Iteration budget after clamping to the supported range.
    pub fn iterations(&self) -> usize {
        self.max_iterations_per_seed
            .clamp(MIN_ITERATIONS, MAX_ITERATIONS)
    }

    /// Validate the configuration and apply the iteration clamp.
    pub fn normalized(&self) -> EaseFitResult<Self> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 || self.epsilon >= 0.5 {
            return Err(EaseFitError::invalid(format!(
                "epsilon must lie in (0, 0.5), got {}",
                self.epsilon
            )));
        }
        if let Some(tol) = self.convergence_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(EaseFitError::invalid(format!(
                    "convergence tolerance must be finite and non-negative, got {}",
                    tol
                )));
            }
        }
        Ok(Self {
            max_iterations_per_seed: self.iterations(),
            ..self.clone()
        })
    }

    pub fn from_toml_str(contents: &str) -> EaseFitResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> EaseFitResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load_from_file(path: &Path) -> EaseFitResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn save_to_file(&self, path: &Path) -> EaseFitResult<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FitConfig::default();
        assert!(!config.clamp_y_to_unit);
        assert!(!config.enforce_x_order);
        assert!(config.use_restart_grid);
        assert_eq!(config.max_iterations_per_seed, 260);
        assert_eq!(config.epsilon, 1e-8);
        assert!(config.convergence_tolerance.is_none());
    }

    #[test]
    fn test_iterations_are_clamped() {
        assert_eq!(FitConfig::default().with_iterations(5).iterations(), 40);
        assert_eq!(FitConfig::default().with_iterations(50_000).iterations(), 2000);
        let normalized = FitConfig::default().with_iterations(1).normalized().unwrap();
        assert_eq!(normalized.max_iterations_per_seed, 40);
    }

    #[test]
    fn test_normalized_rejects_bad_epsilon() {
        assert!(FitConfig::default().with_epsilon(0.0).normalized().is_err());
        assert!(FitConfig::default().with_epsilon(f64::NAN).normalized().is_err());
        assert!(FitConfig::default().with_epsilon(0.6).normalized().is_err());
        assert!(FitConfig::default()
            .with_convergence_tolerance(-1.0)
            .normalized()
            .is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = FitConfig::from_toml_str("clamp_y_to_unit = true\nmax_iterations_per_seed = 500\n")
            .unwrap();
        assert!(config.clamp_y_to_unit);
        assert_eq!(config.max_iterations_per_seed, 500);
        assert!(config.use_restart_grid);
        assert_eq!(config.epsilon, DEFAULT_EPSILON);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = FitConfig::default()
            .with_x_order(true)
            .with_convergence_tolerance(1e-12);
        let text = config.to_toml_string().unwrap();
        assert_eq!(FitConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("easefit-config-{}.toml", std::process::id()));
        let config = FitConfig::default().with_clamp_y(true);
        config.save_to_file(&path).unwrap();
        let loaded = FitConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
