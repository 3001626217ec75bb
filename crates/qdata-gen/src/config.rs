//! Generator configuration.

use std::f64::consts::FRAC_PI_2;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, GenResult};

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "q_dataset.npy";

/// Parameters of one dataset generation run.
///
/// All fields are optional in a YAML document; missing ones take the
/// defaults below.
///
/// ```rust
/// use qdata_gen::DatasetConfig;
///
/// let cfg = DatasetConfig::default().with_samples(40).with_seed(7);
/// assert_eq!(cfg.unlabeled_samples(), 20);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Number of labeled samples N. The unlabeled set has floor(N/2) entries.
    pub samples: usize,
    /// Center of cluster 0 (radians).
    pub theta_0: f64,
    /// Center of cluster 1 (radians).
    pub theta_1: f64,
    /// Perturbation bound around the cluster centers.
    pub epsilon: f64,
    /// Seed for the random source; `None` draws from the thread-local RNG.
    pub seed: Option<u64>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            samples: 20,
            theta_0: 0.0,
            theta_1: FRAC_PI_2,
            epsilon: 0.2,
            seed: None,
        }
    }
}

impl DatasetConfig {
    /// Parse a configuration from a YAML document.
    pub fn from_yaml_str(source: &str) -> GenResult<Self> {
        Ok(serde_yaml_ng::from_str(source)?)
    }

    /// Load a configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&source)
    }

    /// Set the labeled sample count.
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Set both cluster centers.
    #[must_use]
    pub fn with_centers(mut self, theta_0: f64, theta_1: f64) -> Self {
        self.theta_0 = theta_0;
        self.theta_1 = theta_1;
        self
    }

    /// Set the perturbation bound.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Fix the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of unlabeled samples, floor(N/2).
    pub fn unlabeled_samples(&self) -> usize {
        self.samples / 2
    }

    /// Check that every uniform range used by the samplers is non-empty.
    pub fn validate(&self) -> GenResult<()> {
        for (field, value) in [
            ("theta_0", self.theta_0),
            ("theta_1", self.theta_1),
            ("epsilon", self.epsilon),
        ] {
            if !value.is_finite() {
                return Err(GenError::InvalidConfig {
                    field,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        // Finite inputs can still overflow the sampling bounds.
        for (field, derived) in [
            ("epsilon", 2.0 * self.epsilon),
            ("epsilon", self.theta_1 + self.epsilon),
            ("theta_0", self.theta_0 - self.epsilon),
            ("theta_1", self.theta_1 - self.theta_0),
        ] {
            if !derived.is_finite() {
                return Err(GenError::InvalidConfig {
                    field,
                    reason: "is too large for the sampling range".to_string(),
                });
            }
        }
        if self.epsilon <= 0.0 {
            return Err(GenError::InvalidConfig {
                field: "epsilon",
                reason: format!("must be positive, got {}", self.epsilon),
            });
        }
        if self.theta_0 >= self.theta_1 {
            return Err(GenError::InvalidConfig {
                field: "theta_1",
                reason: format!(
                    "must be greater than theta_0 ({}), got {}",
                    self.theta_0, self.theta_1
                ),
            });
        }
        Ok(())
    }
}
