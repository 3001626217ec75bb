//! Dataset generation.
//!
//! Runs the labeled sampler N times, then the unlabeled sampler floor(N/2)
//! times, against a single random source. With a seeded source the output is
//! byte-for-byte reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::DatasetConfig;
use crate::dataset::Dataset;
use crate::error::GenResult;
use crate::sampler::{draw_labeled, draw_unlabeled};

/// Generator bound to a validated configuration.
#[derive(Debug, Clone)]
pub struct Generator {
    config: DatasetConfig,
}

impl Generator {
    /// Validate `config` and wrap it.
    pub fn new(config: DatasetConfig) -> GenResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Generate a dataset using the given random source.
    ///
    /// ```rust
    /// use rand::SeedableRng;
    /// use qdata_gen::{DatasetConfig, Generator};
    ///
    /// let generator = Generator::new(DatasetConfig::default()).unwrap();
    /// let rng = rand::rngs::StdRng::seed_from_u64(42);
    /// let dataset = generator.generate_with_rng(rng);
    /// assert_eq!(dataset.lengths(), [20, 20, 10, 10]);
    /// ```
    pub fn generate_with_rng<R: Rng>(&self, mut rng: R) -> Dataset {
        let n_labeled = self.config.samples;
        let n_unlabeled = self.config.unlabeled_samples();
        debug!(
            n_labeled,
            n_unlabeled,
            theta_0 = self.config.theta_0,
            theta_1 = self.config.theta_1,
            epsilon = self.config.epsilon,
            "generating dataset"
        );

        let mut dataset = Dataset::with_capacity(n_labeled, n_unlabeled);
        for _ in 0..n_labeled {
            dataset.push(&draw_labeled(&self.config, &mut rng));
        }
        for _ in 0..n_unlabeled {
            dataset.push(&draw_unlabeled(&self.config, &mut rng));
        }
        dataset
    }

    /// Generate using `StdRng` seeded from the config, or the thread-local
    /// RNG when no seed is set.
    pub fn generate(&self) -> Dataset {
        match self.config.seed {
            Some(seed) => self.generate_with_rng(StdRng::seed_from_u64(seed)),
            None => self.generate_with_rng(rand::thread_rng()),
        }
    }
}
