//! `qdata-gen` — synthetic single-qubit datasets for swap-test classifiers.
//!
//! Produces two populations of single-qubit states, each in amplitude form
//! (a, b) and as Bloch coordinates (x, y, z):
//!
//! - a **labeled** set of N states drawn from two angular clusters, around
//!   `theta_0` (label 0) and just above `theta_1` (label 1);
//! - an **unlabeled** set of floor(N/2) states with θ uniform between the
//!   cluster centers, the ambiguous cases for a classifier.
//!
//! The four containers are written as four consecutive `.npy` arrays.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use qdata_gen::{DatasetConfig, Generator};
//!
//! let generator = Generator::new(DatasetConfig::default().with_seed(42))?;
//! let dataset = generator.generate();
//! dataset.save("q_dataset.npy")?;
//! # Ok::<(), qdata_gen::GenError>(())
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod npy;
pub mod sampler;
pub mod state;

pub use config::{DEFAULT_OUTPUT, DatasetConfig};
pub use dataset::{Dataset, DatasetSummary};
pub use error::{GenError, GenResult};
pub use generator::Generator;
pub use state::{Angles, BlochRecord, BlochVector, Draw, Label, QubitState, StateRecord};
