//! Shared helpers for CLI commands.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qdata_gen::{DatasetConfig, DatasetSummary};

/// Overrides taken from the command line.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub samples: Option<usize>,
    pub theta_0: Option<f64>,
    pub theta_1: Option<f64>,
    pub epsilon: Option<f64>,
    pub seed: Option<u64>,
}

/// Build the run configuration: defaults, then the YAML file, then flags.
pub fn resolve_config(path: Option<&str>, overrides: &ConfigOverrides) -> Result<DatasetConfig> {
    let mut config = match path {
        Some(path) => {
            if !Path::new(path).exists() {
                anyhow::bail!("Config file not found: {path}");
            }
            DatasetConfig::from_file(path)
                .with_context(|| format!("Failed to load config: {path}"))?
        }
        None => DatasetConfig::default(),
    };

    if let Some(samples) = overrides.samples {
        config.samples = samples;
    }
    if let Some(theta_0) = overrides.theta_0 {
        config.theta_0 = theta_0;
    }
    if let Some(theta_1) = overrides.theta_1 {
        config.theta_1 = theta_1;
    }
    if let Some(epsilon) = overrides.epsilon {
        config.epsilon = epsilon;
    }
    if overrides.seed.is_some() {
        config.seed = overrides.seed;
    }
    Ok(config)
}

/// Print a dataset summary as a small table.
pub fn print_summary(summary: &DatasetSummary) {
    let names = [
        "labeled states",
        "labeled bloch",
        "unlabeled states",
        "unlabeled bloch",
    ];
    for (name, len) in names.iter().zip(summary.lengths) {
        println!("  {:<18} {:>6}", style(name).cyan(), len);
    }
    println!(
        "  {:<18} {:>6} / {}",
        style("labels 0 / 1").cyan(),
        summary.label_zero,
        summary.label_one
    );
    if let Some(mean) = summary.mean_polar_labeled {
        println!("  {:<18} {:>9.4} rad", style("mean |θ| labeled").cyan(), mean);
    }
    if let Some(mean) = summary.mean_polar_unlabeled {
        println!("  {:<18} {:>9.4} rad", style("mean θ unlabeled").cyan(), mean);
    }
}
