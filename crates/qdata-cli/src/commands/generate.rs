//! Generate command implementation.

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qdata_gen::Generator;

use super::common::{ConfigOverrides, print_summary, resolve_config};

/// Arguments of the generate command.
#[derive(Debug)]
pub struct GenerateArgs {
    pub output: String,
    pub config: Option<String>,
    pub samples: Option<usize>,
    pub theta_0: Option<f64>,
    pub theta_1: Option<f64>,
    pub epsilon: Option<f64>,
    pub seed: Option<u64>,
}

/// Execute the generate command.
pub fn execute(args: &GenerateArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        samples: args.samples,
        theta_0: args.theta_0,
        theta_1: args.theta_1,
        epsilon: args.epsilon,
        seed: args.seed,
    };
    let config = resolve_config(args.config.as_deref(), &overrides)?;
    info!(?config, "resolved configuration");

    println!(
        "{} Generating {} labeled + {} unlabeled states",
        style("→").cyan().bold(),
        style(config.samples).green(),
        style(config.unlabeled_samples()).green()
    );
    match config.seed {
        Some(seed) => println!("  Seed: {}", style(seed).yellow()),
        None => println!("  Seed: {}", style("none (non-reproducible)").dim()),
    }

    let generator = Generator::new(config)?;
    let dataset = generator.generate();

    let bytes = dataset
        .save(&args.output)
        .with_context(|| format!("Failed to write dataset: {}", args.output))?;

    println!(
        "{} Wrote {} ({} bytes)",
        style("✓").green().bold(),
        style(&args.output).green(),
        bytes
    );
    print_summary(&dataset.summary());

    Ok(())
}
