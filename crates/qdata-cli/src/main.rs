//! qdata command-line interface.
//!
//! Generates and inspects synthetic single-qubit datasets.
//!
//! ```text
//! qdata generate --seed 42 -o q_dataset.npy
//! qdata inspect -i q_dataset.npy --format json
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::generate::GenerateArgs;
use commands::{generate, inspect, version};

/// qdata - synthetic labeled qubit-state datasets
#[derive(Parser)]
#[command(name = "qdata")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset and write it as four .npy arrays
    Generate {
        /// Output file
        #[arg(short, long, default_value = qdata_gen::DEFAULT_OUTPUT)]
        output: String,

        /// YAML configuration file (flags below take precedence)
        #[arg(short, long, env = "QDATA_CONFIG")]
        config: Option<String>,

        /// Number of labeled samples (unlabeled set gets half)
        #[arg(short = 'n', long)]
        samples: Option<usize>,

        /// Center angle of cluster 0 (radians)
        #[arg(long)]
        theta_0: Option<f64>,

        /// Center angle of cluster 1 (radians)
        #[arg(long)]
        theta_1: Option<f64>,

        /// Perturbation bound around the cluster centers
        #[arg(short, long)]
        epsilon: Option<f64>,

        /// Random seed for a reproducible dataset
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Read a dataset file back and summarise it
    Inspect {
        /// Dataset file
        #[arg(short, long, default_value = qdata_gen::DEFAULT_OUTPUT)]
        input: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Generate {
            output,
            config,
            samples,
            theta_0,
            theta_1,
            epsilon,
            seed,
        } => generate::execute(&GenerateArgs {
            output,
            config,
            samples,
            theta_0,
            theta_1,
            epsilon,
            seed,
        }),

        Commands::Inspect { input, format } => inspect::execute(&input, &format),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
