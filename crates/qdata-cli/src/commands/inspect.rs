//! Inspect command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qdata_gen::Dataset;

use super::common::print_summary;

/// Execute the inspect command.
pub fn execute(input: &str, format: &str) -> Result<()> {
    if !Path::new(input).exists() {
        anyhow::bail!("File not found: {input}");
    }

    let dataset =
        Dataset::load(input).with_context(|| format!("Failed to read dataset: {input}"))?;
    let summary = dataset.summary();

    match format.to_lowercase().as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "table" => {
            println!("{} {}", style("Dataset").bold(), style(input).green());
            print_summary(&summary);
        }
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    }

    Ok(())
}
