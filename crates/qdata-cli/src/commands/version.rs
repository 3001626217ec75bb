//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - synthetic single-qubit datasets",
        style("qdata").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qdata-gen   Samplers, state geometry and .npy codec");
    println!("  qdata-cli   Command-line interface");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
