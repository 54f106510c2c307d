//! bodymeasure schema command - list the measurement registry.

use anyhow::Result;
use body_metrics::{MeasurementKey, registry};
use colored::Colorize;

use crate::{Cli, OutputFormat, output};

pub fn run(cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Json => output::print(registry(), cli.format, cli.quiet),
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Measurements".bold().underline());
                println!(
                    "  {:<28} {:<5} {:<9} {}",
                    "key".dimmed(),
                    "unit".dimmed(),
                    "category".dimmed(),
                    "scaled".dimmed()
                );
                for key in MeasurementKey::ALL {
                    let meta = key.meta();
                    println!(
                        "  {:<28} {:<5} {:<9} {}",
                        key.as_str(),
                        meta.unit.as_str(),
                        meta.category.as_str(),
                        if meta.scales_with_height { "yes" } else { "no" }
                    );
                }
            }
        }
    }
    Ok(())
}
