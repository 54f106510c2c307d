//! bodymeasure measure command - compute the measurement report.

use std::path::Path;

use anyhow::{Context, Result};
use body_metrics::io::{load_rigs_from, select_person};
use body_metrics::{Category, MeasureParams, MeasurementKey, MeasurementReport, compute_all};
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use crate::{Cli, OutputFormat, output};

const CATEGORY_ORDER: [(Category, &str); 5] = [
    (Category::Vertical, "Vertical"),
    (Category::Girth, "Girths"),
    (Category::Width, "Widths"),
    (Category::Special, "Special"),
    (Category::Angle, "Angles"),
];

#[derive(Serialize)]
struct PersonReport {
    person: usize,
    #[serde(flatten)]
    report: MeasurementReport,
}

pub fn run(
    input: &Path,
    person: Option<usize>,
    target_height: Option<f64>,
    config: Option<&Path>,
    output_path: Option<&Path>,
    sequential: bool,
    cli: &Cli,
) -> Result<()> {
    let mut params = match config {
        Some(path) => MeasureParams::from_toml_file(path)?,
        None => MeasureParams::default(),
    };
    if sequential {
        params.parallel_scan = false;
    }
    debug!(?params, "Measurement parameters");

    let rigs =
        load_rigs_from(input).with_context(|| format!("Failed to load rigs from {:?}", input))?;
    let (indices, rigs): (Vec<usize>, Vec<_>) = match person {
        Some(index) => (vec![index], vec![select_person(rigs, index)?]),
        None => rigs.into_iter().enumerate().unzip(),
    };

    output::info(
        &format!("Measuring {} person(s)...", rigs.len()),
        cli.format,
        cli.quiet,
    );

    let mut reports = Vec::with_capacity(rigs.len());
    for (index, result) in indices.into_iter().zip(compute_all(&rigs, target_height, &params)) {
        let report = result.with_context(|| format!("Failed to measure person {}", index))?;
        reports.push(PersonReport {
            person: index,
            report,
        });
    }

    if let Some(path) = output_path {
        let json = match reports.as_slice() {
            [single] => serde_json::to_string_pretty(&single.report)?,
            all => serde_json::to_string_pretty(all)?,
        };
        std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
        output::success(
            &format!("Report written to {}", path.display()),
            cli.format,
            cli.quiet,
        );
    }

    match cli.format {
        OutputFormat::Json => match reports.as_slice() {
            [single] => output::print(&single.report, cli.format, cli.quiet),
            all => output::print(&all, cli.format, cli.quiet),
        },
        OutputFormat::Text => {
            if !cli.quiet {
                for entry in &reports {
                    print_text(entry);
                }
            }
        }
    }

    Ok(())
}

fn print_text(entry: &PersonReport) {
    let report = &entry.report;
    println!(
        "{}",
        format!("Person {}", entry.person).bold().underline()
    );
    println!("  {}: {:.2} cm", "Reconstructed height".cyan(), report.actual_height_cm);
    println!("  {}: {:.2} cm", "Target height".cyan(), report.target_height_cm);
    println!("  {}: {:.4}", "Scale factor".cyan(), report.scale_factor);

    for (category, title) in CATEGORY_ORDER {
        println!("\n{}", format!("{title}:").bold());
        for key in MeasurementKey::ALL
            .into_iter()
            .filter(|k| k.meta().category == category)
        {
            let unit = key.meta().unit.as_str();
            match report.get(key) {
                Some(value) => println!("  {:<28} {:>8.2} {}", key.as_str(), value, unit),
                None => println!("  {:<28} {:>8}", key.as_str(), "n/a".dimmed()),
            }
        }
    }

    let missing = report.missing();
    if !missing.is_empty() {
        println!(
            "\n{}: {} measurement(s) unavailable",
            "Note".yellow(),
            missing.len()
        );
    }
    println!();
}
