//! bodymeasure section command - horizontal section circumference.

use std::path::Path;

use anyhow::{Context, Result, bail};
use body_metrics::io::{load_rigs_from, select_person};
use body_metrics::slice::{SCAN_BAND_THICKNESS, scan_min_circumference, section_circumference};
use colored::Colorize;
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct SectionInfo {
    level_y: f64,
    thickness: f64,
    /// Circumference in centimeters, unscaled.
    #[serde(skip_serializing_if = "Option::is_none")]
    circumference_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    scan: Option<ScanInfo>,
}

#[derive(Serialize)]
struct ScanInfo {
    from: f64,
    to: f64,
    steps: usize,
}

pub fn run(
    input: &Path,
    person: usize,
    level: Option<f64>,
    thickness: f64,
    scan: Option<&[f64]>,
    steps: usize,
    cli: &Cli,
) -> Result<()> {
    if thickness.is_nan() || thickness <= 0.0 {
        bail!("Band thickness must be positive, got {}", thickness);
    }

    let rigs =
        load_rigs_from(input).with_context(|| format!("Failed to load rigs from {:?}", input))?;
    let rig = select_person(rigs, person)?;
    let vertices = rig.vertex_points();

    let info = match (scan, level) {
        (Some(&[from, to]), _) => {
            output::info(
                &format!("Scanning {} levels from {:.3} to {:.3}...", steps, from, to),
                cli.format,
                cli.quiet,
            );
            let found = scan_min_circumference(&vertices, from, to, steps);
            SectionInfo {
                level_y: found.map_or(from, |(y, _)| y),
                thickness: SCAN_BAND_THICKNESS,
                circumference_cm: found.map(|(_, g)| g * 100.0),
                scan: Some(ScanInfo { from, to, steps }),
            }
        }
        (None, Some(level_y)) => SectionInfo {
            level_y,
            thickness,
            circumference_cm: section_circumference(&vertices, level_y, thickness)
                .map(|g| g * 100.0),
            scan: None,
        },
        _ => bail!("Pass either --level or --scan FROM TO"),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Section".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                if let Some(ref s) = info.scan {
                    println!(
                        "  {}: {:.3} .. {:.3} m ({} steps)",
                        "Scan range".cyan(),
                        s.from,
                        s.to,
                        s.steps
                    );
                }
                println!("  {}: {:.3} m", "Level".cyan(), info.level_y);
                println!("  {}: ±{:.3} m", "Band".cyan(), info.thickness);
                match info.circumference_cm {
                    Some(c) => println!("  {}: {:.2} cm", "Circumference".cyan(), c),
                    None => println!(
                        "  {}: {}",
                        "Circumference".cyan(),
                        "no section at this level".yellow()
                    ),
                }
            }
        }
    }

    Ok(())
}
