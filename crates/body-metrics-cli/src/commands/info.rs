//! bodymeasure info command - display rig statistics.

use std::path::Path;

use anyhow::{Context, Result};
use body_metrics::io::{load_rigs_from, select_person};
use body_metrics::{BodyFrame, LandmarkSource, SkeletalLandmarks};
use colored::Colorize;
use serde::Serialize;

use crate::{Cli, OutputFormat, output};

#[derive(Serialize)]
struct RigInfo {
    path: String,
    person: usize,
    persons: usize,
    vertices: usize,
    faces: usize,
    joints: usize,
    keypoints: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height_cm: Option<f64>,
    resolved_landmarks: usize,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

pub fn run(input: &Path, person: usize, cli: &Cli) -> Result<()> {
    let rigs =
        load_rigs_from(input).with_context(|| format!("Failed to load rigs from {:?}", input))?;
    let persons = rigs.len();
    let rig = select_person(rigs, person)?;

    let bounds = rig.bounds().map(|(min, max)| {
        let dims = max - min;
        BoundsInfo {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        }
    });
    // A flat or empty mesh still has statistics worth showing.
    let height_cm = BodyFrame::from_vertices(&rig.vertex_points())
        .ok()
        .map(|frame| frame.height_m * 100.0);
    let source = LandmarkSource::from_rig(&rig);
    let landmarks = SkeletalLandmarks::resolve(&source);

    let info = RigInfo {
        path: input.display().to_string(),
        person,
        persons,
        vertices: rig.vertex_count(),
        faces: rig.face_count(),
        joints: source.joint_count(),
        keypoints: source.keypoint_count(),
        bounds,
        height_cm,
        resolved_landmarks: landmarks.resolved_count(),
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Rig Information".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                println!("  {}: {} of {}", "Person".cyan(), person, persons);
                println!("  {}: {}", "Vertices".cyan(), info.vertices);
                println!("  {}: {}", "Faces".cyan(), info.faces);
                println!("  {}: {}", "Joints".cyan(), info.joints);
                println!("  {}: {}", "Keypoints".cyan(), info.keypoints);
                println!(
                    "  {}: {}",
                    "Skeletal landmarks".cyan(),
                    info.resolved_landmarks
                );

                if let Some(ref b) = info.bounds {
                    println!("\n{}", "Bounding Box:".bold());
                    println!(
                        "  {}: [{:.3}, {:.3}, {:.3}]",
                        "Min".cyan(),
                        b.min[0],
                        b.min[1],
                        b.min[2]
                    );
                    println!(
                        "  {}: [{:.3}, {:.3}, {:.3}]",
                        "Max".cyan(),
                        b.max[0],
                        b.max[1],
                        b.max[2]
                    );
                    println!(
                        "  {}: {:.3} x {:.3} x {:.3} m",
                        "Dimensions".cyan(),
                        b.dimensions[0],
                        b.dimensions[1],
                        b.dimensions[2]
                    );
                }
                match info.height_cm {
                    Some(h) => println!("  {}: {:.2} cm", "Height".cyan(), h),
                    None => println!("  {}: {}", "Height".cyan(), "unavailable".yellow()),
                }
            }
        }
    }

    Ok(())
}
