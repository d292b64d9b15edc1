mod host;
mod input;
mod options;

use anyhow::{anyhow, Error as AnyError};
use clap::Parser;
use flyover::{assemble, FlyoverPath, SceneHost, TrackingPolicy};
use host::RecordingHost;
use options::{Cli, Command as CliCmd};
use serde::Serialize;
use std::io::Write;
use terramesh::{math::Vec3, TerrainMesh};

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    env_logger::init();

    let heightfield = input::load_ascii_grid(&cli.dem)?;
    let mesh = TerrainMesh::builder()
        .z_scale(cli.z_scale)
        .image_sample(cli.image_sample)
        .build(&heightfield)?;
    let path = FlyoverPath::plan(cli.pattern.into(), &mesh, &heightfield)?;

    match cli.cmd {
        CliCmd::Csv => print_csv(&path)?,
        CliCmd::Json => print_json(&path)?,
        CliCmd::Summary => print_summary(&cli, &mesh, &path)?,
    }
    Ok(())
}

fn print_csv(path: &FlyoverPath) -> Result<(), AnyError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "X,Y,Z")?;
    for Vec3 { x, y, z } in &path.waypoints {
        writeln!(stdout, "{x},{y},{z}")?;
    }
    Ok(())
}

fn print_json(path: &FlyoverPath) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonOptics {
        focal_length_mm: f64,
        clip_start: f64,
        clip_end: f64,
    }

    #[derive(Serialize)]
    struct JsonPath {
        pattern: String,
        tracking: &'static str,
        target: Option<[f64; 3]>,
        optics: JsonOptics,
        waypoints: Vec<[f64; 3]>,
    }

    let (tracking, target) = match path.tracking {
        TrackingPolicy::StaticTarget(p) => ("static-target", Some([p.x, p.y, p.z])),
        TrackingPolicy::FollowCurveTangent => ("curve-tangent", None),
        TrackingPolicy::FollowExplicitTarget(p) => ("explicit-target", Some([p.x, p.y, p.z])),
    };

    let reshaped = JsonPath {
        pattern: format!("{:?}", path.pattern).to_lowercase(),
        tracking,
        target,
        optics: JsonOptics {
            focal_length_mm: path.optics.focal_length_mm,
            clip_start: path.optics.clip_start,
            clip_end: path.optics.clip_end,
        },
        waypoints: path.waypoints.iter().map(|w| [w.x, w.y, w.z]).collect(),
    };
    let json = serde_json::to_string(&reshaped)?;
    println!("{json}");
    Ok(())
}

fn print_summary(cli: &Cli, mesh: &TerrainMesh, path: &FlyoverPath) -> Result<(), AnyError> {
    let mut scene = RecordingHost::default();
    let mesh_name = cli
        .dem
        .file_stem()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("dtm");
    scene
        .create_mesh(mesh, mesh_name)
        .ok_or_else(|| anyhow!("scene host failed to create mesh"))?;
    assemble(&mut scene, path)?;

    let mut stdout = std::io::stdout().lock();
    let (width, height) = cli.resolution.frame_size();
    let (min, max) = mesh.extents();
    writeln!(stdout, "render target: {width}x{height}")?;
    writeln!(
        stdout,
        "mesh extents: ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
        min.x, min.y, min.z, max.x, max.y, max.z
    )?;
    writeln!(stdout, "ground reference: {:.4}", mesh.ground_reference())?;
    writeln!(stdout, "waypoints: {}", path.waypoints.len())?;
    writeln!(stdout, "objects:")?;
    for object in &scene.objects {
        writeln!(stdout, "  {object}")?;
    }
    writeln!(stdout, "constraints:")?;
    for constraint in &scene.constraints {
        writeln!(stdout, "  {constraint}")?;
    }
    if let Some(frames) = scene.animation_frames {
        writeln!(stdout, "animation: {frames} frames")?;
    }
    Ok(())
}
