//! Flyover path planning.
//!
//! Each pattern is a pure function from the terrain mesh (and, for
//! profile extraction, the source heightfield) to a waypoint sequence
//! plus a framing policy. Pattern selection is a closed enum with a
//! single dispatch point in [`FlyoverPath::plan`].

use crate::FlyoverError;
use heightfield::Heightfield;
use log::debug;
use std::f64::consts::{FRAC_PI_2, TAU};
use terramesh::{
    math::{self, Vec3},
    TerrainMesh,
};

/// Vertical clearance flown above terrain samples on linear flights.
pub const FLIGHT_CLEARANCE: f64 = 25.0;

/// Extra planar margin added to the orbit radius so the camera circles
/// outside the mesh.
pub const ORBIT_MARGIN: f64 = 15.0;

/// Planar inset pulling diamond waypoints in from the mesh edge.
pub const DIAMOND_INSET: f64 = 5.0;

/// Fraction of trailing waypoints dropped from a linear flight so the
/// camera stops short of the frame edge.
pub const TRIM_FRACTION: f64 = 0.15;

/// Keep every Nth valid sample of the flight-line elevation profile.
pub const PROFILE_STRIDE: usize = 10;

/// Diamond flight height as a multiple of the mesh ground reference.
///
/// Probable defect: this scales the reference elevation instead of
/// adding a clearance above terrain, so flat meshes fly low and tall
/// references fly absurdly high. Kept as-is until the intended
/// behavior is confirmed.
pub const DIAMOND_HEIGHT_FACTOR: f64 = 5.0;

/// Height of the static overview camera above its target.
pub const OVERVIEW_HEIGHT: f64 = 400.0;

/// Segment count used to realize the circular orbit as a polyline.
pub const ORBIT_SEGMENTS: usize = 64;

/// Camera flight pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// No flight; a single static overview placement.
    Static,
    /// Straight flight down the mesh's long axis.
    Linear,
    /// Closed orbit around the mesh.
    Circle,
    /// Closed diamond loop inset from the mesh corners.
    Diamond,
}

/// How the camera is oriented while it moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingPolicy {
    /// Orient toward a fixed point for the whole flight.
    StaticTarget(Vec3),
    /// Orient along the flight curve itself.
    FollowCurveTangent,
    /// Orient toward a separate marker that rides the curve.
    FollowExplicitTarget(Vec3),
}

/// Per-pattern camera lens settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraOptics {
    /// Focal length in millimeters.
    pub focal_length_mm: f64,
    pub clip_start: f64,
    pub clip_end: f64,
}

impl CameraOptics {
    /// Distant static framing of the whole mesh.
    pub const OVERVIEW: Self = Self {
        focal_length_mm: 23.0,
        clip_start: 0.1,
        clip_end: 1250.0,
    };

    /// Wide lens for low flight over terrain.
    pub const LINEAR: Self = Self {
        focal_length_mm: 10.0,
        clip_start: 0.1,
        clip_end: 1250.0,
    };

    /// Default lens for close orbit and diamond loops.
    pub const ORBIT: Self = Self {
        focal_length_mm: 35.0,
        clip_start: 0.1,
        clip_end: 300.0,
    };
}

/// A planned camera trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyoverPath {
    pub pattern: Pattern,
    /// At least one waypoint; consecutive waypoints are distinct.
    pub waypoints: Vec<Vec3>,
    pub tracking: TrackingPolicy,
    pub optics: CameraOptics,
}

impl FlyoverPath {
    /// Plans a trajectory over `mesh` for the requested pattern.
    ///
    /// The mesh must have been built from `heightfield`; the planner
    /// reads the heightfield only for pixel-space bookkeeping
    /// (boundary corners and the center row/column).
    pub fn plan(
        pattern: Pattern,
        mesh: &TerrainMesh,
        heightfield: &Heightfield,
    ) -> Result<Self, FlyoverError> {
        let path = match pattern {
            Pattern::Static => static_view(mesh, heightfield),
            Pattern::Linear => linear(mesh, heightfield)?,
            Pattern::Circle => circle(mesh),
            Pattern::Diamond => diamond(mesh),
        };
        debug!(
            "planned {:?} path; {} waypoints",
            path.pattern,
            path.waypoints.len()
        );
        Ok(path)
    }
}

/// Static overview: camera high over the centered mesh, looking at
/// the center pixel's elevation.
fn static_view(mesh: &TerrainMesh, heightfield: &Heightfield) -> FlyoverPath {
    let (min, max) = mesh.extents();
    let (center_col, center_row) = heightfield.center_indices();
    let mut target_z = mesh.centered_elevation(center_col, center_row);
    if target_z.is_nan() {
        // No-data under the center pixel; fall back to the ground
        // reference.
        target_z = mesh.ground_reference();
    }
    let target = Vec3::new(0.0, 0.0, target_z);

    // Sit over the mesh's long edge: wide meshes are viewed down the
    // y axis, tall meshes down the x axis.
    let camera = if max.x > max.y {
        Vec3::new(
            0.0,
            max.y - (max.y - min.y) / 2.0,
            target.z + OVERVIEW_HEIGHT,
        )
    } else {
        Vec3::new(
            max.x - (max.x - min.x) / 2.0,
            0.0,
            target.z + OVERVIEW_HEIGHT,
        )
    };

    FlyoverPath {
        pattern: Pattern::Static,
        waypoints: vec![camera],
        tracking: TrackingPolicy::StaticTarget(target),
        optics: CameraOptics::OVERVIEW,
    }
}

/// Straight flight along the mesh's long axis, following the terrain
/// profile under the flight line.
fn linear(mesh: &TerrainMesh, heightfield: &Heightfield) -> Result<FlyoverPath, FlyoverError> {
    let (rows, cols) = (heightfield.rows(), heightfield.cols());
    let center = heightfield.pixel_center();
    let (center_col, center_row) = heightfield.center_indices();

    // Choose the flight axis by comparing the top boundary edge with
    // the left one. This compares two adjacent edges rather than true
    // width vs height; a deliberate simplification, kept as-is.
    let upper_left = Vec3::new(0.0, 0.0, 0.0);
    let upper_right = Vec3::new((cols - 1) as f64, 0.0, 0.0);
    let lower_left = Vec3::new(0.0, (rows - 1) as f64, 0.0);
    let along_rows = math::planar_distance(upper_left, upper_right)
        <= math::planar_distance(upper_left, lower_left);

    let ground = mesh.ground_reference().abs();
    #[allow(clippy::cast_precision_loss)]
    let mut waypoints: Vec<Vec3> = if along_rows {
        // Fly the center column, in raster row order.
        let valid: Vec<(usize, f64)> = (0..rows)
            .map(|row| (row, mesh.centered_elevation(center_col, row)))
            .filter(|(_, z)| !z.is_nan())
            .collect();
        valid
            .into_iter()
            .step_by(PROFILE_STRIDE)
            .map(|(row, z)| {
                Vec3::new(
                    center_col as f64 - center.x,
                    row as f64 - center.y,
                    ground + z + FLIGHT_CLEARANCE,
                )
            })
            .collect()
    } else {
        // Fly the center row, west to east.
        let valid: Vec<(usize, f64)> = (0..cols)
            .map(|col| (col, mesh.centered_elevation(col, center_row)))
            .filter(|(_, z)| !z.is_nan())
            .collect();
        valid
            .into_iter()
            .step_by(PROFILE_STRIDE)
            .map(|(col, z)| {
                Vec3::new(
                    col as f64 - center.x,
                    center_row as f64 - center.y,
                    ground + z + FLIGHT_CLEARANCE,
                )
            })
            .collect()
    };

    if waypoints.is_empty() {
        return Err(FlyoverError::EmptyProfile);
    }
    if waypoints.len() < 2 {
        return Err(FlyoverError::PathTooShort {
            needed: 2,
            got: waypoints.len(),
        });
    }

    // The first sample often sits in a dip at the frame edge; opening
    // the flight at the second waypoint's height removes the initial
    // plunge.
    waypoints[0].z = waypoints[1].z;

    // Stop short of the far frame edge.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let keep = (waypoints.len() as f64 * (1.0 - TRIM_FRACTION)).floor() as usize;
    if keep < 2 {
        return Err(FlyoverError::PathTooShort { needed: 2, got: keep });
    }
    waypoints.truncate(keep);

    Ok(FlyoverPath {
        pattern: Pattern::Linear,
        waypoints,
        tracking: TrackingPolicy::FollowCurveTangent,
        optics: CameraOptics::LINEAR,
    })
}

/// Closed orbit around the mesh at a fixed height, watching its
/// center.
fn circle(mesh: &TerrainMesh) -> FlyoverPath {
    let extremes = Extremes::scan(mesh);
    let center_xy = math::midpoint(
        math::midpoint(extremes.x_max, extremes.x_min),
        math::midpoint(extremes.y_max, extremes.y_min),
    );
    let center = Vec3::new(center_xy.x, center_xy.y, extremes.z_max);
    let radius = math::planar_distance(extremes.x_max, extremes.x_min) + ORBIT_MARGIN;
    let orbit_z = center.z + FLIGHT_CLEARANCE;

    // Sampled closed loop, starting due south of center so the first
    // waypoint is the camera's start position.
    #[allow(clippy::cast_precision_loss)]
    let waypoints: Vec<Vec3> = (0..=ORBIT_SEGMENTS)
        .map(|i| {
            let theta = -FRAC_PI_2 + TAU * (i as f64 / ORBIT_SEGMENTS as f64);
            Vec3::new(
                center.x + radius * theta.cos(),
                center.y + radius * theta.sin(),
                orbit_z,
            )
        })
        .collect();

    FlyoverPath {
        pattern: Pattern::Circle,
        waypoints,
        tracking: TrackingPolicy::StaticTarget(center),
        optics: CameraOptics::ORBIT,
    }
}

/// Closed diamond loop over the side midpoints of the mesh's extreme
/// points, inset from the edges.
fn diamond(mesh: &TerrainMesh) -> FlyoverPath {
    let extremes = Extremes::scan(mesh);
    let mut side_one = math::midpoint(extremes.y_min, extremes.x_min);
    let mut side_two = math::midpoint(extremes.x_min, extremes.y_max);
    let mut side_three = math::midpoint(extremes.y_max, extremes.x_max);
    let mut side_four = math::midpoint(extremes.x_max, extremes.y_min);

    // Pull each midpoint in from the edge. Which way is "in" on the y
    // axis depends on whether side one sits below or above side three.
    if side_one.y < side_three.y {
        side_one.x += DIAMOND_INSET;
        side_one.y += DIAMOND_INSET;
        side_two.x += DIAMOND_INSET;
        side_two.y -= DIAMOND_INSET;
        side_three.x -= DIAMOND_INSET;
        side_three.y -= DIAMOND_INSET;
        side_four.x -= DIAMOND_INSET;
        side_four.y += DIAMOND_INSET;
    } else {
        side_one.x += DIAMOND_INSET;
        side_one.y -= DIAMOND_INSET;
        side_two.x += DIAMOND_INSET;
        side_two.y += DIAMOND_INSET;
        side_three.x -= DIAMOND_INSET;
        side_three.y += DIAMOND_INSET;
        side_four.x -= DIAMOND_INSET;
        side_four.y -= DIAMOND_INSET;
    }

    // Closed five-point loop, first point repeated at the end.
    let mut waypoints = vec![side_two, side_three, side_four, side_one, side_two];
    let flight_z = DIAMOND_HEIGHT_FACTOR * mesh.ground_reference();
    for waypoint in &mut waypoints {
        waypoint.z = flight_z;
    }

    FlyoverPath {
        pattern: Pattern::Diamond,
        waypoints,
        tracking: TrackingPolicy::FollowCurveTangent,
        optics: CameraOptics::ORBIT,
    }
}

/// The four planar extreme vertices of a mesh and its highest valid
/// elevation.
struct Extremes {
    x_max: Vec3,
    x_min: Vec3,
    y_max: Vec3,
    y_min: Vec3,
    z_max: f64,
}

impl Extremes {
    /// Scans every vertex. Ties on the max side resolve to the
    /// later-scanned vertex (`>=`), ties on the min side to the
    /// earlier (`<`). No-data elevations never win the z scan.
    fn scan(mesh: &TerrainMesh) -> Self {
        // Meshes are at least 2x2, so a first vertex always exists.
        let first = mesh.vertices()[0];
        let mut extremes = Self {
            x_max: first,
            x_min: first,
            y_max: first,
            y_min: first,
            z_max: if first.z.is_nan() { f64::NEG_INFINITY } else { first.z },
        };
        for &vertex in &mesh.vertices()[1..] {
            if vertex.x >= extremes.x_max.x {
                extremes.x_max = vertex;
            }
            if vertex.x < extremes.x_min.x {
                extremes.x_min = vertex;
            }
            if vertex.y >= extremes.y_max.y {
                extremes.y_max = vertex;
            }
            if vertex.y < extremes.y_min.y {
                extremes.y_min = vertex;
            }
            if !vertex.z.is_nan() && vertex.z > extremes.z_max {
                extremes.z_max = vertex.z;
            }
        }
        extremes
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CameraOptics, FlyoverPath, Pattern, TrackingPolicy, FLIGHT_CLEARANCE, ORBIT_MARGIN,
        OVERVIEW_HEIGHT,
    };
    use approx::assert_relative_eq;
    use heightfield::Heightfield;
    use terramesh::{math, TerrainMesh};

    fn flat(cols: usize, rows: usize, elevation: f64) -> (Heightfield, TerrainMesh) {
        let hf = Heightfield::new(
            vec![elevation; rows * cols],
            cols,
            rows,
            (1.0, -1.0),
            None,
        )
        .unwrap();
        let mesh = TerrainMesh::builder().build(&hf).unwrap();
        (hf, mesh)
    }

    fn ramp(cols: usize, rows: usize) -> (Heightfield, TerrainMesh) {
        #[allow(clippy::cast_precision_loss)]
        let samples = (0..rows * cols).map(|i| i as f64).collect();
        let hf = Heightfield::new(samples, cols, rows, (1.0, -1.0), None).unwrap();
        let mesh = TerrainMesh::builder().build(&hf).unwrap();
        (hf, mesh)
    }

    #[test]
    fn test_static_tall_mesh() {
        let (hf, mesh) = ramp(4, 4);
        let path = FlyoverPath::plan(Pattern::Static, &mesh, &hf).unwrap();
        assert_eq!(path.waypoints.len(), 1);
        assert_eq!(path.optics, CameraOptics::OVERVIEW);

        // Center pixel (2,2) carries 10; the grid mean is 7.5.
        let TrackingPolicy::StaticTarget(target) = path.tracking else {
            panic!("static pattern must track a fixed target");
        };
        assert_relative_eq!(target.x, 0.0);
        assert_relative_eq!(target.y, 0.0);
        assert_relative_eq!(target.z, 2.5);
        assert_relative_eq!(path.waypoints[0].z, target.z + OVERVIEW_HEIGHT);
    }

    #[test]
    fn test_static_camera_sits_on_short_axis() {
        let (hf, mesh) = flat(8, 4, 100.0);
        let path = FlyoverPath::plan(Pattern::Static, &mesh, &hf).unwrap();
        // Wide mesh: the camera stays on the y midline.
        assert_relative_eq!(path.waypoints[0].x, 0.0);
    }

    #[test]
    fn test_linear_waypoint_count_and_level_start() {
        // 100 valid samples along the flight column: stride 10 keeps
        // 10, the 15% trim leaves floor(8.5) = 8.
        let (hf, mesh) = ramp(3, 100);
        let path = FlyoverPath::plan(Pattern::Linear, &mesh, &hf).unwrap();
        assert_eq!(path.waypoints.len(), 8);
        assert_relative_eq!(path.waypoints[0].z, path.waypoints[1].z);
        assert_eq!(path.tracking, TrackingPolicy::FollowCurveTangent);
        assert_eq!(path.optics, CameraOptics::LINEAR);
    }

    #[test]
    fn test_linear_skips_no_data_run() {
        // A 10-row NaN band leaves 100 valid samples, same count as a
        // clean 100-row grid.
        let cols = 3;
        let rows = 110;
        #[allow(clippy::cast_precision_loss)]
        let mut samples: Vec<f64> = (0..rows * cols).map(|i| (i % 50) as f64).collect();
        for row in 50..60 {
            for col in 0..cols {
                samples[row * cols + col] = f64::NAN;
            }
        }
        let hf = Heightfield::new(samples, cols, rows, (1.0, -1.0), None).unwrap();
        let mesh = TerrainMesh::builder().build(&hf).unwrap();
        let path = FlyoverPath::plan(Pattern::Linear, &mesh, &hf).unwrap();
        assert_eq!(path.waypoints.len(), 8);
        for waypoint in &path.waypoints {
            assert!(waypoint.z.is_finite());
        }
    }

    #[test]
    fn test_linear_flies_above_profile() {
        let (hf, mesh) = ramp(3, 100);
        let ground = mesh.ground_reference().abs();
        let path = FlyoverPath::plan(Pattern::Linear, &mesh, &hf).unwrap();
        // Skip the leveled first waypoint; every later one sits the
        // clearance above its profile sample.
        for waypoint in &path.waypoints[1..] {
            let raster_row = (waypoint.y + hf.pixel_center().y).round() as usize;
            let terrain = mesh.centered_elevation(1, raster_row);
            assert_relative_eq!(waypoint.z, ground + terrain + FLIGHT_CLEARANCE);
        }
    }

    #[test]
    fn test_linear_wide_mesh_flies_rows() {
        let (hf, mesh) = ramp(100, 3);
        let path = FlyoverPath::plan(Pattern::Linear, &mesh, &hf).unwrap();
        assert_eq!(path.waypoints.len(), 8);
        // x varies, y fixed on the center row.
        let y = path.waypoints[0].y;
        for waypoint in &path.waypoints {
            assert_relative_eq!(waypoint.y, y);
        }
        assert!(path.waypoints[0].x < path.waypoints[7].x);
    }

    #[test]
    fn test_linear_rejects_too_short_profile() {
        let (hf, mesh) = ramp(3, 10);
        // Stride 10 keeps a single sample.
        assert!(FlyoverPath::plan(Pattern::Linear, &mesh, &hf).is_err());
    }

    #[test]
    fn test_circle_radius_and_center() {
        let (hf, mesh) = ramp(4, 4);
        let path = FlyoverPath::plan(Pattern::Circle, &mesh, &hf).unwrap();

        let TrackingPolicy::StaticTarget(center) = path.tracking else {
            panic!("circle pattern must track the mesh center");
        };
        assert_relative_eq!(center.x, 0.0);
        assert_relative_eq!(center.y, 0.0);

        // The x extremes land on opposite grid corners.
        let expected_radius = (18.0_f64).sqrt() + ORBIT_MARGIN;
        let radius = math::planar_distance(path.waypoints[0], center);
        assert_relative_eq!(radius, expected_radius, epsilon = 1e-9);
        assert!(radius > 0.0);

        // First waypoint starts due south of center at orbit height.
        assert_relative_eq!(path.waypoints[0].x, center.x, epsilon = 1e-9);
        assert_relative_eq!(path.waypoints[0].y, center.y - expected_radius, epsilon = 1e-9);
        assert_relative_eq!(path.waypoints[0].z, center.z + FLIGHT_CLEARANCE);

        // Closed loop, constant radius.
        let first = path.waypoints[0];
        let last = *path.waypoints.last().unwrap();
        assert_relative_eq!(first.x, last.x, epsilon = 1e-9);
        assert_relative_eq!(first.y, last.y, epsilon = 1e-9);
        for waypoint in &path.waypoints {
            assert_relative_eq!(
                math::planar_distance(*waypoint, center),
                expected_radius,
                epsilon = 1e-9
            );
        }
        assert_eq!(path.optics, CameraOptics::ORBIT);
    }

    #[test]
    fn test_diamond_closed_loop() {
        for (cols, rows) in [(4, 4), (12, 5), (5, 12)] {
            let (hf, mesh) = ramp(cols, rows);
            let path = FlyoverPath::plan(Pattern::Diamond, &mesh, &hf).unwrap();
            assert_eq!(path.waypoints.len(), 5);
            let first = path.waypoints[0];
            let last = path.waypoints[4];
            assert_relative_eq!(first.x, last.x);
            assert_relative_eq!(first.y, last.y);

            // Fixed-height loop at the documented multiple of the
            // ground reference.
            let z = super::DIAMOND_HEIGHT_FACTOR * mesh.ground_reference();
            for waypoint in &path.waypoints {
                assert_relative_eq!(waypoint.z, z);
            }
            assert_eq!(path.tracking, TrackingPolicy::FollowCurveTangent);
        }
    }

    #[test]
    fn test_circle_ignores_no_data_peaks() {
        let samples = vec![
            1.0,
            2.0,
            f64::NAN,
            3.0,
            4.0,
            1.0,
            2.0,
            3.0,
            f64::NAN,
        ];
        let hf = Heightfield::new(samples, 3, 3, (1.0, -1.0), None).unwrap();
        let mesh = TerrainMesh::builder().build(&hf).unwrap();
        let path = FlyoverPath::plan(Pattern::Circle, &mesh, &hf).unwrap();
        let TrackingPolicy::StaticTarget(center) = path.tracking else {
            panic!("circle pattern must track the mesh center");
        };
        assert!(center.z.is_finite());
    }
}
