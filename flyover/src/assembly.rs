//! Trajectory assembly.
//!
//! Realizes a planned [`FlyoverPath`] as host scene objects through
//! the [`SceneHost`] interface. Every created object is returned as a
//! handle on the [`FlyoverRig`]; nothing is ever located by scanning
//! scene state.

use crate::{
    path::{CameraOptics, FlyoverPath, Pattern, TrackingPolicy},
    AssemblyError,
};
use log::debug;
use terramesh::{math::Vec3, TerrainMesh};

/// Total animation length driven onto the follow-path constraint.
pub const ANIMATION_FRAMES: u32 = 1440;

/// Track-to constraint axis conventions.
///
/// Both use y as the up axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAxis {
    /// Point the object's negative z axis at the target.
    NegativeZ,
    /// Point the object's positive z axis at the target.
    PositiveZ,
}

/// Narrow interface onto the scene-hosting environment.
///
/// Creation methods return `None` when the host fails to produce an
/// object; [`assemble`] treats that as fatal and stops issuing host
/// calls.
pub trait SceneHost {
    type Handle: Clone;

    /// Creates a mesh object from terrain vertices and quad faces.
    fn create_mesh(&mut self, mesh: &TerrainMesh, name: &str) -> Option<Self::Handle>;

    /// Creates a polyline curve. `points` are expressed relative to
    /// `origin`, which becomes the curve object's location.
    fn create_curve(&mut self, name: &str, origin: Vec3, points: &[Vec3])
        -> Option<Self::Handle>;

    fn create_camera(&mut self, position: Vec3) -> Option<Self::Handle>;

    /// Creates an empty marker object used as a tracking target.
    fn create_marker(&mut self, position: Vec3) -> Option<Self::Handle>;

    /// Constrains `object` to orient one of its axes at `target`.
    fn track_to(&mut self, object: &Self::Handle, target: &Self::Handle, axis: TrackAxis);

    /// Constrains `object`'s position to ride along `curve`.
    fn follow_path(&mut self, object: &Self::Handle, curve: &Self::Handle);

    fn set_camera_optics(&mut self, camera: &Self::Handle, optics: &CameraOptics);

    /// Sets the total animation duration, in frames.
    fn set_animation_length(&mut self, frames: u32);
}

/// Handles to the scene objects created for one flyover.
#[derive(Debug, Clone)]
pub struct FlyoverRig<H> {
    pub camera: H,
    /// The flight curve; absent for a static placement.
    pub curve: Option<H>,
    /// The tracking marker; absent when the camera tracks the curve.
    pub target: Option<H>,
}

/// Builds the camera rig for a planned path.
///
/// The camera starts at the first waypoint. Multi-waypoint paths get
/// a curve whose control points are stored relative to that first
/// waypoint, with the camera (and tracking marker, if any) riding it
/// via follow-path constraints.
pub fn assemble<H: SceneHost>(
    host: &mut H,
    path: &FlyoverPath,
) -> Result<FlyoverRig<H::Handle>, AssemblyError> {
    let start = *path.waypoints.first().ok_or(AssemblyError::EmptyPath)?;

    let curve = if path.waypoints.len() > 1 {
        let relative: Vec<Vec3> = path.waypoints.iter().map(|&w| w - start).collect();
        let curve = host
            .create_curve(curve_name(path.pattern), start, &relative)
            .ok_or(AssemblyError::HostObject("curve"))?;
        Some(curve)
    } else {
        None
    };

    let camera = host
        .create_camera(start)
        .ok_or(AssemblyError::HostObject("camera"))?;
    host.set_camera_optics(&camera, &path.optics);

    let target = match path.tracking {
        TrackingPolicy::StaticTarget(point) | TrackingPolicy::FollowExplicitTarget(point) => {
            let marker = host
                .create_marker(point)
                .ok_or(AssemblyError::HostObject("camera target"))?;
            host.track_to(&camera, &marker, TrackAxis::NegativeZ);
            Some(marker)
        }
        TrackingPolicy::FollowCurveTangent => {
            if let Some(curve) = &curve {
                host.track_to(&camera, curve, TrackAxis::PositiveZ);
            }
            None
        }
    };

    if let Some(curve) = &curve {
        host.follow_path(&camera, curve);
        if let Some(target) = &target {
            // The marker rides the curve too, so camera and target
            // move together.
            host.follow_path(target, curve);
        }
        host.set_animation_length(ANIMATION_FRAMES);
    }

    debug!(
        "assembled {:?} rig; curve: {}, target: {}",
        path.pattern,
        curve.is_some(),
        target.is_some()
    );

    Ok(FlyoverRig {
        camera,
        curve,
        target,
    })
}

fn curve_name(pattern: Pattern) -> &'static str {
    match pattern {
        Pattern::Static => "OverviewPath",
        Pattern::Linear => "LinearPath",
        Pattern::Circle => "OrbitPath",
        Pattern::Diamond => "DiamondPath",
    }
}
