//! Camera flyover planning and scene assembly.
//!
//! `flyover` turns a terrain mesh into a camera trajectory: the
//! [`path`] module plans a waypoint sequence and framing policy for
//! one of four flight patterns, and the [`assembly`] module realizes
//! a planned path as host scene objects (curve, camera, constraints)
//! through the narrow [`SceneHost`] interface.

pub mod assembly;
mod error;
pub mod path;

pub use crate::{
    assembly::{assemble, FlyoverRig, SceneHost, TrackAxis, ANIMATION_FRAMES},
    error::{AssemblyError, FlyoverError},
    path::{CameraOptics, FlyoverPath, Pattern, TrackingPolicy},
};
