//! A scene host that records what a real host would create.
//!
//! Lets the pipeline run end to end without a rendering environment;
//! the `summary` subcommand prints the recording.

use flyover::{CameraOptics, SceneHost, TrackAxis};
use terramesh::{math::Vec3, TerrainMesh};

#[derive(Debug, Clone)]
pub struct ObjectHandle {
    pub id: usize,
    pub label: String,
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub objects: Vec<String>,
    pub constraints: Vec<String>,
    pub animation_frames: Option<u32>,
    next_id: usize,
}

impl RecordingHost {
    fn issue(&mut self, label: String) -> ObjectHandle {
        self.next_id += 1;
        self.objects.push(format!("#{} {label}", self.next_id));
        ObjectHandle {
            id: self.next_id,
            label,
        }
    }
}

impl SceneHost for RecordingHost {
    type Handle = ObjectHandle;

    fn create_mesh(&mut self, mesh: &TerrainMesh, name: &str) -> Option<ObjectHandle> {
        Some(self.issue(format!(
            "mesh '{name}' ({} vertices, {} faces)",
            mesh.vertices().len(),
            mesh.faces().len()
        )))
    }

    fn create_curve(&mut self, name: &str, origin: Vec3, points: &[Vec3]) -> Option<ObjectHandle> {
        Some(self.issue(format!(
            "curve '{name}' ({} points) at ({:.2}, {:.2}, {:.2})",
            points.len(),
            origin.x,
            origin.y,
            origin.z
        )))
    }

    fn create_camera(&mut self, position: Vec3) -> Option<ObjectHandle> {
        Some(self.issue(format!(
            "camera at ({:.2}, {:.2}, {:.2})",
            position.x, position.y, position.z
        )))
    }

    fn create_marker(&mut self, position: Vec3) -> Option<ObjectHandle> {
        Some(self.issue(format!(
            "target marker at ({:.2}, {:.2}, {:.2})",
            position.x, position.y, position.z
        )))
    }

    fn track_to(&mut self, object: &ObjectHandle, target: &ObjectHandle, axis: TrackAxis) {
        self.constraints.push(format!(
            "track-to: #{} -> #{} ({axis:?}, up y)",
            object.id, target.id
        ));
    }

    fn follow_path(&mut self, object: &ObjectHandle, curve: &ObjectHandle) {
        self.constraints
            .push(format!("follow-path: #{} on #{}", object.id, curve.id));
    }

    fn set_camera_optics(&mut self, camera: &ObjectHandle, optics: &CameraOptics) {
        self.constraints.push(format!(
            "optics: #{} {}mm, clip {}..{}",
            camera.id, optics.focal_length_mm, optics.clip_start, optics.clip_end
        ));
    }

    fn set_animation_length(&mut self, frames: u32) {
        self.animation_frames = Some(frames);
    }
}
