//! Terrain mesh construction from elevation grids.
//!
//! Converts a [`heightfield::Heightfield`] into a centered, scaled 3D
//! mesh of quad faces suitable for handing to a rendering host, and
//! exposes the small planar/3D math helpers shared with camera path
//! planning.

mod error;
pub mod math;
mod mesh;

pub use crate::{
    error::MeshError,
    mesh::{TerrainMesh, TerrainMeshBuilder},
};
