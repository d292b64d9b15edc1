use crate::{
    math::{self, Vec3},
    MeshError,
};
use heightfield::Heightfield;
use log::debug;

/// A centered, scaled terrain mesh.
///
/// Vertices are laid out row-major with one vertex per grid sample;
/// mesh row 0 is the raster's *southernmost* row, so the mesh reads
/// north-up when y points up. The grid is centered so its midpoint
/// sits on the origin, and elevations are centered on their mean.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainMesh {
    /// One vertex per grid sample, row-major, south row first.
    vertices: Vec<Vec3>,

    /// Quad faces, wound consistently; indices into `vertices`.
    faces: Vec<[u32; 4]>,

    rows: usize,
    cols: usize,

    /// Axis-aligned bounding box of the centered vertices. No-data
    /// elevations are excluded from the z range.
    extents_min: Vec3,
    extents_max: Vec3,

    /// Mean of the centered elevations.
    ///
    /// Path planners read this as the "ground reference height". It
    /// is returned here explicitly rather than written back into the
    /// heightfield, so the mesh build and the path plan can't race
    /// through a shared mutable field.
    ground_reference: f64,
}

impl TerrainMesh {
    pub fn builder() -> TerrainMeshBuilder {
        TerrainMeshBuilder {
            z_scale: 1.0,
            image_sample: 1.0,
        }
    }

    /// One vertex per grid sample.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// `(rows-1) * (cols-1)` quad faces.
    pub fn faces(&self) -> &[[u32; 4]] {
        &self.faces
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Bounding box of the centered vertices, `(min, max)`.
    pub fn extents(&self) -> (Vec3, Vec3) {
        (self.extents_min, self.extents_max)
    }

    /// Mean of the centered elevations, the planners' ground
    /// reference height.
    pub fn ground_reference(&self) -> f64 {
        self.ground_reference
    }

    /// Vertex at mesh coordinates (column, mesh row).
    pub fn vertex(&self, col: usize, mesh_row: usize) -> Vec3 {
        self.vertices[mesh_row * self.cols + col]
    }

    /// Centered elevation at raster coordinates (column, raster row).
    ///
    /// Raster rows count from the north edge; this undoes the mesh's
    /// south-up flip so callers can index with raster bookkeeping.
    pub fn centered_elevation(&self, col: usize, raster_row: usize) -> f64 {
        self.vertex(col, self.rows - 1 - raster_row).z
    }
}

/// Builds a [`TerrainMesh`] from a [`Heightfield`].
pub struct TerrainMeshBuilder {
    /// Vertical exaggeration applied to every elevation (defaults
    /// to 1).
    z_scale: f64,

    /// Fraction the raster was resampled by before import (defaults
    /// to 1, i.e. full resolution).
    image_sample: f64,
}

impl TerrainMeshBuilder {
    /// Vertical exaggeration factor, must be positive.
    #[must_use]
    pub fn z_scale(mut self, factor: f64) -> Self {
        self.z_scale = factor;
        self
    }

    /// Resampling fraction applied upstream, must be positive.
    #[must_use]
    pub fn image_sample(mut self, ratio: f64) -> Self {
        self.image_sample = ratio;
        self
    }

    pub fn build(&self, heightfield: &Heightfield) -> Result<TerrainMesh, MeshError> {
        if !(self.z_scale > 0.0) {
            return Err(MeshError::Builder("z_scale"));
        }
        if !(self.image_sample > 0.0) {
            return Err(MeshError::Builder("image_sample"));
        }

        let now = std::time::Instant::now();
        let (rows, cols) = (heightfield.rows(), heightfield.cols());

        // Elevations arrive in raw linear units; dividing by the
        // pixel ground size puts them in the same units as the pixel
        // index grid, and the resample fraction rescales them to the
        // resampled grid.
        let xy_ratio = self.image_sample / heightfield.pixel_size().0.abs();

        // Scale and flip vertically in one pass: mesh row 0 holds the
        // raster's southernmost row, matching a y-up index grid.
        let mut z = Vec::with_capacity(rows * cols);
        for raster_row in (0..rows).rev() {
            for col in 0..cols {
                z.push(heightfield.get_unchecked(col, raster_row) * self.z_scale * xy_ratio);
            }
        }

        let z_min = math::nan_min(z.iter().copied()).ok_or(MeshError::NoValidElevationData)?;
        let z_max = math::nan_max(z.iter().copied()).ok_or(MeshError::NoValidElevationData)?;

        // Center elevations on their mean, then record the mean of
        // the *centered* elevations as the refined ground reference
        // the path planners consume.
        let z_mean = math::nan_mean(z.iter().copied()).ok_or(MeshError::NoValidElevationData)?;
        for v in &mut z {
            *v -= z_mean;
        }
        let ground_reference = math::nan_mean(z.iter().copied()).unwrap_or(0.0);

        let center = heightfield.pixel_center();
        #[allow(clippy::cast_precision_loss)]
        let vertices: Vec<Vec3> = (0..rows)
            .flat_map(|mesh_row| {
                (0..cols).map(move |col| (mesh_row, col))
            })
            .zip(z.iter())
            .map(|((mesh_row, col), &z)| {
                Vec3::new(
                    col as f64 - center.x,
                    mesh_row as f64 - center.y,
                    z,
                )
            })
            .collect();

        // One quad per interior cell: cells in the last column are
        // skipped so faces never wrap around a row boundary.
        #[allow(clippy::cast_possible_truncation)]
        let faces: Vec<[u32; 4]> = (0..(rows - 1) * cols)
            .filter(|i| (i + 1) % cols != 0)
            .map(|i| {
                let (i, c) = (i as u32, cols as u32);
                [i + c, i + c + 1, i + 1, i]
            })
            .collect();
        debug_assert_eq!(faces.len(), (rows - 1) * (cols - 1));

        #[allow(clippy::cast_precision_loss)]
        let (extents_min, extents_max) = (
            Vec3::new(-center.x, -center.y, z_min - z_mean),
            Vec3::new(
                (cols - 1) as f64 - center.x,
                (rows - 1) as f64 - center.y,
                z_max - z_mean,
            ),
        );

        debug!(
            "mesh; {}x{} grid, {} vertices, {} faces, z range [{:.3}, {:.3}], exec: {:?}",
            cols,
            rows,
            vertices.len(),
            faces.len(),
            z_min - z_mean,
            z_max - z_mean,
            now.elapsed(),
        );

        Ok(TerrainMesh {
            vertices,
            faces,
            rows,
            cols,
            extents_min,
            extents_max,
            ground_reference,
        })
    }
}
