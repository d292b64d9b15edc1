//! Normalized in-memory elevation grid (heightfield).
//!
//! A [`Heightfield`] is the hand-off format between raster import
//! (reading, resampling and reprojecting a DEM file, which happens
//! upstream) and the geometry code that turns elevations into meshes
//! and camera paths. It is a plain row-major grid of `f64` samples
//! where `NaN` marks no-data, plus the per-pixel ground scale and
//! optional geographic corner coordinates.

mod error;

pub use crate::error::HeightfieldError;
use geo::geometry::Coord;

/// Base floating point type used for all elevations and coordinates.
///
/// Note: this _could_ be a generic parameter, but doing so makes the
/// library more complicated, and elevation rasters small enough to
/// mesh fit comfortably in memory at f64.
pub type C = f64;

/// Geographic bounding box of the source raster.
///
/// Stored as the southwest and northeast corners, `x` is longitude
/// and `y` is latitude. Only used for view-bounds heuristics; the
/// geometry code never projects through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCorners {
    pub sw: Coord<C>,
    pub ne: Coord<C>,
}

/// A row-major grid of elevation samples.
///
/// Row 0 is the raster's northernmost row, matching the on-disk order
/// of common DEM formats. `NaN` samples are no-data and are excluded
/// from every statistic this type computes.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    /// Elevation samples, row-major, `rows * cols` long.
    samples: Box<[C]>,

    /// Number of sample rows.
    rows: usize,

    /// Number of sample columns.
    cols: usize,

    /// Signed ground distance covered by one pixel, (dx, dy).
    pixel_size: (C, C),

    /// Geographic corners of the raster, if georeferenced.
    geo_corners: Option<GeoCorners>,
}

impl Heightfield {
    /// Builds a heightfield from row-major samples.
    ///
    /// Grids smaller than 2x2 cannot produce a single quad face and
    /// are rejected, as are sample buffers that disagree with the
    /// stated dimensions.
    pub fn new(
        samples: Vec<C>,
        cols: usize,
        rows: usize,
        pixel_size: (C, C),
        geo_corners: Option<GeoCorners>,
    ) -> Result<Self, HeightfieldError> {
        if rows < 2 || cols < 2 {
            return Err(HeightfieldError::InvalidGeometry { rows, cols });
        }
        if samples.len() != rows * cols {
            return Err(HeightfieldError::DimensionMismatch {
                len: samples.len(),
                rows,
                cols,
            });
        }
        if pixel_size.0 == 0.0 || !pixel_size.0.is_finite() || !pixel_size.1.is_finite() {
            return Err(HeightfieldError::InvalidPixelSize(
                pixel_size.0,
                pixel_size.1,
            ));
        }
        Ok(Self {
            samples: samples.into_boxed_slice(),
            rows,
            cols,
            pixel_size,
            geo_corners,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Signed ground distance per pixel, (dx, dy).
    pub fn pixel_size(&self) -> (C, C) {
        self.pixel_size
    }

    pub fn geo_corners(&self) -> Option<GeoCorners> {
        self.geo_corners
    }

    /// Returns the sample at `(col, row)`, or `None` out of bounds.
    ///
    /// An in-bounds no-data sample returns `Some(NaN)`.
    pub fn get(&self, col: usize, row: usize) -> Option<C> {
        if col < self.cols && row < self.rows {
            Some(self.get_unchecked(col, row))
        } else {
            None
        }
    }

    /// Returns the sample at `(col, row)`.
    pub fn get_unchecked(&self, col: usize, row: usize) -> C {
        self.samples[self.linear_index(col, row)]
    }

    /// One contiguous row of samples, west to east.
    pub fn row_profile(&self, row: usize) -> &[C] {
        &self.samples[row * self.cols..(row + 1) * self.cols]
    }

    /// One column of samples, north to south.
    pub fn col_profile(&self, col: usize) -> impl Iterator<Item = C> + '_ {
        (0..self.rows).map(move |row| self.get_unchecked(col, row))
    }

    /// Grid midpoint in fractional pixel coordinates.
    ///
    /// This is the exact centroid of the index grid, so subtracting it
    /// from every pixel coordinate centers the grid on the origin.
    pub fn pixel_center(&self) -> Coord<C> {
        #[allow(clippy::cast_precision_loss)]
        Coord {
            x: (self.cols - 1) as C / 2.0,
            y: (self.rows - 1) as C / 2.0,
        }
    }

    /// The `(col, row)` of the sample nearest the grid midpoint.
    pub fn center_indices(&self) -> (usize, usize) {
        let center = self.pixel_center();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        (center.x.round() as usize, center.y.round() as usize)
    }

    /// Lowest valid sample, or `None` for an all-no-data grid.
    pub fn min_elevation(&self) -> Option<C> {
        self.samples
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: C| m.min(v))))
    }

    /// Highest valid sample, or `None` for an all-no-data grid.
    pub fn max_elevation(&self) -> Option<C> {
        self.samples
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| Some(acc.map_or(v, |m: C| m.max(v))))
    }

    /// Mean of the valid samples, or `None` for an all-no-data grid.
    pub fn mean_elevation(&self) -> Option<C> {
        let (sum, count) = self
            .samples
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
        #[allow(clippy::cast_precision_loss)]
        match count {
            0 => None,
            _ => Some(sum / count as C),
        }
    }

    fn linear_index(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoCorners, Heightfield, HeightfieldError};
    use approx::assert_relative_eq;
    use geo::geometry::Coord;

    fn ramp(cols: usize, rows: usize) -> Heightfield {
        #[allow(clippy::cast_precision_loss)]
        let samples = (0..rows * cols).map(|i| i as f64).collect();
        Heightfield::new(samples, cols, rows, (1.0, -1.0), None).unwrap()
    }

    #[test]
    fn test_rejects_degenerate_grids() {
        assert!(matches!(
            Heightfield::new(vec![0.0; 3], 3, 1, (1.0, -1.0), None),
            Err(HeightfieldError::InvalidGeometry { rows: 1, cols: 3 })
        ));
        assert!(matches!(
            Heightfield::new(vec![0.0; 2], 1, 2, (1.0, -1.0), None),
            Err(HeightfieldError::InvalidGeometry { rows: 2, cols: 1 })
        ));
    }

    #[test]
    fn test_rejects_short_sample_buffer() {
        assert!(matches!(
            Heightfield::new(vec![0.0; 5], 2, 3, (1.0, -1.0), None),
            Err(HeightfieldError::DimensionMismatch {
                len: 5,
                rows: 3,
                cols: 2
            })
        ));
    }

    #[test]
    fn test_rejects_zero_pixel_size() {
        assert!(matches!(
            Heightfield::new(vec![0.0; 4], 2, 2, (0.0, -1.0), None),
            Err(HeightfieldError::InvalidPixelSize(..))
        ));
    }

    #[test]
    fn test_row_and_col_profiles() {
        let hf = ramp(4, 3);
        assert_eq!(hf.row_profile(1), &[4.0, 5.0, 6.0, 7.0]);
        let col: Vec<f64> = hf.col_profile(2).collect();
        assert_eq!(col, vec![2.0, 6.0, 10.0]);
    }

    #[test]
    fn test_pixel_center_is_grid_centroid() {
        let hf = ramp(4, 4);
        assert_eq!(hf.pixel_center(), Coord { x: 1.5, y: 1.5 });
        assert_eq!(hf.center_indices(), (2, 2));

        let hf = ramp(5, 3);
        assert_eq!(hf.pixel_center(), Coord { x: 2.0, y: 1.0 });
        assert_eq!(hf.center_indices(), (2, 1));
    }

    #[test]
    fn test_stats_skip_no_data() {
        let samples = vec![1.0, f64::NAN, 3.0, f64::NAN];
        let hf = Heightfield::new(samples, 2, 2, (1.0, -1.0), None).unwrap();
        assert_relative_eq!(hf.min_elevation().unwrap(), 1.0);
        assert_relative_eq!(hf.max_elevation().unwrap(), 3.0);
        assert_relative_eq!(hf.mean_elevation().unwrap(), 2.0);
    }

    #[test]
    fn test_stats_of_all_no_data_grid() {
        let hf = Heightfield::new(vec![f64::NAN; 4], 2, 2, (1.0, -1.0), None).unwrap();
        assert_eq!(hf.min_elevation(), None);
        assert_eq!(hf.max_elevation(), None);
        assert_eq!(hf.mean_elevation(), None);
    }

    #[test]
    fn test_geo_corners_roundtrip() {
        let corners = GeoCorners {
            sw: Coord { x: -72.0, y: 44.0 },
            ne: Coord { x: -71.0, y: 45.0 },
        };
        let hf = Heightfield::new(vec![0.0; 4], 2, 2, (30.0, -30.0), Some(corners)).unwrap();
        assert_eq!(hf.geo_corners(), Some(corners));
    }

    #[test]
    fn test_out_of_bounds_get_returns_none() {
        let hf = ramp(3, 2);
        assert_eq!(hf.get(3, 0), None);
        assert_eq!(hf.get(0, 2), None);
        assert_eq!(hf.get(2, 1), Some(5.0));
    }
}
