use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeightfieldError {
    #[error("degenerate {rows}x{cols} elevation grid; at least 2x2 required")]
    InvalidGeometry { rows: usize, cols: usize },

    #[error("{len} samples do not fill a {rows}x{cols} grid")]
    DimensionMismatch { len: usize, rows: usize, cols: usize },

    #[error("pixel size {0}x{1} is not usable for scaling")]
    InvalidPixelSize(f64, f64),
}
