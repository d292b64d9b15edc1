//! Minimal ESRI ASCII grid (`.asc`) reader.
//!
//! Stands in for a full raster import chain: just enough to hand a
//! georeferenced elevation grid to the geometry crates. Resampling
//! and reprojection happen upstream of this tool.

use anyhow::{anyhow, bail, Context, Error as AnyError};
use geo::geometry::Coord;
use heightfield::{GeoCorners, Heightfield};
use std::{fs, path::Path};

pub fn load_ascii_grid(path: &Path) -> Result<Heightfield, AnyError> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading DEM {}", path.display()))?;
    parse_ascii_grid(&text).with_context(|| format!("parsing DEM {}", path.display()))
}

pub fn parse_ascii_grid(text: &str) -> Result<Heightfield, AnyError> {
    let mut tokens = text.split_whitespace().peekable();

    let mut ncols = None;
    let mut nrows = None;
    let mut xllcorner = None;
    let mut yllcorner = None;
    let mut cellsize = None;
    let mut nodata = None;

    // Header lines are `key value` pairs; the first numeric token
    // starts the sample block.
    while let Some(token) = tokens.peek() {
        if !token
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
        {
            break;
        }
        let key = tokens
            .next()
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| anyhow!("truncated header"))?;
        let value = tokens
            .next()
            .ok_or_else(|| anyhow!("missing value for header '{key}'"))?;
        match key.as_str() {
            "ncols" => ncols = Some(value.parse::<usize>()?),
            "nrows" => nrows = Some(value.parse::<usize>()?),
            "xllcorner" => xllcorner = Some(value.parse::<f64>()?),
            "yllcorner" => yllcorner = Some(value.parse::<f64>()?),
            "cellsize" => cellsize = Some(value.parse::<f64>()?),
            "nodata_value" => nodata = Some(value.parse::<f64>()?),
            _ => bail!("unknown header field '{key}'"),
        }
    }

    let cols = ncols.ok_or_else(|| anyhow!("missing 'ncols' header"))?;
    let rows = nrows.ok_or_else(|| anyhow!("missing 'nrows' header"))?;
    let cellsize = cellsize.ok_or_else(|| anyhow!("missing 'cellsize' header"))?;

    let mut samples = Vec::with_capacity(rows * cols);
    for token in tokens {
        let value: f64 = token
            .parse()
            .with_context(|| format!("bad elevation sample '{token}'"))?;
        samples.push(match nodata {
            Some(nd) if value == nd => f64::NAN,
            _ => value,
        });
    }
    if samples.len() != rows * cols {
        bail!("expected {} samples, got {}", rows * cols, samples.len());
    }

    let geo_corners = match (xllcorner, yllcorner) {
        (Some(x), Some(y)) => {
            #[allow(clippy::cast_precision_loss)]
            let ne = Coord {
                x: x + cols as f64 * cellsize,
                y: y + rows as f64 * cellsize,
            };
            Some(GeoCorners {
                sw: Coord { x, y },
                ne,
            })
        }
        _ => None,
    };

    // North-up raster: rows run south, so dy is negative.
    Ok(Heightfield::new(
        samples,
        cols,
        rows,
        (cellsize, -cellsize),
        geo_corners,
    )?)
}
