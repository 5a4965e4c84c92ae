//! Tile grid codec
//!
//! Tiles are plain `i32` GIDs. Raster levels store them as one
//! comma-separated string in row-major order:
//!
//! ```text
//! "1,1,0,\n 0,2,2"
//! ```
//!
//! Whitespace around a cell is ignored and an empty cell is tile 0.

use crate::error::DataIntegrityError;
use crate::Result;

/// GID of an empty cell
pub const EMPTY_TILE: i32 = 0;

/// Upper bound on tiles in one decoded level (4096 x 4096)
pub const MAX_TILE_COUNT: usize = 4096 * 4096;

/// Parse a CSV tile payload
///
/// A single empty segment after a trailing comma is not a cell, so
/// `"1,2,"` and `"1,2"` decode the same. An empty payload has no cells.
pub fn parse_csv(data: &str) -> Result<Vec<i32>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut cells: Vec<&str> = data.split(',').collect();
    if cells.last() == Some(&"") {
        cells.pop();
    }

    cells
        .into_iter()
        .enumerate()
        .map(|(index, cell)| parse_cell(index, cell))
        .collect()
}

#[inline]
fn parse_cell(index: usize, cell: &str) -> Result<i32> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(EMPTY_TILE);
    }
    trimmed.parse::<i32>().map_err(|_| {
        DataIntegrityError::MalformedTileData {
            index,
            cell: trimmed.to_string(),
        }
        .into()
    })
}

/// Encode tiles as a canonical CSV payload (no spaces, no trailing comma)
pub fn encode_csv(tiles: &[i32]) -> String {
    let mut out = String::with_capacity(tiles.len() * 3);
    for (i, tile) in tiles.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&tile.to_string());
    }
    out
}

/// Check that `actual` tiles fill a `width` x `height` grid
pub fn check_dimensions(width: i32, height: i32, actual: usize) -> Result<()> {
    let expected = expected_tile_count(width, height)?;
    if actual != expected {
        return Err(DataIntegrityError::DimensionMismatch { expected, actual }.into());
    }
    Ok(())
}

/// `width * height` as a tile count, rejecting grids above [`MAX_TILE_COUNT`]
pub fn expected_tile_count(width: i32, height: i32) -> Result<usize> {
    let requested = i64::from(width.max(0)) * i64::from(height.max(0));
    checked_tile_count(requested as u64)
}

pub(crate) fn checked_tile_count(requested: u64) -> Result<usize> {
    if requested > MAX_TILE_COUNT as u64 {
        return Err(DataIntegrityError::TileLimitExceeded {
            requested,
            limit: MAX_TILE_COUNT,
        }
        .into());
    }
    Ok(requested as usize)
}
