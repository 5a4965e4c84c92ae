//! Column level decoder
//!
//! The area schema describes a level as vertical columns. Each column starts
//! from a zeroed template of `height` rows, copies its `metatile` in from the
//! top, paints its `rows` ranges over that in list order, and is emitted
//! `repeat` times:
//!
//! ```json
//! {
//!   "height": 4, "tileset": "tiles/world2.png",
//!   "columns": [
//!     { "repeat": 5, "metatile": [0, 0, 0, 1] },
//!     { "metatile": [0, 0, 0, 1], "rows": [{ "from": 1, "to": 2, "gid": 4 }] }
//!   ]
//! }
//! ```
//!
//! Output is column-block ordered: all `height` rows of one column are
//! contiguous, then the next column. This is NOT the row-major order the
//! raster decoder produces, and consumers of area levels rely on it.

use crate::document::{as_int, parse_document, Fields};
use crate::error::SchemaError;
use crate::level::{DecodedLevel, DEFAULT_TILE_SIZE};
use crate::tiles::{check_dimensions, checked_tile_count, EMPTY_TILE};
use crate::Result;
use serde_json::Value;

/// Decoder for the column schema
pub struct AreaDecoder;

impl AreaDecoder {
    /// Decode raw document bytes
    pub fn decode(bytes: &[u8]) -> Result<DecodedLevel> {
        let mut doc = parse_document(bytes)?;
        let entities = doc.remove("entities");
        let fields = Fields::new(&doc, "");

        let tile_width = fields.int_or("tileWidth", DEFAULT_TILE_SIZE)?;
        let tile_height = fields.int_or("tileHeight", DEFAULT_TILE_SIZE)?;
        let height = fields.dimension_or("height", 0)?;
        let tileset_path = fields.str_or("tileset", "")?.to_string();

        let columns = fields
            .array("columns")
            .ok_or(SchemaError::MissingColumns)?;

        let (tiles, computed_width) = expand_columns(columns, height as usize)?;

        // A non-zero computed width always replaces the declared one
        let declared_width = fields.dimension_or("width", computed_width)?;
        let width = if computed_width != 0 {
            computed_width
        } else {
            declared_width
        };

        check_dimensions(width, height, tiles.len())?;

        let solid_gids = fields.int_list("solidGids")?;

        Ok(DecodedLevel {
            width,
            height,
            tile_width,
            tile_height,
            tileset_path,
            tiles,
            solid_gids,
            entities,
        })
    }
}

/// Expand every column, returning the flat tiles and the summed repeat count
fn expand_columns(columns: &[Value], height: usize) -> Result<(Vec<i32>, i32)> {
    let mut expanded = Vec::new();
    let mut computed_width: i64 = 0;

    for (i, column) in columns.iter().enumerate() {
        let path = format!("columns[{}]", i);
        let column = Fields::of(column, &path)?;
        checked_tile_count(height as u64)?;

        let repeat = column.int_or("repeat", 1)?.max(1);
        let template = column_template(&column, height)?;

        computed_width += i64::from(repeat);
        let needed = checked_tile_count((computed_width as u64).saturating_mul(height as u64))?;
        expanded.reserve(needed - expanded.len());
        for _ in 0..repeat {
            expanded.extend_from_slice(&template);
        }
    }

    let computed_width = i32::try_from(computed_width).map_err(|_| SchemaError::InvalidField {
        field: "columns".into(),
        expected: "a total repeat count that fits in 32 bits",
    })?;

    Ok((expanded, computed_width))
}

/// Build one column's rows from its metatile and row overrides
fn column_template(column: &Fields<'_>, height: usize) -> Result<Vec<i32>> {
    let mut template = vec![EMPTY_TILE; height];

    if let Some(metatile) = column.array("metatile") {
        for (row, value) in metatile.iter().take(height).enumerate() {
            template[row] = as_int(value).ok_or_else(|| SchemaError::InvalidField {
                field: format!("{}[{}]", column.field("metatile"), row),
                expected: "an integer",
            })?;
        }
    }

    if let Some(ranges) = column.array("rows") {
        let last_row = height as i64 - 1;
        for (i, range) in ranges.iter().enumerate() {
            let path = format!("{}[{}]", column.field("rows"), i);
            let range = Fields::of(range, &path)?;

            let from = range.int_or("from", 0)?.max(0);
            let to = i64::from(range.int_or("to", from)?).min(last_row);
            let gid = range.int_or("gid", EMPTY_TILE)?;

            // from > to (including height 0) paints nothing
            let from = i64::from(from);
            if from <= to {
                template[from as usize..=to as usize].fill(gid);
            }
        }
    }

    Ok(template)
}
