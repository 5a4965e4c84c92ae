//! Raster level decoder
//!
//! Reads the Tiled-style schema, where the tile grid is one CSV string:
//!
//! ```json
//! {
//!   "width": 3, "height": 2, "tilewidth": 16, "tileheight": 16,
//!   "tileset": "tiles/world1.png",
//!   "layers": [{ "encoding": "csv", "data": "1,1,1,0,2,0" }],
//!   "solidGids": [1],
//!   "entities": [{ "type": "coin", "x": 16, "y": 0 }]
//! }
//! ```
//!
//! Only the first layer is read.

use crate::document::{parse_document, Fields};
use crate::error::{LevelError, SchemaError};
use crate::level::{DecodedLevel, DEFAULT_TILE_SIZE};
use crate::tiles::{check_dimensions, parse_csv};
use crate::Result;
use serde_json::Value;

/// The only supported layer encoding
pub const CSV_ENCODING: &str = "csv";

/// Decoder for the raster schema
pub struct TiledDecoder;

impl TiledDecoder {
    /// Decode raw document bytes
    pub fn decode(bytes: &[u8]) -> Result<DecodedLevel> {
        let mut doc = parse_document(bytes)?;
        let entities = doc.remove("entities");
        let fields = Fields::new(&doc, "");

        // camelCase wins when both spellings are present
        let tile_width = fields.int_or("tileWidth", fields.int_or("tilewidth", DEFAULT_TILE_SIZE)?)?;
        let tile_height =
            fields.int_or("tileHeight", fields.int_or("tileheight", DEFAULT_TILE_SIZE)?)?;
        let width = fields.dimension_or("width", 0)?;
        let height = fields.dimension_or("height", 0)?;
        let tileset_path = fields.str_or("tileset", "")?.to_string();

        let layer = match fields.array("layers").and_then(|layers| layers.first()) {
            Some(layer) => Fields::of(layer, "layers[0]")?,
            None => return Err(SchemaError::MissingLayers.into()),
        };

        let encoding = match layer.get("encoding") {
            Some(Value::String(s)) => s.as_str(),
            Some(_) => "<non-string>",
            None => "",
        };
        if encoding != CSV_ENCODING {
            return Err(LevelError::UnsupportedFormat {
                encoding: encoding.to_string(),
            });
        }

        let tiles = parse_csv(layer.str_or("data", "")?)?;
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
