//! Level model and assembly
//!
//! Decoders produce a [`DecodedLevel`]; [`LevelDefinition::assemble`] turns it
//! into the immutable model handed to the game, deriving the collision mask
//! and coercing entities on the way. A `LevelDefinition` can only be obtained
//! through assembly, so `tiles.len() == width * height` always holds.

use crate::collision::{self, build_collision_flags};
use crate::entity::{coerce_entities, EntityDefinition};
use crate::tiles::check_dimensions;
use crate::Result;
use crobot_core::{LevelKey, StageId, WorldId};
use serde::Serialize;
use serde_json::Value;

/// Default tile edge in pixels
pub const DEFAULT_TILE_SIZE: i32 = 16;

/// Output of a format decoder, before validation and derivation
#[derive(Debug, Clone, Default)]
pub struct DecodedLevel {
    pub width: i32,
    pub height: i32,
    pub tile_width: i32,
    pub tile_height: i32,
    pub tileset_path: String,
    pub tiles: Vec<i32>,
    pub solid_gids: Vec<i32>,
    /// Raw `entities` value, coerced during assembly
    pub entities: Option<Value>,
}

/// A fully decoded level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDefinition {
    world: WorldId,
    stage: StageId,
    width: i32,
    height: i32,
    tile_width: i32,
    tile_height: i32,
    tileset_path: String,
    tiles: Vec<i32>,
    collision_flags: Vec<i32>,
    entities: Vec<EntityDefinition>,
}

impl LevelDefinition {
    /// Validate decoder output and build the final level.
    ///
    /// Fails on the first problem; nothing is returned partially filled.
    pub fn assemble(key: LevelKey, decoded: DecodedLevel) -> Result<Self> {
        check_dimensions(decoded.width, decoded.height, decoded.tiles.len())?;
        let collision_flags = build_collision_flags(&decoded.tiles, &decoded.solid_gids)?;
        let entities = coerce_entities(decoded.entities.as_ref())?;

        Ok(Self {
            world: key.world,
            stage: key.stage,
            width: decoded.width,
            height: decoded.height,
            tile_width: decoded.tile_width,
            tile_height: decoded.tile_height,
            tileset_path: decoded.tileset_path,
            tiles: decoded.tiles,
            collision_flags,
            entities,
        })
    }

    pub fn key(&self) -> LevelKey {
        LevelKey::new(self.world, self.stage)
    }

    pub fn world(&self) -> WorldId {
        self.world
    }

    pub fn stage(&self) -> StageId {
        self.stage
    }

    /// Grid width in tiles
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in tiles
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Tile width in pixels
    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    /// Tile height in pixels
    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// `(width, height, tile_width, tile_height)`
    pub fn dimensions(&self) -> (i32, i32, i32, i32) {
        (self.width, self.height, self.tile_width, self.tile_height)
    }

    pub fn tileset_path(&self) -> &str {
        &self.tileset_path
    }

    /// Flat tile grid, `width * height` entries
    pub fn tiles(&self) -> &[i32] {
        &self.tiles
    }

    /// Tile at a flat index
    pub fn tile_at(&self, index: usize) -> Option<i32> {
        self.tiles.get(index).copied()
    }

    /// Collision bitmask per GID
    pub fn collision_flags(&self) -> &[i32] {
        &self.collision_flags
    }

    /// Whether `gid` has the solid bit
    pub fn is_solid(&self, gid: i32) -> bool {
        collision::is_solid(&self.collision_flags, gid)
    }

    pub fn entities(&self) -> &[EntityDefinition] {
        &self.entities
    }

    /// Take ownership of the tile grid, e.g. to hand it across an FFI boundary
    pub fn into_tiles(self) -> Vec<i32> {
        self.tiles
    }
}
