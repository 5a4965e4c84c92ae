//! # Crobot Levels
//!
//! This crate decodes level description files into the in-memory level model
//! used by the game runtime.
//!
//! ## Features
//! - Raster levels: a Tiled-style document with one CSV tile layer
//! - Area levels: column templates with run-length repeats and row overrides
//! - Collision masks derived from an explicit solid GID list
//! - Entity placements with properties flattened to strings
//! - A caller-owned, thread-safe cache of decoded levels
//!
//! ## Level Files
//!
//! For world `W`, stage `S` the loader probes, in order:
//! - `levels/worldW_stageS.json` (raster schema)
//! - `levels/worldW_stageS.area.json` (area schema)
//!
//! ```rust,no_run
//! use crobot_levels::{FsAssetReader, LevelLoader};
//!
//! # fn example() -> crobot_levels::Result<()> {
//! let loader = LevelLoader::new(FsAssetReader::new("assets"));
//! let level = loader.load(1, 1)?;
//! println!("{}x{} tiles", level.width(), level.height());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod asset;
pub mod document;
pub mod tiles;
pub mod tiled;
pub mod area;
pub mod collision;
pub mod entity;
pub mod level;
pub mod loader;
pub mod cache;

pub use error::{DataIntegrityError, LevelError, Result, SchemaError};
pub use asset::{AssetReader, FsAssetReader, MemoryAssetReader};
pub use tiles::{encode_csv, parse_csv, EMPTY_TILE, MAX_TILE_COUNT};
pub use tiled::TiledDecoder;
pub use area::AreaDecoder;
pub use collision::{build_collision_flags, COLLISION_SOLID};
pub use entity::{EntityDefinition, PropertyValue};
pub use level::{DecodedLevel, LevelDefinition};
pub use loader::{level_path, LevelFormat, LevelLoader};
pub use cache::{CacheConfig, CacheStats, LevelCache};
pub use crobot_core::LevelKey;
