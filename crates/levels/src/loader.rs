//! Level loading
//!
//! Picks the level file for a world/stage, runs the matching decoder and
//! assembles the result. Two candidate files are probed in a fixed order:
//!
//! 1. `levels/world{W}_stage{S}.json` - raster schema ([`TiledDecoder`])
//! 2. `levels/world{W}_stage{S}.area.json` - column schema ([`AreaDecoder`])
//!
//! The raster file always wins when both exist.

use crate::area::AreaDecoder;
use crate::asset::AssetReader;
use crate::level::{DecodedLevel, LevelDefinition};
use crate::tiled::TiledDecoder;
use crate::{LevelError, Result};
use crobot_core::{LevelKey, StageId, WorldId};
use std::fmt;

/// Default directory holding level files
pub const LEVELS_DIR: &str = "levels";

/// On-disk level schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelFormat {
    /// Raster schema with a CSV tile layer
    TiledCsv,
    /// Column schema with run-length repetition
    AreaColumns,
}

impl LevelFormat {
    /// Candidate formats in probe order
    pub const PROBE_ORDER: [LevelFormat; 2] = [LevelFormat::TiledCsv, LevelFormat::AreaColumns];

    /// File suffix appended to the level's base name
    pub fn extension(&self) -> &'static str {
        match self {
            LevelFormat::TiledCsv => ".json",
            LevelFormat::AreaColumns => ".area.json",
        }
    }

    /// Run this format's decoder over raw bytes
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedLevel> {
        match self {
            LevelFormat::TiledCsv => TiledDecoder::decode(bytes),
            LevelFormat::AreaColumns => AreaDecoder::decode(bytes),
        }
    }
}

impl fmt::Display for LevelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFormat::TiledCsv => f.write_str("tiled-csv"),
            LevelFormat::AreaColumns => f.write_str("area-columns"),
        }
    }
}

/// Asset path of `key` in `format` under `levels_dir`
pub fn level_path(levels_dir: &str, key: LevelKey, format: LevelFormat) -> String {
    let base = key.base_name();
    if levels_dir.is_empty() {
        format!("{}{}", base, format.extension())
    } else {
        format!("{}/{}{}", levels_dir, base, format.extension())
    }
}

/// Stateless level loader over an [`AssetReader`]
#[derive(Debug, Clone)]
pub struct LevelLoader<R> {
    reader: R,
    levels_dir: String,
}

impl<R: AssetReader> LevelLoader<R> {
    /// Create a loader reading from `levels/`
    pub fn new(reader: R) -> Self {
        Self::with_levels_dir(reader, LEVELS_DIR)
    }

    /// Create a loader reading level files from `levels_dir`
    pub fn with_levels_dir<S: Into<String>>(reader: R, levels_dir: S) -> Self {
        let levels_dir: String = levels_dir.into();
        Self {
            reader,
            levels_dir: levels_dir.trim_end_matches('/').to_string(),
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn levels_dir(&self) -> &str {
        &self.levels_dir
    }

    /// Find which file, if any, holds the level
    pub fn select_format(&self, key: LevelKey) -> Result<(LevelFormat, String)> {
        for format in LevelFormat::PROBE_ORDER {
            let path = level_path(&self.levels_dir, key, format);
            if self.reader.exists(&path) {
                tracing::debug!(level = %key, %format, %path, "selected level file");
                return Ok((format, path));
            }
            tracing::trace!(level = %key, %path, "level candidate absent");
        }

        Err(LevelError::NotFound {
            world: key.world,
            stage: key.stage,
        })
    }

    /// Load and assemble one level
    pub fn load(&self, world: WorldId, stage: StageId) -> Result<LevelDefinition> {
        let key = LevelKey::new(world, stage);
        let (format, path) = self.select_format(key)?;
        let bytes = self.reader.read(&path)?;
        let level = Self::parse(key, format, &bytes)?;

        tracing::debug!(
            level = %key,
            %format,
            width = level.width(),
            height = level.height(),
            entities = level.entities().len(),
            "decoded level"
        );
        Ok(level)
    }

    /// Decode and assemble a level from bytes already in memory
    pub fn parse(key: LevelKey, format: LevelFormat, bytes: &[u8]) -> Result<LevelDefinition> {
        let decoded = format.decode(bytes)?;
        LevelDefinition::assemble(key, decoded)
    }
}
