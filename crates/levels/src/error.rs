//! Error types for the levels crate

use crobot_core::{CoreError, StageId, WorldId};

/// Level-specific error types
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// Resource could not be read, or was read short
    #[error("Asset access error for '{path}': {source}")]
    AssetAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Neither candidate file exists for the requested level
    #[error("Level not found: world {world} stage {stage}")]
    NotFound { world: WorldId, stage: StageId },

    /// Required structure missing or mistyped
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Layer encoding other than csv
    #[error("Unsupported layer encoding: '{encoding}' (only csv is supported)")]
    UnsupportedFormat { encoding: String },

    /// Tile payload inconsistent with the declared shape
    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),
}

/// Structural problems with a level document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("level document is missing a non-empty layers array")]
    MissingLayers,

    #[error("area document is missing a columns array")]
    MissingColumns,

    /// Not parseable as JSON, or the top level is not an object
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("field '{field}' must be {expected}")]
    InvalidField { field: String, expected: &'static str },
}

/// Tile data that does not fit the declared level shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataIntegrityError {
    #[error("malformed tile data at cell {index}: '{cell}'")]
    MalformedTileData { index: usize, cell: String },

    #[error("tile count {actual} does not match width*height = {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("level needs {requested} tiles, limit is {limit}")]
    TileLimitExceeded { requested: u64, limit: usize },

    #[error("gid {gid} exceeds the collision mask limit of {limit}")]
    GidLimitExceeded { gid: i32, limit: i32 },
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::Schema(SchemaError::InvalidDocument(err.to_string()))
    }
}

impl From<LevelError> for CoreError {
    fn from(err: LevelError) -> Self {
        match err {
            LevelError::NotFound { .. } => CoreError::NotFound(err.to_string()),
            other => CoreError::InvalidData(other.to_string()),
        }
    }
}

/// Result type for level operations
pub type Result<T> = std::result::Result<T, LevelError>;
