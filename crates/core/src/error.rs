//! Error types for the fallible edges of the crate.
//!
//! Generation itself never fails; it degrades and records what it skipped in
//! the generation log. These errors cover catalog loading, manual config
//! parsing, and the placement primitives whose rejections callers inspect.

use thiserror::Error;

use crate::types::Pos;

/// Why a placement primitive refused to commit an instance.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("type `{type_id}` has no variant `{variant}`")]
    UnknownVariant { type_id: String, variant: String },
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Pos),
    #[error("cell {0} is outside the playable area")]
    OutsidePlayable(Pos),
    #[error("cell {0} is reserved")]
    Reserved(Pos),
    #[error("cell {0} is already occupied")]
    Occupied(Pos),
}

/// Why a pattern stamp was rejected as a whole.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("stamp does not fit inside the grid and its border margin")]
    OutsideMargin,
    #[error("stamp leaves the target region")]
    OutsideRegion,
    #[error("stamp area is not clear at {0}")]
    AreaNotClear(Pos),
    #[error("stamp references unknown {kind} `{type_id}`")]
    UnknownType { kind: &'static str, type_id: String },
    #[error("element `{type_id}` cannot be placed")]
    Element {
        type_id: String,
        #[source]
        source: PlacementError,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog JSON")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("{kind} `{id}` declares no footprint variants")]
    NoVariants { kind: &'static str, id: String },
    #[error("pattern `{pattern}` references unknown {kind} `{type_id}`")]
    UnknownElementType { pattern: String, kind: &'static str, type_id: String },
    #[error("pattern `{pattern}` has an empty footprint")]
    EmptyPattern { pattern: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML manual config")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse JSON manual config")]
    Json(#[from] serde_json::Error),
    #[error("grid {cols}x{rows} must have at least one row and one column")]
    EmptyGrid { cols: usize, rows: usize },
    #[error("entrance count {0} is above the supported maximum")]
    TooManyEntrances(u8),
}
