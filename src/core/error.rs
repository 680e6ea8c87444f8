//! Error types shared across the space subsystem

use thiserror::Error;

/// Failures raised while loading or querying a space
///
/// Load-time variants carry enough detail to report the offending token or
/// pixel; query-time range problems are reported through sentinel returns on
/// the query surface instead of this enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpaceError {
    #[error("'{keyword}' has invalid value in space info")]
    InvalidInfoValue { keyword: &'static str },

    #[error("tile type '{name}' has invalid value in space info")]
    InvalidTileType { name: String },

    #[error("helper type '{name}' has invalid value in space info")]
    InvalidHelperType { name: String },

    #[error("helper '{name}' coordinate {index} has invalid value in space info")]
    InvalidHelper { name: String, index: usize },

    #[error("unrecognized keyword '{0}' in space info")]
    UnrecognizedKeyword(String),

    #[error("no tile types declared in space info")]
    EmptyPalette,

    #[error("map image is {width}x{height}, expected a square RGBA image")]
    NonSquareMap { width: u32, height: u32 },

    #[error("map pixel at ({x}, {y}) has color {color:#010X} missing from the tile palette")]
    UnmatchedColor { x: u32, y: u32, color: u32 },

    #[error("type buffer holds {actual} cells, expected {expected}")]
    MapSizeMismatch { expected: usize, actual: usize },

    #[error("space has no loaded map")]
    NotLoaded,
}

pub type Result<T> = std::result::Result<T, SpaceError>;
