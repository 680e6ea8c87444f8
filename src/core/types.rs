//! Core type definitions for the tiled space

use serde::{Deserialize, Serialize};

/// Reserved type index meaning "no tile at this cell"
pub const NONEXIST_TILE: u8 = 0xFF;

/// Sentinel location meaning "no location"
pub const NONEXIST_LOCATION: TileLocation = TileLocation {
    h: i32::MIN,
    v: i32::MIN,
};

/// Tile coordinates in visible (unpadded) map space
///
/// `h` grows along world +x, `v` along world +z. Anything outside
/// `[0, visible_size)` on either axis is not a real cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileLocation {
    pub h: i32,
    pub v: i32,
}

impl TileLocation {
    pub fn new(h: i32, v: i32) -> Self {
        Self { h, v }
    }
}

/// Quarter-turn orientation selecting how a tile-class asset is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Rotation from a number of quarter turns (wraps at 4)
    pub fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }

    pub fn quarter_turns(self) -> u8 {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }
}

/// Autotile variant derived from a cell's 8-neighborhood
///
/// A marked side or corner is a neighbor whose tile type index is strictly
/// greater than the cell's own. `Solid` means no neighbor outranks the cell.
/// The remaining variants name the canonical (rotation-free) pattern of
/// marked sides and significant corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileClass {
    #[default]
    Solid = 0,
    /// One marked corner, no marked sides
    InnerCorner,
    /// Two adjacent marked corners
    InnerCornerPair,
    /// Marked corners on a diagonal
    InnerCornerOpposite,
    /// Three marked corners
    InnerCornerTriple,
    /// All four corners marked, no sides
    InnerCornerQuad,
    /// One marked side, far corners clear
    Edge,
    /// One marked side plus the far left corner
    EdgeCornerLeft,
    /// One marked side plus the far right corner
    EdgeCornerRight,
    /// One marked side plus both far corners
    EdgeCornerBoth,
    /// Two adjacent marked sides
    OuterCorner,
    /// Two adjacent marked sides plus the opposite corner
    OuterCornerInner,
    /// Two opposite marked sides
    OppositeEdges,
    /// Three marked sides
    ThreeEdges,
    /// All four sides marked
    Surrounded,
}

impl TileClass {
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A named terrain category keyed by its map-image color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileType {
    pub name: String,
    /// Packed 0xAABBGGRR with alpha forced to 0xFF
    pub color: u32,
}

impl TileType {
    pub fn from_rgb(name: impl Into<String>, r: u32, g: u32, b: u32) -> Self {
        Self {
            name: name.into(),
            color: 0xFF00_0000 | (b << 16) | (g << 8) | r,
        }
    }
}
