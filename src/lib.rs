//! Tiled Space - bordered tile grid backing a voxel-world space
//!
//! Loads a tile-type map from a color-coded image plus a text description,
//! classifies every cell's autotile variant from its 8-neighborhood, exposes
//! safe runtime tile mutation under a smooth-transition constraint, resolves
//! named helper points, and answers weighted shortest-path queries.

pub mod core;
pub mod space;

pub use crate::core::error::{Result, SpaceError};
pub use crate::core::types::{
    Rotation, TileClass, TileLocation, TileType, NONEXIST_LOCATION, NONEXIST_TILE,
};
pub use crate::space::baking::{BakeRequest, GeometryBaker, NullBaker};
pub use crate::space::pathfinding::PathError;
pub use crate::space::TiledSpace;
