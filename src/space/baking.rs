//! Geometry baking boundary toward the external mesh factory
//!
//! The space core never touches rendering. For every occupied cell it emits a
//! `BakeRequest` naming the geometry asset to place; the collaborator on the
//! other side of `GeometryBaker` resolves the key and bakes the mesh, possibly
//! asynchronously.

use glam::Vec3;

use crate::core::types::{Rotation, TileLocation};

/// One tile's geometry placement request
#[derive(Debug, Clone, PartialEq)]
pub struct BakeRequest {
    pub location: TileLocation,
    /// Tile-center world position the asset is placed at
    pub position: Vec3,
    /// Asset key following the tile naming convention
    pub model_key: String,
    pub rotation: Rotation,
}

/// Receiver of geometry placement requests
pub trait GeometryBaker {
    fn bake(&mut self, request: BakeRequest);
}

/// Baker that drops every request, for headless loads and tests
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBaker;

impl GeometryBaker for NullBaker {
    fn bake(&mut self, _request: BakeRequest) {}
}
