//! Core types, math, and errors for the voxray raycasting engine.
//!
//! This crate provides the foundational types shared by every other crate:
//! - Block types and their raycast passability
//! - Coordinate systems (block, chunk, local)
//! - Rays, axis-aligned boxes and the ray/box slab test
//! - The engine-wide error type

pub mod coords;
pub mod error;
pub mod math;
pub mod types;

pub use coords::{BlockPos, ChunkPos, LocalPos};
pub use error::{Error, Result};
pub use math::{Aabb, Ray};
pub use types::BlockId;

/// Engine-wide constants
pub mod constants {
    /// Size of a chunk in voxels per axis
    pub const CHUNK_SIZE: usize = 32;
    /// Total voxels in a chunk (32^3)
    pub const CHUNK_SIZE_CUBED: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;
    /// Bits needed to represent position within a chunk (5 bits for 0-31)
    pub const CHUNK_BITS: u32 = 5;
    /// Edge length of a voxel cell in world units
    pub const CELL_SIZE: f64 = 1.0;
}
