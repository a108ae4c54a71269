//! Voxel world access for the voxray raycasting engine.
//!
//! Raycasts consult the world only through [`BlockSource`]. [`ChunkedWorld`]
//! is an in-memory implementation backed by resident 32³ chunks.

pub mod chunk;
pub mod source;
pub mod world;

pub use chunk::Chunk;
pub use source::{BlockQuery, BlockSource};
pub use world::ChunkedWorld;
