//! Error types for the engine.

use thiserror::Error;

use crate::coords::{BlockPos, ChunkPos};

/// Engine-wide error type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Ray parameters that cannot be traversed
    #[error("Invalid ray: {0}")]
    InvalidRay(String),

    /// Bounding box with inverted or non-finite corners
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    /// Invalid configuration value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Block position whose chunk coordinate does not fit the chunk grid
    #[error("Block position out of range: {0:?}")]
    OutOfRange(BlockPos),

    /// Mutation addressed to a chunk that is not resident
    #[error("Chunk not loaded: {0:?}")]
    ChunkNotLoaded(ChunkPos),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
