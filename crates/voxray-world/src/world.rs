//! In-memory chunked voxel world.

use hashbrown::HashMap;
use parking_lot::RwLock;
use voxray_core::coords::{BlockPos, ChunkPos};
use voxray_core::{BlockId, Error, Result};

use crate::chunk::Chunk;
use crate::source::{BlockQuery, BlockSource};

/// Voxel world made of resident chunks.
///
/// Chunks that were never loaded, or have been unloaded, answer block
/// queries with [`BlockQuery::NotLoaded`]. Provides thread-safe access to
/// chunks via `RwLock`.
#[derive(Default)]
pub struct ChunkedWorld {
    /// All loaded chunks indexed by position.
    chunks: RwLock<HashMap<ChunkPos, Chunk>>,
}

impl ChunkedWorld {
    /// Create an empty world with no resident chunks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a chunk exists at the given position.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.read().contains_key(&pos)
    }

    /// Get the number of loaded chunks.
    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    /// Check if no chunks are loaded.
    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Insert or replace a chunk at the given position.
    pub fn insert(&self, chunk: Chunk) {
        tracing::debug!(pos = ?chunk.pos, "chunk loaded");
        let mut chunks = self.chunks.write();
        chunks.insert(chunk.pos, chunk);
    }

    /// Make a chunk resident, filling it with air if it was not loaded.
    pub fn load(&self, pos: ChunkPos) {
        let mut chunks = self.chunks.write();
        chunks.entry(pos).or_insert_with(|| {
            tracing::debug!(?pos, "chunk loaded");
            Chunk::new(pos)
        });
    }

    /// Make every chunk in the inclusive range `min..=max` resident.
    pub fn load_region(&self, min: ChunkPos, max: ChunkPos) {
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    self.load(ChunkPos::new(x, y, z));
                }
            }
        }
    }

    /// Remove a chunk at the given position.
    pub fn unload(&self, pos: ChunkPos) -> Option<Chunk> {
        let removed = self.chunks.write().remove(&pos);
        if removed.is_some() {
            tracing::debug!(?pos, "chunk unloaded");
        }
        removed
    }

    /// Unload every chunk farther than `radius` (per axis) from `center`.
    ///
    /// Returns the positions of unloaded chunks.
    pub fn retain_within(&self, center: ChunkPos, radius: i32) -> Vec<ChunkPos> {
        let mut chunks = self.chunks.write();
        let outside: Vec<ChunkPos> = chunks
            .keys()
            .filter(|pos| {
                (pos.x - center.x).abs() > radius
                    || (pos.y - center.y).abs() > radius
                    || (pos.z - center.z).abs() > radius
            })
            .copied()
            .collect();
        for pos in &outside {
            chunks.remove(pos);
        }
        tracing::debug!(unloaded = outside.len(), "chunks outside radius unloaded");
        outside
    }

    /// Get all loaded chunk positions.
    pub fn positions(&self) -> Vec<ChunkPos> {
        self.chunks.read().keys().copied().collect()
    }

    /// Execute a function with read access to a chunk.
    ///
    /// Returns `None` if the chunk doesn't exist.
    pub fn with_chunk<F, R>(&self, pos: ChunkPos, f: F) -> Option<R>
    where
        F: FnOnce(&Chunk) -> R,
    {
        let chunks = self.chunks.read();
        chunks.get(&pos).map(f)
    }

    /// Execute a function with write access to a chunk.
    ///
    /// Returns `None` if the chunk doesn't exist.
    pub fn with_chunk_mut<F, R>(&self, pos: ChunkPos, f: F) -> Option<R>
    where
        F: FnOnce(&mut Chunk) -> R,
    {
        let mut chunks = self.chunks.write();
        chunks.get_mut(&pos).map(f)
    }

    /// Block at `pos`, or `None` if its chunk is not resident.
    ///
    /// Positions beyond the chunk grid are never resident.
    pub fn block(&self, pos: BlockPos) -> Option<BlockId> {
        let (chunk, local) = pos.split()?;
        self.with_chunk(chunk, |c| c.get(local))
    }

    /// Set the block at `pos`, returning the previous block.
    pub fn set_block(&self, pos: BlockPos, block: BlockId) -> Result<BlockId> {
        let (chunk, local) = pos.split().ok_or(Error::OutOfRange(pos))?;
        self.with_chunk_mut(chunk, |c| c.set(local, block))
            .ok_or(Error::ChunkNotLoaded(chunk))
    }

    /// Fill the inclusive block range `min..=max` with `block`.
    ///
    /// Fails on the first cell whose chunk is not resident; cells before it
    /// keep their new value.
    pub fn fill(&self, min: BlockPos, max: BlockPos, block: BlockId) -> Result<()> {
        let mut chunks = self.chunks.write();
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    let pos = BlockPos::new(x, y, z);
                    let (chunk, local) = pos.split().ok_or(Error::OutOfRange(pos))?;
                    chunks
                        .get_mut(&chunk)
                        .ok_or(Error::ChunkNotLoaded(chunk))?
                        .set(local, block);
                }
            }
        }
        Ok(())
    }

    /// Get total memory usage of all chunks.
    pub fn memory_usage(&self) -> usize {
        self.chunks.read().values().map(Chunk::memory_usage).sum()
    }
}

impl BlockSource for ChunkedWorld {
    fn block_at(&self, pos: BlockPos) -> BlockQuery {
        self.block(pos)
            .map_or(BlockQuery::NotLoaded, BlockQuery::Resident)
    }
}
