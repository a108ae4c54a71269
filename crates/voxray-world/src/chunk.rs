//! Chunk data structure for voxel world storage.

use voxray_core::constants::CHUNK_SIZE_CUBED;
use voxray_core::coords::{ChunkPos, LocalPos};
use voxray_core::BlockId;

/// A single chunk of voxel data (32x32x32 voxels).
#[derive(Clone)]
pub struct Chunk {
    /// Position in chunk coordinates.
    pub pos: ChunkPos,
    /// Flat block storage indexed by [`LocalPos::to_index`].
    blocks: Box<[BlockId]>,
    /// Number of non-air blocks.
    occupied: usize,
}

impl Chunk {
    /// Create a new chunk filled with air.
    pub fn new(pos: ChunkPos) -> Self {
        Self::filled(pos, BlockId::AIR)
    }

    /// Create a chunk with every voxel set to `block`.
    pub fn filled(pos: ChunkPos, block: BlockId) -> Self {
        Self {
            pos,
            blocks: vec![block; CHUNK_SIZE_CUBED].into_boxed_slice(),
            occupied: if block.is_air() { 0 } else { CHUNK_SIZE_CUBED },
        }
    }

    /// Block at a local position.
    #[inline]
    pub fn get(&self, local: LocalPos) -> BlockId {
        self.blocks[local.to_index()]
    }

    /// Replace the block at a local position, returning the previous one.
    pub fn set(&mut self, local: LocalPos, block: BlockId) -> BlockId {
        let slot = &mut self.blocks[local.to_index()];
        let previous = std::mem::replace(slot, block);
        match (previous.is_air(), block.is_air()) {
            (true, false) => self.occupied += 1,
            (false, true) => self.occupied -= 1,
            _ => {}
        }
        previous
    }

    /// Check if this chunk is empty (all air).
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Number of non-air voxels.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Get memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + std::mem::size_of_val(&*self.blocks)
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("pos", &self.pos)
            .field("occupied", &self.occupied)
            .finish_non_exhaustive()
    }
}
