//! Coordinate systems for the voxel world.

use crate::constants::{CHUNK_BITS, CHUNK_SIZE};
use glam::{DVec3, I64Vec3};
use serde::{Deserialize, Serialize};

/// Position within a chunk (0 to CHUNK_SIZE-1 per axis).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPos {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

impl LocalPos {
    /// Create a new local position
    #[inline]
    pub const fn new(x: u8, y: u8, z: u8) -> Self {
        debug_assert!((x as usize) < CHUNK_SIZE);
        debug_assert!((y as usize) < CHUNK_SIZE);
        debug_assert!((z as usize) < CHUNK_SIZE);
        Self { x, y, z }
    }

    /// Convert to linear index for flat array storage
    #[inline]
    pub const fn to_index(self) -> usize {
        self.x as usize
            + (self.y as usize) * CHUNK_SIZE
            + (self.z as usize) * CHUNK_SIZE * CHUNK_SIZE
    }

    /// Create from linear index
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        let x = (index % CHUNK_SIZE) as u8;
        let y = ((index / CHUNK_SIZE) % CHUNK_SIZE) as u8;
        let z = (index / (CHUNK_SIZE * CHUNK_SIZE)) as u8;
        Self { x, y, z }
    }
}

/// Chunk position in chunk coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkPos {
    /// Create a new chunk position
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Block position of the chunk's minimum corner
    #[inline]
    pub const fn min_block(self) -> BlockPos {
        BlockPos::new(
            (self.x as i64) << CHUNK_BITS,
            (self.y as i64) << CHUNK_BITS,
            (self.z as i64) << CHUNK_BITS,
        )
    }
}

/// Voxel cell identity in world space.
///
/// The cell spans `[x, x + 1) x [y, y + 1) x [z, z + 1)` in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl BlockPos {
    /// Create a new block position
    #[inline]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Cell containing a world-space point
    #[inline]
    pub fn containing(point: DVec3) -> Self {
        let cell = point.floor();
        Self::new(cell.x as i64, cell.y as i64, cell.z as i64)
    }

    /// Get the chunk containing this position.
    ///
    /// Returns `None` when the chunk coordinate does not fit a [`ChunkPos`].
    #[inline]
    pub fn chunk_pos(self) -> Option<ChunkPos> {
        let axis = |v: i64| i32::try_from(v >> CHUNK_BITS).ok();
        Some(ChunkPos::new(axis(self.x)?, axis(self.y)?, axis(self.z)?))
    }

    /// Get the local position within the chunk
    #[inline]
    pub const fn local_pos(self) -> LocalPos {
        let mask = (CHUNK_SIZE - 1) as i64;
        LocalPos::new(
            (self.x & mask) as u8,
            (self.y & mask) as u8,
            (self.z & mask) as u8,
        )
    }

    /// Split into chunk and local position
    #[inline]
    pub fn split(self) -> Option<(ChunkPos, LocalPos)> {
        Some((self.chunk_pos()?, self.local_pos()))
    }

    /// Create from chunk and local position
    #[inline]
    pub const fn from_chunk_local(chunk: ChunkPos, local: LocalPos) -> Self {
        Self::new(
            ((chunk.x as i64) << CHUNK_BITS) + local.x as i64,
            ((chunk.y as i64) << CHUNK_BITS) + local.y as i64,
            ((chunk.z as i64) << CHUNK_BITS) + local.z as i64,
        )
    }

    /// Move by the given number of cells along each axis
    #[inline]
    pub const fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Minimum corner of the cell in world space
    #[inline]
    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl From<DVec3> for BlockPos {
    fn from(v: DVec3) -> Self {
        Self::containing(v)
    }
}

impl From<I64Vec3> for BlockPos {
    fn from(v: I64Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<BlockPos> for I64Vec3 {
    fn from(p: BlockPos) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}
