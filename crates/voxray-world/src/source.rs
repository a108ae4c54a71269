//! Block lookup seam between raycasting and world storage.

use voxray_core::{BlockId, BlockPos};

/// Result of looking up a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockQuery {
    /// The containing region is resident and holds this block.
    Resident(BlockId),
    /// The containing region is not loaded.
    NotLoaded,
}

impl BlockQuery {
    /// The block, if its region is resident.
    #[inline]
    pub const fn block(self) -> Option<BlockId> {
        match self {
            Self::Resident(id) => Some(id),
            Self::NotLoaded => None,
        }
    }

    /// Returns true if the region is resident.
    #[inline]
    pub const fn is_loaded(self) -> bool {
        matches!(self, Self::Resident(_))
    }
}

/// Anything that can answer "which block is at this cell".
///
/// Lookups are expected to be in-memory and to fail fast with
/// [`BlockQuery::NotLoaded`] rather than block.
pub trait BlockSource {
    /// Look up the block at `pos`.
    fn block_at(&self, pos: BlockPos) -> BlockQuery;
}

impl<F> BlockSource for F
where
    F: Fn(BlockPos) -> BlockQuery,
{
    #[inline]
    fn block_at(&self, pos: BlockPos) -> BlockQuery {
        self(pos)
    }
}
