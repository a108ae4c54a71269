//! Core voxel types.

use serde::{Deserialize, Serialize};

/// Unique identifier for a block type.
///
/// Block ID 0 is reserved for air (empty space).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    /// Air block (empty space)
    pub const AIR: Self = Self(0);
    /// Stone block
    pub const STONE: Self = Self(1);
    /// Dirt block
    pub const DIRT: Self = Self(2);
    /// Grass block
    pub const GRASS: Self = Self(3);
    /// Sand block
    pub const SAND: Self = Self(4);
    /// Water block
    pub const WATER: Self = Self(5);
    /// Lava block
    pub const LAVA: Self = Self(6);
    /// Tree log block
    pub const LOG: Self = Self(7);
    /// Tree leaves block
    pub const LEAVES: Self = Self(8);

    /// Returns true if this block is air (empty)
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this block is a liquid
    #[inline]
    pub const fn is_liquid(self) -> bool {
        self.0 == Self::WATER.0 || self.0 == Self::LAVA.0
    }

    /// Returns true if this block is solid (not air)
    #[inline]
    pub const fn is_solid(self) -> bool {
        self.0 != 0
    }

    /// Returns true if a ray stops at this block.
    ///
    /// Air and liquids are passable; everything else blocks.
    #[inline]
    pub const fn blocks_ray(self) -> bool {
        !(self.is_air() || self.is_liquid())
    }
}
