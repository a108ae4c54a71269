//! Block and entity raycasting for the voxray engine.
//!
//! A [`Raycaster`] answers "what does this ray hit first" against two
//! collaborators: a voxel world seen through [`BlockSource`] and an entity
//! snapshot seen through [`EntitySource`]. Blocks are found by exact grid
//! traversal ([`GridTraversal`]); entities by slab tests against their
//! bounding boxes inflated by a tolerance margin, memoized in a
//! [`VolumeCache`]. The nearer of the two hits wins.
//!
//! [`BlockSource`]: voxray_world::BlockSource
//! [`EntitySource`]: voxray_entity::EntitySource

pub mod config;
pub mod grid;
pub mod intersect;
pub mod raycaster;
pub mod volume;

pub use config::{EntityPrune, EntitySelection, RaycastConfig, TiePolicy, DEFAULT_TOLERANCE};
pub use grid::{within_grid, GridStep, GridTraversal, MAX_COORDINATE};
pub use intersect::EntityHit;
pub use raycaster::{accept_all, RaycastOutcome, Raycaster};
pub use volume::VolumeCache;
