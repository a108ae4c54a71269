//! Block world and entity registry bundled for raycast tests.

use glam::DVec3;
use voxray_core::{BlockId, BlockPos, ChunkPos, Ray, Result};
use voxray_entity::{Collider, Entity, Transform, World};
use voxray_world::ChunkedWorld;

/// Collision width of a humanoid mob.
pub const MOB_WIDTH: f64 = 0.6;
/// Collision height of a humanoid mob.
pub const MOB_HEIGHT: f64 = 1.8;

/// Ray from array coordinates, direction used as given.
pub fn ray(origin: [f64; 3], direction: [f64; 3]) -> Ray {
    Ray::new(DVec3::from_array(origin), DVec3::from_array(direction))
}

/// A block world and an entity registry.
pub struct TestScene {
    pub world: ChunkedWorld,
    pub entities: World,
}

impl Default for TestScene {
    fn default() -> Self {
        Self::new()
    }
}

impl TestScene {
    /// Scene with the eight chunks around the origin resident and empty.
    ///
    /// Covers blocks -32..=31 on every axis.
    pub fn new() -> Self {
        Self::with_radius(1)
    }

    /// Scene with chunks `-radius..radius` resident on every axis.
    pub fn with_radius(radius: i32) -> Self {
        let world = ChunkedWorld::new();
        if radius > 0 {
            world.load_region(
                ChunkPos::new(-radius, -radius, -radius),
                ChunkPos::new(radius - 1, radius - 1, radius - 1),
            );
        }
        tracing::debug!(radius, chunks = world.len(), "test scene created");
        Self {
            world,
            entities: World::new(),
        }
    }

    /// Scene with no resident chunks at all.
    pub fn unloaded() -> Self {
        Self::with_radius(0)
    }

    /// Place a single block.
    pub fn set_block(&self, pos: BlockPos, block: BlockId) -> Result<()> {
        self.world.set_block(pos, block).map(|_| ())
    }

    /// Fill the inclusive range `min..=max`.
    pub fn fill(&self, min: BlockPos, max: BlockPos, block: BlockId) -> Result<()> {
        self.world.fill(min, max, block)
    }

    /// Make a chunk non-resident.
    pub fn unload(&self, chunk: ChunkPos) {
        self.world.unload(chunk);
    }

    /// Spawn an entity with the given collider.
    pub fn spawn(&mut self, position: DVec3, collider: Collider) -> Entity {
        self.entities.spawn((Transform::at(position), collider))
    }

    /// Spawn a humanoid mob standing at `position`.
    pub fn spawn_mob(&mut self, position: DVec3) -> Entity {
        self.spawn(position, Collider::upright(MOB_WIDTH, MOB_HEIGHT))
    }

    /// Move an existing entity.
    pub fn move_entity(&mut self, entity: Entity, position: DVec3) {
        if let Ok(mut transform) = self.entities.get::<&mut Transform>(entity) {
            transform.position = position;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxray_world::{BlockQuery, BlockSource};

    #[test]
    fn default_scene_covers_origin_neighbourhood() {
        let scene = TestScene::new();
        assert_eq!(scene.world.len(), 8);
        assert!(scene.world.block_at(BlockPos::new(-32, 31, 0)).is_loaded());
        assert_eq!(scene.world.block_at(BlockPos::new(32, 0, 0)), BlockQuery::NotLoaded);
    }

    #[test]
    fn spawned_mobs_have_components() {
        let mut scene = TestScene::new();
        let mob = scene.spawn_mob(DVec3::new(1.0, 0.0, 1.0));
        scene.move_entity(mob, DVec3::new(2.0, 0.0, 1.0));

        let transform = *scene.entities.get::<&Transform>(mob).unwrap();
        assert_eq!(transform.position, DVec3::new(2.0, 0.0, 1.0));
        assert!(scene.entities.get::<&Collider>(mob).is_ok());
    }

    #[test]
    fn unloaded_scene_has_no_chunks() {
        let scene = TestScene::unloaded();
        assert!(scene.world.is_empty());
        assert!(scene.set_block(BlockPos::new(0, 0, 0), BlockId::STONE).is_err());
    }
}
