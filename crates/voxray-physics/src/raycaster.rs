//! Combined block and entity raycasting.

use glam::DVec3;
use rayon::prelude::*;
use voxray_core::{Error, Ray, Result};
use voxray_entity::{EntitySource, EntityView};
use voxray_world::{BlockQuery, BlockSource};

use crate::config::{RaycastConfig, TiePolicy};
use crate::grid::{within_grid, GridTraversal, MAX_COORDINATE};
use crate::intersect::{intersect_entities, EntityHit};
use crate::volume::VolumeCache;

/// What a ray struck first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaycastOutcome<Id> {
    /// An entity's expanded volume, entered at `point`.
    Entity { entity: Id, point: DVec3 },
    /// A solid block; `point` is the block's minimum corner.
    Block { point: DVec3 },
    /// Nothing within range.
    Nothing,
}

impl<Id: Copy> RaycastOutcome<Id> {
    /// The hit position, unless nothing was hit.
    pub fn point(&self) -> Option<DVec3> {
        match self {
            Self::Entity { point, .. } | Self::Block { point } => Some(*point),
            Self::Nothing => None,
        }
    }

    /// The entity hit, if any.
    pub fn entity(&self) -> Option<Id> {
        match self {
            Self::Entity { entity, .. } => Some(*entity),
            _ => None,
        }
    }

    /// Returns true if the ray hit nothing.
    pub const fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// Short name of the variant, for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Entity { .. } => "entity",
            Self::Block { .. } => "block",
            Self::Nothing => "nothing",
        }
    }
}

/// Hit filter that accepts every entity.
#[inline]
pub const fn accept_all<Id>(_: &EntityView<Id>) -> bool {
    true
}

/// Casts rays against a block world and an entity snapshot.
///
/// Owns the expanded-volume cache; share one raycaster (by reference) among
/// every thread casting rays so the cache is shared too.
#[derive(Debug)]
pub struct Raycaster {
    config: RaycastConfig,
    volumes: VolumeCache,
}

impl Default for Raycaster {
    fn default() -> Self {
        let config = RaycastConfig::default();
        Self {
            volumes: VolumeCache::new(config.tolerance),
            config,
        }
    }
}

impl Raycaster {
    /// Create a raycaster with the given configuration.
    pub fn new(config: RaycastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            volumes: VolumeCache::new(config.tolerance),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &RaycastConfig {
        &self.config
    }

    /// Expanded-volume cache shared by every entity test.
    pub fn volumes(&self) -> &VolumeCache {
        &self.volumes
    }

    /// First solid block along `ray`, as its minimum corner.
    ///
    /// Air and liquids are passed through. Traversal stops with no hit as
    /// soon as it reaches a region that is not loaded. Rays reaching more
    /// than [`MAX_COORDINATE`] cells from the grid origin are rejected.
    pub fn raycast_block<W>(&self, world: &W, ray: &Ray, max_distance: f64) -> Result<Option<DVec3>>
    where
        W: BlockSource + ?Sized,
    {
        if !check_ray(ray, max_distance)? {
            return Ok(None);
        }
        Ok(self.block_hit(world, ray, max_distance))
    }

    /// Entity struck by `ray` among those accepted by `filter`.
    pub fn raycast_entity<S, F>(
        &self,
        entities: &S,
        ray: &Ray,
        max_distance: f64,
        filter: F,
    ) -> Result<Option<EntityHit<S::Id>>>
    where
        S: EntitySource + ?Sized,
        F: Fn(&EntityView<S::Id>) -> bool,
    {
        if !check_ray(ray, max_distance)? {
            return Ok(None);
        }
        Ok(self.entity_hit(entities, ray, max_distance, filter))
    }

    /// Nearest of the block hit and the entity hit along `ray`.
    ///
    /// Both tests always run. When both hit, the squared distances from the
    /// origin decide; an exact tie goes to the configured [`TiePolicy`].
    pub fn raycast<W, S, F>(
        &self,
        world: &W,
        entities: &S,
        ray: &Ray,
        max_distance: f64,
        filter: F,
    ) -> Result<RaycastOutcome<S::Id>>
    where
        W: BlockSource + ?Sized,
        S: EntitySource + ?Sized,
        F: Fn(&EntityView<S::Id>) -> bool,
    {
        let _span = tracing::trace_span!("raycast", max_distance).entered();
        if !check_ray(ray, max_distance)? {
            return Ok(RaycastOutcome::Nothing);
        }

        let block = self.block_hit(world, ray, max_distance);
        let entity = self.entity_hit(entities, ray, max_distance, filter);
        let outcome = resolve(ray.origin, block, entity, self.config.tie);
        tracing::trace!(hit = outcome.kind(), point = ?outcome.point(), "raycast resolved");
        Ok(outcome)
    }

    /// Cast many rays in parallel, sharing the volume cache.
    ///
    /// Results are returned in the order of `rays`.
    pub fn raycast_batch<W, S, F>(
        &self,
        world: &W,
        entities: &S,
        rays: &[(Ray, f64)],
        filter: F,
    ) -> Vec<Result<RaycastOutcome<S::Id>>>
    where
        W: BlockSource + Sync + ?Sized,
        S: EntitySource + Sync + ?Sized,
        S::Id: Send,
        F: Fn(&EntityView<S::Id>) -> bool + Sync,
    {
        rays.par_iter()
            .map(|(ray, max_distance)| self.raycast(world, entities, ray, *max_distance, &filter))
            .collect()
    }

    fn block_hit<W>(&self, world: &W, ray: &Ray, max_distance: f64) -> Option<DVec3>
    where
        W: BlockSource + ?Sized,
    {
        for step in GridTraversal::new(ray, max_distance) {
            match world.block_at(step.cell) {
                BlockQuery::NotLoaded => {
                    tracing::debug!(cell = ?step.cell, "raycast reached unloaded region");
                    return None;
                }
                BlockQuery::Resident(block) if block.blocks_ray() => {
                    tracing::trace!(cell = ?step.cell, ?block, distance = step.distance, "block hit");
                    return Some(step.cell.to_dvec3());
                }
                BlockQuery::Resident(_) => {}
            }
        }
        None
    }

    fn entity_hit<S, F>(
        &self,
        entities: &S,
        ray: &Ray,
        max_distance: f64,
        filter: F,
    ) -> Option<EntityHit<S::Id>>
    where
        S: EntitySource + ?Sized,
        F: Fn(&EntityView<S::Id>) -> bool,
    {
        intersect_entities(&self.volumes, &self.config, entities, ray, max_distance, filter)
    }
}

/// Validate ray parameters. `Ok(false)` means the ray has no length and
/// cannot hit anything.
fn check_ray(ray: &Ray, max_distance: f64) -> Result<bool> {
    if max_distance.is_nan() {
        return Err(Error::InvalidRay("max distance is NaN".to_string()));
    }
    if max_distance <= 0.0 {
        return Ok(false);
    }
    if max_distance.is_infinite() {
        return Err(Error::InvalidRay("max distance is infinite".to_string()));
    }
    ray.validate()?;
    if !within_grid(ray, max_distance) {
        return Err(Error::InvalidRay(format!(
            "ray from {} reaches beyond the grid range of {MAX_COORDINATE} cells",
            ray.origin
        )));
    }
    Ok(true)
}

/// Merge the independent block and entity results.
fn resolve<Id>(
    origin: DVec3,
    block: Option<DVec3>,
    entity: Option<EntityHit<Id>>,
    tie: TiePolicy,
) -> RaycastOutcome<Id> {
    match (block, entity) {
        (None, None) => RaycastOutcome::Nothing,
        (Some(point), None) => RaycastOutcome::Block { point },
        (None, Some(hit)) => RaycastOutcome::Entity {
            entity: hit.entity,
            point: hit.point,
        },
        (Some(block_point), Some(hit)) => {
            let block_sq = origin.distance_squared(block_point);
            let entity_sq = origin.distance_squared(hit.point);
            let entity_wins = match tie {
                TiePolicy::PreferBlock => block_sq > entity_sq,
                TiePolicy::PreferEntity => block_sq >= entity_sq,
            };
            if entity_wins {
                RaycastOutcome::Entity {
                    entity: hit.entity,
                    point: hit.point,
                }
            } else {
                RaycastOutcome::Block { point: block_point }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_at(z: f64) -> Option<EntityHit<u8>> {
        Some(EntityHit {
            entity: 1,
            point: DVec3::new(0.0, 0.0, z),
        })
    }

    fn block_at(z: f64) -> Option<DVec3> {
        Some(DVec3::new(0.0, 0.0, z))
    }

    #[test]
    fn resolve_single_results() {
        let tie = TiePolicy::PreferBlock;
        assert!(resolve::<u8>(DVec3::ZERO, None, None, tie).is_nothing());
        assert_eq!(
            resolve::<u8>(DVec3::ZERO, block_at(4.0), None, tie),
            RaycastOutcome::Block { point: DVec3::new(0.0, 0.0, 4.0) }
        );
        assert_eq!(resolve(DVec3::ZERO, None, entity_at(2.0), tie).entity(), Some(1));
    }

    #[test]
    fn resolve_nearer_hit_wins() {
        let tie = TiePolicy::PreferBlock;
        let outcome = resolve(DVec3::ZERO, block_at(5.0), entity_at(3.0), tie);
        assert_eq!(outcome.entity(), Some(1));

        let outcome = resolve(DVec3::ZERO, block_at(3.0), entity_at(5.0), tie);
        assert_eq!(outcome, RaycastOutcome::Block { point: DVec3::new(0.0, 0.0, 3.0) });
    }

    #[test]
    fn resolve_ties_follow_policy() {
        let outcome = resolve(DVec3::ZERO, block_at(3.0), entity_at(3.0), TiePolicy::PreferBlock);
        assert!(matches!(outcome, RaycastOutcome::Block { .. }));

        let outcome = resolve(DVec3::ZERO, block_at(3.0), entity_at(3.0), TiePolicy::PreferEntity);
        assert!(matches!(outcome, RaycastOutcome::Entity { .. }));
    }

    #[test]
    fn check_ray_boundaries() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert_eq!(check_ray(&ray, 0.0), Ok(false));
        assert_eq!(check_ray(&ray, -5.0), Ok(false));
        assert_eq!(check_ray(&ray, 1.0), Ok(true));
        assert!(check_ray(&ray, f64::NAN).is_err());
        assert!(check_ray(&ray, f64::INFINITY).is_err());
        // A degenerate ray with no length still hits nothing.
        assert_eq!(check_ray(&Ray::new(DVec3::ZERO, DVec3::ZERO), 0.0), Ok(false));
        assert!(check_ray(&Ray::new(DVec3::ZERO, DVec3::ZERO), 1.0).is_err());
    }

    #[test]
    fn check_ray_rejects_origins_beyond_grid_range() {
        let far = Ray::new(DVec3::new(1e19, 0.5, 0.5), DVec3::X);
        assert!(matches!(check_ray(&far, 10.0), Err(Error::InvalidRay(_))));
        // No length, nothing to traverse.
        assert_eq!(check_ray(&far, 0.0), Ok(false));
        assert_eq!(check_ray(&Ray::new(DVec3::splat(1e12), DVec3::X), 10.0), Ok(true));
    }

    #[test]
    fn raycaster_rejects_invalid_config() {
        let config = RaycastConfig::default().with_tolerance(-1.0);
        assert!(Raycaster::new(config).is_err());
        assert_eq!(Raycaster::default().volumes().margin(), 0.35);
    }
}
