//! Ray tests against entity volumes.

use std::ops::ControlFlow;

use glam::DVec3;
use voxray_core::Ray;
use voxray_entity::{EntitySource, EntityView};

use crate::config::{EntityPrune, EntitySelection, RaycastConfig};
use crate::volume::VolumeCache;

/// An entity struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityHit<Id> {
    /// The entity that was hit.
    pub entity: Id,
    /// World-space point where the ray enters the entity's expanded volume.
    pub point: DVec3,
}

/// Find the entity struck by `ray` according to `config`.
///
/// Entities rejected by `filter` are skipped before any other test. Survivors
/// go through the broad-phase range check, then a slab test against their
/// expanded volume in the entity's local frame. The ray must enter the
/// volume within `max_distance`.
pub(crate) fn intersect_entities<S, F>(
    volumes: &VolumeCache,
    config: &RaycastConfig,
    entities: &S,
    ray: &Ray,
    max_distance: f64,
    filter: F,
) -> Option<EntityHit<S::Id>>
where
    S: EntitySource + ?Sized,
    F: Fn(&EntityView<S::Id>) -> bool,
{
    let max_distance_sq = max_distance * max_distance;
    let mut best: Option<(f64, EntityHit<S::Id>)> = None;

    entities.visit_entities(|view| {
        if !filter(view) {
            return ControlFlow::Continue(());
        }

        let volume = match config.prune {
            EntityPrune::Position => {
                if view.position.distance_squared(ray.origin) > max_distance_sq {
                    return ControlFlow::Continue(());
                }
                volumes.expanded(&view.bounds)
            }
            EntityPrune::Volume => {
                let volume = volumes.expanded(&view.bounds);
                let nearest_sq = volume
                    .translated(view.position)
                    .distance_squared_to_point(ray.origin);
                if nearest_sq > max_distance_sq {
                    return ControlFlow::Continue(());
                }
                volume
            }
        };

        let local_ray = ray.translated(-view.position);
        let Some((t_near, _)) = volume.intersect_ray(&local_ray) else {
            return ControlFlow::Continue(());
        };
        if t_near > max_distance {
            return ControlFlow::Continue(());
        }
        let point = local_ray.at(t_near) + view.position;
        let distance_sq = ray.origin.distance_squared(point);
        let hit = EntityHit {
            entity: view.id,
            point,
        };

        match config.selection {
            EntitySelection::FirstHit => {
                best = Some((distance_sq, hit));
                ControlFlow::Break(())
            }
            EntitySelection::Nearest => {
                if best.map_or(true, |(nearest, _)| distance_sq < nearest) {
                    best = Some((distance_sq, hit));
                }
                ControlFlow::Continue(())
            }
        }
    });

    best.map(|(_, hit)| hit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxray_core::Aabb;

    fn view(id: u32, position: DVec3) -> EntityView<u32> {
        EntityView {
            id,
            position,
            bounds: Aabb::new(DVec3::new(-0.3, 0.0, -0.3), DVec3::new(0.3, 1.8, 0.3)),
        }
    }

    fn cast(
        config: RaycastConfig,
        entities: &[EntityView<u32>],
        max_distance: f64,
    ) -> Option<EntityHit<u32>> {
        let volumes = VolumeCache::new(config.tolerance);
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        intersect_entities(&volumes, &config, entities, &ray, max_distance, |_| true)
    }

    #[test]
    fn hit_point_is_entry_into_expanded_volume() {
        let hit = cast(RaycastConfig::default(), &[view(7, DVec3::new(0.0, 0.0, 2.0))], 10.0)
            .unwrap();
        assert_eq!(hit.entity, 7);
        assert_relative_eq!(hit.point.z, 2.0 - 0.3 - 0.35, epsilon = 1e-12);
        assert_relative_eq!(hit.point.x, 0.0);
    }

    #[test]
    fn tolerance_catches_near_misses() {
        // The box edge sits 0.3 to the side of the ray; only the margin reaches it.
        let near = [view(1, DVec3::new(0.6, 0.0, 3.0))];
        assert!(cast(RaycastConfig::default(), &near, 10.0).is_some());
        assert!(cast(RaycastConfig::default().with_tolerance(0.0), &near, 10.0).is_none());
    }

    #[test]
    fn first_hit_follows_iteration_order() {
        let entities = [view(1, DVec3::new(0.0, 0.0, 6.0)), view(2, DVec3::new(0.0, 0.0, 3.0))];

        let first = RaycastConfig::default().with_selection(EntitySelection::FirstHit);
        assert_eq!(cast(first, &entities, 10.0).unwrap().entity, 1);

        let nearest = RaycastConfig::default().with_selection(EntitySelection::Nearest);
        assert_eq!(cast(nearest, &entities, 10.0).unwrap().entity, 2);
    }

    #[test]
    fn nearest_keeps_earlier_entity_on_ties() {
        let entities = [view(1, DVec3::new(0.0, 0.0, 4.0)), view(2, DVec3::new(0.0, 0.0, 4.0))];
        assert_eq!(cast(RaycastConfig::default(), &entities, 10.0).unwrap().entity, 1);
    }

    #[test]
    fn position_prune_skips_out_of_range_entities() {
        let far = [view(1, DVec3::new(0.0, 0.0, 10.5))];
        assert!(cast(RaycastConfig::default(), &far, 10.0).is_none());
    }

    #[test]
    fn volume_prune_keeps_large_entities_reaching_into_range() {
        let giant = [EntityView {
            id: 9,
            position: DVec3::new(0.0, 0.0, 12.0),
            bounds: Aabb::new(DVec3::splat(-3.0), DVec3::splat(3.0)),
        }];

        assert!(cast(RaycastConfig::default(), &giant, 10.0).is_none());

        let config = RaycastConfig::default().with_prune(EntityPrune::Volume);
        let hit = cast(config, &giant, 10.0).unwrap();
        assert_relative_eq!(hit.point.z, 12.0 - 3.35, epsilon = 1e-12);
    }

    #[test]
    fn entry_beyond_max_distance_is_not_a_hit() {
        // Thin wall whose near face is in range, but which a shallow ray
        // only enters far past the range.
        let wall = [EntityView {
            id: 4,
            position: DVec3::new(0.0, 0.0, 5.0),
            bounds: Aabb::new(DVec3::new(-100.0, -0.5, 0.0), DVec3::new(100.0, 0.5, 0.1)),
        }];
        let ray = Ray::new(DVec3::ZERO, DVec3::new(1.0, 0.0, 0.05));

        for prune in [EntityPrune::Volume, EntityPrune::Position] {
            let config = RaycastConfig::default().with_prune(prune);
            let volumes = VolumeCache::new(config.tolerance);
            let hit = intersect_entities(&volumes, &config, wall.as_slice(), &ray, 10.0, |_| true);
            assert_eq!(hit, None, "{prune:?}");

            let hit = intersect_entities(&volumes, &config, wall.as_slice(), &ray, 100.0, |_| true)
                .unwrap();
            assert_relative_eq!(hit.point.z, 4.65, epsilon = 1e-9);
        }
    }

    #[test]
    fn entry_distance_is_checked_against_max_distance() {
        let entities = [EntityView {
            id: 1,
            position: DVec3::new(0.0, 0.0, 2.0),
            bounds: Aabb::from_half_extents(DVec3::splat(0.25)),
        }];
        let config = RaycastConfig::default().with_prune(EntityPrune::Volume);
        let volumes = VolumeCache::new(config.tolerance);
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);

        // Expanded entry face at z = 2 - 0.25 - 0.35.
        let entry = 2.0 - 0.25 - 0.35;
        let hit = intersect_entities(&volumes, &config, entities.as_slice(), &ray, entry + 1e-9, |_| true);
        assert!(hit.is_some());
        let hit = intersect_entities(&volumes, &config, entities.as_slice(), &ray, entry - 1e-9, |_| true);
        assert!(hit.is_none());
    }

    #[test]
    fn filtered_entities_are_never_hit() {
        let volumes = VolumeCache::new(0.35);
        let entities = [view(1, DVec3::new(0.0, 0.0, 2.0)), view(2, DVec3::new(0.0, 0.0, 5.0))];
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);

        let hit = intersect_entities(
            &volumes,
            &RaycastConfig::default(),
            entities.as_slice(),
            &ray,
            10.0,
            |view| view.id != 1,
        )
        .unwrap();
        assert_eq!(hit.entity, 2);

        let none = intersect_entities(
            &volumes,
            &RaycastConfig::default(),
            entities.as_slice(),
            &ray,
            10.0,
            |_| false,
        );
        assert!(none.is_none());
    }

    #[test]
    fn pruned_entities_do_not_populate_the_cache() {
        let volumes = VolumeCache::new(0.35);
        let far = [view(1, DVec3::new(50.0, 0.0, 0.0))];
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        intersect_entities(&volumes, &RaycastConfig::default(), far.as_slice(), &ray, 10.0, |_| true);
        assert!(volumes.is_empty());
    }
}
