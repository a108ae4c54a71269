//! Entity system for the voxray raycasting engine.
//!
//! Raycasts see entities only through [`EntitySource`], which yields an
//! [`EntityView`] per entity: an identity, a world position and a bounding
//! box relative to that position. A `hecs` [`World`] holding [`Transform`]
//! and [`Collider`] components is an entity source out of the box, as is a
//! plain slice of views.

use std::ops::ControlFlow;

use glam::DVec3;
pub use hecs::{Entity, World};
use voxray_core::Aabb;

/// Transform component.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: DVec3,
}

impl Transform {
    /// Transform placed at `position`.
    pub const fn at(position: DVec3) -> Self {
        Self { position }
    }
}

/// Collision box component, relative to the entity's [`Transform`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Collider {
    pub bounds: Aabb,
}

impl Collider {
    /// Collider with the given local bounds.
    pub const fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }

    /// Upright box with the given width and height, standing on the
    /// entity's position.
    pub fn upright(width: f64, height: f64) -> Self {
        let half = width * 0.5;
        Self::new(Aabb::new(
            DVec3::new(-half, 0.0, -half),
            DVec3::new(half, height, half),
        ))
    }
}

/// What a raycast sees of one entity at query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView<Id> {
    /// Identity reported back on a hit.
    pub id: Id,
    /// World-space reference position.
    pub position: DVec3,
    /// Bounding box relative to `position`.
    pub bounds: Aabb,
}

impl<Id> EntityView<Id> {
    /// Bounding box in world space.
    #[inline]
    pub fn world_bounds(&self) -> Aabb {
        self.bounds.translated(self.position)
    }
}

/// A snapshot of entities that raycasts can iterate.
pub trait EntitySource {
    /// Identity handed back with entity hits.
    type Id: Copy;

    /// Visit entities in iteration order until `visit` breaks.
    fn visit_entities<F>(&self, visit: F)
    where
        F: FnMut(&EntityView<Self::Id>) -> ControlFlow<()>;
}

impl EntitySource for World {
    type Id = Entity;

    fn visit_entities<F>(&self, mut visit: F)
    where
        F: FnMut(&EntityView<Self::Id>) -> ControlFlow<()>,
    {
        let mut query = self.query::<(&Transform, &Collider)>();
        for (id, (transform, collider)) in query.iter() {
            let view = EntityView {
                id,
                position: transform.position,
                bounds: collider.bounds,
            };
            if visit(&view).is_break() {
                return;
            }
        }
    }
}

impl<Id: Copy> EntitySource for [EntityView<Id>] {
    type Id = Id;

    fn visit_entities<F>(&self, mut visit: F)
    where
        F: FnMut(&EntityView<Self::Id>) -> ControlFlow<()>,
    {
        for view in self {
            if visit(view).is_break() {
                return;
            }
        }
    }
}

impl<Id: Copy> EntitySource for Vec<EntityView<Id>> {
    type Id = Id;

    fn visit_entities<F>(&self, visit: F)
    where
        F: FnMut(&EntityView<Self::Id>) -> ControlFlow<()>,
    {
        self.as_slice().visit_entities(visit);
    }
}
