//! Math utilities and helpers.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::coords::BlockPos;
use crate::error::{Error, Result};

/// Ray for raycasting operations.
///
/// The direction is used exactly as given. Distances along the ray are
/// measured in multiples of its length, so callers pass a unit vector when
/// distances should be world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Ray origin
    pub origin: DVec3,
    /// Ray direction
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray
    #[inline]
    pub const fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    /// Same ray with a unit-length direction
    #[inline]
    pub fn normalized(self) -> Self {
        Self {
            origin: self.origin,
            direction: self.direction.normalize_or_zero(),
        }
    }

    /// Get a point along the ray at parameter t
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Same ray with the origin moved by `offset`
    #[inline]
    pub fn translated(self, offset: DVec3) -> Self {
        Self {
            origin: self.origin + offset,
            direction: self.direction,
        }
    }

    /// Reject rays that cannot be traversed.
    pub fn validate(&self) -> Result<()> {
        if !self.origin.is_finite() {
            return Err(Error::InvalidRay(format!(
                "origin {} is not finite",
                self.origin
            )));
        }
        if !self.direction.is_finite() {
            return Err(Error::InvalidRay(format!(
                "direction {} is not finite",
                self.direction
            )));
        }
        if self.direction.length_squared() == 0.0 {
            return Err(Error::InvalidRay("direction has zero length".to_string()));
        }
        Ok(())
    }
}

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: DVec3,
    /// Maximum corner
    pub max: DVec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB, rejecting inverted or non-finite corners
    pub fn try_new(min: DVec3, max: DVec3) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(Error::InvalidBounds(format!(
                "corners {min} / {max} are not finite"
            )));
        }
        if min.cmpgt(max).any() {
            return Err(Error::InvalidBounds(format!("min {min} exceeds max {max}")));
        }
        Ok(Self { min, max })
    }

    /// Create an AABB centered at origin with given half-extents
    #[inline]
    pub fn from_half_extents(half_extents: DVec3) -> Self {
        Self {
            min: -half_extents,
            max: half_extents,
        }
    }

    /// Create an AABB for the unit cube occupied by a block
    #[inline]
    pub fn unit_cube(pos: BlockPos) -> Self {
        let min = pos.to_dvec3();
        Self {
            min,
            max: min + DVec3::ONE,
        }
    }

    /// Get the center of the AABB
    #[inline]
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB
    #[inline]
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Check if a point is inside the AABB
    #[inline]
    pub fn contains_point(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Check if this AABB contains another entirely
    #[inline]
    pub fn contains(&self, other: &Self) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    /// Check if this AABB intersects another
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Grow the box by `margin` on every face.
    #[inline]
    pub fn inflate(&self, margin: f64) -> Self {
        let delta = DVec3::splat(margin);
        Self {
            min: self.min - delta,
            max: self.max + delta,
        }
    }

    /// Same box moved by `offset`
    #[inline]
    pub fn translated(&self, offset: DVec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Squared distance from `point` to the nearest point of the box.
    ///
    /// Zero when the point is inside.
    #[inline]
    pub fn distance_squared_to_point(&self, point: DVec3) -> f64 {
        point.clamp(self.min, self.max).distance_squared(point)
    }

    /// Ray-AABB slab test, returns (t_near, t_far) or None if no intersection.
    ///
    /// `t_near` is clamped to zero, so a ray starting inside the box reports
    /// its own origin as the entry point. Axes with a zero direction component
    /// only hit when the origin already lies within that slab.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f64, f64)> {
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (min, max) = (self.min[axis], self.max[axis]);

            if direction == 0.0 {
                if origin < min || origin > max {
                    return None;
                }
                continue;
            }

            let inv = direction.recip();
            let t1 = (min - origin) * inv;
            let t2 = (max - origin) * inv;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }

        if t_near <= t_far && t_far >= 0.0 {
            Some((t_near.max(0.0), t_far))
        } else {
            None
        }
    }

    /// Entry point of `ray` into the box, if it hits.
    #[inline]
    pub fn ray_entry_point(&self, ray: &Ray) -> Option<DVec3> {
        self.intersect_ray(ray).map(|(t_near, _)| ray.at(t_near))
    }

    /// Merge two AABBs
    #[inline]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
