//! Exact traversal of the voxel grid along a ray.
//!
//! Incremental stepping after Amanatides & Woo, "A Fast Voxel Traversal
//! Algorithm for Ray Tracing" (1987). Boundary distances are recomputed
//! from the origin at every step rather than accumulated, so long rays do
//! not drift off the grid.

use glam::{DVec3, I64Vec3};
use voxray_core::constants::CELL_SIZE;
use voxray_core::{BlockPos, Ray};

/// Largest coordinate magnitude, in cells, a traversal may reach.
///
/// Beyond 2^53 adjacent cell boundaries are no longer distinct `f64` values.
pub const MAX_COORDINATE: f64 = 9_007_199_254_740_992.0;

/// Returns true if every point of `ray` up to `max_distance` lies within
/// [`MAX_COORDINATE`] cells of the grid origin on each axis.
pub fn within_grid(ray: &Ray, max_distance: f64) -> bool {
    let reach = (ray.origin.abs() + ray.direction.abs() * max_distance.max(0.0)) / CELL_SIZE;
    reach.max_element() <= MAX_COORDINATE
}

/// One cell visited by a [`GridTraversal`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridStep {
    /// The cell entered.
    pub cell: BlockPos,
    /// Ray parameter at which the cell is entered; zero for the first cell.
    pub distance: f64,
}

/// Iterator over the unit cells a ray passes through, nearest first.
///
/// Every cell whose interior the ray crosses is reported exactly once, in
/// strictly increasing entry distance. Where the ray passes exactly through
/// an edge or corner, all crossing axes step together; cells that are only
/// touched at that edge or corner are not reported. A ray starting on a
/// cell boundary and pointing away from the cell begins in the neighbour it
/// moves into.
///
/// Iteration ends once the next cell's entry distance exceeds the maximum
/// distance, so the sequence is finite for any finite maximum. A ray that
/// would leave the range checked by [`within_grid`] yields no cells.
#[derive(Debug, Clone)]
pub struct GridTraversal {
    origin: DVec3,
    direction: DVec3,
    cell: I64Vec3,
    step: I64Vec3,
    /// Ray parameter of the next boundary crossing on each axis.
    t_max: DVec3,
    /// Entry distance of `cell`.
    entry: f64,
    max_distance: f64,
    finished: bool,
}

impl GridTraversal {
    /// Traverse `ray` up to `max_distance`, measured in multiples of the
    /// direction's length.
    pub fn new(ray: &Ray, max_distance: f64) -> Self {
        if !within_grid(ray, max_distance) {
            return Self::exhausted(max_distance);
        }

        let origin = ray.origin / CELL_SIZE;
        let direction = ray.direction / CELL_SIZE;
        let cell = origin.floor().as_i64vec3();
        let step = I64Vec3::new(
            signum(direction.x),
            signum(direction.y),
            signum(direction.z),
        );

        let mut traversal = Self {
            origin,
            direction,
            cell,
            step,
            t_max: DVec3::INFINITY,
            entry: 0.0,
            max_distance,
            finished: false,
        };
        for axis in 0..3 {
            traversal.t_max[axis] = traversal.boundary_distance(axis);
            // Sitting on a boundary while moving towards negative infinity:
            // the ray never enters the floored cell's interior.
            if traversal.t_max[axis] <= 0.0 {
                traversal.cell[axis] += traversal.step[axis];
                traversal.t_max[axis] = traversal.boundary_distance(axis);
            }
        }
        traversal
    }

    fn exhausted(max_distance: f64) -> Self {
        Self {
            origin: DVec3::ZERO,
            direction: DVec3::ZERO,
            cell: I64Vec3::ZERO,
            step: I64Vec3::ZERO,
            t_max: DVec3::INFINITY,
            entry: 0.0,
            max_distance,
            finished: true,
        }
    }

    /// Ray parameter at which the ray leaves `cell` along `axis`.
    fn boundary_distance(&self, axis: usize) -> f64 {
        let boundary = match self.step[axis] {
            1 => self.cell[axis] + 1,
            -1 => self.cell[axis],
            _ => return f64::INFINITY,
        };
        (boundary as f64 - self.origin[axis]) / self.direction[axis]
    }
}

fn signum(component: f64) -> i64 {
    if component > 0.0 {
        1
    } else if component < 0.0 {
        -1
    } else {
        0
    }
}

impl Iterator for GridTraversal {
    type Item = GridStep;

    fn next(&mut self) -> Option<GridStep> {
        // Written so a NaN distance also terminates.
        if self.finished || !(self.entry <= self.max_distance) {
            self.finished = true;
            return None;
        }

        let current = GridStep {
            cell: BlockPos::from(self.cell),
            distance: self.entry,
        };

        let next_entry = self.t_max.min_element();
        if next_entry.is_finite() {
            for axis in 0..3 {
                if self.t_max[axis] == next_entry {
                    self.cell[axis] += self.step[axis];
                    self.t_max[axis] = self.boundary_distance(axis);
                }
            }
            self.entry = next_entry;
        } else {
            self.finished = true;
        }

        Some(current)
    }
}

impl std::iter::FusedIterator for GridTraversal {}
