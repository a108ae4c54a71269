//! Memoized tolerance-expanded entity volumes.

use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use parking_lot::RwLock;
use voxray_core::Aabb;

/// Bit-exact identity of a bounding box value.
///
/// `-0.0` and `0.0` compare equal as floats, so both map to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VolumeKey([u64; 6]);

impl VolumeKey {
    fn of(bounds: &Aabb) -> Self {
        let bits = |v: f64| (v + 0.0).to_bits();
        Self([
            bits(bounds.min.x),
            bits(bounds.min.y),
            bits(bounds.min.z),
            bits(bounds.max.x),
            bits(bounds.max.y),
            bits(bounds.max.z),
        ])
    }
}

/// Cache from bounding box value to its expanded volume.
///
/// Entities of the same kind share box dimensions, so a handful of entries
/// serve every entity in view. Entries are never evicted; call
/// [`clear`](Self::clear) if the set of box shapes churns.
///
/// Safe to share between threads.
#[derive(Debug)]
pub struct VolumeCache {
    margin: f64,
    volumes: RwLock<HashMap<VolumeKey, Aabb>>,
    expansions: AtomicU64,
}

impl VolumeCache {
    /// Create an empty cache that inflates boxes by `margin` on every face.
    pub fn new(margin: f64) -> Self {
        Self {
            margin,
            volumes: RwLock::new(HashMap::new()),
            expansions: AtomicU64::new(0),
        }
    }

    /// Margin added to every face.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Expanded volume for `bounds`, computed on first request.
    pub fn expanded(&self, bounds: &Aabb) -> Aabb {
        let key = VolumeKey::of(bounds);
        let cached = self.volumes.read().get(&key).copied();
        if let Some(volume) = cached {
            return volume;
        }

        let mut volumes = self.volumes.write();
        *volumes.entry(key).or_insert_with(|| {
            self.expansions.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(?bounds, margin = self.margin, "expanded volume cached");
            bounds.inflate(self.margin)
        })
    }

    /// Number of expanded volumes computed so far.
    pub fn expansions(&self) -> u64 {
        self.expansions.load(Ordering::Relaxed)
    }

    /// Number of cached volumes.
    pub fn len(&self) -> usize {
        self.volumes.read().len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.volumes.read().is_empty()
    }

    /// Drop every cached volume.
    pub fn clear(&self) {
        self.volumes.write().clear();
    }
}
