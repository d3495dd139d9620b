use std::collections::HashMap;

use crate::foundation::core::FrameIndex;
use crate::render::surface::FrameSnapshot;

/// Counters describing frame cache traffic since the last [`FrameCache::clear`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameCacheStats {
    /// Lookups that found a snapshot.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Snapshots stored.
    pub inserts: u64,
}

/// Rasterized frames keyed by exact frame index.
///
/// Unbounded: grows by at most one entry per distinct frame of the loaded animation.
#[derive(Debug, Default)]
pub struct FrameCache {
    frames: HashMap<FrameIndex, FrameSnapshot>,
    stats: FrameCacheStats,
}

impl FrameCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a snapshot, counting the hit or miss.
    pub fn get(&mut self, frame: FrameIndex) -> Option<&FrameSnapshot> {
        match self.frames.get(&frame) {
            Some(snap) => {
                self.stats.hits += 1;
                Some(snap)
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Store a snapshot. An existing entry for `frame` is kept.
    ///
    /// Returns `true` if the snapshot was stored.
    pub fn put(&mut self, frame: FrameIndex, snapshot: FrameSnapshot) -> bool {
        if self.frames.contains_key(&frame) {
            return false;
        }
        self.frames.insert(frame, snapshot);
        self.stats.inserts += 1;
        true
    }

    /// Return `true` if `frame` has a snapshot. Does not touch the counters.
    pub fn contains(&self, frame: FrameIndex) -> bool {
        self.frames.contains_key(&frame)
    }

    /// Number of cached frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Approximate bytes held by cached pixels.
    pub fn retained_bytes(&self) -> usize {
        self.frames.values().map(|s| s.data().len()).sum()
    }

    /// Counters since the last clear.
    pub fn stats(&self) -> FrameCacheStats {
        self.stats
    }

    /// Drop every snapshot and reset the counters.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.stats = FrameCacheStats::default();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame_cache.rs"]
mod tests;
