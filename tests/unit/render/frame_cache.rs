use super::*;
use crate::render::surface::Surface;

#[test]
fn get_counts_hits_and_misses() {
    let mut cache = FrameCache::new();
    assert!(cache.get(FrameIndex(3)).is_none());
    assert!(cache.put(FrameIndex(3), Surface::new(2, 2).snapshot()));
    assert!(cache.get(FrameIndex(3)).is_some());
    assert!(cache.get(FrameIndex(4)).is_none());

    let st = cache.stats();
    assert_eq!(st.hits, 1);
    assert_eq!(st.misses, 2);
    assert_eq!(st.inserts, 1);
}

#[test]
fn put_never_overwrites() {
    let mut cache = FrameCache::new();
    let mut first = Surface::new(1, 1);
    first.data_mut().copy_from_slice(&[1, 1, 1, 1]);
    assert!(cache.put(FrameIndex(0), first.snapshot()));
    assert!(!cache.put(FrameIndex(0), Surface::new(1, 1).snapshot()));
    assert_eq!(cache.get(FrameIndex(0)).unwrap().data(), &[1, 1, 1, 1]);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.retained_bytes(), 4);
}

#[test]
fn clear_resets_entries_and_stats() {
    let mut cache = FrameCache::new();
    cache.put(FrameIndex(1), Surface::new(1, 1).snapshot());
    let _ = cache.get(FrameIndex(1));
    cache.clear();
    assert!(cache.is_empty());
    assert!(!cache.contains(FrameIndex(1)));
    assert_eq!(cache.stats(), FrameCacheStats::default());
}
