/// Tests for ResourceCache / Cached

use super::*;
use std::sync::atomic::AtomicUsize;

/// Resource counting constructions and destructions
struct Counted {
    value: u32,
    drops: Arc<AtomicUsize>,
}

impl Counted {
    fn new(value: u32, constructions: &AtomicUsize, drops: &Arc<AtomicUsize>) -> Self {
        constructions.fetch_add(1, Ordering::SeqCst);
        Self { value, drops: drops.clone() }
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Tests: allocation and recycling
// ============================================================================

#[test]
fn test_create_checks_out_block() {
    let cache = ResourceCache::new();
    let handle = cache.create(42u64);

    assert_eq!(*handle, 42);
    assert_eq!(handle.cache_id(), cache.id());
    assert_eq!(cache.used_count::<u64>(), 1);
    assert_eq!(cache.available_count::<u64>(), 0);
    assert_eq!(cache.used_blocks::<u64>(), vec![handle.block_id()]);
}

#[test]
fn test_round_trip_reuses_same_block() {
    let cache = ResourceCache::new();
    let constructions = AtomicUsize::new(0);
    let drops = Arc::new(AtomicUsize::new(0));

    let first = cache.create(Counted::new(1, &constructions, &drops));
    let block = first.block_id();
    let address = first.as_ptr() as usize;
    drop(first);

    assert_eq!(drops.load(Ordering::SeqCst), 1);
    assert_eq!(cache.used_count::<Counted>(), 0);
    assert_eq!(cache.available_count::<Counted>(), 1);

    let second = cache.create(Counted::new(2, &constructions, &drops));
    assert_eq!(second.block_id(), block);
    assert_eq!(second.as_ptr() as usize, address);
    assert_eq!(second.value, 2);
    assert_eq!(cache.available_count::<Counted>(), 0);
    // Only the two explicit constructions happened
    assert_eq!(constructions.load(Ordering::SeqCst), 2);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_free_list_does_not_grow_on_repeated_cycles() {
    let cache = ResourceCache::new();
    for i in 0..16u32 {
        let handle = cache.create(i);
        assert_eq!(*handle, i);
    }
    assert_eq!(cache.available_count::<u32>(), 1);
    assert_eq!(cache.used_count::<u32>(), 0);
}

#[test]
fn test_pools_are_per_type() {
    let cache = ResourceCache::new();
    let a = cache.create(1u32);
    let b = cache.create(String::from("shader"));

    assert_eq!(cache.used_count::<u32>(), 1);
    assert_eq!(cache.used_count::<String>(), 1);
    assert_ne!(a.block_id(), b.block_id());

    drop(a);
    assert_eq!(cache.available_count::<u32>(), 1);
    assert_eq!(cache.available_count::<String>(), 0);
}

#[test]
fn test_deref_mut_modifies_value() {
    let cache = ResourceCache::new();
    let mut handle = cache.create(vec![1u8]);
    handle.push(2);
    assert_eq!(handle.as_slice(), &[1, 2]);
}

#[test]
fn test_trim_frees_available_blocks() {
    let cache = ResourceCache::new();
    drop(cache.create(3u16));
    assert_eq!(cache.available_count::<u16>(), 1);
    cache.trim::<u16>();
    assert_eq!(cache.available_count::<u16>(), 0);
}

// ============================================================================
// Tests: release
// ============================================================================

#[test]
fn test_release_into_owner_cache() {
    let cache = ResourceCache::new();
    let handle = cache.create(5i32);
    assert!(cache.release(handle).is_ok());
    assert_eq!(cache.used_count::<i32>(), 0);
    assert_eq!(cache.available_count::<i32>(), 1);
}

#[test]
fn test_release_into_foreign_cache_fails() {
    let owner = ResourceCache::new();
    let foreign = ResourceCache::new();
    let handle = owner.create(5i32);

    let result = foreign.release(handle);
    assert_eq!(result, Err(Error::ForeignCacheRelease { type_name: "i32" }));

    // Foreign cache untouched, the block went back to its real owner
    assert_eq!(foreign.available_count::<i32>(), 0);
    assert_eq!(owner.used_count::<i32>(), 0);
    assert_eq!(owner.available_count::<i32>(), 1);
}

// ============================================================================
// Tests: cache lifetime
// ============================================================================

#[test]
fn test_handle_outlives_cache() {
    let drops = Arc::new(AtomicUsize::new(0));
    let constructions = AtomicUsize::new(0);
    let cache = ResourceCache::new();
    let handle = cache.create(Counted::new(9, &constructions, &drops));
    drop(cache);

    assert_eq!(handle.value, 9);
    drop(handle);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cache_ids_are_unique() {
    let a = ResourceCache::new();
    let b = ResourceCache::new();
    assert_ne!(a.id(), b.id());
}
