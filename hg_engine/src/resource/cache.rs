/// Per-type free-list allocator for cacheable resources.
///
/// `ResourceCache::create` places a value into a storage block taken from the
/// free list of its type (or freshly allocated), and returns a `Cached<T>`
/// handle that knows which cache produced it. Dropping the handle runs `T`'s
/// destructor and puts the block back on the free list instead of returning
/// it to the allocator, so destroying one resource and creating another of
/// the same type reuses the same memory.
///
/// A cache is meant to be used from the thread that owns it (the render
/// thread). The internal lock only protects handles dropped elsewhere.
///
/// # Example
///
/// ```
/// use hg_engine::hg::resource::ResourceCache;
///
/// let cache = ResourceCache::new();
/// let first = cache.create(vec![1u8, 2, 3]);
/// let block = first.block_id();
/// drop(first);
///
/// let second = cache.create(vec![4u8]);
/// assert_eq!(second.block_id(), block);
/// ```

use std::any::{Any, TypeId};
use std::fmt;
use std::mem::{ManuallyDrop, MaybeUninit};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};

static NEXT_CACHE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a storage block within its cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u64);

type Block<T> = Box<MaybeUninit<T>>;

// ===== POOL =====

struct Pool<T> {
    used: FxHashSet<BlockId>,
    available: Vec<(BlockId, Block<T>)>,
}

impl<T> Pool<T> {
    fn new() -> Self {
        Self {
            used: FxHashSet::default(),
            available: Vec::new(),
        }
    }
}

struct CacheInner {
    pools: FxHashMap<TypeId, Box<dyn Any + Send>>,
    next_block: u64,
}

impl CacheInner {
    fn pool_mut<T: Send + 'static>(&mut self) -> &mut Pool<T> {
        let pool = self.pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Pool::<T>::new()));
        match pool.downcast_mut::<Pool<T>>() {
            Some(pool) => pool,
            None => unreachable!("pool keyed by TypeId holds another type"),
        }
    }

    fn pool<T: Send + 'static>(&self) -> Option<&Pool<T>> {
        self.pools.get(&TypeId::of::<T>())?.downcast_ref::<Pool<T>>()
    }
}

fn lock(inner: &Mutex<CacheInner>) -> MutexGuard<'_, CacheInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

// ===== CACHE =====

/// Recycling allocator for resource storage, one free list per type
pub struct ResourceCache {
    id: u64,
    inner: Arc<Mutex<CacheInner>>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self {
            id: NEXT_CACHE_ID.fetch_add(1, Ordering::Relaxed),
            inner: Arc::new(Mutex::new(CacheInner {
                pools: FxHashMap::default(),
                next_block: 0,
            })),
        }
    }

    /// Unique id of this cache instance
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Place `value` into a recycled (or new) block and return its handle
    pub fn create<T: Send + 'static>(&self, value: T) -> Cached<T> {
        let mut inner = lock(&self.inner);
        let recycled = inner.pool_mut::<T>().available.pop();
        let (block_id, mut block) = match recycled {
            Some(entry) => entry,
            None => {
                let id = BlockId(inner.next_block);
                inner.next_block += 1;
                (id, Box::new(MaybeUninit::uninit()))
            }
        };
        block.write(value);
        inner.pool_mut::<T>().used.insert(block_id);

        Cached {
            block: ManuallyDrop::new(block),
            block_id,
            cache_id: self.id,
            owner: Arc::downgrade(&self.inner),
        }
    }

    /// Explicitly return a handle to this cache
    ///
    /// # Errors
    ///
    /// `Error::ForeignCacheRelease` if the handle was produced by another
    /// cache. The handle is then returned to its own cache.
    pub fn release<T: Send + 'static>(&self, resource: Cached<T>) -> Result<()> {
        if resource.cache_id != self.id {
            let type_name = std::any::type_name::<T>();
            crate::engine_error!("hg::ResourceCache",
                "{} from cache {} released into cache {}", type_name, resource.cache_id, self.id);
            return Err(Error::ForeignCacheRelease { type_name });
        }
        drop(resource);
        Ok(())
    }

    /// Blocks of type `T` currently checked out, sorted
    pub fn used_blocks<T: Send + 'static>(&self) -> Vec<BlockId> {
        let inner = lock(&self.inner);
        let mut blocks: Vec<BlockId> = inner.pool::<T>()
            .map(|pool| pool.used.iter().copied().collect())
            .unwrap_or_default();
        blocks.sort();
        blocks
    }

    /// Number of live `T` handles produced by this cache
    pub fn used_count<T: Send + 'static>(&self) -> usize {
        lock(&self.inner).pool::<T>().map_or(0, |pool| pool.used.len())
    }

    /// Number of released `T` blocks waiting for reuse
    pub fn available_count<T: Send + 'static>(&self) -> usize {
        lock(&self.inner).pool::<T>().map_or(0, |pool| pool.available.len())
    }

    /// Free every released block of type `T`
    pub fn trim<T: Send + 'static>(&self) {
        let mut inner = lock(&self.inner);
        inner.pool_mut::<T>().available.clear();
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResourceCache {
    fn drop(&mut self) {
        // Available blocks are freed with the pools. Live handles keep their
        // block and free it themselves once the cache is gone.
        let inner = lock(&self.inner);
        if !inner.pools.is_empty() {
            crate::engine_trace!("hg::ResourceCache",
                "Destroying cache {} ({} resource types)", self.id, inner.pools.len());
        }
    }
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache").field("id", &self.id).finish()
    }
}

// ===== HANDLE =====

/// Owned handle to a value living in a cache block
pub struct Cached<T: Send + 'static> {
    block: ManuallyDrop<Block<T>>,
    block_id: BlockId,
    cache_id: u64,
    owner: Weak<Mutex<CacheInner>>,
}

impl<T: Send + 'static> Cached<T> {
    /// Storage block holding the value
    pub fn block_id(&self) -> BlockId {
        self.block_id
    }

    /// Id of the cache that produced this handle
    pub fn cache_id(&self) -> u64 {
        self.cache_id
    }

    /// Address of the value (stable for the block's lifetime)
    pub fn as_ptr(&self) -> *const T {
        self.block.as_ptr()
    }
}

impl<T: Send + 'static> Deref for Cached<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the block is initialized in `create` and only
        // de-initialized in `drop`.
        unsafe { self.block.assume_init_ref() }
    }
}

impl<T: Send + 'static> DerefMut for Cached<T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: see `deref`.
        unsafe { self.block.assume_init_mut() }
    }
}

impl<T: Send + 'static> Drop for Cached<T> {
    fn drop(&mut self) {
        // SAFETY: `block` is never used again after being taken here, and it
        // holds an initialized value until `assume_init_drop`.
        let mut block = unsafe { ManuallyDrop::take(&mut self.block) };
        unsafe { block.assume_init_drop() };

        let Some(owner) = self.owner.upgrade() else {
            // Cache already destroyed: the block is simply freed
            return;
        };
        let mut inner = lock(&owner);
        let pool = inner.pool_mut::<T>();
        if !pool.used.remove(&self.block_id) {
            crate::engine_error!("hg::ResourceCache",
                "Block {:?} of {} was never handed out by cache {}",
                self.block_id, std::any::type_name::<T>(), self.cache_id);
            panic!("resource cache bookkeeping corrupted for {}", std::any::type_name::<T>());
        }
        pool.available.push((self.block_id, block));
    }
}

impl<T: Send + fmt::Debug + 'static> fmt::Debug for Cached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cached")
            .field("block", &self.block_id)
            .field("cache", &self.cache_id)
            .field("value", &**self)
            .finish()
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
