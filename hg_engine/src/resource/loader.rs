/// Asynchronous resource loading.
///
/// Raw bytes come from a `ResourceAccessor` (filesystem, archive, memory),
/// are decoded by a `ResourceLoader` on one of the manager's worker threads
/// and handed back to the render thread as a `ResourceFuture`. The render
/// thread either polls (`get`) or blocks (`guarantee_get`) at well-defined
/// points.
///
/// A load that fails is logged on the worker and the future never becomes
/// ready: `get()` keeps returning None and `guarantee_get()` returns None.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use std::thread::JoinHandle;
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::render::texture::Surface;

// ===== RAW DATA =====

/// Raw resource bytes with the id they were loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Data {
    pub id: String,
    pub bytes: Vec<u8>,
}

/// Source of raw resource bytes
pub trait ResourceAccessor: Send + Sync {
    fn load_raw(&self, id: &str) -> Result<Data>;
}

/// In-memory accessor (tools, tests, embedded assets)
#[derive(Default)]
pub struct MemoryAccessor {
    entries: RwLock<FxHashMap<String, Vec<u8>>>,
}

impl MemoryAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, bytes: Vec<u8>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), bytes);
    }
}

impl ResourceAccessor for MemoryAccessor {
    fn load_raw(&self, id: &str) -> Result<Data> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(id)
            .map(|bytes| Data { id: id.to_string(), bytes: bytes.clone() })
            .ok_or_else(|| Error::InvalidResource(format!("Resource '{}' not found", id)))
    }
}

// ===== LOADERS =====

/// Decoder turning raw bytes into a resource
pub trait ResourceLoader: Send + 'static {
    type Output: Send + Sync + 'static;

    fn load(&self, data: Data) -> Result<Self::Output>;
}

/// UTF-8 text (shader sources)
pub struct StringLoader;

impl ResourceLoader for StringLoader {
    type Output = String;

    fn load(&self, data: Data) -> Result<String> {
        String::from_utf8(data.bytes)
            .map_err(|e| Error::InvalidResource(format!("'{}' is not UTF-8: {}", data.id, e)))
    }
}

/// Raw RGBA8 surface: little-endian u32 width, u32 height, then pixels
pub struct SurfaceLoader;

impl ResourceLoader for SurfaceLoader {
    type Output = Surface;

    fn load(&self, data: Data) -> Result<Surface> {
        if data.bytes.len() < 8 {
            return Err(Error::InvalidResource(format!("'{}' has no surface header", data.id)));
        }
        let width = u32::from_le_bytes([data.bytes[0], data.bytes[1], data.bytes[2], data.bytes[3]]);
        let height = u32::from_le_bytes([data.bytes[4], data.bytes[5], data.bytes[6], data.bytes[7]]);
        Surface::from_rgba8(width, height, data.bytes[8..].to_vec())
    }
}

// ===== FUTURE =====

/// State shared by a future, its clones and its promise
///
/// The value is written once. The `done` channel never carries a message:
/// it disconnects when the promise is consumed or dropped, which wakes every
/// blocked waiter.
struct Shared<T> {
    value: OnceLock<Arc<T>>,
    done: Receiver<()>,
}

/// Handle to a resource being loaded on a worker thread
pub struct ResourceFuture<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ResourceFuture<T> {
    fn clone(&self) -> Self {
        Self { shared: self.shared.clone() }
    }
}

impl<T> ResourceFuture<T> {
    /// Already resolved future
    pub fn ready(value: T) -> Self {
        let (future, promise) = Self::pending();
        promise.fulfill(value);
        future
    }

    /// Unresolved future and the promise that resolves it
    pub fn pending() -> (Self, ResourcePromise<T>) {
        let (signal, done) = crossbeam_channel::bounded(0);
        let shared = Arc::new(Shared { value: OnceLock::new(), done });
        (Self { shared: shared.clone() }, ResourcePromise { shared, _signal: signal })
    }

    /// Non-blocking: the value if already loaded
    pub fn get(&self) -> Option<Arc<T>> {
        self.shared.value.get().cloned()
    }

    /// Blocking: wait until the load finished
    ///
    /// Returns None if the load failed.
    pub fn guarantee_get(&self) -> Option<Arc<T>> {
        if let Some(value) = self.shared.value.get() {
            return Some(value.clone());
        }
        // Only ever returns once the promise is gone
        let _ = self.shared.done.recv();
        self.get()
    }

    /// `get()` or `guarantee_get()` depending on `guarantee`
    pub fn get_with(&self, guarantee: bool) -> Option<Arc<T>> {
        if guarantee {
            self.guarantee_get()
        } else {
            self.get()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.shared.value.get().is_some()
    }

    pub fn is_failed(&self) -> bool {
        !self.is_ready() && matches!(self.shared.done.try_recv(), Err(TryRecvError::Disconnected))
    }
}

/// Write side of a `ResourceFuture`
///
/// Dropping an unfulfilled promise fails the future so blocked waiters wake up.
pub struct ResourcePromise<T> {
    shared: Arc<Shared<T>>,
    _signal: Sender<()>,
}

impl<T> ResourcePromise<T> {
    pub fn fulfill(self, value: T) {
        let _ = self.shared.value.set(Arc::new(value));
    }

    pub fn fail(self) {}
}

// ===== MANAGER =====

type Job = Box<dyn FnOnce() + Send>;

/// Worker threads used when none are requested explicitly
fn default_worker_count() -> usize {
    std::thread::available_parallelism().map_or(2, |count| count.get().clamp(1, 4))
}

/// Loads resources through an accessor on a fixed pool of worker threads
///
/// Loads are queued on a channel and picked up by the first idle worker, so
/// any number of pending loads runs on at most `worker_count()` threads.
/// Dropping the manager finishes the queued loads and joins the workers.
pub struct ResourceManager {
    accessor: Arc<dyn ResourceAccessor>,
    jobs: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl ResourceManager {
    pub fn new(accessor: Arc<dyn ResourceAccessor>) -> Self {
        Self::with_workers(accessor, default_worker_count())
    }

    /// Manager with exactly `count` worker threads (at least one)
    pub fn with_workers(accessor: Arc<dyn ResourceAccessor>, count: usize) -> Self {
        let (jobs, queue) = crossbeam_channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(count.max(1));
        for index in 0..count.max(1) {
            let queue = queue.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("hg-loader-{}", index))
                .spawn(move || {
                    while let Ok(job) = queue.recv() {
                        job();
                    }
                });
            match spawned {
                Ok(worker) => workers.push(worker),
                Err(err) => {
                    crate::engine_error!("hg::ResourceManager", "Cannot spawn loader thread {}: {}", index, err);
                }
            }
        }
        crate::engine_debug!("hg::ResourceManager", "{} loader threads started", workers.len());
        Self { accessor, jobs: Some(jobs), workers }
    }

    /// Worker threads actually running
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Load and decode `id` on the calling thread
    pub fn load_sync<L: ResourceLoader>(&self, id: &str, loader: L) -> Result<L::Output> {
        let data = self.accessor.load_raw(id)?;
        loader.load(data)
    }

    /// Queue the load and decode of `id` on the worker pool
    pub fn load<L: ResourceLoader>(&self, id: &str, loader: L) -> ResourceFuture<L::Output> {
        let (future, promise) = ResourceFuture::pending();
        let accessor = self.accessor.clone();
        let id_owned = id.to_string();

        let job: Job = Box::new(move || {
            match accessor.load_raw(&id_owned).and_then(|data| loader.load(data)) {
                Ok(value) => promise.fulfill(value),
                Err(err) => {
                    crate::engine_error!("hg::ResourceManager", "Failed to load '{}': {}", id_owned, err);
                    promise.fail();
                }
            }
        });

        // A rejected job drops its promise, failing the future
        let queued = self.jobs.as_ref().is_some_and(|jobs| jobs.send(job).is_ok());
        if !queued || self.workers.is_empty() {
            crate::engine_error!("hg::ResourceManager", "No loader thread available for '{}'", id);
        }
        future
    }
}

impl Drop for ResourceManager {
    fn drop(&mut self) {
        // Closing the queue stops the workers once it is drained
        self.jobs.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
