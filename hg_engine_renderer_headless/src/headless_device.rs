/// HeadlessDevice - CPU-side stand-in for a graphics device
///
/// Every object a real backend would allocate on the GPU (buffers, images,
/// programs, framebuffers) is a record stored here under an `ObjectHandle`.
/// Records live in a `ResourceCache`, so destroying an object and creating
/// another of the same kind reuses the storage block.
///
/// The device is shared as `SharedDevice` between the processors, the mesh
/// renderer and the backend. Handles are owned through `DeviceObject`, which
/// destroys its record when dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use glam::UVec2;
use hg_engine::hg::{Error, Result};
use hg_engine::hg::log::LogScope;
use hg_engine::hg::render::{RenderData, SpecificData, TextureParameters};
use hg_engine::hg::resource::{Cached, ResourceCache};
use rustc_hash::FxHashMap;
use crate::headless_handle_allocator::{HandleAllocator, ObjectHandle};

pub type SharedDevice = Arc<Mutex<HeadlessDevice>>;

/// Lock the shared device, ignoring poisoning
pub fn lock_device(device: &SharedDevice) -> MutexGuard<'_, HeadlessDevice> {
    device.lock().unwrap_or_else(PoisonError::into_inner)
}

// ===== RECORDS =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    Vertex,
    Index,
}

/// State of one device object
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectRecord {
    Buffer {
        usage: BufferUsage,
        bytes: Vec<u8>,
    },
    Image {
        size: UVec2,
        layers: u32,
        parameters: TextureParameters,
        /// Bytes uploaded so far (zero for storage-only images)
        uploaded: usize,
    },
    Program {
        name: String,
        source_len: usize,
    },
    Framebuffer {
        size: UVec2,
        attachments: Vec<(u32, ObjectHandle)>,
    },
}

impl ObjectRecord {
    fn kind(&self) -> &'static str {
        match self {
            ObjectRecord::Buffer { .. } => "buffer",
            ObjectRecord::Image { .. } => "image",
            ObjectRecord::Program { .. } => "program",
            ObjectRecord::Framebuffer { .. } => "framebuffer",
        }
    }

    fn byte_size(&self) -> usize {
        match self {
            ObjectRecord::Buffer { bytes, .. } => bytes.len(),
            ObjectRecord::Image { uploaded, .. } => *uploaded,
            _ => 0,
        }
    }
}

// ===== STATS =====

/// Counters describing device activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    pub objects_created: u64,
    pub objects_destroyed: u64,
    /// Records updated in place (handle kept)
    pub objects_updated: u64,
    pub bytes_uploaded: u64,
    pub frames: u64,
    pub draw_calls: u64,
    pub gizmo_lines: u64,
}

impl DeviceStats {
    pub fn live_objects(&self) -> u64 {
        self.objects_created - self.objects_destroyed
    }
}

// ===== DEVICE =====

pub struct HeadlessDevice {
    scope: LogScope,
    handles: HandleAllocator,
    cache: ResourceCache,
    objects: FxHashMap<ObjectHandle, Cached<ObjectRecord>>,
    stats: DeviceStats,
    initialized: bool,
    validation: bool,
    bound_framebuffer: Option<ObjectHandle>,
}

impl HeadlessDevice {
    pub fn new(validation: bool) -> Self {
        Self {
            scope: LogScope::new("hg::headless::Device"),
            handles: HandleAllocator::new(),
            cache: ResourceCache::new(),
            objects: FxHashMap::default(),
            stats: DeviceStats::default(),
            initialized: false,
            validation,
            bound_framebuffer: None,
        }
    }

    /// New device wrapped for sharing
    pub fn shared(validation: bool) -> SharedDevice {
        Arc::new(Mutex::new(Self::new(validation)))
    }

    pub fn scope(&self) -> &LogScope {
        &self.scope
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn set_initialized(&mut self, initialized: bool) {
        self.initialized = initialized;
    }

    pub fn create(&mut self, record: ObjectRecord) -> ObjectHandle {
        let handle = self.handles.alloc();
        self.stats.objects_created += 1;
        self.stats.bytes_uploaded += record.byte_size() as u64;
        if self.validation {
            hg_engine::engine_trace!(self.scope, "Created {} {}", record.kind(), handle);
        }
        self.objects.insert(handle, self.cache.create(record));
        handle
    }

    /// Replace the record of a live object, keeping its handle
    pub fn update(&mut self, handle: ObjectHandle, record: ObjectRecord) -> Result<()> {
        let Some(slot) = self.objects.get_mut(&handle) else {
            return Err(Error::InvalidResource(format!("Update of unknown object {}", handle)));
        };
        self.stats.objects_updated += 1;
        self.stats.bytes_uploaded += record.byte_size() as u64;
        **slot = record;
        Ok(())
    }

    /// Destroy a live object; false (and an error log with validation) if unknown
    pub fn destroy(&mut self, handle: ObjectHandle) -> bool {
        let Some(record) = self.objects.remove(&handle) else {
            if self.validation {
                hg_engine::engine_error!(self.scope, "Destroy of unknown object {}", handle);
            }
            return false;
        };
        if self.validation {
            hg_engine::engine_trace!(self.scope, "Destroyed {} {}", record.kind(), handle);
        }
        drop(record);
        self.handles.free(handle);
        self.stats.objects_destroyed += 1;
        true
    }

    pub fn record(&self, handle: ObjectHandle) -> Option<&ObjectRecord> {
        self.objects.get(&handle).map(|record| &**record)
    }

    pub fn is_alive(&self, handle: ObjectHandle) -> bool {
        self.objects.contains_key(&handle)
    }

    pub fn live_objects(&self) -> usize {
        self.objects.len()
    }

    /// Live handles, sorted
    pub fn handles(&self) -> Vec<ObjectHandle> {
        let mut handles: Vec<ObjectHandle> = self.objects.keys().copied().collect();
        handles.sort();
        handles
    }

    /// Record storage blocks (in use, available for reuse)
    pub fn record_blocks(&self) -> (usize, usize) {
        (
            self.cache.used_count::<ObjectRecord>(),
            self.cache.available_count::<ObjectRecord>(),
        )
    }

    /// Framebuffer of the frame in flight (None = default framebuffer)
    pub fn bound_framebuffer(&self) -> Option<ObjectHandle> {
        self.bound_framebuffer
    }

    pub(crate) fn bind_framebuffer(&mut self, framebuffer: Option<ObjectHandle>) {
        self.bound_framebuffer = framebuffer;
    }

    pub fn stats(&self) -> DeviceStats {
        self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut DeviceStats {
        &mut self.stats
    }
}

impl std::fmt::Debug for HeadlessDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessDevice")
            .field("live_objects", &self.objects.len())
            .field("stats", &self.stats)
            .field("initialized", &self.initialized)
            .finish()
    }
}

// ===== DEVICE OBJECT =====

/// Owning reference to a device object; destroys it on drop
///
/// Holds the device weakly: objects outliving their device simply vanish.
pub struct DeviceObject {
    handle: ObjectHandle,
    device: Weak<Mutex<HeadlessDevice>>,
}

impl DeviceObject {
    /// Create a record on `device` and take ownership of it
    ///
    /// Must not be called while the device lock is held.
    pub fn create(device: &SharedDevice, record: ObjectRecord) -> Self {
        let handle = lock_device(device).create(record);
        Self {
            handle,
            device: Arc::downgrade(device),
        }
    }

    pub fn handle(&self) -> ObjectHandle {
        self.handle
    }

    /// Replace the record in place
    pub fn update(&self, record: ObjectRecord) -> Result<()> {
        let device = self.device
            .upgrade()
            .ok_or_else(|| Error::InvalidState(format!("Device of object {} is gone", self.handle)))?;
        let mut device = lock_device(&device);
        device.update(self.handle, record)
    }

    /// Snapshot of the current record
    pub fn record(&self) -> Option<ObjectRecord> {
        let device = self.device.upgrade()?;
        let device = lock_device(&device);
        device.record(self.handle).cloned()
    }
}

impl Drop for DeviceObject {
    fn drop(&mut self) {
        if let Some(device) = self.device.upgrade() {
            lock_device(&device).destroy(self.handle);
        }
    }
}

impl std::fmt::Debug for DeviceObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DeviceObject({})", self.handle)
    }
}

/// Detach the specific data of `render_data` and take it back by value
///
/// Succeeds only if it has type `T` and nothing else shares it, letting a
/// processor keep the handles of an invalidated realization. Anything else
/// attached is dropped.
pub(crate) fn reclaim_specific<T: SpecificData>(render_data: &RenderData) -> Option<T> {
    let previous = render_data.take_specific_data()?;
    let previous = previous.into_any_arc().downcast::<T>().ok()?;
    Arc::try_unwrap(previous).ok()
}

#[cfg(test)]
#[path = "headless_device_tests.rs"]
mod tests;
