/// Object handle allocation for the headless device.
///
/// Handles behave like GL object names: never zero, unique among live
/// objects, and recycled once freed (most recently freed first).

use std::fmt;
use std::num::NonZeroU32;

/// Name of a device object
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(NonZeroU32);

impl ObjectHandle {
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct HandleAllocator {
    free_list: Vec<NonZeroU32>,
    next: NonZeroU32,
    len: u32,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self {
            free_list: Vec::new(),
            next: NonZeroU32::MIN,
            len: 0,
        }
    }

    /// Allocate a handle, recycling freed ones first
    pub fn alloc(&mut self) -> ObjectHandle {
        self.len += 1;
        let raw = self.free_list.pop().unwrap_or_else(|| {
            let raw = self.next;
            self.next = self.next.saturating_add(1);
            raw
        });
        ObjectHandle(raw)
    }

    /// Return `handle` for reuse
    pub fn free(&mut self, handle: ObjectHandle) {
        debug_assert!(handle.0 < self.next, "freeing an unallocated handle: {}", handle);
        self.len -= 1;
        self.free_list.push(handle.0);
    }

    /// Number of handles ever allocated (live or recycled)
    pub fn high_water_mark(&self) -> u32 {
        self.next.get() - 1
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "headless_handle_allocator_tests.rs"]
mod tests;
