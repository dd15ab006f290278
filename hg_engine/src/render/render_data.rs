/// Render data and backend-specific data.
///
/// A `RenderData` is the frontend description of something renderable,
/// tagged with an immutable `DataType`. Backends realize it lazily by
/// attaching a `SpecificData` (buffer handles, texture names, compiled
/// programs...). A missing specific data is the normal "not yet realized"
/// state, not an error.
///
/// The specific-data slot is behind a lock so that shared resources (pooled
/// shaders, textures referenced by several materials) can be realized
/// through a shared reference.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use super::data_type::DataType;

// ===== SPECIFIC DATA =====

/// Type-erasure helpers for `SpecificData`, implemented for every sized type
pub trait SpecificAny: Any + Send + Sync {
    fn as_specific_any(&self) -> &dyn Any;
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> SpecificAny for T {
    fn as_specific_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Backend-owned state attached to a `RenderData`
///
/// Each backend processor defines its own concrete shape. The only state the
/// frontend sees is the validity flag: an invalidated specific data keeps its
/// handles allocated but must be set up again before use.
pub trait SpecificData: SpecificAny {
    /// False once `invalidate()` was called
    fn is_valid(&self) -> bool;

    /// Mark as stale without releasing anything
    fn invalidate(&self);
}

/// Validity flag embedded by backend specific data
#[derive(Debug)]
pub struct Validity(AtomicBool);

impl Validity {
    /// A freshly set-up (valid) flag
    pub fn new() -> Self {
        Self(AtomicBool::new(true))
    }

    pub fn is_valid(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn invalidate(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Validity {
    fn default() -> Self {
        Self::new()
    }
}

// ===== RENDER DATA =====

/// Frontend render data: immutable type tag + optional backend state
pub struct RenderData {
    data_type: DataType,
    specific: Mutex<Option<Arc<dyn SpecificData>>>,
}

impl RenderData {
    /// Create unrealized render data of the given kind
    pub fn new(data_type: DataType) -> Self {
        Self {
            data_type,
            specific: Mutex::new(None),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<dyn SpecificData>>> {
        self.specific.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tag used by every dispatch table
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Currently attached backend state, if any
    pub fn specific_data(&self) -> Option<Arc<dyn SpecificData>> {
        self.slot().clone()
    }

    /// Attached backend state downcast to the backend's concrete type
    ///
    /// Returns None if nothing is attached or the attached data has another type.
    pub fn specific_data_as<T: SpecificData>(&self) -> Option<Arc<T>> {
        let data = self.slot().clone()?;
        data.into_any_arc().downcast::<T>().ok()
    }

    /// Attach backend state, dropping the previously attached one
    pub fn set_specific_data(&self, data: Arc<dyn SpecificData>) {
        *self.slot() = Some(data);
    }

    /// Detach and return the backend state
    pub fn take_specific_data(&self) -> Option<Arc<dyn SpecificData>> {
        self.slot().take()
    }

    /// Drop the backend state
    pub fn clear_specific_data(&self) {
        self.slot().take();
    }

    /// Mark the attached backend state as stale (no-op if none attached)
    pub fn invalidate(&self) {
        if let Some(data) = self.slot().as_ref() {
            data.invalidate();
        }
    }

    /// True if backend state is attached and still valid
    pub fn is_realized(&self) -> bool {
        self.slot().as_ref().is_some_and(|data| data.is_valid())
    }
}

impl std::fmt::Debug for RenderData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderData")
            .field("data_type", &self.data_type)
            .field("realized", &self.is_realized())
            .finish()
    }
}

// ===== RENDERABLE =====

/// Anything carrying a `RenderData` that processors can realize
///
/// Processors receive `&dyn Renderable` and downcast through `as_any()` to
/// the concrete frontend type they target.
pub trait Renderable: Any + Send + Sync {
    fn render_data(&self) -> &RenderData;

    fn as_any(&self) -> &dyn Any;

    fn data_type(&self) -> DataType {
        self.render_data().data_type()
    }
}

impl Renderable for RenderData {
    fn render_data(&self) -> &RenderData {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "render_data_tests.rs"]
mod tests;
