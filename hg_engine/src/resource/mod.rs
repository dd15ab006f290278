//! Resource management module
//!
//! Recycling storage for backend resources and asynchronous loading of
//! frontend resources (surfaces, shader sources).

mod cache;
mod loader;

pub use cache::{ResourceCache, Cached, BlockId};
pub use loader::{
    Data, ResourceAccessor, MemoryAccessor,
    ResourceLoader, StringLoader, SurfaceLoader,
    ResourceFuture, ResourcePromise, ResourceManager,
};
