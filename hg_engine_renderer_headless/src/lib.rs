/*!
# HG Engine - Headless Renderer Backend

CPU-only backend for the HG engine, used by tests and tools that need the
full render-data lifecycle without a GPU.

A `HeadlessDevice` stands in for the graphics device: buffers, images,
programs and framebuffers are records addressed by GL-style handles. One
processor per built-in data type realizes frontend render data into those
records, and `ForwardMeshRenderer` records every draw into a `DrawLog`.
*/

mod headless_handle_allocator;
mod headless_device;
mod headless_mesh;
mod headless_texture;
mod headless_shader;
mod headless_render_target;
mod headless_cube_map;
mod headless_forward_renderer;
mod headless_backend;
mod headless_pipeline;
mod debug;

pub use headless_handle_allocator::{HandleAllocator, ObjectHandle};
pub use headless_device::{
    lock_device, BufferUsage, DeviceObject, DeviceStats, HeadlessDevice, ObjectRecord, SharedDevice,
};
pub use headless_mesh::{MeshProcessor, MeshSpecific};
pub use headless_texture::{TextureProcessor, TextureSpecific};
pub use headless_shader::{ShaderProcessor, ShaderSpecific};
pub use headless_render_target::{RenderTargetProcessor, RenderTargetSpecific};
pub use headless_cube_map::{CubeMapProcessor, CubeMapSpecific};
pub use headless_forward_renderer::{DrawCall, DrawLog, ForwardMeshRenderer};
pub use headless_backend::HeadlessBackend;
pub use headless_pipeline::{create_forward_pipeline, HeadlessPipeline};

// Re-export debug utilities
pub use debug::{device_stats_report, print_device_stats_report};
