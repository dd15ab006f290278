//! Render module
//!
//! Frontend render data (meshes, textures, shaders, render targets, cube
//! maps), materials, and the processor/renderer dispatch of the pipeline.

pub mod data_type;
pub mod render_data;
pub mod mesh;
pub mod texture;
pub mod shader;
pub mod render_target;
pub mod cube_map;
pub mod processor;
pub mod material;
pub mod material_collection;
pub mod camera;
pub mod gizmos;
pub mod pipeline;
pub mod renderer;

#[cfg(test)]
pub(crate) mod mock_pipeline;

pub use data_type::DataType;
pub use render_data::{RenderData, Renderable, SpecificAny, SpecificData, Validity};
pub use mesh::{MeshData, Vertex};
pub use texture::{Filtering, Surface, Texture, TextureParameters, Wrapping};
pub use shader::Shader;
pub use render_target::RenderTarget;
pub use cube_map::{CubeMap, CubeSide, CubeSides};
pub use processor::{downcast_renderable, RenderDataProcessor};
pub use material::{Material, MaterialKind, MaterialValue, MaterialValueKind, ShaderSource};
pub use material_collection::MaterialCollection;
pub use camera::{Camera, Rect};
pub use gizmos::{GizmoLine, Gizmos};
pub use pipeline::{
    BehaviourRenderer, DrawContext, FrameContext, FrameStats, FrameTarget,
    PipelineBackend, PipelineBuilder, PipelineState, RenderingPipeline,
};
pub use renderer::{Config, Renderer};
