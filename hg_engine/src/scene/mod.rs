//! Scene module
//!
//! Game objects, their logic and render behaviours, the double-buffered
//! containers that hold them, and the per-scene lighting context.

pub mod double_buffer;
pub mod behaviour;
pub mod game_object;
pub mod mesh_renderer;
pub mod transform;
pub mod lighting;
#[allow(clippy::module_inception)]
pub mod scene;

pub use double_buffer::{DoubleBufferContainer, Iteration, MemberState, Merged};
pub use behaviour::{
    AsRenderable, Behaviour, BehaviourId, LogicBehaviour, LogicBehaviourKey,
    RenderBehaviour, RenderBehaviourKey, SceneCommand, SceneCommands, UpdateContext,
};
pub use game_object::{GameObject, GameObjectKey};
pub use mesh_renderer::MeshRenderer;
pub use transform::Transform;
pub use lighting::{Light, LightKey, LightKind, LightingContext};
pub use scene::Scene;
