/// Behaviours attached to game objects.
///
/// A behaviour declares its capability once, when it is wrapped into a
/// `Behaviour`: logic behaviours are started and updated by the scene,
/// render behaviours carry render data and are drawn by the pipeline.

use std::any::Any;
use crate::render::Renderable;
use super::game_object::{GameObject, GameObjectKey};
use super::transform::Transform;

slotmap::new_key_type! {
    /// Key of a logic behaviour within its game object
    pub struct LogicBehaviourKey;
    /// Key of a render behaviour within its game object
    pub struct RenderBehaviourKey;
}

// ===== LOGIC =====

/// Per-frame game logic
pub trait LogicBehaviour: Send {
    /// Called once, after the merge promoting the behaviour and before its first update
    fn start(&mut self, _ctx: &mut UpdateContext<'_>) {}

    fn update(&mut self, ctx: &mut UpdateContext<'_>);

    fn is_enabled(&self) -> bool {
        true
    }
}

// ===== RENDER =====

/// `&dyn Renderable` view of a render behaviour
pub trait AsRenderable {
    fn as_renderable(&self) -> &dyn Renderable;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Renderable> AsRenderable for T {
    fn as_renderable(&self) -> &dyn Renderable {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour drawn by the pipeline renderer registered for its data type
pub trait RenderBehaviour: Renderable + AsRenderable {
    fn is_enabled(&self) -> bool {
        true
    }

    /// Translucent behaviours are drawn after opaque ones, far to near
    fn is_translucent(&self) -> bool {
        false
    }

    /// Visit render data that must be set up before this behaviour is drawn
    fn visit_dependencies(&self, _visitor: &mut dyn FnMut(&dyn Renderable)) {}
}

// ===== CAPABILITY =====

/// Behaviour tagged with its capability
pub enum Behaviour {
    Logic(Box<dyn LogicBehaviour>),
    Render(Box<dyn RenderBehaviour>),
}

impl Behaviour {
    pub fn logic(behaviour: impl LogicBehaviour + 'static) -> Self {
        Behaviour::Logic(Box::new(behaviour))
    }

    pub fn render(behaviour: impl RenderBehaviour + 'static) -> Self {
        Behaviour::Render(Box::new(behaviour))
    }

    pub fn is_render(&self) -> bool {
        matches!(self, Behaviour::Render(_))
    }
}

/// Key of a behaviour within its game object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviourId {
    Logic(LogicBehaviourKey),
    Render(RenderBehaviourKey),
}

// ===== UPDATE CONTEXT =====

/// Structural change requested by a behaviour during update
pub enum SceneCommand {
    Spawn(GameObject),
    Despawn(GameObjectKey),
}

/// Queue of structural changes, applied by the scene between game objects
#[derive(Default)]
pub struct SceneCommands {
    commands: Vec<SceneCommand>,
}

impl SceneCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a game object; it is updated from the next frame on
    pub fn spawn(&mut self, object: GameObject) {
        self.commands.push(SceneCommand::Spawn(object));
    }

    /// Remove a game object; it is skipped for the rest of the frame
    pub fn despawn(&mut self, key: GameObjectKey) {
        self.commands.push(SceneCommand::Despawn(key));
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, SceneCommand> {
        self.commands.drain(..)
    }
}

/// What a logic behaviour can touch during `start`/`update`
pub struct UpdateContext<'a> {
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Game object owning the behaviour
    pub object: GameObjectKey,
    pub transform: &'a mut Transform,
    pub commands: &'a mut SceneCommands,
}
