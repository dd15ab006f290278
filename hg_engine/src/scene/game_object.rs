/// Game objects: a transform and two double-buffered behaviour sets.

use crate::render::Renderable;
use super::behaviour::{
    AsRenderable, Behaviour, BehaviourId, LogicBehaviour, LogicBehaviourKey,
    RenderBehaviour, RenderBehaviourKey, SceneCommands, UpdateContext,
};
use super::double_buffer::DoubleBufferContainer;
use super::transform::Transform;

slotmap::new_key_type! {
    /// Stable key of a game object within its scene
    pub struct GameObjectKey;
}

/// Scene node owning behaviours
pub struct GameObject {
    name: String,
    enabled: bool,
    transform: Transform,
    logic: DoubleBufferContainer<LogicBehaviourKey, Box<dyn LogicBehaviour>>,
    render: DoubleBufferContainer<RenderBehaviourKey, Box<dyn RenderBehaviour>>,
}

impl GameObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            transform: Transform::IDENTITY,
            logic: DoubleBufferContainer::new(),
            render: DoubleBufferContainer::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.add_behaviour(behaviour);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    // ===== BEHAVIOURS =====

    /// Stage a behaviour; it is started and iterated after the next update merge
    pub fn add_behaviour(&mut self, behaviour: Behaviour) -> BehaviourId {
        match behaviour {
            Behaviour::Logic(logic) => BehaviourId::Logic(self.logic.add(logic)),
            Behaviour::Render(render) => BehaviourId::Render(self.render.add(render)),
        }
    }

    pub fn remove_behaviour(&mut self, id: BehaviourId) -> Option<Behaviour> {
        match id {
            BehaviourId::Logic(key) => self.logic.remove(key).map(Behaviour::Logic),
            BehaviourId::Render(key) => self.render.remove(key).map(Behaviour::Render),
        }
    }

    pub fn is_removing(&self, id: BehaviourId) -> bool {
        match id {
            BehaviourId::Logic(key) => self.logic.is_removing(key),
            BehaviourId::Render(key) => self.render.is_removing(key),
        }
    }

    pub fn logic_behaviours(&self) -> &DoubleBufferContainer<LogicBehaviourKey, Box<dyn LogicBehaviour>> {
        &self.logic
    }

    pub fn render_behaviours(&self) -> &DoubleBufferContainer<RenderBehaviourKey, Box<dyn RenderBehaviour>> {
        &self.render
    }

    pub fn render_behaviour(&self, key: RenderBehaviourKey) -> Option<&dyn RenderBehaviour> {
        self.render.get(key).map(|behaviour| behaviour.as_ref())
    }

    /// Render behaviour downcast to its concrete type
    pub fn render_behaviour_as<T: RenderBehaviour>(&self, key: RenderBehaviourKey) -> Option<&T> {
        self.render_behaviour(key)?.as_any().downcast_ref::<T>()
    }

    /// Mutable access to an attached render behaviour, staged or active
    pub fn render_behaviour_mut(&mut self, key: RenderBehaviourKey) -> Option<&mut (dyn RenderBehaviour + 'static)> {
        self.render.get_mut(key).map(|behaviour| behaviour.as_mut())
    }

    pub fn render_behaviour_as_mut<T: RenderBehaviour>(&mut self, key: RenderBehaviourKey) -> Option<&mut T> {
        self.render_behaviour_mut(key)?.as_any_mut().downcast_mut::<T>()
    }

    /// Commit staged behaviours, start the promoted logic ones, then update
    /// every enabled logic behaviour
    pub(crate) fn update(&mut self, key: GameObjectKey, delta_time: f32, commands: &mut SceneCommands) {
        self.render.merge();
        let merged = self.logic.merge();

        let mut ctx = UpdateContext {
            delta_time,
            object: key,
            transform: &mut self.transform,
            commands,
        };

        for behaviour_key in merged.added {
            if let Some(behaviour) = self.logic.active_mut(behaviour_key) {
                behaviour.start(&mut ctx);
            }
        }

        let mut pass = self.logic.iterate();
        while let Some((_, behaviour)) = pass.next() {
            if behaviour.is_enabled() {
                behaviour.update(&mut ctx);
            }
        }
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.name)
            .field("enabled", &self.enabled)
            .field("logic", &self.logic.len())
            .field("render", &self.render.len())
            .finish()
    }
}
