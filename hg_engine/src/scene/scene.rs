/// Scene - double-buffered game objects plus the lighting context.
///
/// Frame order inside `update`:
/// 1. merge staged game objects (adds promoted, removes purged)
/// 2. update every enabled, non-removing game object in promotion order
///    (each one merges and starts its own staged behaviours first)
/// 3. after each game object, apply the spawn/despawn commands it queued,
///    so a despawned object later in the pass is skipped this same frame

use crate::log::LogScope;
use super::behaviour::{SceneCommand, SceneCommands};
use super::double_buffer::{DoubleBufferContainer, Merged};
use super::game_object::{GameObject, GameObjectKey};
use super::lighting::LightingContext;

/// Game objects and lights rendered together
pub struct Scene {
    scope: LogScope,
    name: String,
    game_objects: DoubleBufferContainer<GameObjectKey, GameObject>,
    lighting: LightingContext,
    frame: u64,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            scope: LogScope::new("hg::Scene").child(&name),
            name,
            game_objects: DoubleBufferContainer::new(),
            lighting: LightingContext::new(),
            frame: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of completed `update` calls
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // ===== GAME OBJECTS =====

    /// Stage a game object; it is updated and rendered after the next merge
    pub fn add_game_object(&mut self, object: GameObject) -> GameObjectKey {
        self.game_objects.add(object)
    }

    /// Remove a game object (dropped now, slot purged by the next merge)
    pub fn remove_game_object(&mut self, key: GameObjectKey) -> Option<GameObject> {
        self.game_objects.remove(key)
    }

    pub fn is_removing(&self, key: GameObjectKey) -> bool {
        self.game_objects.is_removing(key)
    }

    pub fn game_object(&self, key: GameObjectKey) -> Option<&GameObject> {
        self.game_objects.get(key)
    }

    pub fn game_object_mut(&mut self, key: GameObjectKey) -> Option<&mut GameObject> {
        self.game_objects.get_mut(key)
    }

    pub fn game_objects(&self) -> &DoubleBufferContainer<GameObjectKey, GameObject> {
        &self.game_objects
    }

    /// First stable game object named `name`
    pub fn find(&self, name: &str) -> Option<GameObjectKey> {
        self.game_objects
            .iter()
            .find(|(_, object)| object.name() == name)
            .map(|(key, _)| key)
    }

    /// Commit staged game objects without updating anything
    pub fn merge(&mut self) -> Merged<GameObjectKey> {
        self.game_objects.merge()
    }

    // ===== LIGHTING =====

    pub fn lighting(&self) -> &LightingContext {
        &self.lighting
    }

    pub fn lighting_mut(&mut self) -> &mut LightingContext {
        &mut self.lighting
    }

    // ===== FRAME =====

    /// Run one logic frame
    pub fn update(&mut self, delta_time: f32) {
        let merged = self.game_objects.merge();
        if !merged.is_empty() {
            crate::engine_trace!(self.scope,
                "Frame {}: {} game objects added, {} removed",
                self.frame, merged.added.len(), merged.removed);
        }

        let mut commands = SceneCommands::new();
        let mut pass = self.game_objects.iterate();
        while let Some((key, object)) = pass.next() {
            if object.is_enabled() {
                object.update(key, delta_time, &mut commands);
            }

            for command in commands.drain() {
                match command {
                    SceneCommand::Spawn(spawned) => {
                        pass.add(spawned);
                    }
                    SceneCommand::Despawn(target) => {
                        if pass.remove(target).is_none() {
                            crate::engine_warn!(self.scope,
                                "Despawn of unknown game object {:?}", target);
                        }
                    }
                }
            }
        }

        self.frame += 1;
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("game_objects", &self.game_objects.len())
            .field("lights", &self.lighting.len())
            .field("frame", &self.frame)
            .finish()
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
