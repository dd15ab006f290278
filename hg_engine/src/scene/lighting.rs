/// Scene lighting context.
///
/// Lights belong to the scene that declares them and are handed to the
/// render pass explicitly. There is no process-wide light registry.

use glam::Vec3;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable key of a light in its `LightingContext`
    pub struct LightKey;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional { direction: Vec3 },
    Point { position: Vec3, radius: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Vec3,
    pub intensity: f32,
}

impl Light {
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional { direction: direction.normalize_or_zero() },
            color,
            intensity,
        }
    }

    pub fn point(position: Vec3, radius: f32, color: Vec3, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point { position, radius },
            color,
            intensity,
        }
    }
}

/// Lights and ambient term of a scene
#[derive(Debug, Clone)]
pub struct LightingContext {
    lights: SlotMap<LightKey, Light>,
    ambient: Vec3,
}

impl LightingContext {
    pub fn new() -> Self {
        Self {
            lights: SlotMap::with_key(),
            ambient: Vec3::splat(0.1),
        }
    }

    pub fn add_light(&mut self, light: Light) -> LightKey {
        self.lights.insert(light)
    }

    pub fn remove_light(&mut self, key: LightKey) -> Option<Light> {
        self.lights.remove(key)
    }

    pub fn light(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key)
    }

    pub fn light_mut(&mut self, key: LightKey) -> Option<&mut Light> {
        self.lights.get_mut(key)
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightKey, &Light)> {
        self.lights.iter()
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    pub fn set_ambient(&mut self, ambient: Vec3) {
        self.ambient = ambient;
    }
}

impl Default for LightingContext {
    fn default() -> Self {
        Self::new()
    }
}
