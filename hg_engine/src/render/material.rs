/// Materials: named uniform values + a pooled shader.
///
/// A Material does not own its shader. Shaders are pooled per material kind
/// in the `MaterialCollection` and every material of that kind references
/// the same one weakly. Textures and cube maps are referenced weakly too:
/// a material never keeps GPU-backed resources alive on its own.

use std::fmt;
use std::sync::{Arc, Weak};
use glam::{IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use rustc_hash::FxHashMap;
use super::cube_map::CubeMap;
use super::shader::Shader;
use super::texture::Texture;

// ===== VALUES =====

/// Typed uniform value
#[derive(Debug, Clone)]
pub enum MaterialValue {
    Int(i32),
    Float(f32),
    Boolean(bool),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector4(Vec4),
    IntVector2(IVec2),
    IntVector3(IVec3),
    IntVector4(IVec4),
    Matrix2x2(Mat2),
    Matrix3x3(Mat3),
    Matrix4x4(Mat4),
    Texture(Weak<Texture>),
    CubeMap(Weak<CubeMap>),
}

/// Tag of a `MaterialValue` variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialValueKind {
    Int,
    Float,
    Boolean,
    Vector2,
    Vector3,
    Vector4,
    IntVector2,
    IntVector3,
    IntVector4,
    Matrix2x2,
    Matrix3x3,
    Matrix4x4,
    Texture,
    CubeMap,
}

impl MaterialValue {
    pub fn kind(&self) -> MaterialValueKind {
        match self {
            MaterialValue::Int(_) => MaterialValueKind::Int,
            MaterialValue::Float(_) => MaterialValueKind::Float,
            MaterialValue::Boolean(_) => MaterialValueKind::Boolean,
            MaterialValue::Vector2(_) => MaterialValueKind::Vector2,
            MaterialValue::Vector3(_) => MaterialValueKind::Vector3,
            MaterialValue::Vector4(_) => MaterialValueKind::Vector4,
            MaterialValue::IntVector2(_) => MaterialValueKind::IntVector2,
            MaterialValue::IntVector3(_) => MaterialValueKind::IntVector3,
            MaterialValue::IntVector4(_) => MaterialValueKind::IntVector4,
            MaterialValue::Matrix2x2(_) => MaterialValueKind::Matrix2x2,
            MaterialValue::Matrix3x3(_) => MaterialValueKind::Matrix3x3,
            MaterialValue::Matrix4x4(_) => MaterialValueKind::Matrix4x4,
            MaterialValue::Texture(_) => MaterialValueKind::Texture,
            MaterialValue::CubeMap(_) => MaterialValueKind::CubeMap,
        }
    }

    /// Referenced texture, if this is a texture value still alive
    pub fn texture(&self) -> Option<Arc<Texture>> {
        match self {
            MaterialValue::Texture(texture) => texture.upgrade(),
            _ => None,
        }
    }

    /// Referenced cube map, if this is a cube map value still alive
    pub fn cube_map(&self) -> Option<Arc<CubeMap>> {
        match self {
            MaterialValue::CubeMap(cube_map) => cube_map.upgrade(),
            _ => None,
        }
    }
}

impl PartialEq for MaterialValue {
    fn eq(&self, other: &Self) -> bool {
        use MaterialValue::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (Vector2(a), Vector2(b)) => a == b,
            (Vector3(a), Vector3(b)) => a == b,
            (Vector4(a), Vector4(b)) => a == b,
            (IntVector2(a), IntVector2(b)) => a == b,
            (IntVector3(a), IntVector3(b)) => a == b,
            (IntVector4(a), IntVector4(b)) => a == b,
            (Matrix2x2(a), Matrix2x2(b)) => a == b,
            (Matrix3x3(a), Matrix3x3(b)) => a == b,
            (Matrix4x4(a), Matrix4x4(b)) => a == b,
            (Texture(a), Texture(b)) => a.ptr_eq(b),
            (CubeMap(a), CubeMap(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! impl_material_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for MaterialValue {
                fn from(value: $ty) -> Self {
                    MaterialValue::$variant(value)
                }
            }
        )*
    };
}

impl_material_value_from! {
    i32 => Int,
    f32 => Float,
    bool => Boolean,
    Vec2 => Vector2,
    Vec3 => Vector3,
    Vec4 => Vector4,
    IVec2 => IntVector2,
    IVec3 => IntVector3,
    IVec4 => IntVector4,
    Mat2 => Matrix2x2,
    Mat3 => Matrix3x3,
    Mat4 => Matrix4x4,
}

impl From<&Arc<Texture>> for MaterialValue {
    fn from(texture: &Arc<Texture>) -> Self {
        MaterialValue::Texture(Arc::downgrade(texture))
    }
}

impl From<&Arc<CubeMap>> for MaterialValue {
    fn from(cube_map: &Arc<CubeMap>) -> Self {
        MaterialValue::CubeMap(Arc::downgrade(cube_map))
    }
}

// ===== MATERIAL =====

/// Named uniform bag referencing a pooled shader
#[derive(Clone, Default)]
pub struct Material {
    values: FxHashMap<String, MaterialValue>,
    shader: Weak<Shader>,
    translucent: bool,
}

impl Material {
    /// Empty material using `shader`
    pub fn new(shader: &Arc<Shader>) -> Self {
        Self {
            values: FxHashMap::default(),
            shader: Arc::downgrade(shader),
            translucent: false,
        }
    }

    /// Set `name` to `value`, replacing any previous value of any kind
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<MaterialValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&MaterialValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<MaterialValue> {
        self.values.remove(name)
    }

    /// All values, in no particular order
    pub fn values(&self) -> impl Iterator<Item = (&str, &MaterialValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pooled shader, if still alive
    pub fn shader(&self) -> Option<Arc<Shader>> {
        self.shader.upgrade()
    }

    pub fn set_shader(&mut self, shader: &Arc<Shader>) {
        self.shader = Arc::downgrade(shader);
    }

    /// Translucent materials are drawn after opaque ones, back to front
    pub fn is_translucent(&self) -> bool {
        self.translucent
    }

    pub fn set_translucent(&mut self, translucent: bool) {
        self.translucent = translucent;
    }

    /// Live textures referenced by the values
    pub fn textures(&self) -> Vec<Arc<Texture>> {
        self.values.values().filter_map(MaterialValue::texture).collect()
    }

    /// Live cube maps referenced by the values
    pub fn cube_maps(&self) -> Vec<Arc<CubeMap>> {
        self.values.values().filter_map(MaterialValue::cube_map).collect()
    }
}

impl fmt::Debug for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("values", &self.values.len())
            .field("shader", &self.shader().map(|shader| shader.name().to_string()))
            .field("translucent", &self.translucent)
            .finish()
    }
}

// ===== MATERIAL KINDS =====

/// Where a material kind's shader text comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderSource {
    /// Embedded source text
    Raw(&'static str),
    /// Resource id loaded through the resource manager
    Path(&'static str),
}

/// Compile-time description of a material type
///
/// # Example
///
/// ```
/// use hg_engine::hg::render::{Material, MaterialKind, ShaderSource};
///
/// struct Unlit;
///
/// impl MaterialKind for Unlit {
///     const NAME: &'static str = "Unlit";
///     const SHADER: ShaderSource = ShaderSource::Raw("void main() {}");
///
///     fn defaults(material: &mut Material) {
///         material.set("color", glam::Vec4::ONE);
///     }
/// }
/// ```
pub trait MaterialKind: 'static {
    const NAME: &'static str;
    const SHADER: ShaderSource;

    /// Initial uniform values of a new material of this kind
    fn defaults(_material: &mut Material) {}
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
