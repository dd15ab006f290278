//! Render data type tags.
//!
//! Every dispatch table in the rendering core (processors, behaviour
//! renderers) is keyed by a `DataType`. The set of built-in kinds is closed;
//! backends and games add their own kinds through `DataType::Custom`.

use std::fmt;

/// Stable tag identifying the concrete kind of a render data object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    /// Mesh render behaviour (geometry + material)
    Mesh,
    /// 2D texture
    Texture,
    /// Shader program
    Shader,
    /// Offscreen render target
    RenderTarget,
    /// Six-sided cube map
    CubeMap,
    /// User-defined kind, identified by a unique name
    Custom(&'static str),
}

impl DataType {
    /// Built-in kinds, in declaration order
    pub const BUILTIN: [DataType; 5] = [
        DataType::Mesh,
        DataType::Texture,
        DataType::Shader,
        DataType::RenderTarget,
        DataType::CubeMap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Mesh => "Mesh",
            DataType::Texture => "Texture",
            DataType::Shader => "Shader",
            DataType::RenderTarget => "RenderTarget",
            DataType::CubeMap => "CubeMap",
            DataType::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, DataType::Custom(_))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
