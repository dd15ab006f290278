/// Shader render data.
///
/// Holds GLSL-like source text, either embedded or still loading. The text
/// is opaque to the core: backends compile it in their shader processor.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use crate::resource::ResourceFuture;
use super::data_type::DataType;
use super::render_data::{RenderData, Renderable};

enum ShaderText {
    Ready(Arc<String>),
    Pending(ResourceFuture<String>),
}

/// Shader program source
pub struct Shader {
    render_data: RenderData,
    name: String,
    text: ShaderText,
}

impl Shader {
    /// Shader from embedded source text
    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            render_data: RenderData::new(DataType::Shader),
            name: name.into(),
            text: ShaderText::Ready(Arc::new(source.into())),
        }
    }

    /// Shader whose source is loaded asynchronously
    pub fn from_future(name: impl Into<String>, future: ResourceFuture<String>) -> Self {
        Self {
            render_data: RenderData::new(DataType::Shader),
            name: name.into(),
            text: ShaderText::Pending(future),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source text; with `guarantee` waits for a pending load
    pub fn source(&self, guarantee: bool) -> Option<Arc<String>> {
        match &self.text {
            ShaderText::Ready(text) => Some(text.clone()),
            ShaderText::Pending(future) => future.get_with(guarantee),
        }
    }

    pub fn is_ready(&self) -> bool {
        match &self.text {
            ShaderText::Ready(_) => true,
            ShaderText::Pending(future) => future.is_ready(),
        }
    }
}

impl Renderable for Shader {
    fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("name", &self.name)
            .field("ready", &self.is_ready())
            .field("render_data", &self.render_data)
            .finish()
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
