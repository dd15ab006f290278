/// Texture render data.
///
/// A texture is backed either by a decoded `Surface`, by a surface still
/// being loaded on a worker thread, or by nothing but a size (render target
/// attachments). Accessors take a `guarantee` flag: `false` returns whatever
/// is available right now, `true` blocks until the pending load finished.

use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};
use glam::UVec2;
use crate::error::{Error, Result};
use crate::resource::ResourceFuture;
use super::data_type::DataType;
use super::render_data::{RenderData, Renderable};

// ===== SURFACE =====

/// Decoded RGBA8 pixel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Surface {
    /// Bytes per pixel of every surface
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wrap RGBA8 pixels, validating the buffer length
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(Error::InvalidResource(format!(
                "Surface {}x{} expects {} bytes, got {}",
                width, height, expected, pixels.len()
            )));
        }
        Ok(Self { width, height, pixels })
    }

    /// Surface filled with a single color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * Self::BYTES_PER_PIXEL)
            .collect();
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

// ===== PARAMETERS =====

/// Sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filtering {
    Nearest,
    Linear,
}

/// Coordinate wrapping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wrapping {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

/// Sampling parameters of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureParameters {
    pub min_filter: Filtering,
    pub mag_filter: Filtering,
    pub wrap_s: Wrapping,
    pub wrap_t: Wrapping,
}

impl Default for TextureParameters {
    fn default() -> Self {
        Self {
            min_filter: Filtering::Linear,
            mag_filter: Filtering::Linear,
            wrap_s: Wrapping::Repeat,
            wrap_t: Wrapping::Repeat,
        }
    }
}

// ===== TEXTURE =====

enum TextureSource {
    /// No pixels, only storage of the given size
    Empty(UVec2),
    Surface(Arc<Surface>),
    Pending(ResourceFuture<Surface>),
}

/// 2D texture render data
pub struct Texture {
    render_data: RenderData,
    source: TextureSource,
    parameters: Mutex<TextureParameters>,
}

impl Texture {
    fn with_source(source: TextureSource) -> Self {
        Self {
            render_data: RenderData::new(DataType::Texture),
            source,
            parameters: Mutex::new(TextureParameters::default()),
        }
    }

    /// Texture from decoded pixels
    pub fn from_surface(surface: Surface) -> Self {
        Self::with_source(TextureSource::Surface(Arc::new(surface)))
    }

    /// Texture whose pixels are still loading
    pub fn from_future(future: ResourceFuture<Surface>) -> Self {
        Self::with_source(TextureSource::Pending(future))
    }

    /// Pixel-less texture of the given size (render target attachment)
    pub fn with_size(size: UVec2) -> Self {
        Self::with_source(TextureSource::Empty(size))
    }

    /// Texture size; zero while a non-guaranteed load is pending
    pub fn size(&self, guarantee: bool) -> UVec2 {
        match &self.source {
            TextureSource::Empty(size) => *size,
            TextureSource::Surface(surface) => surface.size(),
            TextureSource::Pending(future) => future
                .get_with(guarantee)
                .map_or(UVec2::ZERO, |surface| surface.size()),
        }
    }

    /// Pixels, if any are (or, with `guarantee`, become) available
    pub fn surface(&self, guarantee: bool) -> Option<Arc<Surface>> {
        match &self.source {
            TextureSource::Empty(_) => None,
            TextureSource::Surface(surface) => Some(surface.clone()),
            TextureSource::Pending(future) => future.get_with(guarantee),
        }
    }

    /// False only while the pixels are still loading
    pub fn is_ready(&self) -> bool {
        match &self.source {
            TextureSource::Pending(future) => future.is_ready(),
            _ => true,
        }
    }

    /// True for storage-only textures
    pub fn is_storage_only(&self) -> bool {
        matches!(self.source, TextureSource::Empty(_))
    }

    pub fn parameters(&self) -> TextureParameters {
        *self.parameters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Change sampling parameters; a change forces the backend to set up again
    pub fn set_parameters(&self, parameters: TextureParameters) {
        let mut current = self.parameters.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != parameters {
            *current = parameters;
            self.render_data.invalidate();
        }
    }
}

impl Renderable for Texture {
    fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
