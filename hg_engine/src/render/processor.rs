/// Render data processors.
///
/// A processor is the backend strategy realizing one `DataType` into backend
/// state. The pipeline owns one processor per type and routes every
/// `setup`/`need_setup` request to it.

use super::data_type::DataType;
use super::render_data::Renderable;

/// Backend strategy realizing one kind of render data
///
/// # Contract
///
/// - `need_setup` is true when nothing is attached, when the attached data
///   was invalidated, or when it no longer matches the frontend object
///   (size, attachments, loaded sides...).
/// - `setup` is idempotent: when `need_setup` is false it returns true
///   without touching the attached data.
/// - `setup` returns false on failure and logs the reason itself. The
///   caller must not render the object this frame.
/// - `guarantee` allows `setup` to block on pending resource loads.
pub trait RenderDataProcessor: Send {
    /// Data type handled by this processor
    fn target(&self) -> DataType;

    fn need_setup(&self, data: &dyn Renderable) -> bool;

    fn setup(&mut self, data: &dyn Renderable, guarantee: bool) -> bool;
}

/// Downcast a renderable to the frontend type a processor targets
pub fn downcast_renderable<T: Renderable>(data: &dyn Renderable) -> Option<&T> {
    data.as_any().downcast_ref::<T>()
}
