/*!
# HG Engine

Core of the HG engine: frontend render data, the processor/renderer dispatch
of the rendering pipeline, and the scene graph feeding it.

Frontend objects (meshes, textures, shaders, render targets, cube maps) carry
a `RenderData` slot. A backend realizes them lazily by attaching its own
`SpecificData` through a `RenderDataProcessor` registered for their
`DataType`; the pipeline then hands every enabled render behaviour of the
scene to the `BehaviourRenderer` registered for its type.

## Architecture

- **RenderData / SpecificData**: frontend object to backend realization link
- **RenderingPipeline**: processor and renderer registry, frame dispatch
- **Renderer**: facade owning the pipeline, materials and frame context
- **ResourceCache**: recycling storage for backend objects
- **DoubleBufferContainer**: add/remove staging that is safe during iteration
- **Scene / GameObject**: behaviours, transforms and lighting
- **Application**: main loop driving a `SystemController`

Backends (e.g. `hg_engine_renderer_headless`) live in their own crates and
assemble a `RenderingPipeline` from their processors and renderers.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod render;
pub mod resource;
pub mod scene;
pub mod app;

// Main hg namespace module
pub mod hg {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logger)
    pub use crate::engine::Engine;

    // Logging sub-module (types only; engine_* macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, LogScope};
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::render::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Application sub-module
    pub mod app {
        pub use crate::app::*;
    }
}

// Re-export math library at crate root
pub use glam;
