//! wgpu rendering module
//!
//! Scene assembly is pure (pixel-space triangle lists); the pipeline maps
//! them to NDC and submits.

pub mod gpu;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use gpu::GpuContext;
pub use pipeline::RenderState;
pub use scene::{Overlay, build_frame};
pub use vertex::{Vertex, colors};
