mod context;
mod pipeline;
mod renderer;
mod shader;
mod texture;

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use context::GpuContext;
pub use pipeline::QuadPipeline;
pub use renderer::Renderer;
pub use texture::GpuTexture;
