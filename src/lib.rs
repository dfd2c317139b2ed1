//! Textured quad viewer.
//!
//! A single quad is drawn with a texture loaded from a PNG; clicking the
//! render target cycles through the configured textures. The same core runs
//! in a native winit window and, on `wasm32`, in a WebGL2 canvas.

#[cfg(not(target_arch = "wasm32"))]
pub mod app;
pub mod assets;
pub mod config;
pub mod cycle;
pub mod mesh;
pub mod render;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use assets::{AssetError, TextureImage};
pub use config::DemoConfig;
pub use cycle::TextureCycle;
pub use mesh::{Quad, Vertex};
pub use render::Renderer;
