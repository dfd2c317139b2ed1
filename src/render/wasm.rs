use anyhow::{anyhow, Result};
use web_sys::HtmlCanvasElement;

use crate::DemoConfig;

use super::context::GpuContext;
use super::Renderer;

impl Renderer {
    /// Creates a WebGL2-backed renderer drawing into `canvas`.
    ///
    /// The drawing buffer is resized to the canvas' layout size first so the
    /// quad is not stretched by CSS scaling.
    pub async fn for_canvas(canvas: HtmlCanvasElement, config: &DemoConfig) -> Result<Self> {
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas))
            .map_err(|err| anyhow!("failed to create WebGL surface: {err}"))?;
        let gpu = GpuContext::new(&instance, surface, (width, height)).await?;
        Ok(Self::from_context(gpu, config))
    }
}
