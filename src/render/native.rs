use std::sync::Arc;

use anyhow::Result;
use winit::window::Window;

use crate::DemoConfig;

use super::context::GpuContext;
use super::Renderer;

impl Renderer {
    /// Creates a renderer that presents into a winit window.
    pub async fn for_window(window: Arc<Window>, config: &DemoConfig) -> Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;
        let gpu = GpuContext::new(&instance, surface, (size.width, size.height)).await?;
        Ok(Self::from_context(gpu, config))
    }
}
