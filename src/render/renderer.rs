use std::collections::HashMap;

use anyhow::{anyhow, Result};
use log::{debug, warn};

use crate::assets::TextureImage;
use crate::mesh::Quad;
use crate::DemoConfig;

use super::context::GpuContext;
use super::pipeline::QuadPipeline;
use super::texture::GpuTexture;

/// Draws the configured quad with whichever texture is active.
///
/// Uploaded textures are kept per name, so switching back to a texture that
/// was already shown does not touch the image again.
pub struct Renderer {
    gpu: GpuContext,
    pipeline: QuadPipeline,
    clear_color: wgpu::Color,
    textures: HashMap<String, GpuTexture>,
    active: Option<String>,
}

impl Renderer {
    pub(crate) fn from_context(gpu: GpuContext, config: &DemoConfig) -> Self {
        let quad = Quad::new(config.quad_half_extent);
        let pipeline = QuadPipeline::new(&gpu.device, gpu.format(), &quad);
        let clear_color = config.wgpu_clear_color(gpu.format().is_srgb());
        Self {
            gpu,
            pipeline,
            clear_color,
            textures: HashMap::new(),
            active: None,
        }
    }

    /// Uploads `image` unless a texture with the same name is cached, then
    /// makes it the active texture.
    pub fn set_texture(&mut self, image: &TextureImage) {
        if !self.has_texture(&image.name) {
            debug!(
                "uploading texture {} ({}x{}, {} levels)",
                image.name,
                image.width,
                image.height,
                image.mip_level_count()
            );
            let texture =
                GpuTexture::upload(&self.gpu.device, &self.gpu.queue, &self.pipeline, image);
            self.textures.insert(image.name.clone(), texture);
        }
        self.active = Some(image.name.clone());
    }

    /// Switches to an already uploaded texture. Returns false if `name` was
    /// never uploaded.
    pub fn activate(&mut self, name: &str) -> bool {
        if self.has_texture(name) {
            self.active = Some(name.to_string());
            true
        } else {
            false
        }
    }

    pub fn has_texture(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    pub fn active_texture(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    /// Clears the frame and draws the quad with the active texture.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("quad-encoder"),
            });

        let bind_group = self
            .active
            .as_ref()
            .and_then(|name| self.textures.get(name))
            .map(GpuTexture::bind_group);
        self.pipeline
            .draw(&mut encoder, &view, self.clear_color, bind_group);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Reacts to a failed frame. Only out-of-memory is treated as fatal.
    pub fn handle_surface_error(&mut self, err: wgpu::SurfaceError) -> Result<()> {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                debug!("surface {err}; reconfiguring");
                self.gpu.reconfigure();
                Ok(())
            }
            wgpu::SurfaceError::OutOfMemory => Err(anyhow!("GPU is out of memory")),
            wgpu::SurfaceError::Timeout => {
                warn!("surface timeout; frame skipped");
                Ok(())
            }
            wgpu::SurfaceError::Other => {
                warn!("surface reported an unknown error; frame skipped");
                Ok(())
            }
        }
    }
}
