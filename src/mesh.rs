use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Interleaved vertex consumed by the quad pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

    /// Buffer layout matching `VertexInput` in the quad shader.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Axis-aligned quad centered on the origin, in clip space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    half_extent: Vec2,
}

impl Quad {
    pub const VERTEX_COUNT: u32 = 4;
    pub const TOPOLOGY: wgpu::PrimitiveTopology = wgpu::PrimitiveTopology::TriangleStrip;

    pub fn new(half_extent: f32) -> Self {
        Self {
            half_extent: Vec2::splat(half_extent),
        }
    }

    pub fn half_extent(&self) -> Vec2 {
        self.half_extent
    }

    /// Triangle-strip vertices: top-left, bottom-left, top-right, bottom-right.
    ///
    /// Texture row 0 maps to the top edge, so images appear upright without
    /// flipping them on upload.
    pub fn vertices(&self) -> [Vertex; 4] {
        let corners = [
            (Vec2::new(-1.0, 1.0), Vec2::new(0.0, 0.0)),
            (Vec2::new(-1.0, -1.0), Vec2::new(0.0, 1.0)),
            (Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)),
            (Vec2::new(1.0, -1.0), Vec2::new(1.0, 1.0)),
        ];
        corners.map(|(sign, uv)| Vertex {
            position: (sign * self.half_extent).to_array(),
            tex_coord: uv.to_array(),
        })
    }
}

impl Default for Quad {
    fn default() -> Self {
        Self::new(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quad_matches_demo_geometry() {
        let positions: Vec<[f32; 2]> = Quad::default()
            .vertices()
            .iter()
            .map(|v| v.position)
            .collect();
        assert_eq!(
            positions,
            vec![[-0.5, 0.5], [-0.5, -0.5], [0.5, 0.5], [0.5, -0.5]]
        );
    }

    #[test]
    fn texture_coordinates_keep_image_upright() {
        let uvs: Vec<[f32; 2]> = Quad::new(0.8)
            .vertices()
            .iter()
            .map(|v| v.tex_coord)
            .collect();
        assert_eq!(uvs, vec![[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&Quad::default().vertices()).len(), 64);
    }
}
