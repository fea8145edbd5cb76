#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position is in normalized device coordinates
    position: [f32; 2],
    color: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 2], color: [f32; 3]) -> Self {
        Vertex { position, color }
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // This attribute corresponds to the `position` field of `Vertex`
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0, // Matches @location(0) on `position` in the shader file
                    format: wgpu::VertexFormat::Float32x2,
                },
                // This attribute corresponds to the `color` field of `Vertex`
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1, // Matches @location(1) on `color` in the shader file
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
