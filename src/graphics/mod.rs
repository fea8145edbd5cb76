//! Flat-colored triangle geometry and the pipeline that draws it.
//!
//! Everything on screen except text is built out of `Vertex` triangles in
//! canvas space (800x600, y down) and converted to NDC here.

use cgmath::Vector2;

use crate::consts::{HEIGHT, WIDTH};

mod vertex;

pub use vertex::Vertex;

/// Triangles per tessellated circle.
pub const CIRCLE_SEGMENTS: usize = 48;

pub const RED: [f32; 3] = [1.0, 0.0, 0.0];
pub const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
pub const AQUA: [f32; 3] = [0.0, 1.0, 1.0];

/// Gradient endpoints, as 8-bit channels so the scanline blend can run on
/// integer arithmetic.
pub const BG_TOP: [u8; 3] = [0, 25, 40];
pub const BG_BOTTOM: [u8; 3] = [0, 0, 80];

/// Converts a canvas-space point (pixels, y down) to normalized device
/// coordinates.
pub fn to_ndc(x: f32, y: f32) -> [f32; 2] {
    [
        x / (WIDTH as f32 / 2.0) - 1.0,
        1.0 - y / (HEIGHT as f32 / 2.0),
    ]
}

/// Per-channel blend between two colors at scanline `i` of `height`, using
/// integer floor division. `a + (b - a) * i / height` per channel.
pub fn blend_channels(a: [u8; 3], b: [u8; 3], i: u32, height: u32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for (j, channel) in out.iter_mut().enumerate() {
        let delta = (b[j] as i64 - a[j] as i64) * i as i64;
        *channel = (a[j] as i64 + delta.div_euclid(height as i64)) as u8;
    }
    out
}

fn color_to_f32(c: [u8; 3]) -> [f32; 3] {
    [
        c[0] as f32 / 255.0,
        c[1] as f32 / 255.0,
        c[2] as f32 / 255.0,
    ]
}

/// Builds the vertical gradient as one quad per scanline. The mesh is static
/// for the life of the program, so the per-line cost is paid once.
pub fn build_gradient(top: [u8; 3], bottom: [u8; 3]) -> Vec<Vertex> {
    let mut verts = Vec::with_capacity(HEIGHT as usize * 6);
    for i in 0..HEIGHT {
        let color = color_to_f32(blend_channels(top, bottom, i, HEIGHT));
        push_rect(&mut verts, 0.0, i as f32, WIDTH as f32, 1.0, color);
    }
    verts
}

/// Appends an axis-aligned rectangle as two triangles.
pub fn push_rect(verts: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 3]) {
    let tl = to_ndc(x, y);
    let tr = to_ndc(x + w, y);
    let bl = to_ndc(x, y + h);
    let br = to_ndc(x + w, y + h);
    verts.push(Vertex::new(tl, color));
    verts.push(Vertex::new(bl, color));
    verts.push(Vertex::new(br, color));
    verts.push(Vertex::new(tl, color));
    verts.push(Vertex::new(br, color));
    verts.push(Vertex::new(tr, color));
}

/// Appends a filled circle as a triangle fan around the center.
pub fn push_circle(verts: &mut Vec<Vertex>, center: Vector2<f32>, radius: f32, color: [f32; 3]) {
    let center_ndc = to_ndc(center.x, center.y);
    let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
    for i in 0..CIRCLE_SEGMENTS {
        let a0 = step * i as f32;
        let a1 = step * (i + 1) as f32;
        verts.push(Vertex::new(center_ndc, color));
        verts.push(Vertex::new(
            to_ndc(center.x + radius * a0.cos(), center.y + radius * a0.sin()),
            color,
        ));
        verts.push(Vertex::new(
            to_ndc(center.x + radius * a1.cos(), center.y + radius * a1.sin()),
            color,
        ));
    }
}

/// Builds the single render pipeline used for all flat geometry.
pub fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
    });

    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Render Pipeline Layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Render Pipeline"),
        layout: Some(&render_pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: "vs_main",
            buffers: &[Vertex::desc()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None, // 2D only, both windings occur
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
