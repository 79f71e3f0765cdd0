//! Shared wgpu boilerplate for the flat-colour pipelines.

use super::texture::DEPTH_FORMAT;

/// Vertex-visible uniform buffer binding selected per draw by a dynamic
/// offset.
pub fn dynamic_uniform_buffer(binding: u32, min_size: u64) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: wgpu::BufferSize::new(min_size),
        },
        count: None,
    }
}

/// How a pipeline treats the depth buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    /// Test and write, nearer fragments win.
    Test,
    /// Always pass and write; used to reset depth inside a viewport.
    Overwrite,
}

impl DepthMode {
    fn state(self) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = match self {
            Self::Test => (true, wgpu::CompareFunction::LessEqual),
            Self::Overwrite => (true, wgpu::CompareFunction::Always),
        };
        wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Parameters of one flat-colour pipeline.
pub struct FlatPipelineDesc<'a> {
    /// Debug label.
    pub label: &'a str,
    /// Primitive topology.
    pub topology: wgpu::PrimitiveTopology,
    /// Depth behaviour.
    pub depth: DepthMode,
    /// Which colour channels are written.
    pub write_mask: wgpu::ColorWrites,
}

/// Create a pipeline with `vs_main` / `fs_main` entry points, one vertex
/// buffer, alpha blending, and a depth attachment.
pub fn create_flat_pipeline(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    layout: &wgpu::PipelineLayout,
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    desc: &FlatPipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", desc.label)),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: desc.write_mask,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(desc.depth.state()),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
