//! wgpu implementation of the render backend.
//!
//! The compositor and the gizmo drive the backend through state calls and
//! draws. Those are recorded into a frame of viewport/scissor commands and
//! vertex ranges, then replayed in a single render pass by
//! [`WgpuBackend::present`].

use std::f32::consts::TAU;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use super::dynamic_buffer::TypedBuffer;
use super::pipeline_helpers::{
    create_flat_pipeline, dynamic_uniform_buffer, DepthMode, FlatPipelineDesc,
};
use super::render_context::RenderContext;
use super::texture::DepthTarget;
use crate::gizmo::{AxisProxy, GizmoFrame};
use crate::render::{RenderBackend, RenderTarget, ScenePass, ViewportRegion};
use crate::scene::{Content, Scene};
use crate::util::color::{with_alpha, Rgba};

/// Byte distance between per-draw matrices in the uniform buffer.
const UNIFORM_STRIDE: u32 = 256;
/// Bytes of one matrix.
const TRANSFORM_SIZE: u64 = 64;
/// Triangles per gizmo disc.
const DISC_SEGMENTS: u32 = 24;
/// Ink of the gizmo's axis letters.
const LABEL_COLOR: [f32; 3] = [0.0, 0.0, 0.0];
/// Brightness of cuboid edges when the scene has no ambient light.
const UNLIT_FACTOR: f32 = 0.35;

/// Position plus RGBA colour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    /// Position in the draw's model space.
    pub position: [f32; 3],
    /// Straight (non-premultiplied) RGBA.
    pub color: [f32; 4],
}

impl ColorVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

    fn new(position: Vec3, color: Rgba) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// One matrix padded to [`UNIFORM_STRIDE`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct TransformUniform {
    view_projection: [[f32; 4]; 4],
    _padding: [[f32; 4]; 12],
}

impl TransformUniform {
    fn new(matrix: Mat4) -> Self {
        Self {
            view_projection: matrix.to_cols_array_2d(),
            _padding: [[0.0; 4]; 12],
        }
    }
}

/// Rectangle in device pixels with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl PixelRect {
    /// Map a bottom-left-origin logical region onto a `surface`-sized
    /// drawing buffer. Returns `None` when nothing of it lands on the
    /// buffer.
    #[must_use]
    pub fn from_region(
        region: ViewportRegion,
        pixel_ratio: f32,
        surface: (u32, u32),
    ) -> Option<Self> {
        let physical = region.to_physical(pixel_ratio);
        let (surface_width, surface_height) = surface;
        let x = physical.x.min(surface_width);
        let y = surface_height.saturating_sub(physical.y.saturating_add(physical.height));
        let width = physical.width.min(surface_width - x);
        let height = physical.height.min(surface_height - y);
        (width > 0 && height > 0).then_some(Self {
            x,
            y,
            width,
            height,
        })
    }

    fn full(surface: (u32, u32)) -> Self {
        Self {
            x: 0,
            y: 0,
            width: surface.0,
            height: surface.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineKind {
    Lines,
    Triangles,
    Background,
    DepthReset,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Viewport(PixelRect),
    Scissor(PixelRect),
    Draw {
        pipeline: PipelineKind,
        transform: u32,
        vertices: Range<u32>,
    },
}

/// Geometry and state changes collected for one frame.
#[derive(Debug, Default)]
struct FrameRecording {
    vertices: Vec<ColorVertex>,
    transforms: Vec<TransformUniform>,
    commands: Vec<Command>,
    /// Cleared while the current viewport or scissor has no area.
    drawable: bool,
}

impl FrameRecording {
    fn push_transform(&mut self, matrix: Mat4) -> u32 {
        self.transforms.push(TransformUniform::new(matrix));
        (self.transforms.len() - 1) as u32
    }

    fn draw(&mut self, pipeline: PipelineKind, transform: u32, vertices: &[ColorVertex]) {
        if !self.drawable || vertices.is_empty() {
            return;
        }
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.commands.push(Command::Draw {
            pipeline,
            transform,
            vertices: start..self.vertices.len() as u32,
        });
    }
}

struct Pipelines {
    lines: wgpu::RenderPipeline,
    triangles: wgpu::RenderPipeline,
    background: wgpu::RenderPipeline,
    depth_reset: wgpu::RenderPipeline,
}

impl Pipelines {
    fn get(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Lines => &self.lines,
            PipelineKind::Triangles => &self.triangles,
            PipelineKind::Background => &self.background,
            PipelineKind::DepthReset => &self.depth_reset,
        }
    }
}

/// [`RenderBackend`] that draws a [`Scene`] to a window surface.
pub struct WgpuBackend {
    context: RenderContext,
    depth: DepthTarget,
    pipelines: Pipelines,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    vertex_buffer: TypedBuffer<ColorVertex>,
    uniform_buffer: TypedBuffer<TransformUniform>,
    pixel_ratio: f32,
    scissor_test: bool,
    scissor: ViewportRegion,
    viewport: ViewportRegion,
    frame: FrameRecording,
}

impl WgpuBackend {
    /// Build pipelines and buffers on `context`. `pixel_ratio` maps logical
    /// regions onto the surface until the first resize.
    #[must_use]
    pub fn new(context: RenderContext, pixel_ratio: f32) -> Self {
        let device = &context.device;
        let shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/flat_color.wgsl"
        ));

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Transform Layout"),
            entries: &[dynamic_uniform_buffer(0, TRANSFORM_SIZE)],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Flat Color Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let format = context.format();
        let pipeline = |label, topology, depth, write_mask| {
            create_flat_pipeline(
                device,
                &shader,
                format,
                &layout,
                ColorVertex::layout(),
                &FlatPipelineDesc {
                    label,
                    topology,
                    depth,
                    write_mask,
                },
            )
        };
        let pipelines = Pipelines {
            lines: pipeline(
                "Lines",
                wgpu::PrimitiveTopology::LineList,
                DepthMode::Test,
                wgpu::ColorWrites::ALL,
            ),
            triangles: pipeline(
                "Triangles",
                wgpu::PrimitiveTopology::TriangleList,
                DepthMode::Test,
                wgpu::ColorWrites::ALL,
            ),
            background: pipeline(
                "Background",
                wgpu::PrimitiveTopology::TriangleList,
                DepthMode::Overwrite,
                wgpu::ColorWrites::ALL,
            ),
            depth_reset: pipeline(
                "Depth Reset",
                wgpu::PrimitiveTopology::TriangleList,
                DepthMode::Overwrite,
                wgpu::ColorWrites::empty(),
            ),
        };

        let vertex_buffer = TypedBuffer::with_capacity(
            device,
            "Viewport Vertices",
            4096,
            wgpu::BufferUsages::VERTEX,
        );
        let uniform_buffer = TypedBuffer::with_capacity(
            device,
            "Viewport Transforms",
            16,
            wgpu::BufferUsages::UNIFORM,
        );
        let bind_group = create_bind_group(device, &bind_group_layout, uniform_buffer.buffer());
        let (width, height) = context.size();
        let depth = DepthTarget::new(device, width, height);

        Self {
            context,
            depth,
            pipelines,
            bind_group_layout,
            bind_group,
            vertex_buffer,
            uniform_buffer,
            pixel_ratio,
            scissor_test: false,
            scissor: ViewportRegion::default(),
            viewport: ViewportRegion::default(),
            frame: FrameRecording {
                drawable: true,
                ..FrameRecording::default()
            },
        }
    }

    /// The wgpu context.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Reconfigure the surface after it was lost or went out of date.
    pub fn recover_surface(&mut self) {
        self.context.reconfigure();
    }

    /// Upload and replay everything recorded since the last call, then
    /// present the swapchain image. A frame with no draws is skipped.
    ///
    /// # Errors
    ///
    /// [`wgpu::SurfaceError`] when the swapchain image cannot be acquired.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = std::mem::replace(
            &mut self.frame,
            FrameRecording {
                drawable: true,
                ..FrameRecording::default()
            },
        );
        if frame.vertices.is_empty() {
            return Ok(());
        }

        let output = self.context.get_next_frame()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.context.device;
        let queue = &self.context.queue;
        let _ = self.vertex_buffer.write(device, queue, &frame.vertices);
        if self.uniform_buffer.write(device, queue, &frame.transforms) {
            self.bind_group =
                create_bind_group(device, &self.bind_group_layout, self.uniform_buffer.buffer());
        }

        let mut encoder = self.context.create_encoder();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Viewport Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_vertex_buffer(0, self.vertex_buffer.buffer().slice(..));

            for command in &frame.commands {
                match command {
                    Command::Viewport(rect) => pass.set_viewport(
                        rect.x as f32,
                        rect.y as f32,
                        rect.width as f32,
                        rect.height as f32,
                        0.0,
                        1.0,
                    ),
                    Command::Scissor(rect) => {
                        pass.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
                    }
                    Command::Draw {
                        pipeline,
                        transform,
                        vertices,
                    } => {
                        pass.set_pipeline(self.pipelines.get(*pipeline));
                        pass.set_bind_group(0, &self.bind_group, &[transform * UNIFORM_STRIDE]);
                        pass.draw(vertices.clone(), 0..1);
                    }
                }
            }
        }
        self.context.submit(encoder);
        output.present();
        Ok(())
    }

    fn surface_size(&self) -> (u32, u32) {
        self.context.size()
    }

    fn record_scissor(&mut self) {
        let surface = self.surface_size();
        let rect = if self.scissor_test {
            PixelRect::from_region(self.scissor, self.pixel_ratio, surface)
        } else {
            Some(PixelRect::full(surface))
        };
        self.apply_rect(rect, Command::Scissor);
    }

    fn apply_rect(&mut self, rect: Option<PixelRect>, command: fn(PixelRect) -> Command) {
        match rect {
            Some(rect) => {
                self.frame.drawable = true;
                self.frame.commands.push(command(rect));
            }
            None => self.frame.drawable = false,
        }
    }

    /// Fullscreen triangles in clip space at the far plane.
    fn push_fullscreen(&mut self, pipeline: PipelineKind, color: Rgba) {
        let transform = self.frame.push_transform(Mat4::IDENTITY);
        let vertices = fullscreen_quad(color);
        self.frame.draw(pipeline, transform, &vertices);
    }
}

impl RenderTarget for WgpuBackend {
    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.surface_size()
    }

    fn set_drawing_buffer_size(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
        if self.context.resize(width, height) {
            self.depth = DepthTarget::new(&self.context.device, width, height);
            log::debug!("gpu: surface resized to {width}x{height}");
        }
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.scissor_test = enabled;
        self.record_scissor();
    }

    fn set_scissor(&mut self, region: ViewportRegion) {
        self.scissor = region;
        self.record_scissor();
    }

    fn set_viewport(&mut self, region: ViewportRegion) {
        self.viewport = region;
        let rect = PixelRect::from_region(region, self.pixel_ratio, self.surface_size());
        self.apply_rect(rect, Command::Viewport);
    }

    fn viewport(&self) -> ViewportRegion {
        self.viewport
    }

    fn clear_depth(&mut self) {
        self.push_fullscreen(PipelineKind::DepthReset, [0.0; 4]);
    }

    fn render_gizmo(&mut self, frame: &GizmoFrame) {
        let transform = self.frame.push_transform(frame.view_projection);

        let bars: Vec<ColorVertex> = frame
            .bars
            .iter()
            .flat_map(|bar| {
                let color = with_alpha(bar.color, 1.0);
                [
                    ColorVertex::new(Vec3::ZERO, color),
                    ColorVertex::new(bar.end, color),
                ]
            })
            .collect();
        self.frame.draw(PipelineKind::Lines, transform, &bars);

        let mut discs = Vec::with_capacity(frame.proxies.len() * DISC_SEGMENTS as usize * 3);
        for proxy in &frame.proxies {
            disc_vertices(
                proxy.center,
                proxy.radius(),
                with_alpha(proxy.color, proxy.opacity),
                &mut discs,
            );
        }
        self.frame.draw(PipelineKind::Triangles, transform, &discs);

        let mut labels = Vec::new();
        label_vertices(&frame.proxies, &mut labels);
        self.frame.draw(PipelineKind::Lines, transform, &labels);
    }
}

impl RenderBackend<Scene> for WgpuBackend {
    fn render_scene(&mut self, scene: &Scene, pass: &ScenePass<'_>) {
        self.push_fullscreen(PipelineKind::Background, pass.background);

        let transform = self.frame.push_transform(pass.camera.build_matrix());
        let light = scene.ambient_light();
        let mut lines = Vec::new();
        for drawable in scene.drawables() {
            match drawable.content {
                Content::Cuboid { size, color } => {
                    cuboid_edges(drawable.world, *size, lit(*color, light), &mut lines);
                }
                Content::Polyline { points, color } => {
                    let color = with_alpha(*color, 1.0);
                    for pair in points.windows(2) {
                        for point in pair {
                            let world = drawable.world.transform_point3(*point);
                            lines.push(ColorVertex::new(world, color));
                        }
                    }
                }
                Content::Group | Content::AmbientLight { .. } => {}
            }
        }
        if pass.helper.visible {
            let color = with_alpha(pass.helper.color, 1.0);
            for (a, b) in pass.helper.segments() {
                lines.push(ColorVertex::new(a, color));
                lines.push(ColorVertex::new(b, color));
            }
        }
        self.frame.draw(PipelineKind::Lines, transform, &lines);
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Transform Bind Group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: wgpu::BufferSize::new(TRANSFORM_SIZE),
            }),
        }],
    })
}

/// Two triangles covering clip space at depth 1.
fn fullscreen_quad(color: Rgba) -> [ColorVertex; 6] {
    [
        [-1.0, -1.0],
        [1.0, -1.0],
        [1.0, 1.0],
        [-1.0, -1.0],
        [1.0, 1.0],
        [-1.0, 1.0],
    ]
    .map(|[x, y]| ColorVertex::new(Vec3::new(x, y, 1.0), color))
}

/// Scale `color` by the ambient light, or dim it when there is none.
fn lit(color: [f32; 3], light: Option<[f32; 3]>) -> Rgba {
    let factor = light.unwrap_or([UNLIT_FACTOR; 3]);
    let mut out = [0.0, 0.0, 0.0, 1.0];
    for ((o, c), l) in out.iter_mut().zip(color).zip(factor) {
        *o = (c * l).min(1.0);
    }
    out
}

/// The 12 edges of an origin-centred box of `size`, as a line list in
/// world space.
fn cuboid_edges(world: Mat4, size: Vec3, color: Rgba, out: &mut Vec<ColorVertex>) {
    let half = size * 0.5;
    let corner = |i: usize| {
        let sign = |bit: usize| if i & bit == 0 { -1.0 } else { 1.0 };
        world.transform_point3(Vec3::new(sign(1) * half.x, sign(2) * half.y, sign(4) * half.z))
    };
    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (2, 3),
        (4, 5),
        (6, 7),
        (0, 2),
        (1, 3),
        (4, 6),
        (5, 7),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];
    for (a, b) in EDGES {
        out.push(ColorVertex::new(corner(a), color));
        out.push(ColorVertex::new(corner(b), color));
    }
}

/// A disc in the XY plane around `center` as a triangle list.
/// Label strokes of every labeled proxy as a line list.
fn label_vertices(proxies: &[AxisProxy], out: &mut Vec<ColorVertex>) {
    for proxy in proxies {
        let color = with_alpha(LABEL_COLOR, proxy.opacity);
        for [a, b] in proxy.label_segments() {
            out.push(ColorVertex::new(a, color));
            out.push(ColorVertex::new(b, color));
        }
    }
}

fn disc_vertices(center: Vec3, radius: f32, color: Rgba, out: &mut Vec<ColorVertex>) {
    let rim = |i: u32| {
        let angle = i as f32 / DISC_SEGMENTS as f32 * TAU;
        center + Vec3::new(angle.cos(), angle.sin(), 0.0) * radius
    };
    for i in 0..DISC_SEGMENTS {
        out.push(ColorVertex::new(center, color));
        out.push(ColorVertex::new(rim(i), color));
        out.push(ColorVertex::new(rim(i + 1), color));
    }
}
