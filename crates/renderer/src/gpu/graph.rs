use anyhow::Result;
use glitterconfig::SparkleSettings;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::types::EffectConfig;

use super::context::GpuContext;
use super::pipeline::{gradient_quad, GlitterPipelines, StarfieldPipeline};
use super::targets::TargetCache;
use super::uniforms::{BlurUniforms, GlitterUniforms, StarfieldUniforms};

/// Gaussian sigma of the bloom blur, in texels. Fixed per effect; not a user
/// knob at this layer.
const BLUR_RADIUS: f32 = 5.3;

/// Clear color of the direct glitter pass.
const GLITTER_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.3,
    g: 0.9,
    b: 0.6,
    a: 1.0,
};

/// Owns every GPU object needed to render the effect and executes the pass
/// sequence for each accepted redraw.
///
/// Pipelines are compiled once at construction; per-frame work is limited to
/// uniform uploads and command recording. All passes of a frame go into one
/// encoder and one submission, so glitter → blur → composite ordering holds
/// and frames never overlap.
pub(crate) struct RenderGraph {
    context: GpuContext,
    vertex_buffer: wgpu::Buffer,
    passes: PassSet,
}

enum PassSet {
    Glitter(GlitterPasses),
    Starfield(StarfieldPasses),
}

struct GlitterPasses {
    pipelines: GlitterPipelines,
    sparkle: SparkleSettings,
    uniform_buffer: wgpu::Buffer,
    uniform_group: wgpu::BindGroup,
    blur_h_buffer: wgpu::Buffer,
    blur_h_group: wgpu::BindGroup,
    blur_v_buffer: wgpu::Buffer,
    blur_v_group: wgpu::BindGroup,
    targets: TargetCache,
}

struct StarfieldPasses {
    pipeline: StarfieldPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_group: wgpu::BindGroup,
}

impl RenderGraph {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        effect: &EffectConfig,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let vertices = gradient_quad(effect.corners());
        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("gradient quad vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let passes = match effect {
            EffectConfig::Glitter(config) => {
                let pipelines = GlitterPipelines::new(&context.device, context.surface_format);
                let uniform_buffer = make_uniform_buffer::<GlitterUniforms>(&context.device, "glitter uniforms");
                let uniform_group = make_uniform_group(
                    &context.device,
                    "glitter uniform group",
                    &pipelines.uniform_layout,
                    &uniform_buffer,
                );
                let blur_h_buffer = make_uniform_buffer::<BlurUniforms>(&context.device, "horizontal blur uniforms");
                let blur_v_buffer = make_uniform_buffer::<BlurUniforms>(&context.device, "vertical blur uniforms");
                let blur_h_group = make_uniform_group(
                    &context.device,
                    "horizontal blur group",
                    &pipelines.blur_layout,
                    &blur_h_buffer,
                );
                let blur_v_group = make_uniform_group(
                    &context.device,
                    "vertical blur group",
                    &pipelines.blur_layout,
                    &blur_v_buffer,
                );
                PassSet::Glitter(GlitterPasses {
                    pipelines,
                    sparkle: config.sparkle,
                    uniform_buffer,
                    uniform_group,
                    blur_h_buffer,
                    blur_h_group,
                    blur_v_buffer,
                    blur_v_group,
                    targets: TargetCache::new(),
                })
            }
            EffectConfig::Starfield(_) => {
                let pipeline = StarfieldPipeline::new(&context.device, context.surface_format);
                let uniform_buffer = make_uniform_buffer::<StarfieldUniforms>(&context.device, "starfield uniforms");
                let uniform_group = make_uniform_group(
                    &context.device,
                    "starfield uniform group",
                    &pipeline.uniform_layout,
                    &uniform_buffer,
                );
                PassSet::Starfield(StarfieldPasses {
                    pipeline,
                    uniform_buffer,
                    uniform_group,
                })
            }
        };

        Ok(Self {
            context,
            vertex_buffer,
            passes,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    /// Drawable size changed: reconfigure the swapchain and drop cached
    /// offscreen targets so they are rebuilt at the new dimensions.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if self.context.resize(new_size) {
            if let PassSet::Glitter(glitter) = &mut self.passes {
                glitter.targets.invalidate();
            }
        }
    }

    /// Records and submits one frame.
    ///
    /// Surface errors (no current drawable) bubble up so the shell can
    /// reconfigure or skip; nothing in here panics on a missing per-frame
    /// resource.
    pub(crate) fn render_frame(
        &mut self,
        tilt: [f32; 3],
        display_scale: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let screen_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("effect encoder"),
            });

        match &mut self.passes {
            PassSet::Glitter(glitter) => {
                let uniforms = GlitterUniforms::new(
                    self.context.size,
                    display_scale,
                    tilt,
                    &glitter.sparkle,
                    self.context.wide_color,
                );
                self.context
                    .queue
                    .write_buffer(&glitter.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
                self.context.queue.write_buffer(
                    &glitter.blur_h_buffer,
                    0,
                    bytemuck::bytes_of(&BlurUniforms::horizontal(self.context.size, BLUR_RADIUS)),
                );
                self.context.queue.write_buffer(
                    &glitter.blur_v_buffer,
                    0,
                    bytemuck::bytes_of(&BlurUniforms::vertical(self.context.size, BLUR_RADIUS)),
                );

                let targets = glitter.targets.ensure(
                    &self.context.device,
                    self.context.surface_format,
                    self.context.size,
                    &glitter.pipelines.texture_layout,
                    &glitter.pipelines.sampler,
                );

                // Direct glitter pass into the swapchain.
                {
                    let mut pass = begin_pass(
                        &mut encoder,
                        "glitter screen pass",
                        &screen_view,
                        wgpu::LoadOp::Clear(GLITTER_CLEAR),
                    );
                    pass.set_pipeline(&glitter.pipelines.color);
                    pass.set_bind_group(0, &glitter.uniform_group, &[]);
                    pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                    pass.draw(0..4, 0..1);
                }

                // Same shading into the offscreen sparkle target; only the
                // glints carry alpha, so the blurred result composites as a
                // halo rather than a full-screen wash.
                {
                    let mut pass = begin_pass(
                        &mut encoder,
                        "glitter offscreen pass",
                        &targets.sparkle_view,
                        wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    );
                    pass.set_pipeline(&glitter.pipelines.color);
                    pass.set_bind_group(0, &glitter.uniform_group, &[]);
                    pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                    pass.draw(0..4, 0..1);
                }

                // Separable blur: sparkle → scratch, scratch → sparkle.
                {
                    let mut pass = begin_pass(
                        &mut encoder,
                        "horizontal blur pass",
                        &targets.scratch_view,
                        wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    );
                    pass.set_pipeline(&glitter.pipelines.blur);
                    pass.set_bind_group(0, &glitter.blur_h_group, &[]);
                    pass.set_bind_group(1, &targets.sparkle_input, &[]);
                    pass.draw(0..3, 0..1);
                }
                {
                    let mut pass = begin_pass(
                        &mut encoder,
                        "vertical blur pass",
                        &targets.sparkle_view,
                        wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                    );
                    pass.set_pipeline(&glitter.pipelines.blur);
                    pass.set_bind_group(0, &glitter.blur_v_group, &[]);
                    pass.set_bind_group(1, &targets.scratch_input, &[]);
                    pass.draw(0..3, 0..1);
                }

                // Blurred bloom over the already-drawn frame.
                {
                    let mut pass = begin_pass(
                        &mut encoder,
                        "composite pass",
                        &screen_view,
                        wgpu::LoadOp::Load,
                    );
                    pass.set_pipeline(&glitter.pipelines.composite);
                    pass.set_bind_group(0, &glitter.blur_v_group, &[]);
                    pass.set_bind_group(1, &targets.sparkle_input, &[]);
                    pass.draw(0..3, 0..1);
                }
            }
            PassSet::Starfield(starfield) => {
                let uniforms = StarfieldUniforms::new(self.context.size, display_scale, tilt);
                self.context.queue.write_buffer(
                    &starfield.uniform_buffer,
                    0,
                    bytemuck::bytes_of(&uniforms),
                );
                let mut pass = begin_pass(
                    &mut encoder,
                    "starfield pass",
                    &screen_view,
                    wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                );
                pass.set_pipeline(&starfield.pipeline.pipeline);
                pass.set_bind_group(0, &starfield.uniform_group, &[]);
                pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                pass.draw(0..4, 0..1);
            }
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        tracing::trace!(
            width = self.context.size.width,
            height = self.context.size.height,
            "presented frame"
        );
        Ok(())
    }
}

fn begin_pass<'encoder>(
    encoder: &'encoder mut wgpu::CommandEncoder,
    label: &str,
    view: &'encoder wgpu::TextureView,
    load: wgpu::LoadOp<wgpu::Color>,
) -> wgpu::RenderPass<'encoder> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load,
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        occlusion_query_set: None,
        timestamp_writes: None,
    })
}

fn make_uniform_buffer<U>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<U>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn make_uniform_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}
