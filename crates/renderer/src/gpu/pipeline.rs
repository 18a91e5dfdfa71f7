use bytemuck::{Pod, Zeroable};
use glitterconfig::{Color, CornerColors};

use super::uniforms::{BlurUniforms, GlitterUniforms, StarfieldUniforms};

const GLITTER_SHADER: &str = include_str!("../shaders/glitter.wgsl");
const STARFIELD_SHADER: &str = include_str!("../shaders/starfield.wgsl");
const POST_SHADER: &str = include_str!("../shaders/post.wgsl");

/// One corner of the full-screen gradient quad.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

unsafe impl Zeroable for ColorVertex {}
unsafe impl Pod for ColorVertex {}

impl ColorVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color: [color.red, color.green, color.blue, color.alpha],
        }
    }
}

/// Full-screen quad in triangle-strip order, one configured color per corner.
pub(crate) fn gradient_quad(corners: &CornerColors) -> [ColorVertex; 4] {
    [
        ColorVertex::new(-1.0, 1.0, corners.top_left),
        ColorVertex::new(-1.0, -1.0, corners.bottom_left),
        ColorVertex::new(1.0, 1.0, corners.top_right),
        ColorVertex::new(1.0, -1.0, corners.bottom_right),
    ]
}

fn uniform_layout(device: &wgpu::Device, label: &str, size: u64) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        }],
    })
}

fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("pass input layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Classic "over" blending: `src·srcAlpha + dst·(1−srcAlpha)` for color,
/// source weight 1 for alpha.
fn over_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

fn quad_pipeline(
    device: &wgpu::Device,
    label: &str,
    module: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_main"),
            buffers: &[ColorVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}

fn post_pipeline(
    device: &wgpu::Device,
    label: &str,
    module: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    entry_point: &str,
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module,
            entry_point: Some(entry_point),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}

/// Pipeline objects for the multi-pass glitter effect, built once at
/// construction and immutable afterwards.
pub(crate) struct GlitterPipelines {
    pub uniform_layout: wgpu::BindGroupLayout,
    pub blur_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
    /// Gradient quad + sparkle shading; used for both the direct screen pass
    /// and the offscreen pass feeding the blur.
    pub color: wgpu::RenderPipeline,
    /// Separable one-axis blur.
    pub blur: wgpu::RenderPipeline,
    /// Alpha-composite of the blurred texture over the drawn frame.
    pub composite: wgpu::RenderPipeline,
}

impl GlitterPipelines {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let glitter_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("glitter shader"),
            source: wgpu::ShaderSource::Wgsl(GLITTER_SHADER.into()),
        });
        let post_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post shader"),
            source: wgpu::ShaderSource::Wgsl(POST_SHADER.into()),
        });

        let uniform_layout = uniform_layout(
            device,
            "glitter uniform layout",
            std::mem::size_of::<GlitterUniforms>() as u64,
        );
        let blur_layout = uniform_layout_for_blur(device);
        let texture_layout = texture_layout(device);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pass input sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let color_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("glitter pipeline layout"),
                bind_group_layouts: &[&uniform_layout],
                push_constant_ranges: &[],
            });
        let post_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("post pipeline layout"),
                bind_group_layouts: &[&blur_layout, &texture_layout],
                push_constant_ranges: &[],
            });

        let color = quad_pipeline(device, "glitter pipeline", &glitter_module, &color_pipeline_layout, format);
        let blur = post_pipeline(
            device,
            "blur pipeline",
            &post_module,
            &post_pipeline_layout,
            "fs_blur",
            format,
            wgpu::BlendState::REPLACE,
        );
        let composite = post_pipeline(
            device,
            "composite pipeline",
            &post_module,
            &post_pipeline_layout,
            "fs_composite",
            format,
            over_blend(),
        );

        Self {
            uniform_layout,
            blur_layout,
            texture_layout,
            sampler,
            color,
            blur,
            composite,
        }
    }
}

fn uniform_layout_for_blur(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    uniform_layout(
        device,
        "blur uniform layout",
        std::mem::size_of::<BlurUniforms>() as u64,
    )
}

/// Pipeline objects for the single-pass starfield effect.
pub(crate) struct StarfieldPipeline {
    pub uniform_layout: wgpu::BindGroupLayout,
    pub pipeline: wgpu::RenderPipeline,
}

impl StarfieldPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfield shader"),
            source: wgpu::ShaderSource::Wgsl(STARFIELD_SHADER.into()),
        });
        let uniform_layout = uniform_layout(
            device,
            "starfield uniform layout",
            std::mem::size_of::<StarfieldUniforms>() as u64,
        );
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("starfield pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let pipeline = quad_pipeline(device, "starfield pipeline", &module, &pipeline_layout, format);
        Self {
            uniform_layout,
            pipeline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_quad_keeps_strip_corner_order() {
        let quad = gradient_quad(&CornerColors::default());
        assert_eq!(quad[0].position, [-1.0, 1.0]);
        assert_eq!(quad[1].position, [-1.0, -1.0]);
        assert_eq!(quad[2].position, [1.0, 1.0]);
        assert_eq!(quad[3].position, [1.0, -1.0]);
        // Purple top row, pink bottom row in the default preset.
        assert_eq!(quad[0].color, quad[2].color);
        assert_eq!(quad[1].color, quad[3].color);
        assert_ne!(quad[0].color, quad[1].color);
    }

    #[test]
    fn color_vertex_layout_covers_position_and_color() {
        let layout = ColorVertex::layout();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.attributes[1].offset, 8);
    }
}
