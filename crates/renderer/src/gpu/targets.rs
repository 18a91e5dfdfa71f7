use winit::dpi::PhysicalSize;

/// Offscreen color targets for the glitter blur chain, plus the texture bind
/// groups the blur/composite passes sample them through.
///
/// `sparkle` receives the offscreen glitter pass and, after the vertical blur
/// writes back into it, holds the finished bloom texture; `scratch` is the
/// intermediate between the two blur directions.
pub(crate) struct PassTargets {
    size: PhysicalSize<u32>,
    pub sparkle_view: wgpu::TextureView,
    pub scratch_view: wgpu::TextureView,
    pub sparkle_input: wgpu::BindGroup,
    pub scratch_input: wgpu::BindGroup,
    _sparkle: wgpu::Texture,
    _scratch: wgpu::Texture,
}

impl PassTargets {
    fn create(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        texture_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let (sparkle, sparkle_view) = color_target(device, "sparkle target", format, size);
        let (scratch, scratch_view) = color_target(device, "blur scratch target", format, size);
        let sparkle_input = input_bind_group(device, "sparkle input", texture_layout, &sparkle_view, sampler);
        let scratch_input = input_bind_group(device, "scratch input", texture_layout, &scratch_view, sampler);
        Self {
            size,
            sparkle_view,
            scratch_view,
            sparkle_input,
            scratch_input,
            _sparkle: sparkle,
            _scratch: scratch,
        }
    }
}

fn color_target(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    size: PhysicalSize<u32>,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn input_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// Lazily-built cache of [`PassTargets`], keyed by drawable size.
///
/// Targets are reused across frames and rebuilt exactly when the key no
/// longer matches; a cached target's dimensions therefore always equal the
/// current drawable's before use. Layout changes call [`TargetCache::invalidate`]
/// so the stale entry can never be picked up at the wrong size.
#[derive(Default)]
pub(crate) struct TargetCache {
    entry: Option<PassTargets>,
}

impl TargetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn ensure(
        &mut self,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        texture_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> &PassTargets {
        let stale = self
            .entry
            .as_ref()
            .map(|targets| targets.size != size)
            .unwrap_or(true);
        if stale {
            tracing::debug!(width = size.width, height = size.height, "rebuilding pass targets");
            self.entry = Some(PassTargets::create(device, format, size, texture_layout, sampler));
        }
        self.entry.as_ref().expect("pass targets just ensured")
    }
}
