use bytemuck::{Pod, Zeroable};
use glitterconfig::SparkleSettings;
use winit::dpi::PhysicalSize;

/// CPU mirror of the glitter fragment uniform block.
///
/// Rebuilt from scratch every accepted redraw out of the current tilt vector
/// and the immutable sparkle settings; the layout must match the WGSL struct
/// in `shaders/glitter.wgsl` field for field.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct GlitterUniforms {
    pub display_size: [f32; 2],
    pub display_scale: f32,
    pub cell_size: f32,
    pub tilt: [f32; 3],
    pub whiteness: f32,
    pub darkness: f32,
    pub background_light: f32,
    pub hue_variance: f32,
    pub wide_color: u32,
}

unsafe impl Zeroable for GlitterUniforms {}
unsafe impl Pod for GlitterUniforms {}

impl GlitterUniforms {
    pub fn new(
        size: PhysicalSize<u32>,
        display_scale: f32,
        tilt: [f32; 3],
        sparkle: &SparkleSettings,
        wide_color: bool,
    ) -> Self {
        Self {
            display_size: [size.width.max(1) as f32, size.height.max(1) as f32],
            display_scale,
            cell_size: sparkle.cell_size(),
            tilt,
            whiteness: sparkle.whiteness as f32,
            darkness: sparkle.darkness as f32,
            background_light: sparkle.background_variance as f32,
            hue_variance: (sparkle.hue_variance / 10.0) as f32,
            wide_color: wide_color as u32,
        }
    }
}

/// CPU mirror of the starfield fragment uniform block.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct StarfieldUniforms {
    pub display_size: [f32; 2],
    pub display_scale: f32,
    _pad0: f32,
    pub tilt: [f32; 3],
    _pad1: f32,
}

unsafe impl Zeroable for StarfieldUniforms {}
unsafe impl Pod for StarfieldUniforms {}

impl StarfieldUniforms {
    pub fn new(size: PhysicalSize<u32>, display_scale: f32, tilt: [f32; 3]) -> Self {
        Self {
            display_size: [size.width.max(1) as f32, size.height.max(1) as f32],
            display_scale,
            _pad0: 0.0,
            tilt,
            _pad1: 0.0,
        }
    }
}

/// CPU mirror of the blur uniform block; one instance per blur direction.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct BlurUniforms {
    /// One-texel step along the blur axis in UV space.
    pub step: [f32; 2],
    /// Gaussian sigma in texels.
    pub radius: f32,
    _pad: f32,
}

unsafe impl Zeroable for BlurUniforms {}
unsafe impl Pod for BlurUniforms {}

impl BlurUniforms {
    pub fn horizontal(size: PhysicalSize<u32>, radius: f32) -> Self {
        Self {
            step: [1.0 / size.width.max(1) as f32, 0.0],
            radius,
            _pad: 0.0,
        }
    }

    pub fn vertical(size: PhysicalSize<u32>, radius: f32) -> Self {
        Self {
            step: [0.0, 1.0 / size.height.max(1) as f32],
            radius,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{align_of, size_of};

    /// Sanity-checks that the CPU mirrors match the layouts baked into the
    /// WGSL uniform blocks.
    #[test]
    fn glitter_uniforms_follow_wgsl_layout() {
        let uniforms = GlitterUniforms::new(
            PhysicalSize::new(1920, 1080),
            2.0,
            [0.0, 0.0, 1.0],
            &SparkleSettings::default(),
            false,
        );
        let base = &uniforms as *const _ as usize;

        assert_eq!(align_of::<GlitterUniforms>(), 16);
        assert_eq!(size_of::<GlitterUniforms>(), 48);
        assert_eq!((&uniforms.display_size as *const _ as usize) - base, 0);
        assert_eq!((&uniforms.display_scale as *const _ as usize) - base, 8);
        assert_eq!((&uniforms.cell_size as *const _ as usize) - base, 12);
        assert_eq!((&uniforms.tilt as *const _ as usize) - base, 16);
        assert_eq!((&uniforms.whiteness as *const _ as usize) - base, 28);
        assert_eq!((&uniforms.wide_color as *const _ as usize) - base, 44);
    }

    #[test]
    fn starfield_and_blur_uniforms_are_sixteen_byte_blocks() {
        assert_eq!(size_of::<StarfieldUniforms>(), 32);
        assert_eq!(align_of::<StarfieldUniforms>(), 16);
        assert_eq!(size_of::<BlurUniforms>(), 16);
    }

    #[test]
    fn uniform_values_come_from_config_and_tilt() {
        let sparkle = SparkleSettings::default();
        let uniforms = GlitterUniforms::new(
            PhysicalSize::new(800, 600),
            1.0,
            [0.1, 0.2, 0.97],
            &sparkle,
            true,
        );
        assert_eq!(uniforms.display_size, [800.0, 600.0]);
        assert!((uniforms.cell_size - 0.46).abs() < 1e-6);
        assert_eq!(uniforms.whiteness, 0.75);
        // The hue variance reaches the shader pre-divided by ten.
        assert!((uniforms.hue_variance - 0.01).abs() < 1e-6);
        assert_eq!(uniforms.wide_color, 1);
        assert_eq!(uniforms.tilt, [0.1, 0.2, 0.97]);
    }

    #[test]
    fn blur_steps_are_one_texel() {
        let size = PhysicalSize::new(400, 200);
        let horizontal = BlurUniforms::horizontal(size, 5.3);
        let vertical = BlurUniforms::vertical(size, 5.3);
        assert_eq!(horizontal.step, [1.0 / 400.0, 0.0]);
        assert_eq!(vertical.step, [0.0, 1.0 / 200.0]);
        assert_eq!(horizontal.radius, 5.3);
    }
}
