use glitterconfig::{CornerColors, GlitterConfig, ShimmerSettings, StarfieldConfig};

/// Which effect pipeline the surface renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    /// Multi-pass glitter: direct pass, offscreen pass, blur, composite.
    Glitter,
    /// Single-pass starfield.
    Starfield,
}

/// Effect selection together with its immutable configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectConfig {
    Glitter(GlitterConfig),
    Starfield(StarfieldConfig),
}

impl EffectConfig {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectConfig::Glitter(_) => EffectKind::Glitter,
            EffectConfig::Starfield(_) => EffectKind::Starfield,
        }
    }

    pub fn shimmer(&self) -> ShimmerSettings {
        match self {
            EffectConfig::Glitter(config) => config.shimmer,
            EffectConfig::Starfield(config) => config.shimmer,
        }
    }

    pub(crate) fn corners(&self) -> &CornerColors {
        match self {
            EffectConfig::Glitter(config) => &config.corners,
            EffectConfig::Starfield(config) => &config.corners,
        }
    }
}

/// Immutable configuration passed to the preview window at start-up.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Effect selection plus its preset.
    pub effect: EffectConfig,
    /// Begin one shimmer episode right after launch.
    pub start_shimmer: bool,
    /// Start motion updates (and with them the tick loop) immediately.
    pub autostart_motion: bool,
    /// Feed a synthetic gravity wobble in place of a real sensor.
    pub synthetic_motion: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            surface_size: (1920, 1080),
            effect: EffectConfig::Glitter(GlitterConfig::default()),
            start_shimmer: false,
            autostart_motion: true,
            synthetic_motion: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_config_exposes_kind_and_shimmer() {
        let glitter = EffectConfig::Glitter(GlitterConfig::default());
        assert_eq!(glitter.kind(), EffectKind::Glitter);
        assert_eq!(glitter.shimmer().rotations, 2.0);

        let starfield = EffectConfig::Starfield(StarfieldConfig::default());
        assert_eq!(starfield.kind(), EffectKind::Starfield);
    }
}
