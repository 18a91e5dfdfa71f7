use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use glitterconfig::{GlitterConfig, StarfieldConfig};
use renderer::{EffectConfig, EffectKind, GlitterView, ViewConfig};

use crate::cli::Cli;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run(cli: Cli) -> Result<()> {
    let effect = load_effect(&cli)?;
    let mut view_config = ViewConfig {
        effect,
        start_shimmer: cli.shimmer,
        autostart_motion: !cli.no_motion,
        synthetic_motion: cli.synthetic_motion,
        ..ViewConfig::default()
    };
    if let Some(size) = cli.size {
        view_config.surface_size = size;
    }

    tracing::info!(
        effect = ?cli.effect,
        width = view_config.surface_size.0,
        height = view_config.surface_size.1,
        "launching preview"
    );
    GlitterView::new(view_config).run()
}

fn load_effect(cli: &Cli) -> Result<EffectConfig> {
    let effect = match (cli.effect, &cli.config) {
        (EffectKind::Glitter, Some(path)) => EffectConfig::Glitter(
            GlitterConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
        ),
        (EffectKind::Glitter, None) => EffectConfig::Glitter(GlitterConfig::default()),
        (EffectKind::Starfield, Some(path)) => EffectConfig::Starfield(
            StarfieldConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
        ),
        (EffectKind::Starfield, None) => EffectConfig::Starfield(StarfieldConfig::default()),
    };
    Ok(effect)
}
