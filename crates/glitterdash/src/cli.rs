use std::path::PathBuf;

use clap::Parser;
use renderer::EffectKind;

#[derive(Parser, Debug)]
#[command(
    name = "glitterdash",
    author,
    version,
    about = "Tilt-reactive glitter shader preview",
    arg_required_else_help = false
)]
pub struct Cli {
    /// Effect preset TOML file; built-in defaults are used when omitted.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Effect to render: `glitter` or `starfield`.
    #[arg(
        long,
        value_name = "EFFECT",
        value_parser = parse_effect,
        default_value = "glitter"
    )]
    pub effect: EffectKind,

    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_dimensions)]
    pub size: Option<(u32, u32)>,

    /// Start one shimmer episode immediately after launch.
    #[arg(long)]
    pub shimmer: bool,

    /// Do not start motion updates at launch (toggle later with `m`).
    #[arg(long)]
    pub no_motion: bool,

    /// Feed a synthetic gravity wobble in place of a real sensor.
    #[arg(long)]
    pub synthetic_motion: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_effect(value: &str) -> Result<EffectKind, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "glitter" => Ok(EffectKind::Glitter),
        "starfield" | "stars" => Ok(EffectKind::Starfield),
        other => Err(format!(
            "unknown effect '{other}'; expected glitter or starfield"
        )),
    }
}

pub fn parse_dimensions(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid width".to_string())?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "invalid height".to_string())?;
    if width == 0 || height == 0 {
        return Err("dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_effect_names() {
        assert_eq!(parse_effect("glitter").unwrap(), EffectKind::Glitter);
        assert_eq!(parse_effect("Starfield").unwrap(), EffectKind::Starfield);
        assert_eq!(parse_effect("stars").unwrap(), EffectKind::Starfield);
        assert!(parse_effect("plasma").is_err());
    }

    #[test]
    fn parses_dimensions() {
        assert_eq!(parse_dimensions("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_dimensions("640X480").unwrap(), (640, 480));
        assert!(parse_dimensions("1280").is_err());
        assert!(parse_dimensions("0x720").is_err());
    }
}
