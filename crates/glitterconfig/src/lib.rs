use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Canonical preset colors.
    pub const BRIGHT_PINK: Self = Self::rgb(1.0, 0.0, 194.0 / 255.0);
    pub const BRIGHT_PURPLE: Self = Self::rgb(140.0 / 255.0, 0.0, 1.0);
}

/// Per-corner colors of the full-screen gradient quad.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CornerColors {
    pub top_left: Color,
    pub bottom_left: Color,
    pub top_right: Color,
    pub bottom_right: Color,
}

impl Default for CornerColors {
    /// Purple across the top fading into pink across the bottom.
    fn default() -> Self {
        Self {
            top_left: Color::BRIGHT_PURPLE,
            bottom_left: Color::BRIGHT_PINK,
            top_right: Color::BRIGHT_PURPLE,
            bottom_right: Color::BRIGHT_PINK,
        }
    }
}

/// Parameters of one shimmer episode: a bounded animated sweep layered on
/// top of the ambient tilt.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShimmerSettings {
    /// Episode length.
    #[serde(deserialize_with = "deserialize_duration")]
    pub duration: Duration,
    /// Full rotations the shimmer angle sweeps through over the episode.
    pub rotations: f64,
    /// Peak displacement the impulse adds to the tilt vector.
    pub strength: f64,
}

impl Default for ShimmerSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(3),
            rotations: 2.0,
            strength: 0.3,
        }
    }
}

/// Appearance of the glitter field itself.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SparkleSettings {
    /// Cell coarseness on a 0..10 scale; larger means bigger sparkles.
    pub size: f64,
    /// How strongly lit cells wash out toward white.
    pub whiteness: f64,
    /// Portion of cells that stay dark.
    pub darkness: f64,
    /// Brightness variation of the background between cells.
    pub background_variance: f64,
    /// Hue spread of individual sparkles around the base gradient.
    pub hue_variance: f64,
}

impl Default for SparkleSettings {
    fn default() -> Self {
        Self {
            size: 5.4,
            whiteness: 0.75,
            darkness: 0.15,
            background_variance: 0.25,
            hue_variance: 0.1,
        }
    }
}

impl SparkleSettings {
    /// Normalized cell size as the shader consumes it: the 0..10 user scale
    /// inverted onto (0, 1].
    pub fn cell_size(&self) -> f32 {
        ((10.0 - self.size) / 10.0) as f32
    }
}

/// Immutable configuration for the glitter effect, supplied once at
/// construction and never mutated during a session.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GlitterConfig {
    pub corners: CornerColors,
    pub shimmer: ShimmerSettings,
    pub sparkle: SparkleSettings,
}

/// Immutable configuration for the starfield variant: the same gradient and
/// shimmer inputs, no sparkle appearance block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StarfieldConfig {
    pub corners: CornerColors,
    pub shimmer: ShimmerSettings,
}

impl GlitterConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: GlitterConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shimmer(&self.shimmer)?;
        let sparkle = &self.sparkle;
        if !(0.0..10.0).contains(&sparkle.size) {
            return Err(ConfigError::Invalid(format!(
                "sparkle.size must be in [0, 10), got {}",
                sparkle.size
            )));
        }
        for (name, value) in [
            ("whiteness", sparkle.whiteness),
            ("darkness", sparkle.darkness),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "sparkle.{name} must be in [0, 1], got {value}"
                )));
            }
        }
        for (name, value) in [
            ("background_variance", sparkle.background_variance),
            ("hue_variance", sparkle.hue_variance),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "sparkle.{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl StarfieldConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: StarfieldConfig = toml::from_str(input)?;
        validate_shimmer(&config.shimmer)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }
}

fn validate_shimmer(shimmer: &ShimmerSettings) -> Result<(), ConfigError> {
    if shimmer.duration.is_zero() {
        return Err(ConfigError::Invalid(
            "shimmer.duration must be greater than zero".into(),
        ));
    }
    if shimmer.rotations <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "shimmer.rotations must be positive, got {}",
            shimmer.rotations
        )));
    }
    if shimmer.strength < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "shimmer.strength must be non-negative, got {}",
            shimmer.strength
        )));
    }
    Ok(())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Hex(String),
            Components {
                red: f32,
                green: f32,
                blue: f32,
                #[serde(default = "default_alpha")]
                alpha: f32,
            },
        }

        match Helper::deserialize(deserializer)? {
            Helper::Hex(raw) => parse_hex_color(&raw).map_err(de::Error::custom),
            Helper::Components {
                red,
                green,
                blue,
                alpha,
            } => Ok(Color {
                red,
                green,
                blue,
                alpha,
            }),
        }
    }
}

fn default_alpha() -> f32 {
    1.0
}

/// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
fn parse_hex_color(raw: &str) -> Result<Color, String> {
    let digits = raw.trim().trim_start_matches('#');
    if digits.len() != 6 && digits.len() != 8 {
        return Err(format!(
            "invalid color '{raw}'; expected #rrggbb or #rrggbbaa"
        ));
    }
    let channel = |range: std::ops::Range<usize>| -> Result<f32, String> {
        u8::from_str_radix(&digits[range], 16)
            .map(|value| value as f32 / 255.0)
            .map_err(|_| format!("invalid hex digits in color '{raw}'"))
    };
    Ok(Color {
        red: channel(0..2)?,
        green: channel(2..4)?,
        blue: channel(4..6)?,
        alpha: if digits.len() == 8 { channel(6..8)? } else { 1.0 },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
[corners]
top_left = "#8c00ff"
bottom_left = "#ff00c2"
top_right = { red = 0.549, green = 0.0, blue = 1.0 }
bottom_right = "#ff00c2ff"

[shimmer]
duration = "3s"
rotations = 2
strength = 0.3

[sparkle]
size = 5.4
whiteness = 0.75
darkness = 0.15
background_variance = 0.25
hue_variance = 0.1
"##;

    #[test]
    fn parses_sample_config() {
        let config = GlitterConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.shimmer.duration, Duration::from_secs(3));
        assert_eq!(config.shimmer.rotations, 2.0);
        assert_eq!(config.corners.bottom_left, Color::BRIGHT_PINK);
        assert!((config.corners.top_left.red - 140.0 / 255.0).abs() < 1e-6);
        assert_eq!(config.corners.bottom_right.alpha, 1.0);
    }

    #[test]
    fn defaults_match_the_canonical_preset() {
        let config = GlitterConfig::default();
        assert_eq!(config.shimmer.duration, Duration::from_secs(3));
        assert_eq!(config.shimmer.rotations, 2.0);
        assert_eq!(config.shimmer.strength, 0.3);
        assert_eq!(config.sparkle.size, 5.4);
        assert_eq!(config.sparkle.whiteness, 0.75);
        assert_eq!(config.sparkle.darkness, 0.15);
        assert_eq!(config.sparkle.background_variance, 0.25);
        assert_eq!(config.sparkle.hue_variance, 0.1);
        assert_eq!(config.corners.top_left, Color::BRIGHT_PURPLE);
        config.validate().expect("defaults validate");
    }

    #[test]
    fn cell_size_inverts_the_user_scale() {
        let sparkle = SparkleSettings::default();
        assert!((sparkle.cell_size() - 0.46).abs() < 1e-6);
    }

    #[test]
    fn empty_input_yields_defaults() {
        let config = GlitterConfig::from_toml_str("").expect("empty config");
        assert_eq!(config, GlitterConfig::default());
    }

    #[test]
    fn rejects_zero_shimmer_duration() {
        let err = GlitterConfig::from_toml_str(
            r#"
[shimmer]
duration = 0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_out_of_range_sparkle_values() {
        let err = GlitterConfig::from_toml_str(
            r#"
[sparkle]
size = 10.0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GlitterConfig::from_toml_str(
            r#"
[sparkle]
whiteness = 1.5
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_hex_color() {
        let err = GlitterConfig::from_toml_str(
            r##"
[corners]
top_left = "#12345"
bottom_left = "#ff00c2"
top_right = "#ff00c2"
bottom_right = "#ff00c2"
"##,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn starfield_config_parses_and_defaults() {
        let config = StarfieldConfig::from_toml_str(
            r#"
[shimmer]
duration = "1500ms"
"#,
        )
        .expect("starfield config");
        assert_eq!(config.shimmer.duration, Duration::from_millis(1500));
        assert_eq!(config.shimmer.rotations, 2.0);
        assert_eq!(config.corners, CornerColors::default());
    }
}
