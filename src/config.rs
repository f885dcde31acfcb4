use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::raycast::CastParams;
use crate::tiles::CELL_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub light: LightConfig,
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Dungeon Light".into(),
            width: 800,
            height: 600,
        }
    }
}

/// Visibility tunables.
///
/// `corner_epsilon` is tied to scene scale: a probe drifts
/// `ray_length * corner_epsilon` sideways at full length, which must stay
/// well under one cell. The defaults give 1 px against 32 px cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub corner_epsilon: f64,
    pub ray_length: f64,
    pub max_fan_gap: f64,
    pub view_radius: f64,
    pub shadow_alpha: f32,
    pub cache_segments: bool,
    pub show_rays: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        let cast = CastParams::default();
        Self {
            corner_epsilon: cast.corner_epsilon,
            ray_length: cast.ray_length,
            max_fan_gap: cast.max_fan_gap,
            view_radius: 1000.0,
            shadow_alpha: 0.7,
            cache_segments: false,
            show_rays: false,
        }
    }
}

impl LightConfig {
    pub fn cast_params(&self) -> CastParams {
        CastParams {
            corner_epsilon: self.corner_epsilon,
            ray_length: self.ray_length,
            max_fan_gap: self.max_fan_gap,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            light: LightConfig::default(),
            log_filter: "info".into(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.light;
        let cell = CELL_SIZE as f64;

        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be non-zero"));
        }
        if !(l.ray_length.is_finite() && l.ray_length > 0.0) {
            return Err(invalid("light.ray_length", "must be a positive number"));
        }
        if !(l.corner_epsilon.is_finite() && l.corner_epsilon > 0.0) {
            return Err(invalid("light.corner_epsilon", "must be a positive number"));
        }
        if l.ray_length * l.corner_epsilon >= cell / 2.0 {
            return Err(invalid(
                "light.corner_epsilon",
                format!(
                    "probe drift {:.2} at full ray length must stay under half a cell ({})",
                    l.ray_length * l.corner_epsilon,
                    cell / 2.0
                ),
            ));
        }
        if !(l.max_fan_gap.is_finite()
            && l.max_fan_gap > 0.0
            && l.max_fan_gap <= std::f64::consts::FRAC_PI_2)
        {
            return Err(invalid("light.max_fan_gap", "must be in (0, pi/2]"));
        }
        if !(l.view_radius.is_finite() && l.view_radius >= cell) {
            return Err(invalid("light.view_radius", format!("must be at least one cell ({cell})")));
        }
        if !(0.0..=1.0).contains(&l.shadow_alpha) {
            return Err(invalid("light.shadow_alpha", "must be in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().expect("defaults validate");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.light.shadow_alpha, 0.7);
        assert_eq!(config.light.cast_params(), CastParams::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            log_filter = "debug"

            [light]
            show_rays = true
            view_radius = 320.0
            "#,
        )
        .expect("valid config");
        assert!(config.light.show_rays);
        assert_eq!(config.light.view_radius, 320.0);
        assert_eq!(config.light.ray_length, 2000.0);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.window.height, 600);
    }

    #[test]
    fn test_rejects_large_epsilon() {
        let err = Config::from_toml_str("[light]\ncorner_epsilon = 0.1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "light.corner_epsilon", .. }));
    }

    #[test]
    fn test_rejects_small_radius() {
        let err = Config::from_toml_str("[light]\nview_radius = 4.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "light.view_radius", .. }));
    }

    #[test]
    fn test_rejects_bad_alpha() {
        let err = Config::from_toml_str("[light]\nshadow_alpha = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "light.shadow_alpha", .. }));
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml_str("[light\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
