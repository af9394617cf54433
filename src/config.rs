//! Game configuration
//!
//! `GameConfig` is the on-disk JSON record. It is validated once into a
//! [`SimConfig`], which caches resolved palettes and is immutable for the
//! lifetime of a session.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{Rgb, parse_color};
use crate::consts::*;
use crate::error::ConfigError;

fn default_radius() -> u32 {
    DEFAULT_ENTITY_RADIUS
}

fn default_good_ratio() -> f32 {
    DEFAULT_GOOD_RATIO
}

fn default_max_bumps() -> u32 {
    DEFAULT_MAX_BUMPS
}

/// Game configuration as read from a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Arena width in pixels
    #[serde(alias = "screen_width")]
    pub arena_width: u32,
    /// Arena height in pixels
    #[serde(alias = "screen_height")]
    pub arena_height: u32,
    /// Radius shared by every disc
    #[serde(default = "default_radius", alias = "circle_radius")]
    pub entity_radius: u32,
    /// Live disc count kept up by replenishment
    #[serde(alias = "num_circles")]
    pub target_population: u32,
    /// Velocity components are drawn from [-speed_range, speed_range] (px/frame)
    #[serde(alias = "circle_speed")]
    pub speed_range: f32,
    /// Colors that score as good clicks
    pub good_colors: Vec<String>,
    /// Colors that score as bad clicks
    pub bad_colors: Vec<String>,
    /// Probability that a spawned disc uses a good color
    #[serde(default = "default_good_ratio", alias = "good_circle_ratio")]
    pub good_ratio: f32,
    /// Wall bumps before a disc expires
    #[serde(default = "default_max_bumps")]
    pub max_bumps: u32,
    /// Ticks per second
    #[serde(alias = "fps")]
    pub frame_rate: f64,
    /// Session length in seconds
    pub duration: f64,
    /// Ticks between startup spawns (0 = fill immediately)
    #[serde(default)]
    pub fill_interval_ticks: u32,
    /// RNG seed for reproducible sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    /// Phone-sized reference setup
    fn default() -> Self {
        Self {
            arena_width: 430,
            arena_height: 950,
            entity_radius: DEFAULT_ENTITY_RADIUS,
            target_population: 5,
            speed_range: 3.0,
            good_colors: vec!["rgb(144, 167, 112)".to_string()],
            bad_colors: vec!["rgb(239, 64, 56)".to_string()],
            good_ratio: DEFAULT_GOOD_RATIO,
            max_bumps: DEFAULT_MAX_BUMPS,
            frame_rate: 60.0,
            duration: 30.0,
            fill_interval_ticks: 0,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON text (no validation)
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file (no validation)
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Check every field and resolve the palettes
    pub fn validate(&self) -> Result<SimConfig, ConfigError> {
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("entity_radius", self.entity_radius)?;
        positive("target_population", self.target_population)?;
        positive("max_bumps", self.max_bumps)?;

        let diameter = u64::from(self.entity_radius) * 2;
        if diameter > u64::from(self.arena_width) || diameter > u64::from(self.arena_height) {
            return Err(ConfigError::invalid(
                "entity_radius",
                format!(
                    "a disc of radius {} does not fit a {}x{} arena",
                    self.entity_radius, self.arena_width, self.arena_height
                ),
            ));
        }

        positive_finite("speed_range", f64::from(self.speed_range))?;
        // Velocities are drawn from a span of 2 * speed_range, which must stay finite
        if !(self.speed_range * 2.0).is_finite() {
            return Err(ConfigError::invalid(
                "speed_range",
                format!("{} is too large", self.speed_range),
            ));
        }
        positive_finite("frame_rate", self.frame_rate)?;
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ConfigError::invalid(
                "duration",
                format!("must be a non-negative number of seconds, got {}", self.duration),
            ));
        }
        if !(0.0..=1.0).contains(&self.good_ratio) {
            return Err(ConfigError::invalid(
                "good_ratio",
                format!("must be within [0, 1], got {}", self.good_ratio),
            ));
        }

        let good_palette = resolve_palette("good_colors", &self.good_colors)?;
        let bad_palette = resolve_palette("bad_colors", &self.bad_colors)?;

        Ok(SimConfig {
            arena_width: self.arena_width as f32,
            arena_height: self.arena_height as f32,
            radius: self.entity_radius as f32,
            target_population: self.target_population as usize,
            speed_range: self.speed_range,
            good_palette,
            bad_palette,
            good_ratio: self.good_ratio,
            max_bumps: self.max_bumps,
            frame_rate: self.frame_rate,
            duration: self.duration,
            fill_interval_ticks: self.fill_interval_ticks,
        })
    }
}

fn positive(field: &str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(field, "must be greater than zero"));
    }
    Ok(())
}

fn positive_finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ));
    }
    Ok(())
}

fn resolve_palette(field: &str, specs: &[String]) -> Result<Vec<Rgb>, ConfigError> {
    if specs.is_empty() {
        return Err(ConfigError::invalid(field, "must list at least one color"));
    }
    specs.iter().map(|s| parse_color(s)).collect()
}

/// Validated, resolved configuration consumed by the simulation
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub radius: f32,
    pub target_population: usize,
    pub speed_range: f32,
    /// Resolved good colors (never empty)
    pub good_palette: Vec<Rgb>,
    /// Resolved bad colors (never empty)
    pub bad_palette: Vec<Rgb>,
    pub good_ratio: f32,
    pub max_bumps: u32,
    pub frame_rate: f64,
    pub duration: f64,
    pub fill_interval_ticks: u32,
}

impl SimConfig {
    /// Number of frames the session is allowed to run
    ///
    /// The product is rounded up, less a small tolerance so that decimal
    /// durations like 0.1 s at 60 fps give 6 frames rather than 7.
    pub fn frame_budget(&self) -> u64 {
        let frames = self.duration * self.frame_rate;
        (frames - FRAME_BUDGET_TOLERANCE).ceil().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY_JSON: &str = r##"{
        "screen_width": 430,
        "screen_height": 950,
        "num_circles": 10,
        "circle_speed": 3.5,
        "fps": 60,
        "duration": 30,
        "good_colors": ["#FFFFFF", "rgb(243, 208, 141)"],
        "bad_colors": ["rgb(235, 106, 74)"],
        "good_circle_ratio": 0.7,
        "max_bumps": 3
    }"##;

    #[test]
    fn test_legacy_keys_accepted() {
        let config = GameConfig::from_json_str(LEGACY_JSON).unwrap();
        assert_eq!(config.arena_width, 430);
        assert_eq!(config.target_population, 10);
        assert_eq!(config.entity_radius, DEFAULT_ENTITY_RADIUS);
        assert_eq!(config.frame_rate, 60.0);

        let sim = config.validate().unwrap();
        assert_eq!(sim.good_palette, vec![Rgb::new(255, 255, 255), Rgb::new(243, 208, 141)]);
        assert_eq!(sim.bad_palette, vec![Rgb::new(235, 106, 74)]);
        assert_eq!(sim.frame_budget(), 1800);
    }

    #[test]
    fn test_defaults_applied() {
        let json = r#"{
            "arena_width": 200, "arena_height": 200, "target_population": 1,
            "speed_range": 1.0, "good_colors": ["white"], "bad_colors": ["black"],
            "frame_rate": 30, "duration": 1
        }"#;
        let config = GameConfig::from_json_str(json).unwrap();
        assert_eq!(config.good_ratio, DEFAULT_GOOD_RATIO);
        assert_eq!(config.max_bumps, DEFAULT_MAX_BUMPS);
        assert_eq!(config.fill_interval_ticks, 0);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn test_missing_field_is_invalid_configuration() {
        let err = GameConfig::from_json_str(r#"{"arena_width": 100}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_negative_integer_rejected() {
        let json = LEGACY_JSON.replace("\"num_circles\": 10", "\"num_circles\": -1");
        let err = GameConfig::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_out_of_range_fields() {
        let base = GameConfig::default();
        let cases: Vec<(&str, GameConfig)> = vec![
            ("arena_width", GameConfig { arena_width: 0, ..base.clone() }),
            ("target_population", GameConfig { target_population: 0, ..base.clone() }),
            ("max_bumps", GameConfig { max_bumps: 0, ..base.clone() }),
            ("speed_range", GameConfig { speed_range: 0.0, ..base.clone() }),
            ("speed_range", GameConfig { speed_range: f32::NAN, ..base.clone() }),
            ("speed_range", GameConfig { speed_range: 3.0e38, ..base.clone() }),
            ("frame_rate", GameConfig { frame_rate: f64::INFINITY, ..base.clone() }),
            ("frame_rate", GameConfig { frame_rate: -60.0, ..base.clone() }),
            ("duration", GameConfig { duration: -1.0, ..base.clone() }),
            ("good_ratio", GameConfig { good_ratio: 1.5, ..base.clone() }),
            ("entity_radius", GameConfig { entity_radius: 300, ..base.clone() }),
            ("good_colors", GameConfig { good_colors: vec![], ..base.clone() }),
        ];
        for (expected, config) in cases {
            match config.validate() {
                Err(ConfigError::InvalidConfiguration { field, .. }) => assert_eq!(field, expected),
                other => panic!("{expected}: expected InvalidConfiguration, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_bad_color_rejected() {
        let config = GameConfig {
            bad_colors: vec!["red".into(), "definitely-not-a-color".into()],
            ..GameConfig::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidColorSpec { spec }) => assert_eq!(spec, "definitely-not-a-color"),
            other => panic!("expected InvalidColorSpec, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_duration_is_valid() {
        let config = GameConfig { duration: 0.0, ..GameConfig::default() };
        assert_eq!(config.validate().unwrap().frame_budget(), 0);
    }

    #[test]
    fn test_decimal_durations_do_not_overshoot() {
        let budget = |duration: f64, frame_rate: f64| {
            GameConfig { duration, frame_rate, ..GameConfig::default() }
                .validate()
                .unwrap()
                .frame_budget()
        };
        assert_eq!(budget(0.1, 60.0), 6);
        assert_eq!(budget(0.7, 60.0), 42);
        for tenths in 1..=300u64 {
            assert_eq!(budget(tenths as f64 / 10.0, 60.0), tenths * 6);
            assert_eq!(budget(tenths as f64 / 10.0, 30.0), tenths * 3);
        }
        // A partial frame still rounds up
        assert_eq!(budget(0.11, 60.0), 7);
    }

    #[test]
    fn test_largest_speed_range_spawns() {
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let config = GameConfig { speed_range: f32::MAX / 2.0, ..GameConfig::default() }
            .validate()
            .unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let disc = crate::sim::spawn(&config, &mut rng, 1);
        assert!(disc.vel.is_finite());
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let config = GameConfig::default();
        let parsed = GameConfig::from_json_str(&config.to_json_pretty()).unwrap();
        assert_eq!(parsed, config);
        assert!(parsed.validate().is_ok());
    }
}
