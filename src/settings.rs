//! Game settings and balance
//!
//! Loaded from a JSON file by the front end. Every field has a default, so a
//! partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lives at session start
    pub start_lives: u8,
    /// Boost gain applied to every velocity tier
    pub boost_gain: f32,
    pub jump_velocity: f32,
    pub boost_velocity: f32,
    pub super_boost_velocity: f32,

    // === Lava ===
    pub lava_speed: f32,
    pub lava_floor_offset: f32,
    pub lava_damage_band: f32,
    pub lava_trigger_band: f32,

    // === Camera ===
    pub camera_lerp: f32,
    pub camera_lead: f32,

    // === Timers ===
    pub bomb_fuse_secs: f64,
    pub smoke_trail_secs: f64,

    // === Player ===
    pub exhaust_birth_rate: f32,
    pub steer_anim_threshold: f32,
    pub steer_gain: f32,

    // === Level ===
    pub generation_lookahead: f32,
    pub cull_fraction: f32,
    /// Percent of placements that are platforms (rest are coins)
    pub platform_percent: u32,
    /// Percent of platforms that are normal (rest breakable)
    pub normal_platform_percent: u32,
    /// Percent of coins that are normal (rest special)
    pub normal_coin_percent: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_lives: START_LIVES,
            boost_gain: BOOST_GAIN,
            jump_velocity: JUMP_VELOCITY,
            boost_velocity: BOOST_VELOCITY,
            super_boost_velocity: SUPER_BOOST_VELOCITY,

            lava_speed: LAVA_SPEED,
            lava_floor_offset: LAVA_FLOOR_OFFSET,
            lava_damage_band: LAVA_DAMAGE_BAND,
            lava_trigger_band: LAVA_TRIGGER_BAND,

            camera_lerp: CAMERA_LERP,
            camera_lead: CAMERA_LEAD,

            bomb_fuse_secs: BOMB_FUSE_SECS,
            smoke_trail_secs: SMOKE_TRAIL_SECS,

            exhaust_birth_rate: EXHAUST_BIRTH_RATE,
            steer_anim_threshold: STEER_ANIM_THRESHOLD,
            steer_gain: STEER_GAIN,

            generation_lookahead: GENERATION_LOOKAHEAD,
            cull_fraction: CULL_FRACTION,
            platform_percent: PLATFORM_PERCENT,
            normal_platform_percent: NORMAL_PLATFORM_PERCENT,
            normal_coin_percent: NORMAL_COIN_PERCENT,
        }
    }
}

/// Front-end settings plus balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Visible area in scene units
    pub viewport_width: f32,
    pub viewport_height: f32,

    /// Player sprite size (drives wrap margin and the starting platform)
    pub player_width: f32,
    pub player_height: f32,

    /// Height of one background tile; `None` uses the viewport height
    pub background_tile_height: Option<f32>,

    /// Fixed seed for the first session; `None` picks one from entropy
    pub seed: Option<u64>,

    /// Accelerometer update interval the front end should request
    pub sensor_interval_secs: f64,

    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            background_tile_height: None,
            seed: None,
            sensor_interval_secs: SENSOR_INTERVAL_SECS,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Effective background tile height
    pub fn tile_height(&self) -> f32 {
        self.background_tile_height.unwrap_or(self.viewport_height)
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load(path: impl AsRef<Path>) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.as_ref().display());
                settings
            }
            Err(err) => {
                log::warn!("{err}; using default settings");
                Self::default()
            }
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport_width > 0.0) {
            return Err(invalid("viewport_width", "must be positive"));
        }
        if !(self.viewport_height > 0.0) {
            return Err(invalid("viewport_height", "must be positive"));
        }
        if !(self.player_width > 0.0) || !(self.player_height > 0.0) {
            return Err(invalid("player_width", "player size must be positive"));
        }
        if !(self.tile_height() > 0.0) {
            return Err(invalid("background_tile_height", "must be positive"));
        }

        let t = &self.tuning;
        if t.start_lives == 0 {
            return Err(invalid("tuning.start_lives", "must be at least 1"));
        }
        if !(t.boost_gain > 0.0) {
            return Err(invalid("tuning.boost_gain", "must be positive"));
        }
        if !(0.0..=1.0).contains(&t.camera_lerp) {
            return Err(invalid("tuning.camera_lerp", "must be within 0..=1"));
        }
        if t.bomb_fuse_secs < 0.0 || t.smoke_trail_secs < 0.0 {
            return Err(invalid("tuning.bomb_fuse_secs", "timers cannot be negative"));
        }
        for (field, pct) in [
            ("tuning.platform_percent", t.platform_percent),
            ("tuning.normal_platform_percent", t.normal_platform_percent),
            ("tuning.normal_coin_percent", t.normal_coin_percent),
        ] {
            if pct > 100 {
                return Err(invalid(field, "percent must be within 0..=100"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
