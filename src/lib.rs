//! Drop Charge - a vertical lava-escape arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machines, level generation, scrolling)
//! - `game`: Session owner that the rendering/physics front end talks to
//! - `settings`: Data-driven configuration and game balance
//! - `error`: Configuration errors

pub mod error;
pub mod game;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use game::{Game, Snapshot};
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Default viewport (portrait, scene units)
    pub const VIEWPORT_WIDTH: f32 = 1536.0;
    pub const VIEWPORT_HEIGHT: f32 = 2048.0;

    /// Player sprite size
    pub const PLAYER_WIDTH: f32 = 150.0;
    pub const PLAYER_HEIGHT: f32 = 150.0;

    /// Lives at the start of a session
    pub const START_LIVES: u8 = 3;

    /// Vertical velocity floor multiplier applied to every boost tier
    pub const BOOST_GAIN: f32 = 2.5;
    /// Boost tiers (before gain)
    pub const JUMP_VELOCITY: f32 = 650.0;
    pub const BOOST_VELOCITY: f32 = 1200.0;
    pub const SUPER_BOOST_VELOCITY: f32 = 1700.0;

    /// Lava rises this fast (units/sec)
    pub const LAVA_SPEED: f32 = 120.0;
    /// Lava never sits further than this below the visible bottom
    pub const LAVA_FLOOR_OFFSET: f32 = 125.0;
    /// Player below lava.y + this on Lava entry takes damage
    pub const LAVA_DAMAGE_BAND: f32 = 90.0;
    /// Player below lava.y + this requests the Lava state
    pub const LAVA_TRIGGER_BAND: f32 = 180.0;

    /// Camera easing per tick
    pub const CAMERA_LERP: f32 = 0.2;
    /// Camera trails the player by this fraction of the viewport height
    pub const CAMERA_LEAD: f32 = 0.40;

    /// Fuse between the first tap and play (seconds)
    pub const BOMB_FUSE_SECS: f64 = 2.0;
    /// Smoke trail lifetime after a lava hit (seconds)
    pub const SMOKE_TRAIL_SECS: f64 = 3.0;

    /// Exhaust particle birth rate when the trail is on
    pub const EXHAUST_BIRTH_RATE: f32 = 200.0;
    /// Horizontal speed above which the steer animation plays
    pub const STEER_ANIM_THRESHOLD: f32 = 100.0;
    /// Tilt to horizontal velocity
    pub const STEER_GAIN: f32 = 1000.0;

    /// Generate more level once the camera is this close (fraction of viewport) to the band top
    pub const GENERATION_LOOKAHEAD: f32 = 0.55;
    /// Off-screen entities whose screen Y (from the view bottom) is under this
    /// fraction of the camera's screen Y are culled
    pub const CULL_FRACTION: f32 = 0.25;

    /// Level generation weights (percent)
    pub const PLATFORM_PERCENT: u32 = 60;
    pub const NORMAL_PLATFORM_PERCENT: u32 = 75;
    pub const NORMAL_COIN_PERCENT: u32 = 75;

    /// Accelerometer smoothing: new = raw * RAW + old * (1 - RAW)
    pub const TILT_SMOOTHING: f32 = 0.75;
    /// Accelerometer update interval (seconds)
    pub const SENSOR_INTERVAL_SECS: f64 = 0.2;

    /// Dead-state expulsion track
    pub const DEATH_RISE_SECS: f32 = 0.5;
    pub const DEATH_DROP_SECS: f32 = 1.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Quadratic ease-out on `t` in [0, 1]
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in on `t` in [0, 1]
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}
