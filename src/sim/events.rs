//! Outbound simulation events
//!
//! Everything the rendering/audio front end needs to react to, queued in
//! order of occurrence and drained once per frame. Asset names are opaque
//! identifiers the front end resolves.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::flow::FlowState;
use super::motion::{MotionState, PlayerAnimation};
use super::state::{EntityCategory, EntityId, Layout};

/// Why an entity left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Coin picked up (plays a collect animation)
    Collected,
    /// Breakable platform shattered
    Broken,
    /// Scrolled out of view
    Culled,
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicTrack {
    /// Title/idle ambience
    Idle,
    /// In-game loop
    Playing,
}

impl MusicTrack {
    pub fn asset_name(&self) -> &'static str {
        match self {
            MusicTrack::Idle => "SpaceGame.caf",
            MusicTrack::Playing => "bgMusic.mp3",
        }
    }
}

/// One-shot presentation cues
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cue {
    /// "Ready" prompt scales in
    ReadyPromptIn,
    /// Title and prompt scale out
    TitleOut,
    /// Bomb prop appears and pulses
    BombPulse,
    /// Bomb prop removed
    BombRemoved,
    /// Coin pickup sound
    CoinPickup,
    /// Platform landing sound
    Land,
    /// Breakable platform sound
    Break,
    /// Platform squash/bounce reaction
    PlatformBounce { entity: EntityId },
    /// Breakable platform shatter + particles
    PlatformShatter { entity: EntityId, pos: Vec2 },
    /// Lava hit sound
    LavaHit,
    /// Screen shake
    CameraShake { intensity: f32 },
    /// Player squash-and-stretch
    SquashStretch,
    /// Game over banner and death sound
    DeathSequence,
    /// Large explosion at a world position
    Explosion { pos: Vec2 },
    /// Switch background music
    Music(MusicTrack),
}

impl Cue {
    /// Sound asset for cues that play one
    pub fn sound_name(&self) -> Option<&'static str> {
        match self {
            Cue::CoinPickup => Some("CollectCoin.wav"),
            Cue::Land => Some("SuperBoost.wav"),
            Cue::Break => Some("BreakPlatform.wav"),
            Cue::LavaHit => Some("DrawLava.wav"),
            Cue::DeathSequence => Some("Explosion4.wav"),
            _ => None,
        }
    }
}

/// Events emitted by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A fresh session replaced the previous one; drop all scene state
    SessionStarted { seed: u64 },
    EntitySpawned {
        id: EntityId,
        category: EntityCategory,
        layout: Layout,
        flipped: bool,
        pos: Vec2,
    },
    EntityRemoved {
        id: EntityId,
        reason: RemovalReason,
    },
    /// New background tile whose bottom edge sits at `y`
    BackgroundTile { y: f32 },
    FlowChanged {
        from: FlowState,
        to: FlowState,
    },
    MotionChanged {
        from: MotionState,
        to: MotionState,
    },
    /// Player sprite animation changed
    Animation(PlayerAnimation),
    /// Exhaust trail (re)attached at the given birth rate
    ExhaustAttached { birth_rate: f32 },
    /// Exhaust trail birth rate changed
    ExhaustRate(f32),
    SmokeTrailAdded { id: u32 },
    SmokeTrailRemoved { id: u32 },
    Cue(Cue),
}
