//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied time deltas only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or physics-engine dependencies

pub mod camera;
pub mod contact;
pub mod events;
pub mod flow;
pub mod level;
pub mod machine;
pub mod motion;
pub mod rng;
pub mod scroll;
pub mod sensor;
pub mod state;
pub mod tick;
pub mod timer;

pub use contact::{BoostTier, ContactBody, ContactOutcome, boost_velocity};
pub use events::{Cue, MusicTrack, RemovalReason, SimEvent};
pub use flow::{FlowState, TapOutcome};
pub use level::{CategoryTable, Placement};
pub use machine::{Machine, MachineState};
pub use motion::{MotionState, PlayerAnimation};
pub use rng::{RandomSource, SimRng};
pub use scroll::ScrollBand;
pub use sensor::TiltSensor;
pub use state::{
    CameraState, Entity, EntityCategory, EntityId, GameSession, LavaFront, Layout, LevelFrontier,
    Player,
};
pub use tick::{TickInput, tick};
pub use timer::{DeferredAction, Scheduler};
