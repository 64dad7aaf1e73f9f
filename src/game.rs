//! Session owner
//!
//! [`Game`] is what the rendering/physics front end holds. It forwards ticks,
//! taps and contacts to the current [`GameSession`], rebuilds the session on a
//! restart tap, and owns the shared tilt sensor.

use std::sync::Arc;

use glam::Vec2;
use serde::Serialize;

use crate::settings::Settings;
use crate::sim::contact::{self, ContactBody, ContactOutcome};
use crate::sim::flow::{self, FlowState, TapOutcome};
use crate::sim::{GameSession, MotionState, PlayerAnimation, SimEvent, TickInput, TiltSensor, tick};

/// Read-only view of the state the front end draws from
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Snapshot {
    pub flow: FlowState,
    pub motion: MotionState,
    pub animation: PlayerAnimation,
    pub player_pos: Vec2,
    pub player_vel: Vec2,
    pub player_dynamic: bool,
    pub lives: u8,
    pub camera: Vec2,
    pub lava_y: f32,
    pub entity_count: usize,
    pub exhaust_rate: f32,
}

pub struct Game {
    settings: Settings,
    session: GameSession,
    sensor: Arc<TiltSensor>,
    base_seed: u64,
    sessions_started: u64,
    /// Events carried over from torn-down sessions
    carried: Vec<SimEvent>,
}

impl Game {
    pub fn new(settings: Settings) -> Self {
        Self::with_sensor(settings, Arc::new(TiltSensor::new()))
    }

    /// Use an existing sensor handle (e.g. one already wired to a callback)
    pub fn with_sensor(settings: Settings, sensor: Arc<TiltSensor>) -> Self {
        let base_seed = settings.seed.unwrap_or_else(rand::random);
        let session = GameSession::new(settings.clone(), base_seed);
        Self {
            settings,
            session,
            sensor,
            base_seed,
            sessions_started: 1,
            carried: vec![SimEvent::SessionStarted { seed: base_seed }],
        }
    }

    /// Handle for the accelerometer callback
    pub fn sensor(&self) -> Arc<TiltSensor> {
        Arc::clone(&self.sensor)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn sessions_started(&self) -> u64 {
        self.sessions_started
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32) {
        let input = TickInput {
            tilt: self.sensor.value(),
        };
        tick(&mut self.session, &input, dt);
    }

    /// Physics contact between two bodies
    pub fn on_contact(&mut self, a: ContactBody, b: ContactBody) -> ContactOutcome {
        contact::resolve(&mut self.session, a, b)
    }

    /// User tap
    pub fn on_tap(&mut self) -> TapOutcome {
        let outcome = flow::on_tap(&mut self.session);
        if outcome == TapOutcome::Restart {
            self.restart();
        }
        outcome
    }

    /// Body state reported by the physics engine after its step. Ignored while
    /// the body is not dynamic (Idle, Dead), when the core owns it.
    pub fn sync_body(&mut self, pos: Vec2, vel: Vec2) {
        let player = &mut self.session.player;
        if player.dynamic {
            player.pos = pos;
            player.vel = vel;
        }
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        let mut events = std::mem::take(&mut self.carried);
        events.extend(self.session.drain_events());
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        let s = &self.session;
        Snapshot {
            flow: s.flow_state(),
            motion: s.motion_state(),
            animation: s.player.animation,
            player_pos: s.player.pos,
            player_vel: s.player.vel,
            player_dynamic: s.player.dynamic,
            lives: s.player.lives,
            camera: s.camera.pos,
            lava_y: s.lava.y,
            entity_count: s.entities.len(),
            exhaust_rate: s.player.exhaust_rate,
        }
    }

    fn restart(&mut self) {
        let seed = self.base_seed.wrapping_add(self.sessions_started);
        self.session.teardown();
        self.carried.extend(self.session.drain_events());
        self.carried.push(SimEvent::SessionStarted { seed });
        self.session = GameSession::new(self.settings.clone(), seed);
        self.sessions_started += 1;
        log::info!("Restarted (session #{})", self.sessions_started);
    }
}
