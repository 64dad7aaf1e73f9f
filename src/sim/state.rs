//! Session state and core simulation types
//!
//! A [`GameSession`] owns everything one playthrough mutates. Restarting
//! builds a new session; nothing survives in globals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{RemovalReason, SimEvent};
use super::flow::{self, FlowState};
use super::level;
use super::machine::Machine;
use super::motion::{self, MotionState, PlayerAnimation};
use super::rng::SimRng;
use super::scroll::ScrollBand;
use super::timer::Scheduler;
use crate::settings::{Settings, Tuning};

pub type EntityId = u32;

/// What a placed object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    PlatformNormal,
    PlatformBreakable,
    CoinNormal,
    CoinSpecial,
}

impl EntityCategory {
    pub fn is_platform(self) -> bool {
        matches!(
            self,
            EntityCategory::PlatformNormal | EntityCategory::PlatformBreakable
        )
    }

    pub fn is_coin(self) -> bool {
        !self.is_platform()
    }

    pub fn is_breakable(self) -> bool {
        self == EntityCategory::PlatformBreakable
    }
}

/// Arrangement of the items in one placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    Arrow,
    FiveAcross,
    Diagonal,
    /// Coins only
    Cross,
}

/// A placed platform or coin group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub category: EntityCategory,
    pub layout: Layout,
    /// Horizontally mirrored
    pub flipped: bool,
    pub pos: Vec2,
    pub half_size: Vec2,
    pub breakable: bool,
    pub alive: bool,
}

/// Generation cursor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelFrontier {
    /// Y of the highest placed item
    pub y: f32,
    /// Half-height of that item
    pub last_half_height: f32,
}

impl LevelFrontier {
    /// Step past the last item to fit one of `half_height`. Returns the new Y.
    pub fn advance(&mut self, half_height: f32) -> f32 {
        self.y += self.last_half_height + half_height;
        self.last_half_height = half_height;
        self.y
    }
}

/// Kinematic track for the Dead-state expulsion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathTrack {
    pub start_y: f32,
    pub elapsed: f32,
    pub rise: f32,
    pub drop: f32,
}

/// The falling character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub lives: u8,
    /// Whether the physics engine integrates the body
    pub dynamic: bool,
    pub animation: PlayerAnimation,
    /// Exhaust particle birth rate (0 = off)
    pub exhaust_rate: f32,
    /// Live smoke trails
    pub smoke_trails: Vec<u32>,
    pub death: Option<DeathTrack>,
    /// Damage already taken during the current Lava stay
    pub lava_hit_taken: bool,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2, lives: u8) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            lives,
            dynamic: false,
            animation: PlayerAnimation::Idle,
            exhaust_rate: 0.0,
            smoke_trails: Vec::new(),
            death: None,
            lava_hit_taken: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LavaFront {
    pub y: f32,
}

/// One playthrough
#[derive(Debug, Clone)]
pub struct GameSession {
    pub seed: u64,
    pub rng: SimRng,
    pub settings: Settings,
    pub flow: Machine<FlowState>,
    pub motion: Machine<MotionState>,
    pub player: Player,
    pub camera: CameraState,
    pub lava: LavaFront,
    pub frontier: LevelFrontier,
    pub band: ScrollBand,
    /// Live entities (sorted by id)
    pub entities: Vec<Entity>,
    pub scheduler: Scheduler,
    /// Cleared on GameOver
    pub contacts_enabled: bool,
    pub time_ticks: u64,
    events: Vec<SimEvent>,
    next_id: EntityId,
    next_trail_id: u32,
}

impl GameSession {
    /// Build the opening scene: player on a starting platform, one background
    /// tile filled with items, flow waiting for a tap.
    pub fn new(settings: Settings, seed: u64) -> Self {
        let view = Vec2::new(settings.viewport_width, settings.viewport_height);
        let player_size = Vec2::new(settings.player_width, settings.player_height);
        let player_start = Vec2::new(view.x * 0.5, view.y * 0.3);
        let camera = CameraState { pos: view * 0.5 };
        let lava = LavaFront {
            y: camera.pos.y - view.y * 0.5 - settings.tuning.lava_floor_offset,
        };
        let band = ScrollBand::new(0.0, settings.tile_height());

        let mut session = Self {
            seed,
            rng: SimRng::new(seed),
            player: Player::new(player_start, player_size, settings.tuning.start_lives),
            flow: Machine::new(FlowState::WaitingForTap),
            motion: Machine::new(MotionState::Idle),
            camera,
            lava,
            frontier: LevelFrontier {
                y: 0.0,
                last_half_height: 0.0,
            },
            band,
            entities: Vec::new(),
            scheduler: Scheduler::new(),
            contacts_enabled: true,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            next_trail_id: 1,
            settings,
        };

        session.push_event(SimEvent::BackgroundTile { y: 0.0 });
        level::place_starting_platform(&mut session);
        let target = session.band.top;
        level::fill_to(&mut session, target);

        motion::enter_initial(&mut session);
        flow::enter_initial(&mut session);

        log::info!(
            "New session seed={} entities={} frontier={:.0}",
            seed,
            session.entities.len(),
            session.frontier.y
        );
        session
    }

    pub fn tuning(&self) -> &Tuning {
        &self.settings.tuning
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.settings.viewport_width, self.settings.viewport_height)
    }

    pub fn flow_state(&self) -> FlowState {
        self.flow.current()
    }

    pub fn motion_state(&self) -> MotionState {
        self.motion.current()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id && e.alive)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn next_trail_id(&mut self) -> u32 {
        let id = self.next_trail_id;
        self.next_trail_id += 1;
        id
    }

    /// Add an entity and announce it
    pub fn spawn(&mut self, entity: Entity) {
        self.push_event(SimEvent::EntitySpawned {
            id: entity.id,
            category: entity.category,
            layout: entity.layout,
            flipped: entity.flipped,
            pos: entity.pos,
        });
        self.entities.push(entity);
    }

    /// Remove a live entity. Returns it if it was still alive.
    pub fn remove_entity(&mut self, id: EntityId, reason: RemovalReason) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id && e.alive)?;
        let mut entity = self.entities.remove(idx);
        entity.alive = false;
        self.push_event(SimEvent::EntityRemoved { id, reason });
        Some(entity)
    }

    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Cancel deferred work before the session is dropped
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.contacts_enabled = false;
        log::info!("Session seed={} torn down after {} ticks", self.seed, self.time_ticks);
    }
}
