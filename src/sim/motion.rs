//! Player motion state machine
//!
//! Idle -> Jump <-> Fall -> Lava -> Dead. Each state has an entry action and
//! Jump/Fall/Dead have per-tick work. The classifier turns vertical velocity
//! into Jump/Fall requests every Playing tick; requests the table forbids are
//! dropped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::{BoostTier, apply_boost};
use super::events::{Cue, SimEvent};
use super::flow::{self, FlowState};
use super::machine::MachineState;
use super::state::{DeathTrack, GameSession};
use super::timer::DeferredAction;
use crate::consts::{DEATH_DROP_SECS, DEATH_RISE_SECS};
use crate::{ease_in, ease_out};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionState {
    /// On the starting platform, physics off
    Idle,
    /// Rising
    Jump,
    /// Descending
    Fall,
    /// Touched the lava
    Lava,
    /// Out of lives
    Dead,
}

impl MachineState for MotionState {
    fn can_transition_to(self, next: Self) -> bool {
        use MotionState::*;
        matches!(
            (self, next),
            (Idle, Jump)
                | (Jump, Fall)
                | (Fall, Lava)
                | (Fall, Jump)
                | (Lava, Dead)
                | (Lava, Fall)
                | (Lava, Jump)
                | (Dead, Idle)
        )
    }
}

impl MotionState {
    pub const ALL: [MotionState; 5] = [
        MotionState::Idle,
        MotionState::Jump,
        MotionState::Fall,
        MotionState::Lava,
        MotionState::Dead,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MotionState::Idle => "idle",
            MotionState::Jump => "jump",
            MotionState::Fall => "fall",
            MotionState::Lava => "lava",
            MotionState::Dead => "dead",
        }
    }
}

/// Sprite animation the front end should play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnimation {
    Idle,
    Jump,
    Fall,
    SteerLeft,
    SteerRight,
}

/// Jump when rising, Fall otherwise
pub fn classify(vertical_velocity: f32) -> MotionState {
    if vertical_velocity > 0.0 {
        MotionState::Jump
    } else {
        MotionState::Fall
    }
}

/// Animation for the current state and horizontal speed
pub fn steer_animation(state: MotionState, vx: f32, threshold: f32) -> PlayerAnimation {
    if vx.abs() > threshold {
        if vx < 0.0 {
            PlayerAnimation::SteerLeft
        } else {
            PlayerAnimation::SteerRight
        }
    } else if state == MotionState::Jump {
        PlayerAnimation::Jump
    } else {
        PlayerAnimation::Fall
    }
}

/// Vertical offset of the death track from its start after `elapsed` seconds
pub fn death_offset(track: &DeathTrack) -> f32 {
    if track.elapsed <= DEATH_RISE_SECS {
        track.rise * ease_out(track.elapsed / DEATH_RISE_SECS)
    } else {
        let t = (track.elapsed - DEATH_RISE_SECS) / DEATH_DROP_SECS;
        track.rise - track.drop * ease_in(t)
    }
}

/// Run the Idle entry for a freshly built session
pub fn enter_initial(session: &mut GameSession) {
    enter_idle(session);
}

/// Request a transition. Returns false (and changes nothing) when the table
/// forbids it.
pub fn request(session: &mut GameSession, next: MotionState) -> bool {
    let Some(from) = session.motion.enter(next) else {
        return false;
    };
    log::info!("Motion {} -> {}", from.as_str(), next.as_str());
    session.push_event(SimEvent::MotionChanged { from, to: next });

    match next {
        MotionState::Idle => enter_idle(session),
        MotionState::Jump => enter_jump(session, from),
        MotionState::Fall => enter_fall(session),
        MotionState::Lava => enter_lava(session),
        MotionState::Dead => enter_dead(session),
    }
    true
}

fn set_exhaust(session: &mut GameSession, rate: f32) {
    if session.player.exhaust_rate != rate {
        session.player.exhaust_rate = rate;
        session.push_event(SimEvent::ExhaustRate(rate));
    }
}

fn enter_idle(session: &mut GameSession) {
    let rate = session.tuning().exhaust_birth_rate;
    let player = &mut session.player;
    player.dynamic = false;
    player.vel = Vec2::ZERO;
    player.death = None;
    player.exhaust_rate = rate;
    session.push_event(SimEvent::ExhaustAttached { birth_rate: rate });
}

fn enter_jump(session: &mut GameSession, from: MotionState) {
    if from != MotionState::Lava && session.player.exhaust_rate == 0.0 {
        let rate = session.tuning().exhaust_birth_rate;
        set_exhaust(session, rate);
    }
    session.push_event(SimEvent::Cue(Cue::SquashStretch));
}

fn enter_fall(session: &mut GameSession) {
    set_exhaust(session, 0.0);
}

fn enter_lava(session: &mut GameSession) {
    let tuning = session.tuning().clone();
    session.player.lava_hit_taken = false;

    session.push_event(SimEvent::Cue(Cue::LavaHit));
    session.push_event(SimEvent::Cue(Cue::CameraShake { intensity: 0.5 }));

    set_exhaust(session, 0.0);
    let trail = session.next_trail_id();
    session.player.smoke_trails.push(trail);
    session.push_event(SimEvent::SmokeTrailAdded { id: trail });
    session
        .scheduler
        .schedule(tuning.smoke_trail_secs, DeferredAction::RemoveSmokeTrail(trail));

    // Judged before anything moves the player
    lava_damage(session);
}

/// Apply the once-per-stay lava hit if the player is inside the damage band
fn lava_damage(session: &mut GameSession) {
    let tuning = session.tuning().clone();
    let player = &session.player;
    if player.lava_hit_taken || player.pos.y >= session.lava.y + tuning.lava_damage_band {
        return;
    }

    let player = &mut session.player;
    player.lava_hit_taken = true;
    apply_boost(player, BoostTier::Boost, &tuning);
    if player.lives == 0 {
        request(session, MotionState::Dead);
    } else {
        player.lives -= 1;
        log::info!("Lava hit, {} lives left", player.lives);
    }
}

fn enter_dead(session: &mut GameSession) {
    let view_h = session.viewport().y;
    let player = &mut session.player;
    player.dynamic = false;
    player.vel = Vec2::ZERO;
    player.death = Some(DeathTrack {
        start_y: player.pos.y,
        elapsed: 0.0,
        rise: view_h * 0.5,
        drop: view_h * 1.5,
    });
    flow::request(session, FlowState::GameOver);
}

/// Drop a smoke trail whose lifetime ran out
pub fn remove_smoke_trail(session: &mut GameSession, id: u32) {
    let trails = &mut session.player.smoke_trails;
    if let Some(idx) = trails.iter().position(|&t| t == id) {
        trails.remove(idx);
        session.push_event(SimEvent::SmokeTrailRemoved { id });
    }
}

/// Horizontal steering from tilt, with wrap-around at the screen edges
pub fn steer(session: &mut GameSession, tilt: f32) {
    let gain = session.tuning().steer_gain;
    let width = session.viewport().x;
    let player = &mut session.player;
    player.vel.x = tilt * gain;

    let half = player.size.x * 0.5;
    if player.pos.x < -half {
        player.pos.x = width + half;
    } else if player.pos.x > width + half {
        player.pos.x = -half;
    }
}

/// Request Lava while the player is inside the trigger band
pub fn check_lava(session: &mut GameSession) -> bool {
    let band = session.tuning().lava_trigger_band;
    if session.player.pos.y < session.lava.y + band {
        return request(session, MotionState::Lava);
    }
    false
}

/// Still sinking through the trigger band: Lava holds instead of handing back
/// to Fall, so one dip is one Lava stay.
fn holds_lava(session: &GameSession, wanted: MotionState) -> bool {
    let band = session.tuning().lava_trigger_band;
    session.motion_state() == MotionState::Lava
        && wanted == MotionState::Fall
        && session.player.pos.y < session.lava.y + band
}

/// Per-tick motion work
pub fn update(session: &mut GameSession, dt: f32) {
    if session.flow_state() == FlowState::Playing && session.player.dynamic {
        if session.motion_state() == MotionState::Lava {
            lava_damage(session);
        }
        let wanted = classify(session.player.vel.y);
        if session.player.dynamic && !holds_lava(session, wanted) {
            request(session, wanted);
        }
    }

    match session.motion_state() {
        MotionState::Jump | MotionState::Fall => {
            let threshold = session.tuning().steer_anim_threshold;
            let anim = steer_animation(session.motion_state(), session.player.vel.x, threshold);
            if anim != session.player.animation {
                session.player.animation = anim;
                session.push_event(SimEvent::Animation(anim));
            }
        }
        MotionState::Dead => {
            if let Some(track) = session.player.death.as_mut() {
                track.elapsed = (track.elapsed + dt).min(DEATH_RISE_SECS + DEATH_DROP_SECS);
                let track = *track;
                session.player.pos.y = track.start_y + death_offset(&track);
            }
        }
        MotionState::Idle | MotionState::Lava => {}
    }
}
