//! Game flow state machine
//!
//! WaitingForTap -> WaitingForBomb -> Playing -> GameOver. A restart never
//! walks back to WaitingForTap; the owner builds a new session instead.

use serde::{Deserialize, Serialize};

use super::camera;
use super::contact::{BoostTier, apply_boost};
use super::events::{Cue, MusicTrack, SimEvent};
use super::machine::MachineState;
use super::motion;
use super::scroll;
use super::state::GameSession;
use super::timer::DeferredAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    /// Title screen, "tap to start"
    WaitingForTap,
    /// Bomb fuse burning
    WaitingForBomb,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

impl MachineState for FlowState {
    fn can_transition_to(self, next: Self) -> bool {
        use FlowState::*;
        matches!(
            (self, next),
            (WaitingForTap, WaitingForBomb) | (WaitingForBomb, Playing) | (Playing, GameOver)
        )
    }
}

impl FlowState {
    pub const ALL: [FlowState; 4] = [
        FlowState::WaitingForTap,
        FlowState::WaitingForBomb,
        FlowState::Playing,
        FlowState::GameOver,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowState::WaitingForTap => "waiting_for_tap",
            FlowState::WaitingForBomb => "waiting_for_bomb",
            FlowState::Playing => "playing",
            FlowState::GameOver => "game_over",
        }
    }
}

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Fuse lit
    BombDropped,
    /// Session over; the owner should start a new one
    Restart,
    /// No effect on the flow
    Ignored,
}

/// Run the WaitingForTap entry for a freshly built session
pub fn enter_initial(session: &mut GameSession) {
    session.push_event(SimEvent::Cue(Cue::ReadyPromptIn));
}

/// Request a transition. Returns false when the table forbids it.
pub fn request(session: &mut GameSession, next: FlowState) -> bool {
    let from = session.flow_state();
    if !session.flow.can_enter(next) {
        return false;
    }

    // Exit actions
    if from == FlowState::WaitingForBomb && next == FlowState::Playing {
        session.push_event(SimEvent::Cue(Cue::BombRemoved));
    }

    session.flow.enter(next);
    log::info!("Flow {} -> {}", from.as_str(), next.as_str());
    session.push_event(SimEvent::FlowChanged { from, to: next });

    match (from, next) {
        (FlowState::WaitingForTap, FlowState::WaitingForBomb) => {
            session.push_event(SimEvent::Cue(Cue::TitleOut));
            session.push_event(SimEvent::Cue(Cue::BombPulse));
        }
        (_, FlowState::Playing) => enter_playing(session),
        (FlowState::Playing, FlowState::GameOver) => enter_game_over(session),
        _ => {}
    }
    true
}

fn enter_playing(session: &mut GameSession) {
    let tuning = session.tuning().clone();
    session.player.dynamic = true;
    apply_boost(&mut session.player, BoostTier::SuperBoost, &tuning);
    session.push_event(SimEvent::Cue(Cue::Music(MusicTrack::Playing)));
}

fn enter_game_over(session: &mut GameSession) {
    session.contacts_enabled = false;
    let pos = session.camera.pos;
    session.push_event(SimEvent::Cue(Cue::DeathSequence));
    session.push_event(SimEvent::Cue(Cue::Explosion { pos }));
    session.push_event(SimEvent::Cue(Cue::Music(MusicTrack::Idle)));
}

/// Handle a tap
pub fn on_tap(session: &mut GameSession) -> TapOutcome {
    match session.flow_state() {
        FlowState::WaitingForTap => {
            request(session, FlowState::WaitingForBomb);
            let fuse = session.tuning().bomb_fuse_secs;
            session.scheduler.schedule(fuse, DeferredAction::StartPlaying);
            TapOutcome::BombDropped
        }
        FlowState::GameOver => TapOutcome::Restart,
        FlowState::WaitingForBomb | FlowState::Playing => TapOutcome::Ignored,
    }
}

/// Per-tick flow work
pub fn update(session: &mut GameSession, tilt: f32, dt: f32) {
    if session.flow_state() != FlowState::Playing {
        return;
    }
    camera::follow_player(session);
    motion::steer(session, tilt);
    camera::raise_lava(session, dt);
    motion::check_lava(session);
    scroll::update_level(session);
    scroll::cull(session);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::motion::MotionState;

    #[test]
    fn test_transition_table() {
        use FlowState::*;
        let valid = [
            (WaitingForTap, WaitingForBomb),
            (WaitingForBomb, Playing),
            (Playing, GameOver),
        ];
        for from in FlowState::ALL {
            for to in FlowState::ALL {
                assert_eq!(from.can_transition_to(to), valid.contains(&(from, to)));
            }
        }
    }

    #[test]
    fn test_nothing_returns_to_waiting_for_tap() {
        for from in FlowState::ALL {
            assert!(!from.can_transition_to(FlowState::WaitingForTap));
        }
    }

    #[test]
    fn test_tap_lights_fuse() {
        let mut s = GameSession::new(Settings::default(), 1);
        s.drain_events();
        assert_eq!(on_tap(&mut s), TapOutcome::BombDropped);
        assert_eq!(s.flow_state(), FlowState::WaitingForBomb);
        assert_eq!(s.scheduler.pending(), 1);
        let events = s.drain_events();
        assert!(events.contains(&SimEvent::Cue(Cue::TitleOut)));
        assert!(events.contains(&SimEvent::Cue(Cue::BombPulse)));

        // Further taps neither advance nor reschedule
        assert_eq!(on_tap(&mut s), TapOutcome::Ignored);
        assert_eq!(s.flow_state(), FlowState::WaitingForBomb);
        assert_eq!(s.scheduler.pending(), 1);
    }

    #[test]
    fn test_playing_entry_launches_player() {
        let mut s = GameSession::new(Settings::default(), 1);
        request(&mut s, FlowState::WaitingForBomb);
        s.drain_events();
        assert!(request(&mut s, FlowState::Playing));
        assert!(s.player.dynamic);
        assert_eq!(s.player.vel.y, 1700.0 * 2.5);
        let events = s.drain_events();
        assert_eq!(events[0], SimEvent::Cue(Cue::BombRemoved));
        assert!(events.contains(&SimEvent::FlowChanged {
            from: FlowState::WaitingForBomb,
            to: FlowState::Playing
        }));
    }

    #[test]
    fn test_cannot_skip_bomb() {
        let mut s = GameSession::new(Settings::default(), 1);
        assert!(!request(&mut s, FlowState::Playing));
        assert!(!request(&mut s, FlowState::GameOver));
        assert_eq!(s.flow_state(), FlowState::WaitingForTap);
    }

    #[test]
    fn test_game_over_entry() {
        let mut s = GameSession::new(Settings::default(), 1);
        request(&mut s, FlowState::WaitingForBomb);
        request(&mut s, FlowState::Playing);
        s.drain_events();
        assert!(request(&mut s, FlowState::GameOver));
        assert!(!s.contacts_enabled);
        let events = s.drain_events();
        assert!(events.contains(&SimEvent::Cue(Cue::DeathSequence)));
        assert!(events.contains(&SimEvent::Cue(Cue::Music(MusicTrack::Idle))));
        assert_eq!(on_tap(&mut s), TapOutcome::Restart);
    }

    #[test]
    fn test_update_idle_outside_playing() {
        let mut s = GameSession::new(Settings::default(), 1);
        let lava = s.lava.y;
        let camera = s.camera.pos;
        update(&mut s, 1.0, 1.0);
        assert_eq!(s.lava.y, lava);
        assert_eq!(s.camera.pos, camera);
        assert_eq!(s.player.vel.x, 0.0);
        assert_eq!(s.motion_state(), MotionState::Idle);
    }
}
