//! Per-frame simulation tick
//!
//! Order within a tick: deferred actions due by now, then the flow machine
//! (camera, steering, lava, generation, recycling while Playing), then the
//! motion machine (classifier, animation, death track).

use super::flow::{self, FlowState};
use super::motion;
use super::state::GameSession;
use super::timer::DeferredAction;

/// Inputs sampled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Smoothed horizontal tilt from the accelerometer
    pub tilt: f32,
}

/// Advance the session by `dt` seconds
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    for action in session.scheduler.advance(dt as f64) {
        run_deferred(session, action);
    }

    flow::update(session, input.tilt, dt);
    motion::update(session, dt);

    session.time_ticks += 1;
}

fn run_deferred(session: &mut GameSession, action: DeferredAction) {
    match action {
        DeferredAction::StartPlaying => {
            if !flow::request(session, FlowState::Playing) {
                log::warn!(
                    "Fuse expired in {:?}; not starting play",
                    session.flow_state()
                );
            }
        }
        DeferredAction::RemoveSmokeTrail(id) => motion::remove_smoke_trail(session, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::motion::MotionState;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_waiting_for_tap_is_static() {
        let mut s = GameSession::new(Settings::default(), 12345);
        let player = s.player.pos;
        let lava = s.lava.y;
        for _ in 0..120 {
            tick(&mut s, &TickInput { tilt: 0.5 }, DT);
        }
        assert_eq!(s.flow_state(), FlowState::WaitingForTap);
        assert_eq!(s.motion_state(), MotionState::Idle);
        assert_eq!(s.player.pos, player);
        assert_eq!(s.lava.y, lava);
        assert_eq!(s.time_ticks, 120);
    }

    #[test]
    fn test_fuse_then_launch() {
        let mut s = GameSession::new(Settings::default(), 12345);
        flow::on_tap(&mut s);
        assert_eq!(s.flow_state(), FlowState::WaitingForBomb);

        for _ in 0..119 {
            tick(&mut s, &TickInput::default(), DT);
        }
        assert_eq!(s.flow_state(), FlowState::WaitingForBomb);

        tick(&mut s, &TickInput::default(), DT);
        assert_eq!(s.flow_state(), FlowState::Playing);
        // Super boost makes the classifier pick Jump on the same tick
        assert_eq!(s.motion_state(), MotionState::Jump);
        assert_eq!(s.player.vel.y, 4250.0);
    }

    #[test]
    fn test_lava_rises_while_playing() {
        let mut s = GameSession::new(Settings::default(), 1);
        flow::on_tap(&mut s);
        tick(&mut s, &TickInput::default(), 2.0);
        assert_eq!(s.flow_state(), FlowState::Playing);

        let before = s.lava.y;
        tick(&mut s, &TickInput::default(), 0.5);
        assert!(s.lava.y >= before + 60.0 - 1e-3);
    }

    #[test]
    fn test_tilt_steers_while_playing() {
        let mut s = GameSession::new(Settings::default(), 1);
        flow::on_tap(&mut s);
        tick(&mut s, &TickInput::default(), 2.0);
        tick(&mut s, &TickInput { tilt: -0.4 }, DT);
        assert!((s.player.vel.x + 400.0).abs() < 1e-3);
        assert_eq!(s.player.animation, motion::PlayerAnimation::SteerLeft);
    }

    #[test]
    fn test_zero_and_bad_dt() {
        let mut s = GameSession::new(Settings::default(), 1);
        flow::on_tap(&mut s);
        tick(&mut s, &TickInput::default(), 0.0);
        tick(&mut s, &TickInput::default(), f32::NAN);
        tick(&mut s, &TickInput::default(), -1.0);
        assert_eq!(s.flow_state(), FlowState::WaitingForBomb);
        assert_eq!(s.scheduler.now(), 0.0);
    }

    #[test]
    fn test_smoke_trail_expires() {
        let mut s = GameSession::new(Settings::default(), 1);
        flow::on_tap(&mut s);
        tick(&mut s, &TickInput::default(), 2.0);
        motion::request(&mut s, MotionState::Fall);
        s.player.vel.y = -100.0;
        s.player.pos.y = s.lava.y;
        assert!(motion::request(&mut s, MotionState::Lava));
        assert_eq!(s.player.smoke_trails.len(), 1);

        tick(&mut s, &TickInput::default(), 2.9);
        assert_eq!(s.player.smoke_trails.len(), 1);
        tick(&mut s, &TickInput::default(), 0.2);
        assert!(s.player.smoke_trails.is_empty());
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut s = GameSession::new(Settings::default(), 99999);
            flow::on_tap(&mut s);
            for i in 0..600 {
                // Stand-in for the physics engine: crude ballistic motion
                s.player.vel.y -= 1470.0 * DT;
                s.player.pos += s.player.vel * DT;
                let tilt = ((i as f32) * 0.05).sin();
                tick(&mut s, &TickInput { tilt }, DT);
            }
            s
        };
        let a = run();
        let b = run();
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.entities.len(), b.entities.len());
        assert_eq!(a.motion_state(), b.motion_state());
        assert_eq!(a.player.lives, b.player.lives);
        assert_eq!(a.frontier, b.frontier);
        assert_eq!(a.camera, b.camera);
    }
}
