//! Drop Charge headless driver
//!
//! Runs the simulation core against a crude ballistic stand-in for the
//! physics engine and logs what happened.
//!
//! Usage: `drop-charge [settings.json] [seconds]`

use std::collections::HashSet;

use glam::Vec2;

use drop_charge::Settings;
use drop_charge::game::Game;
use drop_charge::sim::{
    ContactBody, ContactOutcome, Entity, EntityId, FlowState, MotionState, SimEvent,
};

const DT: f32 = 1.0 / 60.0;
const GRAVITY: f32 = 1470.0;
const DEFAULT_SECONDS: f32 = 60.0;
/// Wait this long on the game-over screen before tapping again
const RESTART_DELAY_SECS: f32 = 2.0;

#[derive(Debug, Default)]
struct Summary {
    coins: u32,
    special_coins: u32,
    bounces: u32,
    breaks: u32,
    lava_hits: u32,
    sessions: u64,
    best_height: f32,
}

/// Player body overlaps an entity's box
fn overlaps(player_pos: Vec2, radius: f32, entity: &Entity) -> bool {
    let nearest = player_pos.clamp(entity.pos - entity.half_size, entity.pos + entity.half_size);
    nearest.distance_squared(player_pos) <= radius * radius
}

fn step_physics(game: &mut Game) {
    let snap = game.snapshot();
    if !snap.player_dynamic {
        return;
    }
    let vel = snap.player_vel - Vec2::new(0.0, GRAVITY * DT);
    let pos = snap.player_pos + vel * DT;
    game.sync_body(pos, vel);
}

/// Fire contacts for overlaps that started this frame
fn detect_contacts(game: &mut Game, touching: &mut HashSet<EntityId>, summary: &mut Summary) {
    let snap = game.snapshot();
    if !snap.player_dynamic {
        touching.clear();
        return;
    }
    let radius = game.session().player.size.x * 0.3;
    let hits: Vec<_> = game
        .session()
        .entities()
        .iter()
        .filter(|e| overlaps(snap.player_pos, radius, e))
        .map(|e| (e.id, e.category))
        .collect();

    let now: HashSet<EntityId> = hits.iter().map(|&(id, _)| id).collect();
    for (id, category) in hits {
        if touching.contains(&id) {
            continue;
        }
        match game.on_contact(ContactBody::player(), ContactBody::entity(category, id)) {
            ContactOutcome::CoinCollected(_) => summary.coins += 1,
            ContactOutcome::SpecialCoinCollected(_) => summary.special_coins += 1,
            ContactOutcome::PlatformBounce(_) => summary.bounces += 1,
            ContactOutcome::PlatformBroken(_) => summary.breaks += 1,
            ContactOutcome::Ignored => {}
        }
    }
    *touching = now;
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_SECONDS);

    log::info!("Drop Charge (headless) starting, {:.0}s of play", seconds);

    let mut game = Game::new(settings);
    let mut summary = Summary::default();
    let mut touching = HashSet::new();
    let mut game_over_for = 0.0;

    game.on_tap();

    let frames = (seconds / DT).round() as u64;
    for _ in 0..frames {
        step_physics(&mut game);
        detect_contacts(&mut game, &mut touching, &mut summary);
        game.tick(DT);

        for event in game.drain_events() {
            match event {
                SimEvent::MotionChanged {
                    to: MotionState::Lava,
                    ..
                } => summary.lava_hits += 1,
                SimEvent::FlowChanged { from, to } => {
                    log::debug!("Flow {} -> {}", from.as_str(), to.as_str());
                }
                _ => {}
            }
        }

        let snap = game.snapshot();
        summary.best_height = summary.best_height.max(snap.player_pos.y);

        if snap.flow == FlowState::GameOver {
            game_over_for += DT;
            if game_over_for >= RESTART_DELAY_SECS {
                game_over_for = 0.0;
                touching.clear();
                // Restart, then light the fuse in the new session
                game.on_tap();
                game.on_tap();
            }
        }
    }

    summary.sessions = game.sessions_started();
    let snap = game.snapshot();
    log::info!(
        "Done: sessions={} best_height={:.0} coins={} special={} bounces={} breaks={} lava_hits={}",
        summary.sessions,
        summary.best_height,
        summary.coins,
        summary.special_coins,
        summary.bounces,
        summary.breaks,
        summary.lava_hits
    );
    log::info!(
        "Final state: flow={} motion={} lives={} height={:.0}",
        snap.flow.as_str(),
        snap.motion.as_str(),
        snap.lives,
        snap.player_pos.y
    );
}
