//! Camera follow and lava ascent

use super::state::GameSession;
use crate::lerp;

/// Where the camera wants to be: trailing the player, never below the lava
pub fn camera_target(player_y: f32, lava_y: f32, view_height: f32, lead: f32) -> f32 {
    (player_y - view_height * lead).max(lava_y)
}

/// Next lava height: rise at `speed`, but never further than `floor_offset`
/// below the bottom of the view
pub fn next_lava_y(
    lava_y: f32,
    speed: f32,
    dt: f32,
    camera_y: f32,
    view_height: f32,
    floor_offset: f32,
) -> f32 {
    let visible_bottom = camera_y - view_height * 0.5;
    (lava_y + speed * dt).max(visible_bottom - floor_offset)
}

/// Ease the camera toward its target
pub fn follow_player(session: &mut GameSession) {
    let view = session.viewport();
    let tuning = session.tuning();
    let target = camera_target(
        session.player.pos.y,
        session.lava.y,
        view.y,
        tuning.camera_lead,
    );
    let y = lerp(session.camera.pos.y, target, tuning.camera_lerp);
    session.camera.pos.x = view.x * 0.5;
    session.camera.pos.y = y;
}

/// Advance the lava front
pub fn raise_lava(session: &mut GameSession, dt: f32) {
    let tuning = session.tuning();
    session.lava.y = next_lava_y(
        session.lava.y,
        tuning.lava_speed,
        dt,
        session.camera.pos.y,
        session.viewport().y,
        tuning.lava_floor_offset,
    );
}
