//! Background band and entity recycling
//!
//! The background is a column of equal tiles. Once the camera gets within
//! `generation_lookahead` viewports of the band top, one more tile goes on and
//! the level generator catches up to the new top. Entities are swept once
//! their screen-space Y (measured up from the bottom of the view) drops under
//! `cull_fraction` of the camera's own screen height, but never while any part
//! of them is on screen.

use serde::{Deserialize, Serialize};

use super::events::{RemovalReason, SimEvent};
use super::level;
use super::state::{Entity, GameSession};

/// Top of the generated background column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollBand {
    /// Y of the top edge of the highest tile
    pub top: f32,
    pub tile_height: f32,
    pub tiles: u32,
}

impl ScrollBand {
    /// Band with a single tile sitting on `base`
    pub fn new(base: f32, tile_height: f32) -> Self {
        Self {
            top: base + tile_height,
            tile_height,
            tiles: 1,
        }
    }

    /// Whether the camera is close enough to the top to need another tile
    pub fn needs_tile(&self, camera_y: f32, view_height: f32, lookahead: f32) -> bool {
        camera_y > self.top - view_height * lookahead
    }

    /// Stack one tile. Returns the Y its bottom edge sits at.
    pub fn push_tile(&mut self) -> f32 {
        let y = self.top;
        self.top += self.tile_height;
        self.tiles += 1;
        y
    }
}

/// Whether any part of `entity` is inside the camera's view
pub fn in_view(entity: &Entity, camera_y: f32, view_height: f32) -> bool {
    (entity.pos.y - camera_y).abs() <= view_height * 0.5 + entity.half_size.y
}

/// Y relative to the bottom edge of the view
pub fn screen_y(world_y: f32, camera_y: f32, view_height: f32) -> f32 {
    world_y - (camera_y - view_height * 0.5)
}

/// Below the cull line and off screen
pub fn should_cull(entity: &Entity, camera_y: f32, view_height: f32, fraction: f32) -> bool {
    let line = screen_y(camera_y, camera_y, view_height) * fraction;
    screen_y(entity.pos.y, camera_y, view_height) < line && !in_view(entity, camera_y, view_height)
}

/// Extend the background and level when the camera nears the top
pub fn update_level(session: &mut GameSession) -> bool {
    let view_h = session.viewport().y;
    let lookahead = session.tuning().generation_lookahead;
    if !session.band.needs_tile(session.camera.pos.y, view_h, lookahead) {
        return false;
    }

    let y = session.band.push_tile();
    session.push_event(SimEvent::BackgroundTile { y });
    let target = session.band.top;
    level::fill_to(session, target);
    log::debug!("Background tile {} at {:.0}", session.band.tiles, y);
    true
}

/// Remove entities that have scrolled away. Returns how many went.
pub fn cull(session: &mut GameSession) -> usize {
    let camera_y = session.camera.pos.y;
    let view_h = session.viewport().y;
    let fraction = session.tuning().cull_fraction;

    let (doomed, kept): (Vec<Entity>, Vec<Entity>) = std::mem::take(&mut session.entities)
        .into_iter()
        .partition(|e| should_cull(e, camera_y, view_h, fraction));
    session.entities = kept;

    for e in &doomed {
        session.push_event(SimEvent::EntityRemoved {
            id: e.id,
            reason: RemovalReason::Culled,
        });
    }
    if !doomed.is_empty() {
        log::debug!("Culled {} entities below camera {:.0}", doomed.len(), camera_y);
    }
    doomed.len()
}
