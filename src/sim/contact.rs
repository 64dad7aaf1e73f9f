//! Contact resolution
//!
//! The physics engine reports contacts between two bodies. One side is always
//! the player; the other side's category decides the effect. Velocity changes
//! are floors, never impulses, so a faster ascent is never slowed down.

use serde::{Deserialize, Serialize};

use super::events::{Cue, RemovalReason, SimEvent};
use super::state::{EntityCategory, EntityId, GameSession, Player};
use crate::settings::Tuning;

/// Physics category bits shared with the engine
pub mod category {
    pub const NONE: u32 = 0;
    pub const PLAYER: u32 = 0b1;
    pub const PLATFORM_NORMAL: u32 = 0b10;
    pub const PLATFORM_BREAKABLE: u32 = 0b100;
    pub const COIN_NORMAL: u32 = 0b1000;
    pub const COIN_SPECIAL: u32 = 0b10000;
    pub const EDGES: u32 = 0b100000;
}

impl EntityCategory {
    /// Physics bit for this entity category
    pub fn bits(self) -> u32 {
        match self {
            EntityCategory::PlatformNormal => category::PLATFORM_NORMAL,
            EntityCategory::PlatformBreakable => category::PLATFORM_BREAKABLE,
            EntityCategory::CoinNormal => category::COIN_NORMAL,
            EntityCategory::CoinSpecial => category::COIN_SPECIAL,
        }
    }

    /// Entity category for a physics bit, if it names one
    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            category::PLATFORM_NORMAL => Some(EntityCategory::PlatformNormal),
            category::PLATFORM_BREAKABLE => Some(EntityCategory::PlatformBreakable),
            category::COIN_NORMAL => Some(EntityCategory::CoinNormal),
            category::COIN_SPECIAL => Some(EntityCategory::CoinSpecial),
            _ => None,
        }
    }
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBody {
    /// Physics category bits
    pub category: u32,
    /// World entity behind the body, if any
    pub entity: Option<EntityId>,
}

impl ContactBody {
    pub fn player() -> Self {
        Self {
            category: category::PLAYER,
            entity: None,
        }
    }

    pub fn entity(category: EntityCategory, id: EntityId) -> Self {
        Self {
            category: category.bits(),
            entity: Some(id),
        }
    }
}

/// Velocity floor tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostTier {
    /// Coin or platform bounce
    Jump,
    /// Special coin or lava
    Boost,
    /// Launch when play starts
    SuperBoost,
}

impl BoostTier {
    pub fn amount(self, tuning: &Tuning) -> f32 {
        match self {
            BoostTier::Jump => tuning.jump_velocity,
            BoostTier::Boost => tuning.boost_velocity,
            BoostTier::SuperBoost => tuning.super_boost_velocity,
        }
    }
}

/// `vy = max(vy, amount * gain)`
pub fn boost_velocity(current: f32, amount: f32, gain: f32) -> f32 {
    current.max(amount * gain)
}

pub fn apply_boost(player: &mut Player, tier: BoostTier, tuning: &Tuning) {
    player.vel.y = boost_velocity(player.vel.y, tier.amount(tuning), tuning.boost_gain);
}

/// What a resolved contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    CoinCollected(EntityId),
    SpecialCoinCollected(EntityId),
    PlatformBounce(EntityId),
    PlatformBroken(EntityId),
    /// Nothing happened
    Ignored,
}

/// Resolve a contact between two bodies
pub fn resolve(session: &mut GameSession, a: ContactBody, b: ContactBody) -> ContactOutcome {
    if !session.contacts_enabled {
        return ContactOutcome::Ignored;
    }
    let other = if a.category == category::PLAYER {
        b
    } else if b.category == category::PLAYER {
        a
    } else {
        return ContactOutcome::Ignored;
    };

    let (Some(kind), Some(id)) = (EntityCategory::from_bits(other.category), other.entity) else {
        return ContactOutcome::Ignored;
    };
    // Already collected or broken earlier this frame
    if session.entity(id).is_none() {
        return ContactOutcome::Ignored;
    }

    let tuning = session.tuning().clone();
    let descending = session.player.vel.y < 0.0;

    let outcome = match kind {
        EntityCategory::CoinNormal => {
            session.remove_entity(id, RemovalReason::Collected);
            apply_boost(&mut session.player, BoostTier::Jump, &tuning);
            session.push_event(SimEvent::Cue(Cue::CoinPickup));
            ContactOutcome::CoinCollected(id)
        }
        EntityCategory::CoinSpecial => {
            session.remove_entity(id, RemovalReason::Collected);
            apply_boost(&mut session.player, BoostTier::Boost, &tuning);
            session.push_event(SimEvent::Cue(Cue::CameraShake { intensity: 0.3 }));
            session.push_event(SimEvent::Cue(Cue::CoinPickup));
            ContactOutcome::SpecialCoinCollected(id)
        }
        EntityCategory::PlatformNormal if descending => {
            session.push_event(SimEvent::Cue(Cue::PlatformBounce { entity: id }));
            apply_boost(&mut session.player, BoostTier::Jump, &tuning);
            session.push_event(SimEvent::Cue(Cue::Land));
            ContactOutcome::PlatformBounce(id)
        }
        EntityCategory::PlatformBreakable if descending => {
            if let Some(entity) = session.remove_entity(id, RemovalReason::Broken) {
                session.push_event(SimEvent::Cue(Cue::PlatformShatter {
                    entity: id,
                    pos: entity.pos,
                }));
            }
            apply_boost(&mut session.player, BoostTier::Jump, &tuning);
            session.push_event(SimEvent::Cue(Cue::Break));
            ContactOutcome::PlatformBroken(id)
        }
        // Platforms only react to a player coming down onto them
        EntityCategory::PlatformNormal | EntityCategory::PlatformBreakable => ContactOutcome::Ignored,
    };

    log::debug!("Contact {:?} -> {:?}", kind, outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::flow::{self, FlowState};
    use crate::sim::state::{Entity, Layout};
    use glam::Vec2;

    fn session_with(category: EntityCategory) -> (GameSession, EntityId) {
        let mut s = GameSession::new(Settings::default(), 5);
        let id = s.next_entity_id();
        s.spawn(Entity {
            id,
            category,
            layout: Layout::Arrow,
            flipped: false,
            pos: Vec2::new(700.0, 900.0),
            half_size: Vec2::splat(50.0),
            breakable: category.is_breakable(),
            alive: true,
        });
        s.drain_events();
        (s, id)
    }

    #[test]
    fn test_boost_is_a_floor() {
        assert_eq!(boost_velocity(2000.0, 650.0, 2.5), 2000.0);
        assert_eq!(boost_velocity(500.0, 1700.0, 2.5), 4250.0);
        assert_eq!(boost_velocity(-800.0, 650.0, 2.5), 1625.0);
        // Idempotent
        let once = boost_velocity(100.0, 1200.0, 2.5);
        assert_eq!(boost_velocity(once, 1200.0, 2.5), once);
    }

    #[test]
    fn test_category_bits_roundtrip() {
        for c in [
            EntityCategory::PlatformNormal,
            EntityCategory::PlatformBreakable,
            EntityCategory::CoinNormal,
            EntityCategory::CoinSpecial,
        ] {
            assert_eq!(EntityCategory::from_bits(c.bits()), Some(c));
        }
        assert_eq!(EntityCategory::from_bits(category::EDGES), None);
        assert_eq!(EntityCategory::from_bits(category::PLAYER), None);
    }

    #[test]
    fn test_special_coin_during_jump() {
        let (mut s, id) = session_with(EntityCategory::CoinSpecial);
        s.player.vel.y = 100.0;
        let outcome = resolve(
            &mut s,
            ContactBody::entity(EntityCategory::CoinSpecial, id),
            ContactBody::player(),
        );
        assert_eq!(outcome, ContactOutcome::SpecialCoinCollected(id));
        assert_eq!(s.player.vel.y, 3000.0);
        assert!(s.entity(id).is_none());
        let events = s.drain_events();
        assert!(events.contains(&SimEvent::EntityRemoved {
            id,
            reason: RemovalReason::Collected
        }));
        assert!(events.contains(&SimEvent::Cue(Cue::CoinPickup)));
        assert!(events.iter().any(|e| matches!(e, SimEvent::Cue(Cue::CameraShake { .. }))));
    }

    #[test]
    fn test_normal_coin_any_direction() {
        let (mut s, id) = session_with(EntityCategory::CoinNormal);
        s.player.vel.y = 5000.0;
        let outcome = resolve(
            &mut s,
            ContactBody::player(),
            ContactBody::entity(EntityCategory::CoinNormal, id),
        );
        assert_eq!(outcome, ContactOutcome::CoinCollected(id));
        assert_eq!(s.player.vel.y, 5000.0);
        assert!(s.entity(id).is_none());
    }

    #[test]
    fn test_coin_collected_once() {
        let (mut s, id) = session_with(EntityCategory::CoinNormal);
        let body = ContactBody::entity(EntityCategory::CoinNormal, id);
        resolve(&mut s, ContactBody::player(), body);
        assert_eq!(
            resolve(&mut s, ContactBody::player(), body),
            ContactOutcome::Ignored
        );
    }

    #[test]
    fn test_platform_needs_descent() {
        let (mut s, id) = session_with(EntityCategory::PlatformNormal);
        let body = ContactBody::entity(EntityCategory::PlatformNormal, id);

        s.player.vel.y = 10.0;
        assert_eq!(resolve(&mut s, ContactBody::player(), body), ContactOutcome::Ignored);
        assert_eq!(s.player.vel.y, 10.0);

        s.player.vel.y = -400.0;
        assert_eq!(
            resolve(&mut s, ContactBody::player(), body),
            ContactOutcome::PlatformBounce(id)
        );
        assert_eq!(s.player.vel.y, 1625.0);
        // Normal platforms stay
        assert!(s.entity(id).is_some());
        let events = s.drain_events();
        assert!(events.contains(&SimEvent::Cue(Cue::Land)));
        assert!(events.contains(&SimEvent::Cue(Cue::PlatformBounce { entity: id })));
    }

    #[test]
    fn test_breakable_platform() {
        let (mut s, id) = session_with(EntityCategory::PlatformBreakable);
        let body = ContactBody::entity(EntityCategory::PlatformBreakable, id);

        s.player.vel.y = 200.0;
        assert_eq!(resolve(&mut s, body, ContactBody::player()), ContactOutcome::Ignored);
        assert!(s.entity(id).is_some());

        s.player.vel.y = -1.0;
        assert_eq!(
            resolve(&mut s, body, ContactBody::player()),
            ContactOutcome::PlatformBroken(id)
        );
        assert!(s.entity(id).is_none());
        assert_eq!(s.player.vel.y, 1625.0);
        let events = s.drain_events();
        assert!(events.contains(&SimEvent::Cue(Cue::Break)));
        assert!(events.contains(&SimEvent::EntityRemoved {
            id,
            reason: RemovalReason::Broken
        }));
    }

    #[test]
    fn test_ignored_contacts() {
        let (mut s, id) = session_with(EntityCategory::CoinNormal);
        // No player side
        let coin = ContactBody::entity(EntityCategory::CoinNormal, id);
        assert_eq!(resolve(&mut s, coin, coin), ContactOutcome::Ignored);
        // Edges
        let edge = ContactBody {
            category: category::EDGES,
            entity: None,
        };
        assert_eq!(resolve(&mut s, ContactBody::player(), edge), ContactOutcome::Ignored);
        assert!(s.entity(id).is_some());
    }

    #[test]
    fn test_contacts_disabled_after_game_over() {
        let (mut s, id) = session_with(EntityCategory::CoinNormal);
        flow::request(&mut s, FlowState::WaitingForBomb);
        flow::request(&mut s, FlowState::Playing);
        flow::request(&mut s, FlowState::GameOver);
        let coin = ContactBody::entity(EntityCategory::CoinNormal, id);
        assert_eq!(resolve(&mut s, ContactBody::player(), coin), ContactOutcome::Ignored);
        assert!(s.entity(id).is_some());
    }
}
