//! Power-up effect controller
//!
//! Every collected power-up becomes an [`ActiveEffect`] with its own tick
//! countdown. Countdowns only advance while the simulation ticks, so pausing
//! freezes them along with everything else.

use serde::{Deserialize, Serialize};

use super::entity::{PowerUpKind, Ship};
use crate::consts::*;

/// A running power-up effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub remaining_ticks: u32,
}

/// The ship's set of running effects. Duplicates are allowed: two shields
/// collected five seconds apart are two entries with two timers.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    active: Vec<ActiveEffect>,
}

impl Effects {
    /// Start a fresh effect timer
    pub fn activate(&mut self, kind: PowerUpKind) {
        self.active.push(ActiveEffect {
            kind,
            remaining_ticks: EFFECT_DURATION_TICKS,
        });
    }

    /// Count every timer down by one tick. Returns the kinds that expired.
    pub fn tick(&mut self) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.active.retain_mut(|effect| {
            effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
            if effect.remaining_ticks == 0 {
                expired.push(effect.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }

    pub fn active(&self) -> &[ActiveEffect] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// Apply a collected power-up to the ship: immediate part first, then the timed flag
pub fn activate_power_up(ship: &mut Ship, kind: PowerUpKind) {
    if kind == PowerUpKind::Health {
        ship.heal(HEALTH_POWERUP_AMOUNT);
    }
    ship.effects.activate(kind);
}

/// Live player bullet cap given the ship's effects
pub fn bullet_cap(effects: &Effects) -> usize {
    if effects.is_active(PowerUpKind::RapidFire) {
        RAPID_FIRE_BULLET_CAP
    } else {
        MAX_PLAYER_BULLETS
    }
}

/// Lateral offsets of the bullets fired per trigger
pub fn shot_pattern(effects: &Effects) -> &'static [f32] {
    if effects.is_active(PowerUpKind::MultiShot) {
        &[0.0, -MULTI_SHOT_SPREAD, MULTI_SHOT_SPREAD]
    } else {
        &[0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_expires_after_exact_duration() {
        let mut effects = Effects::default();
        effects.activate(PowerUpKind::RapidFire);

        for _ in 0..EFFECT_DURATION_TICKS - 1 {
            assert!(effects.tick().is_empty());
        }
        assert!(effects.is_active(PowerUpKind::RapidFire));
        assert_eq!(effects.tick(), vec![PowerUpKind::RapidFire]);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_timers_are_independent() {
        let mut effects = Effects::default();
        effects.activate(PowerUpKind::Shield);
        for _ in 0..100 {
            effects.tick();
        }
        effects.activate(PowerUpKind::Shield);

        // First shield expires on schedule, second keeps its own timer
        for _ in 0..EFFECT_DURATION_TICKS - 100 {
            effects.tick();
        }
        assert_eq!(effects.active().len(), 1);
        assert!(effects.is_active(PowerUpKind::Shield));
        assert_eq!(effects.active()[0].remaining_ticks, 100);
    }

    #[test]
    fn test_health_power_up_clamps_at_max() {
        let mut ship = Ship {
            health: 90,
            ..Default::default()
        };
        activate_power_up(&mut ship, PowerUpKind::Health);
        assert_eq!(ship.health, SHIP_MAX_HEALTH);
        assert!(ship.effects.is_active(PowerUpKind::Health));
    }

    #[test]
    fn test_fire_modifiers() {
        let mut effects = Effects::default();
        assert_eq!(bullet_cap(&effects), MAX_PLAYER_BULLETS);
        assert_eq!(shot_pattern(&effects).len(), 1);

        effects.activate(PowerUpKind::RapidFire);
        effects.activate(PowerUpKind::MultiShot);
        assert_eq!(bullet_cap(&effects), RAPID_FIRE_BULLET_CAP);
        assert_eq!(shot_pattern(&effects).len(), 3);
    }
}
