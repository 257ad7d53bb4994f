//! Wave/progress tracker
//!
//! Waves advance on a fixed cadence of whole ticks. The wave number only
//! feeds the spawner's enemy odds.

use super::state::{GameEvent, World};
use crate::consts::*;

/// Count one tick toward the next wave. Returns the new wave when it advances.
pub fn update(world: &mut World) -> Option<u32> {
    world.wave_timer_ticks += 1;
    if world.wave_timer_ticks < WAVE_INTERVAL_TICKS {
        return None;
    }

    world.wave_timer_ticks = 0;
    world.wave += 1;
    log::info!("Wave {} (score {})", world.wave, world.score);
    world.emit(GameEvent::WaveAdvanced { wave: world.wave });
    Some(world.wave)
}
