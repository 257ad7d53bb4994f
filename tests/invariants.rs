//! Property tests for the simulation core driven through the public game loop

use astro_blaster::consts::*;
use astro_blaster::sim::{GameEvent, GameLoop, GamePhase, TickInput};
use glam::Vec2;
use proptest::prelude::*;

fn input_strategy() -> impl Strategy<Value = TickInput> {
    (
        any::<[bool; 5]>(),
        proptest::option::of((-1.0f32..=1.0, -1.0f32..=1.0)),
    )
        .prop_map(|([left, right, up, down, fire], joystick)| TickInput {
            left,
            right,
            up,
            down,
            fire,
            pause: false,
            joystick: joystick.map(|(x, y)| Vec2::new(x, y)),
        })
}

/// Each input is held for a burst of frames so runs cover long stretches
fn script_strategy() -> impl Strategy<Value = Vec<(TickInput, u16)>> {
    proptest::collection::vec((input_strategy(), 1u16..240), 1..20)
}

fn started(seed: u64) -> GameLoop {
    let mut game = GameLoop::new(seed);
    game.start(seed).unwrap();
    game
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_world_stays_in_bounds(seed in any::<u64>(), script in script_strategy()) {
        let mut game = started(seed);
        let mut last_score = 0;
        let mut last_wave = 1;
        let mut game_overs = 0;

        for (input, frames) in &script {
            for _ in 0..*frames {
                let events = game.advance(TICK_MS, input);
                game_overs += events
                    .iter()
                    .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                    .count();

                let world = game.world();
                prop_assert!(world.ship.pos.x.abs() <= SHIP_BOUND_X);
                prop_assert!(world.ship.pos.y.abs() <= SHIP_BOUND_Y);
                prop_assert!(world.health() <= SHIP_MAX_HEALTH);
                prop_assert!(world.score >= last_score);
                prop_assert!(world.wave >= last_wave && world.wave >= 1);
                prop_assert!(world
                    .ship
                    .effects
                    .active()
                    .iter()
                    .all(|e| e.remaining_ticks <= EFFECT_DURATION_TICKS));
                prop_assert!(world.registry.iter().all(|e| !e.has_exited()));
                last_score = world.score;
                last_wave = world.wave;
            }
        }

        prop_assert!(game_overs <= 1);
        if game.world().health() == 0 {
            prop_assert_eq!(game.phase(), GamePhase::GameOver);
        }
    }

    #[test]
    fn test_same_seed_same_session(seed in any::<u64>(), script in script_strategy()) {
        let mut a = started(seed);
        let mut b = started(seed);
        for (input, frames) in &script {
            for _ in 0..*frames {
                let ea = a.advance(TICK_MS, input);
                let eb = b.advance(TICK_MS, input);
                prop_assert_eq!(ea, eb);
            }
        }
        prop_assert_eq!(a.hud(), b.hud());
        prop_assert_eq!(a.world().final_stats(), b.world().final_stats());
        prop_assert_eq!(a.world().registry.len(), b.world().registry.len());
    }

    #[test]
    fn test_pause_freezes_everything(seed in any::<u64>(), warmup in 1u32..600, idle in 1u32..600) {
        let mut game = started(seed);
        let fire = TickInput { fire: true, ..Default::default() };
        for _ in 0..warmup {
            game.advance(TICK_MS, &fire);
        }
        if game.phase() != GamePhase::Playing {
            return Ok(());
        }

        game.pause().unwrap();
        let before = game.world().clone();
        for _ in 0..idle {
            let events = game.advance(TICK_MS, &fire);
            prop_assert!(events.is_empty());
        }
        let after = game.world();
        prop_assert_eq!(after.stats, before.stats);
        prop_assert_eq!(after.score, before.score);
        prop_assert_eq!(after.ship.pos, before.ship.pos);
        prop_assert_eq!(after.ship.effects.active(), before.ship.effects.active());
        prop_assert_eq!(after.registry.len(), before.registry.len());
    }
}
