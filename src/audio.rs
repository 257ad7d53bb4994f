//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is a short list of [`Tone`]s; the mapping from game events to
//! effects and their tone data is platform independent, playback is wasm32 only.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player bullet(s) fired
    Shot,
    AsteroidDestroyed,
    /// Enemy hit but still alive
    EnemyHit,
    EnemyDestroyed,
    PowerUp,
    ShipHit,
    /// Hit absorbed by a shield
    ShieldBlock,
    WaveAdvance,
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator note with an exponential decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    /// Frequency glide target at the end of the decay
    pub glide_to: Option<f32>,
    pub wave: Wave,
    /// Peak gain before volume scaling
    pub gain: f32,
    /// Seconds to decay to silence
    pub decay: f64,
    /// Seconds after the trigger
    pub delay: f64,
}

const fn tone(freq: f32, wave: Wave, gain: f32, decay: f64) -> Tone {
    Tone {
        freq,
        glide_to: None,
        wave,
        gain,
        decay,
        delay: 0.0,
    }
}

const fn glide(freq: f32, to: f32, wave: Wave, gain: f32, decay: f64) -> Tone {
    Tone {
        glide_to: Some(to),
        ..tone(freq, wave, gain, decay)
    }
}

const fn at(mut t: Tone, delay: f64) -> Tone {
    t.delay = delay;
    t
}

static SHOT: [Tone; 1] = [glide(900.0, 300.0, Wave::Square, 0.08, 0.08)];
static ASTEROID: [Tone; 2] = [
    glide(140.0, 40.0, Wave::Sawtooth, 0.35, 0.3),
    tone(1200.0, Wave::Square, 0.1, 0.08),
];
static ENEMY_HIT: [Tone; 1] = [tone(320.0, Wave::Triangle, 0.25, 0.06)];
static ENEMY_DESTROYED: [Tone; 3] = [
    glide(220.0, 30.0, Wave::Sawtooth, 0.45, 0.45),
    glide(1800.0, 400.0, Wave::Square, 0.15, 0.15),
    tone(55.0, Wave::Sine, 0.35, 0.3),
];
static POWER_UP: [Tone; 3] = [
    tone(600.0, Wave::Sine, 0.25, 0.15),
    at(tone(800.0, Wave::Sine, 0.25, 0.15), 0.08),
    at(tone(1000.0, Wave::Sine, 0.25, 0.2), 0.16),
];
static SHIP_HIT: [Tone; 2] = [
    glide(180.0, 60.0, Wave::Square, 0.4, 0.25),
    tone(90.0, Wave::Sine, 0.4, 0.2),
];
static SHIELD_BLOCK: [Tone; 1] = [glide(500.0, 900.0, Wave::Triangle, 0.2, 0.12)];
static WAVE_ADVANCE: [Tone; 4] = [
    tone(400.0, Wave::Triangle, 0.3, 0.4),
    at(tone(500.0, Wave::Triangle, 0.3, 0.4), 0.1),
    at(tone(600.0, Wave::Triangle, 0.3, 0.4), 0.2),
    at(tone(800.0, Wave::Triangle, 0.3, 0.5), 0.3),
];
static GAME_OVER: [Tone; 4] = [
    tone(400.0, Wave::Sine, 0.3, 0.3),
    at(tone(350.0, Wave::Sine, 0.3, 0.3), 0.2),
    at(tone(300.0, Wave::Sine, 0.3, 0.3), 0.4),
    at(glide(200.0, 80.0, Wave::Sine, 0.35, 0.6), 0.6),
];

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerFired { .. } => Some(SoundEffect::Shot),
            GameEvent::AsteroidDestroyed => Some(SoundEffect::AsteroidDestroyed),
            GameEvent::EnemyHit => Some(SoundEffect::EnemyHit),
            GameEvent::EnemyDestroyed => Some(SoundEffect::EnemyDestroyed),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUp),
            GameEvent::ShipHit { damage: 0 } => Some(SoundEffect::ShieldBlock),
            GameEvent::ShipHit { .. } => Some(SoundEffect::ShipHit),
            GameEvent::WaveAdvanced { .. } => Some(SoundEffect::WaveAdvance),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::ScoreChanged { .. }
            | GameEvent::HealthChanged { .. }
            | GameEvent::EnemyFired
            | GameEvent::PowerUpExpired { .. } => None,
        }
    }

    /// Distinct sounds for a batch of events, in first-seen order
    pub fn for_events(events: &[GameEvent]) -> Vec<Self> {
        let mut effects: Vec<Self> = Vec::new();
        for effect in events.iter().filter_map(Self::for_event) {
            if !effects.contains(&effect) {
                effects.push(effect);
            }
        }
        effects
    }

    pub fn tones(&self) -> &'static [Tone] {
        match self {
            SoundEffect::Shot => &SHOT,
            SoundEffect::AsteroidDestroyed => &ASTEROID,
            SoundEffect::EnemyHit => &ENEMY_HIT,
            SoundEffect::EnemyDestroyed => &ENEMY_DESTROYED,
            SoundEffect::PowerUp => &POWER_UP,
            SoundEffect::ShipHit => &SHIP_HIT,
            SoundEffect::ShieldBlock => &SHIELD_BLOCK,
            SoundEffect::WaveAdvance => &WAVE_ADVANCE,
            SoundEffect::GameOver => &GAME_OVER,
        }
    }

    /// Seconds before the same effect may retrigger
    pub fn cooldown(&self) -> f64 {
        match self {
            SoundEffect::Shot => 0.09,
            SoundEffect::EnemyHit | SoundEffect::ShieldBlock => 0.05,
            _ => 0.0,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::collections::HashMap;

    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{SoundEffect, Tone, Wave};
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        volume: f32,
        last_played: HashMap<SoundEffect, f64>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: settings.effective_volume(),
                last_played: HashMap::new(),
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Play a sound effect unless it is still cooling down
        pub fn play(&mut self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let now = ctx.current_time();
            if let Some(last) = self.last_played.get(&effect) {
                if now - last < effect.cooldown() {
                    return;
                }
            }
            self.last_played.insert(effect, now);

            for tone in effect.tones() {
                schedule(ctx, tone, self.volume, now);
            }
        }
    }

    fn oscillator_type(wave: Wave) -> OscillatorType {
        match wave {
            Wave::Sine => OscillatorType::Sine,
            Wave::Square => OscillatorType::Square,
            Wave::Sawtooth => OscillatorType::Sawtooth,
            Wave::Triangle => OscillatorType::Triangle,
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(ctx: &AudioContext, tone: &Tone) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(oscillator_type(tone.wave));
        osc.frequency().set_value(tone.freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn schedule(ctx: &AudioContext, tone: &Tone, volume: f32, now: f64) {
        let Some((osc, gain)) = create_osc(ctx, tone) else {
            return;
        };
        let t = now + tone.delay;
        let end = t + tone.decay;

        gain.gain().set_value_at_time(volume * tone.gain, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        if let Some(to) = tone.glide_to {
            osc.frequency().set_value_at_time(tone.freq, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(to, end).ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerUpKind;

    #[test]
    fn test_event_mapping() {
        assert_eq!(
            SoundEffect::for_event(&GameEvent::PlayerFired { count: 3 }),
            Some(SoundEffect::Shot)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ShipHit { damage: 0 }),
            Some(SoundEffect::ShieldBlock)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ShipHit { damage: 20 }),
            Some(SoundEffect::ShipHit)
        );
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ScoreChanged { score: 10 }),
            None
        );
    }

    #[test]
    fn test_batch_is_deduplicated() {
        let events = [
            GameEvent::PlayerFired { count: 1 },
            GameEvent::AsteroidDestroyed,
            GameEvent::ScoreChanged { score: 10 },
            GameEvent::PlayerFired { count: 1 },
            GameEvent::PowerUpCollected {
                kind: PowerUpKind::Shield,
            },
        ];
        assert_eq!(
            SoundEffect::for_events(&events),
            vec![
                SoundEffect::Shot,
                SoundEffect::AsteroidDestroyed,
                SoundEffect::PowerUp
            ]
        );
    }

    #[test]
    fn test_tones_are_audible() {
        let all = [
            SoundEffect::Shot,
            SoundEffect::AsteroidDestroyed,
            SoundEffect::EnemyHit,
            SoundEffect::EnemyDestroyed,
            SoundEffect::PowerUp,
            SoundEffect::ShipHit,
            SoundEffect::ShieldBlock,
            SoundEffect::WaveAdvance,
            SoundEffect::GameOver,
        ];
        for effect in all {
            let tones = effect.tones();
            assert!(!tones.is_empty(), "{effect:?}");
            for tone in tones {
                assert!(tone.freq > 0.0 && tone.gain > 0.0 && tone.decay > 0.0);
                // exponential ramps cannot target zero
                assert!(tone.glide_to.is_none_or(|f| f > 0.0));
            }
        }
    }
}
