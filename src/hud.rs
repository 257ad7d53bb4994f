//! HUD state
//!
//! Display values and toast notifications derived from simulation events and
//! backend notices. Pure data; `main.rs` copies it into the DOM.

use std::collections::VecDeque;

use crate::services::Notice;
use crate::sim::{GameEvent, HudSnapshot};

/// How long a toast stays up (ms)
pub const TOAST_MS: f32 = 3000.0;
/// Oldest toasts are dropped beyond this many
pub const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    /// Shown in the destructive style
    pub alert: bool,
    pub remaining_ms: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Hud {
    values: HudSnapshot,
    toasts: VecDeque<Toast>,
    final_score: Option<u64>,
}

impl Hud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything for a new session
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn values(&self) -> &HudSnapshot {
        &self.values
    }

    pub fn set_values(&mut self, snapshot: HudSnapshot) {
        self.values = snapshot;
    }

    /// Final score once the game over signal arrived
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn apply_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::ScoreChanged { score } => self.values.score = score,
                GameEvent::HealthChanged { health } => self.values.health = health,
                GameEvent::WaveAdvanced { wave } => {
                    self.values.wave = wave;
                    self.toast(format!("Wave {wave}"), "Enemies grow bolder".into(), false);
                }
                GameEvent::PowerUpCollected { kind } => {
                    self.toast(kind.title().into(), kind.description().into(), false);
                }
                GameEvent::GameOver { final_score } => self.final_score = Some(final_score),
                _ => {}
            }
        }
    }

    pub fn apply_notice(&mut self, notice: &Notice) {
        let alert = matches!(notice, Notice::Offline | Notice::ResultsNotSaved);
        self.toast(notice.title(), notice.body(), alert);
    }

    /// Show an arbitrary message, e.g. a blocked start
    pub fn message(&mut self, title: &str, body: &str) {
        self.toast(title.to_string(), body.to_string(), true);
    }

    fn toast(&mut self, title: String, body: String, alert: bool) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            title,
            body,
            alert,
            remaining_ms: TOAST_MS,
        });
    }

    /// Age toasts by one rendered frame
    pub fn update(&mut self, frame_ms: f32) {
        for toast in &mut self.toasts {
            toast.remaining_ms -= frame_ms;
        }
        self.toasts.retain(|t| t.remaining_ms > 0.0);
    }

    /// Lines for the active power-up list, e.g. "Shield 7s"
    pub fn effect_labels(&self) -> Vec<String> {
        self.values
            .effects
            .iter()
            .map(|e| format!("{} {}s", e.kind.label(), e.remaining_secs))
            .collect()
    }
}
