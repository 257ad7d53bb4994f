//! Keyboard and touch input mapping
//!
//! DOM events update an [`InputState`]; once per frame the game loop takes a
//! [`TickInput`] snapshot from it.

use glam::Vec2;

use crate::settings::TouchControls;
use crate::sim::TickInput;

/// Joystick pad radius in CSS pixels
pub const JOYSTICK_RADIUS_PX: f32 = 48.0;
/// Viewports this narrow get touch controls in `Auto` mode
pub const TOUCH_MAX_WIDTH_PX: f64 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Pause,
}

impl KeyAction {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            " " => Some(Self::Fire),
            "Escape" => Some(Self::Pause),
            _ => None,
        }
    }
}

/// Held keys and touch state between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    fire_key: bool,
    fire_touch: bool,
    joystick: Option<Vec2>,
    pause_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the key is bound (caller should prevent default)
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(action) = KeyAction::from_key(key) else {
            return false;
        };
        match action {
            KeyAction::Left => self.left = true,
            KeyAction::Right => self.right = true,
            KeyAction::Up => self.up = true,
            KeyAction::Down => self.down = true,
            KeyAction::Fire => self.fire_key = true,
            KeyAction::Pause => self.pause_requested = true,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(action) = KeyAction::from_key(key) else {
            return false;
        };
        match action {
            KeyAction::Left => self.left = false,
            KeyAction::Right => self.right = false,
            KeyAction::Up => self.up = false,
            KeyAction::Down => self.down = false,
            KeyAction::Fire => self.fire_key = false,
            KeyAction::Pause => {}
        }
        true
    }

    /// Touch moved to `(dx, dy)` CSS pixels from the pad center
    pub fn set_joystick_offset(&mut self, dx: f32, dy: f32) {
        self.joystick = Some(joystick_from_offset(dx, dy, JOYSTICK_RADIUS_PX));
    }

    pub fn release_joystick(&mut self) {
        self.joystick = None;
    }

    pub fn set_touch_fire(&mut self, held: bool) {
        self.fire_touch = held;
    }

    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Drop every held key (window lost focus, keyups will never arrive)
    pub fn release_all(&mut self) {
        *self = Self {
            pause_requested: self.pause_requested,
            ..Self::default()
        };
    }

    /// Snapshot for this frame. The pause request is one-shot.
    pub fn take(&mut self) -> TickInput {
        let input = TickInput {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
            fire: self.fire_key || self.fire_touch,
            pause: self.pause_requested,
            joystick: self.joystick,
        };
        self.pause_requested = false;
        input
    }
}

/// Joystick vector from a screen offset. Screen y points down, world y up.
/// The result has magnitude at most 1.
pub fn joystick_from_offset(dx: f32, dy: f32, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    (Vec2::new(dx, -dy) / radius).clamp_length_max(1.0)
}

/// Whether to show the touch pad and fire button
pub fn use_touch_controls(setting: TouchControls, viewport_width: f64) -> bool {
    match setting {
        TouchControls::Always => true,
        TouchControls::Never => false,
        TouchControls::Auto => viewport_width <= TOUCH_MAX_WIDTH_PX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(KeyAction::from_key("ArrowLeft"), Some(KeyAction::Left));
        assert_eq!(KeyAction::from_key("D"), Some(KeyAction::Right));
        assert_eq!(KeyAction::from_key("w"), Some(KeyAction::Up));
        assert_eq!(KeyAction::from_key(" "), Some(KeyAction::Fire));
        assert_eq!(KeyAction::from_key("Escape"), Some(KeyAction::Pause));
        assert_eq!(KeyAction::from_key("q"), None);
    }

    #[test]
    fn test_held_keys_and_one_shot_pause() {
        let mut input = InputState::new();
        input.key_down("a");
        input.key_down(" ");
        input.key_down("Escape");

        let first = input.take();
        assert!(first.left && first.fire && first.pause);
        let second = input.take();
        assert!(second.left && second.fire);
        assert!(!second.pause);

        input.key_up("A");
        assert!(!input.take().left);
    }

    #[test]
    fn test_joystick_clamped_and_flipped() {
        let stick = joystick_from_offset(96.0, 0.0, JOYSTICK_RADIUS_PX);
        assert_eq!(stick, Vec2::new(1.0, 0.0));

        let stick = joystick_from_offset(0.0, 24.0, JOYSTICK_RADIUS_PX);
        assert_eq!(stick, Vec2::new(0.0, -0.5));
    }

    #[test]
    fn test_touch_fire_and_release() {
        let mut input = InputState::new();
        input.set_touch_fire(true);
        input.set_joystick_offset(10.0, 10.0);
        let snap = input.take();
        assert!(snap.fire);
        assert!(snap.joystick.is_some());

        input.release_all();
        let snap = input.take();
        assert!(!snap.fire);
        assert!(snap.joystick.is_none());
    }

    #[test]
    fn test_touch_controls_mode() {
        assert!(use_touch_controls(TouchControls::Auto, 768.0));
        assert!(!use_touch_controls(TouchControls::Auto, 1024.0));
        assert!(use_touch_controls(TouchControls::Always, 1920.0));
        assert!(!use_touch_controls(TouchControls::Never, 320.0));
    }
}
