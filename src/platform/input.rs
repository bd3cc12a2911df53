//! Keyboard and touch flags

use glam::Vec2;

use crate::sim::TickInput;

/// Movement directions (screen space, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Move(Direction),
    Fire,
    Pause,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Option<Self> {
        let key = match key {
            "ArrowLeft" | "a" | "A" => Key::Move(Direction::Left),
            "ArrowRight" | "d" | "D" => Key::Move(Direction::Right),
            "ArrowUp" | "w" | "W" => Key::Move(Direction::Up),
            "ArrowDown" | "s" | "S" => Key::Move(Direction::Down),
            " " | "Spacebar" => Key::Fire,
            "Escape" | "p" | "P" => Key::Pause,
            _ => return None,
        };
        Some(key)
    }
}

/// One flag per direction for each source
#[derive(Debug, Clone, Copy, Default)]
struct DirectionFlags {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl DirectionFlags {
    fn set(&mut self, dir: Direction, on: bool) {
        match dir {
            Direction::Left => self.left = on,
            Direction::Right => self.right = on,
            Direction::Up => self.up = on,
            Direction::Down => self.down = on,
        }
    }
}

/// Currently active inputs
///
/// Keyboard and touch are tracked separately so lifting a touch button
/// never cancels a held key. Fire and pause presses are latched until the
/// next tick consumes them.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: DirectionFlags,
    touch: DirectionFlags,
    /// Touch fire button held
    touch_fire: bool,
    fire_pressed: bool,
    pause_pressed: bool,
    pub autopilot: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Move(dir) => self.keys.set(dir, true),
            Key::Fire => self.fire_pressed = true,
            Key::Pause => self.pause_pressed = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if let Key::Move(dir) = key {
            self.keys.set(dir, false);
        }
    }

    pub fn touch_direction(&mut self, dir: Direction, active: bool) {
        self.touch.set(dir, active);
    }

    pub fn touch_fire(&mut self, active: bool) {
        self.touch_fire = active;
    }

    /// Drop every held flag (focus lost)
    pub fn release_all(&mut self) {
        *self = Self {
            autopilot: self.autopilot,
            ..Self::default()
        };
    }

    /// Net directional intent with each axis in `[-1, 1]`
    pub fn movement(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| match (neg, pos) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        let left = self.keys.left || self.touch.left;
        let right = self.keys.right || self.touch.right;
        let up = self.keys.up || self.touch.up;
        let down = self.keys.down || self.touch.down;
        Vec2::new(axis(left, right), axis(up, down))
    }

    /// Input for the next tick without consuming presses
    pub fn peek(&self) -> TickInput {
        TickInput {
            movement: self.movement(),
            fire: self.fire_pressed || self.touch_fire,
            pause: self.pause_pressed,
            autopilot: self.autopilot,
        }
    }

    /// Input for the next tick; latched presses are consumed
    pub fn take(&mut self) -> TickInput {
        let input = self.peek();
        self.clear_fire();
        self.clear_pause();
        input
    }

    /// Forget a latched fire press (a tick has seen it)
    pub fn clear_fire(&mut self) {
        self.fire_pressed = false;
    }

    pub fn clear_pause(&mut self) {
        self.pause_pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom("a"), Some(Key::Move(Direction::Left)));
        assert_eq!(Key::from_dom("ArrowDown"), Some(Key::Move(Direction::Down)));
        assert_eq!(Key::from_dom(" "), Some(Key::Fire));
        assert_eq!(Key::from_dom("Escape"), Some(Key::Pause));
        assert_eq!(Key::from_dom("q"), None);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::new();
        input.key_down(Key::Move(Direction::Left));
        input.key_down(Key::Move(Direction::Up));
        assert_eq!(input.movement(), Vec2::new(-1.0, -1.0));
        input.touch_direction(Direction::Right, true);
        assert_eq!(input.movement(), Vec2::new(0.0, -1.0));
        input.key_up(Key::Move(Direction::Left));
        assert_eq!(input.movement(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_presses_are_consumed() {
        let mut input = InputState::new();
        input.key_down(Key::Fire);
        input.key_down(Key::Pause);
        let first = input.take();
        assert!(first.fire && first.pause);
        let second = input.take();
        assert!(!second.fire && !second.pause);
    }

    #[test]
    fn test_touch_fire_is_held() {
        let mut input = InputState::new();
        input.touch_fire(true);
        assert!(input.take().fire);
        assert!(input.take().fire);
        input.release_all();
        assert!(!input.take().fire);
    }
}
