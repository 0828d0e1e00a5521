//! Keyboard sampling
//!
//! Key-down/key-up events only flip bits here; the tick reads the bits.

use serde::{Deserialize, Serialize};

/// A movement key the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` identity to a game key.
    ///
    /// Letters match regardless of case (shift or caps lock held), arrows
    /// only by their exact names. Anything else is not a game key.
    pub fn from_identity(identity: &str) -> Option<Self> {
        match identity {
            "ArrowUp" => return Some(Key::ArrowUp),
            "ArrowDown" => return Some(Key::ArrowDown),
            "ArrowLeft" => return Some(Key::ArrowLeft),
            "ArrowRight" => return Some(Key::ArrowRight),
            _ => {}
        }

        let mut chars = identity.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        match c.to_ascii_lowercase() {
            'w' => Some(Key::W),
            'a' => Some(Key::A),
            's' => Some(Key::S),
            'd' => Some(Key::D),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Movement direction, in the order the motion step evaluates them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

impl Direction {
    /// Evaluation order. The last held direction decides facing.
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Back,
        Direction::Left,
        Direction::Right,
    ];

    /// Keys bound to this direction
    pub const fn keys(self) -> [Key; 2] {
        match self {
            Direction::Forward => [Key::W, Key::ArrowUp],
            Direction::Back => [Key::S, Key::ArrowDown],
            Direction::Left => [Key::A, Key::ArrowLeft],
            Direction::Right => [Key::D, Key::ArrowRight],
        }
    }

    /// Unit offset on the ground plane as (dx, dz)
    pub const fn axis(self) -> (f32, f32) {
        match self {
            Direction::Forward => (0.0, -1.0),
            Direction::Back => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }

    /// Yaw the avatar takes when moving this way (radians)
    pub const fn facing(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Direction::Forward => PI,
            Direction::Back => 0.0,
            Direction::Left => FRAC_PI_2,
            Direction::Right => -FRAC_PI_2,
        }
    }
}

/// Bitset of held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    bits: u8,
}

impl HeldKeys {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// One bit per [`Key`], in declaration order
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    pub fn set(&mut self, key: Key, held: bool) {
        if held {
            self.bits |= key.bit();
        } else {
            self.bits &= !key.bit();
        }
    }

    pub fn with(mut self, key: Key) -> Self {
        self.set(key, true);
        self
    }

    pub const fn is_held(&self, key: Key) -> bool {
        self.bits & key.bit() != 0
    }

    /// True when any key bound to `dir` is down
    pub fn direction_held(&self, dir: Direction) -> bool {
        dir.keys().iter().any(|&k| self.is_held(k))
    }

    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }
}

/// Tracks key state between ticks.
#[derive(Debug, Default)]
pub struct InputSampler {
    held: HeldKeys,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Returns the recognised key, if any.
    pub fn key_down(&mut self, identity: &str) -> Option<Key> {
        let key = Key::from_identity(identity)?;
        self.held.set(key, true);
        Some(key)
    }

    /// Record a key-up. Unknown identities are ignored.
    pub fn key_up(&mut self, identity: &str) -> Option<Key> {
        let key = Key::from_identity(identity)?;
        self.held.set(key, false);
        Some(key)
    }

    /// Release everything (e.g. window lost focus and key-ups will never come)
    pub fn release_all(&mut self) {
        self.held = HeldKeys::new();
    }

    /// Snapshot for the next tick
    pub fn held(&self) -> HeldKeys {
        self.held
    }
}
