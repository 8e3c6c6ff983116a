use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    P,
    O,
    Digit1,
    Digit2,
    Digit3,
    Escape,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Q,
        Key::E,
        Key::P,
        Key::O,
        Key::Digit1,
        Key::Digit2,
        Key::Digit3,
        Key::Escape,
    ];
}

/// Polled keyboard state, sampled once per frame.
pub trait KeyboardState {
    fn is_pressed(&self, key: Key) -> bool;
}

/// Set of keys currently held down, fed from press/release events.
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    held: BTreeSet<Key>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    /// Forget every held key (focus loss).
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl KeyboardState for HeldKeys {
    fn is_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}

impl<const N: usize> From<[Key; N]> for HeldKeys {
    fn from(keys: [Key; N]) -> Self {
        Self {
            held: keys.into_iter().collect(),
        }
    }
}
