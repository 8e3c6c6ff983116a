use crate::key::{Key, KeyboardState};
use std::collections::BTreeSet;

/// Per-key edge detection for keys that should fire once per press.
///
/// A key fires on the first frame it is seen pressed, then stays latched
/// until a frame observes it released.
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    latched: BTreeSet<Key>,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's state for `key`. Returns true on the rising edge only.
    pub fn poll(&mut self, key: Key, pressed: bool) -> bool {
        if !pressed {
            self.latched.remove(&key);
            return false;
        }
        let fired = self.latched.insert(key);
        if fired {
            tracing::debug!(?key, "key latched");
        }
        fired
    }

    /// Poll a batch of keys against a keyboard snapshot, returning those that fired.
    pub fn poll_all(&mut self, keys: &[Key], state: &impl KeyboardState) -> Vec<Key> {
        keys.iter()
            .copied()
            .filter(|&key| self.poll(key, state.is_pressed(key)))
            .collect()
    }

    pub fn is_latched(&self, key: Key) -> bool {
        self.latched.contains(&key)
    }
}
