use crate::key::Key;
use serde::{Deserialize, Serialize};

/// A discrete, edge-triggered request produced from a key press.
///
/// The view controller consumes actions, never raw key codes, for everything
/// that must happen once per press. Continuous movement keys are sampled
/// directly each frame instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewAction {
    /// Switch to perspective projection and reset the camera pose.
    Perspective,
    /// Switch to orthographic projection and reset the camera pose.
    Orthographic,
    /// Orthographic front view.
    FrontView,
    /// Orthographic top-down view.
    TopView,
    /// Orthographic right-side view.
    SideView,
}

impl ViewAction {
    /// Keys that map to an action, in the order they are polled each frame.
    pub const KEYS: [Key; 5] = [Key::P, Key::O, Key::Digit1, Key::Digit2, Key::Digit3];

    pub fn from_key(key: Key) -> Option<ViewAction> {
        match key {
            Key::P => Some(ViewAction::Perspective),
            Key::O => Some(ViewAction::Orthographic),
            Key::Digit1 => Some(ViewAction::FrontView),
            Key::Digit2 => Some(ViewAction::TopView),
            Key::Digit3 => Some(ViewAction::SideView),
            _ => None,
        }
    }
}
