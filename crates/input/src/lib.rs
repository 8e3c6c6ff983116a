//! Keyboard input mapped to backend-neutral keys and view actions.
//!
//! # Invariants
//! - The windowing layer translates its own key codes into `Key`; nothing here
//!   depends on a windowing library.
//! - Edge-triggered keys fire once per press, however many frames they are held.

pub mod action;
pub mod key;
pub mod latch;

pub use action::ViewAction;
pub use key::{HeldKeys, Key, KeyboardState};
pub use latch::InputLatch;

pub fn crate_info() -> &'static str {
    "deskscene-input v0.1.0"
}
