//! View control: camera, input handling and the per-frame view uniforms.
//!
//! `ViewController` owns the only `Camera`. Held keys move it every frame by
//! `speed * dt`; cursor motion rotates it; P, O, 1, 2 and 3 switch projection
//! and restore a fixed pose once per press.
//!
//! # Invariants
//! - `camera.front` is unit length and agrees with yaw/pitch after every change.
//! - Pitch stays within `[-89, 89]` degrees; speed within `[1, 20]`.
//! - The projection aspect is the fixed logical window size, not the surface size.

pub mod camera;
pub mod clock;
pub mod controller;
pub mod cursor;
pub mod error;
pub mod projection;

pub use camera::{Camera, CameraPose, Movement};
pub use clock::FrameClock;
pub use controller::ViewController;
pub use cursor::CursorTracker;
pub use error::ViewError;
pub use projection::{ProjectionMode, ViewPreset, WINDOW_HEIGHT, WINDOW_WIDTH};

pub fn crate_info() -> &'static str {
    "deskscene-view v0.1.0"
}
