//! Shared types for the desk scene renderer.
//!
//! # Invariants
//! - Uniform names live in one table (`Uniform`); nothing else spells them.
//! - `Trs` always composes as `T * Rx * Ry * Rz * S`.

pub mod types;
pub mod uniform;

pub use types::{PrimitiveKind, Trs};
pub use uniform::{LIGHT_COUNT, LightField, Uniform, UniformValue};

pub fn crate_info() -> &'static str {
    "deskscene-common v0.1.0"
}
