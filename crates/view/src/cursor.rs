use glam::Vec2;

/// Converts absolute cursor positions into per-event deltas.
///
/// The first position seen only seeds the tracker, so the view does not jump
/// when the cursor first enters the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorTracker {
    last: Option<Vec2>,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cursor position. Returns the delta from the previous one.
    pub fn moved_to(&mut self, x: f32, y: f32) -> Option<Vec2> {
        let pos = Vec2::new(x, y);
        let delta = self.last.map(|last| pos - last);
        self.last = Some(pos);
        delta
    }

    /// Forget the last position; the next event seeds again.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn is_seeded(&self) -> bool {
        self.last.is_some()
    }
}
