use crate::camera::{Camera, Movement};
use crate::clock::FrameClock;
use crate::cursor::CursorTracker;
use crate::error::ViewError;
use crate::projection::{ASPECT, ProjectionMode, ViewPreset, WINDOW_HEIGHT, WINDOW_WIDTH};
use deskscene_common::Uniform;
use deskscene_input::{InputLatch, Key, KeyboardState, ViewAction};
use deskscene_render::ShaderProgram;
use glam::Mat4;
use std::sync::Arc;
use std::time::Instant;
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::Window;

const MOVEMENT_KEYS: [(Key, Movement); 6] = [
    (Key::W, Movement::Forward),
    (Key::S, Movement::Backward),
    (Key::A, Movement::Left),
    (Key::D, Movement::Right),
    (Key::Q, Movement::Up),
    (Key::E, Movement::Down),
];

/// Owns the camera and turns input into per-frame `view`, `projection` and
/// `viewPosition` uniforms.
#[derive(Debug)]
pub struct ViewController {
    camera: Camera,
    clock: FrameClock,
    cursor: CursorTracker,
    latch: InputLatch,
    mode: ProjectionMode,
    close_requested: bool,
    window: Option<Arc<Window>>,
}

impl ViewController {
    pub fn new(start: Instant) -> Self {
        Self {
            camera: Camera::default(),
            clock: FrameClock::new(start),
            cursor: CursorTracker::new(),
            latch: InputLatch::new(),
            mode: ProjectionMode::Perspective,
            close_requested: false,
            window: None,
        }
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.camera.sensitivity = sensitivity;
        self
    }

    /// Open the display window at the fixed logical size and keep its handle.
    ///
    /// Color blending (source-over) is a property of the render pipeline, so
    /// it is configured by the backend rather than here.
    pub fn create_window(
        &mut self,
        event_loop: &ActiveEventLoop,
        title: &str,
    ) -> Result<Arc<Window>, ViewError> {
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));
        let window = event_loop.create_window(attrs).map_err(|e| {
            tracing::error!("failed to create window: {e}");
            ViewError::from(e)
        })?;
        let window = Arc::new(window);
        self.cursor.reset();
        self.window = Some(window.clone());
        tracing::info!(title, width = WINDOW_WIDTH, height = WINDOW_HEIGHT, "window created");
        Ok(window)
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    /// Cursor moved to `(x, y)` in window pixels.
    pub fn mouse_moved(&mut self, x: f32, y: f32) {
        if let Some(delta) = self.cursor.moved_to(x, y) {
            self.camera.rotate(delta.x, delta.y);
        }
    }

    /// Scroll wheel moved by `dy` lines.
    pub fn scrolled(&mut self, dy: f32) {
        self.camera.adjust_speed(dy);
        tracing::debug!(speed = self.camera.speed, "camera speed changed");
    }

    /// Switch projection and restore the matching camera pose.
    pub fn apply_action(&mut self, action: ViewAction) {
        let preset = ViewPreset::for_action(action);
        self.mode = preset.mode;
        self.camera.reset_pose(preset.pose);
        tracing::debug!(?action, mode = ?self.mode, "view preset applied");
    }

    /// Advance the clock, apply held keys, and push the view uniforms.
    pub fn prepare_frame(
        &mut self,
        now: Instant,
        keys: &impl KeyboardState,
        shader: &mut impl ShaderProgram,
    ) {
        self.update(now, keys);
        self.push_uniforms(shader);
    }

    /// Input half of `prepare_frame`: timing, movement and edge-triggered keys.
    pub fn update(&mut self, now: Instant, keys: &impl KeyboardState) {
        let dt = self.clock.tick(now);

        if keys.is_pressed(Key::Escape) && !self.close_requested {
            tracing::info!("escape pressed, closing");
            self.close_requested = true;
        }

        for (key, movement) in MOVEMENT_KEYS {
            if keys.is_pressed(key) {
                self.camera.translate(movement, dt);
            }
        }

        for key in self.latch.poll_all(&ViewAction::KEYS, keys) {
            if let Some(action) = ViewAction::from_key(key) {
                self.apply_action(action);
            }
        }
    }

    pub fn push_uniforms(&self, shader: &mut impl ShaderProgram) {
        shader.set_uniform(Uniform::View, self.view_matrix().into());
        shader.set_uniform(Uniform::Projection, self.projection_matrix().into());
        shader.set_uniform(Uniform::ViewPosition, self.camera.position.into());
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.mode.matrix(self.camera.zoom, ASPECT)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn delta_time(&self) -> f32 {
        self.clock.delta()
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{FRONT_POSE, TOP_POSE};
    use deskscene_input::HeldKeys;
    use deskscene_render::UniformState;
    use glam::Vec3;
    use std::time::Duration;

    const EPS: f32 = 1e-4;

    #[test]
    fn prepare_frame_pushes_view_uniforms() {
        let start = Instant::now();
        let mut view = ViewController::new(start);
        let mut shader = UniformState::new();
        view.prepare_frame(start, &HeldKeys::new(), &mut shader);

        assert_eq!(shader.mat4(Uniform::View), Some(view.view_matrix()));
        assert_eq!(shader.mat4(Uniform::Projection), Some(view.projection_matrix()));
        assert_eq!(shader.vec3(Uniform::ViewPosition), Some(Vec3::new(0.0, 5.0, 12.0)));
        assert_eq!(shader.len(), 3);
    }

    #[test]
    fn held_w_moves_speed_times_delta() {
        let start = Instant::now();
        let mut view = ViewController::new(start);
        let front = view.camera().front;
        let before = view.camera().position;
        view.update(start + Duration::from_millis(100), &HeldKeys::from([Key::W]));
        let moved = view.camera().position - before;
        assert!(moved.abs_diff_eq(front * 0.5, EPS));
    }

    #[test]
    fn cleared_keys_stop_movement() {
        let start = Instant::now();
        let mut view = ViewController::new(start);
        let mut keys = HeldKeys::from([Key::W]);
        view.update(start + Duration::from_millis(100), &keys);
        let moved_to = view.camera().position;

        keys.clear();
        view.update(start + Duration::from_secs(1), &keys);
        assert_eq!(view.camera().position, moved_to);
    }

    #[test]
    fn q_lifts_and_e_dips() {
        let start = Instant::now();
        let mut view = ViewController::new(start);
        view.update(start + Duration::from_secs(1), &HeldKeys::from([Key::Q]));
        assert!((view.camera().position.y - 10.0).abs() < EPS);
        view.update(start + Duration::from_secs(2), &HeldKeys::from([Key::E]));
        assert!((view.camera().position.y - 5.0).abs() < EPS);
    }

    #[test]
    fn projection_key_fires_once_per_press() {
        let start = Instant::now();
        let mut view = ViewController::new(start);
        let held = HeldKeys::from([Key::O]);
        view.update(start, &held);
        assert_eq!(view.mode(), ProjectionMode::Orthographic);
        assert_eq!(view.camera().pose(), FRONT_POSE);

        // Moving away while O stays held must not re-trigger the reset.
        view.camera_mut().position = Vec3::new(1.0, 2.0, 3.0);
        view.update(start, &held);
        assert_eq!(view.camera().position, Vec3::new(1.0, 2.0, 3.0));

        view.update(start, &HeldKeys::new());
        view.update(start, &held);
        assert_eq!(view.camera().position, FRONT_POSE.position);
    }

    #[test]
    fn top_view_looks_straight_down() {
        let start = Instant::now();
        let mut view = ViewController::new(start);
        view.update(start, &HeldKeys::from([Key::Digit2]));
        assert_eq!(view.camera().pose(), TOP_POSE);
        assert!(view.camera().front.y < -0.999);
        assert_eq!(view.mode(), ProjectionMode::Orthographic);
    }

    #[test]
    fn first_mouse_event_does_not_rotate() {
        let mut view = ViewController::new(Instant::now());
        let before = view.camera().clone();
        view.mouse_moved(500.0, 400.0);
        assert_eq!(view.camera().yaw, before.yaw);
        assert_eq!(view.camera().pitch, before.pitch);
        view.mouse_moved(510.0, 400.0);
        assert!((view.camera().yaw - (before.yaw + 1.0)).abs() < EPS);
    }

    #[test]
    fn escape_requests_close() {
        let start = Instant::now();
        let mut view = ViewController::new(start);
        assert!(!view.close_requested());
        view.update(start, &HeldKeys::from([Key::Escape]));
        assert!(view.close_requested());
    }

    #[test]
    fn scroll_changes_speed_not_fov() {
        let mut view = ViewController::new(Instant::now());
        let projection = view.projection_matrix();
        view.scrolled(3.0);
        assert_eq!(view.camera().speed, 8.0);
        assert_eq!(view.projection_matrix(), projection);
    }
}
