use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

pub const MOUSE_SENSITIVITY: f32 = 0.1;
pub const PITCH_LIMIT: f32 = 89.0;
pub const DEFAULT_SPEED: f32 = 5.0;
pub const MIN_SPEED: f32 = 1.0;
pub const MAX_SPEED: f32 = 20.0;
pub const DEFAULT_ZOOM: f32 = 80.0;

/// Position plus yaw/pitch in degrees. Front is always derived from the angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraPose {
    pub const fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
        }
    }
}

/// Direction a camera translates in, one per movement key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-look camera driven by mouse look, scroll speed and WASDQE.
///
/// Yaw and pitch are degrees; `front` is kept unit length and in sync with
/// them after every rotation or pose reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,
    /// Units per second; adjusted by scrolling.
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for Camera {
    /// Start pose: above and in front of the desk, looking down `(0, -0.5, -2)`.
    /// Pitch is derived from that direction so the first mouse-look keeps it.
    fn default() -> Self {
        let front = Vec3::new(0.0, -0.5, -2.0).normalize();
        Self {
            position: Vec3::new(0.0, 5.0, 12.0),
            front,
            up: Vec3::Y,
            yaw: -90.0,
            // Intentionally not 0.0: a level pitch snaps the view on the first rotate.
            pitch: front.y.asin().to_degrees(),
            zoom: DEFAULT_ZOOM,
            speed: DEFAULT_SPEED,
            sensitivity: MOUSE_SENSITIVITY,
        }
    }
}

impl Camera {
    /// Unit front vector for the given yaw and pitch, both in degrees.
    pub fn front_from_angles(yaw: f32, pitch: f32) -> Vec3 {
        let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize()
    }

    pub fn update_front(&mut self) {
        self.front = Self::front_from_angles(self.yaw, self.pitch);
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.yaw, self.pitch)
    }

    pub fn reset_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.yaw = pose.yaw;
        self.pitch = pose.pitch;
        self.update_front();
    }

    /// Strafe axis, `normalize(front x up)`.
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    /// Apply a cursor delta in screen pixels (y grows downward).
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_front();
    }

    /// Add a scroll offset to the movement speed.
    pub fn adjust_speed(&mut self, scroll_y: f32) {
        self.speed = (self.speed + scroll_y).clamp(MIN_SPEED, MAX_SPEED);
    }

    pub fn translate(&mut self, movement: Movement, dt: f32) {
        let step = self.speed * dt;
        let offset = match movement {
            Movement::Forward => self.front,
            Movement::Backward => -self.front,
            Movement::Left => -self.right(),
            Movement::Right => self.right(),
            Movement::Up => self.up,
            Movement::Down => -self.up,
        };
        self.position += offset * step;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }
}
