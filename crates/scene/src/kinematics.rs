//! Forward kinematics for the articulated desk lamp.
//!
//! Every joint is found by walking one segment from its parent. A segment of
//! length `L` pitched `alpha` degrees about X and yawed `beta` degrees about
//! Y ends at `base + L * (sin(-alpha)cos(beta), cos(-alpha), sin(-alpha)sin(beta))`.

use glam::Vec3;
use serde::Serialize;

/// Tip of a segment rotated `alpha_degrees` about X and `beta_degrees` about Y.
pub fn segment_tip(base: Vec3, length: f32, alpha_degrees: f32, beta_degrees: f32) -> Vec3 {
    let a = (-alpha_degrees).to_radians();
    let b = beta_degrees.to_radians();
    base + length * Vec3::new(a.sin() * b.cos(), a.cos(), a.sin() * b.sin())
}

/// Tip of a segment in the X-Y plane: the yaw is ignored and Z is kept.
pub fn planar_tip(base: Vec3, length: f32, alpha_degrees: f32) -> Vec3 {
    let a = (-alpha_degrees).to_radians();
    base + length * Vec3::new(a.sin(), a.cos(), 0.0)
}

/// One lamp segment: its length and orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub length: f32,
    pub x_degrees: f32,
    pub y_degrees: f32,
}

/// Lamp proportions and angles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LampRig {
    /// Top of the post, where the lower arm starts.
    pub shoulder: Vec3,
    pub lower_arm: Segment,
    /// Lateral X correction for the tapered arm mesh's origin.
    pub elbow_offset_x: f32,
    pub upper_arm: Segment,
    pub neck: Segment,
    /// Shade tilt about X; 220 degrees opens the cone downward.
    pub shade_x_degrees: f32,
    /// Bulb height above the shade's apex.
    pub bulb_lift: f32,
}

impl Default for LampRig {
    fn default() -> Self {
        Self {
            shoulder: Vec3::new(-8.0, 2.0, 0.0),
            lower_arm: Segment {
                length: 2.2,
                x_degrees: -50.0,
                y_degrees: 0.0,
            },
            elbow_offset_x: -0.9,
            upper_arm: Segment {
                length: 2.0,
                x_degrees: -25.0,
                y_degrees: 90.0,
            },
            neck: Segment {
                length: 0.7,
                x_degrees: -50.0,
                y_degrees: 0.0,
            },
            shade_x_degrees: 220.0,
            bulb_lift: 0.2,
        }
    }
}

/// Solved joint positions, shoulder to bulb.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LampPose {
    pub shoulder: Vec3,
    pub elbow: Vec3,
    pub head: Vec3,
    pub shade: Vec3,
    pub bulb: Vec3,
}

impl LampRig {
    /// Walk the chain. The upper arm keeps its yaw for drawing but its tip is
    /// placed in the X-Y plane.
    pub fn solve(&self) -> LampPose {
        let lower = self.lower_arm;
        let elbow = segment_tip(self.shoulder, lower.length, lower.x_degrees, lower.y_degrees)
            + Vec3::new(self.elbow_offset_x, 0.0, 0.0);
        let head = planar_tip(elbow, self.upper_arm.length, self.upper_arm.x_degrees);
        let shade = planar_tip(head, self.neck.length, self.neck.x_degrees);
        let bulb = shade + Vec3::new(0.0, self.bulb_lift, 0.0);
        LampPose {
            shoulder: self.shoulder,
            elbow,
            head,
            shade,
            bulb,
        }
    }
}
