use crate::camera::CameraPose;
use deskscene_input::ViewAction;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Logical window size. The projection aspect always uses this size.
pub const WINDOW_WIDTH: u32 = 1000;
pub const WINDOW_HEIGHT: u32 = 800;
pub const ASPECT: f32 = WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
pub const ORTHO_HALF_HEIGHT: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    /// Projection for a vertical field of view of `zoom` degrees.
    ///
    /// Orthographic ignores `zoom` and spans `±10` vertically, `±10 * aspect`
    /// horizontally.
    pub fn matrix(self, zoom: f32, aspect: f32) -> Mat4 {
        match self {
            ProjectionMode::Perspective => {
                Mat4::perspective_rh(zoom.to_radians(), aspect, NEAR_PLANE, FAR_PLANE)
            }
            ProjectionMode::Orthographic => {
                let half_w = ORTHO_HALF_HEIGHT * aspect;
                Mat4::orthographic_rh(
                    -half_w,
                    half_w,
                    -ORTHO_HALF_HEIGHT,
                    ORTHO_HALF_HEIGHT,
                    NEAR_PLANE,
                    FAR_PLANE,
                )
            }
        }
    }
}

/// Default pose restored by P, O and 1.
pub const FRONT_POSE: CameraPose = CameraPose::new(Vec3::new(0.0, 5.0, 12.0), -90.0, -20.0);
pub const TOP_POSE: CameraPose = CameraPose::new(Vec3::new(0.0, 15.0, 0.0), -90.0, -89.9);
pub const SIDE_POSE: CameraPose = CameraPose::new(Vec3::new(15.0, 5.0, 0.0), -180.0, -20.0);

/// Projection and camera pose an edge-triggered view key switches to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewPreset {
    pub mode: ProjectionMode,
    pub pose: CameraPose,
}

impl ViewPreset {
    pub fn for_action(action: ViewAction) -> ViewPreset {
        let (mode, pose) = match action {
            ViewAction::Perspective => (ProjectionMode::Perspective, FRONT_POSE),
            ViewAction::Orthographic | ViewAction::FrontView => {
                (ProjectionMode::Orthographic, FRONT_POSE)
            }
            ViewAction::TopView => (ProjectionMode::Orthographic, TOP_POSE),
            ViewAction::SideView => (ProjectionMode::Orthographic, SIDE_POSE),
        };
        ViewPreset { mode, pose }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-4;

    #[test]
    fn aspect_is_fixed_logical_size() {
        assert_eq!(ASPECT, 1.25);
    }

    #[test]
    fn orthographic_maps_box_corners_to_ndc() {
        let m = ProjectionMode::Orthographic.matrix(80.0, ASPECT);
        let corner = m * Vec4::new(12.5, 10.0, -NEAR_PLANE, 1.0);
        assert!((corner.x - 1.0).abs() < EPS);
        assert!((corner.y - 1.0).abs() < EPS);
        assert!(corner.z.abs() < EPS);
        let far = m * Vec4::new(-12.5, -10.0, -FAR_PLANE, 1.0);
        assert!((far.x + 1.0).abs() < EPS && (far.y + 1.0).abs() < EPS);
        assert!((far.z - 1.0).abs() < EPS);
    }

    #[test]
    fn perspective_uses_zoom_as_vertical_fov() {
        let m = ProjectionMode::Perspective.matrix(80.0, ASPECT);
        let focal = 1.0 / (40.0f32.to_radians()).tan();
        assert!((m.y_axis.y - focal).abs() < EPS);
        assert!((m.x_axis.x - focal / ASPECT).abs() < EPS);
    }

    #[test]
    fn presets_match_keys() {
        let p = ViewPreset::for_action(ViewAction::Perspective);
        assert_eq!(p.mode, ProjectionMode::Perspective);
        assert_eq!(p.pose, FRONT_POSE);

        for action in [ViewAction::Orthographic, ViewAction::FrontView] {
            let p = ViewPreset::for_action(action);
            assert_eq!(p.mode, ProjectionMode::Orthographic);
            assert_eq!(p.pose, FRONT_POSE);
        }

        let top = ViewPreset::for_action(ViewAction::TopView);
        assert_eq!(top.pose.position, Vec3::new(0.0, 15.0, 0.0));
        assert_eq!(top.pose.pitch, -89.9);

        let side = ViewPreset::for_action(ViewAction::SideView);
        assert_eq!(side.pose.position, Vec3::new(15.0, 5.0, 0.0));
        assert_eq!(side.pose.yaw, -180.0);
    }
}
