use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// The primitive shapes the mesh library knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Plane,
    Box,
    Cylinder,
    TaperedCylinder,
    Cone,
    Sphere,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Plane,
        PrimitiveKind::Box,
        PrimitiveKind::Cylinder,
        PrimitiveKind::TaperedCylinder,
        PrimitiveKind::Cone,
        PrimitiveKind::Sphere,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Plane => "plane",
            PrimitiveKind::Box => "box",
            PrimitiveKind::Cylinder => "cylinder",
            PrimitiveKind::TaperedCylinder => "tapered_cylinder",
            PrimitiveKind::Cone => "cone",
            PrimitiveKind::Sphere => "sphere",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Scale, Euler rotation (degrees, applied X then Y then Z) and translation.
///
/// The composed model matrix is `T * Rx * Ry * Rz * S`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trs {
    pub scale: Vec3,
    pub rotation_degrees: Vec3,
    pub translation: Vec3,
}

impl Default for Trs {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            rotation_degrees: Vec3::ZERO,
            translation: Vec3::ZERO,
        }
    }
}

impl Trs {
    pub fn new(scale: Vec3, translation: Vec3) -> Self {
        Self {
            scale,
            rotation_degrees: Vec3::ZERO,
            translation,
        }
    }

    pub fn with_rotation(mut self, x_degrees: f32, y_degrees: f32, z_degrees: f32) -> Self {
        self.rotation_degrees = Vec3::new(x_degrees, y_degrees, z_degrees);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation_degrees;
        Mat4::from_translation(self.translation)
            * Mat4::from_rotation_x(r.x.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_z(r.z.to_radians())
            * Mat4::from_scale(self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn trs_default_is_identity() {
        assert_eq!(Trs::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn origin_maps_to_translation() {
        let trs = Trs::new(Vec3::new(2.0, 0.5, 7.0), Vec3::new(-8.0, 2.0, 0.3))
            .with_rotation(-50.0, 90.0, 13.0);
        let origin = trs.matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(origin.abs_diff_eq(Vec4::new(-8.0, 2.0, 0.3, 1.0), 1e-6));
    }

    #[test]
    fn zero_rotation_is_translate_times_scale() {
        let trs = Trs::new(Vec3::new(25.0, 0.4, 8.0), Vec3::new(0.0, -0.3, 0.0));
        let expected = Mat4::from_translation(trs.translation) * Mat4::from_scale(trs.scale);
        assert!(trs.matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn euler_order_is_x_then_y_then_z() {
        // Z is applied to the vertex first, so a unit X vector rotated 90 deg about Z
        // becomes +Y, then 90 deg about X becomes +Z.
        let trs = Trs::default().with_rotation(90.0, 0.0, 90.0);
        let v = trs.matrix() * Vec4::new(1.0, 0.0, 0.0, 0.0);
        assert!(v.abs_diff_eq(Vec4::new(0.0, 0.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn primitive_names_are_distinct() {
        let mut names: Vec<_> = PrimitiveKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), PrimitiveKind::ALL.len());
    }
}
