use bytemuck::{Pod, Zeroable};
use deskscene_common::PrimitiveKind;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

const RADIAL_SEGMENTS: u32 = 36;
const SPHERE_STACKS: u32 = 24;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv: uv.to_array(),
        }
    }
}

/// CPU-side triangle mesh with counter-clockwise front faces.
///
/// Primitive conventions:
/// - plane: 2x2 quad in XZ at y=0, normal +Y
/// - box: unit cube centred on the origin
/// - cylinder: radius 1 from y=0 to y=1, capped
/// - tapered cylinder: radius 1 at y=0 narrowing to 0.5 at y=1, capped
/// - cone: radius 1 at y=0 to an apex at y=1, base capped
/// - sphere: radius 1 centred on the origin
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Plane => Self::plane(),
            PrimitiveKind::Box => Self::cube(),
            PrimitiveKind::Cylinder => Self::frustum(1.0, 1.0, true),
            PrimitiveKind::TaperedCylinder => Self::frustum(1.0, 0.5, true),
            PrimitiveKind::Cone => Self::frustum(1.0, 0.0, false),
            PrimitiveKind::Sphere => Self::sphere(),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| {
                let p = Vec3::from(v.position);
                (lo.min(p), hi.max(p))
            },
        )
    }

    fn plane() -> Self {
        let mut mesh = Self::default();
        mesh.push_quad(Vec3::ZERO, Vec3::X, Vec3::NEG_Z);
        mesh
    }

    fn cube() -> Self {
        let mut mesh = Self::default();
        let faces = [
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        ];
        for (normal, u, v) in faces {
            mesh.push_quad(normal * 0.5, u * 0.5, v * 0.5);
        }
        mesh
    }

    /// Quad centred at `center` spanning `±half_u` and `±half_v`; faces `half_u x half_v`.
    fn push_quad(&mut self, center: Vec3, half_u: Vec3, half_v: Vec3) {
        let normal = half_u.cross(half_v).normalize();
        let base = self.vertices.len() as u32;
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (su, sv) in corners {
            let position = center + half_u * su + half_v * sv;
            let uv = Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5);
            self.vertices.push(MeshVertex::new(position, normal, uv));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    /// Surface of revolution around +Y between y=0 and y=1.
    fn frustum(bottom_radius: f32, top_radius: f32, cap_top: bool) -> Self {
        let mut mesh = Self::default();
        let slope = bottom_radius - top_radius;

        let ring_start = mesh.vertices.len() as u32;
        for i in 0..=RADIAL_SEGMENTS {
            let t = i as f32 / RADIAL_SEGMENTS as f32;
            let (sin, cos) = (t * TAU).sin_cos();
            let normal = Vec3::new(cos, slope, sin).normalize();
            let bottom = Vec3::new(cos * bottom_radius, 0.0, sin * bottom_radius);
            let top = Vec3::new(cos * top_radius, 1.0, sin * top_radius);
            mesh.vertices.push(MeshVertex::new(bottom, normal, Vec2::new(t, 0.0)));
            mesh.vertices.push(MeshVertex::new(top, normal, Vec2::new(t, 1.0)));
        }
        for i in 0..RADIAL_SEGMENTS {
            let b0 = ring_start + i * 2;
            let t0 = b0 + 1;
            let b1 = b0 + 2;
            let t1 = b0 + 3;
            mesh.indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
        }

        mesh.push_cap(0.0, bottom_radius, Vec3::NEG_Y);
        if cap_top && top_radius > 0.0 {
            mesh.push_cap(1.0, top_radius, Vec3::Y);
        }
        mesh
    }

    fn push_cap(&mut self, y: f32, radius: f32, normal: Vec3) {
        let center = self.vertices.len() as u32;
        self.vertices
            .push(MeshVertex::new(Vec3::new(0.0, y, 0.0), normal, Vec2::splat(0.5)));
        for i in 0..=RADIAL_SEGMENTS {
            let (sin, cos) = (i as f32 / RADIAL_SEGMENTS as f32 * TAU).sin_cos();
            let position = Vec3::new(cos * radius, y, sin * radius);
            let uv = Vec2::new(0.5 + 0.5 * cos, 0.5 + 0.5 * sin);
            self.vertices.push(MeshVertex::new(position, normal, uv));
        }
        for i in 0..RADIAL_SEGMENTS {
            let a = center + 1 + i;
            let b = a + 1;
            if normal.y < 0.0 {
                self.indices.extend_from_slice(&[center, a, b]);
            } else {
                self.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    fn sphere() -> Self {
        let mut mesh = Self::default();
        let row = RADIAL_SEGMENTS + 1;
        for j in 0..=SPHERE_STACKS {
            let v = j as f32 / SPHERE_STACKS as f32;
            let (sin_phi, cos_phi) = (PI * (1.0 - v)).sin_cos();
            for i in 0..=RADIAL_SEGMENTS {
                let u = i as f32 / RADIAL_SEGMENTS as f32;
                let (sin_theta, cos_theta) = (u * TAU).sin_cos();
                let p = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta);
                mesh.vertices.push(MeshVertex::new(p, p, Vec2::new(u, v)));
            }
        }
        for j in 0..SPHERE_STACKS {
            for i in 0..RADIAL_SEGMENTS {
                let b0 = j * row + i;
                let b1 = b0 + 1;
                let t0 = b0 + row;
                let t1 = t0 + 1;
                mesh.indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{a} != {b}");
    }

    #[test]
    fn indices_are_valid_triangles() {
        for kind in PrimitiveKind::ALL {
            let mesh = MeshData::primitive(kind);
            assert_eq!(mesh.indices.len() % 3, 0, "{kind}");
            assert!(mesh.triangle_count() > 0, "{kind}");
            let n = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < n), "{kind}");
        }
    }

    #[test]
    fn normals_are_unit_length() {
        for kind in PrimitiveKind::ALL {
            for v in MeshData::primitive(kind).vertices {
                let len = Vec3::from(v.normal).length();
                assert!((len - 1.0).abs() < 1e-5, "{kind}: {len}");
            }
        }
    }

    #[test]
    fn winding_faces_along_normals() {
        for kind in PrimitiveKind::ALL {
            let mesh = MeshData::primitive(kind);
            for tri in mesh.indices.chunks(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| mesh.vertices[i as usize]);
                let (pa, pb, pc) = (
                    Vec3::from(a.position),
                    Vec3::from(b.position),
                    Vec3::from(c.position),
                );
                let face = (pb - pa).cross(pc - pa);
                if face.length() < 1e-6 {
                    continue;
                }
                let shading = Vec3::from(a.normal) + Vec3::from(b.normal) + Vec3::from(c.normal);
                assert!(face.dot(shading) > 0.0, "{kind}: inward triangle {tri:?}");
            }
        }
    }

    #[test]
    fn primitive_bounds_follow_conventions() {
        let (lo, hi) = MeshData::primitive(PrimitiveKind::Plane).bounds();
        assert_close(lo, Vec3::new(-1.0, 0.0, -1.0));
        assert_close(hi, Vec3::new(1.0, 0.0, 1.0));

        let (lo, hi) = MeshData::primitive(PrimitiveKind::Box).bounds();
        assert_close(lo, Vec3::splat(-0.5));
        assert_close(hi, Vec3::splat(0.5));

        for kind in [PrimitiveKind::Cylinder, PrimitiveKind::TaperedCylinder, PrimitiveKind::Cone] {
            let (lo, hi) = MeshData::primitive(kind).bounds();
            assert_close(lo, Vec3::new(-1.0, 0.0, -1.0));
            assert_close(hi, Vec3::new(1.0, 1.0, 1.0));
        }

        let (lo, hi) = MeshData::primitive(PrimitiveKind::Sphere).bounds();
        assert_close(lo, Vec3::splat(-1.0));
        assert_close(hi, Vec3::splat(1.0));
    }

    #[test]
    fn tapered_top_ring_is_half_radius() {
        let mesh = MeshData::primitive(PrimitiveKind::TaperedCylinder);
        let top_radius = mesh
            .vertices
            .iter()
            .filter(|v| (v.position[1] - 1.0).abs() < 1e-6)
            .map(|v| Vec2::new(v.position[0], v.position[2]).length())
            .fold(0.0f32, f32::max);
        assert!((top_radius - 0.5).abs() < 1e-5);
    }
}
