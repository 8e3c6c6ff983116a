//! The desk still life as an ordered table of placements.
//!
//! Draw order matters: blending is on and rows are drawn top to bottom.

use crate::kinematics::{LampPose, LampRig};
use deskscene_common::{PrimitiveKind, Trs};
use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;
use std::f32::consts::PI;

pub const HANDLE_SEGMENTS: usize = 7;

/// Shading uniforms one placement writes before its draw.
///
/// Fields left `None` are not written, so the previous draw's value
/// carries over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Shading {
    pub color: Option<Vec4>,
    pub texture: Option<&'static str>,
    pub uv_scale: Option<Vec2>,
    pub material: Option<&'static str>,
}

impl Shading {
    pub fn material(tag: &'static str) -> Self {
        Self {
            material: Some(tag),
            ..Self::default()
        }
    }

    pub fn texture(tag: &'static str, u: f32, v: f32) -> Self {
        Self {
            texture: Some(tag),
            uv_scale: Some(Vec2::new(u, v)),
            ..Self::default()
        }
    }

    /// Texture plus UV scale plus material.
    pub fn textured(tag: &'static str, u: f32, v: f32, material: &'static str) -> Self {
        Self {
            material: Some(material),
            ..Self::texture(tag, u, v)
        }
    }

    pub fn solid(color: Vec4) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }
}

/// One primitive draw in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObjectPlacement {
    pub name: &'static str,
    pub kind: PrimitiveKind,
    pub transform: Trs,
    pub shading: Shading,
}

impl ObjectPlacement {
    fn new(name: &'static str, kind: PrimitiveKind, transform: Trs, shading: Shading) -> Self {
        Self {
            name,
            kind,
            transform,
            shading,
        }
    }
}

fn trs(scale: Vec3, translation: Vec3) -> Trs {
    Trs::new(scale, translation)
}

/// Build the full desk scene with the default lamp rig.
pub fn desk_scene() -> Vec<ObjectPlacement> {
    desk_scene_with_lamp(&LampRig::default())
}

pub fn desk_scene_with_lamp(rig: &LampRig) -> Vec<ObjectPlacement> {
    let mut rows = Vec::with_capacity(25);
    rows.push(ObjectPlacement::new(
        "ground_plane",
        PrimitiveKind::Plane,
        trs(Vec3::new(100.0, 1.0, 100.0), Vec3::new(0.0, -0.3, 0.0)),
        Shading::material("burntsand"),
    ));
    rows.push(ObjectPlacement::new(
        "desk_top",
        PrimitiveKind::Box,
        trs(Vec3::new(25.0, 0.4, 8.0), Vec3::new(0.0, -0.3, 0.0)),
        Shading::texture("wood", 2.5, 1.5),
    ));

    push_lamp(&mut rows, rig);

    // Laptop, closed, sitting on the desk.
    let laptop_scale = Vec3::new(7.0, 0.13, 4.5);
    let laptop_pos = Vec3::new(0.0, -0.1 + laptop_scale.y / 2.0, 0.0);
    let lid_scale = Vec3::new(6.9, 0.10, 4.4);
    let lid_pos = laptop_pos + Vec3::new(0.0, (laptop_scale.y + lid_scale.y) / 2.0, 0.0);
    rows.push(ObjectPlacement::new(
        "laptop_base",
        PrimitiveKind::Box,
        trs(laptop_scale, laptop_pos),
        Shading::textured("darkplastic", 2.0, 1.5, "darkplastic"),
    ));
    rows.push(ObjectPlacement::new(
        "laptop_lid",
        PrimitiveKind::Box,
        trs(lid_scale, lid_pos),
        Shading::textured("stainless", 2.0, 1.5, "steel"),
    ));

    push_mug(&mut rows);

    rows.push(ObjectPlacement::new(
        "book_tall",
        PrimitiveKind::Box,
        trs(Vec3::new(0.50, 2.17, 1.62), Vec3::new(5.9, -0.1 + 0.95 / 2.0, 1.0))
            .with_rotation(0.0, 0.0, -8.0),
        Shading::textured("darkplastic", 0.5, 1.0, "darkplastic"),
    ));
    rows.push(ObjectPlacement::new(
        "book_short",
        PrimitiveKind::Box,
        trs(Vec3::new(0.47, 1.67, 1.37), Vec3::new(6.5, -0.1 + 0.95 / 2.0, 1.0)),
        Shading::textured("plastic", 0.5, 1.0, "plastic"),
    ));
    rows.push(ObjectPlacement::new(
        "book_flat",
        PrimitiveKind::Box,
        trs(Vec3::new(1.37, 0.45, 2.27), Vec3::new(7.89, -0.1 + 0.18 / 2.0, 0.98))
            .with_rotation(0.0, -90.0, 0.0),
        Shading::textured("gold", 0.7, 1.0, "gold"),
    ));
    rows
}

fn push_lamp(rows: &mut Vec<ObjectPlacement>, rig: &LampRig) {
    let LampPose {
        shoulder,
        elbow,
        head,
        shade,
        bulb,
    } = rig.solve();
    let joint = Vec3::splat(0.25);

    rows.push(ObjectPlacement::new(
        "lamp_base",
        PrimitiveKind::Cylinder,
        trs(Vec3::new(1.5, 0.3, 1.5), Vec3::new(-8.0, 0.6, 0.0)),
        Shading::texture("stainless", 3.0, 3.0),
    ));
    rows.push(ObjectPlacement::new(
        "lamp_post",
        PrimitiveKind::Cylinder,
        trs(Vec3::new(0.3, 1.0, 0.3), Vec3::new(-8.0, 1.0, 0.0)),
        Shading::texture("darkplastic", 1.0, 1.0),
    ));
    let lower = rig.lower_arm;
    rows.push(ObjectPlacement::new(
        "lamp_lower_arm",
        PrimitiveKind::TaperedCylinder,
        trs(Vec3::new(0.15, lower.length, 0.15), shoulder).with_rotation(
            lower.x_degrees,
            lower.y_degrees,
            0.0,
        ),
        Shading::material("darkplastic"),
    ));
    rows.push(ObjectPlacement::new(
        "lamp_elbow",
        PrimitiveKind::Sphere,
        trs(joint, elbow),
        Shading::texture("plastic", 1.0, 1.0),
    ));
    let upper = rig.upper_arm;
    rows.push(ObjectPlacement::new(
        "lamp_upper_arm",
        PrimitiveKind::TaperedCylinder,
        trs(Vec3::new(0.15, upper.length, 0.15), elbow).with_rotation(
            upper.x_degrees,
            upper.y_degrees,
            0.0,
        ),
        Shading::textured("darkplastic", 1.0, 1.0, "darkplastic"),
    ));
    rows.push(ObjectPlacement::new(
        "lamp_head",
        PrimitiveKind::Sphere,
        trs(joint, head),
        Shading::texture("plastic", 1.0, 1.0),
    ));
    let neck = rig.neck;
    rows.push(ObjectPlacement::new(
        "lamp_neck",
        PrimitiveKind::Cylinder,
        trs(Vec3::new(0.12, neck.length, 0.12), head).with_rotation(
            neck.x_degrees,
            neck.y_degrees,
            0.0,
        ),
        Shading::material("darkplastic"),
    ));
    rows.push(ObjectPlacement::new(
        "lamp_shade",
        PrimitiveKind::Cone,
        trs(Vec3::new(1.2, 0.8, 1.2), shade).with_rotation(rig.shade_x_degrees, 0.0, 0.0),
        Shading::texture("stainless", 1.0, 1.0),
    ));
    rows.push(ObjectPlacement::new(
        "lamp_bulb",
        PrimitiveKind::Sphere,
        trs(Vec3::splat(0.2), bulb),
        Shading::textured("gold", 1.0, 1.0, "gold"),
    ));
}

const HANDLE_NAMES: [&str; HANDLE_SEGMENTS] = [
    "mug_handle_0",
    "mug_handle_1",
    "mug_handle_2",
    "mug_handle_3",
    "mug_handle_4",
    "mug_handle_5",
    "mug_handle_6",
];

fn push_mug(rows: &mut Vec<ObjectPlacement>) {
    let cup_pos = Vec3::new(4.5, -0.1, 0.3);
    let cup_scale = Vec3::new(0.42, 0.95, 0.42);
    rows.push(ObjectPlacement::new(
        "mug_body",
        PrimitiveKind::Cylinder,
        trs(cup_scale, cup_pos),
        Shading::textured("plastic", 1.0, 1.0, "plastic"),
    ));
    rows.push(ObjectPlacement::new(
        "mug_rim",
        PrimitiveKind::TaperedCylinder,
        trs(Vec3::new(0.48, 0.09, 0.48), cup_pos + Vec3::new(0.0, 0.94, 0.0))
            .with_rotation(180.0, 0.0, 0.0),
        Shading::textured("stainless", 2.0, 1.5, "steel"),
    ));

    // Half-circle of short cylinders on the mug's +X side, bottom to top.
    let mug_radius = cup_scale.x / 2.0;
    let handle_radius = mug_radius * 0.8;
    let segment_radius = 0.07;
    let segment_length = 0.13;
    let center = Vec3::new(
        cup_pos.x + mug_radius + handle_radius + segment_radius * 0.72,
        cup_pos.y + cup_scale.y / 2.0,
        cup_pos.z,
    );
    for (i, name) in HANDLE_NAMES.into_iter().enumerate() {
        let t = i as f32 / (HANDLE_SEGMENTS - 1) as f32;
        let angle = -PI / 2.0 + t * PI;
        let position = center + handle_radius * Vec3::new(angle.cos(), angle.sin(), 0.0);
        rows.push(ObjectPlacement::new(
            name,
            PrimitiveKind::Cylinder,
            trs(Vec3::new(segment_radius, segment_length, segment_radius), position)
                .with_rotation(0.0, 0.0, angle.to_degrees()),
            Shading::textured("plastic", 1.0, 1.0, "plastic"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn row<'a>(rows: &'a [ObjectPlacement], name: &str) -> &'a ObjectPlacement {
        rows.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn scene_has_twenty_five_rows() {
        assert_eq!(desk_scene().len(), 25);
    }

    #[test]
    fn names_are_unique() {
        let rows = desk_scene();
        let names: BTreeSet<&str> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), rows.len());
    }

    #[test]
    fn draw_order_is_fixed() {
        let rows = desk_scene();
        assert_eq!(rows[0].name, "ground_plane");
        assert_eq!(rows[1].name, "desk_top");
        assert_eq!(rows[10].name, "lamp_bulb");
        assert_eq!(rows[15].name, "mug_handle_0");
        assert_eq!(rows[21].name, "mug_handle_6");
        assert_eq!(rows[24].name, "book_flat");
    }

    #[test]
    fn ground_plane_only_sets_material() {
        let rows = desk_scene();
        let plane = row(&rows, "ground_plane");
        assert_eq!(plane.kind, PrimitiveKind::Plane);
        assert_eq!(plane.shading, Shading::material("burntsand"));
    }

    #[test]
    fn laptop_lid_rests_on_base() {
        let rows = desk_scene();
        let base = row(&rows, "laptop_base").transform.translation;
        let lid = row(&rows, "laptop_lid").transform.translation;
        assert!((base.y - -0.035).abs() < 1e-6);
        assert!((lid.y - 0.08).abs() < 1e-6);
    }

    #[test]
    fn handle_follows_arc() {
        let rows = desk_scene();
        let center = Vec3::new(4.5 + 0.21 + 0.168 + 0.0504, 0.375, 0.3);
        for (i, name) in HANDLE_NAMES.iter().enumerate() {
            let seg = row(&rows, name);
            let offset = seg.transform.translation - center;
            assert!((offset.length() - 0.168).abs() < 1e-5, "{name}");
            assert_eq!(offset.z, 0.0);
            let expected_deg = -90.0 + 30.0 * i as f32;
            assert!((seg.transform.rotation_degrees.z - expected_deg).abs() < 1e-3);
            assert_eq!(seg.transform.scale, Vec3::new(0.07, 0.13, 0.07));
        }
        let first = row(&rows, "mug_handle_0").transform.translation;
        assert!(first.y < center.y);
    }

    #[test]
    fn lamp_joints_come_from_kinematics() {
        let rows = desk_scene();
        let pose = LampRig::default().solve();
        assert_eq!(row(&rows, "lamp_elbow").transform.translation, pose.elbow);
        assert_eq!(row(&rows, "lamp_upper_arm").transform.translation, pose.elbow);
        assert_eq!(row(&rows, "lamp_head").transform.translation, pose.head);
        assert_eq!(row(&rows, "lamp_neck").transform.translation, pose.head);
        assert_eq!(row(&rows, "lamp_shade").transform.translation, pose.shade);
        assert_eq!(row(&rows, "lamp_bulb").transform.translation, pose.bulb);
        assert_eq!(
            row(&rows, "lamp_upper_arm").transform.rotation_degrees,
            Vec3::new(-25.0, 90.0, 0.0)
        );
    }

    #[test]
    fn every_tag_is_known() {
        let textures = ["stainless", "gold", "wood", "plastic", "darkplastic"];
        let materials = ["steel", "plastic", "darkplastic", "gold", "burntsand"];
        for r in desk_scene() {
            if let Some(t) = r.shading.texture {
                assert!(textures.contains(&t), "{}: texture {t}", r.name);
            }
            if let Some(m) = r.shading.material {
                assert!(materials.contains(&m), "{}: material {m}", r.name);
            }
        }
    }
}
