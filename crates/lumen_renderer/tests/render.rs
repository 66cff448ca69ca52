//! End-to-end renders through the public API.

use std::sync::Arc;

use lumen_core::{CameraDesc, MaterialDesc, Mesh, ObjectDesc, SceneDescription, ShapeDesc};
use lumen_renderer::{build_scene, render, RenderSettings, Vec3};

fn settings() -> RenderSettings {
    RenderSettings {
        width: 9,
        height: 9,
        max_depth: 1,
        samples_per_pixel: 1,
        gamma: 0.45,
        background: [0.0, 0.0, 0.0],
        threads: 2,
        seed: 5,
        bucket_size: 4,
    }
}

fn pixel(rgb: &[u8], width: u32, x: u32, y: u32) -> [u8; 3] {
    let i = 3 * (y * width + x) as usize;
    [rgb[i], rgb[i + 1], rgb[i + 2]]
}

#[test]
fn emissive_sphere_against_black() {
    let mut desc = SceneDescription::new("emitter", CameraDesc::default());
    desc.add_material(
        MaterialDesc::lambertian("light", Vec3::splat(255.0)).with_emission(Vec3::splat(255.0)),
    );
    desc.add_object(ObjectDesc::new(
        ShapeDesc::Sphere {
            center: Vec3::new(0.0, 0.0, -3.0),
            radius: 1.0,
        },
        "light",
    ));

    let settings = settings();
    let scene = build_scene(&desc, &settings).unwrap();
    let output = render(&scene, &settings).unwrap();
    let rgb = output.image.to_rgb8(settings.gamma);

    assert!(output.is_complete());
    assert_eq!(rgb.len(), 9 * 9 * 3);
    assert_eq!(pixel(&rgb, 9, 4, 4), [255, 255, 255]);
    assert_eq!(pixel(&rgb, 9, 0, 0), [0, 0, 0]);
    assert_eq!(pixel(&rgb, 9, 8, 8), [0, 0, 0]);
}

#[test]
fn lit_box_scene_is_deterministic() {
    let mut desc = SceneDescription::new("box", CameraDesc::default());
    desc.add_material(MaterialDesc::lambertian("white", Vec3::splat(220.0)));
    desc.add_material(MaterialDesc::metal("steel", Vec3::splat(200.0), 0.1));
    desc.add_material(MaterialDesc::dielectric("glass", Vec3::splat(255.0), 1.5, 0.0));
    desc.add_material(
        MaterialDesc::lambertian("lamp", Vec3::splat(255.0))
            .with_emission(Vec3::splat(255.0))
            .with_emission_tint(false),
    );

    desc.add_object(ObjectDesc::new(
        ShapeDesc::RectXZ {
            a: Vec3::new(-2.0, -1.0, -6.0),
            b: Vec3::new(2.0, -1.0, 0.0),
        },
        "white",
    ));
    desc.add_object(ObjectDesc::new(
        ShapeDesc::RectXZ {
            a: Vec3::new(-0.5, 1.5, -4.0),
            b: Vec3::new(0.5, 1.5, -3.0),
        },
        "lamp",
    ));
    desc.add_object(
        ObjectDesc::new(
            ShapeDesc::Cuboid {
                a: Vec3::splat(-0.4),
                b: Vec3::splat(0.4),
            },
            "steel",
        )
        .rotated_y(0.4)
        .translated(Vec3::new(-0.8, -0.6, -4.0)),
    );
    desc.add_object(ObjectDesc::new(
        ShapeDesc::Sphere {
            center: Vec3::new(0.8, -0.5, -3.5),
            radius: 0.5,
        },
        "glass",
    ));
    desc.add_object(
        ObjectDesc::new(ShapeDesc::Mesh(Arc::new(Mesh::octahedron(0.3))), "white")
            .translated(Vec3::new(0.0, 0.3, -4.5)),
    );

    let settings = RenderSettings {
        width: 16,
        height: 12,
        max_depth: 6,
        samples_per_pixel: 3,
        threads: 1,
        ..settings()
    };
    let scene = build_scene(&desc, &settings).unwrap();

    let first = render(&scene, &settings).unwrap();
    let second = render(
        &scene,
        &RenderSettings {
            threads: 3,
            ..settings.clone()
        },
    )
    .unwrap();

    assert_eq!(first.image, second.image);
    assert!(first.image.pixels.iter().all(|c| c.is_finite()));
    assert!(first.image.pixels.iter().any(|c| c.max_element() > 0.0));
}
