//! `lumen [CONFIG] [OUTPUT]`
//!
//! Renders the built-in Cornell box with settings from an optional JSON file
//! and writes a PNG.

use std::f32::consts::PI;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_core::{
    CameraDesc, MaterialDesc, Mesh, ObjectDesc, RenderSettings, SceneDescription, ShapeDesc,
    TextureDesc,
};
use lumen_math::Vec3;

/// Render the Lumen Cornell box to a PNG
#[derive(Debug, Parser)]
#[command(name = "lumen", version, about)]
struct Cli {
    /// JSON render settings; defaults are used when omitted
    config: Option<PathBuf>,

    /// Output image path
    #[arg(default_value = "render.png")]
    output: PathBuf,
}

/// Side length of the Cornell box.
const BOX: f32 = 555.0;

fn cornell_box() -> SceneDescription {
    let camera = CameraDesc {
        position: Vec3::new(BOX / 2.0, BOX / 2.0, -800.0),
        direction: Vec3::Z,
        up: Vec3::Y,
        distance: 800.0,
        screen_width: BOX,
    };
    let mut scene = SceneDescription::new("cornell", camera);

    scene.add_material(MaterialDesc::lambertian("white", Vec3::splat(186.0)));
    scene.add_material(MaterialDesc::lambertian("red", Vec3::new(166.0, 13.0, 13.0)));
    scene.add_material(MaterialDesc::lambertian("green", Vec3::new(31.0, 115.0, 38.0)));
    scene.add_material(
        MaterialDesc::lambertian("light", Vec3::splat(255.0))
            .with_emission(Vec3::splat(255.0 * 15.0))
            .with_emission_tint(false),
    );
    scene.add_material(MaterialDesc::metal("steel", Vec3::new(205.0, 210.0, 215.0), 0.05));
    scene.add_material(MaterialDesc::dielectric("glass", Vec3::splat(255.0), 1.5, 0.0));
    scene.add_material(MaterialDesc::lambertian(
        "checker",
        TextureDesc::Checkered {
            even: Vec3::new(230.0, 200.0, 60.0),
            odd: Vec3::new(40.0, 40.0, 90.0),
            cell_size: Vec3::splat(20.0),
        },
    ));

    // Walls: left (green), right (red), floor, ceiling, back (white)
    scene.add_object(ObjectDesc::new(
        ShapeDesc::RectYZ {
            a: Vec3::new(BOX, 0.0, 0.0),
            b: Vec3::new(BOX, BOX, BOX),
        },
        "green",
    ));
    scene.add_object(ObjectDesc::new(
        ShapeDesc::RectYZ {
            a: Vec3::ZERO,
            b: Vec3::new(0.0, BOX, BOX),
        },
        "red",
    ));
    scene.add_object(ObjectDesc::new(
        ShapeDesc::RectXZ {
            a: Vec3::ZERO,
            b: Vec3::new(BOX, 0.0, BOX),
        },
        "white",
    ));
    scene.add_object(ObjectDesc::new(
        ShapeDesc::RectXZ {
            a: Vec3::new(0.0, BOX, 0.0),
            b: Vec3::new(BOX, BOX, BOX),
        },
        "white",
    ));
    scene.add_object(ObjectDesc::new(
        ShapeDesc::RectXY {
            a: Vec3::new(0.0, 0.0, BOX),
            b: Vec3::new(BOX, BOX, BOX),
        },
        "white",
    ));

    // Ceiling light panel, just below the ceiling
    scene.add_object(ObjectDesc::new(
        ShapeDesc::RectXZ {
            a: Vec3::new(213.0, BOX - 1.0, 227.0),
            b: Vec3::new(343.0, BOX - 1.0, 332.0),
        },
        "light",
    ));

    // Tall metal box, turned
    scene.add_object(
        ObjectDesc::new(
            ShapeDesc::Cuboid {
                a: Vec3::ZERO,
                b: Vec3::new(165.0, 330.0, 165.0),
            },
            "steel",
        )
        .rotated_y(15.0 * PI / 180.0)
        .translated(Vec3::new(265.0, 0.0, 295.0)),
    );

    // Short glass box
    scene.add_object(
        ObjectDesc::new(
            ShapeDesc::Cuboid {
                a: Vec3::ZERO,
                b: Vec3::splat(165.0),
            },
            "glass",
        )
        .rotated_y(-18.0 * PI / 180.0)
        .translated(Vec3::new(130.0, 0.0, 65.0)),
    );

    // Checkered sphere resting on the floor
    scene.add_object(ObjectDesc::new(
        ShapeDesc::Sphere {
            center: Vec3::new(420.0, 60.0, 120.0),
            radius: 60.0,
        },
        "checker",
    ));

    // Small octahedron floating above the glass box
    scene.add_object(
        ObjectDesc::new(ShapeDesc::Mesh(Arc::new(Mesh::octahedron(45.0))), "white")
            .rotated_y(PI / 4.0)
            .translated(Vec3::new(212.0, 250.0, 147.0)),
    );

    scene
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => {
            log::info!("Loading render settings from {}", path.display());
            RenderSettings::from_path(path).with_context(|| {
                format!("Failed to load render settings from {}", path.display())
            })?
        }
        None => {
            log::info!("No settings file given, using defaults");
            RenderSettings::default()
        }
    };
    let output = cli.output;

    log::info!("Starting Lumen");

    let description = cornell_box();
    let scene = lumen_renderer::build_scene(&description, &settings)
        .context("Failed to build scene")?;
    let result = lumen_renderer::render(&scene, &settings).context("Render failed")?;

    let rgb = result.image.to_rgb8(settings.gamma);
    image::save_buffer(
        &output,
        &rgb,
        settings.width,
        settings.height,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!(
        "Wrote {} ({}x{}, {:.2?})",
        output.display(),
        settings.width,
        settings.height,
        result.elapsed
    );

    Ok(())
}
