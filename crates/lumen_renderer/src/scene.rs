//! Turning a scene description into something that can be rendered.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::{
    mesh_bvh, BvhNode, Camera, Checkered, Cuboid, Dielectric, Hittable, Lambertian, Light,
    Material, Metal, Rect, SolidColor, Sphere, Texture, Transformed,
};
use lumen_core::{
    CameraDesc, MaterialDesc, MaterialKind, MeshError, ObjectDesc, RenderSettings,
    SceneDescription, ShapeDesc, TextureDesc, TransformStep,
};
use lumen_math::{Vec3, Vec3Ext};

/// Problems found in a scene description before rendering starts.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Object {object} uses unknown material '{material}'")]
    UnknownMaterial { object: usize, material: String },

    #[error("Material '{name}' is invalid: {reason}")]
    InvalidMaterial { name: String, reason: String },

    #[error("Object {object} has invalid geometry: {reason}")]
    InvalidShape { object: usize, reason: String },

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Object {object} has an invalid mesh: {source}")]
    Mesh {
        object: usize,
        #[source]
        source: MeshError,
    },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A scene ready for rendering: one camera and one root object.
pub struct Scene {
    pub camera: Camera,
    pub world: Box<dyn Hittable>,
}

impl Scene {
    pub fn new(camera: Camera, world: Box<dyn Hittable>) -> Self {
        Self { camera, world }
    }
}

/// Validate a scene description and build its geometry.
///
/// Every object becomes a primitive (wrapped in its transforms, in order) and
/// the whole set is placed in one BVH. The camera takes its resolution from
/// `settings`.
pub fn build_scene(desc: &SceneDescription, settings: &RenderSettings) -> SceneResult<Scene> {
    validate_camera(&desc.camera)?;

    let materials = desc
        .materials
        .iter()
        .map(|m| build_material(m).map(|material| (m.name.as_str(), material)))
        .collect::<SceneResult<HashMap<&str, Arc<dyn Material>>>>()?;

    let objects = desc
        .objects
        .iter()
        .enumerate()
        .map(|(index, object)| build_object(index, object, &materials))
        .collect::<SceneResult<Vec<_>>>()?;

    log::info!(
        "Scene '{}': {} objects, {} materials, {} mesh triangles",
        desc.name,
        desc.object_count(),
        materials.len(),
        desc.total_triangle_count()
    );

    let camera = Camera::from_desc(&desc.camera, settings.width, settings.height);
    Ok(Scene::new(camera, Box::new(BvhNode::new(objects))))
}

fn validate_camera(camera: &CameraDesc) -> SceneResult<()> {
    if !camera.position.is_finite() || !camera.up.is_finite() {
        return Err(SceneError::InvalidCamera("non-finite position or up".into()));
    }
    if !camera.direction.is_finite() || camera.direction.is_near_zero() {
        return Err(SceneError::InvalidCamera("view direction must be non-zero".into()));
    }
    if !(camera.distance.is_finite() && camera.distance > 0.0) {
        return Err(SceneError::InvalidCamera("screen distance must be positive".into()));
    }
    if !(camera.screen_width.is_finite() && camera.screen_width > 0.0) {
        return Err(SceneError::InvalidCamera("screen width must be positive".into()));
    }
    Ok(())
}

fn build_texture(desc: &TextureDesc) -> Option<Arc<dyn Texture>> {
    match *desc {
        TextureDesc::Solid(color) if color.is_finite() => Some(Arc::new(SolidColor::new(color))),
        TextureDesc::Checkered {
            even,
            odd,
            cell_size,
        } if even.is_finite() && odd.is_finite() => {
            Some(Arc::new(Checkered::new(even, odd, cell_size)))
        }
        _ => None,
    }
}

fn build_material(desc: &MaterialDesc) -> SceneResult<Arc<dyn Material>> {
    let invalid = |reason: &str| SceneError::InvalidMaterial {
        name: desc.name.clone(),
        reason: reason.to_string(),
    };

    let albedo = build_texture(&desc.albedo).ok_or_else(|| invalid("albedo must be finite"))?;
    let emitter = match desc.emission {
        Some(color) if !color.is_finite() => return Err(invalid("emission must be finite")),
        Some(color) => Some(Light::Diffuse(color)),
        None => None,
    };

    let material: Arc<dyn Material> = match desc.kind {
        MaterialKind::Lambertian => {
            let mut material = Lambertian::with_texture(albedo).with_emitter_tint(desc.tint_emission);
            if let Some(light) = emitter {
                material = material.with_emitter(light);
            }
            Arc::new(material)
        }
        MaterialKind::Metal { fuzz } => {
            if !fuzz.is_finite() {
                return Err(invalid("fuzz must be finite"));
            }
            let mut material = Metal::with_texture(albedo, fuzz);
            if let Some(light) = emitter {
                material = material.with_emitter(light);
            }
            Arc::new(material)
        }
        MaterialKind::Dielectric {
            refractive_index,
            roughness,
        } => {
            if !(refractive_index.is_finite() && refractive_index > 0.0) {
                return Err(invalid("refractive index must be positive"));
            }
            if !roughness.is_finite() {
                return Err(invalid("roughness must be finite"));
            }
            let mut material =
                Dielectric::with_texture(albedo, refractive_index).with_roughness(roughness);
            if let Some(light) = emitter {
                material = material.with_emitter(light);
            }
            Arc::new(material)
        }
    };

    Ok(material)
}

fn build_object(
    index: usize,
    object: &ObjectDesc,
    materials: &HashMap<&str, Arc<dyn Material>>,
) -> SceneResult<Box<dyn Hittable>> {
    let invalid = |reason: &str| SceneError::InvalidShape {
        object: index,
        reason: reason.to_string(),
    };

    let material = materials
        .get(object.material.as_str())
        .cloned()
        .ok_or_else(|| SceneError::UnknownMaterial {
            object: index,
            material: object.material.clone(),
        })?;

    let mut hittable: Box<dyn Hittable> = match &object.shape {
        ShapeDesc::Sphere { center, radius } => {
            if !center.is_finite() || !radius.is_finite() || *radius < 0.0 {
                return Err(invalid("sphere needs a finite center and non-negative radius"));
            }
            Box::new(Sphere::new(*center, *radius, material))
        }
        ShapeDesc::RectXY { a, b } => {
            let (a, b) = corners(a, b, &invalid)?;
            Box::new(Rect::xy(a, b, material))
        }
        ShapeDesc::RectXZ { a, b } => {
            let (a, b) = corners(a, b, &invalid)?;
            Box::new(Rect::xz(a, b, material))
        }
        ShapeDesc::RectYZ { a, b } => {
            let (a, b) = corners(a, b, &invalid)?;
            Box::new(Rect::yz(a, b, material))
        }
        ShapeDesc::Cuboid { a, b } => {
            let (a, b) = corners(a, b, &invalid)?;
            Box::new(Cuboid::new(a, b, material))
        }
        ShapeDesc::Mesh(mesh) => Box::new(
            mesh_bvh(mesh, material).map_err(|source| SceneError::Mesh {
                object: index,
                source,
            })?,
        ),
    };

    for step in &object.transforms {
        hittable = Box::new(match *step {
            TransformStep::Translate(offset) if offset.is_finite() => {
                Transformed::translate(hittable, offset)
            }
            TransformStep::RotateX(angle) if angle.is_finite() => Transformed::rotate_x(hittable, angle),
            TransformStep::RotateY(angle) if angle.is_finite() => Transformed::rotate_y(hittable, angle),
            TransformStep::RotateZ(angle) if angle.is_finite() => Transformed::rotate_z(hittable, angle),
            _ => return Err(invalid("transform parameters must be finite")),
        });
    }

    Ok(hittable)
}

fn corners(
    a: &Vec3,
    b: &Vec3,
    invalid: &dyn Fn(&str) -> SceneError,
) -> SceneResult<(Vec3, Vec3)> {
    if a.is_finite() && b.is_finite() {
        Ok((*a, *b))
    } else {
        Err(invalid("corners must be finite"))
    }
}
