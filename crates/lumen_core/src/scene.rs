//! Scene descriptors.
//!
//! A `SceneDescription` lists a camera, named materials and objects that
//! reference those materials by name. It is pure data; the renderer crate
//! validates it and turns it into intersectable geometry.

use std::sync::Arc;

use lumen_math::Vec3;

use crate::mesh::Mesh;

/// Where a material gets its color from.
#[derive(Clone, Debug, PartialEq)]
pub enum TextureDesc {
    /// One color everywhere.
    Solid(Vec3),
    /// 3D checkerboard alternating between two colors.
    Checkered {
        even: Vec3,
        odd: Vec3,
        cell_size: Vec3,
    },
}

impl From<Vec3> for TextureDesc {
    fn from(color: Vec3) -> Self {
        TextureDesc::Solid(color)
    }
}

/// Scattering model of a material.
#[derive(Clone, Debug, PartialEq)]
pub enum MaterialKind {
    Lambertian,
    Metal { fuzz: f32 },
    Dielectric { refractive_index: f32, roughness: f32 },
}

/// A named material definition.
///
/// Colors are display-range, [0, 255] per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDesc {
    /// Name objects use to reference this material
    pub name: String,

    /// Scattering model
    pub kind: MaterialKind,

    /// Base color source
    pub albedo: TextureDesc,

    /// Emitted color, for light-emitting surfaces
    pub emission: Option<Vec3>,

    /// Whether a diffuse surface tints its own emission by its albedo
    pub tint_emission: bool,
}

impl MaterialDesc {
    pub fn lambertian(name: impl Into<String>, albedo: impl Into<TextureDesc>) -> Self {
        Self::new(name, MaterialKind::Lambertian, albedo.into())
    }

    pub fn metal(name: impl Into<String>, albedo: impl Into<TextureDesc>, fuzz: f32) -> Self {
        Self::new(name, MaterialKind::Metal { fuzz }, albedo.into())
    }

    pub fn dielectric(
        name: impl Into<String>,
        albedo: impl Into<TextureDesc>,
        refractive_index: f32,
        roughness: f32,
    ) -> Self {
        Self::new(
            name,
            MaterialKind::Dielectric {
                refractive_index,
                roughness,
            },
            albedo.into(),
        )
    }

    fn new(name: impl Into<String>, kind: MaterialKind, albedo: TextureDesc) -> Self {
        Self {
            name: name.into(),
            kind,
            albedo,
            emission: None,
            tint_emission: true,
        }
    }

    /// Make the material emit light of the given color.
    pub fn with_emission(mut self, color: Vec3) -> Self {
        self.emission = Some(color);
        self
    }

    /// Control whether emission is tinted by the albedo.
    pub fn with_emission_tint(mut self, tint: bool) -> Self {
        self.tint_emission = tint;
        self
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emission.is_some()
    }
}

/// Geometry of an object.
#[derive(Clone, Debug)]
pub enum ShapeDesc {
    Sphere { center: Vec3, radius: f32 },
    /// Rectangle in a plane of constant z; the plane is taken from `a.z`.
    RectXY { a: Vec3, b: Vec3 },
    /// Rectangle in a plane of constant y; the plane is taken from `a.y`.
    RectXZ { a: Vec3, b: Vec3 },
    /// Rectangle in a plane of constant x; the plane is taken from `a.x`.
    RectYZ { a: Vec3, b: Vec3 },
    /// Axis-aligned box spanned by two opposite corners.
    Cuboid { a: Vec3, b: Vec3 },
    /// Externally loaded triangle mesh.
    Mesh(Arc<Mesh>),
}

/// One rigid transform step. Angles are in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformStep {
    Translate(Vec3),
    RotateX(f32),
    RotateY(f32),
    RotateZ(f32),
}

/// A shape, the material it is made of and how it is placed.
#[derive(Clone, Debug)]
pub struct ObjectDesc {
    pub shape: ShapeDesc,

    /// Name of a material in the scene description
    pub material: String,

    /// Applied in order: the first step wraps the shape, the last step is outermost
    pub transforms: Vec<TransformStep>,
}

impl ObjectDesc {
    pub fn new(shape: ShapeDesc, material: impl Into<String>) -> Self {
        Self {
            shape,
            material: material.into(),
            transforms: Vec::new(),
        }
    }

    pub fn translated(mut self, offset: Vec3) -> Self {
        self.transforms.push(TransformStep::Translate(offset));
        self
    }

    pub fn rotated_x(mut self, angle: f32) -> Self {
        self.transforms.push(TransformStep::RotateX(angle));
        self
    }

    pub fn rotated_y(mut self, angle: f32) -> Self {
        self.transforms.push(TransformStep::RotateY(angle));
        self
    }

    pub fn rotated_z(mut self, angle: f32) -> Self {
        self.transforms.push(TransformStep::RotateZ(angle));
        self
    }
}

/// Pinhole camera placement.
///
/// The image plane sits `distance` units in front of `position`, is
/// `screen_width` units wide, and its height follows from the image aspect
/// ratio chosen in the render settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraDesc {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub distance: f32,
    pub screen_width: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            distance: 1.0,
            screen_width: 2.0,
        }
    }
}

/// A complete scene: one camera, named materials and objects.
#[derive(Clone, Debug, Default)]
pub struct SceneDescription {
    /// Scene name (for logging)
    pub name: String,

    pub camera: CameraDesc,

    pub materials: Vec<MaterialDesc>,

    pub objects: Vec<ObjectDesc>,
}

impl SceneDescription {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>, camera: CameraDesc) -> Self {
        Self {
            name: name.into(),
            camera,
            ..Default::default()
        }
    }

    /// Add a material. A later material with the same name replaces an earlier one.
    pub fn add_material(&mut self, material: MaterialDesc) {
        if let Some(existing) = self.materials.iter_mut().find(|m| m.name == material.name) {
            log::warn!("Material '{}' redefined", material.name);
            *existing = material;
        } else {
            self.materials.push(material);
        }
    }

    /// Add an object.
    pub fn add_object(&mut self, object: ObjectDesc) {
        self.objects.push(object);
    }

    /// Look up a material by name.
    pub fn material(&self, name: &str) -> Option<&MaterialDesc> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Get total object count.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get total triangle count across all mesh objects.
    pub fn total_triangle_count(&self) -> usize {
        self.objects
            .iter()
            .map(|o| match &o.shape {
                ShapeDesc::Mesh(mesh) => mesh.triangle_count(),
                _ => 0,
            })
            .sum()
    }
}
