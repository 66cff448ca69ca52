//! Rigid transform wrappers.
//!
//! `Transformed` maps a world-space ray into the local space of the wrapped
//! object, intersects there and maps the hit back. The local ray direction is
//! not renormalized, so the hit parameter `t` means the same thing in both
//! spaces and can be compared against other world-space hits.

use crate::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Mat4, Mat4Ext, Ray, Vec3, Vec3Ext};

/// An object placed in the world by a transform matrix.
pub struct Transformed {
    inner: Box<dyn Hittable>,
    local_to_world: Mat4,
    world_to_local: Mat4,
    normal_matrix: Mat4,
    bbox: Aabb,
}

impl Transformed {
    /// Wrap `inner` with an arbitrary invertible local-to-world matrix.
    pub fn new(inner: Box<dyn Hittable>, local_to_world: Mat4) -> Self {
        let world_to_local = local_to_world.inverse();
        let bbox = local_to_world.transform_aabb(&inner.bounding_box());

        Self {
            inner,
            local_to_world,
            world_to_local,
            normal_matrix: local_to_world.normal_matrix(),
            bbox,
        }
    }

    pub fn translate(inner: Box<dyn Hittable>, offset: Vec3) -> Self {
        Self::new(inner, Mat4::from_translation(offset))
    }

    /// Rotate about the X axis by `angle` radians.
    pub fn rotate_x(inner: Box<dyn Hittable>, angle: f32) -> Self {
        Self::new(inner, Mat4::from_rotation_x(angle))
    }

    /// Rotate about the Y axis by `angle` radians.
    pub fn rotate_y(inner: Box<dyn Hittable>, angle: f32) -> Self {
        Self::new(inner, Mat4::from_rotation_y(angle))
    }

    /// Rotate about the Z axis by `angle` radians.
    pub fn rotate_z(inner: Box<dyn Hittable>, angle: f32) -> Self {
        Self::new(inner, Mat4::from_rotation_z(angle))
    }

    pub fn local_to_world(&self) -> Mat4 {
        self.local_to_world
    }
}

impl Hittable for Transformed {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let local_ray = Ray::new(
            self.world_to_local.transform_point3(ray.origin()),
            self.world_to_local.transform_vector3(ray.direction()),
        );

        let mut rec = self.inner.hit(&local_ray, ray_t)?;

        rec.p = self.local_to_world.transform_point3(rec.p);
        rec.normal = self
            .normal_matrix
            .transform_vector3(rec.normal)
            .normalize_or_degenerate(rec.normal);

        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
