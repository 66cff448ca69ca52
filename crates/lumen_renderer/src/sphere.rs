//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// UV coordinates for a point on the unit sphere centered at the origin.
    ///
    /// `u` runs around the Y axis starting at -X, `v` from -Y (0) to +Y (1).
    fn sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        if self.radius == 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::sphere_uv(outward_normal),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
