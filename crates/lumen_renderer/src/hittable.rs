//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
#[derive(Clone, Copy)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t` along `ray`.
    ///
    /// `outward_normal` is the geometric normal pointing out of the surface
    /// and must be unit length. The stored normal is flipped when needed so
    /// that it always opposes the ray; `front_face` remembers which side was
    /// struck.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let front_face = ray.direction().dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Self {
            p: ray.at(t),
            normal,
            material,
            u,
            v,
            t,
            front_face,
        }
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `ray` whose parameter lies strictly inside
    /// `ray_t`, if any.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// A list of hittable objects, intersected by linear scan.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Hand the objects over, e.g. to build a BVH from them.
    pub fn into_objects(self) -> Vec<Box<dyn Hittable>> {
        self.objects
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Box<dyn Hittable>> for HittableList {
    fn from_iter<I: IntoIterator<Item = Box<dyn Hittable>>>(iter: I) -> Self {
        let mut list = HittableList::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let mut closest: Option<HitRecord<'a>> = None;

        for object in &self.objects {
            let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(max)) {
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use std::sync::Arc;

    fn sphere_at(z: f32) -> Box<dyn Hittable> {
        let material = Arc::new(Lambertian::new(Vec3::splat(128.0)));
        Box::new(Sphere::new(Vec3::new(0.0, 0.0, z), 0.5, material))
    }

    #[test]
    fn test_face_normal_front() {
        let material = Lambertian::new(Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, (0.0, 0.0), &material);

        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.p, Vec3::NEG_Z);
    }

    #[test]
    fn test_face_normal_back() {
        let material = Lambertian::new(Vec3::ONE);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, (0.0, 0.0), &material);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_list_returns_nearest() {
        let list: HittableList = vec![sphere_at(-10.0), sphere_at(-3.0), sphere_at(-6.0)]
            .into_iter()
            .collect();

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = list.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        assert!((rec.t - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_list_bbox_covers_children() {
        let mut list = HittableList::new();
        list.add(sphere_at(-10.0));
        list.add(sphere_at(10.0));

        let bbox = list.bounding_box();
        assert_eq!(list.len(), 2);
        assert!((bbox.z.min + 10.5).abs() < 1e-4);
        assert!((bbox.z.max - 10.5).abs() < 1e-4);
    }

    #[test]
    fn test_empty_list_misses() {
        let list = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(list.is_empty());
        assert!(list.hit(&ray, Interval::UNIVERSE).is_none());
    }
}
