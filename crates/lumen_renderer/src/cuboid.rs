//! Axis-aligned boxes built from six rectangles.

use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList, Material, Rect};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// An axis-aligned box. Wrap it in a `Transformed` to rotate or move it.
pub struct Cuboid {
    sides: HittableList,
}

impl Cuboid {
    /// Create a box spanned by two opposite corners, given in any order.
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        let min = a.min(b);
        let max = a.max(b);

        let mut sides = HittableList::new();
        // Front and back (constant z)
        sides.add(Box::new(Rect::xy(min.with_z(max.z), max, material.clone())));
        sides.add(Box::new(Rect::xy(min, max.with_z(min.z), material.clone())));
        // Top and bottom (constant y)
        sides.add(Box::new(Rect::xz(min.with_y(max.y), max, material.clone())));
        sides.add(Box::new(Rect::xz(min, max.with_y(min.y), material.clone())));
        // Right and left (constant x)
        sides.add(Box::new(Rect::yz(min.with_x(max.x), max, material.clone())));
        sides.add(Box::new(Rect::yz(min, max.with_x(min.x), material)));

        Self { sides }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t)
    }

    fn bounding_box(&self) -> Aabb {
        self.sides.bounding_box()
    }
}
