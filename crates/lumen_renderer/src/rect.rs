//! Axis-aligned rectangles.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Ray, Vec3};

/// The coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// Constant z
    XY,
    /// Constant y
    XZ,
    /// Constant x
    YZ,
}

impl Plane {
    /// Axis indices `(first in-plane, second in-plane, perpendicular)`.
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }
}

/// A rectangle lying in one of the coordinate planes.
pub struct Rect {
    plane: Plane,
    /// Coordinate along the perpendicular axis
    k: f32,
    /// Extent along the first in-plane axis
    span_a: Interval,
    /// Extent along the second in-plane axis
    span_b: Interval,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Rect {
    /// Build a rectangle from two opposite corners.
    ///
    /// The perpendicular coordinate is taken from `a`; that component of `b`
    /// is ignored.
    pub fn new(plane: Plane, a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        let (ia, ib, ik) = plane.axes();
        let k = a[ik];
        let span_a = Interval::new(a[ia].min(b[ia]), a[ia].max(b[ia]));
        let span_b = Interval::new(a[ib].min(b[ib]), a[ib].max(b[ib]));

        let mut min = Vec3::splat(k);
        let mut max = Vec3::splat(k);
        min[ia] = span_a.min;
        max[ia] = span_a.max;
        min[ib] = span_b.min;
        max[ib] = span_b.max;

        Self {
            plane,
            k,
            span_a,
            span_b,
            material,
            bbox: Aabb::from_points(min, max),
        }
    }

    pub fn xy(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XY, a, b, material)
    }

    pub fn xz(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::XZ, a, b, material)
    }

    pub fn yz(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(Plane::YZ, a, b, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }
}

/// Offset of `x` within `span`, normalized to [0, 1]; 0 for a zero-width span.
fn unit_offset(span: Interval, x: f32) -> f32 {
    let size = span.size();
    if size > 0.0 {
        (x - span.min) / size
    } else {
        0.0
    }
}

impl Hittable for Rect {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let (ia, ib, ik) = self.plane.axes();

        let dk = ray.direction()[ik];
        if dk == 0.0 {
            return None;
        }

        let t = (self.k - ray.origin()[ik]) / dk;
        if !ray_t.surrounds(t) {
            return None;
        }

        let p = ray.at(t);
        if !self.span_a.contains(p[ia]) || !self.span_b.contains(p[ib]) {
            return None;
        }

        let uv = (unit_offset(self.span_a, p[ia]), unit_offset(self.span_b, p[ib]));
        let mut rec = HitRecord::new(ray, t, Vec3::AXES[ik], uv, self.material.as_ref());
        rec.p[ik] = self.k;
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
