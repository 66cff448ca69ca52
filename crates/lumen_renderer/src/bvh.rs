//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built top-down by median split along the axis with the
//! widest spread of primitive centroids.

use crate::{HitRecord, Hittable};
use lumen_math::{Aabb, Interval, Ray};

/// BVH node - a branch with two children, a leaf with one primitive, or
/// nothing at all.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node wrapping a single primitive.
    Leaf(Box<dyn Hittable>),
    /// Empty tree; never hit.
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    ///
    /// Objects whose bounding box is not finite cannot be placed in the tree
    /// and are dropped with a warning.
    pub fn new(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        let before = objects.len();
        objects.retain(|object| object.bounding_box().is_finite());
        if objects.len() < before {
            log::warn!(
                "Dropped {} primitive(s) with non-finite bounds from BVH",
                before - objects.len()
            );
        }

        let count = objects.len();
        let bvh = Self::build(objects);
        log::debug!(
            "Built BVH over {} primitives (depth {})",
            count,
            bvh.depth()
        );
        bvh
    }

    /// Recursive BVH construction.
    fn build(mut objects: Vec<Box<dyn Hittable>>) -> Self {
        if objects.len() <= 1 {
            return match objects.pop() {
                Some(object) => BvhNode::Leaf(object),
                None => BvhNode::Empty,
            };
        }

        // Choose split axis based on centroid spread
        let centroid_bounds = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            let c = obj.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroid_bounds.longest_axis();

        objects.sort_by(|a, b| {
            let a_val = a.bounding_box().centroid()[axis];
            let b_val = b.bounding_box().centroid()[axis];
            a_val.total_cmp(&b_val)
        });

        // Split at median
        let mid = objects.len() / 2;
        let right_objects = objects.split_off(mid);

        let left = Self::build(objects);
        let right = Self::build(right_objects);
        let bbox = Aabb::surrounding(&left.bounding_box(), &right.bounding_box());

        BvhNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    /// Length of the longest root-to-leaf path. An empty tree has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf(_) => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of primitives stored in the tree.
    pub fn primitive_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf(_) => 1,
            BvhNode::Branch { left, right, .. } => left.primitive_count() + right.primitive_count(),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf(object) => object.hit(ray, ray_t),

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, ray_t.with_max(right_max));

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf(object) => object.bounding_box(),
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cuboid, HittableList, Lambertian, Material, Rect, Sphere, Transformed, Triangle};
    use lumen_math::Vec3;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn sphere(center: Vec3, radius: f32) -> Box<dyn Hittable> {
        Box::new(Sphere::new(
            center,
            radius,
            Arc::new(Lambertian::new(Vec3::splat(128.0))),
        ))
    }

    /// A hittable with a broken bounding box.
    struct Unbounded;

    impl Hittable for Unbounded {
        fn hit<'a>(&'a self, _ray: &Ray, _ray_t: Interval) -> Option<HitRecord<'a>> {
            None
        }

        fn bounding_box(&self) -> Aabb {
            Aabb::UNIVERSE
        }
    }

    fn material_ptr(material: &dyn Material) -> *const u8 {
        material as *const dyn Material as *const u8
    }

    #[test]
    fn test_bvh_empty() {
        let bvh = BvhNode::new(vec![]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(matches!(bvh, BvhNode::Empty));
        assert!(bvh.hit(&ray, Interval::UNIVERSE).is_none());
        assert_eq!(bvh.depth(), 0);
    }

    #[test]
    fn test_bvh_single_sphere() {
        let bvh = BvhNode::new(vec![sphere(Vec3::new(0.0, 0.0, -1.0), 0.5)]);
        assert!(matches!(bvh, BvhNode::Leaf(_)));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_multiple_spheres() {
        let spheres = (0..10)
            .map(|i| sphere(Vec3::new(i as f32, 0.0, -5.0), 0.4))
            .collect();
        let bvh = BvhNode::new(spheres);

        assert_eq!(bvh.primitive_count(), 10);
        assert!(bvh.depth() <= 5);

        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.p - Vec3::new(5.0, 0.0, -4.6)).length() < 1e-4);

        let miss = Ray::new(Vec3::new(5.5, 0.0, 0.0), Vec3::NEG_Z);
        assert!(bvh.hit(&miss, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_bvh_prefers_nearest_across_children() {
        // Sorted along z, the far sphere lands in the left child.
        let bvh = BvhNode::new(vec![
            sphere(Vec3::new(0.0, 0.0, -3.0), 0.5),
            sphere(Vec3::new(0.0, 0.0, -9.0), 0.5),
        ]);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_bvh_drops_non_finite_bounds() {
        let bvh = BvhNode::new(vec![Box::new(Unbounded), sphere(Vec3::ZERO, 1.0)]);

        assert_eq!(bvh.primitive_count(), 1);
        assert!(bvh.bounding_box().is_finite());
    }

    /// One of several primitive kinds, so the BVH sees spheres, flat
    /// (padded) rectangle boxes, rotated cuboid bounds and triangles.
    fn shape(
        kind: u8,
        center: Vec3,
        size: Vec3,
        angle: f32,
        material: Arc<dyn Material>,
    ) -> Box<dyn Hittable> {
        match kind {
            0 => Box::new(Sphere::new(center, size.x, material)),
            1 => Box::new(Rect::xy(center - size, center + size, material)),
            2 => Box::new(Rect::xz(center - size, center + size, material)),
            3 => Box::new(Rect::yz(center - size, center + size, material)),
            4 => {
                let cuboid = Cuboid::new(-size, size, material);
                let rotated = Transformed::rotate_y(Box::new(cuboid), angle);
                Box::new(Transformed::translate(Box::new(rotated), center))
            }
            _ => Box::new(Triangle::new(
                center,
                center + Vec3::new(size.x, size.y, 0.0),
                center + Vec3::new(0.0, size.y, size.z),
                material,
            )),
        }
    }

    proptest! {
        #[test]
        fn bvh_agrees_with_linear_scan(
            shapes in prop::collection::vec(
                (
                    0u8..6,
                    (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0),
                    (0.1f32..2.0, 0.1f32..2.0, 0.1f32..2.0),
                    -3.2f32..3.2,
                ),
                1..40,
            ),
            origin in (-15.0f32..15.0, -15.0f32..15.0, -15.0f32..15.0),
            target in (-5.0f32..5.0, -5.0f32..5.0, -5.0f32..5.0),
            flat_axis in 0usize..4,
        ) {
            let materials: Vec<Arc<dyn Material>> = (0..shapes.len())
                .map(|i| Arc::new(Lambertian::new(Vec3::splat(i as f32))) as Arc<dyn Material>)
                .collect();
            let make = || -> Vec<Box<dyn Hittable>> {
                shapes
                    .iter()
                    .zip(&materials)
                    .map(|(&(kind, (x, y, z), (sx, sy, sz), angle), material)| {
                        let center = Vec3::new(x, y, z);
                        let size = Vec3::new(sx, sy, sz);
                        shape(kind, center, size, angle, material.clone())
                    })
                    .collect()
            };

            let origin = Vec3::new(origin.0, origin.1, origin.2);
            let mut direction = Vec3::new(target.0, target.1, target.2) - origin;
            // Axis-parallel rays exercise the zero-direction slab case.
            if flat_axis < 3 {
                direction[flat_axis] = 0.0;
            }
            prop_assume!(direction.length() > 1e-3);

            let list: HittableList = make().into_iter().collect();
            let bvh = BvhNode::new(make());
            let ray = Ray::new(origin, direction);
            let interval = Interval::new(0.001, f32::INFINITY);

            let expected = list.hit(&ray, interval);
            let actual = bvh.hit(&ray, interval);

            prop_assert_eq!(expected.is_some(), actual.is_some());
            if let (Some(expected), Some(actual)) = (expected, actual) {
                prop_assert_eq!(expected.t, actual.t);

                // With a unique nearest primitive both must report its material.
                let singles = make();
                let at_nearest = singles
                    .iter()
                    .filter(|s| s.hit(&ray, interval).map(|rec| rec.t) == Some(expected.t))
                    .count();
                if at_nearest == 1 {
                    prop_assert_eq!(material_ptr(expected.material), material_ptr(actual.material));
                }
            }
        }
    }
}
