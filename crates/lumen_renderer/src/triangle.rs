//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use std::sync::Arc;

use crate::{BvhNode, HitRecord, Hittable, Material};
use lumen_core::{Mesh, MeshResult, MeshTriangle};
use lumen_math::{Aabb, Interval, Ray, Vec3, Vec3Ext};

/// Determinant magnitude below which a ray counts as parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-8;

/// A triangle primitive.
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    /// Per-vertex texture coordinates
    uvs: Option<[[f32; 2]; 3]>,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The face normal follows the right-hand rule over `v0, v1, v2`.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_degenerate(Vec3::Z);

        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            edge1,
            edge2,
            normal,
            uvs: None,
            material,
            bbox,
        }
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_uvs(mut self, uvs: [[f32; 2]; 3]) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn from_mesh_triangle(triangle: &MeshTriangle, material: Arc<dyn Material>) -> Self {
        let [v0, v1, v2] = triangle.vertices;
        let tri = Self::new(v0, v1, v2, material);
        match triangle.uvs {
            Some(uvs) => tri.with_uvs(uvs),
            None => tri,
        }
    }

    /// Surface coordinates at barycentric `(b1, b2)`.
    fn surface_uv(&self, b1: f32, b2: f32) -> (f32, f32) {
        match self.uvs {
            Some([uv0, uv1, uv2]) => {
                let b0 = 1.0 - b1 - b2;
                (
                    b0 * uv0[0] + b1 * uv1[0] + b2 * uv2[0],
                    b0 * uv0[1] + b1 * uv1[1] + b2 * uv2[1],
                )
            }
            None => (b1, b2),
        }
    }
}

impl Hittable for Triangle {
    /// Möller-Trumbore ray-triangle intersection algorithm.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < PARALLEL_EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);
        if !ray_t.surrounds(t) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            self.surface_uv(u, v),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Validate a mesh and build a BVH over its triangles, all sharing `material`.
pub fn mesh_bvh(mesh: &Mesh, material: Arc<dyn Material>) -> MeshResult<BvhNode> {
    let triangles: Vec<Box<dyn Hittable>> = mesh
        .triangles()?
        .iter()
        .map(|tri| Box::new(Triangle::from_mesh_triangle(tri, material.clone())) as Box<dyn Hittable>)
        .collect();

    log::info!(
        "Mesh: {} vertices, {} triangles{}",
        mesh.vertex_count(),
        triangles.len(),
        if mesh.has_uvs() { ", with UVs" } else { "" }
    );

    Ok(BvhNode::new(triangles))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Lambertian;
    use lumen_core::MeshError;

    fn material() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::splat(128.0)))
    }

    fn facing_triangle() -> Triangle {
        // Triangle in XY plane at z=-1, wound counter-clockwise seen from +Z
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            material(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        assert!((rec.t - 1.0).abs() < 1e-5);
        assert_eq!(rec.normal, Vec3::Z);
        assert!(rec.front_face);
    }

    #[test]
    fn test_triangle_hit_from_behind() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);

        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();

        assert!((rec.t - 2.0).abs() < 1e-5);
        assert_eq!(rec.normal, Vec3::NEG_Z);
        assert!(!rec.front_face);
    }

    #[test]
    fn test_triangle_miss() {
        let tri = facing_triangle();

        let away = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(tri.hit(&away, Interval::new(0.001, f32::INFINITY)).is_none());

        let outside = Ray::new(Vec3::new(2.0, 2.0, 0.0), Vec3::NEG_Z);
        assert!(tri.hit(&outside, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let tri = facing_triangle();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, -1.0), Vec3::X);

        assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
    }

    #[test]
    fn test_barycentric_uv_without_mesh_uvs() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, material());
        let ray = Ray::new(Vec3::new(0.25, 0.5, 1.0), Vec3::NEG_Z);

        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.u - 0.25).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_interpolated_uvs() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::Y, material())
            .with_uvs([[1.0, 1.0], [0.0, 1.0], [1.0, 0.0]]);
        let ray = Ray::new(Vec3::new(0.25, 0.5, 1.0), Vec3::NEG_Z);

        let rec = tri.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        // b0 = 0.25, b1 = 0.25, b2 = 0.5
        assert!((rec.u - 0.75).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_triangle_never_hits() {
        let tri = Triangle::new(Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0), material());
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::NEG_Z);

        assert!(tri.hit(&ray, Interval::UNIVERSE).is_none());
        assert!(tri.normal.is_finite());
    }

    #[test]
    fn test_mesh_bvh() {
        let bvh = mesh_bvh(&Mesh::octahedron(1.0), material()).unwrap();
        assert_eq!(bvh.primitive_count(), 8);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let rec = bvh.hit(&ray, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!(rec.front_face);
    }

    #[test]
    fn test_mesh_bvh_rejects_invalid_mesh() {
        let mesh = Mesh::new(vec![Vec3::ZERO, Vec3::X], vec![0, 1, 2]);

        assert!(matches!(
            mesh_bvh(&mesh, material()),
            Err(MeshError::IndexOutOfRange { index: 2, .. })
        ));
    }
}
