//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over display-range ([0, 255]) colors:
//!
//! - Primitives (spheres, axis-aligned rectangles, boxes, mesh triangles)
//!   and rigid transform wrappers
//! - A median-split BVH over everything
//! - Lambertian, metal and dielectric materials with optional emission
//! - Bucketed, multithreaded rendering with per-bucket seeded randomness

mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod hittable;
mod integrator;
mod light;
mod material;
mod rect;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use integrator::{ray_color, SELF_INTERSECTION_EPSILON};
pub use light::Light;
pub use material::{Color, Dielectric, Lambertian, Material, Metal, Scatter, MAX_RGB};
pub use rect::{Plane, Rect};
pub use renderer::{
    linear_to_gamma, render, render_pixel, render_with_control, tone_map, ImageBuffer,
    RenderControl, RenderError, RenderOutput,
};
pub use sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
pub use scene::{build_scene, Scene, SceneError, SceneResult};
pub use sphere::Sphere;
pub use texture::{Checkered, SolidColor, Texture};
pub use transform::Transformed;
pub use triangle::{mesh_bvh, Triangle};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};

/// Render settings live in lumen_core; re-exported for convenience.
pub use lumen_core::RenderSettings;
