//! Path tracing integrator.

use crate::{Color, Hittable, MAX_RGB};
use lumen_math::{Interval, Ray};
use rand::RngCore;

/// Minimum hit distance for secondary rays, so a bounce does not hit the
/// surface it starts on.
pub const SELF_INTERSECTION_EPSILON: f32 = 0.001;

/// Radiance carried back along `ray`, in display range.
///
/// Evaluates `emission + attenuation / 255 * incoming` bounce by bounce,
/// keeping a running throughput instead of recursing. A path that runs out
/// of depth contributes black; a path that leaves the scene picks up the
/// background.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    max_depth: u32,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    let mut color = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let Some(rec) = world.hit(&ray, Interval::new(SELF_INTERSECTION_EPSILON, f32::INFINITY))
        else {
            return color + throughput * background;
        };

        let emission = rec.material.emitted(rec.u, rec.v, rec.p);

        match rec.material.scatter(&ray, &rec, rng) {
            None => return color + throughput * emission,
            Some(scatter) => {
                let emission = rec.material.affect_emitter(emission, rec.u, rec.v, rec.p);
                color += throughput * emission;
                throughput *= scatter.attenuation / MAX_RGB;
                ray = scatter.scattered;
            }
        }
    }

    color
}
