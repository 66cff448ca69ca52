//! Random sampling helpers.
//!
//! Every helper takes the generator explicitly. Each render bucket owns its
//! own generator, so nothing here touches shared state.

use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform random number in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform random point inside the unit sphere.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform random direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling; tiny vectors are thrown away before normalizing.
    loop {
        let p = random_in_unit_sphere(rng);
        let len_sq = p.length_squared();
        if len_sq > 1e-6 {
            return p / len_sq.sqrt();
        }
    }
}

/// Random offset in the pixel square [-0.5, 0.5) x [-0.5, 0.5).
pub(crate) fn sample_square(rng: &mut dyn RngCore) -> (f32, f32) {
    (gen_f32(rng) - 0.5, gen_f32(rng) - 0.5)
}
