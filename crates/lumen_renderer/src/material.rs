//! Material trait for surface scattering.

use std::sync::Arc;

use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::{HitRecord, Light, SolidColor, Texture};
use lumen_math::{Ray, Vec3, Vec3Ext};
use rand::RngCore;

/// Color type alias. Channels are display-range, [0, 255].
pub type Color = Vec3;

/// Largest value of a color channel.
pub const MAX_RGB: f32 = 255.0;

/// A successful scattering event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scatter {
    /// Color the continued path is multiplied by (display range)
    pub attenuation: Color,
    /// Continued path, starting at the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }

    /// Modify the emission at a point before it is added to the path.
    fn affect_emitter(&self, emission: Color, _u: f32, _v: f32, _p: Vec3) -> Color {
        emission
    }
}

fn solid(albedo: Color) -> Arc<dyn Texture> {
    Arc::new(SolidColor::new(albedo))
}

fn emission_of(emitter: &Option<Light>, u: f32, v: f32, p: Vec3) -> Color {
    emitter.map_or(Color::ZERO, |light| light.emitted(u, v, p))
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    albedo: Arc<dyn Texture>,
    emitter: Option<Light>,
    tint_emitter: bool,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(solid(albedo))
    }

    /// Create a Lambertian material whose albedo comes from a texture.
    pub fn with_texture(albedo: Arc<dyn Texture>) -> Self {
        Self {
            albedo,
            emitter: None,
            tint_emitter: true,
        }
    }

    /// Make this surface emit light.
    pub fn with_emitter(mut self, light: Light) -> Self {
        self.emitter = Some(light);
        self
    }

    /// Choose whether emission is multiplied by `albedo / 255`.
    ///
    /// On by default. Turn it off for light panels that should emit their
    /// raw color.
    pub fn with_emitter_tint(mut self, tint: bool) -> Self {
        self.tint_emitter = tint;
        self
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let direction =
            (rec.normal + random_unit_vector(rng)).normalize_or_degenerate(rec.normal);

        Some(Scatter {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction),
        })
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        emission_of(&self.emitter, u, v, p)
    }

    fn affect_emitter(&self, emission: Color, u: f32, v: f32, p: Vec3) -> Color {
        if self.tint_emitter {
            emission * self.albedo.value(u, v, p) / MAX_RGB
        } else {
            emission
        }
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    albedo: Arc<dyn Texture>,
    fuzz: f32,
    emitter: Option<Light>,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self::with_texture(solid(albedo), fuzz)
    }

    pub fn with_texture(albedo: Arc<dyn Texture>, fuzz: f32) -> Self {
        let fuzz = if fuzz.is_nan() { 0.0 } else { fuzz.clamp(0.0, 1.0) };
        Self {
            albedo,
            fuzz,
            emitter: None,
        }
    }

    pub fn with_emitter(mut self, light: Light) -> Self {
        self.emitter = Some(light);
        self
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let unit_direction = ray_in.direction().normalize_or_degenerate(-rec.normal);
        let reflected = reflect(unit_direction, rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);
        let direction = if direction.is_near_zero() {
            rec.normal
        } else {
            direction
        };

        Some(Scatter {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction),
        })
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        emission_of(&self.emitter, u, v, p)
    }
}

/// Dielectric (glass) material.
#[derive(Clone)]
pub struct Dielectric {
    albedo: Arc<dyn Texture>,
    /// Index of refraction
    ior: f32,
    /// Probability of a mirror bounce on top of the Fresnel term
    roughness: f32,
    emitter: Option<Light>,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(albedo: Color, ior: f32) -> Self {
        Self::with_texture(solid(albedo), ior)
    }

    pub fn with_texture(albedo: Arc<dyn Texture>, ior: f32) -> Self {
        Self {
            albedo,
            ior,
            roughness: 0.0,
            emitter: None,
        }
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = if roughness.is_nan() {
            0.0
        } else {
            roughness.clamp(0.0, 1.0)
        };
        self
    }

    pub fn with_emitter(mut self, light: Light) -> Self {
        self.emitter = Some(light);
        self
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f32, ref_idx: f32) -> f32 {
        let r0 = ((1.0 - ref_idx) / (1.0 + ref_idx)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<Scatter> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize_or_degenerate(-rec.normal);
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        let cannot_refract = refraction_ratio * sin_theta > 1.0;
        let fresnel_draw = gen_f32(rng);
        let rough_draw = gen_f32(rng);

        let mirror = cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > fresnel_draw
            || (self.roughness > 0.0 && rough_draw < self.roughness);

        let direction = if mirror {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(Scatter {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction),
        })
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        emission_of(&self.emitter, u, v, p)
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Checkered;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(ray: &Ray, t: f32, normal: Vec3, material: &'a dyn Material) -> HitRecord<'a> {
        HitRecord::new(ray, t, normal, (0.25, 0.75), material)
    }

    #[test]
    fn test_lambertian_scatter_starts_at_hit() {
        let material = Lambertian::new(Vec3::new(200.0, 100.0, 50.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let rec = record(&ray, 4.0, Vec3::Z, &material);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(scatter.scattered.origin(), rec.p);
            assert_eq!(scatter.attenuation, Vec3::new(200.0, 100.0, 50.0));
            assert!(scatter.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    #[test]
    fn test_lambertian_attenuation_from_texture() {
        let texture = Arc::new(Checkered::new(Vec3::splat(255.0), Vec3::ZERO, Vec3::ONE));
        let material = Lambertian::with_texture(texture);
        let ray = Ray::new(Vec3::new(0.5, 0.5, 5.0), Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(0);

        // Hit at z = 1.5 lands in cell (0, 0, 1): odd.
        let rec = record(&ray, 3.5, Vec3::Z, &material);
        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(scatter.attenuation, Vec3::ZERO);
    }

    #[test]
    fn test_lambertian_emitter_tint() {
        let light = Light::Diffuse(Vec3::splat(255.0));
        let tinted = Lambertian::new(Vec3::new(255.0, 0.0, 127.5)).with_emitter(light);
        let raw = tinted.clone().with_emitter_tint(false);
        let p = Vec3::ZERO;

        let emission = tinted.emitted(0.0, 0.0, p);
        assert_eq!(emission, Vec3::splat(255.0));
        assert_eq!(
            tinted.affect_emitter(emission, 0.0, 0.0, p),
            Vec3::new(255.0, 0.0, 127.5)
        );
        assert_eq!(raw.affect_emitter(emission, 0.0, 0.0, p), Vec3::splat(255.0));
    }

    #[test]
    fn test_non_emissive_is_black() {
        let p = Vec3::ONE;
        assert_eq!(Lambertian::new(Vec3::ONE).emitted(0.0, 0.0, p), Vec3::ZERO);
        assert_eq!(Metal::new(Vec3::ONE, 0.0).emitted(0.0, 0.0, p), Vec3::ZERO);
        assert_eq!(Dielectric::new(Vec3::ONE, 1.5).emitted(0.0, 0.0, p), Vec3::ZERO);
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Metal::new(Vec3::splat(200.0), 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(2.0, -2.0, 0.0));
        let rec = record(&ray, 0.5, Vec3::Y, &material);
        let mut rng = StdRng::seed_from_u64(5);

        let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((scatter.scattered.direction() - expected).length() < 1e-5);
        assert_eq!(scatter.attenuation, Vec3::splat(200.0));
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        assert_eq!(Metal::new(Vec3::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Vec3::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_schlick_at_normal_incidence() {
        let expected = ((1.0f32 - 1.5) / (1.0 + 1.5)).powi(2);
        assert_eq!(Dielectric::reflectance(1.0, 1.5), expected);
    }

    #[test]
    fn test_dielectric_normal_incidence_never_total_reflection() {
        let material = Dielectric::new(Vec3::splat(255.0), 1.5);
        let mut rng = StdRng::seed_from_u64(9);

        for front in [Vec3::Z, Vec3::NEG_Z] {
            // Entering along -Z through +Z face, or leaving through -Z face from inside.
            let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
            let rec = record(&ray, 1.0, front, &material);

            let mut refracted = 0;
            for _ in 0..200 {
                let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
                let d = scatter.scattered.direction();
                if (d - Vec3::NEG_Z).length() < 1e-5 {
                    refracted += 1;
                }
            }
            // Schlick gives 4% reflection head-on, so most paths pass through.
            assert!(refracted > 150, "only {refracted} of 200 refracted");
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Dielectric::new(Vec3::splat(255.0), 1.5);
        let mut rng = StdRng::seed_from_u64(3);

        // Grazing ray inside the glass, hitting the back of a +Y face.
        let direction = Vec3::new(1.0, 0.2, 0.0).normalize();
        let ray = Ray::new(Vec3::ZERO, direction);
        let rec = record(&ray, 1.0, Vec3::Y, &material);
        assert!(!rec.front_face);

        for _ in 0..50 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert!(scatter.scattered.direction().y < 0.0);
        }
    }

    #[test]
    fn test_dielectric_full_roughness_always_reflects() {
        let material = Dielectric::new(Vec3::splat(255.0), 1.5).with_roughness(1.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let rec = record(&ray, 1.0, Vec3::Z, &material);
        let mut rng = StdRng::seed_from_u64(21);

        for _ in 0..50 {
            let scatter = material.scatter(&ray, &rec, &mut rng).unwrap();
            assert!((scatter.scattered.direction() - Vec3::Z).length() < 1e-5);
        }
    }
}
