//! Light emitters attached to materials.

use crate::Color;
use lumen_math::Vec3;

/// Emission a surface adds to every path that reaches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    /// Uniform emission in every direction, display-range color.
    Diffuse(Color),
}

impl Light {
    /// Emitted color at surface coordinates `(u, v)` and point `p`.
    pub fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        match self {
            Light::Diffuse(color) => *color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diffuse_emits_constant() {
        let light = Light::Diffuse(Vec3::new(255.0, 200.0, 100.0));
        assert_eq!(light.emitted(0.1, 0.9, Vec3::ONE), Vec3::new(255.0, 200.0, 100.0));
        assert_eq!(light.emitted(0.5, 0.5, Vec3::ZERO), Vec3::new(255.0, 200.0, 100.0));
    }
}
