// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Squared length below which a vector is treated as degenerate.
pub const NEAR_ZERO_SQUARED: f32 = 1e-12;

/// Extension trait for the degenerate-vector checks used across the renderer.
pub trait Vec3Ext {
    /// True when every component is close enough to zero that normalizing
    /// would produce NaN or a wildly inaccurate direction.
    fn is_near_zero(&self) -> bool;

    /// Normalize, or return `fallback` when the vector is degenerate.
    fn normalize_or_degenerate(&self, fallback: Vec3) -> Vec3;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn is_near_zero(&self) -> bool {
        self.length_squared() < NEAR_ZERO_SQUARED
    }

    #[inline]
    fn normalize_or_degenerate(&self, fallback: Vec3) -> Vec3 {
        if self.is_near_zero() || !self.is_finite() {
            fallback
        } else {
            self.normalize()
        }
    }
}
