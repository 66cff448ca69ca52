//! Surface color sources for materials.

use crate::Color;
use lumen_math::Vec3;

/// Smallest checker cell edge accepted; smaller values are clamped up.
const MIN_CELL_SIZE: f32 = 1e-4;

/// A color that may vary over a surface.
pub trait Texture: Send + Sync {
    /// Color at surface coordinates `(u, v)` and world point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// The same color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// A 3D checkerboard in world space.
///
/// The cell containing `p` is `floor(p / cell_size)` per axis; the parity of
/// the sum of the three cell indices picks `even` or `odd`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Checkered {
    even: Color,
    odd: Color,
    cell_size: Vec3,
}

impl Checkered {
    pub fn new(even: Color, odd: Color, cell_size: Vec3) -> Self {
        let clamped = cell_size.max(Vec3::splat(MIN_CELL_SIZE));
        if clamped != cell_size || !cell_size.is_finite() {
            log::warn!(
                "Checker cell size {:?} is not positive, clamped to {:?}",
                cell_size,
                clamped
            );
        }
        let cell_size = if clamped.is_finite() {
            clamped
        } else {
            Vec3::ONE
        };

        Self {
            even,
            odd,
            cell_size,
        }
    }
}

impl Texture for Checkered {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let cell = (p / self.cell_size).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);
        if parity == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Vec3::splat(255.0);
    const BLACK: Color = Vec3::ZERO;

    #[test]
    fn test_solid_color() {
        let texture = SolidColor::new(Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(texture.value(0.3, 0.7, Vec3::splat(100.0)), Vec3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_checkered_alternates_along_each_axis() {
        let texture = Checkered::new(WHITE, BLACK, Vec3::ONE);

        assert_eq!(texture.value(0.0, 0.0, Vec3::splat(0.5)), WHITE);
        assert_eq!(texture.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), BLACK);
        assert_eq!(texture.value(0.0, 0.0, Vec3::new(0.5, 1.5, 0.5)), BLACK);
        assert_eq!(texture.value(0.0, 0.0, Vec3::new(0.5, 0.5, 1.5)), BLACK);
        assert_eq!(texture.value(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), WHITE);
    }

    #[test]
    fn test_checkered_negative_coordinates() {
        let texture = Checkered::new(WHITE, BLACK, Vec3::ONE);

        // floor(-0.5) = -1, so this cell is odd.
        assert_eq!(texture.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), BLACK);
        assert_eq!(texture.value(0.0, 0.0, Vec3::new(-0.5, -0.5, 0.5)), WHITE);
    }

    #[test]
    fn test_checkered_cell_size() {
        let texture = Checkered::new(WHITE, BLACK, Vec3::splat(0.25));

        assert_eq!(texture.value(0.0, 0.0, Vec3::splat(0.1)), WHITE);
        assert_eq!(texture.value(0.0, 0.0, Vec3::new(0.3, 0.1, 0.1)), BLACK);
    }

    #[test]
    fn test_checkered_zero_cell_size_is_finite() {
        let texture = Checkered::new(WHITE, BLACK, Vec3::ZERO);
        let color = texture.value(0.0, 0.0, Vec3::splat(3.3));

        assert!(color == WHITE || color == BLACK);
    }
}
