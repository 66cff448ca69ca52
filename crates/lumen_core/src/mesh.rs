//! Mesh geometry handed over by an external asset loader.
//!
//! Lumen does not parse asset files itself. A loader fills in a `Mesh`
//! (positions, triangle indices, optional per-vertex UVs) and the renderer
//! turns it into triangles. Malformed data is rejected by `Mesh::validate`
//! before any rendering starts.

use lumen_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors that make a mesh unusable for rendering.
#[derive(Error, Debug, PartialEq)]
pub enum MeshError {
    #[error("Mesh has no triangles")]
    Empty,

    #[error("Index count {0} is not a multiple of 3")]
    IndexCount(usize),

    #[error("Triangle {triangle} references vertex {index}, but only {vertex_count} vertices exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("Vertex {0} has a non-finite position")]
    NonFinitePosition(usize),

    #[error("UV count ({uvs}) doesn't match vertex count ({vertices})")]
    UvCount { uvs: usize, vertices: usize },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A triangle mesh: vertex positions, triangle indices and optional UVs.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// UV coordinates (optional - one [u, v] per vertex)
    pub uvs: Option<Vec<[f32; 2]>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

/// One triangle pulled out of a mesh, ready for intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangle {
    pub vertices: [Vec3; 3],
    pub uvs: Option<[[f32; 2]; 3]>,
}

impl Mesh {
    /// Create a new mesh from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            uvs: None,
            indices,
        }
    }

    /// Create a new mesh with per-vertex UV coordinates.
    pub fn new_with_uvs(positions: Vec<Vec3>, indices: Vec<u32>, uvs: Vec<[f32; 2]>) -> Self {
        Self {
            positions,
            uvs: Some(uvs),
            indices,
        }
    }

    /// Check that every triangle can be built from this data.
    pub fn validate(&self) -> MeshResult<()> {
        if self.indices.is_empty() {
            return Err(MeshError::Empty);
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(self.indices.len()));
        }

        if let Some(i) = self.positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::NonFinitePosition(i));
        }

        if let Some(uvs) = &self.uvs {
            if uvs.len() != self.positions.len() {
                return Err(MeshError::UvCount {
                    uvs: uvs.len(),
                    vertices: self.positions.len(),
                });
            }
        }

        let vertex_count = self.positions.len();
        for (triangle, face) in self.indices.chunks(3).enumerate() {
            if let Some(&index) = face.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }

        Ok(())
    }

    /// Compute axis-aligned bounding box from positions.
    pub fn bounds(&self) -> Aabb {
        if self.positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for pos in &self.positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Aabb::from_points(min, max)
    }

    /// Check if the mesh has UV coordinates.
    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Validate the mesh and extract its triangles.
    pub fn triangles(&self) -> MeshResult<Vec<MeshTriangle>> {
        self.validate()?;

        let triangles = self
            .indices
            .chunks_exact(3)
            .map(|face| {
                let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
                MeshTriangle {
                    vertices: [self.positions[i0], self.positions[i1], self.positions[i2]],
                    uvs: self.uvs.as_ref().map(|uvs| [uvs[i0], uvs[i1], uvs[i2]]),
                }
            })
            .collect();

        Ok(triangles)
    }

    /// A regular octahedron centered at the origin.
    ///
    /// Handy as a small built-in mesh when no asset loader is wired in.
    pub fn octahedron(radius: f32) -> Self {
        let positions = vec![
            Vec3::new(radius, 0.0, 0.0),
            Vec3::new(-radius, 0.0, 0.0),
            Vec3::new(0.0, radius, 0.0),
            Vec3::new(0.0, -radius, 0.0),
            Vec3::new(0.0, 0.0, radius),
            Vec3::new(0.0, 0.0, -radius),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 4,  2, 1, 4,  1, 3, 4,  3, 0, 4,
            2, 0, 5,  1, 2, 5,  3, 1, 5,  0, 3, 5,
        ];
        Self::new(positions, indices)
    }
}
