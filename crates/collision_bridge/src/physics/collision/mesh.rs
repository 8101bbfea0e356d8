//! Editable mesh geometry
//!
//! Plain vertex/polygon arrays, the form in which collision shapes live on
//! the scene side. Vertices are in the node's local space; the node's world
//! matrix places them.

use std::collections::BTreeSet;

use crate::foundation::math::{Mat4, Vec3, transform_points};

/// Vertex positions plus polygon faces indexing into them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    /// Vertices in LOCAL space
    pub vertices: Vec<Vec3>,
    /// Polygons as vertex index loops (triangles, quads, ...)
    pub faces: Vec<Vec<u32>>,
}

impl MeshGeometry {
    /// Create from vertices and faces
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        Self { vertices, faces }
    }

    /// Geometry with no vertices, used for group nodes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether there are no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Local axis-aligned bounds as (min, max)
    pub fn local_bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        }))
    }

    /// Mean of the local vertices
    pub fn centroid(&self) -> Option<Vec3> {
        if self.vertices.is_empty() {
            return None;
        }
        let sum = self.vertices.iter().fold(Vec3::zeros(), |acc, v| acc + v);
        Some(sum / self.vertices.len() as f32)
    }

    /// Largest distance from the local origin to a vertex
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.norm())
            .fold(0.0, f32::max)
    }

    /// Vertices transformed by `matrix`
    pub fn world_vertices(&self, matrix: &Mat4) -> Vec<Vec3> {
        transform_points(matrix, &self.vertices)
    }

    /// Number of distinct edge neighbours of every vertex
    pub fn vertex_degrees(&self) -> Vec<usize> {
        let mut edges = BTreeSet::new();
        for face in &self.faces {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                if a != b {
                    edges.insert((a.min(b), a.max(b)));
                }
            }
        }

        let mut degrees = vec![0; self.vertices.len()];
        for (a, b) in edges {
            for index in [a, b] {
                if let Some(degree) = degrees.get_mut(index as usize) {
                    *degree += 1;
                }
            }
        }
        degrees
    }
}
