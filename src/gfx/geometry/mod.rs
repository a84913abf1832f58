//! # Procedural Geometry Generation
//!
//! Generates triangle meshes for the primitive forms parts are built from, plus the
//! helpers needed to bake transforms and merge meshes into a composite.
//!
//! ## Supported Primitives
//!
//! - **Cube**: axis-aligned box with a given edge length
//! - **Cylinder**: capped cylinder along Z
//! - **Cone**: truncated cone along Z (a point when the top radius is zero)
//! - **Sphere**: UV sphere with configurable resolution
//! - **Plane**: flat plane in XY facing +Z
//! - **Torus**: ring in the XY plane around Z
//!
//! All shapes are centered at the origin in a Z-up coordinate system.
//!
//! ## Usage
//!
//! ```rust
//! use sprite_forge::gfx::geometry::{generate_cube, generate_sphere};
//!
//! let cube = generate_cube(2.0);
//! assert_eq!(cube.triangle_count(), 12);
//!
//! let sphere = generate_sphere(1.0, 32, 16);
//! assert!(sphere.vertex_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Transform, Vector3, Point3};

/// Triangle mesh data in a single coordinate space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns a copy with every vertex moved by `matrix`
    ///
    /// Normals are transformed by the inverse transpose so non-uniform scale keeps them
    /// perpendicular. Degenerate matrices (zero scale on an axis) fall back to the plain
    /// linear part, and zero-length normals are left as they are.
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> GeometryData {
        let linear = Matrix3::from_cols(
            matrix.x.truncate(),
            matrix.y.truncate(),
            matrix.z.truncate(),
        );
        let normal_matrix = linear
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear);

        let vertices = self
            .vertices
            .iter()
            .map(|&[x, y, z]| {
                let p = matrix.transform_point(Point3::new(x, y, z));
                [p.x, p.y, p.z]
            })
            .collect();

        let normals = self
            .normals
            .iter()
            .map(|&n| {
                let n = normal_matrix * Vector3::from(n);
                let n = if n.magnitude2() > f32::EPSILON {
                    n.normalize()
                } else {
                    n
                };
                [n.x, n.y, n.z]
            })
            .collect();

        GeometryData {
            vertices,
            normals,
            indices: self.indices.clone(),
        }
    }

    /// Appends another mesh, rebasing its indices after this mesh's vertices
    pub fn append(&mut self, other: &GeometryData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.vertices.iter().map(|&v| Vector3::from(v)))
    }

    /// Convert to the interleaved vertex format used by the GPU renderer
    pub fn to_scene_format(&self) -> (Vec<crate::gfx::scene::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::scene::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 0.0, 1.0]),
            })
            .collect();

        (vertices, self.indices.clone())
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` when there are no points
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3<f32>>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Aabb::new(first, first), |acc, p| acc.including(p)))
    }

    fn including(self, p: Vector3<f32>) -> Self {
        Self {
            min: Vector3::new(self.min.x.min(p.x), self.min.y.min(p.y), self.min.z.min(p.z)),
            max: Vector3::new(self.max.x.max(p.x), self.max.y.max(p.y), self.max.z.max(p.z)),
        }
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        self.including(other.min).including(other.max)
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Radius of the sphere through the box corners
    pub fn bounding_radius(&self) -> f32 {
        self.size().magnitude() * 0.5
    }

    /// Component-wise comparison within `epsilon`
    pub fn approx_eq(&self, other: &Aabb, epsilon: f32) -> bool {
        let close = |a: Vector3<f32>, b: Vector3<f32>| {
            (a.x - b.x).abs() <= epsilon && (a.y - b.y).abs() <= epsilon && (a.z - b.z).abs() <= epsilon
        };
        close(self.min, other.min) && close(self.max, other.max)
    }
}
