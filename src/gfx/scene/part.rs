//! # Primitive Parts
//!
//! A [`PrimitivePart`] is one shape instance: a form from the fixed [`PrimitiveKind`] set,
//! its form-specific [`SizeParams`], and a [`Transform`] placing it in assembly space.
//! Parts are transient; they exist only until their assembly is merged.

use std::fmt;
use std::str::FromStr;

use cgmath::{Deg, Matrix4, Vector3};

use crate::error::{ForgeError, Result};
use crate::gfx::geometry::{self, Aabb, GeometryData};

/// The fixed set of primitive forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Box,
    Cylinder,
    Cone,
    Sphere,
    Plane,
    Torus,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Box,
        PrimitiveKind::Cylinder,
        PrimitiveKind::Cone,
        PrimitiveKind::Sphere,
        PrimitiveKind::Plane,
        PrimitiveKind::Torus,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Box => "box",
            PrimitiveKind::Cylinder => "cylinder",
            PrimitiveKind::Cone => "cone",
            PrimitiveKind::Sphere => "sphere",
            PrimitiveKind::Plane => "plane",
            PrimitiveKind::Torus => "torus",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveKind {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "box" | "cube" => Ok(PrimitiveKind::Box),
            "cylinder" => Ok(PrimitiveKind::Cylinder),
            "cone" => Ok(PrimitiveKind::Cone),
            "sphere" | "uv_sphere" => Ok(PrimitiveKind::Sphere),
            "plane" => Ok(PrimitiveKind::Plane),
            "torus" => Ok(PrimitiveKind::Torus),
            _ => Err(ForgeError::InvalidPrimitiveKind(s.to_string())),
        }
    }
}

/// Form-specific dimensions
///
/// Values are not validated. Zero or negative sizes give degenerate geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeParams {
    /// Cube with edge length `size`
    Box { size: f32 },
    /// Capped cylinder along local Z
    Cylinder { radius: f32, depth: f32, vertices: u32 },
    /// Cone along local Z; `radius1` at the bottom, `radius2` at the top
    Cone { radius1: f32, radius2: f32, depth: f32, vertices: u32 },
    Sphere { radius: f32, segments: u32, rings: u32 },
    /// Square of side `size` in local XY
    Plane { size: f32 },
    Torus {
        major_radius: f32,
        minor_radius: f32,
        major_segments: u32,
        minor_segments: u32,
    },
}

impl SizeParams {
    pub fn cube(size: f32) -> Self {
        SizeParams::Box { size }
    }

    pub fn cylinder(radius: f32, depth: f32) -> Self {
        SizeParams::Cylinder { radius, depth, vertices: 32 }
    }

    pub fn cone(radius1: f32, radius2: f32, depth: f32) -> Self {
        SizeParams::Cone { radius1, radius2, depth, vertices: 32 }
    }

    pub fn sphere(radius: f32) -> Self {
        SizeParams::Sphere { radius, segments: 32, rings: 16 }
    }

    pub fn plane(size: f32) -> Self {
        SizeParams::Plane { size }
    }

    pub fn torus(major_radius: f32, minor_radius: f32) -> Self {
        SizeParams::Torus {
            major_radius,
            minor_radius,
            major_segments: 48,
            minor_segments: 12,
        }
    }

    /// Unit-sized defaults for a kind
    pub fn default_for(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Box => Self::cube(2.0),
            PrimitiveKind::Cylinder => Self::cylinder(1.0, 2.0),
            PrimitiveKind::Cone => Self::cone(1.0, 0.0, 2.0),
            PrimitiveKind::Sphere => Self::sphere(1.0),
            PrimitiveKind::Plane => Self::plane(2.0),
            PrimitiveKind::Torus => Self::torus(1.0, 0.25),
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        match self {
            SizeParams::Box { .. } => PrimitiveKind::Box,
            SizeParams::Cylinder { .. } => PrimitiveKind::Cylinder,
            SizeParams::Cone { .. } => PrimitiveKind::Cone,
            SizeParams::Sphere { .. } => PrimitiveKind::Sphere,
            SizeParams::Plane { .. } => PrimitiveKind::Plane,
            SizeParams::Torus { .. } => PrimitiveKind::Torus,
        }
    }

    /// Mesh in local space, centered at the origin
    pub fn tessellate(&self) -> GeometryData {
        match *self {
            SizeParams::Box { size } => geometry::generate_cube(size),
            SizeParams::Cylinder { radius, depth, vertices } => {
                geometry::generate_cylinder(radius, depth, vertices)
            }
            SizeParams::Cone { radius1, radius2, depth, vertices } => {
                geometry::generate_cone(radius1, radius2, depth, vertices)
            }
            SizeParams::Sphere { radius, segments, rings } => {
                geometry::generate_sphere(radius, segments, rings)
            }
            SizeParams::Plane { size } => geometry::generate_plane(size, size, 1, 1),
            SizeParams::Torus {
                major_radius,
                minor_radius,
                major_segments,
                minor_segments,
            } => geometry::generate_torus(major_radius, minor_radius, major_segments, minor_segments),
        }
    }
}

/// Position, Euler rotation in degrees (applied X, then Y, then Z) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Self::default()
        }
    }

    /// Builder pattern: Set Euler rotation in degrees
    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set non-uniform scale
    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    /// Object-to-world matrix, T * Rz * Ry * Rx * S
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * euler_xyz(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Rotation matrix for XYZ Euler angles in degrees
pub fn euler_xyz(degrees: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_angle_z(Deg(degrees.z))
        * Matrix4::from_angle_y(Deg(degrees.y))
        * Matrix4::from_angle_x(Deg(degrees.x))
}

/// A single primitive shape instance
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitivePart {
    pub kind: PrimitiveKind,
    pub name: String,
    pub size: SizeParams,
    pub transform: Transform,
}

impl PrimitivePart {
    /// Tessellated mesh with the part's transform baked in
    pub fn world_geometry(&self) -> GeometryData {
        self.size.tessellate().transformed(&self.transform.matrix())
    }

    pub fn world_bounds(&self) -> Option<Aabb> {
        self.world_geometry().bounds()
    }
}

/// Creates a part, checking that `size` describes the requested `kind`
pub fn create_part(
    kind: PrimitiveKind,
    size: SizeParams,
    transform: Transform,
    name: impl Into<String>,
) -> Result<PrimitivePart> {
    if size.kind() != kind {
        return Err(ForgeError::InvalidPrimitiveKind(format!(
            "{kind} (size parameters describe a {})",
            size.kind()
        )));
    }

    Ok(PrimitivePart {
        kind,
        name: name.into(),
        size,
        transform,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("cube".parse::<PrimitiveKind>().unwrap(), PrimitiveKind::Box);
        assert_eq!(" Torus ".parse::<PrimitiveKind>().unwrap(), PrimitiveKind::Torus);
        for kind in PrimitiveKind::ALL {
            assert_eq!(kind.as_str().parse::<PrimitiveKind>().unwrap(), kind);
        }
        let err = "pyramid".parse::<PrimitiveKind>().unwrap_err();
        assert!(matches!(err, ForgeError::InvalidPrimitiveKind(k) if k == "pyramid"));
    }

    #[test]
    fn test_mismatched_size_is_rejected() {
        let result = create_part(
            PrimitiveKind::Sphere,
            SizeParams::cube(1.0),
            Transform::default(),
            "Tank_Body",
        );
        assert!(matches!(result, Err(ForgeError::InvalidPrimitiveKind(_))));
    }

    #[test]
    fn test_transform_applies_scale_before_translation() {
        let part = create_part(
            PrimitiveKind::Box,
            SizeParams::cube(2.0),
            Transform::at(0.0, 0.0, 0.5).scaled(1.5, 1.0, 0.5),
            "Tank_Body",
        )
        .unwrap();
        let bounds = part.world_bounds().unwrap();
        let expected = Aabb::new(Vector3::new(-1.5, -1.0, 0.0), Vector3::new(1.5, 1.0, 1.0));
        assert!(bounds.approx_eq(&expected, 1e-5));
    }

    #[test]
    fn test_rotation_about_y_lays_cylinder_flat() {
        let part = create_part(
            PrimitiveKind::Cylinder,
            SizeParams::cylinder(0.3, 2.0),
            Transform::default().rotated(0.0, 90.0, 0.0),
            "Tank_Barrel",
        )
        .unwrap();
        let size = part.world_bounds().unwrap().size();
        assert!((size.x - 2.0).abs() < 1e-4);
        assert!((size.z - 0.6).abs() < 1e-3);
    }

    #[test]
    fn test_negative_size_is_not_an_error() {
        let part = create_part(
            PrimitiveKind::Sphere,
            SizeParams::sphere(-1.0),
            Transform::default(),
            "Odd_Ball",
        );
        assert!(part.is_ok());
    }
}
