//! Composite entities: the single merged, renderable result of an assembly

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use cgmath::{Matrix4, Vector3};

use crate::error::{ForgeError, Result};
use crate::gfx::geometry::{Aabb, GeometryData};
use crate::gfx::resources::material::{MaterialDescriptor, MaterialSlot};

use super::part::euler_xyz;

/// One named mesh with one material and a resting orientation
///
/// The mesh is stored in world space as merged; `orientation` (Euler degrees) is applied on
/// top of it when rendering, which is how capture jobs turn the entity.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeEntity {
    name: String,
    mesh: GeometryData,
    material: MaterialDescriptor,
    pub orientation: Vector3<f32>,
}

impl CompositeEntity {
    pub(crate) fn new(name: String, mesh: GeometryData, material: MaterialDescriptor) -> Self {
        Self {
            name,
            mesh,
            material,
            orientation: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &GeometryData {
        &self.mesh
    }

    pub fn material(&self) -> &MaterialDescriptor {
        &self.material
    }

    /// Material slots; always exactly one
    pub fn materials(&self) -> &[MaterialDescriptor] {
        std::slice::from_ref(&self.material)
    }

    /// Sets rotation about the vertical axis, in degrees
    pub fn set_yaw(&mut self, degrees: f32) {
        self.orientation.z = degrees;
    }

    pub fn yaw(&self) -> f32 {
        self.orientation.z
    }

    /// Model matrix from the current orientation
    pub fn model_matrix(&self) -> Matrix4<f32> {
        euler_xyz(self.orientation)
    }

    /// Bounds of the merged mesh, ignoring the current orientation
    pub fn bounds(&self) -> Option<Aabb> {
        self.mesh.bounds()
    }

    /// Mesh with the current orientation baked in
    pub fn oriented_mesh(&self) -> GeometryData {
        self.mesh.transformed(&self.model_matrix())
    }

    /// Writes the merged mesh as Wavefront OBJ, plus a sibling `.mtl` holding the material
    pub fn write_obj(&self, path: &Path) -> Result<()> {
        let mtl_path = path.with_extension("mtl");
        let mtl_file = mtl_path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.mtl", self.name));

        let mut obj = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(obj, "# {}", self.name);
        let _ = writeln!(obj, "mtllib {mtl_file}");
        let _ = writeln!(obj, "o {}", self.name);
        for [x, y, z] in &self.mesh.vertices {
            let _ = writeln!(obj, "v {x} {y} {z}");
        }
        for [x, y, z] in &self.mesh.normals {
            let _ = writeln!(obj, "vn {x} {y} {z}");
        }
        let _ = writeln!(obj, "usemtl {}", self.material.name);
        let has_normals = self.mesh.normals.len() == self.mesh.vertices.len();
        for tri in self.mesh.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
            if has_normals {
                let _ = writeln!(obj, "f {a}//{a} {b}//{b} {c}//{c}");
            } else {
                let _ = writeln!(obj, "f {a} {b} {c}");
            }
        }

        let [r, g, b, alpha] = self.material.base_color;
        let mut mtl = String::new();
        let _ = writeln!(mtl, "newmtl {}", self.material.name);
        let _ = writeln!(mtl, "Kd {r} {g} {b}");
        let _ = writeln!(mtl, "d {alpha}");
        let _ = writeln!(mtl, "Pm {}", self.material.metallic);
        let _ = writeln!(mtl, "Pr {}", self.material.roughness);

        fs::write(path, obj).map_err(|e| ForgeError::io(path, e))?;
        fs::write(&mtl_path, mtl).map_err(|e| ForgeError::io(&mtl_path, e))?;
        Ok(())
    }
}

impl MaterialSlot for CompositeEntity {
    fn slot_material(&self) -> Option<&MaterialDescriptor> {
        Some(&self.material)
    }

    fn replace_slot_material(&mut self, material: MaterialDescriptor) -> Option<MaterialDescriptor> {
        Some(std::mem::replace(&mut self.material, material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cube;
    use crate::gfx::resources::material::bind;

    fn entity() -> CompositeEntity {
        CompositeEntity::new("Crate".to_string(), generate_cube(1.0), MaterialDescriptor::default())
    }

    #[test]
    fn test_bind_keeps_single_slot() {
        let mut e = entity();
        let wood = MaterialDescriptor::new("Wood", [0.4, 0.25, 0.1, 1.0], 0.0, 0.8);
        bind(&wood, &mut e);
        assert_eq!(e.materials().len(), 1);
        assert_eq!(e.material().name, "Wood");
    }

    #[test]
    fn test_yaw_rotates_oriented_mesh_only() {
        let mut e = CompositeEntity::new(
            "Bar".to_string(),
            generate_cube(1.0).transformed(&Matrix4::from_nonuniform_scale(4.0, 1.0, 1.0)),
            MaterialDescriptor::default(),
        );
        e.set_yaw(90.0);
        let oriented = e.oriented_mesh().bounds().unwrap().size();
        assert!((oriented.y - 4.0).abs() < 1e-4);
        assert!((e.bounds().unwrap().size().x - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_write_obj_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Crate.obj");
        entity().write_obj(&path).unwrap();

        let (models, materials) = tobj::load_obj(
            &path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].mesh.indices.len(), 36);
        let materials = materials.unwrap();
        assert_eq!(materials[0].name, "default");
        assert_eq!(materials[0].diffuse, Some([0.8, 0.8, 0.8]));
    }
}
