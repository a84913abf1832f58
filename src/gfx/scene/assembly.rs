//! # Assemblies
//!
//! An [`Assembly`] owns the parts of one composite under a shared name prefix, plus the
//! material bound to it. Parts are named `{prefix}_{role}` or `{prefix}_{role}_{index}`.
//! [`Assembly::finish`] merges them in world space into a single [`CompositeEntity`]
//! named exactly after the prefix.
//!
//! ```
//! use sprite_forge::gfx::scene::{Assembly, SizeParams, Transform};
//!
//! let mut tank = Assembly::begin("Tank");
//! tank.add("Body", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 0.3));
//! tank.add_indexed("Track", 1, SizeParams::cube(1.0), Transform::at(0.0, 0.6, 0.1));
//! let entity = tank.finish().unwrap();
//! assert_eq!(entity.name(), "Tank");
//! ```

use log::debug;

use crate::error::{ForgeError, Result};
use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::{MaterialDescriptor, MaterialSlot};

use super::composite::CompositeEntity;
use super::part::{create_part, PrimitiveKind, PrimitivePart, SizeParams, Transform};

/// A named group of parts destined to merge into one entity
#[derive(Debug, Clone)]
pub struct Assembly {
    prefix: String,
    parts: Vec<PrimitivePart>,
    material: Option<MaterialDescriptor>,
}

impl Assembly {
    pub fn begin(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            parts: Vec::new(),
            material: None,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parts(&self) -> &[PrimitivePart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Adds a part named `{prefix}_{role}`
    pub fn add(&mut self, role: &str, size: SizeParams, transform: Transform) -> &mut PrimitivePart {
        let name = format!("{}_{}", self.prefix, role);
        self.push(size, transform, name)
    }

    /// Adds a part named `{prefix}_{role}_{index}`
    pub fn add_indexed(
        &mut self,
        role: &str,
        index: impl std::fmt::Display,
        size: SizeParams,
        transform: Transform,
    ) -> &mut PrimitivePart {
        let name = format!("{}_{}_{}", self.prefix, role, index);
        self.push(size, transform, name)
    }

    fn push(&mut self, size: SizeParams, transform: Transform, name: String) -> &mut PrimitivePart {
        let part = PrimitivePart {
            kind: size.kind(),
            name,
            size,
            transform,
        };
        let index = self.parts.len();
        self.parts.push(part);
        &mut self.parts[index]
    }

    /// Adds a part built elsewhere (see [`create_part`])
    ///
    /// Fails with [`ForgeError::PartOutsideAssembly`] unless the part's name starts with
    /// this assembly's prefix.
    pub fn add_part(&mut self, part: PrimitivePart) -> Result<()> {
        if !part.name.starts_with(&self.prefix) {
            return Err(ForgeError::PartOutsideAssembly {
                prefix: self.prefix.clone(),
                part: part.name,
            });
        }
        self.parts.push(part);
        Ok(())
    }

    /// Convenience wrapper over [`create_part`] followed by [`Assembly::add_part`]
    pub fn create_part(
        &mut self,
        kind: PrimitiveKind,
        size: SizeParams,
        transform: Transform,
        name: impl Into<String>,
    ) -> Result<()> {
        let part = create_part(kind, size, transform, name)?;
        self.add_part(part)
    }

    /// Builder-style material binding, see [`crate::gfx::resources::bind`]
    pub fn bind_material(&mut self, material: &MaterialDescriptor) -> &mut Self {
        crate::gfx::resources::material::bind(material, self);
        self
    }

    pub fn material(&self) -> Option<&MaterialDescriptor> {
        self.material.as_ref()
    }

    /// Merges every part into one entity named after the prefix
    ///
    /// The bound material (or the default one) ends up in the entity's only slot.
    pub fn finish(self) -> Result<CompositeEntity> {
        if self.parts.is_empty() {
            return Err(ForgeError::EmptyAssembly { prefix: self.prefix });
        }

        let mut mesh = GeometryData::new();
        for part in &self.parts {
            mesh.append(&part.world_geometry());
        }

        debug!(
            "Merged {} parts into '{}' ({} triangles)",
            self.parts.len(),
            self.prefix,
            mesh.triangle_count()
        );

        let material = self.material.unwrap_or_default();
        Ok(CompositeEntity::new(self.prefix, mesh, material))
    }
}

impl MaterialSlot for Assembly {
    fn slot_material(&self) -> Option<&MaterialDescriptor> {
        self.material.as_ref()
    }

    fn replace_slot_material(&mut self, material: MaterialDescriptor) -> Option<MaterialDescriptor> {
        self.material.replace(material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::Aabb;

    #[test]
    fn test_part_naming() {
        let mut a = Assembly::begin("Fighter");
        a.add("Body", SizeParams::cylinder(0.3, 2.0), Transform::default());
        a.add_indexed("Blade", 2, SizeParams::cube(0.1), Transform::default());
        let names: Vec<_> = a.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Fighter_Body", "Fighter_Blade_2"]);
    }

    #[test]
    fn test_finish_merges_every_part() {
        let mut a = Assembly::begin("Tank");
        for i in 0..5 {
            a.add_indexed("Wheel", i, SizeParams::cube(1.0), Transform::at(i as f32, 0.0, 0.0));
        }
        let entity = a.finish().unwrap();
        assert_eq!(entity.name(), "Tank");
        assert_eq!(entity.mesh().triangle_count(), 5 * 12);
        let expected = Aabb::new(
            cgmath::Vector3::new(-0.5, -0.5, -0.5),
            cgmath::Vector3::new(4.5, 0.5, 0.5),
        );
        assert!(entity.bounds().unwrap().approx_eq(&expected, 1e-5));
    }

    #[test]
    fn test_empty_assembly_fails() {
        let err = Assembly::begin("Ghost").finish().unwrap_err();
        assert!(matches!(err, ForgeError::EmptyAssembly { prefix } if prefix == "Ghost"));
    }

    #[test]
    fn test_foreign_part_is_rejected() {
        let mut a = Assembly::begin("Tank");
        let part = create_part(
            PrimitiveKind::Box,
            SizeParams::cube(1.0),
            Transform::default(),
            "Bomber_Wing",
        )
        .unwrap();
        assert!(matches!(
            a.add_part(part),
            Err(ForgeError::PartOutsideAssembly { .. })
        ));
        assert!(a.is_empty());
    }

    #[test]
    fn test_last_bound_material_wins() {
        let mut a = Assembly::begin("Tank");
        a.add("Body", SizeParams::cube(1.0), Transform::default());
        a.bind_material(&MaterialDescriptor::new("Rust", [0.5, 0.2, 0.1, 1.0], 0.3, 0.9))
            .bind_material(&MaterialDescriptor::new("Olive", [0.3, 0.35, 0.2, 1.0], 0.2, 0.7));
        let entity = a.finish().unwrap();
        assert_eq!(entity.materials().len(), 1);
        assert_eq!(entity.material().name, "Olive");
    }

    #[test]
    fn test_unbound_assembly_gets_default_material() {
        let mut a = Assembly::begin("Rock");
        a.add("Core", SizeParams::sphere(1.0), Transform::default());
        assert_eq!(a.finish().unwrap().material(), &MaterialDescriptor::default());
    }
}
