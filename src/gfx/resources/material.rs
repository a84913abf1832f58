//! Material system for PBR-style sprite shading
//!
//! Provides material definitions and centralized management. Materials are stored in
//! [`MaterialLibrary`] keyed by name, and assemblies or composites hold exactly one of them
//! in their single material slot.

use std::collections::HashMap;

use log::debug;

/// Material ID for referencing materials
pub type MaterialId = String;

/// Name of the material every library starts with
pub const DEFAULT_MATERIAL: &str = "default";

/// Surface appearance of a composite: RGBA base colour, metallic and roughness factors
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescriptor {
    pub name: MaterialId,
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self {
            name: DEFAULT_MATERIAL.to_string(),
            base_color: [0.8, 0.8, 0.8, 1.0],
            metallic: 0.0,
            roughness: 0.5,
        }
    }
}

impl MaterialDescriptor {
    /// Creates a new material with basic PBR properties
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `base_color` - RGBA base color, each channel clamped to 0..=1
    /// * `metallic` - Metallic factor (0.0 = dielectric, 1.0 = metallic)
    /// * `roughness` - Surface roughness (0.0 = mirror, 1.0 = rough)
    pub fn new(name: &str, base_color: [f32; 4], metallic: f32, roughness: f32) -> Self {
        Self {
            name: name.to_string(),
            base_color: base_color.map(|c| c.clamp(0.0, 1.0)),
            metallic: metallic.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
        }
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [
            r.clamp(0.0, 1.0),
            g.clamp(0.0, 1.0),
            b.clamp(0.0, 1.0),
            self.base_color[3],
        ];
        self
    }

    /// Builder pattern: Set alpha transparency
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.base_color[3] = alpha.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set metallic factor
    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn rgb(&self) -> [f32; 3] {
        [self.base_color[0], self.base_color[1], self.base_color[2]]
    }
}

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metallic: f32,
    pub roughness: f32,
    _padding: [f32; 2],
}

impl From<&MaterialDescriptor> for MaterialUniform {
    fn from(material: &MaterialDescriptor) -> Self {
        Self {
            base_color: material.base_color,
            metallic: material.metallic,
            roughness: material.roughness,
            _padding: [0.0; 2],
        }
    }
}

/// Anything with a single material slot
///
/// Binding always replaces slot 0; there is never a second slot to append to.
pub trait MaterialSlot {
    /// Material currently in slot 0, if any has been bound
    fn slot_material(&self) -> Option<&MaterialDescriptor>;

    /// Puts `material` in slot 0, returning whatever was there before
    fn replace_slot_material(&mut self, material: MaterialDescriptor) -> Option<MaterialDescriptor>;
}

/// Binds `descriptor` to the target's single material slot
pub fn bind<T: MaterialSlot + ?Sized>(descriptor: &MaterialDescriptor, target: &mut T) {
    if let Some(previous) = target.replace_slot_material(descriptor.clone()) {
        if previous.name != descriptor.name {
            debug!(
                "Replaced slot 0 material '{}' with '{}'",
                previous.name, descriptor.name
            );
        }
    }
}

/// Manages all materials known to a scene
///
/// Centralized storage so one descriptor can be shared by several assemblies.
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    materials: HashMap<MaterialId, MaterialDescriptor>,
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialLibrary {
    /// Creates a new material library holding only the default material
    pub fn new() -> Self {
        let mut materials = HashMap::new();
        materials.insert(DEFAULT_MATERIAL.to_string(), MaterialDescriptor::default());
        Self { materials }
    }

    /// Creates or updates the material called `name` and returns a copy of it
    ///
    /// Calling this again with the same arguments leaves the library unchanged.
    pub fn define_material(
        &mut self,
        name: &str,
        base_color: [f32; 4],
        metallic: f32,
        roughness: f32,
    ) -> MaterialDescriptor {
        let material = MaterialDescriptor::new(name, base_color, metallic, roughness);
        self.add_material(material.clone());
        material
    }

    /// Inserts a material, replacing any existing one with the same name
    pub fn add_material(&mut self, material: MaterialDescriptor) {
        match self.materials.get(&material.name) {
            Some(existing) if *existing == material => {}
            Some(_) => {
                debug!("Updating material '{}'", material.name);
                self.materials.insert(material.name.clone(), material);
            }
            None => {
                self.materials.insert(material.name.clone(), material);
            }
        }
    }

    /// Gets a material by name
    pub fn get_material(&self, name: &str) -> Option<&MaterialDescriptor> {
        self.materials.get(name)
    }

    /// Gets the default material
    pub fn default_material(&self) -> MaterialDescriptor {
        self.materials
            .get(DEFAULT_MATERIAL)
            .cloned()
            .unwrap_or_default()
    }

    /// Gets a material with fallback to the default
    pub fn material_or_default(&self, name: Option<&str>) -> MaterialDescriptor {
        name.and_then(|n| self.get_material(n))
            .cloned()
            .unwrap_or_else(|| self.default_material())
    }

    /// Lists all material names in sorted order
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        let mut names: Vec<_> = self.materials.keys().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Slot(Option<MaterialDescriptor>);

    impl MaterialSlot for Slot {
        fn slot_material(&self) -> Option<&MaterialDescriptor> {
            self.0.as_ref()
        }

        fn replace_slot_material(&mut self, material: MaterialDescriptor) -> Option<MaterialDescriptor> {
            self.0.replace(material)
        }
    }

    #[test]
    fn test_new_clamps_factors() {
        let m = MaterialDescriptor::new("hot", [1.5, -0.2, 0.5, 2.0], 3.0, -1.0);
        assert_eq!(m.base_color, [1.0, 0.0, 0.5, 1.0]);
        assert_eq!(m.metallic, 1.0);
        assert_eq!(m.roughness, 0.0);
    }

    #[test]
    fn test_define_material_is_idempotent_upsert() {
        let mut library = MaterialLibrary::new();
        let first = library.define_material("TankMaterial", [0.2, 0.3, 0.2, 1.0], 0.5, 0.6);
        let again = library.define_material("TankMaterial", [0.2, 0.3, 0.2, 1.0], 0.5, 0.6);
        assert_eq!(first, again);
        assert_eq!(library.len(), 2);

        let updated = library.define_material("TankMaterial", [0.9, 0.1, 0.1, 1.0], 0.0, 0.9);
        assert_eq!(library.len(), 2);
        assert_eq!(library.get_material("TankMaterial"), Some(&updated));
    }

    #[test]
    fn test_bind_replaces_slot_zero() {
        let mut slot = Slot(None);
        let steel = MaterialDescriptor::new("steel", [0.5, 0.5, 0.5, 1.0], 0.9, 0.3);
        let paint = MaterialDescriptor::new("paint", [0.1, 0.4, 0.1, 1.0], 0.1, 0.7);

        bind(&steel, &mut slot);
        bind(&paint, &mut slot);
        assert_eq!(slot.slot_material(), Some(&paint));
    }

    #[test]
    fn test_missing_material_falls_back_to_default() {
        let library = MaterialLibrary::new();
        assert_eq!(library.material_or_default(Some("nope")).name, DEFAULT_MATERIAL);
        assert_eq!(library.material_or_default(None), MaterialDescriptor::default());
    }

    #[test]
    fn test_uniform_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<MaterialUniform>() % 16, 0);
        let uniform = MaterialUniform::from(&MaterialDescriptor::default());
        assert_eq!(uniform.roughness, 0.5);
    }
}
