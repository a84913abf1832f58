use std::collections::BTreeMap;

use log::{debug, warn};

use crate::error::{ForgeError, Result};
use crate::gfx::resources::material::{MaterialDescriptor, MaterialLibrary};

use super::assembly::Assembly;
use super::composite::CompositeEntity;

/// Arena of live composites plus the materials they were built with
///
/// Passed explicitly to whoever builds or captures entities. Clearing it is the
/// synchronisation point between generator runs.
#[derive(Debug, Default)]
pub struct Scene {
    pub materials: MaterialLibrary,
    entities: BTreeMap<String, CompositeEntity>,
}

impl Scene {
    /// Creates an empty scene with only the default material
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or updates a named material
    pub fn define_material(
        &mut self,
        name: &str,
        base_color: [f32; 4],
        metallic: f32,
        roughness: f32,
    ) -> MaterialDescriptor {
        self.materials.define_material(name, base_color, metallic, roughness)
    }

    /// Merges `assembly` and stores the result under its prefix
    ///
    /// An entity already stored under the same name is replaced.
    pub fn finish(&mut self, assembly: Assembly) -> Result<&mut CompositeEntity> {
        let entity = assembly.finish()?;
        self.insert(entity)
    }

    /// Stores an already built entity, replacing one with the same name
    pub fn insert(&mut self, entity: CompositeEntity) -> Result<&mut CompositeEntity> {
        let name = entity.name().to_string();
        if self.entities.insert(name.clone(), entity).is_some() {
            warn!("Replaced existing entity '{}' in scene", name);
        }
        self.entities
            .get_mut(&name)
            .ok_or(ForgeError::UnknownEntity(name))
    }

    pub fn entity(&self, name: &str) -> Option<&CompositeEntity> {
        self.entities.get(name)
    }

    pub fn entity_mut(&mut self, name: &str) -> Option<&mut CompositeEntity> {
        self.entities.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<CompositeEntity> {
        self.entities.remove(name)
    }

    /// Destroys every entity; materials are kept
    pub fn clear(&mut self) {
        if !self.entities.is_empty() {
            debug!("Clearing {} entities from scene", self.entities.len());
        }
        self.entities.clear();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    pub fn statistics(&self) -> SceneStatistics {
        let mut stats = SceneStatistics {
            entity_count: self.entities.len(),
            material_count: self.materials.len(),
            ..Default::default()
        };

        for entity in self.entities.values() {
            stats.total_vertices += entity.mesh().vertex_count();
            stats.total_triangles += entity.mesh().triangle_count();
        }

        stats
    }
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStatistics {
    pub entity_count: usize,
    pub material_count: usize,
    pub total_vertices: usize,
    pub total_triangles: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{SizeParams, Transform};

    fn crate_assembly(prefix: &str) -> Assembly {
        let mut a = Assembly::begin(prefix);
        a.add("Box", SizeParams::cube(1.0), Transform::default());
        a
    }

    #[test]
    fn test_finish_stores_entity_by_prefix() {
        let mut scene = Scene::new();
        let entity = scene.finish(crate_assembly("Crate")).unwrap();
        entity.set_yaw(45.0);
        assert_eq!(scene.names(), ["Crate"]);
        assert_eq!(scene.entity("Crate").unwrap().yaw(), 45.0);
    }

    #[test]
    fn test_same_prefix_replaces() {
        let mut scene = Scene::new();
        scene.finish(crate_assembly("Crate")).unwrap();
        let mut bigger = crate_assembly("Crate");
        bigger.add("Lid", SizeParams::plane(1.0), Transform::at(0.0, 0.0, 0.5));
        scene.finish(bigger).unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.statistics().total_triangles, 12 + 2);
    }

    #[test]
    fn test_clear_keeps_materials() {
        let mut scene = Scene::new();
        scene.define_material("Wood", [0.4, 0.25, 0.1, 1.0], 0.0, 0.8);
        scene.finish(crate_assembly("A")).unwrap();
        scene.finish(crate_assembly("B")).unwrap();
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.materials.get_material("Wood").is_some());
    }

    #[test]
    fn test_failed_finish_leaves_scene_untouched() {
        let mut scene = Scene::new();
        assert!(scene.finish(Assembly::begin("Ghost")).is_err());
        assert!(scene.is_empty());
    }
}
