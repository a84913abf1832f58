//! # Asset Recipes
//!
//! Each [`Recipe`] is the geometric description of one game asset: which primitives it is
//! made of, where they sit, the material the merged entity carries, and how it is captured
//! (angles, file naming, camera distance, output subdirectory).
//!
//! Recipes only talk to the composition API ([`Assembly`], [`SizeParams`], [`Transform`]),
//! so adding an asset means adding a function and a catalog entry.
//!
//! ```
//! use sprite_forge::gfx::scene::Scene;
//! use sprite_forge::recipes;
//!
//! let recipe = recipes::find("SimpleTank").unwrap();
//! let mut scene = Scene::new();
//! let assembly = recipe.build(&mut scene).unwrap();
//! assert_eq!(assembly.prefix(), "SimpleTank");
//! assert_eq!(assembly.len(), 5);
//! ```
//!
//! [`SizeParams`]: crate::gfx::scene::SizeParams
//! [`Transform`]: crate::gfx::scene::Transform

pub mod buildings;
pub mod resources;
pub mod units;

use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::capture::{AngleSet, FilenameTemplate};
use crate::error::Result;
use crate::gfx::scene::{Assembly, Scene};

/// Builds an asset's parts, defining its material in the scene's library
pub type BuildFn = fn(&mut Scene) -> Result<Assembly>;

/// Broad grouping used by the menu and the default output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Unit,
    Aircraft,
    Building,
    Resource,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Unit => "unit",
            Category::Aircraft => "aircraft",
            Category::Building => "building",
            Category::Resource => "resource",
        };
        f.write_str(name)
    }
}

#[derive(Clone)]
pub struct Recipe {
    /// Assembly prefix, which is also the captured entity's name
    pub name: &'static str,
    /// Menu text
    pub label: &'static str,
    pub category: Category,
    pub angles: AngleSet,
    pub template: FilenameTemplate,
    /// Camera offset along each axis, as in `(d, -d, d)`
    pub camera_distance: f32,
    /// Directory under the output root; empty for the root itself
    pub subdir: &'static str,
    build: BuildFn,
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("angles", &self.angles)
            .field("template", &self.template)
            .field("camera_distance", &self.camera_distance)
            .field("subdir", &self.subdir)
            .finish()
    }
}

impl Recipe {
    pub fn new(name: &'static str, label: &'static str, category: Category, build: BuildFn) -> Self {
        Self {
            name,
            label,
            category,
            angles: AngleSet::EightWay,
            template: FilenameTemplate::Rotation,
            camera_distance: crate::gfx::camera::DEFAULT_DISTANCE,
            subdir: "",
            build,
        }
    }

    /// Builder pattern: Set the capture angles
    pub fn with_angles(mut self, angles: AngleSet) -> Self {
        self.angles = angles;
        self
    }

    /// Builder pattern: Set the file naming scheme
    pub fn with_template(mut self, template: FilenameTemplate) -> Self {
        self.template = template;
        self
    }

    /// Builder pattern: Set the camera distance
    pub fn with_camera_distance(mut self, distance: f32) -> Self {
        self.camera_distance = distance;
        self
    }

    /// Builder pattern: Set the output subdirectory
    pub fn in_subdir(mut self, subdir: &'static str) -> Self {
        self.subdir = subdir;
        self
    }

    /// Runs the recipe; the returned assembly is not yet merged
    pub fn build(&self, scene: &mut Scene) -> Result<Assembly> {
        (self.build)(scene)
    }
}

/// Every asset the tool knows how to generate, in menu order
pub fn catalog() -> Vec<Recipe> {
    let mut recipes = Vec::new();
    recipes.extend(units::recipes());
    recipes.extend(buildings::recipes());
    recipes.extend(resources::recipes());
    recipes
}

/// Looks a recipe up by name, ignoring ASCII case
pub fn find(name: &str) -> Option<Recipe> {
    catalog()
        .into_iter()
        .find(|r| r.name.eq_ignore_ascii_case(name))
}

/// Random source for recipes with scattered parts
///
/// Seeded from the recipe name so every run places parts identically.
pub(crate) fn seeded_rng(name: &str) -> StdRng {
    let seed = name
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |hash, b| {
            (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
    StdRng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let catalog = catalog();
        let names: HashSet<_> = catalog.iter().map(|r| r.name.to_ascii_lowercase()).collect();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn test_every_recipe_builds_a_nonempty_entity() {
        for recipe in catalog() {
            let mut scene = Scene::new();
            let assembly = recipe.build(&mut scene).unwrap();
            assert_eq!(assembly.prefix(), recipe.name);
            assert!(assembly.parts().iter().all(|p| p.name.starts_with(recipe.name)));
            assert!(assembly.material().is_some(), "{} has no material", recipe.name);

            let entity = scene.finish(assembly).unwrap();
            assert_eq!(entity.materials().len(), 1);
            assert!(entity.mesh().triangle_count() > 0);
            assert!(recipe.camera_distance > 0.0);
        }
    }

    #[test]
    fn test_find_ignores_case() {
        assert_eq!(find("simpletank").map(|r| r.name), Some("SimpleTank"));
        assert!(find("Zeppelin").is_none());
    }

    #[test]
    fn test_seeded_rng_is_stable() {
        use rand::Rng;
        let a: Vec<f32> = (0..4).map(|_| seeded_rng("WoodDeposit").random_range(0.0..1.0)).collect();
        let mut rng = seeded_rng("WoodDeposit");
        let b: f32 = rng.random_range(0.0..1.0);
        assert_eq!(a[0], b);
        assert_ne!(
            seeded_rng("WoodDeposit").random_range(0.0..1.0_f32),
            seeded_rng("StoneDeposit").random_range(0.0..1.0_f32)
        );
    }
}
