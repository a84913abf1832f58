//! # Scene Management Module
//!
//! The shape-composition model: primitive parts, assemblies that group them under a
//! name prefix, the composite entities assemblies merge into, and the [`Scene`] arena that
//! owns live entities between builds and captures.
//!
//! ## Key Components
//!
//! - [`PrimitivePart`] / [`create_part`] - a single shape instance
//! - [`Assembly`] - parts sharing a prefix plus one bound material
//! - [`CompositeEntity`] - the merged, renderable result
//! - [`Scene`] - explicit arena, cleared between generator runs
//! - [`Vertex3D`] - interleaved vertex format for GPU upload
//!
//! ## Usage
//!
//! ```
//! use sprite_forge::gfx::scene::{Assembly, Scene, SizeParams, Transform};
//!
//! let mut scene = Scene::new();
//! let olive = scene.define_material("Olive", [0.3, 0.35, 0.2, 1.0], 0.2, 0.7);
//!
//! let mut tank = Assembly::begin("Tank");
//! tank.add("Body", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 0.3).scaled(1.5, 1.0, 0.5));
//! tank.add_indexed("Track", 1, SizeParams::cube(1.0), Transform::at(0.0, 0.6, 0.1));
//! tank.bind_material(&olive);
//!
//! let entity = scene.finish(tank).unwrap();
//! assert_eq!(entity.name(), "Tank");
//! ```

pub mod assembly;
pub mod composite;
pub mod part;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use assembly::Assembly;
pub use composite::CompositeEntity;
pub use part::{create_part, PrimitiveKind, PrimitivePart, SizeParams, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
