//! # Sprite Forge Prelude
//!
//! Brings the types needed to describe and capture an asset into scope.
//!
//! ```no_run
//! use sprite_forge::prelude::*;
//!
//! fn main() -> Result<(), ForgeError> {
//!     let mut scene = Scene::new();
//!     let steel = scene.define_material("Steel", [0.6, 0.6, 0.65, 1.0], 0.9, 0.3);
//!
//!     let mut crate_box = Assembly::begin("Crate");
//!     crate_box.add("Body", SizeParams::cube(1.0), Transform::at(0.0, 0.0, 0.5));
//!     crate_box.add("Lid", SizeParams::cube(1.1), Transform::at(0.0, 0.0, 1.0).scaled(1.0, 1.0, 0.1));
//!     crate_box.bind_material(&steel);
//!     scene.finish(crate_box)?;
//!
//!     let mut renderer = RendererHandle::negotiate(EnginePreference::Auto)?;
//!     let mut job = CaptureJob::new("Crate", AngleSet::FourWay.angles(), "sprites", FilenameTemplate::Rotation);
//!     job.run(&mut scene, &SceneRig::default(), &RenderConfig::default(), &mut renderer)?;
//!     Ok(())
//! }
//! ```

// Composition
pub use crate::gfx::resources::{MaterialDescriptor, MaterialLibrary};
pub use crate::gfx::scene::{
    Assembly, CompositeEntity, PrimitiveKind, PrimitivePart, Scene, SizeParams, Transform,
};

// Camera, lights and rendering
pub use crate::gfx::camera::{CameraRig, LightRig, SceneRig};
pub use crate::gfx::rendering::{
    EnginePreference, QualityTier, RenderConfig, Renderer, RendererHandle,
};

// Capture and batch
pub use crate::batch::{BatchRunner, BatchSummary};
pub use crate::capture::{AngleSet, CaptureJob, CaptureReport, CaptureState, FilenameTemplate};
pub use crate::config::ForgeConfig;
pub use crate::error::{ForgeError, RenderError};
pub use crate::output::OutputResolver;
pub use crate::recipes::{catalog, Recipe};

// Re-export common external dependencies
pub use cgmath::{Deg, Vector3};
