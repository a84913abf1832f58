//! # Graphics Module
//!
//! Everything between primitive shapes and pixels.
//!
//! - **Geometry** ([`geometry`]) - procedural tessellation of the primitive forms
//! - **Scene** ([`scene`]) - parts, assemblies, composite entities and the scene arena
//! - **Resources** ([`resources`]) - material descriptors and the material library
//! - **Camera** ([`camera`]) - the fixed isometric camera and light rig
//! - **Rendering** ([`rendering`]) - render configuration, the renderer boundary and backends

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::SceneRig;
pub use rendering::{RenderConfig, Renderer, RendererHandle};
