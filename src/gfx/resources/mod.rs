//! Shared rendering resources
//!
//! Currently just materials: the descriptors composites are shaded with.

pub mod material;

// Re-export main types
pub use material::{bind, MaterialDescriptor, MaterialId, MaterialLibrary, MaterialSlot, DEFAULT_MATERIAL};
