// src/lib.rs
//! Sprite Forge
//!
//! Procedural primitive assembly and multi-angle isometric sprite capture for
//! pre-rendered 2D strategy game assets.

pub mod batch;
pub mod capture;
pub mod config;
pub mod error;
pub mod gfx;
pub mod output;
pub mod prelude;
pub mod recipes;
pub mod testing;

// Re-export main types for convenience
pub use batch::{BatchRunner, BatchSummary};
pub use config::ForgeConfig;
pub use error::{ForgeError, RenderError, Result};

/// Creates a batch runner from the config file (or defaults) with a negotiated renderer
pub fn default() -> Result<BatchRunner> {
    BatchRunner::from_config(ForgeConfig::load()?)
}
