//! Renderer boundary and backends
//!
//! [`RenderConfig`] holds the image parameters, [`Renderer`] is the seam capture jobs
//! render through, and [`RendererHandle`] is the backend negotiated for a run: the
//! deterministic [`SoftwareRenderer`], or the wgpu renderer with the `gpu` feature.

pub mod config;
pub mod renderer;
pub mod software;

#[cfg(feature = "gpu")]
pub mod gpu;

// Re-export main types
pub use config::{EnginePreference, QualityTier, RenderConfig};
pub use renderer::{RenderRequest, Renderer, RendererHandle};
pub use software::SoftwareRenderer;

#[cfg(feature = "gpu")]
pub use gpu::GpuRenderer;
