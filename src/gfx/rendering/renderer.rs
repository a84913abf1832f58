//! Renderer boundary
//!
//! Capture jobs hand a [`RenderRequest`] to anything implementing [`Renderer`] and expect
//! one image written at the requested path before `render` returns. Which backend serves
//! the run is decided once at startup by [`RendererHandle::negotiate`].

use std::path::Path;

use log::info;

use crate::error::{ForgeError, RenderError, Result};
use crate::gfx::camera::{CameraRig, LightRig};
use crate::gfx::scene::CompositeEntity;

use super::config::{EnginePreference, RenderConfig};
use super::software::SoftwareRenderer;

#[cfg(feature = "gpu")]
use super::gpu::GpuRenderer;

/// Everything a backend needs to draw one frame
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Subject, already turned to the frame's orientation
    pub entity: &'a CompositeEntity,
    pub camera: &'a CameraRig,
    pub lights: &'a LightRig,
    pub config: &'a RenderConfig,
    pub output: &'a Path,
}

/// A blocking, single-frame renderer
pub trait Renderer {
    fn name(&self) -> &str;

    /// Renders the request and writes the image before returning
    fn render(&mut self, request: &RenderRequest<'_>) -> std::result::Result<(), RenderError>;
}

/// The renderer picked for a run
pub enum RendererHandle {
    Software(SoftwareRenderer),
    #[cfg(feature = "gpu")]
    Gpu(GpuRenderer),
}

impl std::fmt::Debug for RendererHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RendererHandle").field(&self.name()).finish()
    }
}

impl RendererHandle {
    /// Decides the backend once for the whole run
    ///
    /// `Auto` prefers the GPU and falls back to software. Asking for `Gpu` when none is
    /// available is an error.
    pub fn negotiate(preference: EnginePreference) -> Result<Self> {
        let handle = match preference {
            EnginePreference::Software => RendererHandle::Software(SoftwareRenderer::new()),
            EnginePreference::Gpu => Self::try_gpu().map_err(ForgeError::NoRenderer)?,
            EnginePreference::Auto => match Self::try_gpu() {
                Ok(handle) => handle,
                Err(reason) => {
                    info!("GPU renderer unavailable ({reason}), using software renderer");
                    RendererHandle::Software(SoftwareRenderer::new())
                }
            },
        };

        info!("Selected {} renderer", handle.name());
        Ok(handle)
    }

    #[cfg(feature = "gpu")]
    fn try_gpu() -> std::result::Result<Self, String> {
        GpuRenderer::new()
            .map(RendererHandle::Gpu)
            .map_err(|e| e.to_string())
    }

    #[cfg(not(feature = "gpu"))]
    fn try_gpu() -> std::result::Result<Self, String> {
        Err("built without the `gpu` feature".to_string())
    }
}

impl Renderer for RendererHandle {
    fn name(&self) -> &str {
        match self {
            RendererHandle::Software(r) => r.name(),
            #[cfg(feature = "gpu")]
            RendererHandle::Gpu(r) => r.name(),
        }
    }

    fn render(&mut self, request: &RenderRequest<'_>) -> std::result::Result<(), RenderError> {
        match self {
            RendererHandle::Software(r) => r.render(request),
            #[cfg(feature = "gpu")]
            RendererHandle::Gpu(r) => r.render(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_software_preference_is_honoured() {
        let handle = RendererHandle::negotiate(EnginePreference::Software).unwrap();
        assert_eq!(handle.name(), "software");
    }

    #[cfg(not(feature = "gpu"))]
    #[test]
    fn test_gpu_without_feature_is_an_error() {
        let err = RendererHandle::negotiate(EnginePreference::Gpu).unwrap_err();
        assert!(matches!(err, ForgeError::NoRenderer(_)));
    }

    #[cfg(not(feature = "gpu"))]
    #[test]
    fn test_auto_falls_back_to_software() {
        let handle = RendererHandle::negotiate(EnginePreference::Auto).unwrap();
        assert!(matches!(handle, RendererHandle::Software(_)));
    }
}
