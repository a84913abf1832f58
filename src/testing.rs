//! Test doubles for code that drives a [`Renderer`]

use std::fs;
use std::path::PathBuf;

use cgmath::Vector3;

use crate::error::RenderError;
use crate::gfx::camera::CameraRig;
use crate::gfx::rendering::{RenderConfig, RenderRequest, Renderer};

/// What a [`RecordingRenderer`] saw for one call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedFrame {
    pub entity: String,
    pub orientation: Vector3<f32>,
    pub camera: CameraRig,
    pub light_count: usize,
    pub config: RenderConfig,
    pub output: PathBuf,
}

/// Renderer that records every request and writes a small deterministic file
///
/// Can be told to fail at a given zero-based frame; the failing frame is recorded but
/// nothing is written for it.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<RecordedFrame>,
    fail_at: Option<usize>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(frame: usize) -> Self {
        Self {
            frames: Vec::new(),
            fail_at: Some(frame),
        }
    }
}

impl Renderer for RecordingRenderer {
    fn name(&self) -> &str {
        "recording"
    }

    fn render(&mut self, request: &RenderRequest<'_>) -> Result<(), RenderError> {
        let index = self.frames.len();
        let entity = request.entity;
        self.frames.push(RecordedFrame {
            entity: entity.name().to_string(),
            orientation: entity.orientation,
            camera: *request.camera,
            light_count: request.lights.len(),
            config: *request.config,
            output: request.output.to_path_buf(),
        });

        if self.fail_at == Some(index) {
            return Err(RenderError::Backend(format!("injected failure at frame {index}")));
        }

        let contents = format!(
            "{} yaw={} {}x{} transparent={} triangles={}\n",
            entity.name(),
            entity.yaw(),
            request.config.width,
            request.config.height,
            request.config.transparent_background,
            entity.mesh().triangle_count()
        );
        fs::write(request.output, contents).map_err(|source| RenderError::Io {
            path: request.output.to_path_buf(),
            source,
        })
    }
}
