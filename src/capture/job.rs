//! # Capture Jobs
//!
//! A [`CaptureJob`] turns one composite entity to each angle in order, renders a frame per
//! angle and writes it under a deterministic name.
//!
//! ## States
//!
//! `Idle → Rotating → Rendering → Written` for every angle, then `Complete`; a render
//! error moves the job to `Failed` and aborts the remaining angles. Frames written before
//! the failure stay on disk and are listed by [`CaptureJob::written_files`].
//!
//! The entity's orientation is restored when the job ends, whichever way it ends.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use cgmath::Vector3;
use log::{debug, error, info};

use crate::error::{ForgeError, Result};
use crate::gfx::camera::SceneRig;
use crate::gfx::rendering::{RenderConfig, RenderRequest, Renderer};
use crate::gfx::scene::{CompositeEntity, Scene};

use super::naming::FilenameTemplate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureState {
    Idle,
    Rotating { index: usize },
    Rendering { index: usize },
    Written { index: usize },
    Complete,
    Failed { index: usize, angle: f32 },
}

/// Outcome of a completed job
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureReport {
    pub entity: String,
    pub renderer: String,
    pub files: Vec<PathBuf>,
}

/// Restores the entity's orientation when dropped
struct OrientationGuard<'a> {
    entity: &'a mut CompositeEntity,
    original: Vector3<f32>,
}

impl<'a> OrientationGuard<'a> {
    fn new(entity: &'a mut CompositeEntity) -> Self {
        let original = entity.orientation;
        Self { entity, original }
    }
}

impl Deref for OrientationGuard<'_> {
    type Target = CompositeEntity;

    fn deref(&self) -> &CompositeEntity {
        self.entity
    }
}

impl DerefMut for OrientationGuard<'_> {
    fn deref_mut(&mut self) -> &mut CompositeEntity {
        self.entity
    }
}

impl Drop for OrientationGuard<'_> {
    fn drop(&mut self) {
        self.entity.orientation = self.original;
    }
}

/// Renders one entity at a sequence of angles
#[derive(Debug, Clone)]
pub struct CaptureJob {
    target: String,
    angles: Vec<f32>,
    output_dir: PathBuf,
    template: FilenameTemplate,
    state: CaptureState,
    written: Vec<PathBuf>,
}

impl CaptureJob {
    pub fn new(
        target: impl Into<String>,
        angles: impl Into<Vec<f32>>,
        output_dir: impl Into<PathBuf>,
        template: FilenameTemplate,
    ) -> Self {
        Self {
            target: target.into(),
            angles: angles.into(),
            output_dir: output_dir.into(),
            template,
            state: CaptureState::Idle,
            written: Vec::new(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Files written by the last run, in angle order
    pub fn written_files(&self) -> &[PathBuf] {
        &self.written
    }

    /// Path of the frame at `index`
    pub fn frame_path(&self, index: usize, angle: f32) -> PathBuf {
        self.output_dir
            .join(self.template.file_name(&self.target, angle, index))
    }

    /// Every path a successful run writes
    pub fn planned_files(&self) -> Vec<PathBuf> {
        self.angles
            .iter()
            .enumerate()
            .map(|(index, &angle)| self.frame_path(index, angle))
            .collect()
    }

    /// Runs the job against the entity named by `target` in `scene`
    ///
    /// Blocks until every frame is on disk. Re-running overwrites the same files.
    pub fn run(
        &mut self,
        scene: &mut Scene,
        rig: &SceneRig,
        config: &RenderConfig,
        renderer: &mut dyn Renderer,
    ) -> Result<CaptureReport> {
        self.state = CaptureState::Idle;
        self.written.clear();

        let entity = scene
            .entity_mut(&self.target)
            .ok_or_else(|| ForgeError::UnknownEntity(self.target.clone()))?;
        let mut entity = OrientationGuard::new(entity);

        debug!(
            "Capturing '{}' at {} angles with {} renderer",
            self.target,
            self.angles.len(),
            renderer.name()
        );

        for (index, &angle) in self.angles.iter().enumerate() {
            self.state = CaptureState::Rotating { index };
            entity.set_yaw(angle);

            let path = self
                .output_dir
                .join(self.template.file_name(&self.target, angle, index));
            self.state = CaptureState::Rendering { index };

            let request = RenderRequest {
                entity: &entity,
                camera: rig.camera(),
                lights: rig.lights(),
                config,
                output: &path,
            };

            if let Err(source) = renderer.render(&request) {
                self.state = CaptureState::Failed { index, angle };
                error!(
                    "Rendering '{}' at {}° failed after {} of {} frames: {}",
                    self.target,
                    angle,
                    self.written.len(),
                    self.angles.len(),
                    source
                );
                return Err(ForgeError::Render {
                    entity: self.target.clone(),
                    angle,
                    source,
                });
            }

            info!("Wrote {}", path.display());
            self.written.push(path);
            self.state = CaptureState::Written { index };
        }

        drop(entity);
        self.state = CaptureState::Complete;

        Ok(CaptureReport {
            entity: self.target.clone(),
            renderer: renderer.name().to_string(),
            files: self.written.clone(),
        })
    }
}
