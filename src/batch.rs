//! Batch driver
//!
//! A [`BatchRunner`] holds everything that stays fixed for a run (config, rig, renderer,
//! resolved output root) and turns recipes into sprite sets one at a time. Each recipe
//! starts from an empty scene.

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::capture::{CaptureJob, CaptureReport};
use crate::config::ForgeConfig;
use crate::error::{ForgeError, Result};
use crate::gfx::camera::{SceneRig, DEFAULT_DISTANCE};
use crate::gfx::rendering::{RenderConfig, Renderer, RendererHandle};
use crate::gfx::scene::Scene;
use crate::output::OutputResolver;
use crate::recipes::Recipe;

/// Outcome of [`BatchRunner::run_all`]
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub completed: Vec<CaptureReport>,
    pub failed: Vec<(String, ForgeError)>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.completed.iter().map(|r| r.files.len()).sum()
    }
}

pub struct BatchRunner<R: Renderer = RendererHandle> {
    config: ForgeConfig,
    render_config: RenderConfig,
    rig: SceneRig,
    scene: Scene,
    renderer: R,
    resolver: OutputResolver,
}

impl BatchRunner<RendererHandle> {
    /// Negotiates the renderer named by the config
    ///
    /// The output directory is shared with every other runner built this way, so two runners
    /// in one process never write to different places.
    pub fn from_config(config: ForgeConfig) -> Result<Self> {
        let renderer = RendererHandle::negotiate(config.render.engine)?;
        let mut runner = Self::with_renderer(config, renderer);
        runner.resolver = OutputResolver::process_wide();
        Ok(runner)
    }
}

impl<R: Renderer> BatchRunner<R> {
    /// Runner with its own output resolver
    pub fn with_renderer(config: ForgeConfig, renderer: R) -> Self {
        let mut rig = SceneRig::isometric(DEFAULT_DISTANCE * config.camera.distance_scale);
        rig.configure_lights(config.camera.lighting.rig());

        Self {
            render_config: config.render_config(),
            config,
            rig,
            scene: Scene::new(),
            renderer,
            resolver: OutputResolver::new(),
        }
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Root directory sprites are written under, resolved on first use
    pub fn output_root(&mut self) -> Result<PathBuf> {
        let resolved = self.resolver.resolve(&self.config.output.directory)?;
        Ok(resolved.path)
    }

    /// Builds one recipe and captures it at every angle it asks for
    pub fn run(&mut self, recipe: &Recipe) -> Result<CaptureReport> {
        info!("Generating {} ({})", recipe.name, recipe.category);

        let dir = self.output_root()?.join(recipe.subdir);
        fs::create_dir_all(&dir).map_err(|e| ForgeError::io(&dir, e))?;

        self.scene.clear();
        let assembly = recipe.build(&mut self.scene)?;
        let entity = self.scene.finish(assembly)?;
        let name = entity.name().to_string();

        if self.config.output.write_obj {
            let obj = dir.join(format!("{}.obj", entity.name()));
            entity.write_obj(&obj)?;
            info!("Exported mesh to {}", obj.display());
        }

        self.rig
            .set_distance(recipe.camera_distance * self.config.camera.distance_scale);

        let mut job = CaptureJob::new(name, recipe.angles.angles(), dir, recipe.template);
        job.run(&mut self.scene, &self.rig, &self.render_config, &mut self.renderer)
    }

    /// Runs every recipe, carrying on past failures
    pub fn run_all(&mut self, recipes: &[Recipe]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for recipe in recipes {
            match self.run(recipe) {
                Ok(report) => summary.completed.push(report),
                Err(e) => {
                    warn!("Skipping {}: {}", recipe.name, e);
                    summary.failed.push((recipe.name.to_string(), e));
                }
            }
        }

        info!(
            "Batch finished: {} assets, {} files, {} failed",
            summary.completed.len(),
            summary.file_count(),
            summary.failed.len()
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{AngleSet, FilenameTemplate};
    use crate::gfx::scene::Assembly;
    use crate::recipes::{self, Category};
    use crate::testing::RecordingRenderer;

    fn config_in(dir: &std::path::Path) -> ForgeConfig {
        let mut config = ForgeConfig::default();
        config.output.directory = dir.join("sprites");
        config
    }

    fn empty(_: &mut Scene) -> Result<Assembly> {
        Ok(Assembly::begin("Ghost"))
    }

    #[test]
    fn test_run_writes_into_recipe_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = BatchRunner::with_renderer(config_in(dir.path()), RecordingRenderer::new());
        let recipe = recipes::find("SimpleTank").unwrap();

        let report = runner.run(&recipe).unwrap();

        let expected = dir.path().join("sprites").join("units").join("SimpleTank_rot315.png");
        assert_eq!(report.files.len(), 8);
        assert_eq!(report.files.last(), Some(&expected));
        assert!(expected.exists());
        assert_eq!(runner.scene().names(), ["SimpleTank"]);
    }

    #[test]
    fn test_camera_distance_is_scaled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.camera.distance_scale = 2.0;
        let mut runner = BatchRunner::with_renderer(config, RecordingRenderer::new());
        let recipe = recipes::find("SimpleTank").unwrap();

        runner.run(&recipe).unwrap();

        let camera = runner.renderer().frames[0].camera;
        let expected = 16.0 * 3f32.sqrt();
        assert!((cgmath::InnerSpace::magnitude(camera.position) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_run_all_skips_empty_assemblies() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = BatchRunner::with_renderer(config_in(dir.path()), RecordingRenderer::new());
        let batch = [
            Recipe::new("Ghost", "Ghost", Category::Unit, empty),
            recipes::find("IronDeposit").unwrap(),
        ];

        let summary = runner.run_all(&batch);

        assert!(!summary.is_success());
        assert!(matches!(summary.failed[0].1, ForgeError::EmptyAssembly { .. }));
        assert_eq!(summary.completed.len(), 1);
        assert_eq!(summary.file_count(), 1);
        assert!(!dir.path().join("sprites").join("Ghost_rot0.png").exists());
    }

    #[test]
    fn test_files_are_named_after_the_entity() {
        let dir = tempfile::tempdir().unwrap();
        let mut runner = BatchRunner::with_renderer(config_in(dir.path()), RecordingRenderer::new());
        let recipe = Recipe::new("LightJeep", "Light jeep", Category::Unit, |_| {
            let mut jeep = Assembly::begin("Jeep");
            jeep.add("Body", crate::gfx::scene::SizeParams::cube(1.0), Default::default());
            Ok(jeep)
        })
        .with_angles(AngleSet::Single);

        let report = runner.run(&recipe).unwrap();

        assert_eq!(report.files, [dir.path().join("sprites").join("Jeep_rot0.png")]);
        assert_eq!(runner.renderer().frames[0].entity, "Jeep");
        assert_eq!(runner.scene().names(), ["Jeep"]);
    }

    #[test]
    fn test_obj_export_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.output.write_obj = true;
        let mut runner = BatchRunner::with_renderer(config, RecordingRenderer::new());
        let recipe = Recipe::new("Crate", "Crate", Category::Resource, |scene| {
            let mut crate_box = Assembly::begin("Crate");
            crate_box.add("Body", crate::gfx::scene::SizeParams::cube(1.0), Default::default());
            crate_box.bind_material(&scene.materials.default_material());
            Ok(crate_box)
        })
        .with_angles(AngleSet::Single)
        .with_template(FilenameTemplate::Index);

        let report = runner.run(&recipe).unwrap();

        let root = dir.path().join("sprites");
        assert_eq!(report.files, [root.join("Crate_angle_00.png")]);
        assert!(root.join("Crate.obj").exists());
        assert!(root.join("Crate.mtl").exists());
    }
}
