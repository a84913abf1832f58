//! Running the whole recipe catalog

use sprite_forge::prelude::*;
use sprite_forge::testing::RecordingRenderer;

fn runner_in(dir: &std::path::Path) -> BatchRunner<RecordingRenderer> {
    let mut config = ForgeConfig::default();
    config.output.directory = dir.to_path_buf();
    BatchRunner::with_renderer(config, RecordingRenderer::new())
}

#[test]
fn whole_catalog_captures_every_planned_frame() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = runner_in(dir.path());
    let recipes = catalog();

    let summary = runner.run_all(&recipes);

    assert!(summary.is_success(), "{:?}", summary.failed);
    assert_eq!(summary.completed.len(), recipes.len());
    let planned: usize = recipes.iter().map(|r| r.angles.angles().len()).sum();
    assert_eq!(summary.file_count(), planned);
    assert!(summary.completed.iter().flat_map(|r| &r.files).all(|f| f.exists()));
}

#[test]
fn file_names_follow_each_recipe_template() {
    let dir = tempfile::tempdir().unwrap();
    let mut runner = runner_in(dir.path());

    let fighter = runner.run(&sprite_forge::recipes::find("Fighter").unwrap()).unwrap();
    let wood = runner.run(&sprite_forge::recipes::find("WoodDeposit").unwrap()).unwrap();

    let fighter_dir = dir.path().join("air_units").join("fighter");
    assert_eq!(fighter.files[0], fighter_dir.join("Fighter_angle_00.png"));
    assert_eq!(fighter.files[7], fighter_dir.join("Fighter_angle_07.png"));
    assert_eq!(wood.files, [dir.path().join("resources").join("WoodDeposit_rot0.png")]);
}

#[test]
fn every_frame_sees_the_configured_light_rig() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ForgeConfig::default();
    config.output.directory = dir.path().to_path_buf();
    config.camera.lighting = sprite_forge::config::LightingPreset::TwoSun;
    let mut runner = BatchRunner::with_renderer(config, RecordingRenderer::new());

    runner.run(&sprite_forge::recipes::find("Barracks").unwrap()).unwrap();

    let frames = &runner.renderer().frames;
    assert_eq!(frames.len(), 8);
    assert!(frames.iter().all(|f| f.light_count == 2));
    assert_eq!(
        frames.last().map(|f| f.output.clone()),
        Some(dir.path().join("buildings").join("barracks").join("Barracks_angle_07.png"))
    );
    assert!(frames.iter().all(|f| f.entity == "Barracks"));
}
