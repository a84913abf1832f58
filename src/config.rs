//! Configuration loader: reads run settings from `sprite_forge.toml`
//!
//! Every section and field is optional; anything missing takes its default.
//!
//! ```toml
//! [output]
//! directory = "sprites"
//! write_obj = false
//!
//! [render]
//! width = 256
//! height = 256
//! transparent_background = true
//! quality = "draft"      # draft | standard | high
//! engine = "auto"        # auto | software | gpu
//!
//! [camera]
//! distance_scale = 1.0
//! lighting = "three_point"  # three_point | two_sun
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};
use crate::gfx::camera::LightRig;
use crate::gfx::rendering::{EnginePreference, QualityTier, RenderConfig};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SPRITE_FORGE_CONFIG";
/// Config file looked for in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sprite_forge.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub output: OutputSection,
    pub render: RenderSection,
    pub camera: CameraSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Preferred root directory; sprites go into per-category subdirectories
    pub directory: PathBuf,
    /// Also export each composite as OBJ + MTL next to its sprites
    pub write_obj: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("sprites"),
            write_obj: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub width: u32,
    pub height: u32,
    pub transparent_background: bool,
    pub quality: QualityTier,
    pub engine: EnginePreference,
}

impl Default for RenderSection {
    fn default() -> Self {
        let image = RenderConfig::default();
        Self {
            width: image.width,
            height: image.height,
            transparent_background: image.transparent_background,
            quality: image.quality,
            engine: EnginePreference::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightingPreset {
    #[default]
    ThreePoint,
    TwoSun,
}

impl LightingPreset {
    pub fn rig(self) -> LightRig {
        match self {
            LightingPreset::ThreePoint => LightRig::three_point(),
            LightingPreset::TwoSun => LightRig::two_sun(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSection {
    /// Multiplies every recipe's camera distance
    pub distance_scale: f32,
    pub lighting: LightingPreset,
}

impl Default for CameraSection {
    fn default() -> Self {
        Self {
            distance_scale: 1.0,
            lighting: LightingPreset::default(),
        }
    }
}

impl ForgeConfig {
    /// Loads the config file if there is one, otherwise the defaults
    pub fn load() -> Result<Self> {
        match resolve_config_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ForgeError::io(path, e))?;
        toml::from_str(&content).map_err(|source| ForgeError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            width: self.render.width,
            height: self.render.height,
            transparent_background: self.render.transparent_background,
            quality: self.render.quality,
        }
    }
}

/// Resolve the path to the config file.
///
/// Tries in order:
/// 1. `SPRITE_FORGE_CONFIG` environment variable
/// 2. `sprite_forge.toml` in the current directory
fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(p));
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: ForgeConfig = toml::from_str("").unwrap();
        assert_eq!(config, ForgeConfig::default());
        assert_eq!(config.render_config(), RenderConfig::default());
    }

    #[test]
    fn test_sections_parse() {
        let config: ForgeConfig = toml::from_str(
            r#"
            [output]
            directory = "/srv/sprites"

            [render]
            width = 512
            height = 512
            quality = "standard"
            engine = "software"

            [camera]
            distance_scale = 1.5
            lighting = "two_sun"
            "#,
        )
        .unwrap();

        assert_eq!(config.output.directory, PathBuf::from("/srv/sprites"));
        assert!(!config.output.write_obj);
        assert_eq!(config.render.engine, EnginePreference::Software);
        let render = config.render_config();
        assert_eq!((render.width, render.height), (512, 512));
        assert_eq!(render.quality, QualityTier::Standard);
        assert!(render.transparent_background);
        assert_eq!(config.camera.distance_scale, 1.5);
        assert_eq!(config.camera.lighting.rig().len(), 2);
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite_forge.toml");
        std::fs::write(&path, "[render]\nwidth = \"wide\"\n").unwrap();
        let err = ForgeConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ForgeError::Config { path: p, .. } if p == path));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ForgeConfig::from_file(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ForgeError::Io { .. }));
    }
}
