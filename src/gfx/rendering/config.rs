//! Output image parameters, independent of the subject being captured

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Render quality; higher tiers supersample more
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    Draft,
    Standard,
    High,
}

impl QualityTier {
    /// Samples per pixel along each axis
    pub fn supersample(self) -> u32 {
        match self {
            QualityTier::Draft => 1,
            QualityTier::Standard => 2,
            QualityTier::High => 4,
        }
    }

    /// Multisample count for the GPU backend
    pub fn msaa_samples(self) -> u32 {
        match self {
            QualityTier::Draft => 1,
            QualityTier::Standard | QualityTier::High => 4,
        }
    }
}

/// Which renderer the run should negotiate for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnginePreference {
    /// GPU when available, software otherwise
    #[default]
    Auto,
    Software,
    Gpu,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub transparent_background: bool,
    pub quality: QualityTier,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            transparent_background: true,
            quality: QualityTier::Draft,
        }
    }
}

impl RenderConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_transparent_background(mut self, transparent: bool) -> Self {
        self.transparent_background = transparent;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Rejects sizes no backend can produce
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size {}x{} has a zero dimension",
                self.width, self.height
            )));
        }
        if self.width > 8192 || self.height > 8192 {
            return Err(RenderError::InvalidConfig(format!(
                "image size {}x{} exceeds 8192",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_efficient_profile() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (256, 256));
        assert!(config.transparent_background);
        assert_eq!(config.quality.supersample(), 1);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: RenderConfig = toml::from_str("width = 512\nquality = \"high\"").unwrap();
        assert_eq!(config.width, 512);
        assert_eq!(config.height, 256);
        assert_eq!(config.quality, QualityTier::High);
    }

    #[test]
    fn test_zero_size_is_invalid() {
        assert!(RenderConfig::default().with_size(0, 64).validate().is_err());
        assert!(RenderConfig::default().with_size(512, 512).validate().is_ok());
    }
}
