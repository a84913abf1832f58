//! Output file naming
//!
//! Downstream tooling indexes sprites by file name, so these formats are exact:
//!
//! - [`FilenameTemplate::Rotation`]: `{name}_rot{angle}.png`, e.g. `Tank_rot90.png`
//! - [`FilenameTemplate::Index`]: `{name before first dot}_angle_{index:02}.png`,
//!   e.g. `Fighter_angle_03.png`

use std::fmt;

/// How a frame's file name is derived from the entity name and angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilenameTemplate {
    #[default]
    Rotation,
    Index,
}

impl FilenameTemplate {
    pub fn file_name(&self, entity_name: &str, angle: f32, index: usize) -> String {
        match self {
            FilenameTemplate::Rotation => {
                format!("{}_rot{}.png", entity_name, format_angle(angle))
            }
            FilenameTemplate::Index => {
                let stem = entity_name.split('.').next().unwrap_or(entity_name);
                format!("{stem}_angle_{index:02}.png")
            }
        }
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilenameTemplate::Rotation => f.write_str("{name}_rot{angle}.png"),
            FilenameTemplate::Index => f.write_str("{name}_angle_{index:02}.png"),
        }
    }
}

/// Whole degrees print without a fractional part; -0 prints as 0
pub fn format_angle(angle: f32) -> String {
    if angle.is_finite() && angle.fract() == 0.0 && angle.abs() < 1e9 {
        format!("{}", angle as i64)
    } else {
        format!("{angle}")
    }
}

/// The rotation sequences sprites are captured at
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AngleSet {
    /// 0 only, for static props
    Single,
    /// 0, 90, 180, 270
    FourWay,
    /// 0, 45, ..., 315
    #[default]
    EightWay,
    Custom(Vec<f32>),
}

impl AngleSet {
    /// `count` angles evenly covering a full turn, starting at 0
    pub fn evenly_spaced(count: usize) -> Self {
        let step = 360.0 / count.max(1) as f32;
        AngleSet::Custom((0..count).map(|i| i as f32 * step).collect())
    }

    pub fn angles(&self) -> Vec<f32> {
        match self {
            AngleSet::Single => vec![0.0],
            AngleSet::FourWay => vec![0.0, 90.0, 180.0, 270.0],
            AngleSet::EightWay => (0..8).map(|i| i as f32 * 45.0).collect(),
            AngleSet::Custom(angles) => angles.clone(),
        }
    }
}
