pub mod rig;

// Re-export main types
pub use rig::{
    CameraRig, LightKind, LightRig, LightSpec, SceneRig, DEFAULT_DISTANCE, DEFAULT_FOV,
    ISOMETRIC_AZIMUTH, ISOMETRIC_ELEVATION,
};
