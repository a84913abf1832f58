//! # Capture Rig
//!
//! Fixed camera and light placement used for every capture. The camera follows the
//! isometric convention: Euler (54.736°, 0°, 45°), placed at `(d, -d, d)` looking at the
//! origin. Lights form a 2 to 4 point setup.

use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Transform, Vector3};
use log::warn;

use crate::gfx::geometry::Aabb;
use crate::gfx::scene::part::euler_xyz;

/// Elevation of the isometric camera (rotation about X), in degrees
pub const ISOMETRIC_ELEVATION: f32 = 54.736;
/// Azimuth of the isometric camera (rotation about Z), in degrees
pub const ISOMETRIC_AZIMUTH: f32 = 45.0;
/// Vertical field of view of a 50mm lens on a 36mm sensor
pub const DEFAULT_FOV: f32 = 39.6;
/// Camera offset component used when nothing else is specified
pub const DEFAULT_DISTANCE: f32 = 10.0;

/// Area light power that maps to a radiance of 1.0
const AREA_POWER_SCALE: f32 = 500.0;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Camera placement: position plus Euler orientation in degrees
///
/// With zero orientation the camera looks down -Z with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vector3<f32>,
    pub orientation: Vector3<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::isometric(DEFAULT_DISTANCE)
    }
}

impl CameraRig {
    pub fn new(position: Vector3<f32>, orientation: Vector3<f32>) -> Self {
        Self {
            position,
            orientation,
            fovy: Deg(DEFAULT_FOV),
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    /// Isometric camera at `(d, -d, d)` looking at the origin
    pub fn isometric(distance: f32) -> Self {
        Self::new(
            Vector3::new(distance, -distance, distance),
            Vector3::new(ISOMETRIC_ELEVATION, 0.0, ISOMETRIC_AZIMUTH),
        )
    }

    /// Unit view direction
    pub fn forward(&self) -> Vector3<f32> {
        euler_xyz(self.orientation)
            .transform_vector(Vector3::new(0.0, 0.0, -1.0))
            .normalize()
    }

    /// Unit up vector of the image plane
    pub fn up(&self) -> Vector3<f32> {
        euler_xyz(self.orientation)
            .transform_vector(Vector3::new(0.0, 1.0, 0.0))
            .normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(Point3::from_vec(self.position), self.forward(), self.up())
    }

    /// Perspective projection in OpenGL clip conventions (z in -1..1)
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        perspective(self.fovy, aspect, self.znear, self.zfar)
    }

    pub fn view_projection(&self, aspect: f32) -> Matrix4<f32> {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Directional light; only orientation matters
    Sun,
    /// Positioned panel light
    Area,
}

/// One light: position, Euler orientation in degrees, intensity
///
/// Light travels along the orientation-rotated -Z axis. Sun intensity is used as the
/// radiance directly; area power is divided by 500.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSpec {
    pub name: String,
    pub kind: LightKind,
    pub position: Vector3<f32>,
    pub orientation: Vector3<f32>,
    pub intensity: f32,
}

impl LightSpec {
    pub fn sun(name: &str, orientation: Vector3<f32>, energy: f32) -> Self {
        Self {
            name: name.to_string(),
            kind: LightKind::Sun,
            position: Vector3::new(0.0, 0.0, 10.0),
            orientation,
            intensity: energy,
        }
    }

    pub fn area(name: &str, position: Vector3<f32>, orientation: Vector3<f32>, power: f32) -> Self {
        Self {
            name: name.to_string(),
            kind: LightKind::Area,
            position,
            orientation,
            intensity: power,
        }
    }

    /// Unit direction the light travels in
    pub fn direction(&self) -> Vector3<f32> {
        euler_xyz(self.orientation)
            .transform_vector(Vector3::new(0.0, 0.0, -1.0))
            .normalize()
    }

    /// Intensity on the renderer's normalised scale
    pub fn radiance(&self) -> f32 {
        match self.kind {
            LightKind::Sun => self.intensity,
            LightKind::Area => self.intensity / AREA_POWER_SCALE,
        }
    }
}

/// Ordered list of lights
#[derive(Debug, Clone, PartialEq)]
pub struct LightRig {
    lights: Vec<LightSpec>,
}

impl Default for LightRig {
    fn default() -> Self {
        Self::three_point()
    }
}

impl LightRig {
    pub fn new(lights: Vec<LightSpec>) -> Self {
        Self { lights }
    }

    /// Key and fill suns, the cheap setup
    pub fn two_sun() -> Self {
        Self::new(vec![
            LightSpec::sun("Sun", Vector3::new(45.0, 0.0, 45.0), 2.0),
            LightSpec::sun("Fill", Vector3::new(60.0, 0.0, -30.0), 0.8),
        ])
    }

    /// Key, fill and back area lights
    pub fn three_point() -> Self {
        Self::new(vec![
            LightSpec::area(
                "Key_Light",
                Vector3::new(5.0, -2.0, 8.0),
                Vector3::new(60.0, 0.0, 20.0),
                800.0,
            ),
            LightSpec::area(
                "Fill_Light",
                Vector3::new(-5.0, 2.0, 5.0),
                Vector3::new(45.0, 0.0, -20.0),
                400.0,
            ),
            LightSpec::area(
                "Back_Light",
                Vector3::new(0.0, 5.0, 4.0),
                Vector3::new(30.0, -20.0, 0.0),
                600.0,
            ),
        ])
    }

    pub fn lights(&self) -> &[LightSpec] {
        &self.lights
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }
}

/// Camera plus lights, independent of what is being captured
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneRig {
    camera: CameraRig,
    lights: LightRig,
}

impl SceneRig {
    pub fn new(camera: CameraRig, lights: LightRig) -> Self {
        let mut rig = Self {
            camera,
            lights: LightRig::default(),
        };
        rig.configure_lights(lights);
        rig
    }

    /// Isometric camera at the given distance with three-point lighting
    pub fn isometric(distance: f32) -> Self {
        Self::new(CameraRig::isometric(distance), LightRig::three_point())
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// Replaces the camera placement
    pub fn configure_camera(&mut self, position: Vector3<f32>, orientation: Vector3<f32>) {
        self.camera.position = position;
        self.camera.orientation = orientation;
    }

    /// Replaces the whole light setup
    pub fn configure_lights(&mut self, lights: LightRig) {
        if !(2..=4).contains(&lights.len()) {
            warn!(
                "Light setup has {} lights, expected between 2 and 4",
                lights.len()
            );
        }
        self.lights = lights;
    }

    /// Moves the camera to `distance` along its current viewing direction from the origin
    pub fn set_distance(&mut self, distance: f32) {
        let back = -self.camera.forward() * (distance * 3f32.sqrt());
        self.camera.position = back;
    }

    /// Places the camera so a subject with these bounds fills most of the frame
    ///
    /// Keeps the current orientation and looks at the center of the bounds.
    pub fn frame_subject(&mut self, bounds: &Aabb) {
        let half_fov = self.camera.fovy.0.to_radians() * 0.5;
        let radius = bounds.bounding_radius().max(0.1);
        let range = radius / half_fov.sin() * 1.1;
        self.camera.position = bounds.center() - self.camera.forward() * range;
    }
}
