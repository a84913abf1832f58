//! Deterministic CPU rasterizer
//!
//! Z-buffered, flat shaded, supersampled according to the quality tier. Same inputs always
//! give the same bytes, which keeps regenerated sprite sets identical.

use cgmath::{InnerSpace, Vector3, Vector4};
use image::{ImageFormat, RgbaImage};

use crate::error::RenderError;
use crate::gfx::camera::{LightKind, LightSpec};
use crate::gfx::resources::material::MaterialDescriptor;

use super::renderer::{RenderRequest, Renderer};

const OPAQUE_BACKGROUND: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
const TRANSPARENT_BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Screen-space vertex: pixel x, pixel y, NDC depth
#[derive(Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    ambient: f32,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self { ambient: 0.15 }
    }

    /// Renders the request into an image without touching the file system
    pub fn rasterize(&self, request: &RenderRequest<'_>) -> Result<RgbaImage, RenderError> {
        let config = request.config;
        config.validate()?;

        let ss = config.quality.supersample();
        let width = config.width * ss;
        let height = config.height * ss;

        let background = if config.transparent_background {
            TRANSPARENT_BACKGROUND
        } else {
            OPAQUE_BACKGROUND
        };

        let mut color = vec![background; (width * height) as usize];
        let mut depth = vec![f32::INFINITY; (width * height) as usize];

        let mesh = request.entity.oriented_mesh();
        let material = request.entity.material();
        let view_proj = request.camera.view_projection(config.aspect());
        let eye = request.camera.position;

        let projected: Vec<Option<ScreenVertex>> = mesh
            .vertices
            .iter()
            .map(|&[x, y, z]| {
                let clip = view_proj * Vector4::new(x, y, z, 1.0);
                if clip.w <= f32::EPSILON {
                    return None;
                }
                let ndc = clip.truncate() / clip.w;
                Some(ScreenVertex {
                    x: (ndc.x * 0.5 + 0.5) * width as f32,
                    y: (0.5 - ndc.y * 0.5) * height as f32,
                    z: ndc.z,
                })
            })
            .collect();

        for tri in mesh.indices.chunks_exact(3) {
            let [ia, ib, ic] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(a), Some(b), Some(c)) = (
                projected.get(ia).copied().flatten(),
                projected.get(ib).copied().flatten(),
                projected.get(ic).copied().flatten(),
            ) else {
                continue;
            };

            let pa = Vector3::from(mesh.vertices[ia]);
            let pb = Vector3::from(mesh.vertices[ib]);
            let pc = Vector3::from(mesh.vertices[ic]);
            let normal = (pb - pa).cross(pc - pa);
            if normal.magnitude2() <= f32::EPSILON * f32::EPSILON {
                continue;
            }

            let centroid = (pa + pb + pc) / 3.0;
            let view = (eye - centroid).normalize();
            let mut normal = normal.normalize();
            if normal.dot(view) < 0.0 {
                normal = -normal;
            }

            let rgb = self.shade(material, request.lights.lights(), centroid, normal, view);
            let fragment = [rgb[0], rgb[1], rgb[2], material.base_color[3]];

            rasterize_triangle(a, b, c, width, height, |index, z| {
                if z < depth[index] {
                    depth[index] = z;
                    color[index] = fragment;
                }
            });
        }

        downsample(&color, config.width, config.height, ss)
    }

    /// Flat Lambert + Blinn-Phong shading for one face
    fn shade(
        &self,
        material: &MaterialDescriptor,
        lights: &[LightSpec],
        point: Vector3<f32>,
        normal: Vector3<f32>,
        view: Vector3<f32>,
    ) -> [f32; 3] {
        let base = Vector3::from(material.rgb());
        let diffuse_color = base * (1.0 - material.metallic);
        let dielectric = Vector3::new(0.04, 0.04, 0.04);
        let specular_color = dielectric + (base - dielectric) * material.metallic;
        let inverse_roughness = 1.0 - material.roughness;
        let shininess = 2.0 + 126.0 * inverse_roughness * inverse_roughness;

        let mut out = base * self.ambient;
        for light in lights {
            let to_light = match light.kind {
                LightKind::Sun => -light.direction(),
                LightKind::Area => {
                    let offset = light.position - point;
                    if offset.magnitude2() > f32::EPSILON {
                        offset.normalize()
                    } else {
                        -light.direction()
                    }
                }
            };

            let n_dot_l = normal.dot(to_light);
            if n_dot_l <= 0.0 {
                continue;
            }

            let radiance = light.radiance();
            out += diffuse_color * (n_dot_l * radiance);

            let half = to_light + view;
            if half.magnitude2() > f32::EPSILON {
                let n_dot_h = normal.dot(half.normalize()).max(0.0);
                out += specular_color * (n_dot_h.powf(shininess) * radiance);
            }
        }

        [
            out.x.clamp(0.0, 1.0),
            out.y.clamp(0.0, 1.0),
            out.z.clamp(0.0, 1.0),
        ]
    }
}

impl Renderer for SoftwareRenderer {
    fn name(&self) -> &str {
        "software"
    }

    fn render(&mut self, request: &RenderRequest<'_>) -> Result<(), RenderError> {
        let image = self.rasterize(request)?;
        image
            .save_with_format(request.output, ImageFormat::Png)
            .map_err(|source| RenderError::Encode {
                path: request.output.to_path_buf(),
                source,
            })
    }
}

fn edge(a: ScreenVertex, b: ScreenVertex, px: f32, py: f32) -> f32 {
    (px - a.x) * (b.y - a.y) - (py - a.y) * (b.x - a.x)
}

/// Calls `write(pixel_index, depth)` for every covered pixel center, either winding
fn rasterize_triangle<F>(a: ScreenVertex, b: ScreenVertex, c: ScreenVertex, width: u32, height: u32, mut write: F)
where
    F: FnMut(usize, f32),
{
    let area = edge(a, b, c.x, c.y);
    if area.abs() <= f32::EPSILON {
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
    let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as u32).min(width);
    let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as u32).min(height);

    for y in min_y..max_y {
        let py = y as f32 + 0.5;
        for x in min_x..max_x {
            let px = x as f32 + 0.5;
            let w0 = edge(b, c, px, py) / area;
            let w1 = edge(c, a, px, py) / area;
            let w2 = edge(a, b, px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let z = w0 * a.z + w1 * b.z + w2 * c.z;
            if !(-1.0..=1.0).contains(&z) {
                continue;
            }
            write((y * width + x) as usize, z);
        }
    }
}

/// Box filter over `ss` x `ss` blocks, averaging in premultiplied alpha
fn downsample(samples: &[[f32; 4]], width: u32, height: u32, ss: u32) -> Result<RgbaImage, RenderError> {
    let sample_width = width * ss;
    let count = (ss * ss) as f32;
    let mut bytes = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height {
        for x in 0..width {
            let mut premultiplied = [0.0f32; 3];
            let mut alpha = 0.0f32;
            for sy in 0..ss {
                for sx in 0..ss {
                    let index = ((y * ss + sy) * sample_width + x * ss + sx) as usize;
                    let [r, g, b, a] = samples[index];
                    premultiplied[0] += r * a;
                    premultiplied[1] += g * a;
                    premultiplied[2] += b * a;
                    alpha += a;
                }
            }

            let rgb = if alpha > 0.0 {
                premultiplied.map(|c| c / alpha)
            } else {
                [0.0; 3]
            };
            bytes.extend(rgb.iter().map(|&c| to_byte(c)));
            bytes.push(to_byte(alpha / count));
        }
    }

    RgbaImage::from_raw(width, height, bytes)
        .ok_or_else(|| RenderError::Backend("pixel buffer does not match image size".to_string()))
}

fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraRig, LightRig};
    use crate::gfx::rendering::config::{QualityTier, RenderConfig};
    use crate::gfx::scene::{Assembly, CompositeEntity, SizeParams, Transform};
    use std::path::Path;

    fn cube() -> CompositeEntity {
        let mut a = Assembly::begin("Cube");
        a.add("Body", SizeParams::cube(2.0), Transform::default());
        a.bind_material(&MaterialDescriptor::new("Red", [0.8, 0.1, 0.1, 1.0], 0.0, 0.5));
        a.finish().unwrap()
    }

    fn render(entity: &CompositeEntity, config: &RenderConfig) -> RgbaImage {
        let camera = CameraRig::isometric(8.0);
        let lights = LightRig::three_point();
        let request = RenderRequest {
            entity,
            camera: &camera,
            lights: &lights,
            config,
            output: Path::new("unused.png"),
        };
        SoftwareRenderer::new().rasterize(&request).unwrap()
    }

    #[test]
    fn test_subject_covers_center_and_background_is_clear() {
        let config = RenderConfig::default().with_size(64, 64);
        let image = render(&cube(), &config);
        assert_eq!(image.dimensions(), (64, 64));
        assert_eq!(image.get_pixel(32, 32)[3], 255);
        assert_eq!(image.get_pixel(0, 0)[3], 0);
        // Red dominates on the lit faces
        let center = image.get_pixel(32, 32);
        assert!(center[0] > center[2]);
    }

    #[test]
    fn test_opaque_background() {
        let config = RenderConfig::default()
            .with_size(32, 32)
            .with_transparent_background(false);
        let image = render(&cube(), &config);
        assert_eq!(image.get_pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_output_is_deterministic() {
        let config = RenderConfig::default()
            .with_size(48, 48)
            .with_quality(QualityTier::Standard);
        let entity = cube();
        assert_eq!(render(&entity, &config), render(&entity, &config));
    }

    #[test]
    fn test_supersampling_keeps_output_size_and_softens_edges() {
        let config = RenderConfig::default()
            .with_size(40, 40)
            .with_quality(QualityTier::High);
        let image = render(&cube(), &config);
        assert_eq!(image.dimensions(), (40, 40));
        assert!(image.pixels().any(|p| p[3] > 0 && p[3] < 255));
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let entity = cube();
        let camera = CameraRig::default();
        let lights = LightRig::default();
        let config = RenderConfig::default().with_size(0, 0);
        let request = RenderRequest {
            entity: &entity,
            camera: &camera,
            lights: &lights,
            config: &config,
            output: Path::new("unused.png"),
        };
        assert!(matches!(
            SoftwareRenderer::new().rasterize(&request),
            Err(RenderError::InvalidConfig(_))
        ));
    }
}
