//! Headless wgpu renderer
//!
//! Renders into an offscreen `Rgba8Unorm` texture with a depth buffer (multisampled for the
//! higher quality tiers), copies it into a staging buffer and writes the PNG from there.
//! No window or surface is involved.

use std::collections::HashMap;

use cgmath::Matrix4;
use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::gfx::camera::rig::OPENGL_TO_WGPU_MATRIX;
use crate::gfx::camera::{LightKind, LightRig};
use crate::gfx::resources::material::MaterialUniform;
use crate::gfx::scene::vertex::Vertex3D;

use super::renderer::{RenderRequest, Renderer};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MAX_LIGHTS: usize = 4;
const AMBIENT: f32 = 0.15;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
struct GpuLight {
    to_light: [f32; 4],
    position: [f32; 4],
}

/// Per-frame uniform block, mirrors `Frame` in sprite.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    eye: [f32; 4],
    params: [f32; 4],
    lights: [GpuLight; MAX_LIGHTS],
}

impl FrameUniform {
    fn new(view_proj: Matrix4<f32>, model: Matrix4<f32>, eye: [f32; 3], lights: &LightRig) -> Self {
        let mut packed = [GpuLight::default(); MAX_LIGHTS];
        for (slot, light) in packed.iter_mut().zip(lights.lights()) {
            let d = -light.direction();
            let p = light.position;
            let is_area = if light.kind == LightKind::Area { 1.0 } else { 0.0 };
            slot.to_light = [d.x, d.y, d.z, light.radiance()];
            slot.position = [p.x, p.y, p.z, is_area];
        }

        Self {
            view_proj: view_proj.into(),
            model: model.into(),
            eye: [eye[0], eye[1], eye[2], 1.0],
            params: [AMBIENT, lights.len().min(MAX_LIGHTS) as f32, 0.0, 0.0],
            lights: packed,
        }
    }
}

pub struct GpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_name: String,
    shader: wgpu::ShaderModule,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    // Keyed by sample count
    pipelines: HashMap<u32, wgpu::RenderPipeline>,
}

impl GpuRenderer {
    /// Creates a device on the default adapter, blocking until it is ready
    pub fn new() -> Result<Self, RenderError> {
        pollster::block_on(Self::new_async())
    }

    pub async fn new_async() -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RenderError::Backend(format!("no GPU adapter: {e}")))?;

        let adapter_name = adapter.get_info().name;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Sprite Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 8192,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RenderError::Backend(format!("failed to create device: {e}")))?;

        info!("GPU renderer using adapter '{}'", adapter_name);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sprite Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite.wgsl").into()),
        });

        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sprite Bind Group Layout"),
            entries: &[uniform_entry(0), uniform_entry(1)],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sprite Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        Ok(Self {
            device,
            queue,
            adapter_name,
            shader,
            bind_group_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
        })
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    fn pipeline(&mut self, sample_count: u32) -> &wgpu::RenderPipeline {
        let device = &self.device;
        let shader = &self.shader;
        let layout = &self.pipeline_layout;

        self.pipelines.entry(sample_count).or_insert_with(|| {
            debug!("Creating sprite pipeline with {sample_count}x MSAA");
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Sprite Pipeline"),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[Vertex3D::desc()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: COLOR_FORMAT,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        })
    }

    fn create_target(&self, label: &str, size: wgpu::Extent3d, samples: u32, format: wgpu::TextureFormat, usage: wgpu::TextureUsages) -> wgpu::Texture {
        self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: samples,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        })
    }

    /// Renders the request and reads the pixels back
    pub fn render_image(&mut self, request: &RenderRequest<'_>) -> Result<RgbaImage, RenderError> {
        let config = request.config;
        config.validate()?;

        let width = config.width;
        let height = config.height;
        let samples = config.quality.msaa_samples();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let (vertices, indices): (Vec<Vertex3D>, Vec<u32>) = request.entity.mesh().to_scene_format();
        if indices.is_empty() {
            return Err(RenderError::Backend(format!(
                "entity '{}' has no triangles",
                request.entity.name()
            )));
        }

        let camera = request.camera;
        let eye = camera.position;
        let frame = FrameUniform::new(
            OPENGL_TO_WGPU_MATRIX * camera.view_projection(config.aspect()),
            request.entity.model_matrix(),
            [eye.x, eye.y, eye.z],
            request.lights,
        );
        let material = MaterialUniform::from(request.entity.material());

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sprite Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let frame_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&frame),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let material_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniform Buffer"),
            contents: bytemuck::bytes_of(&material),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: material_buffer.as_entire_binding(),
                },
            ],
        });

        let resolved = self.create_target(
            "Sprite Color",
            size,
            1,
            COLOR_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        );
        let resolved_view = resolved.create_view(&wgpu::TextureViewDescriptor::default());
        let multisampled_view = (samples > 1).then(|| {
            self.create_target(
                "Sprite Color MSAA",
                size,
                samples,
                COLOR_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
            .create_view(&wgpu::TextureViewDescriptor::default())
        });
        let depth_view = self
            .create_target(
                "Sprite Depth",
                size,
                samples,
                DEPTH_FORMAT,
                wgpu::TextureUsages::RENDER_ATTACHMENT,
            )
            .create_view(&wgpu::TextureViewDescriptor::default());

        let clear = if config.transparent_background {
            wgpu::Color::TRANSPARENT
        } else {
            wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.05,
                a: 1.0,
            }
        };

        // Rows in the staging buffer must be 256-byte aligned
        let unpadded_row = width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_row = unpadded_row.div_ceil(align) * align;
        let staging = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sprite Staging Buffer"),
            size: (padded_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let index_count = indices.len() as u32;
        self.pipeline(samples);
        let pipeline = self
            .pipelines
            .get(&samples)
            .ok_or_else(|| RenderError::Backend("pipeline missing after creation".to_string()))?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sprite Encoder"),
            });

        {
            let (view, resolve_target) = match &multisampled_view {
                Some(msaa) => (msaa, Some(&resolved_view)),
                None => (&resolved_view, None),
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..index_count, 0, 0..1);
        }

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &resolved,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            size,
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device_idle(self.device.poll(wgpu::PollType::Wait))?;

        match futures::executor::block_on(rx) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(RenderError::Backend(format!("failed to map staging buffer: {e}"))),
            Err(_) => return Err(RenderError::Backend("staging buffer mapping was cancelled".to_string())),
        }

        let mut pixels = Vec::with_capacity((unpadded_row * height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks(padded_row as usize) {
                pixels.extend_from_slice(&row[..unpadded_row as usize]);
            }
        }
        staging.unmap();

        RgbaImage::from_raw(width, height, pixels)
            .ok_or_else(|| RenderError::Backend("read back buffer does not match image size".to_string()))
    }
}

impl Renderer for GpuRenderer {
    fn name(&self) -> &str {
        "gpu"
    }

    fn render(&mut self, request: &RenderRequest<'_>) -> Result<(), RenderError> {
        let image = self.render_image(request)?;
        image
            .save_with_format(request.output, ImageFormat::Png)
            .map_err(|source| RenderError::Encode {
                path: request.output.to_path_buf(),
                source,
            })
    }
}

/// Maps the outcome of a blocking device poll into the backend error type
fn device_idle(polled: Result<wgpu::PollStatus, wgpu::PollError>) -> Result<(), RenderError> {
    polled
        .map(|_| ())
        .map_err(|e| RenderError::Backend(format!("device poll failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_uniform_layout_matches_shader() {
        // 2 matrices + eye + params + 4 lights of 2 vec4 each
        assert_eq!(std::mem::size_of::<FrameUniform>(), 64 * 2 + 16 * 2 + 32 * 4);
    }

    #[test]
    fn test_poll_failure_is_reported() {
        assert!(device_idle(Ok(wgpu::PollStatus::WaitSucceeded)).is_ok());
        match device_idle(Err(wgpu::PollError::Timeout)) {
            Err(RenderError::Backend(message)) => assert!(message.starts_with("device poll failed")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_lights_beyond_four_are_dropped() {
        use crate::gfx::camera::LightSpec;
        use cgmath::{SquareMatrix, Vector3};

        let lights = LightRig::new(
            (0..6)
                .map(|i| LightSpec::sun(&format!("Sun{i}"), Vector3::new(45.0, 0.0, 0.0), 1.0))
                .collect(),
        );
        let frame = FrameUniform::new(Matrix4::identity(), Matrix4::identity(), [0.0; 3], &lights);
        assert_eq!(frame.params[1], 4.0);
    }
}
