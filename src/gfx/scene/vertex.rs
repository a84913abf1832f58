//! # Vertex Data Structures
//!
//! GPU-compatible interleaved vertex format used when uploading composite meshes.

/// A 3D vertex with position and normal data.
///
/// `#[repr(C)]` keeps the layout stable for GPU buffer uploads.
///
/// ```
/// use sprite_forge::gfx::scene::vertex::Vertex3D;
///
/// let vertex = Vertex3D {
///     position: [0.0, 0.0, 1.0],
///     normal: [0.0, 0.0, 1.0],
/// };
/// assert_eq!(bytemuck::bytes_of(&vertex).len(), 24);
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3D {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz] for lighting calculations
    pub normal: [f32; 3],
}

#[cfg(feature = "gpu")]
impl Vertex3D {
    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3) at shader location 0
    /// - Attribute 1: Normal (Float32x3) at shader location 1
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex3D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::gfx::geometry::generate_plane;

    #[test]
    fn test_scene_format_interleaves_normals() {
        let (vertices, indices) = generate_plane(1.0, 1.0, 1, 1).to_scene_format();
        assert_eq!(vertices.len(), 4);
        assert_eq!(indices.len(), 6);
        assert!(vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
