//! # Primitive Shape Generation
//!
//! This module contains functions to generate the primitive shapes parts are made of.
//! All shapes are generated with outward normals, centered at the origin, Z-up.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a cube with edge length `size` centered at the origin
///
/// Each face has its own four vertices so normals stay flat per face.
pub fn generate_cube(size: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let h = size * 0.5;

    let positions = [
        // Front face (+Y)
        [-h,  h, -h], [-h,  h,  h], [ h,  h,  h], [ h,  h, -h],
        // Back face (-Y)
        [-h, -h, -h], [ h, -h, -h], [ h, -h,  h], [-h, -h,  h],
        // Left face (-X)
        [-h, -h, -h], [-h, -h,  h], [-h,  h,  h], [-h,  h, -h],
        // Right face (+X)
        [ h, -h, -h], [ h,  h, -h], [ h,  h,  h], [ h, -h,  h],
        // Top face (+Z)
        [-h, -h,  h], [ h, -h,  h], [ h,  h,  h], [-h,  h,  h],
        // Bottom face (-Z)
        [-h, -h, -h], [-h,  h, -h], [ h,  h, -h], [ h, -h, -h],
    ];

    let face_normals = [
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];

    data.vertices = positions.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|n| std::iter::repeat(*n).take(4))
        .collect();

    // 2 triangles per face, counter-clockwise seen from outside
    for face in 0..6u32 {
        let base = face * 4;
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `segments` - Number of vertical segments (longitude lines)
/// * `rings` - Number of horizontal rings (latitude lines)
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = segments.max(3);
    let lat_segs = rings.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 (north pole) to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;

            let x = sin_theta * phi.cos();
            let y = sin_theta * phi.sin();
            let z = cos_theta;

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a plane in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[next_row, i + 1, next_row + 1]);
        }
    }

    data
}

/// Generate a capped cylinder along the Z axis
///
/// Extends from `-depth / 2` to `depth / 2`.
pub fn generate_cylinder(radius: f32, depth: f32, segments: u32) -> GeometryData {
    generate_cone(radius, radius, depth, segments)
}

/// Generate a (possibly truncated) cone along the Z axis
///
/// `bottom_radius` sits at `-depth / 2` and `top_radius` at `depth / 2`. A zero radius
/// collapses that end to a point and its cap is skipped.
pub fn generate_cone(bottom_radius: f32, top_radius: f32, depth: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_depth = depth * 0.5;

    // Side normal tilts towards the narrower end
    let slope = bottom_radius - top_radius;
    let side_len = (slope * slope + depth * depth).sqrt();
    let (radial, axial) = if side_len > f32::EPSILON {
        (depth / side_len, slope / side_len)
    } else {
        (1.0, 0.0)
    };

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        let normal = [cos_a * radial, sin_a * radial, axial];

        // Bottom vertex
        data.vertices.push([bottom_radius * cos_a, bottom_radius * sin_a, -half_depth]);
        data.normals.push(normal);

        // Top vertex
        data.vertices.push([top_radius * cos_a, top_radius * sin_a, half_depth]);
        data.normals.push(normal);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices.extend_from_slice(&[bottom_current, bottom_next, top_current]);
        data.indices.extend_from_slice(&[top_current, bottom_next, top_next]);
    }

    if bottom_radius != 0.0 {
        add_cap(&mut data, bottom_radius, -half_depth, segs, false);
    }
    if top_radius != 0.0 {
        add_cap(&mut data, top_radius, half_depth, segs, true);
    }

    data
}

fn add_cap(data: &mut GeometryData, radius: f32, z: f32, segs: u32, facing_up: bool) {
    let normal = if facing_up { [0.0, 0.0, 1.0] } else { [0.0, 0.0, -1.0] };

    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, 0.0, z]);
    data.normals.push(normal);

    // Caps get their own rim so their normals stay flat
    let rim = data.vertices.len() as u32;
    for i in 0..segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        data.vertices.push([radius * angle.cos(), radius * angle.sin(), z]);
        data.normals.push(normal);
    }

    for i in 0..segs {
        let current = rim + i;
        let next = rim + (i + 1) % segs;
        if facing_up {
            data.indices.extend_from_slice(&[center, current, next]);
        } else {
            data.indices.extend_from_slice(&[center, next, current]);
        }
    }
}

/// Generate a torus lying in the XY plane around the Z axis
///
/// # Arguments
/// * `major_radius` - Distance from the center to the middle of the tube
/// * `minor_radius` - Radius of the tube
/// * `major_segments` - Segments around the ring
/// * `minor_segments` - Segments around the tube
pub fn generate_torus(
    major_radius: f32,
    minor_radius: f32,
    major_segments: u32,
    minor_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let major_segs = major_segments.max(3);
    let minor_segs = minor_segments.max(3);

    for i in 0..=major_segs {
        let u = i as f32 * 2.0 * PI / major_segs as f32;
        let (sin_u, cos_u) = u.sin_cos();

        for j in 0..=minor_segs {
            let v = j as f32 * 2.0 * PI / minor_segs as f32;
            let (sin_v, cos_v) = v.sin_cos();

            let ring = major_radius + minor_radius * cos_v;
            data.vertices.push([ring * cos_u, ring * sin_u, minor_radius * sin_v]);
            data.normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);
        }
    }

    for i in 0..major_segs {
        for j in 0..minor_segs {
            let first = i * (minor_segs + 1) + j;
            let second = first + minor_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices.extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}
