//! Procedural and imported mesh geometry.
//!
//! Geometry lives on the CPU as an indexed triangle list. Vertices are `Pod`
//! so a renderer can upload [`Geometry::vertex_bytes`] directly into a vertex
//! buffer. The procedural generators follow the parameter order and defaults of
//! the three.js constructors that entity descriptors are written against.

use std::{f32::consts::PI, str::FromStr};

use cgmath::InnerSpace;

use crate::{
    data_structures::value::{Value, numbers},
    error::SceneError,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryKind {
    Sphere,
    Box,
    Plane,
    Cylinder,
    Ring,
    Torus,
    /// Loaded from a glTF or OBJ file.
    Imported,
}

impl FromStr for GeometryKind {
    type Err = SceneError;

    /// Accepts `Sphere`, `SphereGeometry` and `SphereBufferGeometry` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let base = s
            .strip_suffix("BufferGeometry")
            .or_else(|| s.strip_suffix("Geometry"))
            .unwrap_or(s);
        match base {
            "Sphere" => Ok(Self::Sphere),
            "Box" => Ok(Self::Box),
            "Plane" => Ok(Self::Plane),
            "Cylinder" => Ok(Self::Cylinder),
            "Ring" => Ok(Self::Ring),
            "Torus" => Ok(Self::Torus),
            _ => Err(SceneError::UnknownGeometry(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Positional argument `idx`, or `default` when absent.
fn arg(args: &[f32], idx: usize, default: f32) -> f32 {
    args.get(idx).copied().unwrap_or(default)
}

/// Upper bound for any segment count, keeping vertex indices within `u32`.
pub const MAX_SEGMENTS: u32 = 1024;

fn segments(args: &[f32], idx: usize, default: u32, min: u32) -> u32 {
    (arg(args, idx, default as f32).floor().max(0.0) as u32).clamp(min, MAX_SEGMENTS)
}

impl Geometry {
    /// Builds geometry of `kind` from the constructor arguments of the descriptor.
    pub fn build(kind: &str, args: &[Value]) -> Result<Self, SceneError> {
        let kind: GeometryKind = kind.parse()?;
        let args = numbers(args)
            .ok_or_else(|| SceneError::invalid_arguments(&format!("{kind:?}"), "expected numbers"))?;
        let geometry = match kind {
            GeometryKind::Sphere => Self::sphere(
                arg(&args, 0, 1.0),
                segments(&args, 1, 32, 3),
                segments(&args, 2, 16, 2),
            ),
            GeometryKind::Box => Self::cuboid(arg(&args, 0, 1.0), arg(&args, 1, 1.0), arg(&args, 2, 1.0)),
            GeometryKind::Plane => Self::plane(arg(&args, 0, 1.0), arg(&args, 1, 1.0)),
            GeometryKind::Cylinder => Self::cylinder(
                arg(&args, 0, 1.0),
                arg(&args, 1, 1.0),
                arg(&args, 2, 1.0),
                segments(&args, 3, 32, 3),
            ),
            GeometryKind::Ring => {
                Self::ring(arg(&args, 0, 0.5), arg(&args, 1, 1.0), segments(&args, 2, 32, 3))
            }
            GeometryKind::Torus => Self::torus(
                arg(&args, 0, 1.0),
                arg(&args, 1, 0.4),
                segments(&args, 2, 12, 2),
                segments(&args, 3, 48, 3),
            ),
            GeometryKind::Imported => return Err(SceneError::UnknownGeometry(format!("{kind:?}"))),
        };
        Ok(geometry)
    }

    pub fn from_parts(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            kind: GeometryKind::Imported,
            vertices,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let mut vertices = Vec::with_capacity((width_segments as usize + 1) * (height_segments as usize + 1));
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let direction = cgmath::Vector3::new(
                    -(u * 2.0 * PI).cos() * (v * PI).sin(),
                    (v * PI).cos(),
                    (u * 2.0 * PI).sin() * (v * PI).sin(),
                );
                vertices.push(Vertex {
                    position: (direction * radius).into(),
                    normal: direction.into(),
                    tex_coords: [u, 1.0 - v],
                });
            }
        }

        let row = width_segments + 1;
        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;
                // the poles collapse to a point, so only one triangle per quad there
                if iy != 0 {
                    indices.extend([a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend([b, c, d]);
                }
            }
        }

        Self {
            kind: GeometryKind::Sphere,
            vertices,
            indices,
        }
    }

    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = cgmath::Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        // (normal, u axis, v axis) with u x v == normal
        let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        for (normal, u, v) in faces {
            let n = cgmath::Vector3::from(normal);
            let u = cgmath::Vector3::from(u);
            let v = cgmath::Vector3::from(v);
            let base = vertices.len() as u32;
            for (su, sv, uv) in [
                (-1.0, -1.0, [0.0, 0.0]),
                (1.0, -1.0, [1.0, 0.0]),
                (1.0, 1.0, [1.0, 1.0]),
                (-1.0, 1.0, [0.0, 1.0]),
            ] {
                let corner = n + u * su + v * sv;
                vertices.push(Vertex {
                    position: [corner.x * half.x, corner.y * half.y, corner.z * half.z],
                    normal,
                    tex_coords: uv,
                });
            }
            indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self {
            kind: GeometryKind::Box,
            vertices,
            indices,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let normal = [0.0, 0.0, 1.0];
        let vertices = vec![
            Vertex { position: [-hw, -hh, 0.0], normal, tex_coords: [0.0, 0.0] },
            Vertex { position: [hw, -hh, 0.0], normal, tex_coords: [1.0, 0.0] },
            Vertex { position: [hw, hh, 0.0], normal, tex_coords: [1.0, 1.0] },
            Vertex { position: [-hw, hh, 0.0], normal, tex_coords: [0.0, 1.0] },
        ];
        Self {
            kind: GeometryKind::Plane,
            vertices,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let half = height / 2.0;
        let slope = if height == 0.0 { 0.0 } else { (radius_bottom - radius_top) / height };

        for (row, radius) in [radius_top, radius_bottom].into_iter().enumerate() {
            let y = half - row as f32 * height;
            for x in 0..=radial_segments {
                let u = x as f32 / radial_segments as f32;
                let theta = u * 2.0 * PI;
                let normal = cgmath::Vector3::new(theta.sin(), slope, theta.cos()).normalize();
                vertices.push(Vertex {
                    position: [radius * theta.sin(), y, radius * theta.cos()],
                    normal: normal.into(),
                    tex_coords: [u, 1.0 - row as f32],
                });
            }
        }
        let row = radial_segments + 1;
        for x in 0..radial_segments {
            let (a, b, c, d) = (x, row + x, row + x + 1, x + 1);
            indices.extend([a, b, d, b, c, d]);
        }

        for (top, radius) in [(true, radius_top), (false, radius_bottom)] {
            if radius <= 0.0 {
                continue;
            }
            let (y, ny) = if top { (half, 1.0) } else { (-half, -1.0) };
            let center = vertices.len() as u32;
            vertices.push(Vertex {
                position: [0.0, y, 0.0],
                normal: [0.0, ny, 0.0],
                tex_coords: [0.5, 0.5],
            });
            for x in 0..=radial_segments {
                let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
                vertices.push(Vertex {
                    position: [radius * theta.sin(), y, radius * theta.cos()],
                    normal: [0.0, ny, 0.0],
                    tex_coords: [theta.cos() * 0.5 + 0.5, theta.sin() * 0.5 * ny + 0.5],
                });
            }
            for x in 0..radial_segments {
                let (i, j) = (center + 1 + x, center + 2 + x);
                if top {
                    indices.extend([i, j, center]);
                } else {
                    indices.extend([j, i, center]);
                }
            }
        }

        Self {
            kind: GeometryKind::Cylinder,
            vertices,
            indices,
        }
    }

    /// Flat annulus in the XY plane, e.g. planetary rings.
    pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> Self {
        let mut vertices = Vec::with_capacity((theta_segments as usize + 1) * 2);
        for radius in [inner_radius, outer_radius] {
            for i in 0..=theta_segments {
                let theta = i as f32 / theta_segments as f32 * 2.0 * PI;
                let (x, y) = (radius * theta.cos(), radius * theta.sin());
                let span = if outer_radius == 0.0 { 1.0 } else { outer_radius };
                vertices.push(Vertex {
                    position: [x, y, 0.0],
                    normal: [0.0, 0.0, 1.0],
                    tex_coords: [(x / span + 1.0) / 2.0, (y / span + 1.0) / 2.0],
                });
            }
        }
        let row = theta_segments + 1;
        let mut indices = Vec::with_capacity(theta_segments as usize * 6);
        for i in 0..theta_segments {
            let (a, b, c, d) = (i, i + row, i + row + 1, i + 1);
            indices.extend([a, b, d, b, c, d]);
        }
        Self {
            kind: GeometryKind::Ring,
            vertices,
            indices,
        }
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        let mut vertices = Vec::new();
        for j in 0..=radial_segments {
            for i in 0..=tubular_segments {
                let u = i as f32 / tubular_segments as f32 * 2.0 * PI;
                let v = j as f32 / radial_segments as f32 * 2.0 * PI;
                let position = cgmath::Vector3::new(
                    (radius + tube * v.cos()) * u.cos(),
                    (radius + tube * v.cos()) * u.sin(),
                    tube * v.sin(),
                );
                let center = cgmath::Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
                let normal = position - center;
                let normal = if normal.magnitude2() == 0.0 { normal } else { normal.normalize() };
                vertices.push(Vertex {
                    position: position.into(),
                    normal: normal.into(),
                    tex_coords: [
                        i as f32 / tubular_segments as f32,
                        j as f32 / radial_segments as f32,
                    ],
                });
            }
        }
        let row = tubular_segments + 1;
        let mut indices = Vec::new();
        for j in 1..=radial_segments {
            for i in 1..=tubular_segments {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;
                indices.extend([a, b, d, b, c, d]);
            }
        }
        Self {
            kind: GeometryKind::Torus,
            vertices,
            indices,
        }
    }
}
