use bytemuck::{Pod, Zeroable};
use std::f32::consts::TAU;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Donut shape: ring radius, tube radius, segments around the tube and around the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusShape {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u16,
    pub tubular_segments: u16,
}

impl Default for TorusShape {
    fn default() -> Self {
        Self {
            radius: 0.3,
            tube: 0.2,
            radial_segments: 20,
            tubular_segments: 45,
        }
    }
}

/// Indexed triangle list for a torus lying in the XY plane.
///
/// The seam vertices are duplicated so that each ring closes on itself.
pub(crate) fn torus_mesh(shape: TorusShape) -> (Vec<Vertex>, Vec<u16>) {
    let radial = shape.radial_segments.max(3) as u32;
    let tubular = shape.tubular_segments.max(3) as u32;
    let row = tubular + 1;

    let mut vertices = Vec::with_capacity(((radial + 1) * row) as usize);
    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let ring = shape.radius + shape.tube * v.cos();
            let position = [ring * u.cos(), ring * u.sin(), shape.tube * v.sin()];
            let center = [shape.radius * u.cos(), shape.radius * u.sin(), 0.0];
            let n = [
                position[0] - center[0],
                position[1] - center[1],
                position[2] - center[2],
            ];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt().max(f32::EPSILON);
            vertices.push(Vertex {
                position,
                normal: [n[0] / len, n[1] / len, n[2] / len],
            });
        }
    }

    let mut indices = Vec::with_capacity((radial * tubular * 6) as usize);
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            for index in [a, b, d, b, c, d] {
                indices.push(index as u16);
            }
        }
    }
    (vertices, indices)
}

/// Unit cube centered on the origin, used as the text block stand-in.
pub(crate) fn cube_mesh() -> (Vec<Vertex>, Vec<u16>) {
    let p = 0.5_f32;
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0],  [[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]]),
        ([0.0, 0.0, -1.0], [[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]]),
        ([1.0, 0.0, 0.0],  [[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]]),
        ([-1.0, 0.0, 0.0], [[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]]),
        ([0.0, 1.0, 0.0],  [[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]]),
        ([0.0, -1.0, 0.0], [[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u16;
        vertices.extend(corners.into_iter().map(|position| Vertex { position, normal }));
        indices.extend([0, 1, 2, 2, 3, 0].map(|k| base + k));
    }
    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_counts() {
        let (vertices, indices) = torus_mesh(TorusShape::default());
        assert_eq!(vertices.len(), 21 * 46);
        assert_eq!(indices.len(), 20 * 45 * 6);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn torus_stays_within_its_radii() {
        let shape = TorusShape::default();
        let (vertices, _) = torus_mesh(shape);
        for v in &vertices {
            let [x, y, z] = v.position;
            let ring = (x * x + y * y).sqrt();
            assert!(ring >= shape.radius - shape.tube - 1e-5);
            assert!(ring <= shape.radius + shape.tube + 1e-5);
            assert!(z.abs() <= shape.tube + 1e-5);
            let [nx, ny, nz] = v.normal;
            assert!(((nx * nx + ny * ny + nz * nz).sqrt() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cube_counts() {
        let (vertices, indices) = cube_mesh();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for v in &vertices {
            assert!(v.position.iter().all(|c| c.abs() == 0.5));
        }
    }
}
