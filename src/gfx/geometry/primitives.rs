//! # Primitive Shape Generation
//!
//! The viewer shows a unit cube when a product has no usable model.

use super::GeometryData;

/// Generate a unit cube centered at the origin
///
/// Vertices span -0.5 to 0.5 on all axes. Each face has its own four
/// vertices so normals stay flat.
pub fn generate_cube() -> GeometryData {
    // (outward normal, tangent u, tangent v) per face
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];
    let corners = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];

    let mut data = GeometryData::new();

    for (normal, u, v) in faces {
        // u x v == normal, so corners are counter-clockwise seen from outside
        let base = data.vertices.len() as u32;
        for (cu, cv) in corners {
            data.vertices.push([
                normal[0] * 0.5 + u[0] * cu + v[0] * cv,
                normal[1] * 0.5 + u[1] * cu + v[1] * cv,
                normal[2] * 0.5 + u[2] * cu + v[2] * cv,
            ]);
            data.normals.push(normal);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let cube = generate_cube();
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| cube.vertices[i as usize]);
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let cross = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let n = cube.normals[tri[0] as usize];
            assert!(cross[0] * n[0] + cross[1] * n[1] + cross[2] * n[2] > 0.0);
        }
    }

    #[test]
    fn test_cube_is_unit_and_centered() {
        let cube = generate_cube();
        for axis in 0..3 {
            let min = cube.vertices.iter().map(|v| v[axis]).fold(f32::MAX, f32::min);
            let max = cube.vertices.iter().map(|v| v[axis]).fold(f32::MIN, f32::max);
            assert_eq!(min, -0.5);
            assert_eq!(max, 0.5);
        }
    }
}
