//! # Primitive Shape Generation
//!
//! Flat-shaded platonic solids, a box and a line grid. Solids are emitted
//! unindexed per face (three vertices per triangle) so every vertex carries
//! its face normal.

use cgmath::{InnerSpace, Vector3};

use super::{GeometryData, LineData};

/// Golden ratio
const PHI: f32 = 1.618_034;

/// Builds flat-shaded geometry from corner positions and triangles
///
/// Each triangle is wound counter-clockwise when seen from outside the solid;
/// triangles whose normal points towards the origin are flipped. Only valid
/// for solids that are convex around the origin.
pub fn flat_shaded(corners: &[[f32; 3]], triangles: &[[u32; 3]]) -> GeometryData {
    let mut data = GeometryData::new();

    for tri in triangles {
        let a = Vector3::from(corners[tri[0] as usize]);
        let mut b = Vector3::from(corners[tri[1] as usize]);
        let mut c = Vector3::from(corners[tri[2] as usize]);

        let mut normal = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        if normal.dot(centroid) < 0.0 {
            std::mem::swap(&mut b, &mut c);
            normal = -normal;
        }
        let normal: [f32; 3] = normal.normalize().into();

        for position in [a, b, c] {
            data.indices.push(data.vertices.len() as u32);
            data.vertices.push(position.into());
            data.normals.push(normal);
        }
    }

    data
}

/// Projects corners onto a sphere of the given radius, then flat-shades them
fn polyhedron(corners: &[[f32; 3]], triangles: &[[u32; 3]], radius: f32) -> GeometryData {
    let projected: Vec<[f32; 3]> = corners
        .iter()
        .map(|&corner| (Vector3::from(corner).normalize() * radius).into())
        .collect();
    flat_shaded(&projected, triangles)
}

/// Regular tetrahedron inscribed in a sphere of `radius`
pub fn tetrahedron(radius: f32) -> GeometryData {
    let corners = [
        [1.0, 1.0, 1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [1.0, -1.0, -1.0],
    ];
    let triangles = [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]];
    polyhedron(&corners, &triangles, radius)
}

/// Regular octahedron inscribed in a sphere of `radius`
pub fn octahedron(radius: f32) -> GeometryData {
    let corners = [
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
    ];
    let triangles = [
        [0, 2, 4],
        [0, 4, 3],
        [0, 3, 5],
        [0, 5, 2],
        [1, 2, 5],
        [1, 5, 3],
        [1, 3, 4],
        [1, 4, 2],
    ];
    polyhedron(&corners, &triangles, radius)
}

/// Regular icosahedron inscribed in a sphere of `radius`
pub fn icosahedron(radius: f32) -> GeometryData {
    let t = PHI;
    let corners = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ];
    let triangles = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    polyhedron(&corners, &triangles, radius)
}

/// Regular dodecahedron inscribed in a sphere of `radius`
///
/// Each pentagonal face is split into three triangles.
pub fn dodecahedron(radius: f32) -> GeometryData {
    let t = PHI;
    let r = 1.0 / PHI;
    let corners = [
        // (±1, ±1, ±1)
        [-1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0],
        [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, -1.0],
        [1.0, 1.0, 1.0],
        // (0, ±1/φ, ±φ)
        [0.0, -r, -t],
        [0.0, -r, t],
        [0.0, r, -t],
        [0.0, r, t],
        // (±1/φ, ±φ, 0)
        [-r, -t, 0.0],
        [-r, t, 0.0],
        [r, -t, 0.0],
        [r, t, 0.0],
        // (±φ, 0, ±1/φ)
        [-t, 0.0, -r],
        [t, 0.0, -r],
        [-t, 0.0, r],
        [t, 0.0, r],
    ];
    let triangles = [
        [3, 11, 7],
        [3, 7, 15],
        [3, 15, 13],
        [7, 19, 17],
        [7, 17, 6],
        [7, 6, 15],
        [17, 4, 8],
        [17, 8, 10],
        [17, 10, 6],
        [8, 0, 16],
        [8, 16, 2],
        [8, 2, 10],
        [0, 12, 1],
        [0, 1, 18],
        [0, 18, 16],
        [6, 10, 2],
        [6, 2, 13],
        [6, 13, 15],
        [2, 16, 18],
        [2, 18, 3],
        [2, 3, 13],
        [18, 1, 9],
        [18, 9, 11],
        [18, 11, 3],
        [4, 14, 12],
        [4, 12, 0],
        [4, 0, 8],
        [11, 9, 5],
        [11, 5, 19],
        [11, 19, 7],
        [19, 5, 14],
        [19, 14, 4],
        [19, 4, 17],
        [1, 12, 14],
        [1, 14, 5],
        [1, 5, 9],
    ];
    polyhedron(&corners, &triangles, radius)
}

/// Axis-aligned box centered at the origin
pub fn cuboid(width: f32, height: f32, depth: f32) -> GeometryData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    let corners = [
        [-x, -y, -z],
        [x, -y, -z],
        [x, y, -z],
        [-x, y, -z],
        [-x, -y, z],
        [x, -y, z],
        [x, y, z],
        [-x, y, z],
    ];
    let triangles = [
        // Front (+Z)
        [4, 5, 6],
        [6, 7, 4],
        // Back (-Z)
        [1, 0, 3],
        [3, 2, 1],
        // Left (-X)
        [0, 4, 7],
        [7, 3, 0],
        // Right (+X)
        [5, 1, 2],
        [2, 6, 5],
        // Top (+Y)
        [7, 6, 2],
        [2, 3, 7],
        // Bottom (-Y)
        [0, 1, 5],
        [5, 4, 0],
    ];
    flat_shaded(&corners, &triangles)
}

/// Square line grid in the XZ plane, centered at the origin
///
/// Produces `divisions + 1` lines along each axis.
pub fn grid(size: f32, divisions: u32) -> LineData {
    let divisions = divisions.max(1);
    let half = size * 0.5;
    let step = size / divisions as f32;
    let mut lines = LineData::new();

    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        lines.push_segment([-half, 0.0, k], [half, 0.0, k]);
        lines.push_segment([k, 0.0, -half], [k, 0.0, half]);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(geometry: &GeometryData) {
        for (i, tri) in geometry.triangles().enumerate() {
            let [a, b, c] = tri.map(Vector3::<f32>::from);
            let winding = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(winding.dot(centroid) > 0.0, "triangle {} winds inward", i);

            let normal = Vector3::from(geometry.normals[i * 3]);
            assert!((normal.magnitude() - 1.0).abs() < 1e-5);
            assert!(normal.dot(centroid) > 0.0, "triangle {} normal points inward", i);
        }
    }

    #[test]
    fn test_tetrahedron_generation() {
        let tetra = tetrahedron(1.0);
        assert_eq!(tetra.triangle_count(), 4);
        assert_eq!(tetra.vertex_count(), 12);
        assert_outward(&tetra);
    }

    #[test]
    fn test_octahedron_generation() {
        let octa = octahedron(1.0);
        assert_eq!(octa.triangle_count(), 8);
        assert_outward(&octa);
    }

    #[test]
    fn test_icosahedron_generation() {
        let ico = icosahedron(1.0);
        assert_eq!(ico.triangle_count(), 20);
        assert_outward(&ico);
    }

    #[test]
    fn test_dodecahedron_generation() {
        let dodeca = dodecahedron(1.0);
        assert_eq!(dodeca.triangle_count(), 36);
        assert_eq!(dodeca.vertex_count(), 108);
        assert_outward(&dodeca);
    }

    #[test]
    fn test_polyhedra_lie_on_sphere() {
        for solid in [tetrahedron(2.0), octahedron(2.0), icosahedron(2.0), dodecahedron(2.0)] {
            for vertex in &solid.vertices {
                let length = Vector3::from(*vertex).magnitude();
                assert!((length - 2.0).abs() < 1e-4, "vertex at radius {}", length);
            }
        }
    }

    #[test]
    fn test_cuboid_generation() {
        let cube = cuboid(1.0, 1.0, 1.0);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.vertex_count(), 36);
        assert_outward(&cube);
        for vertex in &cube.vertices {
            assert!(vertex.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn test_grid_generation() {
        let lines = grid(100.0, 100);
        assert_eq!(lines.segment_count(), 202);
        assert_eq!(lines.positions[0], [-50.0, 0.0, -50.0]);
        assert_eq!(lines.positions[1], [50.0, 0.0, -50.0]);
        assert!(lines.positions.iter().all(|p| p[1] == 0.0));
    }
}
