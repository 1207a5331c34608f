//! Outline extraction for flat-shaded solids
//!
//! An edge is kept when it borders a single triangle, or when the two
//! triangles sharing it meet at more than the threshold angle. Coplanar
//! triangulation edges (the diagonals inside a cube face or a pentagon) are
//! dropped.

use std::collections::HashMap;

use cgmath::{Deg, InnerSpace, Rad, Vector3};

use super::{GeometryData, LineData};

/// Positions closer than this are treated as the same vertex
const WELD_PRECISION: f32 = 1e4;

type VertexKey = [i64; 3];

struct EdgeRecord {
    a: [f32; 3],
    b: [f32; 3],
    normal: Vector3<f32>,
    faces: u32,
    creased: bool,
}

fn vertex_key(position: [f32; 3]) -> VertexKey {
    position.map(|c| (c * WELD_PRECISION).round() as i64)
}

/// Extracts the visible edges of `geometry` as line segments
pub fn edges(geometry: &GeometryData, threshold: Deg<f32>) -> LineData {
    let threshold_dot = Rad::from(threshold).0.cos();

    let mut records: Vec<EdgeRecord> = Vec::new();
    let mut lookup: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();

    for tri in geometry.triangles() {
        let [a, b, c] = tri.map(Vector3::<f32>::from);
        let face_normal = (b - a).cross(c - a);
        if face_normal.magnitude2() == 0.0 {
            continue;
        }
        let face_normal = face_normal.normalize();

        for (p, q) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let (kp, kq) = (vertex_key(p), vertex_key(q));
            let key = if kp <= kq { (kp, kq) } else { (kq, kp) };

            match lookup.get(&key) {
                Some(&index) => {
                    let record = &mut records[index];
                    record.faces += 1;
                    if record.normal.dot(face_normal) <= threshold_dot {
                        record.creased = true;
                    }
                }
                None => {
                    lookup.insert(key, records.len());
                    records.push(EdgeRecord {
                        a: p,
                        b: q,
                        normal: face_normal,
                        faces: 1,
                        creased: false,
                    });
                }
            }
        }
    }

    let mut lines = LineData::new();
    for record in records.iter().filter(|r| r.faces == 1 || r.creased) {
        lines.push_segment(record.a, record.b);
    }
    lines
}
