//! Binary STL reader and writer.
//!
//! Layout of a binary STL buffer:
//!
//! ```text
//! offset 0   80 bytes   header (ignored)
//! offset 80   4 bytes   triangle count, u32 little-endian
//! offset 84  50 bytes   per triangle:
//!                         12  normal (3 × f32, ignored)
//!                         36  three vertices (9 × f32)
//!                          2  attribute byte count (ignored)
//! ```
//!
//! The length check runs here; record decoding and encoding go through
//! `stl_io`. [`analyze`] is a pure function of the input bytes. It never
//! retains the buffer and never performs I/O.
//!
//! A NaN or infinite coordinate is carried into the bounding box, the volume
//! and the area alike; none of them drops it. [`ModelAnalysis::is_finite`]
//! tells callers the result is unusable.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use super::analysis::{BoundingBox, Complexity, ModelAnalysis, Vec3};

/// Size of the free-form header that opens every binary STL.
pub const HEADER_LEN: usize = 80;
/// Header plus the triangle-count field.
pub const PREAMBLE_LEN: usize = HEADER_LEN + 4;
/// Size of one triangle record.
pub const RECORD_LEN: usize = 50;

/// Fraction of the bounding box assumed to be filled by material.
const BOX_FILL_FACTOR: f64 = 0.3;
const MM3_PER_CM3: f64 = 1000.0;
const MM2_PER_CM2: f64 = 100.0;

/// Three vertices, each `[x, y, z]`, exactly as stored in the file.
pub type Triangle = [[f32; 3]; 3];

/// How [`analyze_with`] turns the mesh into a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeMethod {
    /// `width × height × depth × 0.3`. A crude approximation that ignores the
    /// mesh shape; kept as the default so quotes stay comparable with the
    /// prices the shop has always shown.
    #[default]
    BoundingBoxFill,
    /// Sum of signed tetrahedra from the origin to each facet. Exact for
    /// closed, consistently wound meshes. Produces different (usually lower)
    /// volumes than [`VolumeMethod::BoundingBoxFill`].
    SignedTetrahedra,
}

/// Errors produced while reading a model buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, serde::Serialize)]
pub enum GeometryError {
    /// The buffer is not a well-formed binary STL.
    #[error("Invalid STL file format: {reason}")]
    Format { reason: String },
}

impl GeometryError {
    fn too_small(len: usize) -> Self {
        Self::Format {
            reason: format!("file too small ({len} bytes, need at least {PREAMBLE_LEN})"),
        }
    }

    fn records(e: std::io::Error) -> Self {
        Self::Format {
            reason: format!("unreadable triangle record: {e}"),
        }
    }

    fn size_mismatch(triangles: u32, expected: u64, actual: usize) -> Self {
        Self::Format {
            reason: format!(
                "size mismatch: header declares {triangles} triangles ({expected} bytes) but buffer is {actual} bytes"
            ),
        }
    }
}

/// Analyze a binary STL buffer using the default
/// [`VolumeMethod::BoundingBoxFill`] volume estimate.
///
/// # Errors
///
/// [`GeometryError::Format`] when the buffer is shorter than 84 bytes or its
/// length differs from `84 + 50 × triangle_count`.
pub fn analyze(buffer: &[u8]) -> Result<ModelAnalysis, GeometryError> {
    analyze_with(buffer, VolumeMethod::default())
}

/// Analyze a binary STL buffer with an explicit volume method.
pub fn analyze_with(buffer: &[u8], method: VolumeMethod) -> Result<ModelAnalysis, GeometryError> {
    let triangle_count = read_triangle_count(buffer)?;

    let mut bounds = Bounds::default();
    let mut area_mm2 = 0.0_f64;
    let mut signed_volume_mm3 = 0.0_f64;

    let mut blanked = buffer.to_vec();
    blanked[..HEADER_LEN].fill(0);
    let mut cursor = Cursor::new(blanked);
    let records = stl_io::create_stl_reader(&mut cursor)
        .map_err(GeometryError::records)?;
    for record in records {
        let [a, b, c] = widen(&record.map_err(GeometryError::records)?);
        bounds.include(a);
        bounds.include(b);
        bounds.include(c);
        area_mm2 += triangle_area(a, b, c);
        signed_volume_mm3 += dot(a, cross(b, c)) / 6.0;
    }

    let bounding_box = bounds.finish();
    let volume_cm3 = match method {
        VolumeMethod::BoundingBoxFill => {
            (bounding_box.width() * bounding_box.height() * bounding_box.depth())
                * BOX_FILL_FACTOR
                / MM3_PER_CM3
        }
        VolumeMethod::SignedTetrahedra => signed_volume_mm3.abs() / MM3_PER_CM3,
    };

    let analysis = ModelAnalysis {
        triangle_count,
        bounding_box,
        volume_cm3,
        surface_area_cm2: area_mm2 / MM2_PER_CM2,
        complexity: Complexity::from_triangle_count(triangle_count),
    };

    tracing::debug!(
        triangles = triangle_count,
        volume_cm3 = analysis.volume_cm3,
        surface_area_cm2 = analysis.surface_area_cm2,
        ?method,
        "analyzed binary STL"
    );

    Ok(analysis)
}

/// Encode `triangles` as a binary STL buffer.
///
/// The header is truncated or zero-padded to 80 bytes. Each facet normal is
/// recomputed from the winding; degenerate facets get a zero normal.
pub fn encode_binary(triangles: &[Triangle], header: &str) -> std::io::Result<Vec<u8>> {
    use stl_io::{Normal, Vertex};

    let facets: Vec<stl_io::Triangle> = triangles
        .iter()
        .map(|tri| stl_io::Triangle {
            normal: Normal::new(facet_normal(tri)),
            vertices: [Vertex::new(tri[0]), Vertex::new(tri[1]), Vertex::new(tri[2])],
        })
        .collect();

    let mut cursor = Cursor::new(Vec::with_capacity(
        PREAMBLE_LEN + triangles.len() * RECORD_LEN,
    ));
    stl_io::write_stl(&mut cursor, facets.iter())?;
    let mut out = cursor.into_inner();

    // write_stl leaves the header zeroed.
    let text = header.as_bytes();
    let len = text.len().min(HEADER_LEN);
    out[..len].copy_from_slice(&text[..len]);
    Ok(out)
}

/// Closed axis-aligned box from the origin to `(w, h, d)`: 12 facets wound
/// counter-clockwise when seen from outside.
pub fn box_triangles(w: f32, h: f32, d: f32) -> Vec<Triangle> {
    let p = |x: f32, y: f32, z: f32| [x, y, z];
    let (c000, c100, c010, c110) = (p(0., 0., 0.), p(w, 0., 0.), p(0., h, 0.), p(w, h, 0.));
    let (c001, c101, c011, c111) = (p(0., 0., d), p(w, 0., d), p(0., h, d), p(w, h, d));
    vec![
        // z = 0 (normal -z)
        [c000, c110, c100],
        [c000, c010, c110],
        // z = d (normal +z)
        [c001, c101, c111],
        [c001, c111, c011],
        // y = 0 (normal -y)
        [c000, c100, c101],
        [c000, c101, c001],
        // y = h (normal +y)
        [c010, c111, c110],
        [c010, c011, c111],
        // x = 0 (normal -x)
        [c000, c001, c011],
        [c000, c011, c010],
        // x = w (normal +x)
        [c100, c110, c111],
        [c100, c111, c101],
    ]
}

// ── Decoding helpers ──────────────────────────────────────────────────────────

fn read_triangle_count(buffer: &[u8]) -> Result<u32, GeometryError> {
    if buffer.len() < PREAMBLE_LEN {
        return Err(GeometryError::too_small(buffer.len()));
    }

    let mut count_bytes = [0u8; 4];
    count_bytes.copy_from_slice(&buffer[HEADER_LEN..PREAMBLE_LEN]);
    let count = u32::from_le_bytes(count_bytes);

    // u64 arithmetic: 50 × u32::MAX overflows usize on 32-bit targets.
    let expected = PREAMBLE_LEN as u64 + RECORD_LEN as u64 * u64::from(count);
    if buffer.len() as u64 != expected {
        return Err(GeometryError::size_mismatch(count, expected, buffer.len()));
    }

    Ok(count)
}

/// The three vertices of a decoded facet, widened to f64.
fn widen(facet: &stl_io::Triangle) -> [[f64; 3]; 3] {
    let vertex = |i: usize| {
        let v = &facet.vertices[i];
        [f64::from(v[0]), f64::from(v[1]), f64::from(v[2])]
    };
    [vertex(0), vertex(1), vertex(2)]
}

/// Running per-axis min/max; `None` until the first vertex arrives.
/// NaN is sticky, unlike `f64::min`/`f64::max` which drop it.
#[derive(Default)]
struct Bounds {
    extent: Option<([f64; 3], [f64; 3])>,
}

impl Bounds {
    fn include(&mut self, p: [f64; 3]) {
        match &mut self.extent {
            None => self.extent = Some((p, p)),
            Some((min, max)) => {
                for axis in 0..3 {
                    min[axis] = sticky_nan(min[axis], p[axis], f64::min);
                    max[axis] = sticky_nan(max[axis], p[axis], f64::max);
                }
            }
        }
    }

    /// An empty mesh yields an all-zero box.
    fn finish(self) -> BoundingBox {
        match self.extent {
            None => BoundingBox::default(),
            Some((min, max)) => BoundingBox {
                min: Vec3 {
                    x: min[0],
                    y: min[1],
                    z: min[2],
                },
                max: Vec3 {
                    x: max[0],
                    y: max[1],
                    z: max[2],
                },
            },
        }
    }
}

fn sticky_nan(acc: f64, v: f64, pick: fn(f64, f64) -> f64) -> f64 {
    if acc.is_nan() || v.is_nan() {
        f64::NAN
    } else {
        pick(acc, v)
    }
}

// ── Vector math ───────────────────────────────────────────────────────────────

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Half the magnitude of the cross product of the two edges leaving `a`.
fn triangle_area(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    let n = cross(sub(b, a), sub(c, a));
    dot(n, n).sqrt() / 2.0
}

fn facet_normal(tri: &Triangle) -> [f32; 3] {
    let widen = |v: [f32; 3]| [f64::from(v[0]), f64::from(v[1]), f64::from(v[2])];
    let (a, b, c) = (widen(tri[0]), widen(tri[1]), widen(tri[2]));
    let n = cross(sub(b, a), sub(c, a));
    let len = dot(n, n).sqrt();
    if len <= f64::EPSILON {
        return [0.0; 3];
    }
    [(n[0] / len) as f32, (n[1] / len) as f32, (n[2] / len) as f32]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mesh_is_all_zero_and_simple() {
        let buf = encode_binary(&[], "empty").expect("encode");
        assert_eq!(buf.len(), PREAMBLE_LEN);
        let m = analyze(&buf).expect("zero-triangle STL is valid");
        assert_eq!(m.triangle_count, 0);
        assert_eq!(m.bounding_box, BoundingBox::default());
        assert_eq!(m.volume_cm3, 0.0);
        assert_eq!(m.surface_area_cm2, 0.0);
        assert_eq!(m.complexity, Complexity::Simple);
    }

    #[test]
    fn buffer_shorter_than_preamble_is_format_error() {
        for len in [0usize, 1, 80, 83] {
            let result = analyze(&vec![0u8; len]);
            assert!(
                matches!(result, Err(GeometryError::Format { .. })),
                "len {len} should be rejected"
            );
        }
    }

    #[test]
    fn declared_count_must_match_length() {
        let mut buf = encode_binary(&box_triangles(1.0, 1.0, 1.0), "box").expect("encode");
        buf.push(0);
        assert!(matches!(analyze(&buf), Err(GeometryError::Format { .. })));

        let mut buf = encode_binary(&box_triangles(1.0, 1.0, 1.0), "box").expect("encode");
        buf.truncate(buf.len() - 1);
        assert!(matches!(analyze(&buf), Err(GeometryError::Format { .. })));

        let mut buf = encode_binary(&[], "lying").expect("encode");
        buf[HEADER_LEN..PREAMBLE_LEN].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(analyze(&buf), Err(GeometryError::Format { .. })));
    }

    #[test]
    fn huge_declared_count_does_not_overflow() {
        let mut buf = vec![0u8; PREAMBLE_LEN];
        buf[HEADER_LEN..PREAMBLE_LEN].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(analyze(&buf), Err(GeometryError::Format { .. })));
    }

    #[test]
    fn box_bounds_area_and_fill_volume() {
        let buf = encode_binary(&box_triangles(20.0, 10.0, 5.0), "box").expect("encode");
        let m = analyze(&buf).expect("valid box");
        assert_eq!(m.triangle_count, 12);
        assert_eq!(m.bounding_box.min, Vec3::zero());
        assert_eq!(m.bounding_box.width(), 20.0);
        assert_eq!(m.bounding_box.height(), 10.0);
        assert_eq!(m.bounding_box.depth(), 5.0);
        // 20×10×5 = 1000 mm³ × 0.3 / 1000 = 0.3 cm³
        assert!((m.volume_cm3 - 0.3).abs() < 1e-12);
        // 2(200 + 100 + 50) = 700 mm² = 7 cm²
        assert!((m.surface_area_cm2 - 7.0).abs() < 1e-9);
    }

    #[test]
    fn signed_tetrahedra_gives_true_box_volume() {
        let buf = encode_binary(&box_triangles(20.0, 10.0, 5.0), "box").expect("encode");
        let m = analyze_with(&buf, VolumeMethod::SignedTetrahedra).expect("valid box");
        // 1000 mm³ = 1 cm³
        assert!((m.volume_cm3 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn header_and_normal_bytes_are_ignored() {
        let mut buf = encode_binary(&box_triangles(2.0, 2.0, 2.0), "box").expect("encode");
        let reference = analyze(&buf).expect("valid");
        buf[..HEADER_LEN].fill(0xAB);
        // Scribble over the first record's normal and attribute bytes.
        buf[PREAMBLE_LEN..PREAMBLE_LEN + 12].fill(0xFF);
        buf[PREAMBLE_LEN + 48..PREAMBLE_LEN + 50].fill(0xFF);
        assert_eq!(analyze(&buf).expect("still valid"), reference);
    }

    #[test]
    fn solid_prefixed_header_is_still_binary() {
        let buf = encode_binary(&box_triangles(3.0, 2.0, 1.0), "solid exported_part").expect("encode");
        let m = analyze(&buf).expect("binary STL whatever the header says");
        assert_eq!(m.triangle_count, 12);
        assert_eq!(m.bounding_box.width(), 3.0);
    }

    #[test]
    fn nan_vertex_poisons_every_measure() {
        let tri: Triangle = [[f32::NAN, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 10.0, 5.0]];
        let buf = encode_binary(&[tri], "nan").expect("encode");
        let m = analyze(&buf).expect("length is valid");
        assert!(m.bounding_box.min.x.is_nan());
        assert!(m.volume_cm3.is_nan());
        assert!(m.surface_area_cm2.is_nan());
        assert!(!m.is_finite());

        // Order of the bad vertex does not matter.
        let tri: Triangle = [[10.0, 0.0, 0.0], [0.0, 10.0, 5.0], [f32::NAN, 0.0, 0.0]];
        let m = analyze(&encode_binary(&[tri], "nan").expect("encode")).expect("valid");
        assert!(m.bounding_box.min.x.is_nan());
        assert!(m.bounding_box.max.x.is_nan());
        assert!(m.volume_cm3.is_nan());
    }

    #[test]
    fn infinite_vertex_is_not_finite() {
        let tri: Triangle = [[f32::INFINITY, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 1.0]];
        let m = analyze(&encode_binary(&[tri], "inf").expect("encode")).expect("valid");
        assert!(!m.is_finite());
    }

    #[test]
    fn encoded_layout_matches_binary_stl() {
        let tri: Triangle = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let buf = encode_binary(&[tri], "Binary STL from SanelQuote").expect("encode");
        assert_eq!(buf.len(), PREAMBLE_LEN + RECORD_LEN);
        assert!(buf.starts_with(b"Binary STL from SanelQuote"));
        assert_eq!(&buf[HEADER_LEN..PREAMBLE_LEN], &1u32.to_le_bytes());
        // Normal of a CCW triangle in the XY plane is +Z.
        let nz = f32::from_le_bytes(buf[PREAMBLE_LEN + 8..PREAMBLE_LEN + 12].try_into().unwrap());
        assert_eq!(nz, 1.0);
    }

    #[test]
    fn long_header_is_truncated() {
        let header = "x".repeat(200);
        let buf = encode_binary(&[], &header).expect("encode");
        assert_eq!(buf.len(), PREAMBLE_LEN);
    }

    #[test]
    fn geometry_error_display() {
        let e = GeometryError::too_small(10);
        assert!(e.to_string().starts_with("Invalid STL file format: file too small"));
    }

    #[test]
    fn geometry_error_serializes() {
        let e = GeometryError::Format {
            reason: "bad".into(),
        };
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["Format"]["reason"], "bad");
    }

    #[test]
    fn volume_method_defaults_to_bounding_box_fill() {
        assert_eq!(VolumeMethod::default(), VolumeMethod::BoundingBoxFill);
        let v: VolumeMethod = serde_json::from_str(r#""signed_tetrahedra""#).unwrap();
        assert_eq!(v, VolumeMethod::SignedTetrahedra);
    }
}
