//! Geometry metrics and mappings for hexahedral cells.
//!
//! The reference hexahedron uses the vertex ordering
//! `[v0, v1, v2, v3, v4, v5, v6, v7]` with `(r, s, t)` in `[0, 1]^3`:
//! `v0..v3` walk the bottom face (`t = 0`) counter-clockwise starting at the
//! origin, `v4..v7` are the matching top-face vertices (`t = 1`).

use crate::shape_error::ShapeError;

/// Eight corner points of a hexahedral cell in reference ordering.
pub type HexVertices = [[f64; 3]; 8];

const EPS: f64 = 1e-12;

/// Signed volume of a hexahedron by five-tetrahedron decomposition.
///
/// Exact for cells with planar faces; positive for the reference ordering.
pub fn hex_volume(vertices: &HexVertices) -> f64 {
    signed_volume(vertices[0], vertices[1], vertices[3], vertices[4])
        + signed_volume(vertices[1], vertices[2], vertices[3], vertices[6])
        + signed_volume(vertices[1], vertices[3], vertices[4], vertices[6])
        + signed_volume(vertices[1], vertices[4], vertices[5], vertices[6])
        + signed_volume(vertices[3], vertices[4], vertices[6], vertices[7])
}

/// Map a point in reference coordinates to physical coordinates (trilinear).
pub fn reference_to_physical(vertices: &HexVertices, r: f64, s: f64, t: f64) -> [f64; 3] {
    let rm = 1.0 - r;
    let sm = 1.0 - s;
    let tm = 1.0 - t;
    let weights = [
        rm * sm * tm,
        r * sm * tm,
        r * s * tm,
        rm * s * tm,
        rm * sm * t,
        r * sm * t,
        r * s * t,
        rm * s * t,
    ];
    let mut out = [0.0; 3];
    for (weight, vertex) in weights.iter().zip(vertices.iter()) {
        out[0] += weight * vertex[0];
        out[1] += weight * vertex[1];
        out[2] += weight * vertex[2];
    }
    out
}

/// Arithmetic mean of the eight vertices.
pub fn vertex_centroid(vertices: &HexVertices) -> [f64; 3] {
    let mut c = [0.0; 3];
    for v in vertices {
        c = add(c, *v);
    }
    scale(c, 1.0 / 8.0)
}

/// Largest distance from `centre` to any vertex.
///
/// Every point of the cell lies inside the ball of this radius around `centre`.
pub fn circumradius(vertices: &HexVertices, centre: [f64; 3]) -> f64 {
    vertices
        .iter()
        .map(|v| norm(sub(*v, centre)))
        .fold(0.0, f64::max)
}

/// Split a hexahedron into its eight reference-space octants.
pub fn subdivide_hex(vertices: &HexVertices) -> [HexVertices; 8] {
    // Corner offsets of a reference octant, in hex vertex ordering.
    const CORNERS: [[f64; 3]; 8] = [
        [0.0, 0.0, 0.0],
        [0.5, 0.0, 0.0],
        [0.5, 0.5, 0.0],
        [0.0, 0.5, 0.0],
        [0.0, 0.0, 0.5],
        [0.5, 0.0, 0.5],
        [0.5, 0.5, 0.5],
        [0.0, 0.5, 0.5],
    ];
    let mut children = [[[0.0; 3]; 8]; 8];
    for (child, origin) in children.iter_mut().zip(CORNERS.iter()) {
        for (corner, offset) in child.iter_mut().zip(CORNERS.iter()) {
            *corner = reference_to_physical(
                vertices,
                origin[0] + offset[0],
                origin[1] + offset[1],
                origin[2] + offset[2],
            );
        }
    }
    children
}

/// Axis-aligned box `[min, max]` as hexahedron vertices.
pub fn box_vertices(min: [f64; 3], max: [f64; 3]) -> HexVertices {
    [
        [min[0], min[1], min[2]],
        [max[0], min[1], min[2]],
        [max[0], max[1], min[2]],
        [min[0], max[1], min[2]],
        [min[0], min[1], max[2]],
        [max[0], min[1], max[2]],
        [max[0], max[1], max[2]],
        [min[0], max[1], max[2]],
    ]
}

/// Normalize `a`, rejecting near-zero vectors.
pub fn unit(a: [f64; 3]) -> Result<[f64; 3], ShapeError> {
    let len = norm(a);
    if len <= EPS {
        return Err(ShapeError::InvalidGeometry("zero-length direction".into()));
    }
    Ok(scale(a, 1.0 / len))
}

pub fn signed_volume(a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]) -> f64 {
    let ab = sub(b, a);
    let ac = sub(c, a);
    let ad = sub(d, a);
    dot(ab, cross(ac, ad)) / 6.0
}

#[inline]
pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: [f64; 3], k: f64) -> [f64; 3] {
    [a[0] * k, a[1] * k, a[2] * k]
}

#[inline]
pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
