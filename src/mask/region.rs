//! Analytic regions described by signed distance functions.
//!
//! Every region reports a signed distance that is negative inside, zero on
//! the surface, and positive outside, with Lipschitz constant at most one.
//! The mask engine relies on that bound to certify whole sub-cells as inside
//! or outside without sampling them.

use crate::geometry::metrics::{dot, norm, scale, sub};
use std::fmt::Debug;

/// A closed region of space.
pub trait Region: Send + Sync + Debug {
    /// Signed distance from `p` to the region surface (negative inside).
    fn signed_distance(&self, p: [f64; 3]) -> f64;

    /// Whether `p` belongs to the region. Surface points count as inside.
    #[inline]
    fn contains(&self, p: [f64; 3]) -> bool {
        self.signed_distance(p) <= 0.0
    }
}

impl<R: Region + ?Sized> Region for &R {
    fn signed_distance(&self, p: [f64; 3]) -> f64 {
        (**self).signed_distance(p)
    }
}

/// Solid ball.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ball {
    pub centre: [f64; 3],
    pub radius: f64,
}

impl Region for Ball {
    fn signed_distance(&self, p: [f64; 3]) -> f64 {
        norm(sub(p, self.centre)) - self.radius
    }
}

/// Cylinder of `radius` around the segment `start → end`, capped by
/// hemispheres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub radius: f64,
}

impl Region for Capsule {
    fn signed_distance(&self, p: [f64; 3]) -> f64 {
        let axis = sub(self.end, self.start);
        let rel = sub(p, self.start);
        let len2 = dot(axis, axis);
        let t = if len2 > 0.0 {
            (dot(rel, axis) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        norm(sub(rel, scale(axis, t))) - self.radius
    }
}

/// Layer of `thickness` on the plane through `point`, extending along the
/// unit `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slab {
    pub point: [f64; 3],
    pub normal: [f64; 3],
    pub thickness: f64,
}

impl Region for Slab {
    fn signed_distance(&self, p: [f64; 3]) -> f64 {
        let h = dot(sub(p, self.point), self.normal);
        (-h).max(h - self.thickness)
    }
}

/// A region grown outward by `offset`.
///
/// Exact for the built-in regions, whose distance fields are exact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dilated<R> {
    pub inner: R,
    pub offset: f64,
}

impl<R: Region> Region for Dilated<R> {
    fn signed_distance(&self, p: [f64; 3]) -> f64 {
        self.inner.signed_distance(p) - self.offset
    }
}

/// Grow `region` outward by `offset`.
pub fn dilate<R: Region>(region: R, offset: f64) -> Dilated<R> {
    Dilated {
        inner: region,
        offset,
    }
}
