//! Geometry utilities for mesh cells.
//!
//! This module provides:
//! - [`metrics`]: hexahedron volume, reference mapping, and subdivision.

pub mod metrics;

pub use metrics::HexVertices;
