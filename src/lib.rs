#![cfg_attr(docsrs, feature(doc_cfg))]
//! # vof-setfields
//!
//! vof-setfields seeds the initial state of a multiphase volume-of-fluid
//! simulation from parametric shapes. Each shape (a spherical droplet, a
//! capsule-shaped slug, a wall film, or a user-registered variant) computes
//! how much of every mesh cell it occupies, then stamps its volume fraction,
//! velocity, temperature, and species composition into the solver fields.
//!
//! ## Features
//! - Runtime selection of shape variants by `type` name through a
//!   [`ShapeRegistry`](shape::ShapeRegistry), extensible with new variants
//! - Volume-fraction masks by recursive octant subdivision of each cell, exact
//!   for cells wholly inside or outside a shape
//! - A single order-aware combination rule for overlapping shapes
//! - JSON configuration of fields, background state, and shape lists
//! - Per-cell mask evaluation in parallel with the `rayon` feature (default)
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use vof_setfields::prelude::*;
//!
//! # fn main() -> Result<(), ShapeError> {
//! let config = SetFieldsConfig::from_path("setFields.json")?;
//! let mesh: MeshRef = Arc::new(BoxMesh::new([0.0; 3], [1e-2; 3], [64, 64, 64])?);
//! let mut fields = config.build_fields(mesh.as_ref())?;
//! let mut init = FieldInitializer::from_config(&config, mesh)?;
//! for report in init.apply(&mut fields)? {
//!     println!("{}: {:.3e} m^3", report.name, report.liquid_volume);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Invariant checking
//! Shapes validate their masks after every `calculate()` in debug builds, or
//! in release builds with the `check-invariants` feature.

pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod dictionary;
pub mod geometry;
pub mod initializer;
pub mod mask;
pub mod mesh;
pub mod shape;
pub mod shape_error;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::config::{Background, SetFieldsConfig};
    pub use crate::data::{CellField, ScalarField, SpeciesFields, VectorField};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::dictionary::{Dictionary, DictionaryEntry, Entry, EntryStream};
    pub use crate::initializer::{FieldInitializer, InitFields, ShapeReport};
    pub use crate::mask::{MaskMode, MaskOptions, Region};
    pub use crate::mesh::{BoxMesh, CellMesh, HexMesh, MeshRef};
    pub use crate::shape::{Film, Shape, ShapeCore, ShapeRegistry, Slug, Sphere};
    pub use crate::shape_error::ShapeError;
}
