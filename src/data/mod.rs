//! Data module: per-cell fields and their storage

pub mod field;
pub mod species;
pub mod storage;

pub use field::{CellField, ScalarField, VectorField};
pub use species::SpeciesFields;
pub use storage::{Storage, VecStorage};
