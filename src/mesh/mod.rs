//! Mesh collaborator: read-only cell geometry.
//!
//! Shapes only ever read the mesh, so it is shared between them behind an
//! [`Arc`](std::sync::Arc) ([`MeshRef`]). Cells are hexahedra in the
//! reference ordering of [`crate::geometry::metrics`]; providers with other
//! cell kinds are expected to decompose them.

pub mod hex_mesh;
pub mod structured;

use crate::geometry::HexVertices;
use crate::shape_error::ShapeError;
use std::fmt::Debug;
use std::sync::Arc;

pub use hex_mesh::HexMesh;
pub use structured::BoxMesh;

/// Shared, read-only handle to a mesh.
pub type MeshRef = Arc<dyn CellMesh>;

/// Read-only access to cell geometry.
pub trait CellMesh: Send + Sync + Debug {
    /// Number of cells.
    fn n_cells(&self) -> usize;

    /// Corner points of `cell`.
    ///
    /// # Errors
    /// `CellOutOfRange` if `cell >= n_cells()`.
    fn cell_vertices(&self, cell: usize) -> Result<HexVertices, ShapeError>;

    /// Cell centre.
    fn cell_centre(&self, cell: usize) -> Result<[f64; 3], ShapeError>;

    /// Cell volume.
    fn cell_volume(&self, cell: usize) -> Result<f64, ShapeError>;

    /// Sum of all cell volumes.
    fn total_volume(&self) -> f64 {
        (0..self.n_cells())
            .filter_map(|c| self.cell_volume(c).ok())
            .sum()
    }
}

pub(crate) fn check_cell(cell: usize, n_cells: usize) -> Result<(), ShapeError> {
    if cell >= n_cells {
        return Err(ShapeError::CellOutOfRange { cell, n_cells });
    }
    Ok(())
}
