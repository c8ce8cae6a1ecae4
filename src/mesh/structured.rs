//! Structured box meshes.

use crate::geometry::HexVertices;
use crate::geometry::metrics::box_vertices;
use crate::mesh::{CellMesh, check_cell};
use crate::shape_error::ShapeError;

/// Uniform hexahedral grid over `[min, max]` with `nx × ny × nz` cells.
///
/// Cell `(i, j, k)` is numbered `i + nx * (j + ny * k)`.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxMesh {
    min: [f64; 3],
    max: [f64; 3],
    divisions: [usize; 3],
    spacing: [f64; 3],
}

fn invalid_geometry(message: impl Into<String>) -> ShapeError {
    ShapeError::InvalidGeometry(message.into())
}

impl BoxMesh {
    /// Generate a structured box mesh.
    ///
    /// # Errors
    /// `InvalidGeometry` if any division is zero or `max <= min` on any axis.
    pub fn new(min: [f64; 3], max: [f64; 3], divisions: [usize; 3]) -> Result<Self, ShapeError> {
        let mut spacing = [0.0; 3];
        for axis in 0..3 {
            if divisions[axis] == 0 {
                return Err(invalid_geometry(format!(
                    "axis {axis} must have at least one division"
                )));
            }
            if !(max[axis] > min[axis]) {
                return Err(invalid_geometry(format!(
                    "axis {axis}: max {} must exceed min {}",
                    max[axis], min[axis]
                )));
            }
            spacing[axis] = (max[axis] - min[axis]) / divisions[axis] as f64;
        }
        Ok(Self {
            min,
            max,
            divisions,
            spacing,
        })
    }

    pub fn divisions(&self) -> [usize; 3] {
        self.divisions
    }

    pub fn bounds(&self) -> ([f64; 3], [f64; 3]) {
        (self.min, self.max)
    }

    /// `(i, j, k)` of a linear cell index.
    pub fn ijk(&self, cell: usize) -> (usize, usize, usize) {
        let [nx, ny, _] = self.divisions;
        (cell % nx, (cell / nx) % ny, cell / (nx * ny))
    }

    /// Linear cell index of `(i, j, k)`.
    pub fn cell_index(&self, i: usize, j: usize, k: usize) -> usize {
        let [nx, ny, _] = self.divisions;
        i + nx * (j + ny * k)
    }

    fn cell_box(&self, cell: usize) -> ([f64; 3], [f64; 3]) {
        let (i, j, k) = self.ijk(cell);
        let idx = [i, j, k];
        let mut lo = [0.0; 3];
        let mut hi = [0.0; 3];
        for axis in 0..3 {
            lo[axis] = self.min[axis] + idx[axis] as f64 * self.spacing[axis];
            // Last layer snaps to `max` exactly.
            hi[axis] = if idx[axis] + 1 == self.divisions[axis] {
                self.max[axis]
            } else {
                self.min[axis] + (idx[axis] + 1) as f64 * self.spacing[axis]
            };
        }
        (lo, hi)
    }
}

impl CellMesh for BoxMesh {
    fn n_cells(&self) -> usize {
        self.divisions.iter().product()
    }

    fn cell_vertices(&self, cell: usize) -> Result<HexVertices, ShapeError> {
        check_cell(cell, self.n_cells())?;
        let (lo, hi) = self.cell_box(cell);
        Ok(box_vertices(lo, hi))
    }

    fn cell_centre(&self, cell: usize) -> Result<[f64; 3], ShapeError> {
        check_cell(cell, self.n_cells())?;
        let (lo, hi) = self.cell_box(cell);
        Ok([
            0.5 * (lo[0] + hi[0]),
            0.5 * (lo[1] + hi[1]),
            0.5 * (lo[2] + hi[2]),
        ])
    }

    fn cell_volume(&self, cell: usize) -> Result<f64, ShapeError> {
        check_cell(cell, self.n_cells())?;
        let (lo, hi) = self.cell_box(cell);
        Ok((hi[0] - lo[0]) * (hi[1] - lo[1]) * (hi[2] - lo[2]))
    }
}
