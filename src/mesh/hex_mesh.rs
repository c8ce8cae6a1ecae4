//! Unstructured hexahedral meshes from explicit connectivity.

use crate::geometry::HexVertices;
use crate::geometry::metrics::{hex_volume, vertex_centroid};
use crate::mesh::{CellMesh, check_cell};
use crate::shape_error::ShapeError;

/// Hexahedral mesh defined by a vertex list and eight vertex indices per cell.
///
/// Centres and volumes are computed once at construction.
#[derive(Clone, Debug)]
pub struct HexMesh {
    vertices: Vec<[f64; 3]>,
    cells: Vec<[usize; 8]>,
    centres: Vec<[f64; 3]>,
    volumes: Vec<f64>,
}

impl HexMesh {
    /// Build a mesh, validating connectivity and cell orientation.
    ///
    /// # Errors
    /// `InvalidGeometry` if a cell references a missing vertex or has
    /// non-positive volume (inverted or collapsed).
    pub fn new(vertices: Vec<[f64; 3]>, cells: Vec<[usize; 8]>) -> Result<Self, ShapeError> {
        let mut centres = Vec::with_capacity(cells.len());
        let mut volumes = Vec::with_capacity(cells.len());
        for (cell_idx, conn) in cells.iter().enumerate() {
            let mut hex = [[0.0; 3]; 8];
            for (slot, &vidx) in hex.iter_mut().zip(conn.iter()) {
                *slot = *vertices.get(vidx).ok_or_else(|| {
                    ShapeError::InvalidGeometry(format!(
                        "cell {cell_idx} references missing vertex {vidx}"
                    ))
                })?;
            }
            let volume = hex_volume(&hex);
            if !(volume > 0.0) {
                return Err(ShapeError::InvalidGeometry(format!(
                    "cell {cell_idx} has non-positive volume {volume}"
                )));
            }
            centres.push(vertex_centroid(&hex));
            volumes.push(volume);
        }
        log::debug!(
            "built hex mesh: {} vertices, {} cells",
            vertices.len(),
            cells.len()
        );
        Ok(Self {
            vertices,
            cells,
            centres,
            volumes,
        })
    }

    pub fn vertices(&self) -> &[[f64; 3]] {
        &self.vertices
    }

    pub fn cells(&self) -> &[[usize; 8]] {
        &self.cells
    }
}

impl CellMesh for HexMesh {
    fn n_cells(&self) -> usize {
        self.cells.len()
    }

    fn cell_vertices(&self, cell: usize) -> Result<HexVertices, ShapeError> {
        check_cell(cell, self.cells.len())?;
        let mut hex = [[0.0; 3]; 8];
        for (slot, &vidx) in hex.iter_mut().zip(self.cells[cell].iter()) {
            *slot = self.vertices[vidx];
        }
        Ok(hex)
    }

    fn cell_centre(&self, cell: usize) -> Result<[f64; 3], ShapeError> {
        check_cell(cell, self.cells.len())?;
        Ok(self.centres[cell])
    }

    fn cell_volume(&self, cell: usize) -> Result<f64, ShapeError> {
        check_cell(cell, self.cells.len())?;
        Ok(self.volumes[cell])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cells() -> (Vec<[f64; 3]>, Vec<[usize; 8]>) {
        // 2×1×1 unit cubes sharing the x = 1 face.
        let mut vertices = Vec::new();
        for k in 0..2 {
            for j in 0..2 {
                for i in 0..3 {
                    vertices.push([i as f64, j as f64, k as f64]);
                }
            }
        }
        let v = |i: usize, j: usize, k: usize| i + 3 * (j + 2 * k);
        let cells = (0..2)
            .map(|i| {
                [
                    v(i, 0, 0),
                    v(i + 1, 0, 0),
                    v(i + 1, 1, 0),
                    v(i, 1, 0),
                    v(i, 0, 1),
                    v(i + 1, 0, 1),
                    v(i + 1, 1, 1),
                    v(i, 1, 1),
                ]
            })
            .collect();
        (vertices, cells)
    }

    #[test]
    fn centres_and_volumes() {
        let (vertices, cells) = two_cells();
        let mesh = HexMesh::new(vertices, cells).unwrap();
        assert_eq!(mesh.n_cells(), 2);
        assert_eq!(mesh.cell_centre(1).unwrap(), [1.5, 0.5, 0.5]);
        assert!((mesh.cell_volume(0).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_missing_vertex_and_inverted_cells() {
        let (vertices, mut cells) = two_cells();
        cells[0][3] = 99;
        assert!(HexMesh::new(vertices.clone(), cells).is_err());

        let (_, mut cells) = two_cells();
        cells[1].swap(0, 4);
        cells[1].swap(1, 5);
        cells[1].swap(2, 6);
        cells[1].swap(3, 7);
        assert!(HexMesh::new(vertices, cells).is_err());
    }
}
