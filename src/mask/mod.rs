//! Geometric mask engine: per-cell occupancy of a region.
//!
//! A mask assigns every mesh cell a value in `[0, 1]`: the fraction of the
//! cell's volume inside a [`Region`]. Two modes are available:
//!
//! - [`MaskMode::CellCentre`]: 1 if the cell centre is inside, otherwise 0.
//! - [`MaskMode::VolumeFraction`]: the cell is split recursively into
//!   reference-space octants. An octant whose circumscribed ball lies entirely
//!   inside or outside the region is accepted whole; straddling octants are
//!   refined until `depth` levels, where the octant centroid decides.
//!
//! ## Guarantees
//! - Cells entirely inside get exactly `1.0`, cells entirely outside exactly `0.0`.
//! - Points on the surface count as inside.
//! - A cell's value depends only on that cell and the region, so cells are
//!   evaluated independently (in parallel with the `rayon` feature).

pub mod region;

use crate::geometry::HexVertices;
use crate::geometry::metrics::{circumradius, hex_volume, subdivide_hex, vertex_centroid};
use crate::mesh::CellMesh;
use crate::shape_error::ShapeError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use region::{Ball, Capsule, Dilated, Region, Slab, dilate};

/// Largest accepted subdivision depth.
pub const MAX_DEPTH: u32 = 10;

/// How a cell's occupancy is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MaskMode {
    /// Binary in/out test of the cell centre.
    CellCentre,
    /// Sub-cell volume fraction.
    #[default]
    VolumeFraction,
}

impl MaskMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MaskMode::CellCentre => "cellCentre",
            MaskMode::VolumeFraction => "volumeFraction",
        }
    }
}

impl FromStr for MaskMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cellCentre" | "cellCenter" => Ok(MaskMode::CellCentre),
            "volumeFraction" => Ok(MaskMode::VolumeFraction),
            _ => Err(()),
        }
    }
}

/// Mask evaluation settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaskOptions {
    pub mode: MaskMode,
    /// Subdivision levels for [`MaskMode::VolumeFraction`].
    pub depth: u32,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            mode: MaskMode::VolumeFraction,
            depth: 4,
        }
    }
}

/// Evaluate `region` on every cell of `mesh`.
///
/// Returns one value per cell, in cell order.
pub fn compute_mask<R>(
    mesh: &dyn CellMesh,
    region: &R,
    options: MaskOptions,
) -> Result<Vec<f64>, ShapeError>
where
    R: Region + ?Sized,
{
    let n_cells = mesh.n_cells();
    let eval = |cell: usize| -> Result<f64, ShapeError> {
        match options.mode {
            MaskMode::CellCentre => {
                let centre = mesh.cell_centre(cell)?;
                Ok(if region.contains(centre) { 1.0 } else { 0.0 })
            }
            MaskMode::VolumeFraction => {
                let vertices = mesh.cell_vertices(cell)?;
                Ok(cell_fraction(region, &vertices, options.depth))
            }
        }
    };

    log::debug!(
        "computing {} mask over {n_cells} cells (depth {})",
        options.mode.as_str(),
        options.depth
    );

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        (0..n_cells).into_par_iter().map(eval).collect()
    }
    #[cfg(not(feature = "rayon"))]
    {
        (0..n_cells).map(eval).collect()
    }
}

#[derive(Default)]
struct Occupancy {
    inside_volume: f64,
    any_inside: bool,
    any_outside: bool,
}

/// Fraction of the hexahedron `vertices` inside `region`.
pub fn cell_fraction<R>(region: &R, vertices: &HexVertices, depth: u32) -> f64
where
    R: Region + ?Sized,
{
    let total = hex_volume(vertices);
    let mut occ = Occupancy::default();
    accumulate(region, vertices, total, depth, &mut occ);
    if !occ.any_outside {
        return 1.0;
    }
    if !occ.any_inside || total <= 0.0 {
        return 0.0;
    }
    (occ.inside_volume / total).clamp(0.0, 1.0)
}

fn accumulate<R>(region: &R, vertices: &HexVertices, volume: f64, depth: u32, occ: &mut Occupancy)
where
    R: Region + ?Sized,
{
    let centre = vertex_centroid(vertices);
    let radius = circumradius(vertices, centre);
    let d = region.signed_distance(centre);

    let inside = if d <= -radius {
        true
    } else if d > radius {
        false
    } else if depth == 0 {
        d <= 0.0
    } else {
        for child in subdivide_hex(vertices).iter() {
            accumulate(region, child, hex_volume(child), depth - 1, occ);
        }
        return;
    };

    if inside {
        occ.inside_volume += volume;
        occ.any_inside = true;
    } else {
        occ.any_outside = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::metrics::box_vertices;
    use crate::mesh::BoxMesh;
    use proptest::prelude::*;

    fn unit_ball() -> Ball {
        Ball {
            centre: [0.0; 3],
            radius: 1.0,
        }
    }

    #[test]
    fn sphere_in_single_cell_gives_volume_fraction() {
        let cell = box_vertices([-1.0; 3], [1.0; 3]);
        let f = cell_fraction(&unit_ball(), &cell, 6);
        let exact = std::f64::consts::PI * 4.0 / 3.0 / 8.0;
        assert!((f - exact).abs() < 1e-2, "fraction {f}, expected {exact}");
        assert!(f > 0.0 && f < 1.0);
    }

    #[test]
    fn enclosed_and_outside_cells_are_exact() {
        let inside = box_vertices([-0.1; 3], [0.1; 3]);
        let outside = box_vertices([2.0; 3], [3.0; 3]);
        assert_eq!(cell_fraction(&unit_ball(), &inside, 4), 1.0);
        assert_eq!(cell_fraction(&unit_ball(), &outside, 4), 0.0);
    }

    #[test]
    fn cell_inside_but_touching_surface_is_full() {
        // All corners lie inside, but the circumscribed ball pokes out, so
        // the engine has to refine before accepting the cell.
        let cell = box_vertices([-0.12, -0.42, -0.42], [0.72, 0.42, 0.42]);
        assert_eq!(cell_fraction(&unit_ball(), &cell, 5), 1.0);
    }

    #[test]
    fn surface_point_counts_as_inside() {
        let slab = Slab {
            point: [0.0; 3],
            normal: [0.0, 0.0, 1.0],
            thickness: 1.0,
        };
        // Cell centred exactly on the slab's top face.
        let mesh = BoxMesh::new([0.0, 0.0, 0.5], [1.0, 1.0, 1.5], [1, 1, 1]).unwrap();
        let options = MaskOptions {
            mode: MaskMode::CellCentre,
            depth: 0,
        };
        assert_eq!(compute_mask(&mesh, &slab, options).unwrap(), vec![1.0]);
    }

    #[test]
    fn half_space_split_cell() {
        let slab = Slab {
            point: [0.0, 0.0, -10.0],
            normal: [0.0, 0.0, 1.0],
            thickness: 10.5,
        };
        let cell = box_vertices([0.0; 3], [1.0; 3]);
        let f = cell_fraction(&slab, &cell, 4);
        assert!((f - 0.5).abs() < 1e-12, "fraction {f}");
    }

    #[test]
    fn centre_mode_is_binary() {
        let mesh = BoxMesh::new([-2.0; 3], [2.0; 3], [4, 4, 4]).unwrap();
        let options = MaskOptions {
            mode: MaskMode::CellCentre,
            depth: 0,
        };
        let mask = compute_mask(&mesh, &unit_ball(), options).unwrap();
        assert_eq!(mask.len(), 64);
        assert!(mask.iter().all(|&m| m == 0.0 || m == 1.0));
        // Only the 8 cells around the origin have centres inside the ball.
        assert_eq!(mask.iter().filter(|&&m| m == 1.0).count(), 8);
    }

    #[test]
    fn mode_parses_from_words() {
        assert_eq!("cellCentre".parse::<MaskMode>(), Ok(MaskMode::CellCentre));
        assert_eq!("volumeFraction".parse::<MaskMode>(), Ok(MaskMode::VolumeFraction));
        assert!("fuzzy".parse::<MaskMode>().is_err());
    }

    proptest! {
        #[test]
        fn mask_values_stay_in_unit_interval(
            cx in -1.5f64..1.5, cy in -1.5f64..1.5, cz in -1.5f64..1.5,
            r in 0.05f64..2.0, depth in 0u32..4,
        ) {
            let mesh = BoxMesh::new([-1.0; 3], [1.0; 3], [3, 3, 3]).unwrap();
            let ball = Ball { centre: [cx, cy, cz], radius: r };
            let mask = compute_mask(&mesh, &ball, MaskOptions { mode: MaskMode::VolumeFraction, depth }).unwrap();
            prop_assert!(mask.iter().all(|m| (0.0..=1.0).contains(m)));
        }

        #[test]
        fn dilation_never_shrinks_mask(r in 0.1f64..1.0, delta in 0.0f64..0.5) {
            let mesh = BoxMesh::new([-1.0; 3], [1.0; 3], [4, 4, 4]).unwrap();
            let ball = Ball { centre: [0.1, -0.2, 0.05], radius: r };
            let options = MaskOptions::default();
            let inner = compute_mask(&mesh, &ball, options).unwrap();
            let outer = compute_mask(&mesh, &dilate(ball, delta), options).unwrap();
            for (a, b) in inner.iter().zip(outer.iter()) {
                prop_assert!(b + 1e-12 >= *a);
            }
        }
    }
}
