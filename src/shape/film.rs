//! `film`: a liquid layer of uniform thickness on a wall plane.

use crate::dictionary::Dictionary;
use crate::geometry::metrics::unit;
use crate::mask::Slab;
use crate::mesh::MeshRef;
use crate::shape::{Shape, ShapeCore};
use crate::shape_error::ShapeError;

pub const TYPE_NAME: &str = "film";

/// Layer between the plane through `filmCoeffs.point` and its offset by
/// `filmCoeffs.thickness` along the unit `filmCoeffs.normal`.
#[derive(Clone, Debug)]
pub struct Film {
    core: ShapeCore,
    slab: Slab,
}

impl Film {
    pub fn new(name: &str, dict: &Dictionary, mesh: MeshRef) -> Result<Self, ShapeError> {
        let core = ShapeCore::new(TYPE_NAME, name, dict, mesh)?;
        let coeffs = dict.scoped(name).sub_dict("filmCoeffs")?;
        let point = coeffs.vector("point")?;
        let normal =
            unit(coeffs.vector("normal")?).map_err(|_| coeffs.degenerate("normal", 0.0))?;
        let thickness = coeffs.positive_scalar("thickness")?;
        Ok(Self {
            core,
            slab: Slab {
                point,
                normal,
                thickness,
            },
        })
    }

    pub fn slab(&self) -> &Slab {
        &self.slab
    }
}

/// Registry factory.
pub fn construct(name: &str, dict: &Dictionary, mesh: MeshRef) -> Result<Box<dyn Shape>, ShapeError> {
    Ok(Box::new(Film::new(name, dict, mesh)?))
}

impl Shape for Film {
    fn core(&self) -> &ShapeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ShapeCore {
        &mut self.core
    }

    fn calculate(&mut self) -> Result<(), ShapeError> {
        self.core.calc_region_mask(&self.slab)
    }

    fn clone_box(&self) -> Box<dyn Shape> {
        Box::new(self.clone())
    }
}
