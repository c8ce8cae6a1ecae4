//! `sphere`: a spherical droplet.
//!
//! ```json
//! "drop1": {
//!   "type": "sphere",
//!   "initialVolume": 4.19e-9,
//!   "initialVelocity": [0, 0, -0.5],
//!   "sphereCoeffs": { "centre": [0, 0, 0.003], "vaporThickness": 2e-4 }
//! }
//! ```
//!
//! The radius is `sphereCoeffs.radius` when given, otherwise the radius of a
//! ball holding `initialVolume`.

use crate::dictionary::Dictionary;
use crate::mesh::MeshRef;
use crate::shape::{Shape, ShapeCore};
use crate::shape_error::ShapeError;
use std::f64::consts::PI;

pub const TYPE_NAME: &str = "sphere";

#[derive(Clone, Debug)]
pub struct Sphere {
    core: ShapeCore,
    centre: [f64; 3],
    radius: f64,
}

impl Sphere {
    pub fn new(name: &str, dict: &Dictionary, mesh: MeshRef) -> Result<Self, ShapeError> {
        let core = ShapeCore::new(TYPE_NAME, name, dict, mesh)?;
        let top = dict.scoped(name);
        let coeffs = top.sub_dict("sphereCoeffs")?;
        let centre = coeffs.vector("centre")?;
        let radius = match coeffs.opt_positive_scalar("radius")? {
            Some(r) => r,
            None => {
                let volume = core.initial_volume();
                if volume <= 0.0 {
                    return Err(top.degenerate("initialVolume", volume));
                }
                (3.0 * volume / (4.0 * PI)).cbrt()
            }
        };
        Ok(Self {
            core,
            centre,
            radius,
        })
    }

    pub fn centre(&self) -> [f64; 3] {
        self.centre
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

/// Registry factory.
pub fn construct(name: &str, dict: &Dictionary, mesh: MeshRef) -> Result<Box<dyn Shape>, ShapeError> {
    Ok(Box::new(Sphere::new(name, dict, mesh)?))
}

impl Shape for Sphere {
    fn core(&self) -> &ShapeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ShapeCore {
        &mut self.core
    }

    fn calculate(&mut self) -> Result<(), ShapeError> {
        self.core.calc_drop_mask(self.centre, self.radius)
    }

    fn clone_box(&self) -> Box<dyn Shape> {
        Box::new(self.clone())
    }
}
