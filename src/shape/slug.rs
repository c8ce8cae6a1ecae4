//! `slug`: an elongated bubble-train slug, modelled as a capsule.
//!
//! The slug is a cylinder of `radius` around the segment from `start` along
//! the unit `direction` for `length`, closed by hemispherical caps centred on
//! the segment ends. Without an explicit `length`, it is derived from
//! `initialVolume = πr²L + 4/3·πr³`.

use crate::dictionary::Dictionary;
use crate::geometry::metrics::{add, scale, unit};
use crate::mask::Capsule;
use crate::mesh::MeshRef;
use crate::shape::{Shape, ShapeCore};
use crate::shape_error::ShapeError;
use std::f64::consts::PI;

pub const TYPE_NAME: &str = "slug";

#[derive(Clone, Debug)]
pub struct Slug {
    core: ShapeCore,
    capsule: Capsule,
    length: f64,
}

impl Slug {
    pub fn new(name: &str, dict: &Dictionary, mesh: MeshRef) -> Result<Self, ShapeError> {
        let core = ShapeCore::new(TYPE_NAME, name, dict, mesh)?;
        let top = dict.scoped(name);
        let coeffs = top.sub_dict("slugCoeffs")?;

        let start = coeffs.vector("start")?;
        let direction =
            unit(coeffs.vector("direction")?).map_err(|_| coeffs.degenerate("direction", 0.0))?;
        let radius = coeffs.positive_scalar("radius")?;
        let length = match coeffs.opt_scalar("length")? {
            Some(l) if l < 0.0 => return Err(coeffs.degenerate("length", l)),
            Some(l) => l,
            None => {
                let caps = 4.0 / 3.0 * PI * radius.powi(3);
                let l = (core.initial_volume() - caps) / (PI * radius * radius);
                if l < 0.0 {
                    // Volume too small for the two caps alone.
                    return Err(top.degenerate("initialVolume", core.initial_volume()));
                }
                l
            }
        };

        Ok(Self {
            core,
            capsule: Capsule {
                start,
                end: add(start, scale(direction, length)),
                radius,
            },
            length,
        })
    }

    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    /// Length of the cylindrical section.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Enclosed volume, `πr²L + 4/3·πr³`.
    pub fn volume(&self) -> f64 {
        let r = self.capsule.radius;
        PI * r * r * self.length + 4.0 / 3.0 * PI * r.powi(3)
    }
}

/// Registry factory.
pub fn construct(name: &str, dict: &Dictionary, mesh: MeshRef) -> Result<Box<dyn Shape>, ShapeError> {
    Ok(Box::new(Slug::new(name, dict, mesh)?))
}

impl Shape for Slug {
    fn core(&self) -> &ShapeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ShapeCore {
        &mut self.core
    }

    fn calculate(&mut self) -> Result<(), ShapeError> {
        self.core.calc_region_mask(&self.capsule)
    }

    fn clone_box(&self) -> Box<dyn Shape> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::BoxMesh;
    use std::sync::Arc;

    fn dict(volume: f64, coeffs: Dictionary) -> Dictionary {
        Dictionary::new()
            .with("type", TYPE_NAME)
            .with("initialVolume", volume)
            .with("initialVelocity", [0.0, 0.0, 1.0])
            .with(
                "slugCoeffs",
                coeffs
                    .with("start", [0.0, 0.0, -1.0])
                    .with("direction", [0.0, 0.0, 2.0])
                    .with("radius", 0.5),
            )
    }

    fn mesh() -> MeshRef {
        Arc::new(BoxMesh::new([-1.0, -1.0, -2.0], [1.0, 1.0, 2.0], [5, 5, 8]).unwrap())
    }

    #[test]
    fn length_from_volume() {
        let r: f64 = 0.5;
        let v = PI * r * r * 2.0 + 4.0 / 3.0 * PI * r.powi(3);
        let s = Slug::new("s", &dict(v, Dictionary::new()), mesh()).unwrap();
        assert!((s.length() - 2.0).abs() < 1e-12);
        assert!((s.capsule().end[2] - 1.0).abs() < 1e-12);
        assert!((s.volume() - v).abs() < 1e-12);
    }

    #[test]
    fn too_small_volume_is_degenerate() {
        let err = Slug::new("s", &dict(0.01, Dictionary::new()), mesh()).unwrap_err();
        assert!(matches!(err, ShapeError::Degenerate { ref key, .. } if key == "initialVolume"));
    }

    #[test]
    fn zero_direction_is_degenerate() {
        let d = dict(1.0, Dictionary::new()).with(
            "slugCoeffs",
            Dictionary::new()
                .with("start", [0.0; 3])
                .with("direction", [0.0; 3])
                .with("radius", 0.5),
        );
        assert_eq!(
            Slug::new("s", &d, mesh()).unwrap_err(),
            ShapeError::Degenerate {
                shape: "s".into(),
                key: "slugCoeffs.direction".into(),
                value: 0.0
            }
        );
    }

    #[test]
    fn axis_cells_are_full() {
        let d = dict(0.0, Dictionary::new().with("length", 2.0));
        let mut s = Slug::new("s", &d, mesh()).unwrap();
        s.calculate().unwrap();
        let mesh = BoxMesh::new([-1.0, -1.0, -2.0], [1.0, 1.0, 2.0], [5, 5, 8]).unwrap();
        // Cell [-0.2, 0.2]^2 x [0, 0.5] sits inside the cylinder.
        let inner = mesh.cell_index(2, 2, 4);
        assert_eq!(s.liquid_mask().as_slice()[inner], 1.0);
        // Corner cell is far outside.
        assert_eq!(s.liquid_mask().as_slice()[0], 0.0);
    }
}
