#![allow(dead_code)]
use std::sync::Arc;
use vof_setfields::prelude::*;

/// Uniform `n`³ box over `[lo, hi]`³.
pub fn cube_mesh(lo: f64, hi: f64, n: usize) -> MeshRef {
    Arc::new(BoxMesh::new([lo; 3], [hi; 3], [n, n, n]).unwrap())
}

/// Sphere entry with explicit radius and velocity.
pub fn sphere_dict(centre: [f64; 3], radius: f64, velocity: [f64; 3]) -> Dictionary {
    Dictionary::new()
        .with("type", "sphere")
        .with("initialVolume", 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3))
        .with("initialVelocity", velocity)
        .with(
            "sphereCoeffs",
            Dictionary::new().with("centre", centre).with("radius", radius),
        )
}

/// Zeroed fields with the given species and a temperature field.
pub fn fields(mesh: &MeshRef, species: &[&str]) -> InitFields {
    InitFields::new(mesh.as_ref(), species.iter().copied(), true).unwrap()
}

/// Calculated shape from the built-in registry.
pub fn calculated(name: &str, dict: &Dictionary, mesh: &MeshRef) -> Box<dyn Shape> {
    let mut s = ShapeRegistry::with_builtin_shapes()
        .create(name, dict, mesh.clone())
        .unwrap();
    s.calculate().unwrap();
    s
}

/// Stamp `shape` into `f`.
pub fn stamp(shape: &dyn Shape, f: &mut InitFields) -> Result<(), ShapeError> {
    shape.set(
        &mut f.alpha,
        &mut f.velocity,
        f.temperature.as_mut(),
        &mut f.species,
    )
    .map(|_| ())
}
