mod util;

use std::f64::consts::PI;
use std::sync::Arc;
use util::*;
use vof_setfields::prelude::*;

#[test]
fn unit_sphere_in_single_cell_is_pi_over_six() {
    let mesh: MeshRef = cube_mesh(-1.0, 1.0, 1);
    let d = sphere_dict([0.0; 3], 1.0, [0.0; 3]).with("maskDepth", 6.0);
    let s = calculated("ball", &d, &mesh);
    let f = s.liquid_mask().as_slice()[0];
    assert!((f - PI / 6.0).abs() < 1e-2, "fraction {f}");
    assert!((s.vapor_mask().as_slice()[0] - (1.0 - f)).abs() < 1e-15);
}

#[test]
fn inside_and_outside_cells_are_exact() {
    let mesh = cube_mesh(-2.0, 2.0, 8);
    let s = calculated("ball", &sphere_dict([0.0; 3], 1.2, [0.0; 3]), &mesh);
    let boxes = BoxMesh::new([-2.0; 3], [2.0; 3], [8, 8, 8]).unwrap();
    // Cell [0, 0.5]³ lies within 0.87 of the centre.
    assert_eq!(s.liquid_mask().as_slice()[boxes.cell_index(4, 4, 4)], 1.0);
    assert_eq!(s.vapor_mask().as_slice()[boxes.cell_index(4, 4, 4)], 0.0);
    assert_eq!(s.liquid_mask().as_slice()[boxes.cell_index(0, 0, 0)], 0.0);
    assert_eq!(s.vapor_mask().as_slice()[boxes.cell_index(0, 0, 0)], 0.0);
    assert!(s.liquid_mask().iter().all(|m| (0.0..=1.0).contains(m)));
}

#[test]
fn cell_centre_mode_is_binary() {
    let mesh = cube_mesh(-1.0, 1.0, 6);
    let d = sphere_dict([0.0; 3], 0.7, [0.0; 3]).with("maskMode", "cellCentre");
    let s = calculated("ball", &d, &mesh);
    assert!(s.liquid_mask().iter().all(|&m| m == 0.0 || m == 1.0));
    assert!(s.liquid_mask().iter().any(|&m| m == 1.0));
}

#[test]
fn mask_volume_converges_with_depth() {
    let mesh = cube_mesh(-1.0, 1.0, 4);
    let exact = 4.0 / 3.0 * PI * 0.6f64.powi(3);
    let err = |depth: f64| {
        let d = sphere_dict([0.0; 3], 0.6, [0.0; 3]).with("maskDepth", depth);
        let v = calculated("ball", &d, &mesh).liquid_volume().unwrap();
        (v - exact).abs() / exact
    };
    assert!(err(3.0) < 5e-2);
    assert!(err(6.0) < 5e-3);
}

#[test]
fn masks_on_distorted_hexes() {
    // Two unit cells sharing a sheared interior face.
    let vertices = vec![
        [0.0, 0.0, 0.0],
        [1.2, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.8, 1.0, 0.0],
        [2.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.2, 0.0, 1.0],
        [2.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
        [0.8, 1.0, 1.0],
        [2.0, 1.0, 1.0],
    ];
    let cells = vec![[0, 1, 4, 3, 6, 7, 10, 9], [1, 2, 5, 4, 7, 8, 11, 10]];
    let mesh: MeshRef = Arc::new(HexMesh::new(vertices, cells).unwrap());
    let film = Dictionary::new()
        .with("type", "film")
        .with("initialVolume", 1.0)
        .with("initialVelocity", [0.0; 3])
        .with(
            "filmCoeffs",
            Dictionary::new()
                .with("point", [0.0; 3])
                .with("normal", [0.0, 0.0, 1.0])
                .with("thickness", 0.5),
        );
    let s = calculated("layer", &film, &mesh);
    for m in s.liquid_mask().iter() {
        assert!((m - 0.5).abs() < 1e-12, "fraction {m}");
    }
    assert!((s.liquid_volume().unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn vapor_shell_surrounds_drop() {
    let mesh = cube_mesh(-1.0, 1.0, 8);
    let mut d = sphere_dict([0.0; 3], 0.4, [0.0; 3]);
    d.insert(
        "sphereCoeffs",
        Dictionary::new()
            .with("centre", [0.0; 3])
            .with("radius", 0.4)
            .with("vaporThickness", 0.2),
    );
    let s = calculated("drop", &d, &mesh);
    let liquid = s.liquid_mask().as_slice();
    let vapor = s.vapor_mask().as_slice();
    for (l, v) in liquid.iter().zip(vapor) {
        assert!(l + v <= 1.0 + 1e-9);
    }
    // Corners are beyond radius + thickness.
    assert_eq!(vapor[0], 0.0);
    assert!(vapor.iter().any(|&v| v > 0.0));
}

#[test]
fn recalculating_after_mesh_change_resizes_masks() {
    let coarse = cube_mesh(-1.0, 1.0, 2);
    let fine = cube_mesh(-1.0, 1.0, 4);
    let d = sphere_dict([0.0; 3], 0.5, [0.0; 3]);
    assert_eq!(calculated("a", &d, &coarse).liquid_mask().len(), 8);
    assert_eq!(calculated("a", &d, &fine).liquid_mask().len(), 64);
}
