//! Shapes: parametric liquid regions that seed initial multiphase fields.
//!
//! A shape owns its physical parameters (initial volume, velocity,
//! temperature, species composition) and two per-cell masks computed over a
//! shared mesh:
//!
//! - the **liquid mask**: fraction of each cell occupied by the shape;
//! - the **vapor mask**: fraction of each cell in the shape's vapor region of
//!   interest. Without a `vaporThickness` coefficient this is the gas share
//!   (`1 - liquid`) of the cells the shape partly fills, and zero elsewhere;
//!   with one it is the shell between the shape and its outward offset by that
//!   thickness.
//!
//! ## Lifecycle
//! Constructed (masks zero) → [`Shape::calculate`] (masks valid) →
//! [`Shape::set`] (fields stamped). `set` may be repeated; it is idempotent.
//!
//! ## Combination rule
//! Every field is written under one "dominant claim" rule, evaluated against
//! the liquid fraction `alpha[c]` found before the shape is stamped:
//!
//! - `alpha[c] = max(alpha[c], liquid[c])`;
//! - where `liquid[c] > 0` and `alpha[c] <= liquid[c]`, velocity, temperature,
//!   and liquid species are overwritten with the shape's values;
//! - where `vapor[c] > 0`, vapor species are overwritten with the shape's
//!   vapor composition if the cell's liquid is claimed as above or, in cells
//!   the shape holds no liquid in, if `alpha[c] <= vapor[c]`. Vapor is written
//!   after liquid, so a species listed in both phases takes its vapor value.
//!
//! Overlapping liquid is owned by the larger occupancy, ties by the later
//! shape; overlapping vapor shells go to the later shape. Shapes whose masks
//! do not overlap give the same fields in any order. Cells with zero masks and
//! species a shape does not declare are left untouched.

pub mod film;
pub mod registry;
pub mod slug;
pub mod sphere;

use crate::data::{ScalarField, SpeciesFields, VectorField};
use crate::debug_invariants::DebugInvariants;
use crate::dictionary::Dictionary;
use crate::mask::{Ball, MAX_DEPTH, MaskMode, MaskOptions, Region, compute_mask, dilate};
use crate::mesh::MeshRef;
use crate::shape_error::ShapeError;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::sync::Arc;

pub use film::Film;
pub use registry::{ShapeFactory, ShapeRegistry};
pub use slug::Slug;
pub use sphere::Sphere;

/// Phase name used when a shape does not set `phase`.
pub const DEFAULT_PHASE: &str = "liquid";

/// A runtime-selectable shape variant.
///
/// Implementors provide the geometry ([`calculate`](Shape::calculate)); the
/// shared state and the field stamping live in [`ShapeCore`].
pub trait Shape: Send + Sync + Debug {
    fn core(&self) -> &ShapeCore;

    fn core_mut(&mut self) -> &mut ShapeCore;

    /// Recompute the liquid and vapor masks against the mesh.
    ///
    /// On error the previous masks are kept.
    fn calculate(&mut self) -> Result<(), ShapeError>;

    /// Deep copy with independent mask storage.
    fn clone_box(&self) -> Box<dyn Shape>;

    /// Stamp this shape's values into externally owned fields and return the
    /// number of cells written.
    ///
    /// `temperature` is `None` when no thermal field is active. See the module
    /// docs for the combination rule.
    ///
    /// # Errors
    /// `UninitializedMask` before the first `calculate`, `FieldSizeMismatch`
    /// for fields not sized to the mesh, `SpeciesNotFound` for a declared
    /// species without a field. Fields are left unmodified on error.
    fn set(
        &self,
        alpha: &mut ScalarField,
        velocity: &mut VectorField,
        temperature: Option<&mut ScalarField>,
        species: &mut SpeciesFields,
    ) -> Result<usize, ShapeError> {
        self.core().stamp(alpha, velocity, temperature, species)
    }

    fn name(&self) -> &str {
        self.core().name()
    }

    /// Alias of [`name`](Shape::name), the keyword of the shape's entry.
    fn keyword(&self) -> &str {
        self.core().name()
    }

    fn type_name(&self) -> &str {
        self.core().type_name()
    }

    fn phase_name(&self) -> &str {
        self.core().phase_name()
    }

    fn dict(&self) -> &Dictionary {
        self.core().dict()
    }

    fn liquid_mask(&self) -> &ScalarField {
        self.core().liquid_mask()
    }

    fn vapor_mask(&self) -> &ScalarField {
        self.core().vapor_mask()
    }

    /// Sorted union of liquid and vapor species names.
    fn species(&self) -> Vec<String> {
        self.core().species()
    }

    fn is_calculated(&self) -> bool {
        self.core().is_calculated()
    }

    /// Liquid volume represented by the mask, `Σ liquid[c]·V[c]`.
    fn liquid_volume(&self) -> Result<f64, ShapeError> {
        self.core().liquid_volume()
    }
}

impl Clone for Box<dyn Shape> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// State common to every shape variant.
#[derive(Clone, Debug)]
pub struct ShapeCore {
    mesh: MeshRef,
    name: String,
    type_name: String,
    phase_name: String,
    dict: Dictionary,
    coeffs: Dictionary,
    initial_volume: f64,
    initial_velocity: [f64; 3],
    initial_temperature: Option<f64>,
    liquid_species: BTreeMap<String, f64>,
    vapor_species: BTreeMap<String, f64>,
    mask_options: MaskOptions,
    vapor_thickness: Option<f64>,
    liquid_mask: ScalarField,
    vapor_mask: ScalarField,
    calculated: bool,
}

impl ShapeCore {
    /// Read the keys every shape shares.
    ///
    /// Required: `initialVolume` (≥ 0), `initialVelocity`, and the
    /// `<type>Coeffs` sub-dictionary. Optional: `phase`,
    /// `initialTemperature`, `liquidSpecies`, `vaporSpecies`, `maskMode`,
    /// `maskDepth`, and `<type>Coeffs.vaporThickness`.
    pub fn new(
        type_name: &str,
        name: &str,
        dict: &Dictionary,
        mesh: MeshRef,
    ) -> Result<Self, ShapeError> {
        let top = dict.scoped(name);

        let phase_name = top.opt_word("phase")?.unwrap_or(DEFAULT_PHASE).to_string();

        let initial_volume = top.scalar("initialVolume")?;
        if initial_volume < 0.0 {
            return Err(top.degenerate("initialVolume", initial_volume));
        }
        let initial_velocity = top.vector("initialVelocity")?;
        let initial_temperature = top.opt_scalar("initialTemperature")?;
        if let Some(t) = initial_temperature {
            if t <= 0.0 {
                return Err(top.invalid("initialTemperature", "a positive absolute temperature"));
            }
        }

        let mut species_tables = [BTreeMap::new(), BTreeMap::new()];
        for (table, key) in species_tables
            .iter_mut()
            .zip(["liquidSpecies", "vaporSpecies"])
        {
            if top.found(key) {
                *table = top.scalar_table(key)?;
                if let Some((species, _)) = table.iter().find(|(_, y)| !(0.0..=1.0).contains(*y)) {
                    return Err(top.invalid(&format!("{key}.{species}"), "a fraction in [0, 1]"));
                }
            }
        }
        let [liquid_species, vapor_species] = species_tables;

        let mut mask_options = MaskOptions::default();
        if let Some(mode) = top.opt_word("maskMode")? {
            mask_options.mode = mode
                .parse::<MaskMode>()
                .map_err(|_| top.invalid("maskMode", "`cellCentre` or `volumeFraction`"))?;
        }
        if let Some(depth) = top.opt_uint("maskDepth")? {
            if depth > MAX_DEPTH {
                return Err(top.invalid("maskDepth", "an integer no larger than 10"));
            }
            mask_options.depth = depth;
        }

        let coeffs_key = format!("{type_name}Coeffs");
        let coeffs = top.sub_dict(&coeffs_key)?;
        let vapor_thickness = coeffs.opt_positive_scalar("vaporThickness")?;

        let n_cells = mesh.n_cells();
        Ok(Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            phase_name,
            dict: dict.clone(),
            coeffs: coeffs.dict().clone(),
            initial_volume,
            initial_velocity,
            initial_temperature,
            liquid_species,
            vapor_species,
            mask_options,
            vapor_thickness,
            liquid_mask: ScalarField::new(format!("{name}:liquidMask"), n_cells, 0.0),
            vapor_mask: ScalarField::new(format!("{name}:vaporMask"), n_cells, 0.0),
            calculated: false,
            mesh,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn phase_name(&self) -> &str {
        &self.phase_name
    }

    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    /// The `<type>Coeffs` sub-dictionary.
    pub fn coeffs(&self) -> &Dictionary {
        &self.coeffs
    }

    pub fn mesh(&self) -> &MeshRef {
        &self.mesh
    }

    pub fn initial_volume(&self) -> f64 {
        self.initial_volume
    }

    pub fn initial_velocity(&self) -> [f64; 3] {
        self.initial_velocity
    }

    pub fn initial_temperature(&self) -> Option<f64> {
        self.initial_temperature
    }

    pub fn liquid_species(&self) -> &BTreeMap<String, f64> {
        &self.liquid_species
    }

    pub fn vapor_species(&self) -> &BTreeMap<String, f64> {
        &self.vapor_species
    }

    pub fn mask_options(&self) -> MaskOptions {
        self.mask_options
    }

    pub fn vapor_thickness(&self) -> Option<f64> {
        self.vapor_thickness
    }

    pub fn liquid_mask(&self) -> &ScalarField {
        &self.liquid_mask
    }

    pub fn vapor_mask(&self) -> &ScalarField {
        &self.vapor_mask
    }

    pub fn liquid_mask_mut(&mut self) -> &mut ScalarField {
        &mut self.liquid_mask
    }

    pub fn vapor_mask_mut(&mut self) -> &mut ScalarField {
        &mut self.vapor_mask
    }

    pub fn is_calculated(&self) -> bool {
        self.calculated
    }

    pub fn species(&self) -> Vec<String> {
        self.liquid_species
            .keys()
            .chain(self.vapor_species.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn liquid_volume(&self) -> Result<f64, ShapeError> {
        self.liquid_mask
            .iter()
            .enumerate()
            .map(|(cell, m)| -> Result<f64, ShapeError> { Ok(m * self.mesh.cell_volume(cell)?) })
            .sum()
    }

    /// Droplet masks: a ball of `radius` around `centre`.
    ///
    /// Cells wholly inside get 1, cells wholly outside 0, straddling cells
    /// their approximate volume fraction (or 0/1 by centre in
    /// [`MaskMode::CellCentre`]).
    pub fn calc_drop_mask(&mut self, centre: [f64; 3], radius: f64) -> Result<(), ShapeError> {
        if !(radius > 0.0) {
            return Err(ShapeError::Degenerate {
                shape: self.name.clone(),
                key: "radius".into(),
                value: radius,
            });
        }
        self.calc_region_mask(&Ball { centre, radius })
    }

    /// Masks for an arbitrary liquid region.
    pub fn calc_region_mask<R: Region>(&mut self, liquid: &R) -> Result<(), ShapeError> {
        let mesh = Arc::clone(&self.mesh);
        let liquid_values = compute_mask(mesh.as_ref(), liquid, self.mask_options)?;
        let vapor_values: Vec<f64> = match self.vapor_thickness {
            Some(delta) => {
                let outer = compute_mask(mesh.as_ref(), &dilate(liquid, delta), self.mask_options)?;
                outer
                    .iter()
                    .zip(liquid_values.iter())
                    .map(|(o, l)| (o - l).clamp(0.0, 1.0))
                    .collect()
            }
            None => liquid_values
                .iter()
                .map(|&l| if l > 0.0 { 1.0 - l } else { 0.0 })
                .collect(),
        };

        self.liquid_mask = ScalarField::from_vec(format!("{}:liquidMask", self.name), liquid_values);
        self.vapor_mask = ScalarField::from_vec(format!("{}:vaporMask", self.name), vapor_values);
        self.calculated = true;
        crate::debug_invariants!(self.validate_invariants(), "shape masks");

        log::debug!(
            "shape `{}` ({}): {} of {} cells hold liquid",
            self.name,
            self.type_name,
            self.liquid_mask.iter().filter(|&&m| m > 0.0).count(),
            self.liquid_mask.len()
        );
        Ok(())
    }

    fn check_fields(
        &self,
        alpha: &ScalarField,
        velocity: &VectorField,
        temperature: Option<&ScalarField>,
        species: &SpeciesFields,
    ) -> Result<(), ShapeError> {
        if !self.calculated {
            return Err(ShapeError::UninitializedMask {
                shape: self.name.clone(),
            });
        }
        let n_cells = self.liquid_mask.len();
        alpha.check_len(n_cells)?;
        velocity.check_len(n_cells)?;
        if let Some(t) = temperature {
            t.check_len(n_cells)?;
        }
        for name in self.liquid_species.keys().chain(self.vapor_species.keys()) {
            let field = species.get(name).ok_or_else(|| ShapeError::SpeciesNotFound {
                shape: self.name.clone(),
                species: name.clone(),
            })?;
            field.check_len(n_cells)?;
        }
        Ok(())
    }

    /// Apply the combination rule; returns the number of cells written.
    pub fn stamp(
        &self,
        alpha: &mut ScalarField,
        velocity: &mut VectorField,
        mut temperature: Option<&mut ScalarField>,
        species: &mut SpeciesFields,
    ) -> Result<usize, ShapeError> {
        self.check_fields(alpha, velocity, temperature.as_deref(), species)?;

        let liquid = self.liquid_mask.as_slice();
        let vapor = self.vapor_mask.as_slice();
        let before = alpha.as_slice();
        let liquid_cells: Vec<usize> = (0..liquid.len())
            .filter(|&c| liquid[c] > 0.0 && before[c] <= liquid[c])
            .collect();
        let vapor_cells: Vec<usize> = (0..vapor.len())
            .filter(|&c| {
                vapor[c] > 0.0
                    && if liquid[c] > 0.0 {
                        before[c] <= liquid[c]
                    } else {
                        before[c] <= vapor[c]
                    }
            })
            .collect();

        for (a, m) in alpha.as_mut_slice().iter_mut().zip(liquid.iter()) {
            if *m > *a {
                *a = *m;
            }
        }

        let u = velocity.as_mut_slice();
        for &c in &liquid_cells {
            u[c] = self.initial_velocity;
        }

        match (temperature.as_deref_mut(), self.initial_temperature) {
            (Some(field), Some(t0)) => {
                let t = field.as_mut_slice();
                for &c in &liquid_cells {
                    t[c] = t0;
                }
            }
            (None, Some(_)) => log::debug!(
                "shape `{}`: no thermal field active, initialTemperature ignored",
                self.name
            ),
            _ => {}
        }

        for (table, cells) in [
            (&self.liquid_species, &liquid_cells),
            (&self.vapor_species, &vapor_cells),
        ] {
            for (name, fraction) in table {
                if let Some(field) = species.get_mut(name) {
                    let y = field.as_mut_slice();
                    for &c in cells.iter() {
                        y[c] = *fraction;
                    }
                }
            }
        }

        let mut written = liquid_cells;
        written.extend(vapor_cells);
        written.sort_unstable();
        written.dedup();
        Ok(written.len())
    }
}

impl DebugInvariants for ShapeCore {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "ShapeCore");
    }

    fn validate_invariants(&self) -> Result<(), ShapeError> {
        let n_cells = self.mesh.n_cells();
        self.liquid_mask.check_len(n_cells)?;
        self.vapor_mask.check_len(n_cells)?;
        let unit = 0.0..=1.0;
        for (cell, (l, v)) in self
            .liquid_mask
            .iter()
            .zip(self.vapor_mask.iter())
            .enumerate()
        {
            if !unit.contains(l) || !unit.contains(v) || l + v > 1.0 + 1e-9 {
                return Err(ShapeError::InvalidGeometry(format!(
                    "shape `{}`: cell {cell} has liquid {l}, vapor {v}",
                    self.name
                )));
            }
        }
        Ok(())
    }
}
