//! FieldInitializer: applies an ordered list of shapes to the solver fields.
//!
//! Each shape is calculated and then stamped in list order, so later shapes
//! see the fields left by earlier ones. The fields are modified as a unit:
//! shapes are applied to a scratch copy, and the caller's fields are only
//! replaced once every shape has succeeded.

use crate::config::SetFieldsConfig;
use crate::data::{ScalarField, SpeciesFields, VectorField};
use crate::dictionary::DictionaryEntry;
use crate::mesh::{CellMesh, MeshRef};
use crate::shape::{Shape, ShapeRegistry, registry};
use crate::shape_error::ShapeError;
use itertools::Itertools;

/// Relative deviation between mask and requested volume above which a
/// warning is logged.
pub const DEFAULT_VOLUME_TOLERANCE: f64 = 0.05;

/// The fields a shape stamps into.
#[derive(Clone, Debug, PartialEq)]
pub struct InitFields {
    pub alpha: ScalarField,
    pub velocity: VectorField,
    /// Present only when the thermal model is active.
    pub temperature: Option<ScalarField>,
    pub species: SpeciesFields,
}

impl InitFields {
    /// Zero-filled fields sized to `mesh`.
    ///
    /// Temperature is allocated only when `thermal` is set.
    pub fn new<I, N>(mesh: &dyn CellMesh, species: I, thermal: bool) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let n = mesh.n_cells();
        Ok(Self {
            alpha: ScalarField::new("alpha", n, 0.0),
            velocity: VectorField::new("U", n, [0.0; 3]),
            temperature: thermal.then(|| ScalarField::new("T", n, 0.0)),
            species: SpeciesFields::with_names(species, n, 0.0)?,
        })
    }

    pub fn n_cells(&self) -> usize {
        self.alpha.len()
    }
}

/// Outcome of applying one shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeReport {
    pub name: String,
    pub type_name: String,
    pub phase: String,
    /// Cells where the shape wrote at least one field.
    pub cells_written: usize,
    /// Cells with a non-zero liquid mask.
    pub cells_occupied: usize,
    /// `Σ liquid[c]·V[c]`.
    pub liquid_volume: f64,
    /// The shape's `initialVolume`.
    pub target_volume: f64,
}

impl ShapeReport {
    /// `|liquid - target| / target`, or `None` for a zero target.
    pub fn relative_volume_error(&self) -> Option<f64> {
        (self.target_volume > 0.0)
            .then(|| (self.liquid_volume - self.target_volume).abs() / self.target_volume)
    }
}

/// Ordered collection of shapes applied together.
#[derive(Clone, Debug)]
pub struct FieldInitializer {
    shapes: Vec<Box<dyn Shape>>,
    volume_tolerance: f64,
}

impl FieldInitializer {
    /// # Errors
    /// `DuplicateShapeName` if two shapes share a name.
    pub fn new(shapes: Vec<Box<dyn Shape>>) -> Result<Self, ShapeError> {
        if let Some(dup) = shapes.iter().map(|s| s.name()).duplicates().next() {
            return Err(ShapeError::DuplicateShapeName(dup.to_string()));
        }
        Ok(Self {
            shapes,
            volume_tolerance: DEFAULT_VOLUME_TOLERANCE,
        })
    }

    /// Construct every entry through the process-wide registry.
    pub fn from_entries(entries: &[DictionaryEntry], mesh: MeshRef) -> Result<Self, ShapeError> {
        Self::from_entries_with(&registry::global(), entries, mesh)
    }

    pub fn from_entries_with(
        registry: &ShapeRegistry,
        entries: &[DictionaryEntry],
        mesh: MeshRef,
    ) -> Result<Self, ShapeError> {
        let shapes = entries
            .iter()
            .map(|e| registry.create(&e.keyword, &e.dict, mesh.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(shapes)
    }

    /// Shapes listed in `config`, with its mask defaults and volume tolerance.
    pub fn from_config(config: &SetFieldsConfig, mesh: MeshRef) -> Result<Self, ShapeError> {
        Ok(Self::from_entries(&config.shape_entries(), mesh)?
            .with_volume_tolerance(config.volume_tolerance))
    }

    pub fn with_volume_tolerance(mut self, tolerance: f64) -> Self {
        self.volume_tolerance = tolerance;
        self
    }

    pub fn volume_tolerance(&self) -> f64 {
        self.volume_tolerance
    }

    pub fn shapes(&self) -> &[Box<dyn Shape>] {
        &self.shapes
    }

    pub fn get(&self, name: &str) -> Option<&dyn Shape> {
        self.shapes.iter().find(|s| s.name() == name).map(|s| &**s)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Calculate and stamp every shape, in order.
    ///
    /// On error `fields` is unchanged; shapes calculated before the failure
    /// keep their new masks.
    pub fn apply(&mut self, fields: &mut InitFields) -> Result<Vec<ShapeReport>, ShapeError> {
        self.apply_where(fields, |_| true)
    }

    /// As [`apply`](Self::apply), restricted to shapes of one phase.
    pub fn apply_phase(
        &mut self,
        phase: &str,
        fields: &mut InitFields,
    ) -> Result<Vec<ShapeReport>, ShapeError> {
        self.apply_where(fields, |s| s.phase_name() == phase)
    }

    fn apply_where<F>(
        &mut self,
        fields: &mut InitFields,
        select: F,
    ) -> Result<Vec<ShapeReport>, ShapeError>
    where
        F: Fn(&dyn Shape) -> bool,
    {
        let mut scratch = fields.clone();
        let mut reports = Vec::new();
        let tolerance = self.volume_tolerance;

        for shape in self.shapes.iter_mut() {
            if !select(&**shape) {
                continue;
            }
            shape.calculate()?;
            let cells_written = shape.set(
                &mut scratch.alpha,
                &mut scratch.velocity,
                scratch.temperature.as_mut(),
                &mut scratch.species,
            )?;
            let core = shape.core();
            let report = ShapeReport {
                name: core.name().to_string(),
                type_name: core.type_name().to_string(),
                phase: core.phase_name().to_string(),
                cells_written,
                cells_occupied: core.liquid_mask().iter().filter(|&&m| m > 0.0).count(),
                liquid_volume: core.liquid_volume()?,
                target_volume: core.initial_volume(),
            };
            log::info!(
                "applied shape `{}` ({}): {} cells written, liquid volume {:.6e}",
                report.name,
                report.type_name,
                report.cells_written,
                report.liquid_volume
            );
            if let Some(err) = report.relative_volume_error() {
                if err > tolerance {
                    log::warn!(
                        "shape `{}`: mask volume {:.6e} deviates from initialVolume {:.6e} by {:.1}%",
                        report.name,
                        report.liquid_volume,
                        report.target_volume,
                        100.0 * err
                    );
                }
            }
            reports.push(report);
        }

        *fields = scratch;
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::mesh::BoxMesh;
    use crate::shape::{ShapeCore, Sphere};
    use std::sync::Arc;

    /// A sphere that also sets a uniform flow everywhere.
    #[derive(Clone, Debug)]
    struct FlowingSphere(Sphere);

    impl Shape for FlowingSphere {
        fn core(&self) -> &ShapeCore {
            self.0.core()
        }

        fn core_mut(&mut self) -> &mut ShapeCore {
            self.0.core_mut()
        }

        fn calculate(&mut self) -> Result<(), ShapeError> {
            self.0.calculate()
        }

        fn clone_box(&self) -> Box<dyn Shape> {
            Box::new(self.clone())
        }

        fn set(
            &self,
            alpha: &mut ScalarField,
            velocity: &mut VectorField,
            temperature: Option<&mut ScalarField>,
            species: &mut SpeciesFields,
        ) -> Result<usize, ShapeError> {
            self.core().stamp(alpha, velocity, temperature, species)?;
            velocity.fill([9.0; 3]);
            Ok(velocity.len())
        }
    }

    fn mesh() -> MeshRef {
        Arc::new(BoxMesh::new([0.0; 3], [1.0; 3], [4, 4, 4]).unwrap())
    }

    fn sphere(name: &str, centre: [f64; 3], phase: &str) -> DictionaryEntry {
        DictionaryEntry::new(
            name,
            Dictionary::new()
                .with("type", "sphere")
                .with("phase", phase)
                .with("initialVolume", 0.01)
                .with("initialVelocity", [1.0, 0.0, 0.0])
                .with("sphereCoeffs", Dictionary::new().with("centre", centre)),
        )
    }

    #[test]
    fn duplicate_names_rejected() {
        let entries = [sphere("a", [0.5; 3], "liquid"), sphere("a", [0.2; 3], "liquid")];
        assert_eq!(
            FieldInitializer::from_entries(&entries, mesh()).unwrap_err(),
            ShapeError::DuplicateShapeName("a".into())
        );
    }

    #[test]
    fn init_fields_allocate_temperature_when_thermal() {
        let m = mesh();
        let f = InitFields::new(m.as_ref(), ["H2OL"], true).unwrap();
        assert_eq!(f.n_cells(), 64);
        assert!(f.temperature.is_some());
        assert!(InitFields::new(m.as_ref(), ["H2OL"], false)
            .unwrap()
            .temperature
            .is_none());
    }

    #[test]
    fn phase_filter_selects_shapes() {
        let entries = [sphere("w", [0.25; 3], "water"), sphere("o", [0.75; 3], "oil")];
        let mut init = FieldInitializer::from_entries(&entries, mesh()).unwrap();
        let mut fields = InitFields::new(mesh().as_ref(), Vec::<String>::new(), false).unwrap();
        let reports = init.apply_phase("oil", &mut fields).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].name, "o");
        assert!(init.get("o").unwrap().is_calculated());
        assert!(!init.get("w").unwrap().is_calculated());
    }

    #[test]
    fn failure_leaves_fields_untouched() {
        let mut bad = sphere("b", [0.75; 3], "liquid");
        bad.dict
            .insert("liquidSpecies", Dictionary::new().with("missing", 1.0));
        let entries = [sphere("a", [0.25; 3], "liquid"), bad];
        let mut init = FieldInitializer::from_entries(&entries, mesh()).unwrap();
        let mut fields = InitFields::new(mesh().as_ref(), ["N2"], false).unwrap();
        let before = fields.clone();
        assert!(matches!(
            init.apply(&mut fields),
            Err(ShapeError::SpeciesNotFound { .. })
        ));
        assert_eq!(fields, before);
    }

    #[test]
    fn apply_goes_through_shape_set() {
        let entry = sphere("f", [0.5; 3], "liquid");
        let flowing = FlowingSphere(Sphere::new(&entry.keyword, &entry.dict, mesh()).unwrap());
        let mut init = FieldInitializer::new(vec![Box::new(flowing)]).unwrap();
        let mut fields = InitFields::new(mesh().as_ref(), Vec::<String>::new(), false).unwrap();
        let reports = init.apply(&mut fields).unwrap();
        assert!(fields.velocity.iter().all(|u| *u == [9.0; 3]));
        assert_eq!(reports[0].cells_written, 64);
        assert!(fields.alpha.iter().any(|&a| a > 0.0));
    }

    #[test]
    fn report_volume_error() {
        let r = ShapeReport {
            name: "x".into(),
            type_name: "sphere".into(),
            phase: "liquid".into(),
            cells_written: 1,
            cells_occupied: 1,
            liquid_volume: 1.1,
            target_volume: 1.0,
        };
        assert!((r.relative_volume_error().unwrap() - 0.1).abs() < 1e-12);
        let zero = ShapeReport {
            target_volume: 0.0,
            ..r
        };
        assert_eq!(zero.relative_volume_error(), None);
    }
}
