//! SpeciesFields: an ordered, name-indexed list of species fields.

use crate::data::field::ScalarField;
use crate::shape_error::ShapeError;
use std::collections::HashMap;

/// Species concentration fields shared by every shape, looked up by name.
///
/// Insertion order is preserved for deterministic iteration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpeciesFields {
    fields: Vec<ScalarField>,
    index: HashMap<String, usize>,
}

impl SpeciesFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// One field per name, each `n_cells` long and filled with `fill`.
    pub fn with_names<I, N>(names: I, n_cells: usize, fill: f64) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut out = Self::new();
        for name in names {
            out.try_insert(ScalarField::new(name, n_cells, fill))?;
        }
        Ok(out)
    }

    /// Append a field.
    ///
    /// # Errors
    /// `DuplicateField` if a field of the same name is present.
    pub fn try_insert(&mut self, field: ScalarField) -> Result<(), ShapeError> {
        if self.index.contains_key(field.name()) {
            return Err(ShapeError::DuplicateField(field.name().to_string()));
        }
        self.index.insert(field.name().to_string(), self.fields.len());
        self.fields.push(field);
        Ok(())
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ScalarField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ScalarField> {
        self.index.get(name).map(|&i| &mut self.fields[i])
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScalarField> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ScalarField> {
        self.fields.iter_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
