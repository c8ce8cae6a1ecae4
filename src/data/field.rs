//! CellField: named per-cell data over a mesh.
//!
//! A `CellField<V>` stores exactly one value per mesh cell, indexed by the
//! mesh's cell numbering. Liquid fraction, temperature, and species fields are
//! `ScalarField`s; velocity is a `VectorField`.

use crate::data::storage::{Storage, VecStorage};
use crate::shape_error::ShapeError;

/// Storage for per-cell field data.
#[derive(Clone, Debug, PartialEq)]
pub struct CellField<V, S: Storage<V> = VecStorage<V>> {
    name: String,
    storage: S,
    _marker: core::marker::PhantomData<V>,
}

/// Scalar value per cell.
pub type ScalarField = CellField<f64>;
/// Three-component vector per cell.
pub type VectorField = CellField<[f64; 3]>;

impl<V: Clone, S: Storage<V>> CellField<V, S> {
    /// Construct a field of `n_cells` values, all equal to `fill`.
    pub fn new(name: impl Into<String>, n_cells: usize, fill: V) -> Self {
        Self {
            name: name.into(),
            storage: S::with_len(n_cells, fill),
            _marker: core::marker::PhantomData,
        }
    }

    /// Overwrite every cell with `value`.
    pub fn fill(&mut self, value: V) {
        for v in self.storage.as_mut_slice() {
            *v = value.clone();
        }
    }

    /// Overwrite cell `cell` with `value`.
    pub fn try_set(&mut self, cell: usize, value: V) -> Result<(), ShapeError> {
        *self.try_get_mut(cell)? = value;
        Ok(())
    }
}

impl<V> CellField<V, VecStorage<V>> {
    /// Wrap an existing buffer.
    pub fn from_vec(name: impl Into<String>, values: Vec<V>) -> Self {
        Self {
            name: name.into(),
            storage: VecStorage::from(values),
            _marker: core::marker::PhantomData,
        }
    }
}

impl<V, S: Storage<V>> CellField<V, S> {
    /// Field name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Read-only view of the value at `cell`.
    #[inline]
    pub fn try_get(&self, cell: usize) -> Result<&V, ShapeError> {
        let n_cells = self.len();
        self.storage
            .as_slice()
            .get(cell)
            .ok_or(ShapeError::CellOutOfRange { cell, n_cells })
    }

    /// Mutable view of the value at `cell`.
    #[inline]
    pub fn try_get_mut(&mut self, cell: usize) -> Result<&mut V, ShapeError> {
        let n_cells = self.len();
        self.storage
            .as_mut_slice()
            .get_mut(cell)
            .ok_or(ShapeError::CellOutOfRange { cell, n_cells })
    }

    /// Entire read-only buffer in cell order.
    #[inline]
    pub fn as_slice(&self) -> &[V] {
        self.storage.as_slice()
    }

    /// Entire mutable buffer in cell order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [V] {
        self.storage.as_mut_slice()
    }

    /// Iterate values in cell order.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.storage.as_slice().iter()
    }

    /// Fail with `FieldSizeMismatch` unless the field holds `n_cells` values.
    pub fn check_len(&self, n_cells: usize) -> Result<(), ShapeError> {
        if self.len() != n_cells {
            return Err(ShapeError::FieldSizeMismatch {
                field: self.name.clone(),
                expected: n_cells,
                found: self.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_set() {
        let mut f = ScalarField::new("alpha", 3, 0.0);
        f.try_set(1, 0.5).unwrap();
        assert_eq!(f.as_slice(), &[0.0, 0.5, 0.0]);
        assert_eq!(*f.try_get(1).unwrap(), 0.5);
    }

    #[test]
    fn out_of_range() {
        let mut f = VectorField::new("U", 2, [0.0; 3]);
        assert_eq!(
            f.try_set(2, [1.0; 3]),
            Err(ShapeError::CellOutOfRange { cell: 2, n_cells: 2 })
        );
    }

    #[test]
    fn fill_and_len_check() {
        let mut f = ScalarField::from_vec("T", vec![1.0, 2.0]);
        f.fill(300.0);
        assert!(f.iter().all(|&t| t == 300.0));
        assert!(f.check_len(2).is_ok());
        assert!(matches!(
            f.check_len(3),
            Err(ShapeError::FieldSizeMismatch { expected: 3, found: 2, .. })
        ));
    }
}
