//! Runtime selection of shape variants by type name.
//!
//! A [`ShapeRegistry`] maps the `type` word of a shape dictionary to a
//! factory. The built-in variants (`sphere`, `slug`, `film`) are present in
//! every registry created with [`ShapeRegistry::with_builtin_shapes`],
//! including the process-wide one behind [`create`] and [`register`].

use crate::dictionary::{Dictionary, EntryStream};
use crate::mesh::MeshRef;
use crate::shape::{Shape, film, slug, sphere};
use crate::shape_error::ShapeError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io::Read;

/// Builds a shape from its keyword, dictionary, and mesh.
pub type ShapeFactory = fn(&str, &Dictionary, MeshRef) -> Result<Box<dyn Shape>, ShapeError>;

/// Type name → factory table.
#[derive(Clone, Debug, Default)]
pub struct ShapeRegistry {
    factories: BTreeMap<String, ShapeFactory>,
}

static_assertions::assert_impl_all!(ShapeRegistry: Send, Sync);

impl ShapeRegistry {
    /// Registry with no variants.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding `sphere`, `slug`, and `film`.
    pub fn with_builtin_shapes() -> Self {
        let mut factories = BTreeMap::new();
        factories.insert(sphere::TYPE_NAME.to_string(), sphere::construct as ShapeFactory);
        factories.insert(slug::TYPE_NAME.to_string(), slug::construct as ShapeFactory);
        factories.insert(film::TYPE_NAME.to_string(), film::construct as ShapeFactory);
        Self { factories }
    }

    /// Add a variant. Type names are unique.
    pub fn register(&mut self, type_name: &str, factory: ShapeFactory) -> Result<(), ShapeError> {
        if self.factories.contains_key(type_name) {
            return Err(ShapeError::DuplicateShapeType(type_name.to_string()));
        }
        self.factories.insert(type_name.to_string(), factory);
        log::debug!("registered shape type `{type_name}`");
        Ok(())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Construct the variant named by `dict`'s `type` entry.
    ///
    /// The returned shape is not yet calculated.
    pub fn create(
        &self,
        name: &str,
        dict: &Dictionary,
        mesh: MeshRef,
    ) -> Result<Box<dyn Shape>, ShapeError> {
        let type_name = dict
            .scoped(name)
            .opt_word("type")
            .map_err(|_| self.unknown(name, None))?
            .ok_or_else(|| self.unknown(name, None))?;
        let factory = self
            .factories
            .get(type_name)
            .ok_or_else(|| self.unknown(name, Some(type_name)))?;
        log::debug!("constructing shape `{name}` of type `{type_name}`");
        factory(name, dict, mesh)
    }

    /// Read the next named entry from `stream` and construct it.
    ///
    /// Returns `Ok(None)` at end of input.
    pub fn create_from_entry<R: Read>(
        &self,
        stream: &mut EntryStream<R>,
        mesh: MeshRef,
    ) -> Result<Option<Box<dyn Shape>>, ShapeError> {
        match stream.next_entry()? {
            Some(entry) => self.create(&entry.keyword, &entry.dict, mesh).map(Some),
            None => Ok(None),
        }
    }

    fn unknown(&self, shape: &str, type_name: Option<&str>) -> ShapeError {
        ShapeError::UnknownShapeType {
            shape: shape.to_string(),
            type_name: type_name.map(str::to_string),
            known: self.type_names(),
        }
    }
}

static REGISTRY: Lazy<RwLock<ShapeRegistry>> =
    Lazy::new(|| RwLock::new(ShapeRegistry::with_builtin_shapes()));

/// Add a variant to the process-wide registry.
pub fn register(type_name: &str, factory: ShapeFactory) -> Result<(), ShapeError> {
    REGISTRY.write().register(type_name, factory)
}

/// Construct a shape through the process-wide registry.
pub fn create(name: &str, dict: &Dictionary, mesh: MeshRef) -> Result<Box<dyn Shape>, ShapeError> {
    REGISTRY.read().create(name, dict, mesh)
}

/// [`ShapeRegistry::create_from_entry`] on the process-wide registry.
pub fn create_from_entry<R: Read>(
    stream: &mut EntryStream<R>,
    mesh: MeshRef,
) -> Result<Option<Box<dyn Shape>>, ShapeError> {
    REGISTRY.read().create_from_entry(stream, mesh)
}

pub fn registered_types() -> Vec<String> {
    REGISTRY.read().type_names()
}

/// Snapshot of the process-wide registry.
pub fn global() -> ShapeRegistry {
    REGISTRY.read().clone()
}
