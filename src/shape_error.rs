//! ShapeError: Unified error type for vof-setfields public APIs
//!
//! Every fallible operation in the crate (shape construction, mask
//! computation, field stamping, configuration loading) reports through this
//! enum. Errors carry the shape name and the offending key where one exists.

use thiserror::Error;

/// Unified error type for shape and field-initialization operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ShapeError {
    /// The `type` discriminator is absent or names no registered shape.
    #[error(
        "unknown shape type `{}` for shape `{shape}`; valid types are: {}",
        .type_name.as_deref().unwrap_or("<missing>"),
        .known.join(", ")
    )]
    UnknownShapeType {
        shape: String,
        type_name: Option<String>,
        known: Vec<String>,
    },
    /// A factory was registered twice under the same type name.
    #[error("shape type `{0}` is already registered")]
    DuplicateShapeType(String),
    /// Two shapes in one configuration share a name.
    #[error("duplicate shape name `{0}`")]
    DuplicateShapeName(String),
    /// A required dictionary key is absent.
    #[error("shape `{shape}`: missing required key `{key}`")]
    MissingKey { shape: String, key: String },
    /// A key is present but holds the wrong kind of value.
    #[error("shape `{shape}`: key `{key}` must be {expected}")]
    InvalidEntry {
        shape: String,
        key: String,
        expected: &'static str,
    },
    /// Zero or negative size, or a zero-length direction.
    #[error("shape `{shape}`: degenerate geometry, `{key}` = {value}")]
    Degenerate {
        shape: String,
        key: String,
        value: f64,
    },
    /// A shape declares a species that has no field.
    #[error("shape `{shape}`: species `{species}` has no field")]
    SpeciesNotFound { shape: String, species: String },
    /// `set` was called before the first `calculate`.
    #[error("shape `{shape}`: masks used before calculate()")]
    UninitializedMask { shape: String },
    /// A field is not sized to the mesh.
    #[error("field `{field}` has {found} cells, expected {expected}")]
    FieldSizeMismatch {
        field: String,
        expected: usize,
        found: usize,
    },
    /// Two species fields share a name.
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    /// A cell index beyond the mesh/field size.
    #[error("cell {cell} out of range (n_cells = {n_cells})")]
    CellOutOfRange { cell: usize, n_cells: usize },
    /// Invalid mesh geometry or connectivity.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A named entry in a shape list is not a single `name: {..}` pair.
    #[error("malformed shape entry: {0}")]
    MalformedEntry(String),
    /// Configuration could not be deserialized.
    #[error("parse error: {0}")]
    Parse(String),
    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<serde_json::Error> for ShapeError {
    fn from(e: serde_json::Error) -> Self {
        ShapeError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for ShapeError {
    fn from(e: std::io::Error) -> Self {
        ShapeError::Io(e.to_string())
    }
}
