//! Run configuration: active fields, background state, and the shape list.
//!
//! ```json
//! {
//!   "species": ["H2OL", "H2O", "N2"],
//!   "thermal": true,
//!   "background": { "temperature": 300.0, "species": { "N2": 1.0 } },
//!   "mask": { "mode": "volumeFraction", "depth": 4 },
//!   "volumeTolerance": 0.05,
//!   "shapes": [ { "drop1": { "type": "sphere", ... } } ]
//! }
//! ```

use crate::dictionary::{Dictionary, DictionaryEntry};
use crate::initializer::{DEFAULT_VOLUME_TOLERANCE, InitFields};
use crate::mask::MaskOptions;
use crate::mesh::CellMesh;
use crate::shape_error::ShapeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Field values before any shape is applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Background {
    pub alpha: f64,
    pub velocity: [f64; 3],
    pub temperature: f64,
    /// Species not listed start at zero.
    pub species: BTreeMap<String, f64>,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            velocity: [0.0; 3],
            temperature: 300.0,
            species: BTreeMap::new(),
        }
    }
}

fn default_volume_tolerance() -> f64 {
    DEFAULT_VOLUME_TOLERANCE
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFieldsConfig {
    /// Names of the species fields to allocate.
    #[serde(default)]
    pub species: Vec<String>,
    /// Whether a temperature field is active.
    #[serde(default)]
    pub thermal: bool,
    #[serde(default)]
    pub background: Background,
    /// Mask defaults, merged per key: a shape keeps its own `maskMode` or
    /// `maskDepth` and takes the configured value for whichever it omits.
    #[serde(default)]
    pub mask: MaskOptions,
    #[serde(default = "default_volume_tolerance")]
    pub volume_tolerance: f64,
    #[serde(default)]
    pub shapes: Vec<DictionaryEntry>,
}

impl Default for SetFieldsConfig {
    fn default() -> Self {
        Self {
            species: Vec::new(),
            thermal: false,
            background: Background::default(),
            mask: MaskOptions::default(),
            volume_tolerance: DEFAULT_VOLUME_TOLERANCE,
            shapes: Vec::new(),
        }
    }
}

impl SetFieldsConfig {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ShapeError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ShapeError> {
        let path = path.as_ref();
        log::debug!("reading configuration from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Allocate the fields for `mesh` and fill them with the background.
    ///
    /// # Errors
    /// `SpeciesNotFound` (with shape `background`) for a background species
    /// not listed in `species`, `DuplicateField` for a repeated species name.
    pub fn build_fields(&self, mesh: &dyn CellMesh) -> Result<InitFields, ShapeError> {
        let mut fields = InitFields::new(mesh, self.species.iter().cloned(), self.thermal)?;
        fields.alpha.fill(self.background.alpha);
        fields.velocity.fill(self.background.velocity);
        if let Some(t) = fields.temperature.as_mut() {
            t.fill(self.background.temperature);
        }
        for (name, value) in &self.background.species {
            fields
                .species
                .get_mut(name)
                .ok_or_else(|| ShapeError::SpeciesNotFound {
                    shape: "background".into(),
                    species: name.clone(),
                })?
                .fill(*value);
        }
        Ok(fields)
    }

    /// Shape entries with the configured mask defaults merged in.
    pub fn shape_entries(&self) -> Vec<DictionaryEntry> {
        let defaults = Dictionary::new()
            .with("maskMode", self.mask.mode.as_str())
            .with("maskDepth", f64::from(self.mask.depth));
        self.shapes
            .iter()
            .cloned()
            .map(|mut entry| {
                entry.dict.merge_defaults(&defaults);
                entry
            })
            .collect()
    }
}

impl FromStr for SetFieldsConfig {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}
