//! Dictionary: already-parsed key-value configuration data.
//!
//! Shapes are configured from a [`Dictionary`], a sorted map of keywords to
//! [`Entry`] values (scalars, 3-vectors, words, switches, lists, and nested
//! dictionaries). Dictionaries deserialize from JSON objects, so a shape list
//! can be stored as JSON:
//!
//! ```json
//! { "drop1": { "type": "sphere", "initialVolume": 4.2e-9,
//!              "initialVelocity": [0, 0, -0.1],
//!              "sphereCoeffs": { "centre": [0, 0, 0.002] } } }
//! ```
//!
//! Typed lookups go through [`Scoped`], which names the owning shape and the
//! full key path in every error.

use crate::shape_error::ShapeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// A single dictionary value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Switch(bool),
    Scalar(f64),
    Vector([f64; 3]),
    List(Vec<Entry>),
    Word(String),
    Dict(Dictionary),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Switch(_) => "switch",
            Entry::Scalar(_) => "scalar",
            Entry::Vector(_) => "vector",
            Entry::List(_) => "list",
            Entry::Word(_) => "word",
            Entry::Dict(_) => "dictionary",
        }
    }
}

impl From<f64> for Entry {
    fn from(v: f64) -> Self {
        Entry::Scalar(v)
    }
}

impl From<[f64; 3]> for Entry {
    fn from(v: [f64; 3]) -> Self {
        Entry::Vector(v)
    }
}

impl From<bool> for Entry {
    fn from(v: bool) -> Self {
        Entry::Switch(v)
    }
}

impl From<&str> for Entry {
    fn from(v: &str) -> Self {
        Entry::Word(v.to_string())
    }
}

impl From<String> for Entry {
    fn from(v: String) -> Self {
        Entry::Word(v)
    }
}

impl From<Dictionary> for Entry {
    fn from(v: Dictionary) -> Self {
        Entry::Dict(v)
    }
}

/// Sorted keyword → value map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: BTreeMap<String, Entry>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Entry>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Entry>) -> Option<Entry> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Whether `key` is present.
    pub fn found(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy every entry of `defaults` whose key is absent here.
    pub fn merge_defaults(&mut self, defaults: &Dictionary) {
        for (key, value) in &defaults.entries {
            self.entries
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Typed view naming `owner` in lookup errors.
    pub fn scoped<'a>(&'a self, owner: &'a str) -> Scoped<'a> {
        Scoped {
            owner,
            prefix: String::new(),
            dict: self,
        }
    }
}

/// Typed, error-reporting view of a [`Dictionary`].
#[derive(Clone, Debug)]
pub struct Scoped<'a> {
    owner: &'a str,
    prefix: String,
    dict: &'a Dictionary,
}

impl<'a> Scoped<'a> {
    pub fn dict(&self) -> &'a Dictionary {
        self.dict
    }

    pub fn owner(&self) -> &'a str {
        self.owner
    }

    /// Full key path, e.g. `sphereCoeffs.radius`.
    pub fn path(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    pub fn missing(&self, key: &str) -> ShapeError {
        ShapeError::MissingKey {
            shape: self.owner.to_string(),
            key: self.path(key),
        }
    }

    pub fn invalid(&self, key: &str, expected: &'static str) -> ShapeError {
        ShapeError::InvalidEntry {
            shape: self.owner.to_string(),
            key: self.path(key),
            expected,
        }
    }

    pub fn degenerate(&self, key: &str, value: f64) -> ShapeError {
        ShapeError::Degenerate {
            shape: self.owner.to_string(),
            key: self.path(key),
            value,
        }
    }

    fn require(&self, key: &str) -> Result<&'a Entry, ShapeError> {
        self.dict.get(key).ok_or_else(|| self.missing(key))
    }

    pub fn found(&self, key: &str) -> bool {
        self.dict.found(key)
    }

    /// Finite scalar.
    pub fn scalar(&self, key: &str) -> Result<f64, ShapeError> {
        match self.require(key)? {
            Entry::Scalar(v) if v.is_finite() => Ok(*v),
            _ => Err(self.invalid(key, "a finite scalar")),
        }
    }

    pub fn opt_scalar(&self, key: &str) -> Result<Option<f64>, ShapeError> {
        if self.found(key) {
            self.scalar(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Finite scalar that must be strictly positive.
    pub fn positive_scalar(&self, key: &str) -> Result<f64, ShapeError> {
        let v = self.scalar(key)?;
        if v <= 0.0 {
            return Err(self.degenerate(key, v));
        }
        Ok(v)
    }

    pub fn opt_positive_scalar(&self, key: &str) -> Result<Option<f64>, ShapeError> {
        if self.found(key) {
            self.positive_scalar(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Non-negative integer stored as a scalar.
    pub fn opt_uint(&self, key: &str) -> Result<Option<u32>, ShapeError> {
        match self.dict.get(key) {
            None => Ok(None),
            Some(Entry::Scalar(v)) if *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64 => {
                Ok(Some(*v as u32))
            }
            Some(_) => Err(self.invalid(key, "a non-negative integer")),
        }
    }

    /// Vector of three finite components.
    pub fn vector(&self, key: &str) -> Result<[f64; 3], ShapeError> {
        match self.require(key)? {
            Entry::Vector(v) if v.iter().all(|c| c.is_finite()) => Ok(*v),
            _ => Err(self.invalid(key, "a vector of three finite scalars")),
        }
    }

    pub fn word(&self, key: &str) -> Result<&'a str, ShapeError> {
        match self.require(key)? {
            Entry::Word(w) => Ok(w.as_str()),
            _ => Err(self.invalid(key, "a word")),
        }
    }

    pub fn opt_word(&self, key: &str) -> Result<Option<&'a str>, ShapeError> {
        if self.found(key) {
            self.word(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Nested dictionary as a scoped view (key paths extend with `key.`).
    pub fn sub_dict(&self, key: &str) -> Result<Scoped<'a>, ShapeError> {
        match self.require(key)? {
            Entry::Dict(d) => Ok(Scoped {
                owner: self.owner,
                prefix: format!("{}{key}.", self.prefix),
                dict: d,
            }),
            other => {
                log::debug!("`{}` holds a {}", self.path(key), other.kind());
                Err(self.invalid(key, "a dictionary"))
            }
        }
    }

    pub fn opt_sub_dict(&self, key: &str) -> Result<Option<Scoped<'a>>, ShapeError> {
        if self.found(key) {
            self.sub_dict(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Nested dictionary of finite scalars, e.g. a species composition table.
    pub fn scalar_table(&self, key: &str) -> Result<BTreeMap<String, f64>, ShapeError> {
        let sub = self.sub_dict(key)?;
        sub.dict
            .keys()
            .map(|name| -> Result<(String, f64), ShapeError> {
                Ok((name.to_string(), sub.scalar(name)?))
            })
            .collect()
    }
}

/// One named dictionary in a list of definitions, e.g. `drop1 { ... }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Dictionary>",
    into = "BTreeMap<String, Dictionary>"
)]
pub struct DictionaryEntry {
    pub keyword: String,
    pub dict: Dictionary,
}

impl DictionaryEntry {
    pub fn new(keyword: impl Into<String>, dict: Dictionary) -> Self {
        Self {
            keyword: keyword.into(),
            dict,
        }
    }
}

impl TryFrom<BTreeMap<String, Dictionary>> for DictionaryEntry {
    type Error = ShapeError;

    fn try_from(map: BTreeMap<String, Dictionary>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(ShapeError::MalformedEntry(format!(
                "expected exactly one keyword, found {}",
                map.len()
            )));
        }
        let (keyword, dict) = map
            .into_iter()
            .next()
            .ok_or_else(|| ShapeError::MalformedEntry("empty entry".into()))?;
        Ok(Self { keyword, dict })
    }
}

impl From<DictionaryEntry> for BTreeMap<String, Dictionary> {
    fn from(e: DictionaryEntry) -> Self {
        BTreeMap::from([(e.keyword, e.dict)])
    }
}

/// Reads successive named entries (`{"name": {...}}` objects separated by
/// whitespace) from a byte stream.
pub struct EntryStream<R: Read> {
    inner: serde_json::StreamDeserializer<'static, serde_json::de::IoRead<R>, DictionaryEntry>,
}

impl<R: Read> EntryStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: serde_json::Deserializer::from_reader(reader).into_iter(),
        }
    }

    /// Next entry, or `Ok(None)` at end of input.
    pub fn next_entry(&mut self) -> Result<Option<DictionaryEntry>, ShapeError> {
        self.inner.next().transpose().map_err(ShapeError::from)
    }
}

impl<R: Read> Iterator for EntryStream<R> {
    type Item = Result<DictionaryEntry, ShapeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}
