//! Named result field store
//!
//! Solved bodies expose their results (freestream, circulations, velocities,
//! pressure coefficients, forces) as named fields. The store is a small
//! association list keyed by name: insertion order is preserved so exported
//! output is deterministic, and readers treat the data as immutable views.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Payload of a field: per-entry scalars or 3-vectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FieldData {
    /// One scalar per entry
    Scalar(Array1<f64>),
    /// One 3-vector per entry, `(n, 3)`
    Vector(Array2<f64>),
}

impl FieldData {
    /// Number of entries
    pub fn len(&self) -> usize {
        match self {
            FieldData::Scalar(v) => v.len(),
            FieldData::Vector(m) => m.nrows(),
        }
    }

    /// True when the field holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar payload, if this is a scalar field
    pub fn as_scalar(&self) -> Option<&Array1<f64>> {
        match self {
            FieldData::Scalar(v) => Some(v),
            FieldData::Vector(_) => None,
        }
    }

    /// Vector payload, if this is a vector field
    pub fn as_vector(&self) -> Option<&Array2<f64>> {
        match self {
            FieldData::Vector(m) => Some(m),
            FieldData::Scalar(_) => None,
        }
    }
}

/// Where a field's entries live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldLocation {
    /// One entry per panel
    Cell,
    /// One entry per mesh node
    Node,
    /// Entries attached to the body as a whole (e.g. wake directions,
    /// integrated forces)
    System,
}

/// A named field record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Field name (e.g. `Gamma`, `Cp`, `Ftot`)
    pub name: String,
    /// Field payload
    pub data: FieldData,
    /// Where the entries live
    pub location: FieldLocation,
}

/// Insertion-ordered collection of named fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldStore {
    entries: Vec<FieldEntry>,
}

impl FieldStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field
    ///
    /// Overwriting keeps the field's original position in the insertion
    /// order.
    pub fn add_field(&mut self, name: &str, data: FieldData, location: FieldLocation) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
            entry.data = data;
            entry.location = location;
        } else {
            self.entries.push(FieldEntry {
                name: name.to_string(),
                data,
                location,
            });
        }
    }

    /// Look up a field by name
    pub fn get_field(&self, name: &str) -> Option<&FieldEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// True if a field with this name exists
    pub fn check_field(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Field names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of stored fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no fields are stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
