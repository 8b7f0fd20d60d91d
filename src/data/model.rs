use std::fmt;

use serde::Serialize;

use super::attributes::build_attributes;
use super::description::DatasetDescription;
use super::diagnostics::{Diagnostic, Diagnostics};
use super::mask::{assign_row_bitmasks, SetMask};
use super::sets::build_sets;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// AttributeValue – a single cell of an attribute series
// ---------------------------------------------------------------------------

/// A typed attribute cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Identifiers of the sets a row belongs to.
    Sets(Vec<SetMask>),
    /// Sentinel for a numeric cell that failed to parse.
    NotANumber,
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(i) => write!(f, "{i}"),
            AttributeValue::Float(v) => write!(f, "{v:.4}"),
            AttributeValue::Text(s) => write!(f, "{s}"),
            AttributeValue::Sets(ids) => {
                let parts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            AttributeValue::NotANumber => write!(f, "NaN"),
        }
    }
}

impl AttributeValue {
    /// Numeric view of the value; `None` for text, set lists and the NaN sentinel.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(v) if !v.is_nan() => Some(*v),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_nan(&self) -> bool {
        match self {
            AttributeValue::NotANumber => true,
            AttributeValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute – one named column of per-row values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Integer,
    Float,
    String,
    Id,
    Sets,
}

impl AttributeType {
    pub fn is_numeric(self) -> bool {
        matches!(self, AttributeType::Integer | AttributeType::Float)
    }
}

/// A per-row value series. `values.len()` always equals the dataset's row count.
#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub values: Vec<AttributeValue>,
    /// Only present for numeric attributes.
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Sort direction (+1 / -1); owned by the presentation layer.
    pub sort: i8,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeType, values: Vec<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
            min: None,
            max: None,
            sort: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Set – one binary indicator column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Set {
    /// Single-bit identifier (1, 2, 4, …) in declaration order.
    pub id: SetMask,
    pub name: String,
    /// One-hot vector over all declared sets marking this set.
    pub combined_sets: Vec<u8>,
    /// Raw membership cell per row; a row is a member when its cell is 1.
    pub membership: Vec<i64>,
    pub active: bool,
    /// Number of rows whose membership cell is 1.
    pub item_count: usize,
}

impl Set {
    /// Create the set at `position` among `set_count` declared sets.
    /// Returns `None` if `position` has no bit in a [`SetMask`].
    pub fn new(position: usize, set_count: usize, name: String, membership: Vec<i64>) -> Option<Self> {
        let id = SetMask::single(position)?;
        let mut combined_sets = vec![0u8; set_count.max(position + 1)];
        combined_sets[position] = 1;
        let item_count = membership.iter().filter(|&&cell| cell == 1).count();
        Some(Set {
            id,
            name,
            combined_sets,
            membership,
            active: false,
            item_count,
        })
    }

    pub fn contains_row(&self, row: usize) -> bool {
        self.membership.get(row) == Some(&1)
    }

    /// Row indices that belong to this set.
    pub fn items(&self) -> impl Iterator<Item = usize> + '_ {
        self.membership
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == 1)
            .map(|(row, _)| row)
    }
}

// ---------------------------------------------------------------------------
// Subset – one combination of active sets
// ---------------------------------------------------------------------------

/// Rows whose membership, restricted to the active sets, is exactly `mask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subset {
    pub mask: SetMask,
    pub items: Vec<usize>,
    pub size: usize,
    pub degree: u32,
}

impl Subset {
    pub fn new(mask: SetMask, items: Vec<usize>) -> Self {
        Subset {
            mask,
            size: items.len(),
            degree: mask.degree(),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded data model
// ---------------------------------------------------------------------------

/// Attributes, sets and row masks built from one CSV payload.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub sets: Vec<Set>,
    /// Union of member set identifiers per row.
    pub row_masks: Vec<SetMask>,
    /// Recovered per-cell and per-block problems.
    pub diagnostics: Vec<Diagnostic>,
}

impl Dataset {
    /// Build the data model from parsed rows (header already removed).
    ///
    /// Malformed cells and unsupported set blocks are recorded in
    /// `diagnostics`; only a dataset that cannot be represented at all
    /// (too many sets) is an error.
    pub fn from_rows(
        description: &DatasetDescription,
        header: &[String],
        rows: &[Vec<String>],
    ) -> Result<Self, LoadError> {
        let mut diagnostics = Diagnostics::default();

        let sets = build_sets(header, rows, description, &mut diagnostics)?;
        let row_masks = assign_row_bitmasks(&sets, rows.len());
        let attributes = build_attributes(header, rows, description, &row_masks, &mut diagnostics);

        log::debug!(
            "Built dataset '{}': {} rows, {} sets, {} attributes, {} diagnostics",
            description.name,
            rows.len(),
            sets.len(),
            attributes.len(),
            diagnostics.len()
        );

        Ok(Dataset {
            name: description.name.clone(),
            attributes,
            sets,
            row_masks,
            diagnostics: diagnostics.into_vec(),
        })
    }

    /// Number of rows (items).
    pub fn len(&self) -> usize {
        self.row_masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_masks.is_empty()
    }

    /// Every row index in the dataset.
    pub fn all_items(&self) -> std::ops::Range<usize> {
        0..self.len()
    }

    pub fn set(&self, id: SetMask) -> Option<&Set> {
        self.sets.iter().find(|s| s.id == id)
    }

    pub fn set_by_name(&self, name: &str) -> Option<&Set> {
        self.sets.iter().find(|s| s.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
