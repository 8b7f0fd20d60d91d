use std::path::PathBuf;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Dataset description (the per-dataset JSON file)
// ---------------------------------------------------------------------------

/// Describes how to read one CSV payload.
///
/// ```json
/// {
///   "name": "Movies",
///   "file": "movies.csv",
///   "separator": ";",
///   "header": 0,
///   "sets": [ { "format": "binary", "start": 2, "end": 18 } ],
///   "meta": [ { "type": "id", "index": 0 }, { "type": "integer", "index": 1 } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetDescription {
    pub name: String,
    /// Payload path; resolved against the description's directory by the loader.
    pub file: PathBuf,
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Index of the row holding column names.
    #[serde(default)]
    pub header: usize,
    #[serde(default)]
    pub sets: Vec<SetBlock>,
    #[serde(default)]
    pub meta: Vec<MetaDefinition>,
}

fn default_separator() -> char {
    ','
}

/// A contiguous, inclusive range of indicator columns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetBlock {
    pub format: String,
    pub start: usize,
    pub end: usize,
}

impl SetBlock {
    pub const BINARY: &'static str = "binary";

    pub fn is_binary(&self) -> bool {
        self.format == Self::BINARY
    }

    /// Number of columns in the range (0 when `start > end`).
    pub fn width(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            self.end - self.start + 1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaType {
    Integer,
    Float,
    String,
    Id,
    /// Anything else is passed through as text.
    #[serde(other)]
    Other,
}

/// One declared attribute column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetaDefinition {
    /// Defaults to the header cell of `index`.
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: MetaType,
    pub index: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl DatasetDescription {
    /// Number of sets declared across supported blocks.
    pub fn set_count(&self) -> usize {
        self.sets
            .iter()
            .filter(|block| {
                if !block.is_binary() {
                    log::warn!("Set definition format \"{}\" not supported", block.format);
                }
                block.is_binary()
            })
            .map(SetBlock::width)
            .sum()
    }

    pub fn attribute_count(&self) -> usize {
        self.meta.len()
    }

    /// Column of the first `id` attribute; column 0 when none is declared.
    pub fn id_column(&self) -> usize {
        self.meta
            .iter()
            .find(|m| m.kind == MetaType::Id)
            .map_or(0, |m| m.index)
    }

    /// Human-readable entry for dataset pickers.
    pub fn label(&self) -> String {
        format!(
            "{} ({} sets, {} attributes)",
            self.name,
            self.set_count(),
            self.attribute_count()
        )
    }
}
