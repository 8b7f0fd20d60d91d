use std::fmt;

use serde::Serialize;

/// What went wrong with a cell or a set block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// A cell could not be parsed to its declared type.
    MalformedValue,
    /// A set block names a format other than `binary`.
    UnsupportedSetFormat,
    /// A set block's `start` lies after its `end`.
    InvalidSetRange,
}

/// A recovered, non-fatal load problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub row: Option<usize>,
    pub column: Option<usize>,
    /// Offending cell or format tag.
    pub raw: String,
}

impl Diagnostic {
    pub fn malformed(row: usize, column: usize, raw: &str) -> Self {
        Diagnostic {
            kind: DiagnosticKind::MalformedValue,
            row: Some(row),
            column: Some(column),
            raw: raw.to_string(),
        }
    }

    pub fn unsupported_format(start: usize, format: &str) -> Self {
        Diagnostic {
            kind: DiagnosticKind::UnsupportedSetFormat,
            row: None,
            column: Some(start),
            raw: format.to_string(),
        }
    }

    pub fn invalid_range(start: usize, end: usize) -> Self {
        Diagnostic {
            kind: DiagnosticKind::InvalidSetRange,
            row: None,
            column: Some(start),
            raw: format!("{start}..={end}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::MalformedValue => write!(f, "Unable to convert \"{}\"", self.raw)?,
            DiagnosticKind::UnsupportedSetFormat => {
                write!(f, "Set definition format \"{}\" not supported", self.raw)?
            }
            DiagnosticKind::InvalidSetRange => write!(f, "Empty set column range {}", self.raw)?,
        }
        match (self.row, self.column) {
            (Some(row), Some(col)) => write!(f, " (row {row}, column {col})"),
            (None, Some(col)) => write!(f, " (column {col})"),
            _ => Ok(()),
        }
    }
}

/// Accumulates diagnostics during a load, logging each as it arrives.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
