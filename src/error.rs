use std::path::PathBuf;

use crate::data::mask::SetMask;

/// A load that could not complete. No dataset is committed when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unable to read dataset list {path}")]
    ReadCatalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse dataset list {path}")]
    ParseCatalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset list {path} is empty")]
    EmptyCatalog { path: PathBuf },

    #[error("unable to read dataset description {path}")]
    ReadDescription {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse dataset description {path}")]
    ParseDescription {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to read data file {path}")]
    ReadPayload {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unable to parse data file {path} at row {row}")]
    ParsePayload {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("separator {separator:?} of {path} is not a single-byte character")]
    InvalidSeparator { path: PathBuf, separator: char },

    #[error("data file {path} has no header row {header} ({rows} rows)")]
    MissingHeader {
        path: PathBuf,
        header: usize,
        rows: usize,
    },

    #[error("{count} sets declared, at most {max} are supported")]
    TooManySets { count: usize, max: usize },

    #[error("no dataset at index {index} ({available} available)")]
    DatasetIndex { index: usize, available: usize },
}

/// A rejected change to the active-set selection.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no set with identifier {0}")]
    UnknownSet(SetMask),

    #[error("cannot activate more than {max} sets")]
    TooManyActiveSets { max: usize },

    #[error("{0} is not supported")]
    Unsupported(&'static str),
}
