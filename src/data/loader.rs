use std::path::{Path, PathBuf};

use rayon::prelude::*;

use super::description::DatasetDescription;
use super::model::Dataset;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Dataset catalog
// ---------------------------------------------------------------------------

/// The dataset list and every description it references.
///
/// The list is a JSON array of description paths relative to the list file:
///
/// ```json
/// ["data/movies/movies.json", "data/mutations/gbm.json"]
/// ```
#[derive(Debug, Clone)]
pub struct DatasetCatalog {
    pub path: PathBuf,
    pub descriptions: Vec<DatasetDescription>,
}

impl DatasetCatalog {
    /// Read the dataset list and all descriptions.
    ///
    /// Descriptions are loaded concurrently; if any one fails the whole
    /// catalog fails and nothing is returned.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::ReadCatalog {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<PathBuf> = serde_json::from_str(&text).map_err(|source| LoadError::ParseCatalog {
            path: path.to_path_buf(),
            source,
        })?;
        if entries.is_empty() {
            return Err(LoadError::EmptyCatalog {
                path: path.to_path_buf(),
            });
        }

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let descriptions = entries
            .par_iter()
            .map(|entry| {
                log::info!("Loading {}", entry.display());
                load_description(&base.join(entry))
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Loaded {} dataset descriptions from {}", descriptions.len(), path.display());
        Ok(DatasetCatalog {
            path: path.to_path_buf(),
            descriptions,
        })
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Picker labels, one per dataset.
    pub fn labels(&self) -> Vec<String> {
        self.descriptions.iter().map(DatasetDescription::label).collect()
    }

    /// Read and build the dataset at `index`.
    pub fn load_dataset(&self, index: usize) -> Result<Dataset, LoadError> {
        let description = self.descriptions.get(index).ok_or(LoadError::DatasetIndex {
            index,
            available: self.descriptions.len(),
        })?;
        load_dataset(description)
    }
}

/// Read one description and resolve its `file` against the description's directory.
pub fn load_description(path: &Path) -> Result<DatasetDescription, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::ReadDescription {
        path: path.to_path_buf(),
        source,
    })?;
    let mut description: DatasetDescription =
        serde_json::from_str(&text).map_err(|source| LoadError::ParseDescription {
            path: path.to_path_buf(),
            source,
        })?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    description.file = dir.join(&description.file);
    Ok(description)
}

// ---------------------------------------------------------------------------
// CSV payload
// ---------------------------------------------------------------------------

/// Read the CSV payload of `description`, split off the header row and
/// build the data model.
pub fn load_dataset(description: &DatasetDescription) -> Result<Dataset, LoadError> {
    let (header, rows) = read_rows(description)?;
    Dataset::from_rows(description, &header, &rows)
}

/// Returns `(header, data rows)`.
fn read_rows(description: &DatasetDescription) -> Result<(Vec<String>, Vec<Vec<String>>), LoadError> {
    let path = &description.file;
    let delimiter = u8::try_from(description.separator)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| LoadError::InvalidSeparator {
            path: path.clone(),
            separator: description.separator,
        })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| LoadError::ReadPayload {
            path: path.clone(),
            source,
        })?;

    let mut rows = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|source| LoadError::ParsePayload {
            path: path.clone(),
            row,
            source,
        })?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    if description.header >= rows.len() {
        return Err(LoadError::MissingHeader {
            path: path.clone(),
            header: description.header,
            rows: rows.len(),
        });
    }
    let header = rows.remove(description.header);

    log::debug!("Read {} data rows from {}", rows.len(), path.display());
    Ok((header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn header_row_is_split_off() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("d.csv");
        fs::write(&csv_path, "# comment\nid;A;B\nr0;1;0\nr1;0;1\n").unwrap();
        let description = DatasetDescription {
            name: "d".into(),
            file: csv_path,
            separator: ';',
            header: 1,
            sets: Vec::new(),
            meta: Vec::new(),
        };

        let (header, rows) = read_rows(&description).unwrap();

        assert_eq!(header, vec!["id", "A", "B"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], vec!["# comment"]);
        assert_eq!(rows[2], vec!["r1", "0", "1"]);
    }

    #[test]
    fn missing_header_is_a_load_failure() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("d.csv");
        fs::write(&csv_path, "").unwrap();
        let description = DatasetDescription {
            name: "d".into(),
            file: csv_path,
            separator: ',',
            header: 0,
            sets: Vec::new(),
            meta: Vec::new(),
        };

        let err = load_dataset(&description).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader { rows: 0, .. }));
    }

    #[test]
    fn undecodable_record_is_a_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("d.csv");
        fs::write(&csv_path, b"id,A\nr0,1\nr1,\xff\xfe\n").unwrap();
        let description = DatasetDescription {
            name: "d".into(),
            file: csv_path,
            separator: ',',
            header: 0,
            sets: Vec::new(),
            meta: Vec::new(),
        };

        let err = load_dataset(&description).unwrap_err();
        assert!(matches!(err, LoadError::ParsePayload { row: 2, .. }), "{err:?}");
    }

    #[test]
    fn multibyte_separator_is_rejected() {
        let description = DatasetDescription {
            name: "d".into(),
            file: PathBuf::from("unused.csv"),
            separator: '§',
            header: 0,
            sets: Vec::new(),
            meta: Vec::new(),
        };
        let err = load_dataset(&description).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSeparator { separator: '§', .. }));
    }
}
