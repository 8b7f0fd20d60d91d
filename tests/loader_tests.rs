//! Catalog and payload loading from disk.

use std::fs;
use std::path::Path;

use upset_data::{DatasetCatalog, DiagnosticKind, LoadError, Session, SessionConfig};

const DESCRIPTION: &str = r#"{
    "name": "Genes",
    "file": "genes.csv",
    "separator": ";",
    "header": 0,
    "sets": [
        { "format": "binary", "start": 2, "end": 3 },
        { "format": "list", "start": 4, "end": 4 },
        { "format": "binary", "start": 5, "end": 5 }
    ],
    "meta": [
        { "type": "id", "index": 0 },
        { "name": "Expression", "type": "float", "index": 1, "min": 0 }
    ]
}"#;

const PAYLOAD: &str = "gene;expr;Brain;Liver;tags;Heart
g1;2.5;1;0;x,y;1
g2;0.75;1;1;;0
g3;n/a;0;0;z;1
";

fn write_fixture(dir: &Path) {
    fs::create_dir_all(dir.join("genes")).unwrap();
    fs::write(dir.join("genes/genes.json"), DESCRIPTION).unwrap();
    fs::write(dir.join("genes/genes.csv"), PAYLOAD).unwrap();
    fs::write(dir.join("datasets.json"), r#"["genes/genes.json"]"#).unwrap();
}

#[test]
fn loads_catalog_and_dataset() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());

    let catalog = DatasetCatalog::load(&dir.path().join("datasets.json")).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.labels(), vec!["Genes (3 sets, 2 attributes)"]);
    assert_eq!(catalog.descriptions[0].file, dir.path().join("genes").join("genes.csv"));
    assert_eq!(catalog.descriptions[0].id_column(), 0);

    let dataset = catalog.load_dataset(0).unwrap();
    assert_eq!(dataset.len(), 3);
    let names: Vec<&str> = dataset.sets.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Brain", "Liver", "Heart"]);
    let ids: Vec<u64> = dataset.sets.iter().map(|s| s.id.bits()).collect();
    assert_eq!(ids, vec![1, 2, 4]);
    assert_eq!(dataset.all_items().collect::<Vec<_>>(), vec![0, 1, 2]);

    let expression = dataset.attribute("Expression").unwrap();
    assert_eq!((expression.min, expression.max), (Some(0.0), Some(2.5)));

    let kinds: Vec<DiagnosticKind> = dataset.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DiagnosticKind::UnsupportedSetFormat, DiagnosticKind::MalformedValue]);

    let mut session = Session::new(dataset, SessionConfig::default());
    let sizes: Vec<(u64, usize)> = session.subsets().iter().map(|s| (s.mask.bits(), s.size)).collect();
    assert_eq!(sizes, vec![(1, 0), (2, 0), (3, 1), (4, 1), (5, 1), (6, 0), (7, 0)]);
}

#[test]
fn one_bad_description_fails_the_whole_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(
        dir.path().join("datasets.json"),
        r#"["genes/genes.json", "broken.json"]"#,
    )
    .unwrap();

    let err = DatasetCatalog::load(&dir.path().join("datasets.json")).unwrap_err();
    match err {
        LoadError::ParseDescription { path, .. } => assert!(path.ends_with("broken.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_resources_name_the_resource() {
    let dir = tempfile::tempdir().unwrap();

    let err = DatasetCatalog::load(&dir.path().join("datasets.json")).unwrap_err();
    assert!(matches!(err, LoadError::ReadCatalog { .. }));

    fs::write(dir.path().join("datasets.json"), "[]").unwrap();
    let err = DatasetCatalog::load(&dir.path().join("datasets.json")).unwrap_err();
    assert!(matches!(err, LoadError::EmptyCatalog { .. }));

    write_fixture(dir.path());
    fs::remove_file(dir.path().join("genes/genes.csv")).unwrap();
    let catalog = DatasetCatalog::load(&dir.path().join("datasets.json")).unwrap();
    assert!(matches!(catalog.load_dataset(0), Err(LoadError::ReadPayload { .. })));
    assert!(matches!(
        catalog.load_dataset(3),
        Err(LoadError::DatasetIndex { index: 3, available: 1 })
    ));
}

#[test]
fn failed_switch_leaves_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let catalog = DatasetCatalog::load(&dir.path().join("datasets.json")).unwrap();
    let mut session = Session::new(catalog.load_dataset(0).unwrap(), SessionConfig::default());
    let generation = session.generation();

    fs::remove_file(dir.path().join("genes/genes.csv")).unwrap();
    if let Ok(dataset) = catalog.load_dataset(0) {
        session.replace_dataset(dataset);
    }

    assert_eq!(session.generation(), generation);
    assert_eq!(session.dataset().name, "Genes");
    assert_eq!(session.sets().len(), 3);
}
