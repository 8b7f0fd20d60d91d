//! End-to-end tests from parsed rows to subsets.

use std::collections::HashSet;
use std::path::PathBuf;

use upset_data::{
    AttributeType, AttributeValue, Dataset, DatasetDescription, DiagnosticKind, MetaDefinition, MetaType,
    Session, SessionConfig, SetBlock, SetMask,
};

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// id, score, and three indicator columns A, B, C.
fn example_dataset() -> Dataset {
    let description = DatasetDescription {
        name: "example".into(),
        file: PathBuf::from("example.csv"),
        separator: ',',
        header: 0,
        sets: vec![SetBlock {
            format: "binary".into(),
            start: 2,
            end: 4,
        }],
        meta: vec![
            MetaDefinition {
                name: None,
                kind: MetaType::Id,
                index: 0,
                min: None,
                max: None,
            },
            MetaDefinition {
                name: None,
                kind: MetaType::Integer,
                index: 1,
                min: None,
                max: None,
            },
        ],
    };
    let header = strings(&["id", "score", "A", "B", "C"]);
    let rows = vec![
        strings(&["r0", "10", "1", "0", "0"]),
        strings(&["r1", "oops", "1", "1", "0"]),
        strings(&["r2", "30", "0", "1", "1"]),
        strings(&["r3", "40", "0", "0", "0"]),
        strings(&["r4", "50", "1", "1", "1"]),
    ];
    Dataset::from_rows(&description, &header, &rows).unwrap()
}

fn items_by_mask(session: &mut Session) -> Vec<(u64, Vec<usize>)> {
    session
        .subsets()
        .iter()
        .map(|s| (s.mask.bits(), s.items.clone()))
        .collect()
}

#[test]
fn every_attribute_covers_every_row() {
    let dataset = example_dataset();
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.attributes.len(), 4);
    for attribute in &dataset.attributes {
        assert_eq!(attribute.values.len(), dataset.len(), "{}", attribute.name);
    }
    assert_eq!(dataset.attributes[2].kind, AttributeType::Integer);
    assert_eq!(dataset.attributes[3].kind, AttributeType::Sets);
}

#[test]
fn row_masks_round_trip_to_set_lists() {
    let dataset = example_dataset();
    let masks: Vec<u64> = dataset.row_masks.iter().map(|m| m.bits()).collect();
    assert_eq!(masks, vec![1, 3, 6, 0, 7]);

    let set_lists = &dataset.attributes[3].values;
    for (row, mask) in dataset.row_masks.iter().enumerate() {
        let expected: SetMask = dataset
            .sets
            .iter()
            .filter(|s| s.contains_row(row))
            .map(|s| s.id)
            .collect();
        assert_eq!(*mask, expected);
        assert_eq!(set_lists[row], AttributeValue::Sets(mask.singles().collect()));
    }
}

#[test]
fn malformed_meta_cell_does_not_abort_the_load() {
    let dataset = example_dataset();
    let score = &dataset.attributes[1];
    assert_eq!(score.values[1], AttributeValue::NotANumber);
    assert_eq!(score.values[4], AttributeValue::Integer(50));
    assert_eq!((score.min, score.max), (Some(10.0), Some(50.0)));

    assert_eq!(dataset.diagnostics.len(), 1);
    let diagnostic = &dataset.diagnostics[0];
    assert_eq!(diagnostic.kind, DiagnosticKind::MalformedValue);
    assert_eq!((diagnostic.row, diagnostic.column), (Some(1), Some(1)));
    assert_eq!(diagnostic.raw, "oops");
}

#[test]
fn all_three_sets_active() {
    let mut session = Session::new(example_dataset(), SessionConfig::default());
    assert_eq!(
        items_by_mask(&mut session),
        vec![
            (1, vec![0]),
            (2, vec![]),
            (3, vec![1]),
            (4, vec![]),
            (5, vec![]),
            (6, vec![2]),
            (7, vec![4]),
        ]
    );
    let degrees: Vec<u32> = session.subsets().iter().map(|s| s.degree).collect();
    assert_eq!(degrees, vec![1, 1, 2, 1, 2, 2, 3]);
}

#[test]
fn deactivating_a_set_recomputes_with_remaining_bits() {
    let mut session = Session::new(example_dataset(), SessionConfig::default());
    session.subsets();
    session.toggle_set(SetMask::from_bits(2)).unwrap();

    // Remaining active sets: A (1) and C (4).
    assert_eq!(
        items_by_mask(&mut session),
        vec![(1, vec![0, 1]), (4, vec![2]), (5, vec![4])]
    );
}

#[test]
fn subsets_partition_rows_with_active_membership() {
    let mut session = Session::new(example_dataset(), SessionConfig::default());
    let selections: [&[u64]; 4] = [&[], &[1], &[2, 4], &[1, 2, 4]];

    for selection in selections {
        for set in session.sets().iter().map(|s| (s.id, s.active)).collect::<Vec<_>>() {
            let want = selection.contains(&set.0.bits());
            if set.1 != want {
                session.toggle_set(set.0).unwrap();
            }
        }
        let scope: SetMask = session.active_ids().iter().copied().collect();
        let expected_rows: HashSet<usize> = session
            .dataset()
            .row_masks
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.restrict(scope).is_empty())
            .map(|(row, _)| row)
            .collect();

        let n = session.active_ids().len();
        let subsets = session.subsets().to_vec();
        assert_eq!(subsets.len(), (1usize << n) - 1);

        let mut seen = HashSet::new();
        for subset in &subsets {
            for row in &subset.items {
                assert!(seen.insert(*row), "row {row} in two combinations");
            }
        }
        assert_eq!(seen, expected_rows);
    }
}

#[test]
fn enumeration_is_idempotent() {
    let mut session = Session::new(example_dataset(), SessionConfig::default());
    let first = session.subsets().to_vec();
    let request = session.begin_enumeration();
    let second = request.run(session.dataset());
    assert_eq!(first, second);
}

#[test]
fn no_active_sets_is_not_an_error() {
    let config = SessionConfig {
        default_active_sets: 0,
        ..SessionConfig::default()
    };
    let mut session = Session::new(example_dataset(), config);
    assert!(session.subsets().is_empty());
}
