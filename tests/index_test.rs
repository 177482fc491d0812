//! Query behavior of TreeIndex on the canonical eight-record fixture.
//!
//!   1
//!   ├── 2
//!   │   ├── 4
//!   │   │   ├── 7
//!   │   │   └── 8
//!   │   ├── 5
//!   │   └── 6
//!   └── 3

use rstest::{fixture, rstest};
use serde_json::json;

use treestore::domain::{DomainError, Record, RecordId, TreeIndex};
use treestore::util::testing;

fn canonical_records() -> Vec<Record> {
    vec![
        Record::new(1, "root"),
        Record::new(2, 1).with_field("type", "test"),
        Record::new(3, 1).with_field("type", "test"),
        Record::new(4, 2).with_field("type", "test"),
        Record::new(5, 2).with_field("type", "test"),
        Record::new(6, 2).with_field("type", "test"),
        Record::new(7, 4).with_field("type", json!(null)),
        Record::new(8, 4).with_field("type", json!(null)),
    ]
}

#[fixture]
fn index() -> TreeIndex {
    testing::init_test_setup();
    TreeIndex::new(canonical_records()).expect("canonical fixture builds")
}

fn ids(records: &[&Record]) -> Vec<i64> {
    records
        .iter()
        .map(|r| match r.id {
            RecordId::Int(n) => n,
            RecordId::Str(ref s) => panic!("unexpected string id {}", s),
        })
        .collect()
}

// ============================================================
// get_all / get_item
// ============================================================

#[rstest]
fn given_index_when_get_all_then_returns_input_verbatim(index: TreeIndex) {
    assert_eq!(index.get_all(), canonical_records().as_slice());
    assert_eq!(index.len(), 8);
    assert!(!index.is_empty());
}

#[rstest]
fn given_index_when_get_item_then_returns_record_with_that_id(index: TreeIndex) {
    for n in 1..=8 {
        let record = index.get_item(&RecordId::Int(n)).unwrap();
        assert_eq!(record.id, RecordId::Int(n));
    }
    assert_eq!(
        index.get_item(&RecordId::Int(7)).unwrap().payload.get("type"),
        Some(&json!(null))
    );
}

#[rstest]
#[case(RecordId::Int(0))]
#[case(RecordId::Int(9))]
#[case(RecordId::from("1"))]
fn given_unknown_id_when_get_item_then_not_found(index: TreeIndex, #[case] id: RecordId) {
    assert_eq!(index.get_item(&id), Err(DomainError::NotFound(id.clone())));
}

#[test]
fn given_non_contiguous_ids_when_get_item_then_looks_up_by_id_not_position() {
    let index = TreeIndex::new(vec![
        Record::new(10, "root"),
        Record::new(30, 10),
        Record::new(20, 10),
    ])
    .unwrap();

    assert_eq!(index.get_item(&RecordId::Int(20)).unwrap().parent, RecordId::Int(10));
    assert_eq!(index.get_item_at(2).unwrap().id, RecordId::Int(30));
    assert!(index.get_item(&RecordId::Int(2)).is_err());
}

// ============================================================
// get_children
// ============================================================

#[rstest]
#[case(1, vec![2, 3])]
#[case(2, vec![4, 5, 6])]
#[case(4, vec![7, 8])]
#[case(3, vec![])]
#[case(5, vec![])]
#[case(8, vec![])]
#[case(42, vec![])]
fn given_id_when_get_children_then_returns_direct_children_in_input_order(
    index: TreeIndex,
    #[case] id: i64,
    #[case] expected: Vec<i64>,
) {
    assert_eq!(ids(&index.get_children(&RecordId::Int(id))), expected);
}

#[rstest]
fn given_every_non_root_record_when_get_children_of_its_parent_then_it_is_included(
    index: TreeIndex,
) {
    for record in &index.get_all()[1..] {
        let children = index.get_children(&record.parent);
        assert!(
            children.iter().any(|child| child.id == record.id),
            "record {} missing from children of {}",
            record.id,
            record.parent
        );
    }
}

// ============================================================
// get_all_parents
// ============================================================

#[rstest]
#[case(7, vec![4, 2, 1])]
#[case(8, vec![4, 2, 1])]
#[case(5, vec![2, 1])]
#[case(3, vec![1])]
#[case(2, vec![1])]
fn given_id_when_get_all_parents_then_returns_chain_parent_first(
    index: TreeIndex,
    #[case] id: i64,
    #[case] expected: Vec<i64>,
) {
    assert_eq!(ids(&index.get_all_parents(&RecordId::Int(id))), expected);
}

#[rstest]
fn given_root_when_get_all_parents_then_empty(index: TreeIndex) {
    assert!(index.get_all_parents(&RecordId::Int(1)).is_empty());
}

#[rstest]
#[case(RecordId::Int(42))]
#[case(RecordId::from("root"))]
fn given_unknown_id_when_get_all_parents_then_only_root(index: TreeIndex, #[case] id: RecordId) {
    let parents = index.get_all_parents(&id);
    assert_eq!(parents.len(), 1);
    assert_eq!(parents[0], index.root());
}

#[rstest]
fn given_every_non_root_record_when_get_all_parents_then_chain_ends_at_root(index: TreeIndex) {
    for record in &index.get_all()[1..] {
        let chain = index.get_all_parents(&record.id);
        assert_eq!(chain.first().map(|r| &r.id), Some(&record.parent));
        assert_eq!(chain.last().copied(), Some(index.root()));
    }
}

// ============================================================
// Idempotence and structure
// ============================================================

#[rstest]
fn given_index_when_queries_repeat_then_results_are_equal(index: TreeIndex) {
    for n in [1, 2, 4, 7, 99] {
        let id = RecordId::Int(n);
        assert_eq!(index.get_children(&id), index.get_children(&id));
        assert_eq!(index.get_all_parents(&id), index.get_all_parents(&id));
        assert_eq!(index.get_item(&id), index.get_item(&id));
    }
    assert_eq!(index.get_all(), canonical_records().as_slice());
}

#[rstest]
fn given_index_then_depth_leaves_and_no_orphans(index: TreeIndex) {
    assert_eq!(index.depth(), 4);
    assert_eq!(ids(&index.leaves()), vec![7, 8, 5, 6, 3]);
    assert!(index.orphans().is_empty());
    assert_eq!(index.tree().len(), 8);
}

#[test]
fn given_shared_index_when_queried_from_threads_then_results_match() {
    let index = TreeIndex::new(canonical_records()).unwrap();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                assert_eq!(ids(&index.get_all_parents(&RecordId::Int(7))), vec![4, 2, 1]);
                assert_eq!(ids(&index.get_children(&RecordId::Int(2))), vec![4, 5, 6]);
            });
        }
    });
}

#[test]
fn given_string_ids_when_querying_then_works_like_integers() {
    let index = TreeIndex::new(vec![
        Record::new("eu", "root"),
        Record::new("de", "eu"),
        Record::new("berlin", "de"),
        Record::new("fr", "eu"),
    ])
    .unwrap();

    let chain: Vec<_> = index
        .get_all_parents(&RecordId::from("berlin"))
        .iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(chain, vec!["de", "eu"]);

    let children: Vec<_> = index
        .get_children(&RecordId::from("eu"))
        .iter()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(children, vec!["de", "fr"]);
}
