use std::num::NonZeroUsize;

use super::*;
use crate::field::Field;
use crate::model::RecordBuilder;
use crate::session::Session;
use crate::traverse::{traverse, TraversalOrder};
use pretty_assertions::assert_eq;

fn n(size: usize) -> NonZeroUsize {
    NonZeroUsize::new(size).unwrap()
}

#[test]
fn test_partition_all_keeps_short_tail() {
    let chunks: Vec<Vec<i32>> = (1..=7).partition_all(n(3)).collect();
    assert_eq!(chunks, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7]]);

    let empty: Vec<Vec<i32>> = std::iter::empty().partition_all(n(2)).collect();
    assert!(empty.is_empty());
}

#[test]
fn test_partition_exact_drops_or_pads_tail() {
    let dropped: Vec<Vec<i32>> = (1..=7).partition_exact(n(3), None).collect();
    assert_eq!(dropped, vec![vec![1, 2, 3], vec![4, 5, 6]]);

    let padded: Vec<Vec<i32>> = (1..=7).partition_exact(n(3), Some(0)).collect();
    assert_eq!(padded, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 0, 0]]);

    let exact: Vec<Vec<i32>> = (1..=6).partition_exact(n(2), Some(0)).collect();
    assert_eq!(exact, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
}

#[test]
fn test_take_nth() {
    let picked: Vec<i32> = (0..10).take_nth(n(3)).collect();
    assert_eq!(picked, vec![0, 3, 6, 9]);
    let all: Vec<i32> = (0..3).take_nth(n(1)).collect();
    assert_eq!(all, vec![0, 1, 2]);
}

#[test]
fn test_diff_stops_at_shorter() {
    let pairs: Vec<(i32, i32)> = vec![1, 2, 3, 4].into_iter().diff(vec![1, 5, 3], None).collect();
    assert_eq!(pairs, vec![(2, 5)]);
}

#[test]
fn test_diff_with_default_pads() {
    let pairs: Vec<(i32, i32)> = vec![1, 2, 3, 4].into_iter().diff(vec![1, 5, 3], Some(0)).collect();
    assert_eq!(pairs, vec![(2, 5), (4, 0)]);

    let pairs: Vec<(i32, i32)> = vec![1].into_iter().diff(vec![1, 2], Some(0)).collect();
    assert_eq!(pairs, vec![(0, 2)]);

    let same: Vec<(i32, i32)> = vec![1, 2].into_iter().diff(vec![1, 2], Some(0)).collect();
    assert!(same.is_empty());
}

#[test]
fn test_tree_items() {
    let session = Session::shared();
    let leaf = RecordBuilder::node(&session, "Leaf")
        .field(Field::new("name", TypeDesc::str()))
        .build()
        .unwrap();
    let pair = RecordBuilder::node(&session, "Pair")
        .field(Field::new("left", TypeDesc::record(&leaf)))
        .field(Field::new("right", TypeDesc::record(&leaf)))
        .build()
        .unwrap();
    let mk = |name: &str| Value::from(leaf.construct([("name", Value::from(name))]).unwrap());
    let root = pair
        .construct([("left", mk("a")), ("right", mk("b"))])
        .unwrap();

    let records: Vec<&str> = traverse(&root, TraversalOrder::PreOrder)
        .records()
        .map(Record::type_name)
        .collect();
    assert_eq!(records, ["Pair", "Leaf", "Leaf"]);

    let leaves = traverse(&root, TraversalOrder::PreOrder).instances_of(&leaf).count();
    assert_eq!(leaves, 2);

    let names: Vec<&Value> = traverse(&root, TraversalOrder::PreOrder).pluck("name").collect();
    assert_eq!(names, [&Value::from("a"), &Value::from("b")]);

    let strings = traverse(&root, TraversalOrder::PreOrder)
        .of_type(&TypeDesc::str())
        .count();
    assert_eq!(strings, 2);
}
