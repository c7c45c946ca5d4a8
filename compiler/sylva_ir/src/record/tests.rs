use std::collections::hash_map::DefaultHasher;

use super::*;
use crate::field::Field;
use crate::model::RecordBuilder;
use crate::session::{Session, SharedSession};
use crate::types::TypeDesc;
use pretty_assertions::assert_eq;

fn hash_of(record: &Record) -> u64 {
    let mut hasher = DefaultHasher::new();
    record.hash(&mut hasher);
    hasher.finish()
}

fn version(session: &SharedSession, frozen: bool) -> RecordTypeRef {
    RecordBuilder::model(session, "Version")
        .field(Field::new("major", TypeDesc::int()))
        .field(Field::new("minor", TypeDesc::int()).default(0))
        .field(Field::new("note", TypeDesc::str()).default("").no_compare())
        .frozen(frozen)
        .ordered(true)
        .build()
        .unwrap()
}

#[test]
fn test_equality_follows_eq_fields() {
    let session = Session::shared();
    let ty = version(&session, true);
    let a = ty.construct([("major", Value::Int(1)), ("note", Value::from("a"))]).unwrap();
    let b = ty.construct([("major", Value::Int(1)), ("note", Value::from("b"))]).unwrap();
    let c = ty.construct([("major", Value::Int(2))]).unwrap();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(a, c);
}

#[test]
fn test_same_values_different_types_differ() {
    let session = Session::shared();
    let left = version(&session, true);
    let right = version(&session, true);
    let a = left.construct([("major", Value::Int(1))]).unwrap();
    let b = right.construct([("major", Value::Int(1))]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_ordering() {
    let session = Session::shared();
    let ty = version(&session, true);
    let v1_2 = ty.construct([("major", Value::Int(1)), ("minor", Value::Int(2))]).unwrap();
    let v1_10 = ty.construct([("major", Value::Int(1)), ("minor", Value::Int(10))]).unwrap();
    let v2 = ty.construct([("major", Value::Int(2))]).unwrap();
    assert_eq!(v1_2.try_cmp(&v1_10).unwrap(), Ordering::Less);
    assert_eq!(v2.try_cmp(&v1_10).unwrap(), Ordering::Greater);
    assert_eq!(v2.try_cmp(&v2.clone()).unwrap(), Ordering::Equal);
}

#[test]
fn test_unordered_types() {
    let session = Session::shared();
    let plain = RecordBuilder::model(&session, "Plain")
        .field(Field::new("a", TypeDesc::int()))
        .build()
        .unwrap();
    let a = plain.construct([("a", Value::Int(1))]).unwrap();
    assert!(matches!(a.try_cmp(&a), Err(ValueError::Unordered { .. })));

    let v = version(&session, true).construct([("major", Value::Int(1))]).unwrap();
    assert!(v.try_cmp(&a).is_err());
}

#[test]
fn test_frozen_rejects_assignment() {
    let session = Session::shared();
    let mut record = version(&session, true)
        .construct([("major", Value::Int(1))])
        .unwrap();
    let err = record.set("major", 3).unwrap_err();
    assert_eq!(
        err.to_string(),
        "trying to modify field `major` of a frozen `Version` instance"
    );
    assert!(record.get_mut("minor").is_err());
    assert_eq!(record.get("major"), Some(&Value::Int(1)));
}

#[test]
fn test_mutable_assignment() {
    let session = Session::shared();
    let mut record = version(&session, false)
        .construct([("major", Value::Int(1))])
        .unwrap();
    record.set("major", 3).unwrap();
    *record.get_mut("minor").unwrap() = Value::Int(4);
    assert_eq!(format!("{record}"), "Version(major=3, minor=4, note='')");

    let err = record.set("patch", 1).unwrap_err();
    assert!(matches!(err, ValueError::UnknownField { .. }));
}

#[test]
fn test_field_lookup() {
    let session = Session::shared();
    let record = version(&session, true)
        .construct([("major", Value::Int(1))])
        .unwrap();
    assert_eq!(record.field("minor").unwrap(), &Value::Int(0));
    assert!(record.field("patch").is_err());
    let names: Vec<&str> = record.values().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["major", "minor", "note"]);
    assert_eq!(record.type_name(), "Version");
}

#[test]
fn test_repr_skips_hidden_fields() {
    let session = Session::shared();
    let secret = RecordBuilder::model(&session, "Login")
        .field(Field::new("user", TypeDesc::str()))
        .field(Field::new("password", TypeDesc::str()).no_repr())
        .build()
        .unwrap();
    let record = secret
        .construct([("user", Value::from("ann")), ("password", Value::from("hunter2"))])
        .unwrap();
    assert_eq!(format!("{record:?}"), "Login(user='ann')");
}

#[test]
fn test_hashable_records_in_sets() {
    let session = Session::shared();
    let frozen = version(&session, true);
    let mutable = version(&session, false);
    let a = Value::from(frozen.construct([("major", Value::Int(1))]).unwrap());
    let b = Value::from(mutable.construct([("major", Value::Int(1))]).unwrap());
    assert!(Value::set([a.clone(), a]).is_ok());
    assert!(matches!(Value::set([b]), Err(ValueError::Unhashable { .. })));
}

#[test]
fn test_is_instance_of() {
    let session = Session::shared();
    let base = version(&session, true);
    let derived = RecordBuilder::model(&session, "Release")
        .extends(&base)
        .build()
        .unwrap();
    let record = derived.construct([("major", Value::Int(1))]).unwrap();
    assert!(record.is_instance_of(&base));
    assert!(record.is_instance_of(&derived));
    let plain = base.construct([("major", Value::Int(1))]).unwrap();
    assert!(!plain.is_instance_of(&derived));
}
