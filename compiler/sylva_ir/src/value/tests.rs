use super::*;
use std::collections::hash_map::DefaultHasher;

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_scalar_equality_is_strict() {
    assert_ne!(Value::Int(1), Value::Bool(true));
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_eq!(Value::from("a"), Value::Str("a".to_owned()));
}

#[test]
fn test_float_hash_consistent_with_eq() {
    let a = Value::Float(0.5);
    let b = Value::Float(0.5);
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_set_rejects_unhashable_elements() {
    let err = Value::set([Value::list([1, 2])]).unwrap_err();
    assert!(matches!(err, ValueError::Unhashable { .. }));

    let ok = Value::set([Value::tuple([1, 2]), Value::tuple([1, 2])]).unwrap();
    match ok {
        Value::Set(items) => assert_eq!(items.len(), 1),
        other => panic!("expected a set, got {other}"),
    }
}

#[test]
fn test_map_rejects_unhashable_keys() {
    let err = Value::map([(Value::list([1]), Value::Int(1))]).unwrap_err();
    assert!(matches!(err, ValueError::Unhashable { .. }));
}

#[test]
fn test_map_keeps_insertion_order() {
    let map = Value::map([("b", 1), ("a", 2)]).unwrap();
    assert_eq!(map.to_string(), "{'b': 1, 'a': 2}");
}

#[test]
fn test_set_equality_ignores_order() {
    let a = Value::set([1, 2, 3]).unwrap();
    let b = Value::set([3, 2, 1]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_display() {
    assert_eq!(Value::None.to_string(), "None");
    assert_eq!(Value::Bool(true).to_string(), "True");
    assert_eq!(Value::Float(3.0).to_string(), "3.0");
    assert_eq!(Value::tuple([1]).to_string(), "(1,)");
    assert_eq!(Value::tuple([Value::Int(1), Value::from("x")]).to_string(), "(1, 'x')");
    assert_eq!(Value::from(&b"ab"[..]).to_string(), "b'ab'");
}

#[test]
fn test_try_cmp_numbers_and_sequences() {
    assert_eq!(Value::Int(1).try_cmp(&Value::Float(1.5)).unwrap(), Ordering::Less);
    assert_eq!(
        Value::tuple([1, 2]).try_cmp(&Value::tuple([1, 2, 0])).unwrap(),
        Ordering::Less
    );
    assert_eq!(
        Value::list([3]).try_cmp(&Value::list([2, 9])).unwrap(),
        Ordering::Greater
    );
}

#[test]
fn test_try_cmp_rejects_mixed_shapes() {
    let err = Value::Int(1).try_cmp(&Value::from("1")).unwrap_err();
    assert!(matches!(err, ValueError::Unordered { .. }));
    assert!(Value::Float(f64::NAN).try_cmp(&Value::Float(1.0)).is_err());
}

#[test]
fn test_enum_members() {
    let op = EnumType::new("BinaryOperator", ["ADD", "SUB"]);
    let add = op.member("ADD").unwrap();
    assert_eq!(add.name(), "ADD");
    assert_eq!(add.index(), 0);
    assert_eq!(Value::from(add.clone()).to_string(), "BinaryOperator.ADD");
    assert!(op.member("MUL").is_none());

    let other = EnumType::new("BinaryOperator", ["ADD", "SUB"]);
    assert_ne!(Value::from(add), other.value("ADD").unwrap());
}

#[test]
fn test_value_ref_normalizes_records_only() {
    let v = Value::Int(3);
    let r = ValueRef::from(&v);
    assert!(r.as_value().is_some());
    assert!(r.as_record().is_none());
    assert_eq!(r.type_name(), "int");
}

#[test]
fn test_option_conversion() {
    assert_eq!(Value::from(None::<i64>), Value::None);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
}
