use super::*;
use crate::field::Field;
use crate::session::{Session, SharedSession};
use crate::validate::validate;
use crate::value::Value;
use pretty_assertions::assert_eq;

fn pair(session: &SharedSession) -> RecordTypeRef {
    let t = TypeVar::new("T");
    let u = TypeVar::new("U");
    crate::RecordBuilder::node(session, "Pair")
        .type_params([t.clone(), u.clone()])
        .field(Field::new("first", TypeDesc::var(&t)))
        .field(Field::new("second", TypeDesc::var(&u)))
        .field(Field::new("rest", TypeDesc::list(TypeDesc::var(&t))).default_factory(|| Value::list(Vec::<Value>::new())))
        .build()
        .unwrap()
}

#[test]
fn test_specialized_fields_are_substituted() {
    let session = Session::shared();
    let pair = pair(&session);
    let concrete = concretize(&pair, &[TypeDesc::int(), TypeDesc::str()]).unwrap();

    assert_eq!(concrete.name(), "Pair[int, str]");
    assert!(!concrete.is_generic());
    assert!(concrete.is_node());
    assert_eq!(concrete.field("first").unwrap().ty(), &TypeDesc::int());
    assert_eq!(concrete.field("rest").unwrap().ty(), &TypeDesc::list(TypeDesc::int()));
    assert_eq!(pair.field("first").unwrap().ty(), &TypeDesc::var(&TypeVar::new("T")));

    let spec = concrete.specialization().unwrap();
    assert_eq!(spec.generic, pair);
    assert_eq!(spec.args, vec![TypeDesc::int(), TypeDesc::str()]);
}

#[test]
fn test_equal_applications_are_identical() {
    let session = Session::shared();
    let pair = pair(&session);
    let a = pair.concretize(&[TypeDesc::int(), TypeDesc::str()]).unwrap();
    let b = pair.concretize(&[TypeDesc::int(), TypeDesc::str()]).unwrap();
    let c = pair.concretize(&[TypeDesc::str(), TypeDesc::int()]).unwrap();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&c));
    assert_eq!(session.cached_specializations(), 2);

    session.clear_cache();
    let d = pair.concretize(&[TypeDesc::int(), TypeDesc::str()]).unwrap();
    assert!(!a.ptr_eq(&d));
}

#[test]
fn test_arity_and_genericity_errors() {
    let session = Session::shared();
    let pair = pair(&session);
    let err = pair.concretize(&[TypeDesc::int()]).unwrap_err();
    assert_eq!(
        err,
        DefinitionError::GenericArity {
            record: "Pair".to_owned(),
            expected: 2,
            found: 1
        }
    );

    let plain = crate::RecordBuilder::model(&session, "Plain").build().unwrap();
    assert!(matches!(
        plain.concretize(&[TypeDesc::int()]),
        Err(DefinitionError::NotGeneric { .. })
    ));

    let concrete = pair.concretize(&[TypeDesc::int(), TypeDesc::int()]).unwrap();
    assert!(matches!(
        concrete.concretize(&[TypeDesc::int()]),
        Err(DefinitionError::NotGeneric { .. })
    ));
}

#[test]
fn test_invalid_type_argument() {
    let session = Session::shared();
    let pair = pair(&session);
    let err = pair
        .concretize(&[TypeDesc::union(Vec::new()), TypeDesc::int()])
        .unwrap_err();
    assert!(matches!(err, DefinitionError::InvalidTypeArgument { .. }));
}

#[test]
fn test_partial_application() {
    let session = Session::shared();
    let pair = pair(&session);
    let v = TypeVar::new("V");
    let partial = pair.concretize(&[TypeDesc::int(), TypeDesc::var(&v)]).unwrap();
    assert!(partial.is_generic());
    assert_eq!(partial.params().len(), 1);
    assert_eq!(partial.params()[0].name(), "V");
    assert_eq!(partial.name(), "Pair[int, V]");

    let full = partial.concretize(&[TypeDesc::bytes()]).unwrap();
    assert_eq!(full.name(), "Pair[int, bytes]");
    assert_eq!(full.field("second").unwrap().ty(), &TypeDesc::bytes());
    assert!(full.is_subtype_of(&pair));
    assert!(!full.is_generic());
    assert!(full.ptr_eq(&pair.concretize(&[TypeDesc::int(), TypeDesc::bytes()]).unwrap()));
}

#[test]
fn test_partial_application_validates_as_full() {
    let session = Session::shared();
    let pair = pair(&session);
    let u = TypeVar::new("U");
    let partial = pair.concretize(&[TypeDesc::int(), TypeDesc::var(&u)]).unwrap();
    let full = partial.concretize(&[TypeDesc::str()]).unwrap();
    let instance = Value::from(
        full.construct([("first", Value::Int(1)), ("second", Value::from("a"))])
            .unwrap(),
    );

    let want = TypeDesc::generic(&pair, [TypeDesc::int(), TypeDesc::str()]);
    assert!(validate(&want, &instance).is_ok());
    let want = TypeDesc::generic(&pair, [TypeDesc::int(), TypeDesc::int()]);
    assert!(validate(&want, &instance).is_err());
}

#[test]
fn test_partial_application_of_nested_variable() {
    let session = Session::shared();
    let pair = pair(&session);
    let v = TypeVar::new("V");
    let partial = pair
        .concretize(&[TypeDesc::list(TypeDesc::var(&v)), TypeDesc::int()])
        .unwrap();
    let full = partial.concretize(&[TypeDesc::str()]).unwrap();
    assert_eq!(full.name(), "Pair[List[str], int]");
    assert_eq!(
        full.field("first").unwrap().ty(),
        &TypeDesc::list(TypeDesc::str())
    );
}

#[test]
fn test_auto_convert_targets_bound_type() {
    let session = Session::shared();
    let t = TypeVar::new("T");
    let boxed = crate::RecordBuilder::model(&session, "Boxed")
        .type_params([t.clone()])
        .field(Field::new("value", TypeDesc::var(&t)).auto_convert())
        .build()
        .unwrap();
    let direct = crate::RecordBuilder::model(&session, "IntBox")
        .field(Field::new("value", TypeDesc::int()).auto_convert())
        .build()
        .unwrap();

    let of_int = boxed.concretize(&[TypeDesc::int()]).unwrap();
    let converted = of_int.construct([("value", Value::from("3"))]).unwrap();
    let declared = direct.construct([("value", Value::from("3"))]).unwrap();
    assert_eq!(converted.get("value"), Some(&Value::Int(3)));
    assert_eq!(converted.get("value"), declared.get("value"));

    let err = of_int.construct([("value", Value::from("three"))]).unwrap_err();
    assert!(matches!(err, crate::ValueError::ConversionFailed { .. }));

    let generic = boxed.construct([("value", Value::from("3"))]).unwrap();
    assert_eq!(generic.get("value"), Some(&Value::from("3")));
}

#[test]
fn test_distinct_specializations_validate_distinctly() {
    let session = Session::shared();
    let pair = pair(&session);
    let ints = pair.concretize(&[TypeDesc::int(), TypeDesc::int()]).unwrap();
    let strs = pair.concretize(&[TypeDesc::str(), TypeDesc::str()]).unwrap();

    let ok = ints
        .construct([("first", Value::Int(1)), ("second", Value::Int(2))])
        .unwrap();
    assert!(strs
        .construct([("first", Value::Int(1)), ("second", Value::Int(2))])
        .is_err());

    let instance = Value::from(ok);
    let want_ints = TypeDesc::generic(&pair, [TypeDesc::int(), TypeDesc::int()]);
    let want_strs = TypeDesc::generic(&pair, [TypeDesc::str(), TypeDesc::str()]);
    assert!(validate(&want_ints, &instance).is_ok());
    assert!(validate(&want_strs, &instance).is_err());
    assert!(validate(&TypeDesc::record(&pair), &instance).is_ok());
}

#[test]
fn test_bounded_arguments_validate() {
    let session = Session::shared();
    let pair = pair(&session);
    let ints = pair.concretize(&[TypeDesc::int(), TypeDesc::int()]).unwrap();
    let instance = Value::from(
        ints.construct([("first", Value::Int(1)), ("second", Value::Int(2))])
            .unwrap(),
    );

    let numeric = TypeVar::bounded("N", TypeDesc::union([TypeDesc::int(), TypeDesc::float()]));
    let text = TypeVar::bounded("S", TypeDesc::str());
    let want = TypeDesc::generic(&pair, [TypeDesc::var(&numeric), TypeDesc::Any]);
    assert!(validate(&want, &instance).is_ok());
    let want = TypeDesc::generic(&pair, [TypeDesc::var(&text), TypeDesc::Any]);
    assert!(validate(&want, &instance).is_err());
}

#[test]
fn test_field_of_generic_type() {
    let session = Session::shared();
    let pair = pair(&session);
    let t = TypeVar::new("T");
    let holder = crate::RecordBuilder::model(&session, "Holder")
        .type_params([t.clone()])
        .field(Field::new(
            "pair",
            TypeDesc::generic(&pair, [TypeDesc::var(&t), TypeDesc::var(&t)]),
        ))
        .build()
        .unwrap();
    let int_holder = holder.concretize(&[TypeDesc::int()]).unwrap();
    assert_eq!(
        int_holder.field("pair").unwrap().ty().to_string(),
        "Pair[int, int]"
    );

    let ints = pair.concretize(&[TypeDesc::int(), TypeDesc::int()]).unwrap();
    let strs = pair.concretize(&[TypeDesc::str(), TypeDesc::str()]).unwrap();
    let good = ints
        .construct([("first", Value::Int(1)), ("second", Value::Int(2))])
        .unwrap();
    let bad = strs
        .construct([("first", Value::from("a")), ("second", Value::from("b"))])
        .unwrap();
    assert!(int_holder.construct([("pair", Value::from(good))]).is_ok());
    assert!(int_holder.construct([("pair", Value::from(bad))]).is_err());
}

#[test]
fn test_specialization_keeps_validators() {
    let session = Session::shared();
    let t = TypeVar::new("T");
    let boxed = crate::RecordBuilder::model(&session, "Boxed")
        .type_params([t.clone()])
        .field(Field::new("value", TypeDesc::var(&t)))
        .validator("value", |_, value| {
            if value.is_none() {
                Err("empty box".to_owned())
            } else {
                Ok(())
            }
        })
        .build()
        .unwrap();
    let maybe = boxed
        .concretize(&[TypeDesc::optional(TypeDesc::int())])
        .unwrap();
    assert!(maybe.construct([("value", Value::Int(1))]).is_ok());
    let err = maybe.construct([("value", Value::None)]).unwrap_err();
    assert!(err.to_string().contains("empty box"));
}
