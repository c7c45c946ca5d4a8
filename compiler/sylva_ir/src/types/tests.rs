use super::*;
use crate::value::EnumType;
use pretty_assertions::assert_eq;

#[test]
fn test_display() {
    let ty = TypeDesc::mapping(
        TypeDesc::str(),
        TypeDesc::list(TypeDesc::optional(TypeDesc::tuple([TypeDesc::int(), TypeDesc::float()]))),
    );
    assert_eq!(ty.to_string(), "Dict[str, List[Optional[Tuple[int, float]]]]");

    let lit = TypeDesc::literal([Literal::from("+"), Literal::from(1_i64), Literal::from(true)]);
    assert_eq!(lit.to_string(), "Literal['+', 1, True]");

    assert_eq!(TypeDesc::symbol_name().to_string(), r"SymbolName[[a-zA-Z_]\w*]");
    assert_eq!(
        TypeDesc::union([TypeDesc::none(), TypeDesc::bytes()]).to_string(),
        "Union[None, bytes]"
    );
}

#[test]
fn test_type_vars_in_order_of_appearance() {
    let t = TypeVar::new("T");
    let u = TypeVar::new("U");
    let ty = TypeDesc::mapping(
        TypeDesc::var(&u),
        TypeDesc::tuple([TypeDesc::var(&t), TypeDesc::var(&u)]),
    );
    let names: Vec<String> = ty.type_vars().iter().map(|v| v.name().to_owned()).collect();
    assert_eq!(names, vec!["U", "T"]);
    assert!(!ty.is_concrete());
    assert!(TypeDesc::list(TypeDesc::int()).is_concrete());
}

#[test]
fn test_hashability() {
    assert!(TypeDesc::tuple([TypeDesc::int(), TypeDesc::str()]).is_hashable());
    assert!(!TypeDesc::tuple([TypeDesc::list(TypeDesc::int())]).is_hashable());
    assert!(!TypeDesc::set(TypeDesc::int()).is_hashable());
    assert!(TypeDesc::optional(TypeDesc::str()).is_hashable());
}

#[test]
fn test_check_rejects_empty_composites() {
    assert!(TypeDesc::union(Vec::new()).check(None).is_err());
    assert!(TypeDesc::Literal(Vec::new()).check(None).is_err());
    assert!(TypeDesc::tuple(Vec::new()).check(None).is_ok());
}

#[test]
fn test_check_rejects_unhashable_keys() {
    let err = TypeDesc::set(TypeDesc::list(TypeDesc::int())).check(None).unwrap_err();
    assert_eq!(err, "set element type `List[int]` is not hashable");

    let err = TypeDesc::mapping(TypeDesc::mapping(TypeDesc::str(), TypeDesc::int()), TypeDesc::int())
        .check(None)
        .unwrap_err();
    assert!(err.starts_with("mapping key type"));
}

#[test]
fn test_check_type_var_scope() {
    let t = TypeVar::new("T");
    let u = TypeVar::new("U");
    let ty = TypeDesc::list(TypeDesc::var(&u));
    assert!(ty.check(None).is_ok());
    assert!(ty.check(Some(std::slice::from_ref(&u))).is_ok());
    assert!(ty.check(Some(std::slice::from_ref(&t))).is_err());
    let empty: &[TypeVar] = &[];
    assert!(ty.check(Some(empty)).is_err());
}

#[test]
fn test_is_symbol_name() {
    assert!(TypeDesc::symbol_name().is_symbol_name());
    assert!(TypeDesc::optional(TypeDesc::symbol_name()).is_symbol_name());
    assert!(!TypeDesc::symbol_ref().is_symbol_name());
    assert!(!TypeDesc::str().is_symbol_name());
}

#[test]
fn test_symbol_pattern() {
    let ident = SymbolPattern::identifier();
    assert!(ident.is_match("abc_1"));
    assert!(ident.is_match("_"));
    assert!(!ident.is_match("1abc"));
    assert!(!ident.is_match("a-b"));
    assert!(!ident.is_match(""));

    let dotted = SymbolPattern::new(r"[a-z]+(\.[a-z]+)*").unwrap();
    assert!(dotted.is_match("std.io"));
    assert!(!dotted.is_match("std."));

    assert!(matches!(
        SymbolPattern::new("(unclosed"),
        Err(DefinitionError::InvalidPattern { .. })
    ));
}

#[test]
fn test_equality_is_structural() {
    assert_eq!(TypeDesc::list(TypeDesc::int()), TypeDesc::list(TypeDesc::int()));
    assert_ne!(TypeDesc::list(TypeDesc::int()), TypeDesc::set(TypeDesc::int()));
    assert_eq!(
        TypeDesc::symbol_name_matching("[a-z]+").unwrap(),
        TypeDesc::symbol_name_matching("[a-z]+").unwrap()
    );

    let a = EnumType::new("Op", ["ADD"]);
    let b = EnumType::new("Op", ["ADD"]);
    assert_eq!(TypeDesc::enumeration(&a), TypeDesc::enumeration(&a));
    assert_ne!(TypeDesc::enumeration(&a), TypeDesc::enumeration(&b));
}

#[test]
fn test_literal_matching_is_strict() {
    assert!(Literal::from(1_i64).matches(&Value::Int(1)));
    assert!(!Literal::from(1_i64).matches(&Value::Bool(true)));
    assert!(!Literal::from(true).matches(&Value::Int(1)));
    assert!(Literal::None.matches(&Value::None));
}

struct Listify;

impl TypeFolder for Listify {
    fn fold_var(&mut self, var: &TypeVar) -> TypeDesc {
        TypeDesc::list(TypeDesc::TypeVar(var.clone()))
    }
}

#[test]
fn test_folder_rebuilds_structure() {
    let t = TypeVar::new("T");
    let ty = TypeDesc::mapping(TypeDesc::str(), TypeDesc::optional(TypeDesc::var(&t)));
    let folded = Listify.fold(&ty);
    assert_eq!(folded.to_string(), "Dict[str, Optional[List[T]]]");
}

#[test]
fn test_substitution_by_name() {
    let t = TypeVar::new("T");
    let u = TypeVar::new("U");
    let params = [t.clone(), u.clone()];
    let args = [TypeDesc::int(), TypeDesc::str()];
    let ty = TypeDesc::tuple([TypeDesc::var(&u), TypeDesc::set(TypeDesc::var(&t))]);

    let folded = Substitution::new(&params, &args).fold(&ty);
    assert_eq!(folded, TypeDesc::tuple([TypeDesc::str(), TypeDesc::set(TypeDesc::int())]));

    let other = TypeDesc::var(&TypeVar::new("V"));
    assert_eq!(Substitution::new(&params, &args).fold(&other), other);
}
