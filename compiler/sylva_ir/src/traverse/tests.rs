use super::*;
use crate::field::Field;
use crate::model::RecordBuilder;
use crate::session::Session;
use pretty_assertions::assert_eq;

struct Ast {
    expr: RecordTypeRef,
    num: RecordTypeRef,
    binop: RecordTypeRef,
}

impl Ast {
    fn new() -> Self {
        let session = Session::shared();
        let expr = RecordBuilder::node(&session, "Expr").abstract_type().build().unwrap();
        let num = RecordBuilder::node(&session, "Num")
            .extends(&expr)
            .field(Field::new("value", TypeDesc::int()))
            .build()
            .unwrap();
        let binop = RecordBuilder::node(&session, "BinOp")
            .extends(&expr)
            .field(Field::new("op", TypeDesc::str()))
            .field(Field::new("lhs", TypeDesc::record(&expr)))
            .field(Field::new("rhs", TypeDesc::record(&expr)))
            .build()
            .unwrap();
        Ast { expr, num, binop }
    }

    fn num(&self, value: i64) -> Value {
        Value::from(self.num.construct([("value", Value::Int(value))]).unwrap())
    }

    fn binop(&self, op: &str, lhs: Value, rhs: Value) -> Value {
        Value::from(
            self.binop
                .construct([("op", Value::from(op)), ("lhs", lhs), ("rhs", rhs)])
                .unwrap(),
        )
    }

    /// `(5 * 2) + 3`
    fn sample(&self) -> Value {
        self.binop("+", self.binop("*", self.num(5), self.num(2)), self.num(3))
    }
}

fn label(item: ValueRef<'_>) -> String {
    match item.as_record() {
        Some(record) if record.type_name() == "Num" => format!("#{}", record.get("value").unwrap()),
        Some(record) => format!("<{}>", record.get("op").unwrap().as_str().unwrap()),
        None => item.to_string(),
    }
}

fn node_labels(root: &Value, order: TraversalOrder) -> Vec<String> {
    traverse(root, order).filter(|item| item.is_node()).map(label).collect()
}

#[test]
fn test_pre_order() {
    let ast = Ast::new();
    let root = ast.sample();
    assert_eq!(node_labels(&root, TraversalOrder::PreOrder), ["<+>", "<*>", "#5", "#2", "#3"]);
}

#[test]
fn test_post_order() {
    let ast = Ast::new();
    let root = ast.sample();
    assert_eq!(node_labels(&root, TraversalOrder::PostOrder), ["#5", "#2", "<*>", "#3", "<+>"]);
}

#[test]
fn test_breadth_first() {
    let ast = Ast::new();
    let root = ast.sample();
    assert_eq!(node_labels(&root, TraversalOrder::BreadthFirst), ["<+>", "<*>", "#3", "#5", "#2"]);
}

#[test]
fn test_leaves_are_items() {
    let ast = Ast::new();
    let root = ast.sample();
    let all: Vec<String> = traverse(&root, TraversalOrder::PreOrder).map(label).collect();
    assert_eq!(
        all,
        ["<+>", "'+'", "<*>", "'*'", "#5", "5", "#2", "2", "#3", "3"]
    );
}

#[test]
fn test_keys() {
    let ast = Ast::new();
    let root = ast.sample();
    let keys: Vec<String> = traverse_with_keys(&root, TraversalOrder::PreOrder)
        .filter(|(_, item)| item.is_node())
        .map(|(key, _)| key.map_or_else(|| "-".to_owned(), |k| k.to_string()))
        .collect();
    assert_eq!(keys, ["-", "lhs", "lhs", "rhs", "rhs"]);
}

#[test]
fn test_container_children() {
    let map = Value::map([("a", 1), ("b", 2)]).unwrap();
    let keys: Vec<String> = children_of(ValueRef::from(&map))
        .iter()
        .map(|(key, _)| key.to_string())
        .collect();
    assert_eq!(keys, ["'a'", "'b'"]);

    let list = Value::list([Value::from("x"), Value::tuple([1, 2])]);
    let children = children_of(ValueRef::from(&list));
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].0, TreeKey::Index(1));
    assert_eq!(traverse(&list, TraversalOrder::PreOrder).count(), 5);

    assert!(children_of(ValueRef::from(&Value::from("abc"))).is_empty());
}

#[test]
fn test_plain_records_are_leaves() {
    let session = Session::shared();
    let point = RecordBuilder::model(&session, "Point")
        .field(Field::new("x", TypeDesc::int()))
        .build()
        .unwrap();
    let holder = RecordBuilder::node(&session, "Holder")
        .field(Field::new("at", TypeDesc::record(&point)))
        .build()
        .unwrap();
    let p = point.construct([("x", Value::Int(1))]).unwrap();
    let h = holder.construct([("at", Value::from(p))]).unwrap();
    let items: Vec<&str> = traverse(&h, TraversalOrder::PreOrder).map(ValueRef::type_name).collect();
    assert_eq!(items, ["Holder", "Point"]);
}

#[test]
fn test_annotations_are_not_children() {
    let session = Session::shared();
    let ty = RecordBuilder::node(&session, "Leaf")
        .field(Field::new("type_attr_", TypeDesc::str()).default("int"))
        .field(Field::new("cache_", TypeDesc::int()).default(0))
        .build()
        .unwrap();
    let leaf = ty.instantiate().unwrap();
    assert_eq!(traverse(&leaf, TraversalOrder::PreOrder).count(), 1);
}

#[test]
fn test_select() {
    let ast = Ast::new();
    let root = ast.sample();
    let nums = select(&root, TraversalOrder::PreOrder, &TypeDesc::record(&ast.num)).count();
    assert_eq!(nums, 3);

    let ints: Vec<String> = select(&root, TraversalOrder::PostOrder, &TypeDesc::int())
        .map(label)
        .collect();
    assert_eq!(ints, ["5", "2", "3"]);

    let exprs = select_records(&root, TraversalOrder::PreOrder, &ast.expr).count();
    assert_eq!(exprs, 5);
    let binops: Vec<&str> = select_records(&root, TraversalOrder::PreOrder, &ast.binop)
        .map(Record::type_name)
        .collect();
    assert_eq!(binops, ["BinOp", "BinOp"]);
}

#[test]
fn test_deep_tree_does_not_overflow() {
    let ast = Ast::new();
    let mut root = ast.num(0);
    for i in 0..2_000 {
        root = ast.binop("+", root, ast.num(i));
    }
    let nodes = traverse(&root, TraversalOrder::PostOrder)
        .filter(|item| item.is_node())
        .count();
    assert_eq!(nodes, 4_001);
}

mod proptest_traverse {
    use super::super::{traverse, TraversalOrder};
    use crate::value::{Value, ValueRef};
    use proptest::prelude::*;

    fn nested() -> impl Strategy<Value = Value> {
        let leaf = any::<i64>().prop_map(Value::Int);
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..8).prop_map(Value::List),
                proptest::collection::vec(inner, 0..8).prop_map(Value::Tuple),
            ]
        })
    }

    fn size(value: &Value) -> usize {
        1 + match value {
            Value::List(items) | Value::Tuple(items) => items.iter().map(size).sum(),
            _ => 0,
        }
    }

    fn position(order: &[ValueRef<'_>], target: &Value) -> usize {
        order
            .iter()
            .position(|item| item.ptr_eq(target.into()))
            .unwrap()
    }

    fn descendants<'v>(value: &'v Value, out: &mut Vec<&'v Value>) {
        if let Value::List(items) | Value::Tuple(items) = value {
            for item in items {
                out.push(item);
                descendants(item, out);
            }
        }
    }

    fn every_item(value: &Value) -> Vec<&Value> {
        let mut all = vec![value];
        descendants(value, &mut all);
        all
    }

    proptest! {
        #[test]
        fn ancestors_bracket_descendants(value in nested()) {
            let pre: Vec<_> = traverse(&value, TraversalOrder::PreOrder).collect();
            let post: Vec<_> = traverse(&value, TraversalOrder::PostOrder).collect();
            for item in every_item(&value) {
                let mut below = Vec::new();
                descendants(item, &mut below);
                let (pre_at, post_at) = (position(&pre, item), position(&post, item));
                for inner in below {
                    prop_assert!(pre_at < position(&pre, inner));
                    prop_assert!(post_at > position(&post, inner));
                }
            }
        }

        #[test]
        fn every_item_is_visited_once(value in nested()) {
            for order in [TraversalOrder::PreOrder, TraversalOrder::PostOrder, TraversalOrder::BreadthFirst] {
                prop_assert_eq!(traverse(&value, order).count(), size(&value));
            }
        }

        #[test]
        fn root_position(value in nested()) {
            let first = traverse(&value, TraversalOrder::PreOrder).next().unwrap();
            let last = traverse(&value, TraversalOrder::PostOrder).last().unwrap();
            prop_assert!(first.ptr_eq((&value).into()));
            prop_assert!(last.ptr_eq((&value).into()));
        }
    }
}
