//! Type inference through the public API.

use crate::helpers::hir_helpers::*;
use rstest::rstest;
use ton_analyzer::hir::{DeclKind, Ty, TypeInferer};

const POINT_A: &str = "struct Point { x: int; y: int }";
const POINT_B: &str = "import \"a\"\nfun main() {\n    val p: Point = Point{x:1,y:2};\n    p.x;\n}";

#[test]
fn test_point_scenario() {
    let host = analysis_from_sources(&[("/ws/a.tolk", POINT_A), ("/ws/b.tolk", POINT_B)]);
    let ws = host.workspace();

    let usage = ident_at(ws, "/ws/b.tolk", "p.|x;");
    let field = ton_analyzer::hir::Resolver::resolve(ws, &usage).unwrap();
    assert_eq!(field.kind(), Some(DeclKind::Field));
    assert_eq!(field.file().uri(), "/ws/a.tolk");
    assert_eq!(field.name(), "x");

    let dot = usage.parent().unwrap();
    assert_eq!(TypeInferer::type_of(ws, &dot), Some(Ty::Int));
}

#[test]
fn test_object_literal_has_struct_type() {
    let host = analysis_from_sources(&[("/ws/a.tolk", POINT_A), ("/ws/b.tolk", POINT_B)]);
    let ws = host.workspace();

    let var = resolve_at(ws, "/ws/b.tolk", "p.x").unwrap();
    let ty = TypeInferer::type_of(ws, &var).unwrap();
    assert_eq!(ty.name(), "Point");
    assert_eq!(ty.anchor().map(|a| a.file().uri().as_str()), Some("/ws/a.tolk"));
}

#[test]
fn test_independent_tensors_are_equal() {
    let source = "fun main() {\n    val a = (1, true);\n    val b = (2, false);\n}";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let ws = host.workspace();

    let a = ident_at(ws, "/ws/main.tolk", "a =").owning_declaration().unwrap();
    let b = ident_at(ws, "/ws/main.tolk", "b =").owning_declaration().unwrap();
    let ta = TypeInferer::type_of(ws, &a).unwrap();
    let tb = TypeInferer::type_of(ws, &b).unwrap();
    assert_eq!(ta, tb);
    assert_eq!(ta, Ty::Tensor(vec![Ty::Int, Ty::Bool]));
}

#[test]
fn test_inference_is_idempotent() {
    let host = analysis_from_sources(&[("/ws/a.tolk", POINT_A), ("/ws/b.tolk", POINT_B)]);
    let ws = host.workspace();
    let dot = ident_at(ws, "/ws/b.tolk", "p.|x;").parent().unwrap();

    let first = TypeInferer::type_of(ws, &dot);
    ws.caches().clear_all();
    let second = TypeInferer::type_of(ws, &dot);
    assert_eq!(first, second);
}

#[rstest]
#[case("val v = 1;", "int")]
#[case("val v = true;", "bool")]
#[case("val v = null;", "null")]
#[case("val v: uint32 = 5;", "uint32")]
#[case("val v: int? = null;", "int?")]
#[case("val v = [1, true];", "[int, bool]")]
#[case("val v = 1 < 2;", "bool")]
#[case("val v = 1 <=> 2;", "int")]
fn test_variable_types(#[case] statement: &str, #[case] expected: &str) {
    let source = format!("fun main() {{ {statement} }}");
    let host = analysis_from_sources(&[("/ws/main.tolk", &source)]);
    let ws = host.workspace();

    let var = ident_at(ws, "/ws/main.tolk", "l |v").owning_declaration().unwrap();
    assert_eq!(TypeInferer::type_of(ws, &var).unwrap().name(), expected);
}

#[test]
fn test_unresolvable_shape_is_none() {
    let source = "fun main() { val v = missing(); }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let ws = host.workspace();

    let call = ident_at(ws, "/ws/main.tolk", "missing").parent().unwrap();
    assert_eq!(TypeInferer::type_of(ws, &call), None);
}
