//! Resolution and inference never panic, whatever the input.

use crate::helpers::hir_helpers::*;
use rstest::rstest;
use ton_analyzer::hir::{NamedNode, Resolver, TypeInferer};
use ton_analyzer::parser::SyntaxKind;

fn exercise_every_node(uri: &str, source: &str) {
    let host = analysis_from_sources(&[(uri, source)]);
    let ws = host.workspace();
    let file = ws.file_by_uri(uri).unwrap();
    for node in file.syntax().descendants() {
        let named = NamedNode::new(node.clone(), file.clone());
        if matches!(node.kind(), SyntaxKind::NAME | SyntaxKind::NAME_REF) {
            let _ = Resolver::multi_resolve(ws, &named);
        }
        let _ = TypeInferer::type_of(ws, &named);
    }
}

#[rstest]
#[case("fun main() { val x = ; return x; }")]
#[case("struct { x: }\nfun f(p: ) { p. }")]
#[case("fun f() { return f().g.h(1,,2); }")]
#[case("fun Box<T>.get(self): T { return self.; }\nfun g() { Box<int>{}.get(); }")]
#[case("fun main() { match (x) { 1 => } }")]
#[case("type A = B;\ntype B = A;\nfun f(a: A) { return a; }")]
#[case("fun rec() { return rec(); }")]
#[case("import \"missing\"\nimport\nfun main() { `unterminated }")]
#[case("}}}}{{{{")]
#[case("")]
fn test_tolk_is_total(#[case] source: &str) {
    exercise_every_node("/ws/main.tolk", source);
}

#[rstest]
#[case("a$_ x:(## = A;")]
#[case("= = = ;")]
#[case("pair$_ {n:#} {X:Type} a:(Maybe X) = Pair X n;")]
fn test_tlb_is_total(#[case] source: &str) {
    exercise_every_node("/ws/block.tlb", source);
}

#[rstest]
#[case("PROGRAM{ DECLPROC }END>c")]
#[case("main PROC:<{ missing CALLDICT")]
fn test_fift_is_total(#[case] source: &str) {
    exercise_every_node("/ws/out.fif", source);
}

#[test]
fn test_one_syntax_error_does_not_break_resolution_elsewhere() {
    let source = "fun helper(): int { return 1; }\nfun broken() { val = ; }\nfun main() { return helper(); }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);

    let decl = resolve_at(host.workspace(), "/ws/main.tolk", "helper();").unwrap();
    assert_eq!(decl.name(), "helper");
}
