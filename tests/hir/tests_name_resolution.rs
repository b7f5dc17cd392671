//! Name resolution across scopes, files and languages.

use crate::helpers::hir_helpers::*;
use ton_analyzer::hir::{DeclKind, Resolver};

// =============================================================================
// SHADOWING
// =============================================================================

#[test]
fn test_local_shadows_file_scope_declaration() {
    let source = "const x = 10;\nfun main() {\n    val x = 1;\n    return x;\n}";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);

    let decl = resolve_at(host.workspace(), "/ws/main.tolk", "x;\n}").unwrap();
    assert_eq!(decl.kind(), Some(DeclKind::LocalVariable));
}

#[test]
fn test_inner_block_shadows_outer_block() {
    let source = "fun main() {\n    val a = 1;\n    {\n        val a = true;\n        return a;\n    }\n}";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);

    let decl = resolve_at(host.workspace(), "/ws/main.tolk", "a;").unwrap();
    assert!(decl.node().text().to_string().contains("a"));
    let decl_line = decl.file().line_index().position(decl.range().start()).line;
    assert_eq!(decl_line, 3);
}

#[test]
fn test_parameter_shadows_global() {
    let source = "global counter: int;\nfun inc(counter: int) { return counter + 1; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);

    let decl = resolve_at(host.workspace(), "/ws/main.tolk", "counter + 1").unwrap();
    assert_eq!(decl.kind(), Some(DeclKind::Parameter));
}

#[test]
fn test_declaration_after_use_is_not_visible() {
    let source = "fun main() {\n    val y = z;\n    val z = 1;\n}";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);

    assert!(resolve_at(host.workspace(), "/ws/main.tolk", "z;").is_none());
}

// =============================================================================
// FILES AND IMPORTS
// =============================================================================

#[test]
fn test_imported_declaration_resolves() {
    let host = analysis_from_sources(&[
        ("/ws/lib/math.tolk", "fun square(x: int): int { return x * x; }"),
        ("/ws/main.tolk", "import \"lib/math\"\nfun main() { return square(3); }"),
    ]);

    let decl = resolve_at(host.workspace(), "/ws/main.tolk", "square(3)").unwrap();
    assert_eq!(decl.file().uri(), "/ws/lib/math.tolk");
    assert_eq!(decl.kind(), Some(DeclKind::Function));
}

#[test]
fn test_unimported_declaration_does_not_resolve() {
    let host = analysis_from_sources(&[
        ("/ws/lib/math.tolk", "fun square(x: int): int { return x * x; }"),
        ("/ws/main.tolk", "fun main() { return square(3); }"),
    ]);

    assert!(resolve_at(host.workspace(), "/ws/main.tolk", "square(3)").is_none());
}

#[test]
fn test_stdlib_is_visible_without_import() {
    let host = analysis_with_stdlib(
        &[("/std/common.tolk", "fun beginCell(): builder asm \"NEWC\";")],
        &[("/ws/main.tolk", "fun main() { val b = beginCell(); }")],
    );

    let decl = resolve_at(host.workspace(), "/ws/main.tolk", "beginCell()").unwrap();
    assert_eq!(decl.file().uri(), "/std/common.tolk");
}

#[test]
fn test_ambiguous_functions_yield_all_candidates() {
    let host = analysis_from_sources(&[
        ("/ws/a.tolk", "fun foo() {}"),
        ("/ws/b.tolk", "fun foo() {}"),
        ("/ws/main.tolk", "import \"a\"\nimport \"b\"\nfun main() { foo(); }"),
    ]);
    let ws = host.workspace();

    let usage = ident_at(ws, "/ws/main.tolk", "foo();");
    let targets = Resolver::multi_resolve(ws, &usage);
    let mut uris: Vec<&str> = targets.iter().map(|t| t.file().uri().as_str()).collect();
    uris.sort();
    assert_eq!(uris, vec!["/ws/a.tolk", "/ws/b.tolk"]);
}

// =============================================================================
// MEMBERS
// =============================================================================

#[test]
fn test_method_resolves_through_receiver() {
    let source = "struct Wallet { balance: int }\n\
                  fun Wallet.deposit(mutate self, amount: int) { self.balance += amount; }\n\
                  fun main(w: Wallet) { w.deposit(5); }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let ws = host.workspace();

    let method = resolve_at(ws, "/ws/main.tolk", "deposit(5)").unwrap();
    assert_eq!(method.kind(), Some(DeclKind::Method));
    let field = resolve_at(ws, "/ws/main.tolk", "balance +=").unwrap();
    assert_eq!(field.kind(), Some(DeclKind::Field));
}

#[test]
fn test_member_lookup_stays_in_owner() {
    let source = "struct A { x: int }\nstruct B { y: int }\nfun f(a: A) { return a.y; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);

    assert!(resolve_at(host.workspace(), "/ws/main.tolk", "y;").is_none());
}

#[test]
fn test_enum_member_resolves() {
    let source = "enum Color { Red, Green }\nfun f() { return Color.Green; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);

    let member = resolve_at(host.workspace(), "/ws/main.tolk", "Green;").unwrap();
    assert_eq!(member.kind(), Some(DeclKind::EnumMember));
}

// =============================================================================
// TL-B AND FIFT
// =============================================================================

const SCHEMA: &str = "bool_false$0 = Bool;\n\
                      bool_true$1 = Bool;\n\
                      pair$_ {n:#} first:(## n) flag:Bool = Pair n;\n";

#[test]
fn test_tlb_type_reference_resolves_to_every_constructor() {
    let host = analysis_from_sources(&[("/ws/block.tlb", SCHEMA)]);
    let ws = host.workspace();

    let usage = ident_at(ws, "/ws/block.tlb", "Bool = Pair");
    let targets = Resolver::multi_resolve(ws, &usage);
    assert_eq!(targets.len(), 2);
    assert!(targets.iter().all(|t| t.name() == "Bool"));
}

#[test]
fn test_tlb_implicit_parameter_resolves() {
    let host = analysis_from_sources(&[("/ws/block.tlb", SCHEMA)]);

    let param = resolve_at(host.workspace(), "/ws/block.tlb", "n)").unwrap();
    assert_eq!(param.kind(), Some(DeclKind::Parameter));
}

#[test]
fn test_fift_call_resolves_to_procedure() {
    let program = "PROGRAM{\n  DECLPROC helper\n  helper PROC:<{\n    DUP\n  }>\n  \
                   main PROC:<{\n    helper CALLDICT\n  }>\n}END>c\n";
    let host = analysis_from_sources(&[("/ws/out.fif", program)]);

    let proc = resolve_at(host.workspace(), "/ws/out.fif", "helper CALLDICT").unwrap();
    assert_eq!(proc.kind(), Some(DeclKind::Function));
    assert_eq!(proc.name(), "helper");
}
