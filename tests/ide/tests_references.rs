//! Find references tests for the IDE layer.

use crate::helpers::cursor::position;
use crate::helpers::hir_helpers::*;

#[test]
fn test_references_of_field_through_dependents() {
    let host = analysis_from_sources(&[
        ("/ws/a.tolk", "struct Point { x: int; y: int }"),
        ("/ws/b.tolk", "import \"a\"\nfun f(p: Point) { return p.x + p.y; }"),
        ("/ws/c.tolk", "import \"b\"\nfun g(p: Point) { return p.x; }"),
    ]);
    let (file, line, col) = position(&host, "/ws/a.tolk", "x: int");

    let result = host.analysis().find_references(file, line, col, true);
    let uris: Vec<&str> = result.references.iter().map(|r| r.uri.as_str()).collect();
    assert_eq!(uris, vec!["/ws/a.tolk", "/ws/b.tolk", "/ws/c.tolk"]);
}

#[test]
fn test_references_respect_shadowing() {
    let source = "fun main() {\n    val n = 1;\n    {\n        val n = 2;\n        n;\n    }\n    n;\n}";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "n = 1");

    let result = host.analysis().find_references(file, line, col, false);
    assert_eq!(result.len(), 1);
    assert_eq!(result.references[0].span.start.line, 6);
}

#[test]
fn test_references_of_tlb_type() {
    let schema = "unit$_ = Unit;\nwrap$_ u:Unit = Wrap;\ndouble$_ a:Unit b:Unit = Double;";
    let host = analysis_from_sources(&[("/ws/block.tlb", schema)]);
    let (file, line, col) = position(&host, "/ws/block.tlb", "Unit;");

    let result = host.analysis().find_references(file, line, col, false);
    assert_eq!(result.len(), 3);
}
