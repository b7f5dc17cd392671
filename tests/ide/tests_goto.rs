//! Go to definition tests for the IDE layer.

use crate::helpers::cursor::position;
use crate::helpers::hir_helpers::*;
use ton_analyzer::hir::DeclKind;

#[test]
fn test_goto_definition_on_definition_returns_self() {
    let host = analysis_from_sources(&[("/ws/main.tolk", "fun main() {}")]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "main");

    let result = host.analysis().goto_definition(file, line, col);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].name, "main");
    assert_eq!((result.targets[0].span.start.line, result.targets[0].span.start.column), (0, 4));
}

#[test]
fn test_goto_member_of_generic_struct() {
    let source = "struct Box<T> { item: T }\n\
                  fun Box<T>.unwrap(self): T { return self.item; }\n\
                  fun main(b: Box<int>) { return b.unwrap(); }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "b.|unwrap()");

    let result = host.analysis().goto_definition(file, line, col);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].kind, Some(DeclKind::Method));
}

#[test]
fn test_goto_type_definition_of_variable() {
    let source = "struct Point { x: int }\nfun main() { val p = Point { x: 1 }; return p; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "p;");

    let result = host.analysis().goto_type_definition(file, line, col);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.targets[0].name, "Point");
}

#[test]
fn test_goto_out_of_range_is_empty() {
    let host = analysis_from_sources(&[("/ws/main.tolk", "fun main() {}")]);
    let file = host.file_id("/ws/main.tolk").unwrap();

    assert!(host.analysis().goto_definition(file, 10, 10).is_empty());
    assert!(host.analysis().goto_type_definition(file, 0, 100).is_empty());
}
