//! Rename tests for the IDE layer.

use crate::helpers::cursor::position;
use crate::helpers::hir_helpers::*;
use ton_analyzer::error::RenameError;

// =============================================================================
// SYMBOL RENAME
// =============================================================================

#[test]
fn test_rename_skips_shadowed_usages() {
    let source = "const x = 10;\n\
                  fun outer() { return x; }\n\
                  fun inner() { val x = 1; return x; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "x = 10");

    let edit = host.analysis().rename(file, line, col, "LIMIT").unwrap();
    assert_eq!(edit.len(), 2);
    assert_eq!(
        edit.apply("/ws/main.tolk", source),
        "const LIMIT = 10;\n\
         fun outer() { return LIMIT; }\n\
         fun inner() { val x = 1; return x; }"
    );
}

#[test]
fn test_rename_edits_each_usage_once() {
    let source = "fun f(a: int) { return a + a * a; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "a + a");

    let edit = host.analysis().rename(file, line, col, "b").unwrap();
    let edits = edit.edits("/ws/main.tolk");
    assert_eq!(edits.len(), 4);
    let mut starts: Vec<u32> = edits.iter().map(|e| u32::from(e.range.start())).collect();
    starts.dedup();
    assert_eq!(starts.len(), 4);
    assert_eq!(edit.apply("/ws/main.tolk", source), "fun f(b: int) { return b + b * b; }");
}

#[test]
fn test_rename_quotes_non_identifiers() {
    let source = "fun main() { val total = 1; return total; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "total;");

    let edit = host.analysis().rename(file, line, col, "grand total").unwrap();
    assert_eq!(
        edit.apply("/ws/main.tolk", source),
        "fun main() { val `grand total` = 1; return `grand total`; }"
    );
}

#[test]
fn test_rename_variable_in_shorthand_field() {
    let source = "struct Point { x: int }\nfun make() { val x = 1; return Point { x }; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "x = 1");

    let edit = host.analysis().rename(file, line, col, "value").unwrap();
    assert_eq!(
        edit.apply("/ws/main.tolk", source),
        "struct Point { x: int }\nfun make() { val value = 1; return Point { x: value }; }"
    );
}

#[test]
fn test_rename_field_in_shorthand_field() {
    let source = "struct Point { x: int }\nfun make() { val x = 1; return Point { x }; }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "x: int");

    let edit = host.analysis().rename(file, line, col, "horizontal").unwrap();
    assert_eq!(
        edit.apply("/ws/main.tolk", source),
        "struct Point { horizontal: int }\nfun make() { val x = 1; return Point { horizontal: x }; }"
    );
}

#[test]
fn test_rename_refuses_stdlib_declaration() {
    let host = analysis_with_stdlib(
        &[("/std/common.tolk", "fun now(): int asm \"NOW\";")],
        &[("/ws/main.tolk", "fun main() { return now(); }")],
    );
    let (file, line, col) = position(&host, "/ws/main.tolk", "now()");

    let err = host.analysis().prepare_rename(file, line, col).unwrap_err();
    assert_eq!(err, RenameError::ReadOnlyDeclaration);
    assert_eq!(err.to_string(), "Can not rename element from Standard Library");
}

#[test]
fn test_rename_fift_procedure_to_dashed_word() {
    let program = "PROGRAM{\n  helper PROC:<{\n  }>\n  main PROC:<{\n    helper CALLDICT\n  }>\n}END>c\n";
    let host = analysis_from_sources(&[("/ws/out.fif", program)]);
    let (file, line, col) = position(&host, "/ws/out.fif", "helper CALLDICT");

    let edit = host.analysis().rename(file, line, col, "my-helper").unwrap();
    let renamed = edit.apply("/ws/out.fif", program);
    assert!(renamed.contains("  my-helper PROC:<{"));
    assert!(renamed.contains("    my-helper CALLDICT"));
    assert!(!renamed.contains('`'));
}

#[test]
fn test_rename_tlb_refuses_invalid_identifier() {
    let schema = "unit$_ = Unit;\nwrap$_ u:Unit = Wrap;";
    let host = analysis_from_sources(&[("/ws/block.tlb", schema)]);
    let (file, line, col) = position(&host, "/ws/block.tlb", "Unit = Wrap");

    assert!(host.analysis().rename(file, line, col, "my unit").is_none());
    let edit = host.analysis().rename(file, line, col, "Empty").unwrap();
    assert_eq!(edit.apply("/ws/block.tlb", schema), "unit$_ = Empty;\nwrap$_ u:Empty = Wrap;");
}

#[test]
fn test_prepare_rename_on_keyword_fails() {
    let host = analysis_from_sources(&[("/ws/main.tolk", "fun main() {}")]);
    let (file, line, col) = position(&host, "/ws/main.tolk", "fun");

    assert_eq!(
        host.analysis().prepare_rename(file, line, col),
        Err(RenameError::NotAnIdentifier)
    );
}

// =============================================================================
// FILE RENAME
// =============================================================================

#[test]
fn test_file_rename_rewrites_relative_imports() {
    let mut host = analysis_from_sources(&[
        ("/ws/src/utils.tolk", "import \"../shared/consts.tolk\"\nfun util() {}"),
        ("/ws/shared/consts.tolk", "const K = 1;"),
        ("/ws/src/main.tolk", "import \"./utils\"\nimport \"@stdlib/tvm-dicts\"\nfun main() { util(); }"),
    ]);

    let edit = host
        .rename_file("/ws/src/utils.tolk", "/ws/lib/helpers.tolk")
        .unwrap();

    let main_edits = edit.edits("/ws/src/main.tolk");
    assert_eq!(main_edits.len(), 1);
    assert_eq!(main_edits[0].new_text, "\"../lib/helpers\"");

    // Same depth: the relative path to shared/ is unchanged.
    assert!(edit.edits("/ws/src/utils.tolk").is_empty());

    assert!(host.has_file("/ws/lib/helpers.tolk"));
    assert!(!host.has_file("/ws/src/utils.tolk"));
}

#[test]
fn test_file_rename_keeps_extension_style() {
    let mut host = analysis_from_sources(&[
        ("/ws/a.tolk", "fun a() {}"),
        ("/ws/main.tolk", "import \"a.tolk\"\nfun main() { a(); }"),
    ]);

    let edit = host.rename_file("/ws/a.tolk", "/ws/nested/b.tolk").unwrap();
    assert_eq!(edit.edits("/ws/main.tolk")[0].new_text, "\"nested/b.tolk\"");
}

#[test]
fn test_file_rename_of_unknown_file() {
    let mut host = analysis_from_sources(&[("/ws/a.tolk", "fun a() {}")]);
    assert!(host.rename_file("/ws/missing.tolk", "/ws/other.tolk").is_none());
}
