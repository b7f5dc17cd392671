//! Document and workspace symbol tests.

use crate::helpers::hir_helpers::*;
use ton_analyzer::hir::DeclKind;

#[test]
fn test_document_symbols_for_fift() {
    let program = "PROGRAM{\n  DECLPROC helper\n  helper PROC:<{\n  }>\n  main PROC:<{\n  }>\n}END>c\n";
    let (host, file) = analysis_from_source(program, "/ws/out.fif");

    let names: Vec<String> = host
        .analysis()
        .document_symbols(file)
        .into_iter()
        .map(|s| s.name.to_string())
        .collect();
    assert_eq!(names, vec!["helper", "main"]);
}

#[test]
fn test_workspace_symbols_span_files() {
    let host = analysis_from_sources(&[
        ("/ws/a.tolk", "struct Account { owner: address }"),
        ("/ws/b.tolk", "fun accountOf(): int { return 0; }"),
    ]);

    let symbols = host.analysis().workspace_symbols(Some("account"));
    let found: Vec<(String, DeclKind)> = symbols.iter().map(|s| (s.name.to_string(), s.kind)).collect();
    assert_eq!(
        found,
        vec![
            ("Account".to_string(), DeclKind::Struct),
            ("accountOf".to_string(), DeclKind::Function),
        ]
    );
}
