//! Completion tests for the IDE layer.

use crate::helpers::cursor::position;
use crate::helpers::hir_helpers::*;

fn labels(host: &ton_analyzer::ide::AnalysisHost, uri: &str, marker: &str) -> Vec<String> {
    let (file, line, col) = position(host, uri, marker);
    host.analysis()
        .completion_variants(file, line, col)
        .into_iter()
        .map(|v| v.label.to_string())
        .collect()
}

#[test]
fn test_completion_offers_unimported_workspace_declarations() {
    let host = analysis_from_sources(&[
        ("/ws/lib.tolk", "fun calculateFee(): int { return 1; }"),
        ("/ws/main.tolk", "fun main() { calc }"),
    ]);

    assert_eq!(labels(&host, "/ws/main.tolk", "calc| }"), vec!["calculateFee"]);
}

#[test]
fn test_completion_prefixes_enum_members() {
    let host = analysis_from_sources(&[(
        "/ws/main.tolk",
        "enum Op { Transfer, Burn }\nfun main() { val o = Op.Burn; Tra }",
    )]);

    let members = labels(&host, "/ws/main.tolk", "o = Op.|Burn");
    assert_eq!(members, vec!["Burn", "Transfer"]);
}

#[test]
fn test_completion_is_repeatable() {
    let host = analysis_from_sources(&[("/ws/main.tolk", "fun main() { val abc = 1; ab }")]);

    let first = labels(&host, "/ws/main.tolk", "ab| }");
    let second = labels(&host, "/ws/main.tolk", "ab| }");
    assert_eq!(first, vec!["abc"]);
    assert_eq!(first, second);
}
