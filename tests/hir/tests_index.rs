//! Index maintenance and queries.

use crate::helpers::hir_helpers::*;
use ton_analyzer::base::Language;
use ton_analyzer::hir::{DeclKind, NamedNode, ResolveState};
use std::ops::ControlFlow;

fn entries(host: &ton_analyzer::ide::AnalysisHost, uri: &str) -> Vec<(DeclKind, String)> {
    let index = host.workspace().index(Language::Tolk);
    let Some(file) = index.file_index(uri) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for kind in DeclKind::ALL {
        out.extend(file.elements(kind).map(|e| (kind, e.name().to_string())));
    }
    out.sort();
    out
}

const SOURCE: &str = "struct Point { x: int }\nenum Color { Red }\nfun main() {}\nconst K = 1;";

#[test]
fn test_adding_same_content_twice_is_idempotent() {
    let mut host = analysis_from_sources(&[("/ws/main.tolk", SOURCE)]);
    let once = entries(&host, "/ws/main.tolk");

    host.set_file_content("/ws/main.tolk", SOURCE).unwrap();
    assert_eq!(entries(&host, "/ws/main.tolk"), once);
    assert!(once.contains(&(DeclKind::EnumMember, "Red".to_string())));
    assert!(once.contains(&(DeclKind::Function, "main".to_string())));
}

#[test]
fn test_remove_after_many_adds_leaves_nothing() {
    let mut host = analysis_from_sources(&[("/ws/main.tolk", SOURCE)]);
    host.set_file_content("/ws/main.tolk", "fun other() {}").unwrap();
    host.set_file_content("/ws/main.tolk", SOURCE).unwrap();

    assert!(host.remove_file("/ws/main.tolk"));
    assert!(entries(&host, "/ws/main.tolk").is_empty());
    let index = host.workspace().index(Language::Tolk);
    assert!(index.element_by_name(DeclKind::Function, "main").is_none());
    assert!(!host.remove_file("/ws/main.tolk"));
}

#[test]
fn test_update_replaces_old_entries() {
    let mut host = analysis_from_sources(&[("/ws/main.tolk", "fun before() {}")]);
    host.set_file_content("/ws/main.tolk", "fun after() {}").unwrap();

    let index = host.workspace().index(Language::Tolk);
    assert!(index.element_by_name(DeclKind::Function, "before").is_none());
    assert!(index.element_by_name(DeclKind::Function, "after").is_some());
}

#[test]
fn test_duplicate_top_level_names_are_flagged() {
    let host = analysis_from_sources(&[("/ws/a.tolk", "fun foo() {}"), ("/ws/b.tolk", "fun foo() {}")]);
    let index = host.workspace().index(Language::Tolk);

    assert!(index.has_several_declarations("foo"));
    assert_eq!(index.elements_by_name(DeclKind::Function, "foo").len(), 2);
    assert!(index.element_by_name(DeclKind::Function, "foo").is_some());
    assert!(!index.has_several_declarations("bar"));
}

#[test]
fn test_process_elements_short_circuits() {
    let host = analysis_from_sources(&[
        ("/ws/a.tolk", "fun a1() {}\nfun a2() {}"),
        ("/ws/b.tolk", "fun b1() {}"),
    ]);
    let index = host.workspace().index(Language::Tolk);

    let mut seen = 0;
    let mut stop_after_two = |_: &NamedNode, _: &ResolveState| {
        seen += 1;
        if seen == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    };
    let finished = index.process_elements_by_key(DeclKind::Function, &mut stop_after_two, &ResolveState::new());
    assert!(!finished);
    assert_eq!(seen, 2);
}

#[test]
fn test_broken_file_indexes_what_parsed() {
    let source = "fun good() {}\n+++ 42 )))\nstruct Fine { a: int }";
    let host = analysis_from_sources(&[("/ws/main.tolk", source)]);
    let index = host.workspace().index(Language::Tolk);

    assert!(index.element_by_name(DeclKind::Function, "good").is_some());
    assert!(index.element_by_name(DeclKind::Struct, "Fine").is_some());
}
