//! HIR test helpers for setting up analysis hosts.

use ton_analyzer::base::FileId;
use ton_analyzer::hir::{NamedNode, Resolver, Workspace};
use ton_analyzer::ide::AnalysisHost;

use super::cursor::offset_of;

/// Creates an AnalysisHost with a single file.
pub fn analysis_from_source(source: &str, uri: &str) -> (AnalysisHost, FileId) {
    let mut host = AnalysisHost::new();
    let file_id = host
        .set_file_content(uri, source)
        .unwrap_or_else(|err| panic!("failed to add '{uri}': {err}"));
    (host, file_id)
}

/// Creates an AnalysisHost with multiple files.
pub fn analysis_from_sources(files: &[(&str, &str)]) -> AnalysisHost {
    let mut host = AnalysisHost::new();
    for (uri, content) in files {
        host.set_file_content(uri, content)
            .unwrap_or_else(|err| panic!("failed to add '{uri}': {err}"));
    }
    host
}

/// Creates an AnalysisHost whose `/std` files are the standard library and
/// `/std/common.tolk` is imported implicitly.
pub fn analysis_with_stdlib(stdlib: &[(&str, &str)], files: &[(&str, &str)]) -> AnalysisHost {
    let mut host = AnalysisHost::new();
    host.set_stdlib_root(Some("/std"));
    host.set_implicit_imports(["common.tolk"]);
    for (uri, content) in stdlib.iter().chain(files) {
        host.set_file_content(uri, content)
            .unwrap_or_else(|err| panic!("failed to add '{uri}': {err}"));
    }
    host
}

/// The identifier node at `marker` in `uri`.
pub fn ident_at(ws: &Workspace, uri: &str, marker: &str) -> NamedNode {
    let file = ws
        .file_by_uri(uri)
        .unwrap_or_else(|| panic!("'{uri}' is not loaded"));
    let offset = offset_of(file.text(), marker);
    let token = file
        .syntax()
        .token_at_offset(offset.into())
        .right_biased()
        .unwrap_or_else(|| panic!("no token at '{marker}'"));
    let parent = token.parent().unwrap_or_else(|| panic!("token at '{marker}' has no parent"));
    NamedNode::new(parent, file)
}

/// Resolve the identifier at `marker` in `uri`.
pub fn resolve_at(ws: &Workspace, uri: &str, marker: &str) -> Option<NamedNode> {
    Resolver::resolve(ws, &ident_at(ws, uri, marker))
}
