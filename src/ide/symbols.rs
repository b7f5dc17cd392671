//! Document and workspace symbols.

use smol_str::SmolStr;

use super::span_of;
use crate::base::{FileId, Span};
use crate::hir::{DeclKind, NamedNode, Workspace, binding};
use crate::parser::SyntaxKind;
use crate::parser::ast::{AstNode, FnDecl};

/// A declaration as listed in an outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolInfo {
    pub name: SmolStr,
    pub kind: DeclKind,
    pub file: FileId,
    pub uri: SmolStr,
    /// Range of the declaration's name.
    pub span: Span,
    /// Owning struct or enum of a member; receiver type of a method.
    pub container: Option<SmolStr>,
}

impl SymbolInfo {
    fn from_decl(decl: &NamedNode) -> Option<Self> {
        let kind = decl.kind()?;
        let name = decl.name();
        if name.is_empty() {
            return None;
        }
        let ident = decl
            .name_identifier()
            .map(|n| decl.with_node(n))
            .unwrap_or_else(|| decl.clone());
        Some(Self {
            name,
            kind,
            file: decl.file().id(),
            uri: decl.file().uri().clone(),
            span: span_of(&ident),
            container: container(decl, kind),
        })
    }
}

fn container(decl: &NamedNode, kind: DeclKind) -> Option<SmolStr> {
    match kind {
        DeclKind::Field | DeclKind::EnumMember => decl
            .node()
            .ancestors()
            .skip(1)
            .find(|n| matches!(n.kind(), SyntaxKind::STRUCT | SyntaxKind::ENUM | SyntaxKind::TLB_DECLARATION))
            .map(|owner| decl.with_node(owner).name()),
        DeclKind::Method => FnDecl::cast(decl.node().clone())
            .and_then(|f| f.receiver())
            .and_then(|r| r.ty())
            .map(|ty| SmolStr::new(ty.text().to_string().trim())),
        _ => None,
    }
}

/// Declarations of a file in source order.
pub fn document_symbols(ws: &Workspace, file: FileId) -> Vec<SymbolInfo> {
    let Some(parsed) = ws.file(file) else {
        return Vec::new();
    };
    binding(parsed.language())
        .file_declarations(&parsed)
        .iter()
        .filter_map(SymbolInfo::from_decl)
        .collect()
}

/// Declarations of every indexed file whose name contains `query`
/// (case-insensitive). `None` or an empty query lists everything.
pub fn workspace_symbols(ws: &Workspace, query: Option<&str>) -> Vec<SymbolInfo> {
    let query = query.map(str::to_lowercase).unwrap_or_default();
    let mut symbols: Vec<SymbolInfo> = ws
        .files()
        .flat_map(|file| binding(file.language()).file_declarations(file))
        .filter(|decl| decl.name().to_lowercase().contains(&query))
        .filter_map(|decl| SymbolInfo::from_decl(&decl))
        .collect();
    symbols.sort_by(|a, b| {
        (&a.name, &a.uri, a.span.start).cmp(&(&b.name, &b.uri, b.span.start))
    });
    symbols
}
