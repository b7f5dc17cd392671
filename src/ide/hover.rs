//! Hover information implementation.

use super::{identifier_at, offset_at, span_of};
use crate::base::{FileId, Language, Span};
use crate::hir::method_id::get_method_id;
use crate::hir::{DeclKind, NamedNode, Resolver, Ty, TypeInferer, Workspace};
use crate::parser::ast::{
    AstNode, ConstDecl, EnumMember, FieldDecl, FnDecl, StructDecl, TypeAliasDecl,
};
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode};

/// Result of a hover request.
#[derive(Clone, Debug)]
pub struct HoverResult {
    /// The hover content (markdown).
    pub contents: String,
    /// Range of the hovered identifier.
    pub span: Span,
}

/// Get hover information for the identifier at a position.
pub fn hover(ws: &Workspace, file: FileId, line: u32, col: u32) -> Option<HoverResult> {
    let parsed = ws.file(file)?;
    let ident = identifier_at(&parsed, offset_at(&parsed, line, col)?)?;
    let decl = Resolver::resolve(ws, &ident)?;

    let mut contents = match decl.language() {
        Language::Tolk => code_block("tolk", &tolk_signature(ws, &decl)),
        Language::Tlb => code_block("tlb", &collapse(&decl.node().text().to_string())),
        Language::Fift => {
            let text = decl.node().text().to_string();
            code_block("fift", text.lines().next().unwrap_or_default())
        }
    };

    let docs = doc_comment(decl.node());
    if !docs.is_empty() {
        contents.push_str("\n\n");
        contents.push_str(&docs);
    }

    if let Some(id) = FnDecl::cast(decl.node().clone()).and_then(|f| get_method_id(&f)) {
        contents.push_str(&format!("\n\nMethod ID: `0x{id:x}`"));
    }

    Some(HoverResult {
        contents,
        span: span_of(&ident),
    })
}

fn code_block(lang: &str, body: &str) -> String {
    format!("```{lang}\n{body}\n```")
}

/// Whitespace runs collapsed to single spaces.
fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn node_text(node: Option<SyntaxNode>) -> Option<String> {
    node.map(|n| collapse(&n.text().to_string()))
}

fn type_text(ws: &Workspace, decl: &NamedNode) -> String {
    TypeInferer::type_of(ws, decl)
        .unwrap_or(Ty::Unknown)
        .name()
}

fn tolk_signature(ws: &Workspace, decl: &NamedNode) -> String {
    let name = decl.name();
    let Some(kind) = decl.kind() else {
        return name.to_string();
    };
    let node = decl.node().clone();
    match kind {
        DeclKind::Function | DeclKind::Method | DeclKind::GetMethod => {
            FnDecl::cast(node).map(|f| function_signature(ws, decl, &f)).unwrap_or_default()
        }
        DeclKind::Struct => {
            let params = StructDecl::cast(node)
                .and_then(|s| node_text(s.type_params().map(|p| p.syntax().clone())))
                .unwrap_or_default();
            format!("struct {name}{params}")
        }
        DeclKind::Enum => format!("enum {name}"),
        DeclKind::EnumMember => {
            let owner = EnumMember::cast(node)
                .and_then(|m| m.owner())
                .and_then(|e| e.name())
                .map(|n| n.text().to_string())
                .unwrap_or_default();
            format!("enum {owner}\n    {name}")
        }
        DeclKind::Field => {
            let owner = FieldDecl::cast(node)
                .and_then(|f| f.owner())
                .and_then(|s| s.name())
                .map(|n| n.text().to_string())
                .unwrap_or_default();
            format!("struct {owner}\n{name}: {}", type_text(ws, decl))
        }
        DeclKind::Constant => {
            let value = ConstDecl::cast(node)
                .and_then(|c| node_text(c.value()))
                .map(|v| format!(" = {v}"))
                .unwrap_or_default();
            format!("const {name}: {}{value}", type_text(ws, decl))
        }
        DeclKind::GlobalVariable => format!("global {name}: {}", type_text(ws, decl)),
        DeclKind::TypeAlias => {
            let alias = TypeAliasDecl::cast(node);
            let params = alias
                .as_ref()
                .and_then(|a| node_text(a.type_params().map(|p| p.syntax().clone())))
                .unwrap_or_default();
            let target = alias.and_then(|a| node_text(a.ty())).unwrap_or_default();
            format!("type {name}{params} = {target}")
        }
        DeclKind::Parameter => {
            let mutate = node
                .children_with_tokens()
                .any(|e| e.kind() == SyntaxKind::MUTATE_KW);
            let prefix = if mutate { "mutate " } else { "" };
            format!("{prefix}{name}: {}", type_text(ws, decl))
        }
        DeclKind::TypeParameter => format!("type parameter {name}"),
        DeclKind::LocalVariable => {
            let keyword = node
                .ancestors()
                .find(|n| n.kind() == SyntaxKind::LET_STMT)
                .and_then(|stmt| stmt.first_token())
                .map(|t| t.text().to_string())
                .unwrap_or_else(|| "val".to_string());
            format!("{keyword} {name}: {}", type_text(ws, decl))
        }
    }
}

fn function_signature(ws: &Workspace, decl: &NamedNode, func: &FnDecl) -> String {
    let mut out = String::new();
    if func.is_get_method() {
        out.push_str("get ");
    }
    out.push_str("fun ");
    if let Some(receiver) = func.receiver().and_then(|r| node_text(r.ty())) {
        out.push_str(&receiver);
        out.push('.');
    }
    out.push_str(&decl.name());
    if let Some(params) = node_text(func.type_params().map(|p| p.syntax().clone())) {
        out.push_str(&params);
    }
    let params: Vec<String> = func
        .params()
        .iter()
        .map(|p| collapse(&p.syntax().text().to_string()))
        .collect();
    out.push('(');
    out.push_str(&params.join(", "));
    out.push(')');

    let ret = match node_text(func.ret_type()) {
        Some(text) => text,
        None => match TypeInferer::type_of(ws, decl) {
            Some(Ty::Func { ret, .. }) => ret.name(),
            _ => Ty::Void.name(),
        },
    };
    out.push_str(": ");
    out.push_str(&ret);
    out
}

/// Line comments directly above `node`. A blank line ends the block.
fn doc_comment(node: &SyntaxNode) -> String {
    let mut lines = Vec::new();
    let mut prev = node.prev_sibling_or_token();
    while let Some(element) = prev {
        match &element {
            SyntaxElement::Token(t) if t.kind() == SyntaxKind::WHITESPACE => {
                if t.text().matches('\n').count() > 1 {
                    break;
                }
            }
            SyntaxElement::Token(t) if t.kind() == SyntaxKind::LINE_COMMENT => {
                let text = t.text().trim_start_matches('/');
                lines.push(text.strip_prefix(' ').unwrap_or(text).trim_end().to_string());
            }
            _ => break,
        }
        prev = element.prev_sibling_or_token();
    }
    lines.reverse();
    lines.join("\n")
}
