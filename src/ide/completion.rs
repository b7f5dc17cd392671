//! Completion candidates at a position.
//!
//! The text is re-parsed with a placeholder identifier spliced in at the
//! cursor so that an incomplete expression like `p.` still has a name to
//! resolve. The resolver then walks the scopes of the placeholder in
//! completion mode and reports every visible declaration.

use std::rc::Rc;

use crate::base::constants::COMPLETION_PLACEHOLDER;
use crate::base::{FileId, TextSize};
use crate::hir::{NEED_PREFIX, NamedNode, ResolveState, Resolver, Variant, Workspace};
use crate::parser::ast::{AstNode, DotExpr};
use crate::parser::SyntaxKind;
use crate::syntax::ParsedFile;

use super::offset_at;

/// Id of the scratch copy; never handed out by the workspace.
const SCRATCH_FILE: FileId = FileId::new(u32::MAX);

/// Declarations visible at the position whose names start with the typed
/// prefix, sorted by name.
pub fn completion_variants(ws: &Workspace, file: FileId, line: u32, col: u32) -> Vec<Variant> {
    let Some(parsed) = ws.file(file) else {
        return Vec::new();
    };
    let Some(offset) = offset_at(&parsed, line, col) else {
        return Vec::new();
    };
    let at = usize::from(offset);
    let text = parsed.text();
    if !text.is_char_boundary(at) {
        return Vec::new();
    }
    let patched = format!("{}{COMPLETION_PLACEHOLDER}{}", &text[..at], &text[at..]);
    let scratch = Rc::new(ParsedFile::parse(
        SCRATCH_FILE,
        parsed.uri().clone(),
        parsed.language(),
        patched,
        parsed.provenance(),
    ));

    let Some(usage) = placeholder_usage(&scratch, offset) else {
        return Vec::new();
    };
    let prefix = usage
        .node()
        .text()
        .to_string()
        .split(COMPLETION_PLACEHOLDER)
        .next()
        .unwrap_or_default()
        .to_string();

    let is_member = usage
        .node()
        .parent()
        .and_then(DotExpr::cast)
        .and_then(|dot| dot.name_ref())
        .is_some_and(|name| name.syntax() == usage.node());
    let state = if is_member {
        ResolveState::new()
    } else {
        ResolveState::new().with_value(NEED_PREFIX, "true")
    };

    let mut variants: Vec<Variant> = Resolver::variants(ws, &usage, &state)
        .into_iter()
        .filter(|v| !v.name.contains(COMPLETION_PLACEHOLDER) && v.name.starts_with(prefix.as_str()))
        .collect();
    // Results computed for the scratch file must not outlive this request.
    ws.caches().clear_all();

    variants.sort_by(|a, b| a.label.cmp(&b.label));
    variants
}

/// The `NAME_REF` holding the placeholder.
fn placeholder_usage(scratch: &Rc<ParsedFile>, offset: TextSize) -> Option<NamedNode> {
    let token = scratch
        .syntax()
        .token_at_offset(offset)
        .find(|t| t.kind() == SyntaxKind::IDENT && t.text().contains(COMPLETION_PLACEHOLDER))?;
    let parent = token.parent()?;
    (parent.kind() == SyntaxKind::NAME_REF).then(|| NamedNode::new(parent, scratch.clone()))
}
