//! TL-B scoping rules.
//!
//! Inside a constructor, names resolve to its implicit parameters (`{n:#}`,
//! `{X:Type}`) and named fields. Everything else is a combinator name and
//! resolves to every constructor producing it.

use std::ops::ControlFlow;
use std::rc::Rc;

use super::{LanguageBinding, ScopeProcessor, resolve_by_name};
use crate::base::Language;
use crate::hir::Workspace;
use crate::hir::psi::{DeclKind, NamedNode};
use crate::hir::referent::SearchScope;
use crate::hir::state::ResolveState;
use crate::parser::ast::{AstNode, TlbDeclaration};
use crate::parser::SyntaxKind;
use crate::syntax::ParsedFile;

/// Type names built into TL-B itself.
const BUILTIN_TYPES: &[&str] = &["Type", "Cell", "Any", "Bit", "Bool", "int", "uint", "bits"];

fn is_builtin(name: &str) -> bool {
    if BUILTIN_TYPES.contains(&name) {
        return true;
    }
    ["int", "uint", "bits"].iter().any(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
    })
}

pub struct TlbBinding;

impl LanguageBinding for TlbBinding {
    fn process_resolve_variants(
        &self,
        ws: &Workspace,
        usage: &NamedNode,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
    ) -> bool {
        process(ws, usage, processor, state).is_continue()
    }

    fn use_scope(&self, ws: &Workspace, decl: &NamedNode) -> SearchScope {
        match decl.syntax_kind() {
            SyntaxKind::TLB_FIELD | SyntaxKind::TLB_IMPLICIT_PARAM => decl
                .node()
                .ancestors()
                .find(|n| n.kind() == SyntaxKind::TLB_DECLARATION)
                .map(|owner| SearchScope::Local(decl.with_node(owner)))
                .unwrap_or_else(|| SearchScope::Global(vec![decl.file().clone()])),
            _ => SearchScope::Global(ws.files_of(Language::Tlb)),
        }
    }

    fn file_declarations(&self, file: &Rc<ParsedFile>) -> Vec<NamedNode> {
        file.syntax()
            .children()
            .filter(|n| n.kind() == SyntaxKind::TLB_DECLARATION)
            .map(|n| NamedNode::new(n, file.clone()))
            .collect()
    }

    fn multi_resolve(&self, ws: &Workspace, usage: &NamedNode, state: &ResolveState) -> Vec<NamedNode> {
        if is_builtin(&usage.name()) {
            return Vec::new();
        }
        resolve_by_name(self, ws, usage, state)
    }
}

fn process(
    ws: &Workspace,
    usage: &NamedNode,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    if let Some(decl) = usage.node().ancestors().find_map(TlbDeclaration::cast) {
        for param in decl.implicit_params() {
            processor.execute(&usage.with_node(param), state)?;
        }
        for field in decl.fields() {
            processor.execute(&usage.with_node(field), state)?;
        }
    }
    processor.finish_scope()?;

    let index = ws.index(Language::Tlb);
    if !index.process_elements_by_key(DeclKind::Struct, processor, state) {
        return ControlFlow::Break(());
    }
    processor.finish_scope()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TextSize;
    use crate::hir::Resolver;

    const SCHEMA: &str = "nothing$0 {X:Type} = Maybe X;\n\
                          just$1 {X:Type} value:X = Maybe X;\n\
                          pair$_ {n:#} a:(## n) b:(Maybe uint32) = Pair n;\n";

    fn usage(ws: &Workspace, marker: &str, nth: usize) -> NamedNode {
        let file = ws.file_by_uri("/ws/block.tlb").unwrap();
        let offset = file.text().match_indices(marker).nth(nth).unwrap().0;
        let token = file
            .syntax()
            .token_at_offset(TextSize::from(offset as u32))
            .right_biased()
            .unwrap();
        NamedNode::new(token.parent().unwrap(), file)
    }

    fn workspace() -> Workspace {
        let mut ws = Workspace::new();
        ws.set_file_text("/ws/block.tlb", SCHEMA).unwrap();
        ws
    }

    #[test]
    fn test_combinator_resolves_to_all_constructors() {
        let ws = workspace();
        let maybe = usage(&ws, "Maybe uint32", 0);
        let targets = Resolver::multi_resolve(&ws, &maybe);
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|t| t.name() == "Maybe"));
    }

    #[test]
    fn test_params_and_fields_are_local() {
        let ws = workspace();
        let n = usage(&ws, "n)", 0);
        let target = Resolver::resolve(&ws, &n).unwrap();
        assert_eq!(target.syntax_kind(), SyntaxKind::TLB_IMPLICIT_PARAM);
        let x = usage(&ws, "X = Maybe", 0);
        let target = Resolver::resolve(&ws, &x).unwrap();
        assert_eq!(target.kind(), Some(DeclKind::TypeParameter));
        assert!(target.range().start() > TextSize::from(30));
    }

    #[test]
    fn test_builtins_do_not_resolve() {
        let ws = workspace();
        let builtin = usage(&ws, "uint32", 0);
        assert!(Resolver::multi_resolve(&ws, &builtin).is_empty());
    }
}
