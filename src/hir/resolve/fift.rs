//! Fift scoping rules: a word names a procedure or method of the same file.

use std::rc::Rc;

use super::{LanguageBinding, ScopeProcessor, resolve_by_name};
use crate::base::Language;
use crate::hir::Workspace;
use crate::hir::psi::{DeclKind, NamedNode};
use crate::hir::referent::SearchScope;
use crate::hir::state::ResolveState;
use crate::parser::SyntaxKind;
use crate::syntax::ParsedFile;

pub struct FiftBinding;

impl LanguageBinding for FiftBinding {
    fn process_resolve_variants(
        &self,
        ws: &Workspace,
        usage: &NamedNode,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
    ) -> bool {
        let index = ws.index(Language::Fift);
        let uri = usage.file().uri();
        index.process_elements_by_key_and_file(DeclKind::Function, uri, processor, state)
            && index.process_elements_by_key_and_file(DeclKind::GetMethod, uri, processor, state)
            && processor.finish_scope().is_continue()
    }

    fn use_scope(&self, _ws: &Workspace, decl: &NamedNode) -> SearchScope {
        SearchScope::Global(vec![decl.file().clone()])
    }

    fn file_declarations(&self, file: &Rc<ParsedFile>) -> Vec<NamedNode> {
        file.syntax()
            .descendants()
            .filter(|n| matches!(n.kind(), SyntaxKind::FIFT_PROC | SyntaxKind::FIFT_METHOD))
            .map(|n| NamedNode::new(n, file.clone()))
            .collect()
    }

    fn multi_resolve(&self, ws: &Workspace, usage: &NamedNode, state: &ResolveState) -> Vec<NamedNode> {
        resolve_by_name(self, ws, usage, state)
    }
}
