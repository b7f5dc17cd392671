//! Find usages of a declaration.
//!
//! Every declaration has a [`SearchScope`] outside of which it cannot be
//! used: a local variable lives in its block, a parameter in its function,
//! a top-level declaration in its file and every file importing it. The
//! search walks that scope and resolves only identifiers spelled like the
//! declaration.

use std::rc::Rc;

use smol_str::SmolStr;

use super::Workspace;
use super::psi::NamedNode;
use super::resolve::{Resolver, binding};
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::syntax::{ParsedFile, VisitAction, walk};

/// Where usages of a declaration can appear.
#[derive(Debug, Clone)]
pub enum SearchScope {
    /// Inside this node only.
    Local(NamedNode),
    /// Anywhere in these files.
    Global(Vec<Rc<ParsedFile>>),
}

#[derive(Debug, Clone, Copy)]
pub struct FindReferenceOptions {
    /// Put the declaration's own name first in the result.
    pub include_definition: bool,
    /// Treat `self` identifiers as candidates.
    pub include_self: bool,
    /// For global scopes, search only the file the search started from.
    pub same_file_only: bool,
    pub limit: Option<usize>,
}

impl Default for FindReferenceOptions {
    fn default() -> Self {
        Self {
            include_definition: false,
            include_self: true,
            same_file_only: false,
            limit: None,
        }
    }
}

/// A resolved declaration together with the file the search started from.
pub struct Referent<'a> {
    ws: &'a Workspace,
    origin: Rc<ParsedFile>,
    resolved: Option<NamedNode>,
}

impl<'a> Referent<'a> {
    /// `element` may be a declaration or a usage; usages are resolved first.
    pub fn new(ws: &'a Workspace, element: &NamedNode) -> Self {
        Self {
            ws,
            origin: element.file().clone(),
            resolved: Resolver::resolve(ws, element),
        }
    }

    pub fn resolved(&self) -> Option<&NamedNode> {
        self.resolved.as_ref()
    }

    pub fn use_scope(&self) -> Option<SearchScope> {
        let resolved = self.resolved.as_ref()?;
        Some(binding(resolved.language()).use_scope(self.ws, resolved))
    }

    /// Usage identifiers of the declaration, in scope order.
    pub fn find_references(&self, options: FindReferenceOptions) -> Vec<NamedNode> {
        let Some(resolved) = &self.resolved else {
            return Vec::new();
        };
        let Some(scope) = self.use_scope() else {
            return Vec::new();
        };
        let mut search = Search {
            ws: self.ws,
            resolved,
            name: resolved.name(),
            include_self: options.include_self,
            limit: options.limit.unwrap_or(usize::MAX),
            results: Vec::new(),
        };
        if search.limit == 0 {
            return Vec::new();
        }

        let same_file = resolved.file().id() == self.origin.id();
        if options.include_definition
            && (!options.same_file_only || same_file)
            && let Some(name) = resolved.name_identifier()
        {
            search.results.push(resolved.with_node(name));
        }

        match scope {
            SearchScope::Local(owner) => {
                search.traverse(owner.file(), owner.node());
            }
            SearchScope::Global(_) if options.same_file_only => {
                search.traverse(&self.origin, &self.origin.syntax());
            }
            SearchScope::Global(files) => {
                for file in &files {
                    if !file.text().contains(search.name.as_str()) && !options.include_self {
                        continue;
                    }
                    if !search.traverse(file, &file.syntax()) {
                        break;
                    }
                }
            }
        }
        search.results
    }
}

struct Search<'a> {
    ws: &'a Workspace,
    resolved: &'a NamedNode,
    name: SmolStr,
    include_self: bool,
    limit: usize,
    results: Vec<NamedNode>,
}

impl Search<'_> {
    /// Returns `false` once the limit is reached.
    fn traverse(&mut self, file: &Rc<ParsedFile>, root: &SyntaxNode) -> bool {
        let binding = binding(file.language());
        walk(root, |node| {
            if !matches!(node.kind(), SyntaxKind::NAME | SyntaxKind::NAME_REF) {
                return VisitAction::Continue;
            }
            let candidate = NamedNode::new(node.clone(), file.clone());
            let text = candidate.name();
            if text != self.name && text != "self" {
                return VisitAction::SkipChildren;
            }
            if text == "self" && !self.include_self {
                return VisitAction::SkipChildren;
            }
            if !binding.is_reference_name(node)
                || binding.declaration_for_name(self.ws, &candidate).is_some()
            {
                return VisitAction::SkipChildren;
            }
            let targets = Resolver::multi_resolve(self.ws, &candidate);
            if targets.iter().any(|t| t == self.resolved) {
                self.results.push(candidate);
                if self.results.len() >= self.limit {
                    return VisitAction::Stop;
                }
            }
            VisitAction::SkipChildren
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::TextSize;

    fn at(ws: &Workspace, uri: &str, marker: &str, nth: usize) -> NamedNode {
        let file = ws.file_by_uri(uri).unwrap();
        let offset = file.text().match_indices(marker).nth(nth).unwrap().0;
        let token = file
            .syntax()
            .token_at_offset(TextSize::from(offset as u32))
            .right_biased()
            .unwrap();
        NamedNode::new(token.parent().unwrap(), file)
    }

    fn offsets(nodes: &[NamedNode]) -> Vec<u32> {
        nodes.iter().map(|n| n.range().start().into()).collect()
    }

    #[test]
    fn test_local_references_stay_in_block() {
        let mut ws = Workspace::new();
        let text = "fun a() { val x = 1; x + x; }\nfun b() { val x = 2; x; }";
        ws.set_file_text("/ws/a.tolk", text).unwrap();
        let decl = at(&ws, "/ws/a.tolk", "x", 0);
        let refs = Referent::new(&ws, &decl).find_references(FindReferenceOptions::default());
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.range().end() < TextSize::from(30)));
    }

    #[test]
    fn test_global_references_cross_imports() {
        let mut ws = Workspace::new();
        ws.set_file_text("/ws/lib.tolk", "fun helper() {}").unwrap();
        ws.set_file_text("/ws/main.tolk", "import \"lib\"\nfun main() { helper(); helper(); }")
            .unwrap();
        ws.set_file_text("/ws/other.tolk", "fun helper() {}\nfun x() { helper(); }")
            .unwrap();
        let usage = at(&ws, "/ws/main.tolk", "helper", 0);
        let referent = Referent::new(&ws, &usage);
        assert_eq!(referent.resolved().unwrap().file().uri(), "/ws/lib.tolk");

        let refs = referent.find_references(FindReferenceOptions {
            include_definition: true,
            ..Default::default()
        });
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].syntax_kind(), SyntaxKind::NAME);
        assert!(refs[1..].iter().all(|r| r.file().uri() == "/ws/main.tolk"));
    }

    #[test]
    fn test_limit_and_same_file_only() {
        let mut ws = Workspace::new();
        ws.set_file_text("/ws/lib.tolk", "fun helper() {}\nfun own() { helper(); }").unwrap();
        ws.set_file_text("/ws/main.tolk", "import \"lib\"\nfun main() { helper(); helper(); }")
            .unwrap();
        let decl = at(&ws, "/ws/lib.tolk", "helper", 0);
        let referent = Referent::new(&ws, &decl);
        let limited = referent.find_references(FindReferenceOptions {
            limit: Some(2),
            ..Default::default()
        });
        assert_eq!(limited.len(), 2);
        let local = referent.find_references(FindReferenceOptions {
            same_file_only: true,
            ..Default::default()
        });
        assert_eq!(offsets(&local).len(), 1);
    }

    #[test]
    fn test_self_is_excluded_on_request() {
        let mut ws = Workspace::new();
        ws.set_file_text(
            "/ws/a.tolk",
            "struct P { x: int }\nfun P.get(self) { return self.x + self.x; }",
        )
        .unwrap();
        let decl = at(&ws, "/ws/a.tolk", "self", 0);
        let referent = Referent::new(&ws, &decl);
        assert_eq!(referent.find_references(FindReferenceOptions::default()).len(), 2);
        let without_self = referent.find_references(FindReferenceOptions {
            include_self: false,
            ..Default::default()
        });
        assert!(without_self.is_empty());
    }
}
