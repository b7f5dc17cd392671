//! Name resolution: from a usage identifier to its declarations.
//!
//! The engine is language independent. Each language plugs in through a
//! [`LanguageBinding`] that knows which nodes are usages, how scopes nest and
//! which declarations a file contributes to the index.
//!
//! ## Flow
//!
//! ```text
//! Resolver::multi_resolve(usage)
//!     │  declaration name?  → the declaration itself
//!     │  cached?            → cached result (empty ResolveState only)
//!     ▼
//! LanguageBinding::process_resolve_variants(usage, processor)
//!     │  innermost scope first; each candidate goes to the processor
//!     ▼
//! NameProcessor: keeps candidates with the searched name
//! ```
//!
//! Resolution never fails loudly: no match is `None` or an empty vector.

mod fift;
mod tlb;
mod tolk;

use std::ops::ControlFlow;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use super::Workspace;
use super::psi::{DeclKind, NamedNode};
use super::referent::SearchScope;
use super::state::{COMPLETION, NEED_PREFIX, ResolveState, SEARCH_NAME};
use crate::base::Language;
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::syntax::ParsedFile;

pub use fift::FiftBinding;
pub use tlb::TlbBinding;
pub use tolk::{TolkBinding, is_receiver_generic};
pub(crate) use tolk::{is_type_position, receiver_matches, type_param_names};

// ============================================================================
// PROCESSORS
// ============================================================================

/// Receives resolution candidates, innermost scope first.
pub trait ScopeProcessor {
    /// Inspect one candidate. `Break` stops the walk.
    fn execute(&mut self, candidate: &NamedNode, state: &ResolveState) -> ControlFlow<()>;

    /// Called when the walk leaves a group of scopes that shadow the ones
    /// after it. `Break` stops the walk.
    fn finish_scope(&mut self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<F> ScopeProcessor for F
where
    F: FnMut(&NamedNode, &ResolveState) -> ControlFlow<()>,
{
    fn execute(&mut self, candidate: &NamedNode, state: &ResolveState) -> ControlFlow<()> {
        self(candidate, state)
    }
}

/// Collects the candidates named `name`.
///
/// A local match (anything below the top level) shadows everything outside
/// it and stops the walk at once. Top-level matches are collected until the
/// current scope group ends, so duplicates across imported files all show.
pub struct NameProcessor {
    name: SmolStr,
    results: Vec<NamedNode>,
}

impl NameProcessor {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            results: Vec::new(),
        }
    }

    pub fn into_results(self) -> Vec<NamedNode> {
        self.results
    }
}

impl ScopeProcessor for NameProcessor {
    fn execute(&mut self, candidate: &NamedNode, _state: &ResolveState) -> ControlFlow<()> {
        if candidate.name() != self.name || self.results.contains(candidate) {
            return ControlFlow::Continue(());
        }
        self.results.push(candidate.clone());
        match candidate.kind() {
            Some(kind) if kind.is_top_level() => ControlFlow::Continue(()),
            _ => ControlFlow::Break(()),
        }
    }

    fn finish_scope(&mut self) -> ControlFlow<()> {
        if self.results.is_empty() {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}

/// A declaration visible at some position, as offered by completion.
#[derive(Debug, Clone)]
pub struct Variant {
    pub name: SmolStr,
    /// Text to insert: `Enum.Member` when a prefix was requested.
    pub label: SmolStr,
    pub node: NamedNode,
}

impl Variant {
    pub fn kind(&self) -> Option<DeclKind> {
        self.node.kind()
    }
}

struct VariantCollector {
    need_prefix: bool,
    seen: FxHashSet<SmolStr>,
    variants: Vec<Variant>,
}

impl ScopeProcessor for VariantCollector {
    fn execute(&mut self, candidate: &NamedNode, _state: &ResolveState) -> ControlFlow<()> {
        let name = candidate.name();
        if name.is_empty() || !self.seen.insert(name.clone()) {
            return ControlFlow::Continue(());
        }
        let label = match candidate.kind() {
            Some(DeclKind::EnumMember) if self.need_prefix => candidate
                .node()
                .ancestors()
                .find(|n| n.kind() == SyntaxKind::ENUM)
                .map(|owner| SmolStr::new(format!("{}.{name}", candidate.with_node(owner).name())))
                .unwrap_or_else(|| name.clone()),
            _ => name.clone(),
        };
        self.variants.push(Variant {
            name,
            label,
            node: candidate.clone(),
        });
        ControlFlow::Continue(())
    }
}

// ============================================================================
// LANGUAGE BINDING
// ============================================================================

/// Per-language resolution rules.
pub trait LanguageBinding {
    /// Whether `node` is a usage identifier.
    fn is_reference_name(&self, node: &SyntaxNode) -> bool {
        node.kind() == SyntaxKind::NAME_REF
    }

    /// The declaration a declaration's own name belongs to.
    fn declaration_for_name(&self, _ws: &Workspace, name: &NamedNode) -> Option<NamedNode> {
        if name.syntax_kind() != SyntaxKind::NAME {
            return None;
        }
        name.node()
            .ancestors()
            .skip(1)
            .take(2)
            .find(|n| DeclKind::of(n).is_some())
            .map(|n| name.with_node(n))
    }

    /// Feed every declaration visible from `usage` to `processor`,
    /// innermost scope first. Returns `false` when the processor stopped.
    fn process_resolve_variants(
        &self,
        ws: &Workspace,
        usage: &NamedNode,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
    ) -> bool;

    /// Where usages of `decl` can appear.
    fn use_scope(&self, ws: &Workspace, decl: &NamedNode) -> SearchScope;

    /// Declarations `file` contributes to the index.
    fn file_declarations(&self, file: &Rc<ParsedFile>) -> Vec<NamedNode>;

    /// The name to look up for `usage`.
    fn search_name(&self, usage: &NamedNode, state: &ResolveState) -> SmolStr {
        state
            .get(SEARCH_NAME)
            .map(SmolStr::new)
            .unwrap_or_else(|| usage.name())
    }

    fn multi_resolve(&self, ws: &Workspace, usage: &NamedNode, state: &ResolveState) -> Vec<NamedNode>;
}

/// Shared body of [`LanguageBinding::multi_resolve`]: walk the scopes and
/// keep the candidates with the searched name.
pub fn resolve_by_name(
    binding: &dyn LanguageBinding,
    ws: &Workspace,
    usage: &NamedNode,
    state: &ResolveState,
) -> Vec<NamedNode> {
    let name = binding.search_name(usage, state);
    if name.is_empty() || name == "_" {
        return Vec::new();
    }
    let mut processor = NameProcessor::new(name);
    binding.process_resolve_variants(ws, usage, &mut processor, state);
    processor.into_results()
}

static TOLK: TolkBinding = TolkBinding;
static TLB: TlbBinding = TlbBinding;
static FIFT: FiftBinding = FiftBinding;

/// The binding of `language`.
pub fn binding(language: Language) -> &'static dyn LanguageBinding {
    match language {
        Language::Tolk => &TOLK,
        Language::Tlb => &TLB,
        Language::Fift => &FIFT,
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Entry points of name resolution.
pub struct Resolver;

impl Resolver {
    /// The first declaration `usage` refers to.
    pub fn resolve(ws: &Workspace, usage: &NamedNode) -> Option<NamedNode> {
        Self::multi_resolve(ws, usage).into_iter().next()
    }

    /// Every declaration `usage` refers to. Cached per usage.
    pub fn multi_resolve(ws: &Workspace, usage: &NamedNode) -> Vec<NamedNode> {
        Self::multi_resolve_with(ws, usage, &ResolveState::new())
    }

    /// Like [`Self::multi_resolve`] with an explicit context. Only the empty
    /// context is cached.
    pub fn multi_resolve_with(ws: &Workspace, usage: &NamedNode, state: &ResolveState) -> Vec<NamedNode> {
        let Some(ident) = identifier(usage) else {
            return Vec::new();
        };
        let binding = binding(ident.language());
        if let Some(decl) = binding.declaration_for_name(ws, &ident) {
            return vec![decl];
        }
        if !binding.is_reference_name(ident.node()) {
            return Vec::new();
        }
        if !state.is_empty() {
            return binding.multi_resolve(ws, &ident, state);
        }

        let key = ident.key();
        if let Some(cached) = ws.caches().resolved(&key) {
            return cached.to_vec();
        }
        let results = binding.multi_resolve(ws, &ident, state);
        if results.is_empty() {
            trace!(name = %ident.name(), uri = %ident.file().uri(), "unresolved reference");
        }
        ws.caches().store_resolved(key, results.clone().into());
        results
    }

    /// Declarations visible at `node`, for completion. Collected from all
    /// indexed files, not only the reachable ones.
    pub fn variants(ws: &Workspace, node: &NamedNode, state: &ResolveState) -> Vec<Variant> {
        let Some(ident) = identifier(node) else {
            return Vec::new();
        };
        let mut collector = VariantCollector {
            need_prefix: state.flag(NEED_PREFIX),
            seen: FxHashSet::default(),
            variants: Vec::new(),
        };
        let state = state.with_value(COMPLETION, "true");
        binding(ident.language()).process_resolve_variants(ws, &ident, &mut collector, &state);
        collector.variants
    }
}

/// The `NAME`/`NAME_REF` node to resolve for `node`.
fn identifier(node: &NamedNode) -> Option<NamedNode> {
    match node.syntax_kind() {
        SyntaxKind::NAME | SyntaxKind::NAME_REF => Some(node.clone()),
        _ => node.name_identifier().map(|n| node.with_node(n)),
    }
}
