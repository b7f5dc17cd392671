//! Tolk scoping rules.
//!
//! Unqualified names walk outwards from the usage: block locals declared
//! earlier, `catch` and `match` variables, parameters, receiver generics and
//! type parameters, then the declarations of the file, of the files it
//! imports and of the implicitly imported stdlib. Member names (`q.name`)
//! look at the fields and methods of the qualifier's type instead.

use std::ops::ControlFlow;
use std::rc::Rc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::{LanguageBinding, NameProcessor, ScopeProcessor, resolve_by_name};
use crate::base::{FileId, Language};
use crate::hir::Workspace;
use crate::hir::infer::TypeInferer;
use crate::hir::psi::{DeclKind, NamedNode, is_receiver_type_param};
use crate::hir::referent::SearchScope;
use crate::hir::state::{COMPLETION, DOT_QUALIFIER, ResolveState, SEARCH_NAME};
use crate::hir::ty::{Ty, is_builtin_type_name, sized_family_name};
use crate::parser::ast::{
    self, AstNode, DotExpr, EnumDecl, FnDecl, Item, LetStmt, ObjectField, SourceFile, StructDecl,
    TypeName,
};
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::syntax::ParsedFile;

/// Declaration kinds visible by unqualified name at file level.
const FILE_LEVEL_KINDS: [DeclKind; 7] = [
    DeclKind::Function,
    DeclKind::GetMethod,
    DeclKind::Struct,
    DeclKind::Enum,
    DeclKind::Constant,
    DeclKind::GlobalVariable,
    DeclKind::TypeAlias,
];

pub struct TolkBinding;

impl LanguageBinding for TolkBinding {
    fn declaration_for_name(&self, ws: &Workspace, name: &NamedNode) -> Option<NamedNode> {
        match name.syntax_kind() {
            SyntaxKind::NAME => name
                .node()
                .parent()
                .filter(|p| DeclKind::of(p).is_some())
                .map(|p| name.with_node(p)),
            SyntaxKind::NAME_REF => name
                .node()
                .parent()
                .filter(|p| is_receiver_generic(ws, p))
                .map(|p| name.with_node(p)),
            _ => None,
        }
    }

    fn process_resolve_variants(
        &self,
        ws: &Workspace,
        usage: &NamedNode,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
    ) -> bool {
        let node = usage.node();
        if let Some(parent) = node.parent() {
            if let Some(dot) = DotExpr::cast(parent.clone())
                && dot.name_ref().is_some_and(|n| n.syntax() == node)
            {
                return process_members(ws, usage, &dot, processor, state);
            }
            if let Some(field) = ObjectField::cast(parent.clone())
                && field.name_ref().is_some_and(|n| n.syntax() == node)
            {
                if !process_literal_fields(ws, usage, &field, processor, state) {
                    return false;
                }
                if !state.flag(COMPLETION) {
                    return true;
                }
            }
        }
        if is_dot_qualifier(node) {
            let state = state.with_value(DOT_QUALIFIER, "true");
            process_scopes(ws, usage, processor, &state)
        } else {
            process_scopes(ws, usage, processor, state)
        }
    }

    fn use_scope(&self, ws: &Workspace, decl: &NamedNode) -> SearchScope {
        if decl.file().provenance().is_read_only() {
            return SearchScope::Global(ws.files_of(Language::Tolk));
        }
        let node = decl.node();
        let local = match node.kind() {
            SyntaxKind::VAR => node
                .ancestors()
                .find(|n| matches!(n.kind(), SyntaxKind::BLOCK | SyntaxKind::MATCH_EXPR))
                .map(|owner| match owner.parent() {
                    Some(p) if owner.kind() == SyntaxKind::BLOCK && p.kind() == SyntaxKind::DO_WHILE_STMT => p,
                    _ => owner,
                }),
            SyntaxKind::CATCH_VAR => node.ancestors().find(|n| n.kind() == SyntaxKind::CATCH_CLAUSE),
            SyntaxKind::PARAM | SyntaxKind::TYPE_NAME => node.ancestors().find(|n| is_function(n.kind())),
            SyntaxKind::TYPE_PARAM => node.ancestors().skip(1).find(|n| {
                is_function(n.kind()) || matches!(n.kind(), SyntaxKind::STRUCT | SyntaxKind::TYPE_ALIAS)
            }),
            _ => None,
        };
        match local {
            Some(owner) => SearchScope::Local(decl.with_node(owner)),
            None => {
                let mut files = vec![decl.file().clone()];
                files.extend(ws.dependents(decl.file()).iter().cloned());
                SearchScope::Global(files)
            }
        }
    }

    fn file_declarations(&self, file: &Rc<ParsedFile>) -> Vec<NamedNode> {
        let Some(source) = SourceFile::cast(file.syntax()) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for item in source.items() {
            let decl = NamedNode::new(item.syntax().clone(), file.clone());
            match &item {
                Item::Struct(s) => {
                    out.push(decl);
                    out.extend(s.fields().into_iter().map(|f| NamedNode::new(f.syntax().clone(), file.clone())));
                }
                Item::Enum(e) => {
                    out.push(decl);
                    out.extend(e.members().into_iter().map(|m| NamedNode::new(m.syntax().clone(), file.clone())));
                }
                _ => out.push(decl),
            }
        }
        out
    }

    fn search_name(&self, usage: &NamedNode, state: &ResolveState) -> SmolStr {
        if let Some(name) = state.get(SEARCH_NAME) {
            return SmolStr::new(name);
        }
        let name = usage.name();
        if is_type_position(usage.node())
            && let Some(family) = sized_family_name(&name)
        {
            return SmolStr::new(family);
        }
        name
    }

    fn multi_resolve(&self, ws: &Workspace, usage: &NamedNode, state: &ResolveState) -> Vec<NamedNode> {
        let mut results = resolve_by_name(self, ws, usage, state);
        let shorthand = usage
            .node()
            .parent()
            .and_then(ObjectField::cast)
            .is_some_and(|f| f.is_shorthand());
        if shorthand {
            let mut processor = NameProcessor::new(usage.name());
            process_scopes(ws, usage, &mut processor, state);
            for variable in processor.into_results() {
                if !results.contains(&variable) {
                    results.push(variable);
                }
            }
        }
        results
    }
}

// ============================================================================
// POSITION HELPERS
// ============================================================================

fn is_function(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::FUNCTION | SyntaxKind::METHOD | SyntaxKind::GET_METHOD)
}

/// The usage names a type: `x: Point`, `Box<int>`.
pub(crate) fn is_type_position(node: &SyntaxNode) -> bool {
    node.parent().is_some_and(|p| p.kind() == SyntaxKind::TYPE_NAME)
}

fn is_dot_qualifier(node: &SyntaxNode) -> bool {
    let qualifier = match node.parent() {
        Some(p) if p.kind() == SyntaxKind::GENERIC_EXPR => p,
        _ => node.clone(),
    };
    qualifier
        .parent()
        .and_then(DotExpr::cast)
        .and_then(|dot| dot.qualifier())
        .is_some_and(|q| q == qualifier)
}

/// `T` in `fun Box<T>.get()` or in `fun T.copy()`: a receiver type name
/// that names no builtin and no declared type.
pub fn is_receiver_generic(ws: &Workspace, node: &SyntaxNode) -> bool {
    if node.kind() != SyntaxKind::TYPE_NAME {
        return false;
    }
    let bare_receiver = node.parent().is_some_and(|p| p.kind() == SyntaxKind::RECEIVER);
    if !bare_receiver && !is_receiver_type_param(node) {
        return false;
    }
    let Some(type_name) = TypeName::cast(node.clone()) else {
        return false;
    };
    if !type_name.type_args().is_empty() {
        return false;
    }
    let Some(name) = type_name.name_ref().map(|n| n.text()) else {
        return false;
    };
    if name.is_empty() || is_builtin_type_name(&name) {
        return false;
    }
    let index = ws.index(Language::Tolk);
    [DeclKind::Struct, DeclKind::Enum, DeclKind::TypeAlias]
        .into_iter()
        .all(|kind| index.element_by_name(kind, &name).is_none())
}

/// Receiver generics declared by the method `func`.
fn receiver_generics(ws: &Workspace, func: &SyntaxNode) -> Vec<SyntaxNode> {
    FnDecl::cast(func.clone())
        .and_then(|f| f.receiver())
        .map(|r| {
            r.syntax()
                .descendants()
                .filter(|n| is_receiver_generic(ws, n))
                .collect()
        })
        .unwrap_or_default()
}

fn type_params(decl: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    decl.children()
        .filter(|n| n.kind() == SyntaxKind::TYPE_PARAM_LIST)
        .flat_map(|list| list.children().filter(|n| n.kind() == SyntaxKind::TYPE_PARAM))
}

/// `VAR` nodes bound by a `val`/`var` statement, destructuring included.
fn let_vars(stmt: &SyntaxNode) -> Vec<SyntaxNode> {
    LetStmt::cast(stmt.clone())
        .and_then(|s| s.pattern())
        .map(|pattern| {
            pattern
                .descendants()
                .filter(|n| n.kind() == SyntaxKind::VAR)
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// UNQUALIFIED NAMES
// ============================================================================

fn emit(
    usage: &NamedNode,
    node: SyntaxNode,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    processor.execute(&usage.with_node(node), state)
}

fn emit_locals_of_block(
    usage: &NamedNode,
    block: &SyntaxNode,
    before: Option<&SyntaxNode>,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    let statements: Vec<SyntaxNode> = block
        .children()
        .take_while(|s| Some(s) != before)
        .filter(|s| s.kind() == SyntaxKind::LET_STMT)
        .collect();
    for stmt in statements.iter().rev() {
        for var in let_vars(stmt) {
            emit(usage, var, processor, state)?;
        }
    }
    ControlFlow::Continue(())
}

/// Walk the local scopes around `usage`, innermost first.
fn process_local_scopes(
    ws: &Workspace,
    usage: &NamedNode,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    let in_type = is_type_position(usage.node());
    let mut child = usage.node().clone();
    for ancestor in usage.node().ancestors().skip(1) {
        match ancestor.kind() {
            SyntaxKind::BLOCK if !in_type => {
                emit_locals_of_block(usage, &ancestor, Some(&child), processor, state)?;
            }
            SyntaxKind::DO_WHILE_STMT if !in_type && child.kind() != SyntaxKind::BLOCK => {
                if let Some(body) = ancestor.children().find(|n| n.kind() == SyntaxKind::BLOCK) {
                    emit_locals_of_block(usage, &body, None, processor, state)?;
                }
            }
            SyntaxKind::CATCH_CLAUSE if !in_type && child.kind() == SyntaxKind::BLOCK => {
                for var in ancestor.children().filter(|n| n.kind() == SyntaxKind::CATCH_VAR) {
                    emit(usage, var, processor, state)?;
                }
            }
            SyntaxKind::MATCH_EXPR if !in_type && child.kind() == SyntaxKind::MATCH_BODY => {
                for var in ancestor.children().filter(|n| n.kind() == SyntaxKind::VAR) {
                    emit(usage, var, processor, state)?;
                }
            }
            kind if is_function(kind) => {
                if let Some(func) = FnDecl::cast(ancestor.clone()) {
                    for param in func.params() {
                        let is_self = param.name().is_some_and(|n| n.text() == "self");
                        if !in_type || is_self {
                            emit(usage, param.syntax().clone(), processor, state)?;
                        }
                    }
                }
                for generic in receiver_generics(ws, &ancestor) {
                    emit(usage, generic, processor, state)?;
                }
                for param in type_params(&ancestor) {
                    emit(usage, param, processor, state)?;
                }
            }
            SyntaxKind::STRUCT | SyntaxKind::TYPE_ALIAS => {
                for param in type_params(&ancestor) {
                    emit(usage, param, processor, state)?;
                }
            }
            _ => {}
        }
        child = ancestor;
    }
    ControlFlow::Continue(())
}

/// Feed the file-level declarations of `file` that suit the usage position.
fn process_file_level(
    ws: &Workspace,
    file: &Rc<ParsedFile>,
    kinds: &[DeclKind],
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    let index = ws.index(Language::Tolk);
    match index.file_index(file.uri()).filter(|i| i.file().id() == file.id()) {
        Some(file_index) => {
            for kind in kinds {
                for element in file_index.elements(*kind) {
                    processor.execute(element, state)?;
                }
            }
        }
        None => {
            let declarations = TolkBinding.file_declarations(file);
            for kind in kinds {
                for element in declarations.iter().filter(|d| d.kind() == Some(*kind)) {
                    processor.execute(element, state)?;
                }
            }
        }
    }
    ControlFlow::Continue(())
}

fn process_scopes(
    ws: &Workspace,
    usage: &NamedNode,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> bool {
    process_scopes_inner(ws, usage, processor, state).is_continue()
}

fn process_scopes_inner(
    ws: &Workspace,
    usage: &NamedNode,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    process_local_scopes(ws, usage, processor, state)?;
    processor.finish_scope()?;

    let in_type = is_type_position(usage.node());
    let dot_qualifier = state.flag(DOT_QUALIFIER);
    let kinds: Vec<DeclKind> = FILE_LEVEL_KINDS
        .into_iter()
        .filter(|k| !in_type || k.is_type())
        .filter(|k| !dot_qualifier || !k.is_function())
        .collect();

    let own = usage.file();
    let mut visited: FxHashSet<FileId> = FxHashSet::default();
    visited.insert(own.id());
    process_file_level(ws, own, &kinds, processor, state)?;
    processor.finish_scope()?;

    if state.flag(COMPLETION) {
        let all: Vec<Rc<ParsedFile>> = ws.index(Language::Tolk).files().cloned().collect();
        for file in all {
            if visited.insert(file.id()) {
                process_file_level(ws, &file, &kinds, processor, state)?;
            }
        }
        return processor.finish_scope();
    }

    for file in ws.reachable_files(own).iter() {
        if visited.insert(file.id()) {
            process_file_level(ws, file, &kinds, processor, state)?;
        }
    }
    processor.finish_scope()?;

    for file in ws.implicit_files() {
        if visited.insert(file.id()) {
            process_file_level(ws, &file, &kinds, processor, state)?;
        }
    }
    processor.finish_scope()
}

// ============================================================================
// MEMBERS
// ============================================================================

/// The declaration a qualifier names when it is a type: `Point.create()`,
/// `Color.Red`, `Wrapper<int>.new()`.
fn type_qualifier(ws: &Workspace, qualifier: &NamedNode) -> Option<NamedNode> {
    let name_ref = match qualifier.syntax_kind() {
        SyntaxKind::NAME_REF => qualifier.node().clone(),
        SyntaxKind::GENERIC_EXPR => qualifier
            .node()
            .children()
            .find(|n| n.kind() == SyntaxKind::NAME_REF)?,
        _ => return None,
    };
    let decl = super::Resolver::resolve(ws, &qualifier.with_node(name_ref))?;
    decl.kind().filter(|k| k.is_type()).map(|_| decl)
}

/// The types whose members a qualifier of type `ty` exposes, outermost
/// first: `T?` → `T`, alias → aliased type, `Box<int>` → `Box`.
fn member_chain(ty: &Ty) -> Vec<Ty> {
    let mut chain = Vec::new();
    let mut current = ty.unwrap_option();
    loop {
        chain.push(current.clone());
        let next = match &current {
            Ty::TypeAlias { inner, .. } => inner.unwrap_option(),
            Ty::Instantiation { inner, .. } => inner.as_ref().clone(),
            _ => break,
        };
        if chain.contains(&next) {
            break;
        }
        current = next;
    }
    chain
}

/// How a member is reached: `Point.create()` or `p.x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Access {
    /// The qualifier names a type: static methods and enum members.
    Static,
    /// The qualifier is a value: fields and instance methods.
    Instance,
}

fn process_members(
    ws: &Workspace,
    usage: &NamedNode,
    dot: &DotExpr,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> bool {
    let Some(qualifier) = dot.qualifier() else {
        return true;
    };
    let qualifier = usage.with_node(qualifier);
    let (qualifier_ty, access) = match type_qualifier(ws, &qualifier) {
        Some(decl) => (TypeInferer::type_of(ws, &decl), Access::Static),
        None => (TypeInferer::type_of(ws, &qualifier), Access::Instance),
    };
    let Some(qualifier_ty) = qualifier_ty else {
        return true;
    };
    process_members_of(ws, &qualifier_ty, access, processor, state).is_continue()
}

fn process_members_of(
    ws: &Workspace,
    ty: &Ty,
    access: Access,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    for element in member_chain(ty) {
        match (&element, access) {
            (Ty::Struct { anchor: Some(anchor), .. }, Access::Instance) => {
                emit_struct_fields(anchor, processor, state)?
            }
            (Ty::Enum { anchor: Some(anchor), .. }, Access::Static) => {
                emit_enum_members(anchor, processor, state)?
            }
            _ => {}
        }
        process_methods(ws, &element, access, processor, state)?;
    }
    processor.finish_scope()
}

fn emit_struct_fields(
    anchor: &NamedNode,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    let Some(decl) = StructDecl::cast(anchor.node().clone()) else {
        return ControlFlow::Continue(());
    };
    for field in decl.fields() {
        processor.execute(&anchor.with_node(field.syntax().clone()), state)?;
    }
    ControlFlow::Continue(())
}

fn emit_enum_members(
    anchor: &NamedNode,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    let Some(decl) = EnumDecl::cast(anchor.node().clone()) else {
        return ControlFlow::Continue(());
    };
    for member in decl.members() {
        processor.execute(&anchor.with_node(member.syntax().clone()), state)?;
    }
    ControlFlow::Continue(())
}

/// Methods whose receiver accepts `ty` and whose kind fits `access`.
fn process_methods(
    ws: &Workspace,
    ty: &Ty,
    access: Access,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> ControlFlow<()> {
    let mut matching = |method: &NamedNode, state: &ResolveState| -> ControlFlow<()> {
        let is_static = FnDecl::cast(method.node().clone()).is_some_and(|f| f.is_static());
        if is_static == (access == Access::Static) && receiver_matches(ws, method, ty) {
            processor.execute(method, state)
        } else {
            ControlFlow::Continue(())
        }
    };
    if ws
        .index(Language::Tolk)
        .process_elements_by_key(DeclKind::Method, &mut matching, state)
    {
        ControlFlow::Continue(())
    } else {
        ControlFlow::Break(())
    }
}

/// Whether the receiver of `method` accepts a qualifier of type `ty`.
pub(crate) fn receiver_matches(ws: &Workspace, method: &NamedNode, ty: &Ty) -> bool {
    let Some(receiver) = TypeInferer::receiver_type(ws, method) else {
        return false;
    };
    if matches!(receiver, Ty::TypeParameter { .. }) || receiver == *ty {
        return true;
    }
    if receiver.has_generics() && receiver.unwrap_instantiation() == ty.unwrap_instantiation() {
        return true;
    }
    false
}

/// Fields of the struct an object literal builds: `Point { x: 1 }`.
fn process_literal_fields(
    ws: &Workspace,
    usage: &NamedNode,
    field: &ObjectField,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> bool {
    let Some(literal) = field.literal() else {
        return true;
    };
    let Some(ty) = TypeInferer::type_of(ws, &usage.with_node(literal.syntax().clone())) else {
        return true;
    };
    for element in member_chain(&ty) {
        if let Ty::Struct { anchor: Some(anchor), .. } = element.base_type() {
            return emit_struct_fields(&anchor, processor, state).is_continue()
                && processor.finish_scope().is_continue();
        }
    }
    true
}

/// Names a type argument list binds in `decl`, in declaration order.
pub(crate) fn type_param_names(decl: &SyntaxNode) -> Vec<SmolStr> {
    type_params(decl)
        .filter_map(|p| ast::TypeParam::cast(p).and_then(|p| p.name()).map(|n| n.text()))
        .collect()
}
