//! Type inference for Tolk.
//!
//! Inference is a bottom-up function over tree shape: literals have fixed
//! types, annotated declarations take their annotation, unannotated ones
//! recurse into their initializer, identifiers delegate to name resolution
//! and member access composes the qualifier type with the member type.
//!
//! Every result is memoized per node in the session caches. A request that
//! re-enters a node still being computed yields `None`, which callers treat
//! as "unknown".

use std::rc::Rc;

use smol_str::SmolStr;

use super::Workspace;
use super::psi::{DeclKind, NamedNode};
use super::resolve::{Resolver, is_receiver_generic, type_param_names};
use super::ty::{Ty, TyMapping, name_to_type};
use crate::base::{Language, TextRange, TextSize};
use crate::parser::ast::{
    self, AstNode, CallExpr, ConstDecl, DotExpr, FieldDecl, FnDecl, GenericExpr, LetStmt, MatchExpr,
    ObjectLiteral, Param, TypeAliasDecl, TypeName, VarDecl,
};
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::syntax::ParsedFile;

/// Entry points of type inference.
pub struct TypeInferer;

impl TypeInferer {
    /// Type of `node`, or `None` when its shape is not inferable.
    pub fn type_of(ws: &Workspace, node: &NamedNode) -> Option<Ty> {
        if node.language() != Language::Tolk {
            return None;
        }
        let key = node.key();
        if is_function(node.syntax_kind()) {
            return ws.caches().func_type(key, || function_type(ws, node));
        }
        ws.caches().type_of(key, || infer(ws, node))
    }

    /// Receiver type of a method: `Point` for `fun Point.len()`.
    pub fn receiver_type(ws: &Workspace, method: &NamedNode) -> Option<Ty> {
        let func = FnDecl::cast(method.node().clone())?;
        let ty = func.receiver()?.ty()?;
        Self::type_of(ws, &method.with_node(ty))
    }

    /// Type of the innermost inferable node at `offset`, with its range.
    ///
    /// Walks outwards from the token and stops at the enclosing statement or
    /// declaration.
    pub fn type_at(ws: &Workspace, file: &Rc<ParsedFile>, offset: TextSize) -> Option<(Ty, TextRange)> {
        let tokens = file.syntax().token_at_offset(offset);
        let token = match tokens.clone().left_biased() {
            Some(t) if t.kind() == SyntaxKind::IDENT => t,
            _ => tokens.right_biased()?,
        };
        for node in token.parent_ancestors() {
            let kind = node.kind();
            if kind.is_statement() || kind.is_top_level_decl() || kind == SyntaxKind::SOURCE_FILE {
                break;
            }
            let named = NamedNode::new(node, file.clone());
            if let Some(ty) = Self::type_of(ws, &named) {
                return Some((ty, named.range()));
            }
        }
        None
    }
}

fn is_function(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::FUNCTION | SyntaxKind::METHOD | SyntaxKind::GET_METHOD)
}

fn type_of_node(ws: &Workspace, anchor: &NamedNode, node: SyntaxNode) -> Option<Ty> {
    TypeInferer::type_of(ws, &anchor.with_node(node))
}

fn infer(ws: &Workspace, node: &NamedNode) -> Option<Ty> {
    let kind = node.syntax_kind();
    if kind.is_type() {
        return type_from_node(ws, node);
    }
    match kind {
        SyntaxKind::NAME => node
            .parent()
            .filter(|p| p.is_declaration())
            .and_then(|p| TypeInferer::type_of(ws, &p)),
        SyntaxKind::STRUCT
        | SyntaxKind::ENUM
        | SyntaxKind::TYPE_ALIAS
        | SyntaxKind::TYPE_PARAM
        | SyntaxKind::ENUM_MEMBER
        | SyntaxKind::FIELD
        | SyntaxKind::CONST
        | SyntaxKind::GLOBAL
        | SyntaxKind::PARAM
        | SyntaxKind::VAR
        | SyntaxKind::CATCH_VAR => declaration_type(ws, node),
        _ if kind.is_expr() => expression_type(ws, node),
        _ => None,
    }
}

// ============================================================================
// TYPE NODES
// ============================================================================

fn elements(ws: &Workspace, node: &NamedNode) -> Vec<Ty> {
    node.node()
        .children()
        .filter(|n| n.kind().is_type())
        .map(|n| type_of_node(ws, node, n).unwrap_or(Ty::Unknown))
        .collect()
}

fn type_from_node(ws: &Workspace, node: &NamedNode) -> Option<Ty> {
    match node.syntax_kind() {
        SyntaxKind::TYPE_NAME => type_name_type(ws, node),
        SyntaxKind::NULLABLE_TYPE => {
            let inner = elements(ws, node).into_iter().next()?;
            Some(Ty::nullable(inner))
        }
        SyntaxKind::UNION_TYPE => Some(Ty::union(elements(ws, node))),
        SyntaxKind::TENSOR_TYPE => {
            let items = elements(ws, node);
            Some(if items.is_empty() { Ty::Void } else { Ty::Tensor(items) })
        }
        SyntaxKind::TUPLE_TYPE => Some(Ty::Tuple(elements(ws, node))),
        SyntaxKind::FUNC_TYPE => {
            let mut parts = node.node().children().filter(|n| n.kind().is_type());
            let params = parts
                .next()
                .map(|p| elements(ws, &node.with_node(p)))
                .unwrap_or_default();
            let ret = parts
                .next()
                .and_then(|r| type_of_node(ws, node, r))
                .unwrap_or(Ty::Void);
            Some(Ty::Func { params, ret: Box::new(ret) })
        }
        SyntaxKind::NULL_TYPE => Some(Ty::Null),
        _ => None,
    }
}

fn type_name_type(ws: &Workspace, node: &NamedNode) -> Option<Ty> {
    let type_name = TypeName::cast(node.node().clone())?;
    let name_ref = type_name.name_ref()?;
    let name = name_ref.text();
    if is_receiver_generic(ws, node.node()) {
        return Some(Ty::TypeParameter {
            name,
            anchor: Some(node.clone()),
            default: None,
        });
    }
    let args: Vec<Ty> = type_name
        .type_args()
        .into_iter()
        .map(|a| type_of_node(ws, node, a).unwrap_or(Ty::Unknown))
        .collect();
    let base = match name_to_type(&name) {
        Some(builtin) => builtin,
        None => {
            let decl = Resolver::resolve(ws, &node.with_node(name_ref.syntax().clone()))?;
            TypeInferer::type_of(ws, &decl).or_else(|| shallow_type(&decl))?
        }
    };
    if args.is_empty() {
        Some(base)
    } else {
        Some(Ty::Instantiation {
            inner: Box::new(base),
            args,
        })
    }
}

/// Type of a type declaration without looking into its body. Used when the
/// full type is still being computed.
fn shallow_type(decl: &NamedNode) -> Option<Ty> {
    let name = decl.name();
    let anchor = Some(decl.clone());
    match decl.syntax_kind() {
        SyntaxKind::STRUCT => Some(Ty::Struct {
            name,
            anchor,
            fields: Vec::new(),
        }),
        SyntaxKind::ENUM => Some(Ty::Enum { name, anchor }),
        SyntaxKind::TYPE_ALIAS => Some(Ty::TypeAlias {
            name,
            anchor,
            inner: Box::new(Ty::Unknown),
        }),
        SyntaxKind::TYPE_PARAM => Some(Ty::TypeParameter {
            name,
            anchor,
            default: None,
        }),
        _ => None,
    }
}

// ============================================================================
// DECLARATIONS
// ============================================================================

fn annotation(ws: &Workspace, decl: &NamedNode, ty: Option<SyntaxNode>) -> Option<Ty> {
    ty.and_then(|t| type_of_node(ws, decl, t))
}

fn declaration_type(ws: &Workspace, decl: &NamedNode) -> Option<Ty> {
    let node = decl.node().clone();
    let name = decl.name();
    match decl.syntax_kind() {
        SyntaxKind::STRUCT => {
            let fields = ast::StructDecl::cast(node)?
                .fields()
                .into_iter()
                .map(|f| type_of_node(ws, decl, f.syntax().clone()).unwrap_or(Ty::Unknown))
                .collect();
            Some(Ty::Struct {
                name,
                anchor: Some(decl.clone()),
                fields,
            })
        }
        SyntaxKind::ENUM => Some(Ty::Enum {
            name,
            anchor: Some(decl.clone()),
        }),
        SyntaxKind::TYPE_ALIAS => {
            let alias = TypeAliasDecl::cast(node)?;
            match alias.ty() {
                Some(inner) => {
                    let inner = type_of_node(ws, decl, inner).unwrap_or(Ty::Unknown);
                    Some(Ty::TypeAlias {
                        name,
                        anchor: Some(decl.clone()),
                        inner: Box::new(inner),
                    })
                }
                // `type int = builtin`
                None => Some(name_to_type(&name).unwrap_or(Ty::Builtin(name))),
            }
        }
        SyntaxKind::TYPE_PARAM => {
            let default = ast::TypeParam::cast(node)?
                .default()
                .and_then(|d| type_of_node(ws, decl, d))
                .map(Box::new);
            Some(Ty::TypeParameter {
                name,
                anchor: Some(decl.clone()),
                default,
            })
        }
        SyntaxKind::ENUM_MEMBER => {
            let owner = ast::EnumMember::cast(node)?.owner()?;
            type_of_node(ws, decl, owner.syntax().clone())
        }
        SyntaxKind::FIELD => annotation(ws, decl, FieldDecl::cast(node)?.ty()),
        SyntaxKind::GLOBAL => annotation(ws, decl, ast::GlobalDecl::cast(node)?.ty()),
        SyntaxKind::CONST => {
            let constant = ConstDecl::cast(node)?;
            annotation(ws, decl, constant.ty())
                .or_else(|| constant.value().and_then(|v| type_of_node(ws, decl, v)))
        }
        SyntaxKind::PARAM => param_type(ws, decl),
        SyntaxKind::VAR => variable_type(ws, decl),
        SyntaxKind::CATCH_VAR => {
            let first = decl
                .node()
                .prev_sibling()
                .is_none_or(|p| p.kind() != SyntaxKind::CATCH_VAR);
            Some(if first { Ty::Int } else { Ty::Unknown })
        }
        _ => None,
    }
}

fn param_type(ws: &Workspace, decl: &NamedNode) -> Option<Ty> {
    let param = Param::cast(decl.node().clone())?;
    if let Some(ty) = annotation(ws, decl, param.ty()) {
        return Some(ty);
    }
    if param.name().is_some_and(|n| n.text() == "self") {
        let method = decl.node().ancestors().find(|n| n.kind() == SyntaxKind::METHOD)?;
        return TypeInferer::receiver_type(ws, &decl.with_node(method));
    }
    None
}

fn variable_type(ws: &Workspace, decl: &NamedNode) -> Option<Ty> {
    let var = VarDecl::cast(decl.node().clone())?;
    if let Some(ty) = annotation(ws, decl, var.ty()) {
        return Some(ty);
    }
    // `match (val v = expr)`
    if let Some(matched) = decl.node().parent().and_then(MatchExpr::cast) {
        return matched.subject().and_then(|s| type_of_node(ws, decl, s));
    }
    // Positions of the variable inside nested destructuring patterns.
    let mut path = Vec::new();
    let mut current = decl.node().clone();
    let stmt = loop {
        let parent = current.parent()?;
        match parent.kind() {
            SyntaxKind::VAR_TENSOR | SyntaxKind::VAR_TUPLE => {
                let position = parent
                    .children()
                    .filter(|n| {
                        matches!(
                            n.kind(),
                            SyntaxKind::VAR | SyntaxKind::VAR_TENSOR | SyntaxKind::VAR_TUPLE
                        )
                    })
                    .position(|n| n == current)?;
                path.push(position);
            }
            SyntaxKind::LET_STMT => break LetStmt::cast(parent)?,
            _ => return None,
        }
        current = parent;
    };
    let mut ty = type_of_node(ws, decl, stmt.initializer()?)?;
    for position in path.into_iter().rev() {
        ty = match ty.unwrap_alias() {
            Ty::Tensor(items) | Ty::Tuple(items) => items.get(position)?.clone(),
            _ => return None,
        };
    }
    Some(ty)
}

fn function_type(ws: &Workspace, func: &NamedNode) -> Option<Ty> {
    let decl = FnDecl::cast(func.node().clone())?;
    let params = decl
        .params()
        .into_iter()
        .map(|p| type_of_node(ws, func, p.syntax().clone()).unwrap_or(Ty::Unknown))
        .collect();
    let ret = match decl.ret_type() {
        Some(ret) => type_of_node(ws, func, ret).unwrap_or(Ty::Unknown),
        None => returned_type(ws, func, &decl),
    };
    Some(Ty::Func {
        params,
        ret: Box::new(ret),
    })
}

/// Join of the `return` expression types; `void` without any.
fn returned_type(ws: &Workspace, func: &NamedNode, decl: &FnDecl) -> Ty {
    let Some(body) = decl.body() else {
        return Ty::Void;
    };
    let mut result: Option<Ty> = None;
    for stmt in body
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::RETURN_STMT)
    {
        let ty = match ast::expr_children(&stmt).next() {
            Some(value) => match type_of_node(ws, func, value) {
                Some(ty) => ty,
                None => continue,
            },
            None => Ty::Void,
        };
        result = Some(match result {
            Some(prev) => Ty::join(&prev, &ty),
            None => ty,
        });
    }
    result.unwrap_or(Ty::Void)
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

fn expression_type(ws: &Workspace, expr: &NamedNode) -> Option<Ty> {
    let node = expr.node().clone();
    match node.kind() {
        SyntaxKind::LITERAL => literal_type(&node),
        SyntaxKind::NAME_REF => name_ref_type(ws, expr),
        SyntaxKind::PAREN_EXPR => ast::expr_children(&node)
            .next()
            .and_then(|inner| type_of_node(ws, expr, inner)),
        SyntaxKind::TENSOR_EXPR => {
            let items: Vec<Ty> = ast::expr_children(&node)
                .map(|e| type_of_node(ws, expr, e).unwrap_or(Ty::Unknown))
                .collect();
            Some(if items.is_empty() { Ty::Void } else { Ty::Tensor(items) })
        }
        SyntaxKind::TUPLE_EXPR => Some(Ty::Tuple(
            ast::expr_children(&node)
                .map(|e| type_of_node(ws, expr, e).unwrap_or(Ty::Unknown))
                .collect(),
        )),
        SyntaxKind::DOT_EXPR => dot_type(ws, expr),
        SyntaxKind::CALL_EXPR => call_type(ws, expr),
        SyntaxKind::GENERIC_EXPR => generic_type(ws, expr),
        SyntaxKind::BIN_EXPR => binary_type(ws, expr),
        SyntaxKind::PREFIX_EXPR => {
            let bang = first_token(&node).is_some_and(|t| t == "!");
            if bang {
                Some(Ty::Bool)
            } else {
                ast::expr_children(&node)
                    .next()
                    .and_then(|e| type_of_node(ws, expr, e))
            }
        }
        SyntaxKind::NOT_NULL_EXPR => {
            let inner = type_of_node(ws, expr, ast::expr_children(&node).next()?)?;
            Some(match inner.unwrap_alias() {
                Ty::Union(_) => Ty::subtract(&inner.unwrap_alias(), &Ty::Null),
                _ => inner,
            })
        }
        SyntaxKind::AS_EXPR => ast::type_child(&node).and_then(|t| type_of_node(ws, expr, t)),
        SyntaxKind::IS_EXPR => Some(Ty::Bool),
        SyntaxKind::TERNARY_EXPR => {
            let branches: Vec<SyntaxNode> = ast::expr_children(&node).skip(1).collect();
            join_all(ws, expr, branches.into_iter())
        }
        SyntaxKind::ASSIGN_EXPR => ast::expr_children(&node)
            .next()
            .and_then(|left| type_of_node(ws, expr, left)),
        SyntaxKind::MATCH_EXPR => {
            let arms = MatchExpr::cast(node)?.arm_bodies();
            let mut result = Ty::Never;
            for arm in arms {
                let ty = match arm.kind() {
                    SyntaxKind::BLOCK => Ty::Void,
                    SyntaxKind::RETURN_STMT | SyntaxKind::THROW_STMT => Ty::Never,
                    _ => type_of_node(ws, expr, arm).unwrap_or(Ty::Unknown),
                };
                result = Ty::join(&result, &ty);
            }
            Some(result)
        }
        SyntaxKind::OBJECT_LITERAL => object_literal_type(ws, expr),
        _ => None,
    }
}

fn first_token(node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia())
        .map(|t| t.text().to_string())
}

fn join_all(ws: &Workspace, anchor: &NamedNode, nodes: impl Iterator<Item = SyntaxNode>) -> Option<Ty> {
    let mut result: Option<Ty> = None;
    for node in nodes {
        let ty = type_of_node(ws, anchor, node)?;
        result = Some(match result {
            Some(prev) => Ty::join(&prev, &ty),
            None => ty,
        });
    }
    result
}

fn literal_type(node: &SyntaxNode) -> Option<Ty> {
    let token = node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia())?;
    match token.kind() {
        SyntaxKind::INT_NUMBER => Some(Ty::Int),
        SyntaxKind::STRING => Some(Ty::Builtin(SmolStr::new_static("slice"))),
        SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => Some(Ty::Bool),
        SyntaxKind::NULL_KW => Some(Ty::Null),
        _ => None,
    }
}

fn name_ref_type(ws: &Workspace, usage: &NamedNode) -> Option<Ty> {
    if let Some(parent) = usage.parent() {
        match parent.syntax_kind() {
            SyntaxKind::TYPE_NAME => return TypeInferer::type_of(ws, &parent),
            SyntaxKind::GENERIC_EXPR => return TypeInferer::type_of(ws, &parent),
            SyntaxKind::DOT_EXPR => {
                let is_member = DotExpr::cast(parent.node().clone())
                    .and_then(|d| d.name_ref())
                    .is_some_and(|n| n.syntax() == usage.node());
                if is_member {
                    return TypeInferer::type_of(ws, &parent);
                }
            }
            _ => {}
        }
    }
    let decl = Resolver::resolve(ws, usage)?;
    TypeInferer::type_of(ws, &decl)
}

/// Substitution of the type parameters of the generic types `ty` wraps:
/// `Box<int>` maps `Box`'s `T` to `int`.
fn instantiation_mapping(ty: &Ty) -> TyMapping {
    let mut mapping = TyMapping::default();
    let mut current = ty.unwrap_option();
    loop {
        let next = match &current {
            Ty::Instantiation { inner, args } => {
                if let Some(anchor) = inner.anchor() {
                    for (name, arg) in type_param_names(anchor.node()).into_iter().zip(args) {
                        mapping.entry(name).or_insert_with(|| arg.clone());
                    }
                }
                inner.as_ref().clone()
            }
            Ty::TypeAlias { inner, .. } => inner.unwrap_option(),
            _ => break,
        };
        current = next;
    }
    mapping
}

/// Bind the type parameters in `param` by matching it against `arg`.
fn unify(param: &Ty, arg: &Ty, mapping: &mut TyMapping) {
    match (param, arg) {
        (Ty::TypeParameter { name, .. }, _) => {
            if !matches!(arg, Ty::Unknown) {
                mapping.entry(name.clone()).or_insert_with(|| arg.clone());
            }
        }
        (Ty::Instantiation { inner: p, args: pa }, Ty::Instantiation { inner: a, args: aa })
            if p == a =>
        {
            for (p, a) in pa.iter().zip(aa) {
                unify(p, a, mapping);
            }
        }
        (Ty::Tensor(p), Ty::Tensor(a)) | (Ty::Tuple(p), Ty::Tuple(a)) if p.len() == a.len() => {
            for (p, a) in p.iter().zip(a) {
                unify(p, a, mapping);
            }
        }
        (Ty::Func { params: pp, ret: pr }, Ty::Func { params: ap, ret: ar }) => {
            for (p, a) in pp.iter().zip(ap) {
                unify(p, a, mapping);
            }
            unify(pr, ar, mapping);
        }
        (Ty::TypeAlias { inner, .. }, _) => unify(inner, arg, mapping),
        (Ty::Union(_), _) => {
            if let Some(inner) = param.as_nullable() {
                unify(inner, &arg.unwrap_option(), mapping);
            }
        }
        _ => {}
    }
}

fn dot_type(ws: &Workspace, expr: &NamedNode) -> Option<Ty> {
    let dot = DotExpr::cast(expr.node().clone())?;
    let qualifier = dot.qualifier()?;
    if let Some(index) = dot.index() {
        let ty = type_of_node(ws, expr, qualifier)?;
        return match ty.unwrap_alias() {
            Ty::Tensor(items) | Ty::Tuple(items) => items.get(index).cloned(),
            _ => None,
        };
    }
    let member = Resolver::resolve(ws, &expr.with_node(dot.name_ref()?.syntax().clone()))?;
    let member_ty = TypeInferer::type_of(ws, &member)?;
    let qualifier_ty = type_of_node(ws, expr, qualifier);
    let mut mapping = qualifier_ty.as_ref().map(instantiation_mapping).unwrap_or_default();
    if member.kind() == Some(DeclKind::Method)
        && let (Some(receiver), Some(q)) = (TypeInferer::receiver_type(ws, &member), &qualifier_ty)
    {
        unify(&receiver, &q.unwrap_option(), &mut mapping);
    }
    Some(member_ty.substitute(&mapping))
}

/// The function a callee expression names, its explicit type arguments and
/// the qualifier of a method call.
struct CallTarget {
    decl: NamedNode,
    type_args: Vec<SyntaxNode>,
    qualifier: Option<SyntaxNode>,
}

fn call_target(ws: &Workspace, anchor: &NamedNode, callee: &SyntaxNode) -> Option<CallTarget> {
    let (name_ref, type_args, qualifier) = match callee.kind() {
        SyntaxKind::NAME_REF => (callee.clone(), Vec::new(), None),
        SyntaxKind::GENERIC_EXPR => {
            let generic = GenericExpr::cast(callee.clone())?;
            (generic.name_ref()?.syntax().clone(), generic.type_args(), None)
        }
        SyntaxKind::DOT_EXPR => {
            let dot = DotExpr::cast(callee.clone())?;
            (dot.name_ref()?.syntax().clone(), dot.type_args(), dot.qualifier())
        }
        _ => return None,
    };
    let decl = Resolver::resolve(ws, &anchor.with_node(name_ref))?;
    decl.kind().filter(|k| k.is_function())?;
    Some(CallTarget {
        decl,
        type_args,
        qualifier,
    })
}

/// Parameter types a call's arguments bind to, with the substitution known
/// from the callee's receiver and explicit type arguments.
fn call_signature(ws: &Workspace, anchor: &NamedNode, target: &CallTarget) -> Option<(Vec<Ty>, Ty, TyMapping)> {
    let Ty::Func { params, ret } = TypeInferer::type_of(ws, &target.decl)? else {
        return None;
    };
    let func = FnDecl::cast(target.decl.node().clone())?;
    let mut mapping = TyMapping::default();
    for (name, arg) in type_param_names(target.decl.node())
        .into_iter()
        .zip(&target.type_args)
    {
        if let Some(ty) = type_of_node(ws, anchor, arg.clone()) {
            mapping.insert(name, ty);
        }
    }
    let mut params = params;
    if let Some(qualifier) = &target.qualifier
        && func.is_method()
    {
        if let (Some(receiver), Some(q)) = (
            TypeInferer::receiver_type(ws, &target.decl),
            type_of_node(ws, anchor, qualifier.clone()),
        ) {
            unify(&receiver, &q.unwrap_option(), &mut mapping);
        }
        if !func.is_static() && !params.is_empty() {
            params.remove(0);
        }
    }
    Some((params, *ret, mapping))
}

fn call_type(ws: &Workspace, expr: &NamedNode) -> Option<Ty> {
    let call = CallExpr::cast(expr.node().clone())?;
    let callee = call.callee()?;
    let Some(target) = call_target(ws, expr, &callee) else {
        // A value of function type: `handler(1)`.
        return match type_of_node(ws, expr, callee)? {
            Ty::Func { ret, .. } => Some(*ret),
            _ => None,
        };
    };
    let (params, ret, mut mapping) = call_signature(ws, expr, &target)?;
    for (param, arg) in params.iter().zip(call.args()) {
        if param.has_generics()
            && let Some(arg_ty) = type_of_node(ws, expr, arg)
        {
            unify(param, &arg_ty, &mut mapping);
        }
    }
    Some(ret.substitute(&mapping))
}

fn generic_type(ws: &Workspace, expr: &NamedNode) -> Option<Ty> {
    let generic = GenericExpr::cast(expr.node().clone())?;
    let decl = Resolver::resolve(ws, &expr.with_node(generic.name_ref()?.syntax().clone()))?;
    let base = TypeInferer::type_of(ws, &decl)?;
    let args: Vec<Ty> = generic
        .type_args()
        .into_iter()
        .map(|a| type_of_node(ws, expr, a).unwrap_or(Ty::Unknown))
        .collect();
    if decl.kind().is_some_and(DeclKind::is_type) {
        return Some(Ty::Instantiation {
            inner: Box::new(base),
            args,
        });
    }
    let mapping: TyMapping = type_param_names(decl.node()).into_iter().zip(args).collect();
    Some(base.substitute(&mapping))
}

fn binary_type(ws: &Workspace, expr: &NamedNode) -> Option<Ty> {
    let node = expr.node();
    let operator: String = node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
        .map(|t| t.text().to_string())
        .collect();
    match operator.as_str() {
        "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" => Some(Ty::Bool),
        "<=>" => Some(Ty::Int),
        _ => join_all(ws, expr, ast::expr_children(node)),
    }
}

// ============================================================================
// OBJECT LITERALS
// ============================================================================

fn object_literal_type(ws: &Workspace, expr: &NamedNode) -> Option<Ty> {
    let literal = ObjectLiteral::cast(expr.node().clone())?;
    let Some(type_name) = literal.type_name() else {
        return expected_type(ws, expr).map(|t| t.unwrap_option());
    };
    let ty = type_of_node(ws, expr, type_name.syntax().clone())?;
    let Ty::Struct { anchor: Some(anchor), .. } = &ty else {
        return Some(ty);
    };
    let names = type_param_names(anchor.node());
    if names.is_empty() {
        return Some(ty);
    }
    // `Box { value: 1 }` → `Box<int>`
    let mut mapping = TyMapping::default();
    for field in literal.fields() {
        let Some(name_ref) = field.name_ref() else {
            continue;
        };
        let value = field.value().unwrap_or_else(|| name_ref.syntax().clone());
        let Some(decl) = Resolver::resolve(ws, &expr.with_node(name_ref.syntax().clone())) else {
            continue;
        };
        if let (Some(declared), Some(actual)) = (
            TypeInferer::type_of(ws, &decl),
            type_of_node(ws, expr, value),
        ) {
            unify(&declared, &actual, &mut mapping);
        }
    }
    let args = names
        .iter()
        .map(|n| mapping.get(n).cloned().unwrap_or(Ty::Unknown))
        .collect();
    Some(Ty::Instantiation {
        inner: Box::new(ty),
        args,
    })
}

/// Type the context of `expr` expects: a declaration hint, a return type, a
/// parameter type or a field type.
fn expected_type(ws: &Workspace, expr: &NamedNode) -> Option<Ty> {
    let parent = expr.parent()?;
    let node = parent.node().clone();
    match node.kind() {
        SyntaxKind::PAREN_EXPR => expected_type(ws, &parent),
        SyntaxKind::LET_STMT => {
            let pattern = LetStmt::cast(node)?.pattern()?;
            let var = VarDecl::cast(pattern)?;
            annotation(ws, &parent, var.ty())
        }
        SyntaxKind::RETURN_STMT => {
            let func = node.ancestors().find(|n| is_function(n.kind()))?;
            let ret = FnDecl::cast(func)?.ret_type()?;
            type_of_node(ws, &parent, ret)
        }
        SyntaxKind::CONST => annotation(ws, &parent, ConstDecl::cast(node)?.ty()),
        SyntaxKind::DEFAULT_VALUE => {
            let owner = parent.parent()?;
            annotation(ws, &owner, ast::type_child(owner.node()))
        }
        SyntaxKind::ASSIGN_EXPR => {
            let left = ast::expr_children(&node).next()?;
            if left == *expr.node() {
                return None;
            }
            type_of_node(ws, &parent, left)
        }
        SyntaxKind::OBJECT_FIELD => {
            let field = ast::ObjectField::cast(node)?;
            let name_ref = field.name_ref()?;
            if name_ref.syntax() == expr.node() {
                return None;
            }
            let decl = Resolver::resolve(ws, &parent.with_node(name_ref.syntax().clone()))?;
            TypeInferer::type_of(ws, &decl)
        }
        SyntaxKind::ARG => {
            let arg_list = node.parent()?;
            let position = arg_list
                .children()
                .filter(|n| n.kind() == SyntaxKind::ARG)
                .position(|n| n == node)?;
            let call = parent.with_node(arg_list.parent()?);
            let callee = CallExpr::cast(call.node().clone())?.callee()?;
            let target = call_target(ws, &call, &callee)?;
            let (params, _, mapping) = call_signature(ws, &call, &target)?;
            params.get(position).map(|p| p.substitute(&mapping))
        }
        _ => None,
    }
}
