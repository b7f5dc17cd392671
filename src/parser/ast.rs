//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for Tolk, TL-B and Fift
//! syntax nodes. Each struct wraps a SyntaxNode and provides methods to
//! access children. Expressions and types are left as plain `SyntaxNode`s;
//! use [`SyntaxKind::is_expr`] and [`SyntaxKind::is_type`] to pick them out.

use smol_str::SmolStr;

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $($kind:ident)|+) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                matches!(kind, $(SyntaxKind::$kind)|+)
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.children().find_map(N::cast)
}

fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// First child that is a type node.
pub fn type_child(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children().find(|n| n.kind().is_type())
}

/// Children that are expression nodes, in source order.
pub fn expr_children(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    node.children().filter(|n| n.kind().is_expr())
}

/// Strip the backticks of a quoted identifier.
pub fn trim_backticks(text: &str) -> &str {
    text.strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .unwrap_or(text)
}

// ============================================================================
// Identifiers
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }

    /// The identifier text without backticks.
    pub fn text(&self) -> SmolStr {
        self.ident_token()
            .map(|t| SmolStr::new(trim_backticks(t.text())))
            .unwrap_or_default()
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn ident_token(&self) -> Option<SyntaxToken> {
        self.0.first_token()
    }

    /// The identifier text without backticks.
    pub fn text(&self) -> SmolStr {
        self.ident_token()
            .map(|t| SmolStr::new(trim_backticks(t.text())))
            .unwrap_or_default()
    }
}

// ============================================================================
// Tolk: file and top-level items
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
        self.0.children().filter_map(Item::cast)
    }

    pub fn imports(&self) -> impl Iterator<Item = Import> + '_ {
        self.0.children().filter_map(Import::cast)
    }
}

/// Any top-level Tolk declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Item {
    Function(FnDecl),
    Struct(StructDecl),
    Enum(EnumDecl),
    Const(ConstDecl),
    Global(GlobalDecl),
    TypeAlias(TypeAliasDecl),
}

impl AstNode for Item {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_top_level_decl()
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FUNCTION | SyntaxKind::METHOD | SyntaxKind::GET_METHOD => {
                Some(Self::Function(FnDecl(node)))
            }
            SyntaxKind::STRUCT => Some(Self::Struct(StructDecl(node))),
            SyntaxKind::ENUM => Some(Self::Enum(EnumDecl(node))),
            SyntaxKind::CONST => Some(Self::Const(ConstDecl(node))),
            SyntaxKind::GLOBAL => Some(Self::Global(GlobalDecl(node))),
            SyntaxKind::TYPE_ALIAS => Some(Self::TypeAlias(TypeAliasDecl(node))),
            _ => None,
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        match self {
            Self::Function(n) => n.syntax(),
            Self::Struct(n) => n.syntax(),
            Self::Enum(n) => n.syntax(),
            Self::Const(n) => n.syntax(),
            Self::Global(n) => n.syntax(),
            Self::TypeAlias(n) => n.syntax(),
        }
    }
}

ast_node!(Import, IMPORT);

impl Import {
    pub fn path_token(&self) -> Option<SyntaxToken> {
        token(&self.0, SyntaxKind::STRING)
    }

    /// The import path without quotes.
    pub fn path(&self) -> Option<SmolStr> {
        let token = self.path_token()?;
        let text = token.text();
        Some(SmolStr::new(text.trim_matches('"')))
    }
}

ast_node!(Annotation, ANNOTATION);

impl Annotation {
    pub fn name(&self) -> Option<SmolStr> {
        token(&self.0, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }

    pub fn args(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ANNOTATION_ARGS)
            .map(|args| expr_children(&args).collect())
            .unwrap_or_default()
    }
}

/// `fun`, `fun T.method` or `get fun`.
ast_node!(FnDecl, FUNCTION | METHOD | GET_METHOD);

impl FnDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn is_method(&self) -> bool {
        self.0.kind() == SyntaxKind::METHOD
    }

    pub fn is_get_method(&self) -> bool {
        self.0.kind() == SyntaxKind::GET_METHOD
    }

    pub fn receiver(&self) -> Option<Receiver> {
        child(&self.0)
    }

    pub fn annotations(&self) -> impl Iterator<Item = Annotation> + '_ {
        self.0.children().filter_map(Annotation::cast)
    }

    pub fn annotation(&self, name: &str) -> Option<Annotation> {
        self.annotations()
            .find(|a| a.name().is_some_and(|n| n == name))
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child(&self.0)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child(&self.0)
    }

    pub fn params(&self) -> Vec<Param> {
        self.param_list()
            .map(|list| list.params().collect())
            .unwrap_or_default()
    }

    /// A method whose first parameter is not `self`.
    pub fn is_static(&self) -> bool {
        self.is_method()
            && self
                .params()
                .first()
                .and_then(|p| p.name())
                .is_none_or(|n| n.text() != "self")
    }

    pub fn ret_type(&self) -> Option<SyntaxNode> {
        let ret = self.0.children().find(|n| n.kind() == SyntaxKind::RET_TYPE)?;
        type_child(&ret)
    }

    pub fn body(&self) -> Option<Block> {
        child(&self.0)
    }

    pub fn is_asm(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::ASM_BODY)
    }

    pub fn is_builtin(&self) -> bool {
        self.0.children().any(|n| n.kind() == SyntaxKind::BUILTIN_BODY)
    }
}

ast_node!(Receiver, RECEIVER);

impl Receiver {
    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.0.children().filter_map(Param::cast)
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }

    pub fn is_mutate(&self) -> bool {
        token(&self.0, SyntaxKind::MUTATE_KW).is_some()
    }
}

ast_node!(TypeParamList, TYPE_PARAM_LIST);

impl TypeParamList {
    pub fn params(&self) -> impl Iterator<Item = TypeParam> + '_ {
        self.0.children().filter_map(TypeParam::cast)
    }
}

ast_node!(TypeParam, TYPE_PARAM);

impl TypeParam {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn default(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }
}

ast_node!(StructDecl, STRUCT);

impl StructDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child(&self.0)
    }

    pub fn fields(&self) -> Vec<FieldDecl> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::STRUCT_BODY)
            .map(|body| body.children().filter_map(FieldDecl::cast).collect())
            .unwrap_or_default()
    }
}

ast_node!(FieldDecl, FIELD);

impl FieldDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }

    pub fn owner(&self) -> Option<StructDecl> {
        self.0.ancestors().find_map(StructDecl::cast)
    }
}

ast_node!(EnumDecl, ENUM);

impl EnumDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn members(&self) -> Vec<EnumMember> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ENUM_BODY)
            .map(|body| body.children().filter_map(EnumMember::cast).collect())
            .unwrap_or_default()
    }
}

ast_node!(EnumMember, ENUM_MEMBER);

impl EnumMember {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn owner(&self) -> Option<EnumDecl> {
        self.0.ancestors().find_map(EnumDecl::cast)
    }
}

ast_node!(ConstDecl, CONST);

impl ConstDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        expr_children(&self.0).next()
    }
}

ast_node!(GlobalDecl, GLOBAL);

impl GlobalDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }
}

ast_node!(TypeAliasDecl, TYPE_ALIAS);

impl TypeAliasDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn type_params(&self) -> Option<TypeParamList> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }
}

// ============================================================================
// Tolk: statements and patterns
// ============================================================================

ast_node!(Block, BLOCK);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0.children().filter(|n| n.kind().is_statement())
    }
}

ast_node!(LetStmt, LET_STMT);

impl LetStmt {
    /// `VAR`, `VAR_TENSOR` or `VAR_TUPLE`.
    pub fn pattern(&self) -> Option<SyntaxNode> {
        self.0.children().find(|n| {
            matches!(
                n.kind(),
                SyntaxKind::VAR | SyntaxKind::VAR_TENSOR | SyntaxKind::VAR_TUPLE
            )
        })
    }

    pub fn initializer(&self) -> Option<SyntaxNode> {
        expr_children(&self.0).next()
    }
}

ast_node!(VarDecl, VAR | CATCH_VAR);

impl VarDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn ty(&self) -> Option<SyntaxNode> {
        type_child(&self.0)
    }
}

// ============================================================================
// Tolk: expressions and types
// ============================================================================

ast_node!(TypeName, TYPE_NAME);

impl TypeName {
    pub fn name_ref(&self) -> Option<NameRef> {
        child(&self.0)
    }

    pub fn type_args(&self) -> Vec<SyntaxNode> {
        type_args(&self.0)
    }
}

/// Type arguments of the `TYPE_ARG_LIST` child of `node`.
pub fn type_args(node: &SyntaxNode) -> Vec<SyntaxNode> {
    node.children()
        .find(|n| n.kind() == SyntaxKind::TYPE_ARG_LIST)
        .map(|list| list.children().filter(|n| n.kind().is_type()).collect())
        .unwrap_or_default()
}

ast_node!(ObjectLiteral, OBJECT_LITERAL);

impl ObjectLiteral {
    pub fn type_name(&self) -> Option<TypeName> {
        child(&self.0)
    }

    pub fn fields(&self) -> Vec<ObjectField> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::OBJECT_BODY)
            .map(|body| body.children().filter_map(ObjectField::cast).collect())
            .unwrap_or_default()
    }
}

ast_node!(ObjectField, OBJECT_FIELD);

impl ObjectField {
    pub fn name_ref(&self) -> Option<NameRef> {
        child(&self.0)
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .filter(|n| n.kind().is_expr())
            .nth(1)
    }

    /// `Point { x }`
    pub fn is_shorthand(&self) -> bool {
        token(&self.0, SyntaxKind::COLON).is_none()
    }

    pub fn literal(&self) -> Option<ObjectLiteral> {
        self.0.ancestors().skip(1).find_map(ObjectLiteral::cast)
    }
}

ast_node!(DotExpr, DOT_EXPR);

impl DotExpr {
    pub fn qualifier(&self) -> Option<SyntaxNode> {
        self.0.first_child().filter(|n| n.kind().is_expr())
    }

    pub fn name_ref(&self) -> Option<NameRef> {
        self.0.children().skip(1).find_map(NameRef::cast)
    }

    /// `t.0`
    pub fn index(&self) -> Option<usize> {
        token(&self.0, SyntaxKind::INT_NUMBER).and_then(|t| t.text().parse().ok())
    }

    pub fn type_args(&self) -> Vec<SyntaxNode> {
        type_args(&self.0)
    }
}

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<SyntaxNode> {
        self.0.first_child().filter(|n| n.kind().is_expr())
    }

    pub fn args(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::ARG_LIST)
            .map(|list| {
                list.children()
                    .filter(|n| n.kind() == SyntaxKind::ARG)
                    .filter_map(|arg| expr_children(&arg).next())
                    .collect()
            })
            .unwrap_or_default()
    }
}

ast_node!(GenericExpr, GENERIC_EXPR);

impl GenericExpr {
    pub fn name_ref(&self) -> Option<NameRef> {
        child(&self.0)
    }

    pub fn type_args(&self) -> Vec<SyntaxNode> {
        type_args(&self.0)
    }
}

ast_node!(MatchExpr, MATCH_EXPR);

impl MatchExpr {
    /// `match (val v = expr)`
    pub fn subject_var(&self) -> Option<VarDecl> {
        child(&self.0)
    }

    pub fn subject(&self) -> Option<SyntaxNode> {
        expr_children(&self.0).next()
    }

    /// Arm bodies: expressions or blocks.
    pub fn arm_bodies(&self) -> Vec<SyntaxNode> {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::MATCH_BODY)
            .flat_map(|body| body.children().filter(|n| n.kind() == SyntaxKind::MATCH_ARM))
            .filter_map(|arm| {
                arm.children()
                    .filter(|n| n.kind() != SyntaxKind::MATCH_PATTERN)
                    .last()
            })
            .collect()
    }
}

// ============================================================================
// TL-B
// ============================================================================

ast_node!(TlbDeclaration, TLB_DECLARATION);

impl TlbDeclaration {
    /// The constructor name, `_` for anonymous constructors.
    pub fn constructor_name(&self) -> Option<SmolStr> {
        let ctor = self
            .0
            .children()
            .find(|n| n.kind() == SyntaxKind::TLB_CONSTRUCTOR)?;
        token(&ctor, SyntaxKind::IDENT).map(|t| SmolStr::new(t.text()))
    }

    pub fn combinator(&self) -> Option<SyntaxNode> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::TLB_COMBINATOR)
    }

    /// Name of the combinator this constructor produces.
    pub fn name(&self) -> Option<Name> {
        self.combinator().and_then(|c| child(&c))
    }

    pub fn implicit_params(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::TLB_IMPLICIT_PARAM)
    }

    /// Named fields, including those nested in `^[ ... ]` cells.
    pub fn fields(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::TLB_FIELD)
    }
}

// ============================================================================
// Fift
// ============================================================================

ast_node!(FiftDefinition, FIFT_PROC | FIFT_METHOD);

impl FiftDefinition {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    /// `PROC`, `PROCINLINE`, `PROCREF` or `METHOD`.
    pub fn opener(&self) -> Option<SmolStr> {
        let word = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::FIFT_WORD)?;
        Some(SmolStr::new(word.text().trim_end_matches(":<{")))
    }
}
