//! PSI layer: syntax nodes paired with their owning file.
//!
//! A [`NamedNode`] gives a declaration or a usage a stable identity that
//! survives re-walking the tree: `(FileId, TextRange, SyntaxKind)`. Nodes are
//! created on demand and are cheap to rebuild.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use smol_str::SmolStr;

use crate::base::{FileId, Language, TextRange};
use crate::parser::ast::trim_backticks;
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::syntax::ParsedFile;

/// Kind tag of a declaration, shared by all languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclKind {
    Function,
    Method,
    GetMethod,
    Struct,
    Enum,
    EnumMember,
    Field,
    Constant,
    GlobalVariable,
    TypeAlias,
    Parameter,
    TypeParameter,
    LocalVariable,
}

impl DeclKind {
    pub const ALL: [DeclKind; 13] = [
        Self::Function,
        Self::Method,
        Self::GetMethod,
        Self::Struct,
        Self::Enum,
        Self::EnumMember,
        Self::Field,
        Self::Constant,
        Self::GlobalVariable,
        Self::TypeAlias,
        Self::Parameter,
        Self::TypeParameter,
        Self::LocalVariable,
    ];

    /// Kind of the declaration `node` is, if it is one.
    pub fn of(node: &SyntaxNode) -> Option<Self> {
        let kind = match node.kind() {
            SyntaxKind::FUNCTION | SyntaxKind::FIFT_PROC => Self::Function,
            SyntaxKind::METHOD => Self::Method,
            SyntaxKind::GET_METHOD | SyntaxKind::FIFT_METHOD => Self::GetMethod,
            SyntaxKind::STRUCT | SyntaxKind::TLB_DECLARATION => Self::Struct,
            SyntaxKind::ENUM => Self::Enum,
            SyntaxKind::ENUM_MEMBER => Self::EnumMember,
            SyntaxKind::FIELD | SyntaxKind::TLB_FIELD => Self::Field,
            SyntaxKind::CONST => Self::Constant,
            SyntaxKind::GLOBAL => Self::GlobalVariable,
            SyntaxKind::TYPE_ALIAS => Self::TypeAlias,
            SyntaxKind::PARAM => Self::Parameter,
            SyntaxKind::TYPE_PARAM => Self::TypeParameter,
            SyntaxKind::VAR | SyntaxKind::CATCH_VAR => Self::LocalVariable,
            SyntaxKind::TLB_IMPLICIT_PARAM => {
                if is_tlb_type_param(node) {
                    Self::TypeParameter
                } else {
                    Self::Parameter
                }
            }
            SyntaxKind::TYPE_NAME if is_receiver_type_param(node) => Self::TypeParameter,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds that live at the top level of a file.
    pub fn is_top_level(self) -> bool {
        matches!(
            self,
            Self::Function
                | Self::Method
                | Self::GetMethod
                | Self::Struct
                | Self::Enum
                | Self::Constant
                | Self::GlobalVariable
                | Self::TypeAlias
        )
    }

    /// Kinds usable in type position.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Self::Struct | Self::Enum | Self::TypeAlias | Self::TypeParameter
        )
    }

    /// Kinds callable as functions.
    pub fn is_function(self) -> bool {
        matches!(self, Self::Function | Self::Method | Self::GetMethod)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::GetMethod => "get-method",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::EnumMember => "enum-member",
            Self::Field => "field",
            Self::Constant => "constant",
            Self::GlobalVariable => "global-variable",
            Self::TypeAlias => "type-alias",
            Self::Parameter => "parameter",
            Self::TypeParameter => "type-parameter",
            Self::LocalVariable => "local-variable",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{X:Type}`
fn is_tlb_type_param(node: &SyntaxNode) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == SyntaxKind::IDENT && t.text() == "Type")
}

/// `T` in `fun Box<T>.get()`: a bare type argument of a method receiver
/// that is not a builtin type name.
pub fn is_receiver_type_param(node: &SyntaxNode) -> bool {
    if node.kind() != SyntaxKind::TYPE_NAME {
        return false;
    }
    let in_receiver_args = node
        .parent()
        .filter(|p| p.kind() == SyntaxKind::TYPE_ARG_LIST)
        .and_then(|list| list.parent())
        .and_then(|owner| owner.parent())
        .is_some_and(|r| r.kind() == SyntaxKind::RECEIVER);
    if !in_receiver_args {
        return false;
    }
    let has_args = node
        .children()
        .any(|n| n.kind() == SyntaxKind::TYPE_ARG_LIST);
    let name = node
        .first_child()
        .and_then(|n| n.first_token())
        .map(|t| t.text().to_string())
        .unwrap_or_default();
    !has_args && !name.is_empty() && !crate::hir::ty::is_builtin_type_name(&name)
}

/// Identity of a node: stable across walks of the same tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    pub file: FileId,
    pub range: TextRange,
    pub kind: SyntaxKind,
}

/// A syntax node together with the file that owns it.
#[derive(Clone)]
pub struct NamedNode {
    node: SyntaxNode,
    file: Rc<ParsedFile>,
}

impl NamedNode {
    pub fn new(node: SyntaxNode, file: Rc<ParsedFile>) -> Self {
        Self { node, file }
    }

    pub fn node(&self) -> &SyntaxNode {
        &self.node
    }

    pub fn file(&self) -> &Rc<ParsedFile> {
        &self.file
    }

    pub fn language(&self) -> Language {
        self.file.language()
    }

    pub fn syntax_kind(&self) -> SyntaxKind {
        self.node.kind()
    }

    pub fn key(&self) -> NodeKey {
        NodeKey {
            file: self.file.id(),
            range: self.node.text_range(),
            kind: self.node.kind(),
        }
    }

    pub fn range(&self) -> TextRange {
        self.node.text_range()
    }

    /// Declaration kind, `None` for usages and other nodes.
    pub fn kind(&self) -> Option<DeclKind> {
        DeclKind::of(&self.node)
    }

    pub fn is_declaration(&self) -> bool {
        self.kind().is_some()
    }

    /// The `NAME`/`NAME_REF` node carrying this node's identifier.
    pub fn name_identifier(&self) -> Option<SyntaxNode> {
        match self.node.kind() {
            SyntaxKind::NAME | SyntaxKind::NAME_REF => Some(self.node.clone()),
            SyntaxKind::TLB_DECLARATION => self
                .node
                .children()
                .find(|n| n.kind() == SyntaxKind::TLB_COMBINATOR)
                .and_then(|c| c.children().find(|n| n.kind() == SyntaxKind::NAME)),
            SyntaxKind::TYPE_NAME => self
                .node
                .children()
                .find(|n| n.kind() == SyntaxKind::NAME_REF),
            _ => self.node.children().find(|n| n.kind() == SyntaxKind::NAME),
        }
    }

    /// Range of the identifier, or of the whole node when it has none.
    pub fn name_range(&self) -> TextRange {
        self.name_identifier()
            .map(|n| n.text_range())
            .unwrap_or_else(|| self.node.text_range())
    }

    /// The identifier text without backticks; empty when there is none.
    pub fn name(&self) -> SmolStr {
        self.name_identifier()
            .and_then(|n| n.first_token())
            .map(|t| SmolStr::new(trim_backticks(t.text())))
            .unwrap_or_default()
    }

    /// Wrap another node of the same file.
    pub fn with_node(&self, node: SyntaxNode) -> Self {
        Self::new(node, self.file.clone())
    }

    /// Parent node in the same file.
    pub fn parent(&self) -> Option<Self> {
        self.node.parent().map(|p| self.with_node(p))
    }

    /// Nearest declaration among the ancestors (self included).
    pub fn owning_declaration(&self) -> Option<Self> {
        self.node
            .ancestors()
            .find(|n| DeclKind::of(n).is_some())
            .map(|n| self.with_node(n))
    }
}

impl PartialEq for NamedNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for NamedNode {}

impl Hash for NamedNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedNode")
            .field("uri", self.file.uri())
            .field("kind", &self.node.kind())
            .field("name", &self.name())
            .field("range", &self.node.text_range())
            .finish()
    }
}
