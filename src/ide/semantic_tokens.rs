//! Semantic tokens — syntax highlighting based on name resolution.
//!
//! Every identifier that resolves gets the token type of its declaration.
//! Unresolved identifiers are left to the editor's syntactic highlighting.

use crate::base::FileId;
use crate::hir::{DeclKind, NamedNode, Resolver, Workspace};
use crate::parser::SyntaxKind;
use crate::syntax::nodes_of_kind;

/// Token type for semantic highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenType {
    Type,
    Struct,
    Enum,
    EnumMember,
    Function,
    Method,
    Property,
    Variable,
    Parameter,
    TypeParameter,
}

impl TokenType {
    /// Token type names in legend order.
    pub const LEGEND: [&'static str; 10] = [
        "type",
        "struct",
        "enum",
        "enumMember",
        "function",
        "method",
        "property",
        "variable",
        "parameter",
        "typeParameter",
    ];

    /// Convert to LSP token type index.
    pub fn to_lsp_index(self) -> u32 {
        match self {
            TokenType::Type => 0,
            TokenType::Struct => 1,
            TokenType::Enum => 2,
            TokenType::EnumMember => 3,
            TokenType::Function => 4,
            TokenType::Method => 5,
            TokenType::Property => 6,
            TokenType::Variable => 7,
            TokenType::Parameter => 8,
            TokenType::TypeParameter => 9,
        }
    }
}

impl From<DeclKind> for TokenType {
    fn from(kind: DeclKind) -> Self {
        match kind {
            DeclKind::Function | DeclKind::GetMethod => TokenType::Function,
            DeclKind::Method => TokenType::Method,
            DeclKind::Struct => TokenType::Struct,
            DeclKind::Enum => TokenType::Enum,
            DeclKind::EnumMember => TokenType::EnumMember,
            DeclKind::Field => TokenType::Property,
            DeclKind::TypeAlias => TokenType::Type,
            DeclKind::TypeParameter => TokenType::TypeParameter,
            DeclKind::Parameter => TokenType::Parameter,
            DeclKind::Constant | DeclKind::GlobalVariable | DeclKind::LocalVariable => {
                TokenType::Variable
            }
        }
    }
}

/// A semantic token with position info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemanticToken {
    /// Line number (0-indexed).
    pub line: u32,
    /// Column (0-indexed).
    pub col: u32,
    /// Length of the token in characters.
    pub length: u32,
    /// Token type.
    pub token_type: TokenType,
}

/// Semantic tokens of a file, sorted by position.
pub fn semantic_tokens(ws: &Workspace, file: FileId) -> Vec<SemanticToken> {
    let Some(parsed) = ws.file(file) else {
        return Vec::new();
    };
    let root = parsed.syntax();
    let mut tokens: Vec<SemanticToken> = nodes_of_kind(&root, SyntaxKind::NAME)
        .chain(nodes_of_kind(&root, SyntaxKind::NAME_REF))
        .filter_map(|node| {
            let ident = NamedNode::new(node, parsed.clone());
            let kind = Resolver::resolve(ws, &ident)?.kind()?;
            let span = parsed.span(ident.range());
            // Identifiers never span lines.
            (span.start.line == span.end.line).then(|| SemanticToken {
                line: span.start.line,
                col: span.start.column,
                length: span.end.column - span.start.column,
                token_type: kind.into(),
            })
        })
        .collect();
    tokens.sort_by_key(|t| (t.line, t.col));
    tokens
}
