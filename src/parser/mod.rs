//! Rowan-based lossless parsers for the TON language family
//!
//! This module provides lossless parsers for Tolk, TL-B and Fift using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! All three languages share one [`SyntaxKind`] enum and one rowan language,
//! so the semantic layer works with a single node type.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//! ```

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod grammar;
mod lexer;
mod syntax_kind;

pub use ast::AstNode;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, SyntaxError, parse};
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TonLanguage};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize, WalkEvent};
