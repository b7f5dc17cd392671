//! # ton-analyzer-base
//!
//! Semantic core for the TON smart-contract languages: Tolk, TL-B and Fift.
//! Parsing, name resolution, type inference and the editor queries built
//! on them.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → editor queries (goto, references, rename, hover, completion)
//!   ↓
//! project   → configuration, virtual filesystem, stdlib and workspace loading
//!   ↓
//! hir       → PSI, resolver, referent, type inference, index
//!   ↓
//! syntax    → ParsedFile, tree walking
//!   ↓
//! parser    → Logos lexers, recursive-descent parsers, typed AST
//!   ↓
//! base      → Primitives (FileId, LineIndex, Position/Span, constants)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → hir → project → ide)
// ============================================================================

/// Foundation types: FileId, LineIndex, TextRange
pub mod base;

/// Error types for loading and rename
pub mod error;

/// Parser: Logos lexers, recursive-descent parsers, typed AST
pub mod parser;

/// Syntax: ParsedFile, provenance, tree walking
pub mod syntax;

/// Semantic model: resolution, types and usages
pub mod hir;

/// IDE features: goto, references, rename, hover, completion
pub mod ide;

/// Project management: configuration, VFS, stdlib and workspace loading
pub mod project;

// Re-export foundation types
pub use base::{FileId, Language, LineIndex, Position, Span, TextRange, TextSize};
pub use error::{AnalysisError, RenameError};
pub use ide::{Analysis, AnalysisHost};
