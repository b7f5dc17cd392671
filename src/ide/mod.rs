//! IDE features — High-level APIs for editor requests.
//!
//! This module sits between the semantic model (HIR) and an editor
//! protocol layer. Each function corresponds to one request.
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: Take a workspace and a position, return data
//! 2. **No protocol types**: Uses our own types, converted at the boundary
//! 3. **Total**: malformed input yields empty results, never a panic
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AnalysisHost`:
//!
//! ```ignore
//! use ton_analyzer::ide::AnalysisHost;
//!
//! let mut host = AnalysisHost::new();
//! let file = host.set_file_content("/ws/main.tolk", "fun main() {}")?;
//!
//! let analysis = host.analysis();
//! let symbols = analysis.document_symbols(file);
//! ```

mod analysis;
mod completion;
mod goto;
mod hover;
mod references;
mod rename;
mod semantic_tokens;
mod symbols;
mod type_info;

use std::rc::Rc;

pub use analysis::{Analysis, AnalysisHost};
pub use completion::completion_variants;
pub use goto::{GotoResult, GotoTarget, goto_definition, goto_type_definition};
pub use hover::{HoverResult, hover};
pub use references::{Reference, ReferenceResult, find_references};
pub use rename::{PrepareRename, TextEdit, WorkspaceEdit, file_rename_edits, prepare_rename, rename};
pub use semantic_tokens::{SemanticToken, TokenType, semantic_tokens};
pub use symbols::{SymbolInfo, document_symbols, workspace_symbols};
pub use type_info::{TypeInfo, type_at};

use crate::base::{Position, Span, TextSize};
use crate::hir::NamedNode;
use crate::parser::{SyntaxKind, SyntaxToken};
use crate::syntax::ParsedFile;

/// Byte offset of a 0-based line/column.
pub(crate) fn offset_at(file: &ParsedFile, line: u32, col: u32) -> Option<TextSize> {
    file.line_index().offset(Position::new(line, col))
}

fn is_identifier(token: &SyntaxToken) -> bool {
    matches!(token.kind(), SyntaxKind::IDENT | SyntaxKind::FIFT_WORD)
}

/// The `NAME`/`NAME_REF` under the cursor. A cursor right after an
/// identifier (`foo|:`) still picks it.
pub(crate) fn identifier_at(file: &Rc<ParsedFile>, offset: TextSize) -> Option<NamedNode> {
    let tokens = file.syntax().token_at_offset(offset);
    let token = tokens
        .clone()
        .right_biased()
        .filter(is_identifier)
        .or_else(|| tokens.left_biased().filter(is_identifier))?;
    let parent = token.parent()?;
    matches!(parent.kind(), SyntaxKind::NAME | SyntaxKind::NAME_REF)
        .then(|| NamedNode::new(parent, file.clone()))
}

pub(crate) fn span_of(node: &NamedNode) -> Span {
    node.file().span(node.range())
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::AnalysisHost;
    use crate::base::FileId;

    pub fn host(sources: &[(&str, &str)]) -> AnalysisHost {
        let mut host = AnalysisHost::new();
        for (uri, text) in sources {
            host.set_file_content(uri, text).unwrap();
        }
        host
    }

    /// Position of `marker` in `uri`. A `|` inside the marker sets the
    /// cursor; otherwise it sits on the first character.
    pub fn cursor(host: &AnalysisHost, uri: &str, marker: &str) -> (FileId, u32, u32) {
        let file = host.workspace().file_by_uri(uri).unwrap();
        let bar = marker.find('|').unwrap_or(0);
        let needle = marker.replace('|', "");
        let at = file.text().find(&needle).unwrap() + bar;
        let pos = file.line_index().position((at as u32).into());
        (file.id(), pos.line, pos.column)
    }
}
