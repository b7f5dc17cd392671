//! AnalysisHost and Analysis — Unified state management for IDE features.
//!
//! The `AnalysisHost` owns the [`Workspace`] and provides `Analysis`
//! snapshots for querying. Edits are applied eagerly: the index is updated
//! and the caches are cleared before `set_file_content` returns.
//!
//! ## Usage
//!
//! ```ignore
//! let mut host = AnalysisHost::new();
//!
//! // Apply file changes
//! let file = host.set_file_content("/ws/main.tolk", content)?;
//!
//! // Get a snapshot for queries
//! let analysis = host.analysis();
//! let hover = analysis.hover(file, line, col);
//! let symbols = analysis.document_symbols(file);
//! ```

use smol_str::SmolStr;
use tracing::debug;

use crate::base::FileId;
use crate::error::{AnalysisError, RenameError};
use crate::hir::{Variant, Workspace};

use super::{
    GotoResult, HoverResult, PrepareRename, ReferenceResult, SemanticToken, SymbolInfo, TypeInfo,
    WorkspaceEdit,
};

/// Owns all mutable state for the IDE layer.
///
/// Apply changes via `set_file_content()`, `remove_file()` and
/// `rename_file()`, then query through `analysis()`.
#[derive(Default)]
pub struct AnalysisHost {
    workspace: Workspace,
}

impl AnalysisHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory uri of the standard library; set before loading it.
    pub fn set_stdlib_root(&mut self, root: Option<&str>) {
        self.workspace.set_stdlib_root(root);
    }

    pub fn set_implicit_imports<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.workspace.set_implicit_imports(names);
    }

    /// Set the content of a file, parsing and indexing it.
    pub fn set_file_content(&mut self, uri: &str, content: &str) -> Result<FileId, AnalysisError> {
        self.workspace.set_file_text(uri, content).map(|f| f.id())
    }

    /// Returns whether the file was known.
    pub fn remove_file(&mut self, uri: &str) -> bool {
        self.workspace.remove_file(uri).is_some()
    }

    /// Move a file. Returns the edits that keep imports pointing at it; the
    /// edits address files by their uris before the move.
    pub fn rename_file(&mut self, old: &str, new: &str) -> Option<WorkspaceEdit> {
        let edit = super::file_rename_edits(&self.workspace, old, new);
        self.workspace.rename_file(old, new)?;
        debug!(old, new, edits = edit.len(), "file moved");
        Some(edit)
    }

    pub fn has_file(&self, uri: &str) -> bool {
        self.workspace.file_by_uri(uri).is_some()
    }

    pub fn file_id(&self, uri: &str) -> Option<FileId> {
        self.workspace.file_by_uri(uri).map(|f| f.id())
    }

    pub fn file_uri(&self, file: FileId) -> Option<SmolStr> {
        self.workspace.file(file).map(|f| f.uri().clone())
    }

    pub fn file_count(&self) -> usize {
        self.workspace.file_count()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Get a consistent snapshot for querying.
    pub fn analysis(&self) -> Analysis<'_> {
        Analysis {
            ws: &self.workspace,
        }
    }
}

/// An immutable snapshot of the analysis state.
///
/// All positions are 0-based line/column pairs.
pub struct Analysis<'a> {
    ws: &'a Workspace,
}

impl<'a> Analysis<'a> {
    // ==================== Navigation ====================

    pub fn goto_definition(&self, file: FileId, line: u32, col: u32) -> GotoResult {
        super::goto_definition(self.ws, file, line, col)
    }

    /// Navigates from a value to the declaration of its type.
    pub fn goto_type_definition(&self, file: FileId, line: u32, col: u32) -> GotoResult {
        super::goto_type_definition(self.ws, file, line, col)
    }

    pub fn find_references(
        &self,
        file: FileId,
        line: u32,
        col: u32,
        include_declaration: bool,
    ) -> ReferenceResult {
        super::find_references(self.ws, file, line, col, include_declaration)
    }

    // ==================== Rename ====================

    pub fn prepare_rename(&self, file: FileId, line: u32, col: u32) -> Result<PrepareRename, RenameError> {
        super::prepare_rename(self.ws, file, line, col)
    }

    pub fn rename(&self, file: FileId, line: u32, col: u32, new_name: &str) -> Option<WorkspaceEdit> {
        super::rename(self.ws, file, line, col, new_name)
    }

    // ==================== Information ====================

    pub fn hover(&self, file: FileId, line: u32, col: u32) -> Option<HoverResult> {
        super::hover(self.ws, file, line, col)
    }

    pub fn type_at(&self, file: FileId, line: u32, col: u32) -> Option<TypeInfo> {
        super::type_at(self.ws, file, line, col)
    }

    pub fn semantic_tokens(&self, file: FileId) -> Vec<SemanticToken> {
        super::semantic_tokens(self.ws, file)
    }

    pub fn document_symbols(&self, file: FileId) -> Vec<SymbolInfo> {
        super::document_symbols(self.ws, file)
    }

    /// Search for symbols across the workspace.
    pub fn workspace_symbols(&self, query: Option<&str>) -> Vec<SymbolInfo> {
        super::workspace_symbols(self.ws, query)
    }

    pub fn completion_variants(&self, file: FileId, line: u32, col: u32) -> Vec<Variant> {
        super::completion_variants(self.ws, file, line, col)
    }

    // ==================== Accessors ====================

    pub fn workspace(&self) -> &'a Workspace {
        self.ws
    }

    pub fn file_id(&self, uri: &str) -> Option<FileId> {
        self.ws.file_by_uri(uri).map(|f| f.id())
    }
}
