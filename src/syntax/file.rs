//! Parsed file wrapper shared by the semantic layer.
//!
//! A [`ParsedFile`] pairs a rowan tree with its text, uri and provenance.
//! It is immutable: an edit produces a new instance that replaces the old
//! one in the workspace.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::constants::{STDLIB_DIR, STUBS_FILE};
use crate::base::{FileId, Language, LineIndex, Span, TextRange};
use crate::parser::{GreenNode, Parse, SyntaxError, SyntaxNode, parse};

/// Where a file comes from. Decides rename and usage-scope policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// Part of the standard library; read-only.
    Stdlib,
    /// Compiler built-ins declared in `stubs.tolk`; read-only.
    Stub,
    /// A user file.
    Workspace,
}

impl Provenance {
    /// Classify a uri against the configured stdlib root.
    pub fn classify(uri: &str, stdlib_root: Option<&str>) -> Self {
        if uri.ends_with(STUBS_FILE) {
            return Self::Stub;
        }
        let under_root = stdlib_root
            .filter(|root| !root.is_empty())
            .is_some_and(|root| uri.starts_with(root));
        if under_root || uri.contains(STDLIB_DIR) {
            Self::Stdlib
        } else {
            Self::Workspace
        }
    }

    pub fn is_read_only(self) -> bool {
        matches!(self, Self::Stdlib | Self::Stub)
    }
}

/// A parsed source file.
#[derive(Debug)]
pub struct ParsedFile {
    id: FileId,
    uri: SmolStr,
    language: Language,
    text: Arc<str>,
    root: SyntaxNode,
    errors: Vec<SyntaxError>,
    provenance: Provenance,
    line_index: LineIndex,
}

impl ParsedFile {
    /// Build from an already computed parse (e.g. from the salsa database).
    pub fn from_parse(
        id: FileId,
        uri: impl Into<SmolStr>,
        language: Language,
        text: Arc<str>,
        green: GreenNode,
        errors: Vec<SyntaxError>,
        provenance: Provenance,
    ) -> Self {
        Self {
            id,
            uri: uri.into(),
            language,
            line_index: LineIndex::new(text.clone()),
            text,
            root: SyntaxNode::new_root(green),
            errors,
            provenance,
        }
    }

    /// Parse `text` directly.
    pub fn parse(
        id: FileId,
        uri: impl Into<SmolStr>,
        language: Language,
        text: impl Into<Arc<str>>,
        provenance: Provenance,
    ) -> Self {
        let text = text.into();
        let Parse { green, errors } = parse(language, &text);
        Self::from_parse(id, uri, language, text, green, errors, provenance)
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn uri(&self) -> &SmolStr {
        &self.uri
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn text(&self) -> &Arc<str> {
        &self.text
    }

    /// The root `SOURCE_FILE` node.
    pub fn syntax(&self) -> SyntaxNode {
        self.root.clone()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Convert a text range to a line/column span.
    pub fn span(&self, range: TextRange) -> Span {
        self.line_index.span(range)
    }

    /// Directory part of the uri, without the trailing slash.
    pub fn dir(&self) -> &str {
        self.uri.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_classification() {
        assert_eq!(
            Provenance::classify("/lib/tolk-stdlib/common.tolk", None),
            Provenance::Stdlib
        );
        assert_eq!(
            Provenance::classify("/opt/std/gas.tolk", Some("/opt/std")),
            Provenance::Stdlib
        );
        assert_eq!(
            Provenance::classify("/server/stubs.tolk", Some("/opt/std")),
            Provenance::Stub
        );
        assert_eq!(
            Provenance::classify("/work/main.tolk", Some("/opt/std")),
            Provenance::Workspace
        );
        assert!(Provenance::Stub.is_read_only());
        assert!(!Provenance::Workspace.is_read_only());
    }

    #[test]
    fn test_parsed_file_accessors() {
        let file = ParsedFile::parse(
            FileId::new(3),
            "/work/main.tolk",
            Language::Tolk,
            "fun main() {}\n",
            Provenance::Workspace,
        );
        assert_eq!(file.id(), FileId::new(3));
        assert_eq!(file.dir(), "/work");
        assert!(!file.has_errors());
        assert_eq!(file.syntax().text().to_string(), "fun main() {}\n");
    }
}
