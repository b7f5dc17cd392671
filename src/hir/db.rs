//! Salsa inputs and the parse queries memoized on them.

use smol_str::SmolStr;

use crate::base::{FileId, Language};
use crate::parser::{AstNode, GreenNode, SyntaxError, SyntaxNode, ast, parse};

// ============================================================================
// INPUTS
// ============================================================================

/// Text of one file revision.
///
/// One input per open file. An edit sets `text` on the existing input, which
/// invalidates the queries that read it.
#[salsa::input]
pub struct FileText {
    pub file: FileId,
    pub language: Language,
    #[return_ref]
    pub text: String,
}

// ============================================================================
// DATABASE
// ============================================================================

/// Storage for the parse queries. Owned by the [`Workspace`](super::Workspace).
#[salsa::db]
#[derive(Default, Clone)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl salsa::Database for RootDatabase {
    fn salsa_event(&self, _event: &dyn Fn() -> salsa::Event) {}
}

impl RootDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Green tree plus the syntax errors found while building it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseResult {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl ParseResult {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

// ============================================================================
// TRACKED QUERIES
// ============================================================================

/// Green tree of a file revision.
#[salsa::tracked]
pub fn parse_file(db: &dyn salsa::Database, file_text: FileText) -> ParseResult {
    let text = file_text.text(db);
    let parse = parse(file_text.language(db), text);
    ParseResult {
        green: parse.green,
        errors: parse.errors,
    }
}

/// Import path strings of a Tolk file, in source order.
#[salsa::tracked]
pub fn file_imports(db: &dyn salsa::Database, file_text: FileText) -> Vec<SmolStr> {
    if file_text.language(db) != Language::Tolk {
        return Vec::new();
    }
    let result = parse_file(db, file_text);
    ast::SourceFile::cast(result.syntax())
        .map(|file| file.imports().filter_map(|i| i.path()).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salsa_tracked_parse_query() {
        let db = RootDatabase::new();
        let file_text = FileText::new(
            &db,
            FileId::new(0),
            Language::Tolk,
            "fun main() {}".to_string(),
        );

        let result = parse_file(&db, file_text);
        assert!(!result.has_errors(), "Parse failed: {:?}", result.errors);
        assert_eq!(result.syntax().text().to_string(), "fun main() {}");
    }

    #[test]
    fn test_salsa_memoization() {
        let db = RootDatabase::new();
        let file_text = FileText::new(
            &db,
            FileId::new(0),
            Language::Tolk,
            "struct Point { x: int }".to_string(),
        );

        let first = parse_file(&db, file_text);
        let second = parse_file(&db, file_text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_file_imports_query() {
        let db = RootDatabase::new();
        let file_text = FileText::new(
            &db,
            FileId::new(1),
            Language::Tolk,
            "import \"./a\"\nimport \"@stdlib/gas-payments\"\nfun f() {}".to_string(),
        );
        let imports = file_imports(&db, file_text);
        assert_eq!(imports, vec!["./a", "@stdlib/gas-payments"]);
    }

    #[test]
    fn test_file_imports_ignores_other_languages() {
        let db = RootDatabase::new();
        let file_text = FileText::new(&db, FileId::new(2), Language::Tlb, "unit$_ = Unit;".to_string());
        assert!(file_imports(&db, file_text).is_empty());
    }
}
