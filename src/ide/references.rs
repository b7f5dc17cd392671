//! Find-references implementation.

use smol_str::SmolStr;

use super::{identifier_at, offset_at, span_of};
use crate::base::{FileId, Span};
use crate::hir::{FindReferenceOptions, NamedNode, Referent, Workspace};

/// A reference location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    pub file: FileId,
    pub uri: SmolStr,
    pub span: Span,
}

impl From<&NamedNode> for Reference {
    fn from(node: &NamedNode) -> Self {
        Self {
            file: node.file().id(),
            uri: node.file().uri().clone(),
            span: span_of(node),
        }
    }
}

/// Result of a find-references request.
#[derive(Clone, Debug, Default)]
pub struct ReferenceResult {
    /// The declaration first when it was requested, then usages in scope
    /// order.
    pub references: Vec<Reference>,
}

impl ReferenceResult {
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }
}

/// Find all references to the declaration the identifier at the position
/// names. Works from a usage or from the declaration's own name.
pub fn find_references(
    ws: &Workspace,
    file: FileId,
    line: u32,
    col: u32,
    include_declaration: bool,
) -> ReferenceResult {
    let Some(parsed) = ws.file(file) else {
        return ReferenceResult::default();
    };
    let Some(ident) = offset_at(&parsed, line, col).and_then(|o| identifier_at(&parsed, o)) else {
        return ReferenceResult::default();
    };
    let options = FindReferenceOptions {
        include_definition: include_declaration,
        ..FindReferenceOptions::default()
    };
    let references = Referent::new(ws, &ident)
        .find_references(options)
        .iter()
        .map(Reference::from)
        .collect();
    ReferenceResult { references }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ide::fixture::{cursor, host};

    const LIB: &str = "fun helper(): int { return 1; }";
    const MAIN: &str = "import \"lib\"\nfun main() { helper(); helper(); }";

    #[test]
    fn test_references_across_files() {
        let host = host(&[("/ws/lib.tolk", LIB), ("/ws/main.tolk", MAIN)]);
        let (file, line, col) = cursor(&host, "/ws/main.tolk", "helper()");

        let result = find_references(host.workspace(), file, line, col, true);
        assert_eq!(result.len(), 3);
        assert_eq!(result.references[0].uri, "/ws/lib.tolk");
        assert!(result.references[1..].iter().all(|r| r.uri == "/ws/main.tolk"));
    }

    #[test]
    fn test_references_without_declaration() {
        let host = host(&[("/ws/lib.tolk", LIB), ("/ws/main.tolk", MAIN)]);
        let (file, line, col) = cursor(&host, "/ws/lib.tolk", "helper");

        let result = find_references(host.workspace(), file, line, col, false);
        assert_eq!(result.len(), 2);
        assert_eq!(result.references[0].span, Span::from_coords(1, 13, 1, 19));
    }

    #[test]
    fn test_unrelated_file_is_not_searched() {
        let host = host(&[
            ("/ws/lib.tolk", LIB),
            ("/ws/other.tolk", "fun helper() {}\nfun g() { helper(); }"),
        ]);
        let (file, line, col) = cursor(&host, "/ws/lib.tolk", "helper");

        let result = find_references(host.workspace(), file, line, col, false);
        assert!(result.is_empty());
    }
}
