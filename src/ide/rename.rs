//! Rename of declarations and of files.
//!
//! Symbol rename edits every usage found by [`Referent`] plus the
//! declaration's own name. A shorthand object field `{ x }` is expanded so
//! that the other side of the shorthand keeps its name. File rename
//! rewrites the import strings that point at the moved file and the
//! relative imports inside it.

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use super::{identifier_at, offset_at, span_of};
use crate::base::{FileId, Language, Span, TextRange};
use crate::base::constants::TOLK_EXT;
use crate::error::RenameError;
use crate::hir::{
    DeclKind, FindReferenceOptions, NamedNode, Referent, Resolver, Workspace, is_stdlib_import,
    relative_import,
};
use crate::parser::ast::{AstNode, ObjectField, SourceFile};
use crate::parser::{SyntaxKind, tokenize};
use crate::syntax::ParsedFile;

/// Range and current text of the identifier a rename would change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrepareRename {
    pub span: Span,
    pub placeholder: SmolStr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextRange,
    pub span: Span,
    pub new_text: String,
}

/// Edits grouped by file uri, files in first-touched order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceEdit {
    pub changes: IndexMap<SmolStr, Vec<TextEdit>>,
}

impl WorkspaceEdit {
    fn push(&mut self, file: &ParsedFile, range: TextRange, new_text: String) {
        let edits = self.changes.entry(file.uri().clone()).or_default();
        if edits.iter().any(|e| e.range == range) {
            return;
        }
        edits.push(TextEdit {
            range,
            span: file.span(range),
            new_text,
        });
    }

    /// Total number of edits.
    pub fn len(&self) -> usize {
        self.changes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edits(&self, uri: &str) -> &[TextEdit] {
        self.changes.get(uri).map(Vec::as_slice).unwrap_or_default()
    }

    /// `text` with the edits for `uri` applied.
    pub fn apply(&self, uri: &str, text: &str) -> String {
        let mut edits: Vec<&TextEdit> = self.edits(uri).iter().collect();
        edits.sort_by_key(|e| std::cmp::Reverse(e.range.start()));
        let mut out = text.to_string();
        for edit in edits {
            let range = usize::from(edit.range.start())..usize::from(edit.range.end());
            if out.is_char_boundary(range.start) && out.is_char_boundary(range.end) {
                out.replace_range(range, &edit.new_text);
            }
        }
        out
    }
}

/// Check that the identifier at the position can be renamed.
pub fn prepare_rename(ws: &Workspace, file: FileId, line: u32, col: u32) -> Result<PrepareRename, RenameError> {
    let (ident, _) = rename_target(ws, file, line, col)?;
    Ok(PrepareRename {
        span: span_of(&ident),
        placeholder: ident.name(),
    })
}

/// Rename the declaration the identifier at the position names.
///
/// Returns `None` when the position cannot be renamed or the new name is
/// not usable. A name that is not a plain identifier is wrapped in
/// backticks.
pub fn rename(ws: &Workspace, file: FileId, line: u32, col: u32, new_name: &str) -> Option<WorkspaceEdit> {
    let (ident, decl) = rename_target(ws, file, line, col).ok()?;
    let new_text = rename_text(ident.language(), new_name).ok()?;

    let options = FindReferenceOptions {
        include_definition: true,
        include_self: false,
        ..FindReferenceOptions::default()
    };
    let mut edit = WorkspaceEdit::default();
    for usage in Referent::new(ws, &decl).find_references(options) {
        let text = match shorthand_field(&usage) {
            Some(old) if decl.kind() == Some(DeclKind::Field) => format!("{new_text}: {old}"),
            Some(old) => format!("{old}: {new_text}"),
            None => new_text.to_string(),
        };
        edit.push(usage.file(), usage.range(), text);
    }
    Some(edit)
}

fn rename_target(ws: &Workspace, file: FileId, line: u32, col: u32) -> Result<(NamedNode, NamedNode), RenameError> {
    let parsed = ws.file(file).ok_or(RenameError::NotAnIdentifier)?;
    let ident = offset_at(&parsed, line, col)
        .and_then(|o| identifier_at(&parsed, o))
        .ok_or(RenameError::NotAnIdentifier)?;
    let decl = Resolver::resolve(ws, &ident).ok_or(RenameError::NotAnIdentifier)?;
    if decl.file().provenance().is_read_only() {
        return Err(RenameError::ReadOnlyDeclaration);
    }
    Ok((ident, decl))
}

/// The written text of `usage` when it is the name of a shorthand field.
fn shorthand_field(usage: &NamedNode) -> Option<String> {
    let field = usage.node().parent().and_then(ObjectField::cast)?;
    field
        .is_shorthand()
        .then(|| usage.node().text().to_string())
}

/// The text that replaces the old identifier.
///
/// Only Tolk can quote names: anything that is not a plain identifier there
/// is wrapped in backticks. TL-B needs a plain identifier and Fift a single
/// word.
fn rename_text(language: Language, new_name: &str) -> Result<SmolStr, RenameError> {
    let name = new_name.trim();
    let invalid = || RenameError::InvalidName(new_name.to_string());
    if name.is_empty() {
        return Err(invalid());
    }
    match language {
        Language::Tolk => tolk_rename_text(name).ok_or_else(invalid),
        Language::Tlb => is_plain_identifier(language, name)
            .then(|| SmolStr::new(name))
            .ok_or_else(invalid),
        Language::Fift => match tokenize(language, name).as_slice() {
            [token] if token.kind == SyntaxKind::FIFT_WORD => Ok(SmolStr::new(name)),
            _ => Err(invalid()),
        },
    }
}

fn tolk_rename_text(name: &str) -> Option<SmolStr> {
    if let Some(inner) = name.strip_prefix('`').and_then(|n| n.strip_suffix('`')) {
        return (!inner.is_empty() && !inner.contains(['`', '\n'])).then(|| SmolStr::new(name));
    }
    if name.contains(['`', '\n']) {
        return None;
    }
    if is_plain_identifier(Language::Tolk, name) {
        Some(SmolStr::new(name))
    } else {
        Some(SmolStr::new(format!("`{name}`")))
    }
}

/// An identifier that needs no quoting: XID characters only and not a
/// keyword.
fn is_plain_identifier(language: Language, name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || unicode_ident::is_xid_start(first)) || !chars.all(unicode_ident::is_xid_continue) {
        return false;
    }
    match tokenize(language, name).as_slice() {
        [token] => token.kind == SyntaxKind::IDENT,
        _ => false,
    }
}

// ============================================================================
// FILE RENAME
// ============================================================================

/// Edits that keep imports valid when the Tolk file `old` moves to `new`.
///
/// Importers get a path relative to their own directory. The moved file's
/// relative imports are recomputed from its new directory. `@stdlib`
/// imports never change. Edits are keyed by the uris before the move.
pub fn file_rename_edits(ws: &Workspace, old: &str, new: &str) -> WorkspaceEdit {
    let mut edit = WorkspaceEdit::default();
    let Some(moved) = ws.file_by_uri(old) else {
        return edit;
    };
    if moved.language() != Language::Tolk {
        return edit;
    }
    let resolver = ws.import_resolver();
    let new_dir = new.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("");

    for importer in ws.files_of(Language::Tolk) {
        if importer.id() == moved.id() || importer.provenance().is_read_only() {
            continue;
        }
        for (range, path) in import_strings(&importer) {
            if is_stdlib_import(&path) || resolver.resolve(importer.dir(), &path).as_deref() != Some(old) {
                continue;
            }
            let rewritten = rewrite_path(&path, importer.dir(), new);
            edit.push(&importer, range, format!("\"{rewritten}\""));
        }
    }

    for (range, path) in import_strings(&moved) {
        if is_stdlib_import(&path) || path.starts_with('/') {
            continue;
        }
        let Some(target) = resolver.resolve(moved.dir(), &path) else {
            continue;
        };
        let rewritten = rewrite_path(&path, new_dir, &target);
        if rewritten != path.as_str() {
            edit.push(&moved, range, format!("\"{rewritten}\""));
        }
    }
    edit
}

/// Ranges of the quoted path strings of `file`'s imports, with the paths.
fn import_strings(file: &ParsedFile) -> Vec<(TextRange, SmolStr)> {
    let Some(source) = SourceFile::cast(file.syntax()) else {
        return Vec::new();
    };
    source
        .imports()
        .filter_map(|import| Some((import.path_token()?.text_range(), import.path()?)))
        .collect()
}

/// `old_path` rewritten to reach `target` from `from_dir`, keeping the
/// style of the original: extension and leading `./`.
fn rewrite_path(old_path: &str, from_dir: &str, target: &str) -> String {
    if old_path.starts_with('/') {
        return if old_path.ends_with(&format!(".{TOLK_EXT}")) {
            target.to_string()
        } else {
            target
                .strip_suffix(&format!(".{TOLK_EXT}"))
                .unwrap_or(target)
                .to_string()
        };
    }
    let keep_extension = old_path.ends_with(&format!(".{TOLK_EXT}"));
    let relative = relative_import(from_dir, target, keep_extension);
    if old_path.starts_with('.') {
        relative
    } else {
        relative
            .strip_prefix("./")
            .map(str::to_string)
            .unwrap_or(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ide::fixture::{cursor, host};
    use rstest::rstest;

    #[rstest]
    #[case("newName", "newName")]
    #[case("  padded ", "padded")]
    #[case("with space", "`with space`")]
    #[case("fun", "`fun`")]
    #[case("1st", "`1st`")]
    #[case("`already quoted`", "`already quoted`")]
    fn test_rename_text(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(rename_text(Language::Tolk, input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("``")]
    #[case("a`b")]
    fn test_rename_text_rejects(#[case] input: &str) {
        assert!(matches!(rename_text(Language::Tolk, input), Err(RenameError::InvalidName(_))));
    }

    #[rstest]
    #[case(Language::Fift, "my-word", Some("my-word"))]
    #[case(Language::Fift, "two words", None)]
    #[case(Language::Fift, "\"str\"", None)]
    #[case(Language::Tlb, "Bool2", Some("Bool2"))]
    #[case(Language::Tlb, "with space", None)]
    #[case(Language::Tlb, "my-type", None)]
    fn test_rename_text_never_quotes_outside_tolk(
        #[case] language: Language,
        #[case] input: &str,
        #[case] expected: Option<&str>,
    ) {
        match expected {
            Some(text) => assert_eq!(rename_text(language, input).unwrap(), text),
            None => assert!(matches!(rename_text(language, input), Err(RenameError::InvalidName(_)))),
        }
    }

    #[test]
    fn test_rename_local_variable() {
        let text = "fun main() { val x = 1; val y = x + x; }";
        let host = host(&[("/ws/main.tolk", text)]);
        let (file, line, col) = cursor(&host, "/ws/main.tolk", "x + x");

        let edit = rename(host.workspace(), file, line, col, "count").unwrap();
        assert_eq!(edit.len(), 3);
        assert_eq!(
            edit.apply("/ws/main.tolk", text),
            "fun main() { val count = 1; val y = count + count; }"
        );
    }

    #[test]
    fn test_rename_across_files() {
        let lib = "fun helper(): int { return 1; }";
        let main = "import \"lib\"\nfun main() { helper(); }";
        let host = host(&[("/ws/lib.tolk", lib), ("/ws/main.tolk", main)]);
        let (file, line, col) = cursor(&host, "/ws/main.tolk", "helper");

        let edit = rename(host.workspace(), file, line, col, "assist").unwrap();
        assert_eq!(edit.apply("/ws/lib.tolk", lib), "fun assist(): int { return 1; }");
        assert_eq!(edit.apply("/ws/main.tolk", main), "import \"lib\"\nfun main() { assist(); }");
    }

    #[test]
    fn test_prepare_rename_refuses_stdlib() {
        let mut host = crate::ide::AnalysisHost::new();
        host.set_stdlib_root(Some("/std"));
        host.set_implicit_imports(["common.tolk"]);
        host.set_file_content("/std/common.tolk", "fun stdFn() {}").unwrap();
        host.set_file_content("/ws/main.tolk", "fun main() { stdFn(); }").unwrap();
        let (file, line, col) = cursor(&host, "/ws/main.tolk", "stdFn");

        let err = prepare_rename(host.workspace(), file, line, col).unwrap_err();
        assert_eq!(err, RenameError::ReadOnlyDeclaration);
        assert_eq!(err.to_string(), "Can not rename element from Standard Library");
        assert!(rename(host.workspace(), file, line, col, "other").is_none());
    }

    #[test]
    fn test_prepare_rename_reports_placeholder() {
        let host = host(&[("/ws/main.tolk", "fun main() { val `my var` = 1; }")]);
        let (file, line, col) = cursor(&host, "/ws/main.tolk", "my var");

        let prepared = prepare_rename(host.workspace(), file, line, col).unwrap();
        assert_eq!(prepared.placeholder, "my var");
    }

    #[test]
    fn test_file_rename_rewrites_imports() {
        let host = host(&[
            ("/ws/lib/util.tolk", "import \"../other\"\nfun util() {}"),
            ("/ws/other.tolk", "fun other() {}"),
            ("/ws/main.tolk", "import \"lib/util\"\nimport \"@stdlib/gas\"\nfun main() { util(); }"),
        ]);

        let edit = file_rename_edits(host.workspace(), "/ws/lib/util.tolk", "/ws/core/deep/util.tolk");
        assert_eq!(edit.edits("/ws/main.tolk").len(), 1);
        assert_eq!(edit.edits("/ws/main.tolk")[0].new_text, "\"core/deep/util\"");
        assert_eq!(edit.edits("/ws/lib/util.tolk")[0].new_text, "\"../../other\"");
    }
}
