//! Go-to-definition implementation.

use smol_str::SmolStr;

use super::{identifier_at, offset_at, span_of};
use crate::base::{FileId, Span, TextSize};
use crate::hir::{DeclKind, NamedNode, Resolver, TypeInferer, Workspace};
use crate::parser::ast::{AstNode, Import};
use crate::parser::SyntaxKind;
use crate::syntax::ParsedFile;

/// Result of a go-to-definition request.
#[derive(Clone, Debug)]
pub struct GotoResult {
    /// The targets to jump to.
    pub targets: Vec<GotoTarget>,
}

impl GotoResult {
    /// Create an empty result (no targets found).
    pub fn empty() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    /// Create a result with a single target.
    pub fn single(target: GotoTarget) -> Self {
        Self {
            targets: vec![target],
        }
    }

    /// Create a result with multiple targets.
    pub fn multiple(targets: Vec<GotoTarget>) -> Self {
        Self { targets }
    }

    /// Check if any targets were found.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// A target location for go-to-definition.
#[derive(Clone, Debug)]
pub struct GotoTarget {
    /// The file containing the target.
    pub file: FileId,
    pub uri: SmolStr,
    /// Range of the target's name.
    pub span: Span,
    /// `None` when the target is a whole file.
    pub kind: Option<DeclKind>,
    pub name: SmolStr,
}

impl From<&NamedNode> for GotoTarget {
    fn from(decl: &NamedNode) -> Self {
        let name = decl
            .name_identifier()
            .map(|n| decl.with_node(n))
            .unwrap_or_else(|| decl.clone());
        Self {
            file: decl.file().id(),
            uri: decl.file().uri().clone(),
            span: span_of(&name),
            kind: decl.kind(),
            name: decl.name(),
        }
    }
}

/// Find the definition of the identifier at the given position.
///
/// On the path string of an `import` the target is the imported file.
/// Ambiguous names yield every candidate.
pub fn goto_definition(ws: &Workspace, file: FileId, line: u32, col: u32) -> GotoResult {
    let Some(parsed) = ws.file(file) else {
        return GotoResult::empty();
    };
    let Some(offset) = offset_at(&parsed, line, col) else {
        return GotoResult::empty();
    };

    if let Some(target) = import_target(ws, &parsed, offset) {
        return GotoResult::single(target);
    }

    let Some(ident) = identifier_at(&parsed, offset) else {
        return GotoResult::empty();
    };
    let targets: Vec<GotoTarget> = Resolver::multi_resolve(ws, &ident)
        .iter()
        .map(GotoTarget::from)
        .collect();
    GotoResult::multiple(targets)
}

fn import_target(ws: &Workspace, parsed: &ParsedFile, offset: TextSize) -> Option<GotoTarget> {
    let token = parsed
        .syntax()
        .token_at_offset(offset)
        .find(|t| t.kind() == SyntaxKind::STRING)?;
    let import = token.parent_ancestors().find_map(Import::cast)?;
    let path = import.path()?;
    let uri = ws.import_resolver().resolve(parsed.dir(), &path)?;
    let target = ws.file_by_uri(&uri)?;
    Some(GotoTarget {
        file: target.id(),
        uri: target.uri().clone(),
        span: Span::default(),
        kind: None,
        name: path,
    })
}

/// Find the declaration of the type of the value at the given position.
///
/// Nullable and generic wrappers are stripped: on `p: Box<Point>?` the
/// target is `Box`.
pub fn goto_type_definition(ws: &Workspace, file: FileId, line: u32, col: u32) -> GotoResult {
    let Some(parsed) = ws.file(file) else {
        return GotoResult::empty();
    };
    let Some(ident) = offset_at(&parsed, line, col).and_then(|o| identifier_at(&parsed, o)) else {
        return GotoResult::empty();
    };
    let Some(decl) = Resolver::resolve(ws, &ident) else {
        return GotoResult::empty();
    };
    let Some(ty) = TypeInferer::type_of(ws, &decl) else {
        return GotoResult::empty();
    };
    let ty = ty.unwrap_option().unwrap_instantiation();
    match ty.anchor() {
        Some(anchor) => GotoResult::single(GotoTarget::from(anchor)),
        None => GotoResult::empty(),
    }
}
