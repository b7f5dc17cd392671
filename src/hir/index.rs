//! Declaration index.
//!
//! ## Structure
//!
//! ```text
//! GlobalIndex (one per language)
//!   ├── IndexRoot: stubs       ← compiler built-ins
//!   ├── IndexRoot: stdlib      ← standard library
//!   └── IndexRoot: workspace   ← user files
//!         └── FileIndex (uri) : DeclKind → name → [NamedNode]
//! ```
//!
//! Lookups walk the roots in that order, so a stub declaration wins over a
//! workspace one with the same name.

use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use super::psi::{DeclKind, NamedNode};
use super::resolve::{ScopeProcessor, binding};
use super::state::ResolveState;
use crate::syntax::{ParsedFile, Provenance};

// ============================================================================
// FILE INDEX
// ============================================================================

/// Declarations of a single file, grouped by kind and name.
pub struct FileIndex {
    file: Rc<ParsedFile>,
    entries: FxHashMap<DeclKind, IndexMap<SmolStr, Vec<NamedNode>>>,
}

impl FileIndex {
    /// Collect the declarations of `file`. Broken files index whatever
    /// declarations parsed.
    pub fn build(file: Rc<ParsedFile>) -> Self {
        let mut entries: FxHashMap<DeclKind, IndexMap<SmolStr, Vec<NamedNode>>> =
            FxHashMap::default();
        for decl in binding(file.language()).file_declarations(&file) {
            let Some(kind) = decl.kind() else {
                continue;
            };
            let name = decl.name();
            if name.is_empty() {
                continue;
            }
            entries
                .entry(kind)
                .or_default()
                .entry(name)
                .or_default()
                .push(decl);
        }
        Self { file, entries }
    }

    pub fn file(&self) -> &Rc<ParsedFile> {
        &self.file
    }

    pub fn by_name(&self, kind: DeclKind, name: &str) -> &[NamedNode] {
        self.entries
            .get(&kind)
            .and_then(|names| names.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All declarations of `kind`, in source order per name.
    pub fn elements(&self, kind: DeclKind) -> impl Iterator<Item = &NamedNode> {
        self.entries
            .get(&kind)
            .into_iter()
            .flat_map(|names| names.values().flatten())
    }

    /// Names declared under a top-level kind.
    pub fn top_level_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.entries
            .iter()
            .filter(|(kind, _)| kind.is_top_level())
            .flat_map(|(_, names)| names.keys())
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(|names| names.values().map(Vec::len).sum::<usize>()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// INDEX ROOT
// ============================================================================

/// Files of one provenance.
pub struct IndexRoot {
    provenance: Provenance,
    files: IndexMap<SmolStr, FileIndex>,
}

impl IndexRoot {
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            files: IndexMap::new(),
        }
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn files(&self) -> impl Iterator<Item = &FileIndex> {
        self.files.values()
    }

    pub fn get(&self, uri: &str) -> Option<&FileIndex> {
        self.files.get(uri)
    }
}

// ============================================================================
// GLOBAL INDEX
// ============================================================================

/// All indexed files of one language.
pub struct GlobalIndex {
    roots: [IndexRoot; 3],
    /// Top-level name → uris declaring it.
    files_by_name: FxHashMap<SmolStr, IndexSet<SmolStr>>,
}

impl Default for GlobalIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalIndex {
    pub fn new() -> Self {
        Self {
            roots: [
                IndexRoot::new(Provenance::Stub),
                IndexRoot::new(Provenance::Stdlib),
                IndexRoot::new(Provenance::Workspace),
            ],
            files_by_name: FxHashMap::default(),
        }
    }

    fn root_mut(&mut self, provenance: Provenance) -> &mut IndexRoot {
        let slot = match provenance {
            Provenance::Stub => 0,
            Provenance::Stdlib => 1,
            Provenance::Workspace => 2,
        };
        &mut self.roots[slot]
    }

    pub fn roots(&self) -> &[IndexRoot] {
        &self.roots
    }

    /// Index `file`, replacing an older version with the same uri.
    ///
    /// Returns `false` when the same uri is already indexed with identical
    /// text.
    pub fn add_file(&mut self, file: Rc<ParsedFile>) -> bool {
        if let Some(existing) = self.file_index(file.uri())
            && existing.file().text() == file.text()
            && existing.file().id() == file.id()
        {
            return false;
        }
        self.remove_file(file.uri());
        let index = FileIndex::build(file.clone());
        for name in index.top_level_names() {
            self.files_by_name
                .entry(name.clone())
                .or_default()
                .insert(file.uri().clone());
        }
        debug!(uri = %file.uri(), entries = index.len(), "indexed file");
        self.root_mut(file.provenance())
            .files
            .insert(file.uri().clone(), index);
        true
    }

    /// Drop the entries of `uri`. Unknown uris are ignored.
    pub fn remove_file(&mut self, uri: &str) -> bool {
        let mut removed = None;
        for root in &mut self.roots {
            if let Some(index) = root.files.shift_remove(uri) {
                removed = Some(index);
            }
        }
        let Some(index) = removed else {
            return false;
        };
        for name in index.top_level_names() {
            if let Some(uris) = self.files_by_name.get_mut(name) {
                uris.shift_remove(uri);
                if uris.is_empty() {
                    self.files_by_name.remove(name);
                }
            }
        }
        debug!(uri, "removed file from index");
        true
    }

    pub fn file_index(&self, uri: &str) -> Option<&FileIndex> {
        self.roots.iter().find_map(|root| root.get(uri))
    }

    /// Indexed files in root order.
    pub fn files(&self) -> impl Iterator<Item = &Rc<ParsedFile>> {
        self.roots
            .iter()
            .flat_map(|root| root.files())
            .map(FileIndex::file)
    }

    /// First declaration of `kind` named `name`, in root order.
    pub fn element_by_name(&self, kind: DeclKind, name: &str) -> Option<NamedNode> {
        self.roots
            .iter()
            .flat_map(|root| root.files())
            .find_map(|index| index.by_name(kind, name).first().cloned())
    }

    pub fn elements_by_name(&self, kind: DeclKind, name: &str) -> Vec<NamedNode> {
        self.roots
            .iter()
            .flat_map(|root| root.files())
            .flat_map(|index| index.by_name(kind, name).iter().cloned())
            .collect()
    }

    /// Whether two or more files declare `name` at the top level.
    pub fn has_several_declarations(&self, name: &str) -> bool {
        self.files_by_name
            .get(name)
            .is_some_and(|uris| uris.len() > 1)
    }

    /// Feed every declaration of `kind` to `processor`.
    ///
    /// Returns `false` when the processor stopped the walk.
    pub fn process_elements_by_key(
        &self,
        kind: DeclKind,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
    ) -> bool {
        for index in self.roots.iter().flat_map(|root| root.files()) {
            if !process_file(index, kind, processor, state) {
                return false;
            }
        }
        true
    }

    /// Per-file variant of [`Self::process_elements_by_key`].
    pub fn process_elements_by_key_and_file(
        &self,
        kind: DeclKind,
        uri: &str,
        processor: &mut dyn ScopeProcessor,
        state: &ResolveState,
    ) -> bool {
        match self.file_index(uri) {
            Some(index) => process_file(index, kind, processor, state),
            None => true,
        }
    }
}

fn process_file(
    index: &FileIndex,
    kind: DeclKind,
    processor: &mut dyn ScopeProcessor,
    state: &ResolveState,
) -> bool {
    for element in index.elements(kind) {
        if processor.execute(element, state).is_break() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FileId, Language};
    use std::ops::ControlFlow;

    fn tolk(id: u32, uri: &str, text: &str) -> Rc<ParsedFile> {
        Rc::new(ParsedFile::parse(
            FileId::new(id),
            uri,
            Language::Tolk,
            text,
            Provenance::classify(uri, Some("/std")),
        ))
    }

    #[test]
    fn test_file_index_collects_nested_members() {
        let file = tolk(
            0,
            "/ws/a.tolk",
            "struct Point { x: int; y: int }\nenum Color { Red }\nfun main() {}",
        );
        let index = FileIndex::build(file);
        assert_eq!(index.by_name(DeclKind::Struct, "Point").len(), 1);
        assert_eq!(index.by_name(DeclKind::Field, "x").len(), 1);
        assert_eq!(index.by_name(DeclKind::EnumMember, "Red").len(), 1);
        assert_eq!(index.by_name(DeclKind::Function, "main").len(), 1);
    }

    #[test]
    fn test_add_file_is_idempotent() {
        let mut index = GlobalIndex::new();
        let file = tolk(0, "/ws/a.tolk", "fun main() {}");
        assert!(index.add_file(file.clone()));
        assert!(!index.add_file(file));
        assert_eq!(index.elements_by_name(DeclKind::Function, "main").len(), 1);
    }

    #[test]
    fn test_changed_text_replaces_entries() {
        let mut index = GlobalIndex::new();
        index.add_file(tolk(0, "/ws/a.tolk", "fun main() {}"));
        assert!(index.add_file(tolk(0, "/ws/a.tolk", "fun other() {}")));
        assert!(index.element_by_name(DeclKind::Function, "main").is_none());
        assert!(index.element_by_name(DeclKind::Function, "other").is_some());
    }

    #[test]
    fn test_remove_file() {
        let mut index = GlobalIndex::new();
        index.add_file(tolk(0, "/ws/a.tolk", "fun main() {}"));
        index.add_file(tolk(1, "/ws/b.tolk", "fun helper() {}"));
        assert!(index.remove_file("/ws/a.tolk"));
        assert!(!index.remove_file("/ws/missing.tolk"));
        assert!(index.element_by_name(DeclKind::Function, "main").is_none());
        assert!(index.element_by_name(DeclKind::Function, "helper").is_some());
    }

    #[test]
    fn test_root_order_and_ambiguity() {
        let mut index = GlobalIndex::new();
        index.add_file(tolk(0, "/ws/a.tolk", "fun log() {}"));
        index.add_file(tolk(1, "/std/common.tolk", "fun log() {}"));
        let first = index.element_by_name(DeclKind::Function, "log").unwrap();
        assert_eq!(first.file().uri(), "/std/common.tolk");
        assert!(index.has_several_declarations("log"));
        assert!(!index.has_several_declarations("main"));
    }

    #[test]
    fn test_process_elements_short_circuits() {
        let mut index = GlobalIndex::new();
        index.add_file(tolk(0, "/ws/a.tolk", "fun a() {}\nfun b() {}\nfun c() {}"));
        let mut seen = Vec::new();
        let mut processor = |node: &NamedNode, _: &ResolveState| {
            seen.push(node.name());
            if seen.len() == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        let completed =
            index.process_elements_by_key(DeclKind::Function, &mut processor, &ResolveState::new());
        assert!(!completed);
        assert_eq!(seen, vec!["a", "b"]);
    }
}
