//! Session registry: parsed files, per-language indexes and caches.

use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use salsa::Setter;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::debug;

use super::cache::CacheManager;
use super::db::{FileText, RootDatabase, file_imports, parse_file};
use super::imports::ImportResolver;
use super::index::GlobalIndex;
use crate::base::constants::COMMON_FILE;
use crate::base::{FileId, Language};
use crate::error::AnalysisError;
use crate::syntax::{ParsedFile, Provenance};

/// Owns every parsed file of a session.
///
/// An edit updates the file's salsa input in place, re-indexes the file and
/// clears all caches before returning. Inputs of removed files are recycled
/// for the next new file.
pub struct Workspace {
    db: RootDatabase,
    inputs: FxHashMap<FileId, FileText>,
    spare_inputs: Vec<FileText>,
    files: IndexMap<SmolStr, Rc<ParsedFile>>,
    ids: FxHashMap<FileId, SmolStr>,
    next_id: u32,
    tolk: GlobalIndex,
    tlb: GlobalIndex,
    fift: GlobalIndex,
    caches: CacheManager,
    stdlib_root: Option<SmolStr>,
    implicit_imports: Vec<SmolStr>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            db: RootDatabase::new(),
            inputs: FxHashMap::default(),
            spare_inputs: Vec::new(),
            files: IndexMap::new(),
            ids: FxHashMap::default(),
            next_id: 0,
            tolk: GlobalIndex::new(),
            tlb: GlobalIndex::new(),
            fift: GlobalIndex::new(),
            caches: CacheManager::new(),
            stdlib_root: None,
            implicit_imports: vec![SmolStr::new(COMMON_FILE)],
        }
    }

    // ========================================================================
    // CONFIGURATION
    // ========================================================================

    /// Set the directory uri of the standard library. Affects provenance of
    /// files added afterwards and `@stdlib/` import resolution.
    pub fn set_stdlib_root(&mut self, root: Option<&str>) {
        self.stdlib_root = root.map(|r| SmolStr::new(r.trim_end_matches('/')));
        self.caches.clear_all();
    }

    pub fn stdlib_root(&self) -> Option<&str> {
        self.stdlib_root.as_deref()
    }

    /// Stdlib file names every Tolk file sees without an import.
    pub fn set_implicit_imports(&mut self, names: impl IntoIterator<Item = impl Into<SmolStr>>) {
        self.implicit_imports = names.into_iter().map(Into::into).collect();
        self.caches.clear_all();
    }

    pub fn import_resolver(&self) -> ImportResolver<'_> {
        ImportResolver::new(self.stdlib_root())
    }

    // ========================================================================
    // FILE MUTATION
    // ========================================================================

    /// Set the text of `uri`, parsing and indexing it.
    ///
    /// Identical text is a no-op that returns the existing file.
    pub fn set_file_text(&mut self, uri: &str, text: &str) -> Result<Rc<ParsedFile>, AnalysisError> {
        let language =
            Language::from_path(uri).ok_or_else(|| AnalysisError::UnsupportedLanguage(uri.to_string()))?;
        if u32::try_from(text.len()).is_err() {
            return Err(AnalysisError::TextTooLarge {
                uri: uri.to_string(),
                len: text.len(),
            });
        }
        if let Some(existing) = self.files.get(uri)
            && existing.text().as_ref() == text
        {
            return Ok(existing.clone());
        }

        let id = match self.files.get(uri).map(|f| f.id()) {
            Some(id) => id,
            None => self.alloc_id(),
        };
        let input = self.input_for(id, language, text);
        let parse = parse_file(&self.db, input);
        let provenance = Provenance::classify(uri, self.stdlib_root());
        let file = Rc::new(ParsedFile::from_parse(
            id,
            uri,
            language,
            Arc::from(text),
            parse.green,
            parse.errors,
            provenance,
        ));
        debug!(uri, ?language, ?provenance, errors = file.errors().len(), "file updated");

        self.ids.insert(id, file.uri().clone());
        self.files.insert(file.uri().clone(), file.clone());
        self.add_file(file.clone(), true);
        Ok(file)
    }

    /// Register an already parsed file in the index of its language.
    ///
    /// With `notify_dependents`, a change clears every session cache.
    /// Returns whether the index changed.
    pub fn add_file(&mut self, file: Rc<ParsedFile>, notify_dependents: bool) -> bool {
        let changed = self.index_mut(file.language()).add_file(file);
        if changed && notify_dependents {
            self.caches.clear_all();
        }
        changed
    }

    /// Forget `uri`. Unknown uris are ignored.
    pub fn remove_file(&mut self, uri: &str) -> Option<Rc<ParsedFile>> {
        let file = self.files.shift_remove(uri)?;
        self.ids.remove(&file.id());
        if let Some(input) = self.inputs.remove(&file.id()) {
            self.spare_inputs.push(input);
        }
        self.index_mut(file.language()).remove_file(uri);
        self.caches.clear_all();
        debug!(uri, "file removed");
        Some(file)
    }

    /// Re-key `old` under `new`, keeping its id and text.
    pub fn rename_file(&mut self, old: &str, new: &str) -> Option<Rc<ParsedFile>> {
        if !self.files.contains_key(old) {
            return None;
        }
        if old != new {
            self.remove_file(new);
        }
        let existing = self.remove_file(old)?;
        if Language::from_path(new) != Some(existing.language()) {
            let text = existing.text().clone();
            return self.set_file_text(new, &text).ok();
        }
        let file = Rc::new(ParsedFile::from_parse(
            existing.id(),
            new,
            existing.language(),
            existing.text().clone(),
            existing.syntax().green().into_owned(),
            existing.errors().to_vec(),
            Provenance::classify(new, self.stdlib_root()),
        ));
        self.input_for(file.id(), file.language(), file.text());
        self.ids.insert(file.id(), file.uri().clone());
        self.files.insert(file.uri().clone(), file.clone());
        self.add_file(file.clone(), true);
        debug!(old, new, "file renamed");
        Some(file)
    }

    /// The salsa input of `id`, holding `text`. Reuses the file's own input
    /// or a spare one before creating a new input.
    fn input_for(&mut self, id: FileId, language: Language, text: &str) -> FileText {
        let input = match self.inputs.get(&id).copied().or_else(|| self.spare_inputs.pop()) {
            Some(input) => input,
            None => {
                let input = FileText::new(&self.db, id, language, text.to_string());
                self.inputs.insert(id, input);
                return input;
            }
        };
        if input.file(&self.db) != id {
            input.set_file(&mut self.db).to(id);
        }
        if input.language(&self.db) != language {
            input.set_language(&mut self.db).to(language);
        }
        if input.text(&self.db).as_str() != text {
            input.set_text(&mut self.db).to(text.to_string());
        }
        self.inputs.insert(id, input);
        input
    }

    fn alloc_id(&mut self) -> FileId {
        let id = FileId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn index_mut(&mut self, language: Language) -> &mut GlobalIndex {
        match language {
            Language::Tolk => &mut self.tolk,
            Language::Tlb => &mut self.tlb,
            Language::Fift => &mut self.fift,
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn index(&self, language: Language) -> &GlobalIndex {
        match language {
            Language::Tolk => &self.tolk,
            Language::Tlb => &self.tlb,
            Language::Fift => &self.fift,
        }
    }

    pub fn caches(&self) -> &CacheManager {
        &self.caches
    }

    pub fn file(&self, id: FileId) -> Option<Rc<ParsedFile>> {
        let uri = self.ids.get(&id)?;
        self.files.get(uri).cloned()
    }

    pub fn file_by_uri(&self, uri: &str) -> Option<Rc<ParsedFile>> {
        self.files.get(uri).cloned()
    }

    pub fn files(&self) -> impl Iterator<Item = &Rc<ParsedFile>> {
        self.files.values()
    }

    /// Files of one language, in insertion order.
    pub fn files_of(&self, language: Language) -> Vec<Rc<ParsedFile>> {
        self.files
            .values()
            .filter(|f| f.language() == language)
            .cloned()
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Import strings of a Tolk file, in source order.
    pub fn import_paths(&self, file: &ParsedFile) -> Vec<SmolStr> {
        match self.inputs.get(&file.id()) {
            Some(input) => file_imports(&self.db, *input),
            None => Vec::new(),
        }
    }

    /// Files `file` imports directly and that are known to the session.
    pub fn direct_imports(&self, file: &ParsedFile) -> Vec<Rc<ParsedFile>> {
        let resolver = self.import_resolver();
        self.import_paths(file)
            .iter()
            .filter_map(|path| resolver.resolve(file.dir(), path))
            .filter_map(|uri| self.file_by_uri(&uri))
            .collect()
    }

    /// Files reachable from `file` through imports, without `file` itself.
    pub fn reachable_files(&self, file: &ParsedFile) -> Rc<[Rc<ParsedFile>]> {
        self.caches.reachable(file.id(), || {
            let mut seen: FxHashSet<FileId> = FxHashSet::default();
            seen.insert(file.id());
            let mut queue: VecDeque<Rc<ParsedFile>> = self.direct_imports(file).into();
            let mut out = Vec::new();
            while let Some(next) = queue.pop_front() {
                if !seen.insert(next.id()) {
                    continue;
                }
                queue.extend(self.direct_imports(&next));
                out.push(next);
            }
            out
        })
    }

    /// Files that import `file`, directly or transitively.
    pub fn dependents(&self, file: &ParsedFile) -> Rc<[Rc<ParsedFile>]> {
        self.caches.imported_by(file.id(), || {
            self.files_of(file.language())
                .into_iter()
                .filter(|other| other.id() != file.id())
                .filter(|other| self.reachable_files(other).iter().any(|f| f.id() == file.id()))
                .collect()
        })
    }

    /// Files every Tolk file sees without importing them: the configured
    /// stdlib files and all stub files.
    pub fn implicit_files(&self) -> Vec<Rc<ParsedFile>> {
        self.files
            .values()
            .filter(|f| f.language() == Language::Tolk)
            .filter(|f| match f.provenance() {
                Provenance::Stub => true,
                Provenance::Stdlib => self
                    .implicit_imports
                    .iter()
                    .any(|name| f.uri().ends_with(&format!("/{name}")) || f.uri() == name),
                Provenance::Workspace => false,
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::DeclKind;

    #[test]
    fn test_set_file_text_assigns_stable_ids() {
        let mut ws = Workspace::new();
        let a = ws.set_file_text("/ws/a.tolk", "fun a() {}").unwrap();
        let a2 = ws.set_file_text("/ws/a.tolk", "fun a2() {}").unwrap();
        let b = ws.set_file_text("/ws/b.tolk", "fun b() {}").unwrap();
        assert_eq!(a.id(), a2.id());
        assert_ne!(a.id(), b.id());
        assert!(ws.index(Language::Tolk).element_by_name(DeclKind::Function, "a").is_none());
        assert!(ws.index(Language::Tolk).element_by_name(DeclKind::Function, "a2").is_some());
    }

    #[test]
    fn test_edits_reuse_the_salsa_input() {
        let mut ws = Workspace::new();
        let a = ws.set_file_text("/ws/a.tolk", "fun a() {}").unwrap();
        let first = ws.inputs[&a.id()];
        ws.set_file_text("/ws/a.tolk", "fun b() {}").unwrap();
        assert_eq!(ws.inputs[&a.id()], first);
        assert_eq!(first.text(&ws.db).as_str(), "fun b() {}");

        ws.rename_file("/ws/a.tolk", "/ws/c.tolk").unwrap();
        assert_eq!(ws.inputs[&a.id()], first);

        ws.remove_file("/ws/c.tolk");
        let d = ws.set_file_text("/ws/d.tolk", "fun d() {}").unwrap();
        assert_eq!(ws.inputs[&d.id()], first);
        assert_eq!(first.file(&ws.db), d.id());
        assert_eq!(ws.import_paths(&d), Vec::<SmolStr>::new());
    }

    #[test]
    fn test_identical_text_is_noop() {
        let mut ws = Workspace::new();
        let a = ws.set_file_text("/ws/a.tolk", "fun a() {}").unwrap();
        let again = ws.set_file_text("/ws/a.tolk", "fun a() {}").unwrap();
        assert!(Rc::ptr_eq(&a, &again));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let mut ws = Workspace::new();
        let err = ws.set_file_text("/ws/readme.md", "# hi").unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_reachable_and_dependents() {
        let mut ws = Workspace::new();
        let a = ws.set_file_text("/ws/a.tolk", "import \"b\"\nfun a() {}").unwrap();
        let b = ws.set_file_text("/ws/b.tolk", "import \"./c.tolk\"\nfun b() {}").unwrap();
        let c = ws.set_file_text("/ws/c.tolk", "fun c() {}").unwrap();
        let reachable: Vec<_> = ws.reachable_files(&a).iter().map(|f| f.uri().clone()).collect();
        assert_eq!(reachable, vec!["/ws/b.tolk", "/ws/c.tolk"]);
        let dependents: Vec<_> = ws.dependents(&c).iter().map(|f| f.uri().clone()).collect();
        assert_eq!(dependents, vec!["/ws/a.tolk", "/ws/b.tolk"]);
        assert!(ws.dependents(&a).is_empty());
        assert_eq!(ws.reachable_files(&b).len(), 1);
    }

    #[test]
    fn test_implicit_files() {
        let mut ws = Workspace::new();
        ws.set_stdlib_root(Some("/std"));
        ws.set_file_text("/std/common.tolk", "fun beginCell() {}").unwrap();
        ws.set_file_text("/std/gas.tolk", "fun gas() {}").unwrap();
        ws.set_file_text("/srv/stubs.tolk", "type int = builtin").unwrap();
        let names: Vec<_> = ws.implicit_files().iter().map(|f| f.uri().clone()).collect();
        assert_eq!(names, vec!["/std/common.tolk", "/srv/stubs.tolk"]);
    }

    #[test]
    fn test_rename_file_keeps_id() {
        let mut ws = Workspace::new();
        let a = ws.set_file_text("/ws/a.tolk", "fun a() {}").unwrap();
        let moved = ws.rename_file("/ws/a.tolk", "/ws/lib/a.tolk").unwrap();
        assert_eq!(a.id(), moved.id());
        assert!(ws.file_by_uri("/ws/a.tolk").is_none());
        assert_eq!(ws.file(a.id()).unwrap().uri(), "/ws/lib/a.tolk");
    }

    #[test]
    fn test_remove_file_clears_index() {
        let mut ws = Workspace::new();
        ws.set_file_text("/ws/a.tlb", "unit$_ = Unit;").unwrap();
        assert!(ws.index(Language::Tlb).element_by_name(DeclKind::Struct, "Unit").is_some());
        ws.remove_file("/ws/a.tlb");
        assert!(ws.index(Language::Tlb).element_by_name(DeclKind::Struct, "Unit").is_none());
        assert!(ws.remove_file("/ws/a.tlb").is_none());
    }
}
