//! Session memo tables.
//!
//! All tables are cleared together whenever any file is added, removed or
//! changed, so entries never outlive the trees they were computed from.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::psi::{NamedNode, NodeKey};
use super::ty::Ty;
use crate::base::FileId;
use crate::syntax::ParsedFile;

#[derive(Default)]
pub struct CacheManager {
    resolve: RefCell<FxHashMap<NodeKey, Rc<[NamedNode]>>>,
    types: RefCell<FxHashMap<NodeKey, Option<Ty>>>,
    func_types: RefCell<FxHashMap<NodeKey, Option<Ty>>>,
    in_progress: RefCell<FxHashSet<NodeKey>>,
    reachable: RefCell<FxHashMap<FileId, Rc<[Rc<ParsedFile>]>>>,
    imported_by: RefCell<FxHashMap<FileId, Rc<[Rc<ParsedFile>]>>>,
}

impl CacheManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_all(&self) {
        trace!("clearing session caches");
        self.resolve.borrow_mut().clear();
        self.types.borrow_mut().clear();
        self.func_types.borrow_mut().clear();
        self.in_progress.borrow_mut().clear();
        self.reachable.borrow_mut().clear();
        self.imported_by.borrow_mut().clear();
    }

    pub fn resolved(&self, key: &NodeKey) -> Option<Rc<[NamedNode]>> {
        self.resolve.borrow().get(key).cloned()
    }

    pub fn store_resolved(&self, key: NodeKey, targets: Rc<[NamedNode]>) {
        self.resolve.borrow_mut().insert(key, targets);
    }

    /// Memoized type of `key`.
    ///
    /// A re-entrant request for a key that is still being computed yields
    /// `None` instead of recursing.
    pub fn type_of(&self, key: NodeKey, compute: impl FnOnce() -> Option<Ty>) -> Option<Ty> {
        memoize(&self.types, &self.in_progress, key, compute)
    }

    /// Like [`Self::type_of`], for function signatures.
    pub fn func_type(&self, key: NodeKey, compute: impl FnOnce() -> Option<Ty>) -> Option<Ty> {
        memoize(&self.func_types, &self.in_progress, key, compute)
    }

    pub fn reachable(
        &self,
        file: FileId,
        compute: impl FnOnce() -> Vec<Rc<ParsedFile>>,
    ) -> Rc<[Rc<ParsedFile>]> {
        file_set(&self.reachable, file, compute)
    }

    pub fn imported_by(
        &self,
        file: FileId,
        compute: impl FnOnce() -> Vec<Rc<ParsedFile>>,
    ) -> Rc<[Rc<ParsedFile>]> {
        file_set(&self.imported_by, file, compute)
    }
}

fn memoize(
    table: &RefCell<FxHashMap<NodeKey, Option<Ty>>>,
    in_progress: &RefCell<FxHashSet<NodeKey>>,
    key: NodeKey,
    compute: impl FnOnce() -> Option<Ty>,
) -> Option<Ty> {
    if let Some(cached) = table.borrow().get(&key) {
        return cached.clone();
    }
    if !in_progress.borrow_mut().insert(key) {
        trace!(?key, "type cycle");
        return None;
    }
    let result = compute();
    in_progress.borrow_mut().remove(&key);
    table.borrow_mut().insert(key, result.clone());
    result
}

fn file_set(
    table: &RefCell<FxHashMap<FileId, Rc<[Rc<ParsedFile>]>>>,
    file: FileId,
    compute: impl FnOnce() -> Vec<Rc<ParsedFile>>,
) -> Rc<[Rc<ParsedFile>]> {
    if let Some(cached) = table.borrow().get(&file) {
        return cached.clone();
    }
    let files: Rc<[Rc<ParsedFile>]> = compute().into();
    table.borrow_mut().insert(file, files.clone());
    files
}
