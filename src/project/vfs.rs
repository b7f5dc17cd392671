//! Virtual filesystem: the only place the analyzer touches storage.
//!
//! Every call degrades to "not found" instead of failing.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;

use tracing::warn;

pub trait Vfs {
    fn read_file(&self, uri: &str) -> Option<String>;
    fn exists(&self, uri: &str) -> bool;
    /// Files directly inside the directory `uri`, sorted.
    fn list_files(&self, uri: &str) -> Vec<String>;
    /// Directories directly inside the directory `uri`, sorted.
    fn list_dirs(&self, uri: &str) -> Vec<String>;
}

/// Paths to strings with forward slashes.
pub fn path_to_uri(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The real filesystem. Uris are plain paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsVfs;

impl FsVfs {
    fn list(&self, uri: &str, dirs: bool) -> Vec<String> {
        let entries = match fs::read_dir(uri) {
            Ok(entries) => entries,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!(uri, %err, "cannot list directory");
                }
                return Vec::new();
            }
        };
        let mut out: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir() == dirs))
            .map(|e| path_to_uri(&e.path()))
            .collect();
        out.sort();
        out
    }
}

impl Vfs for FsVfs {
    fn read_file(&self, uri: &str) -> Option<String> {
        match fs::read_to_string(uri) {
            Ok(text) => Some(text),
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    warn!(uri, %err, "cannot read file");
                }
                None
            }
        }
    }

    fn exists(&self, uri: &str) -> bool {
        fs::metadata(uri).is_ok()
    }

    fn list_files(&self, uri: &str) -> Vec<String> {
        self.list(uri, false)
    }

    fn list_dirs(&self, uri: &str) -> Vec<String> {
        self.list(uri, true)
    }
}

/// In-memory files, for tests and unsaved buffers.
#[derive(Debug, Default, Clone)]
pub struct MemoryVfs {
    files: BTreeMap<String, String>,
}

impl MemoryVfs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, text: impl Into<String>) {
        self.files.insert(uri.into(), text.into());
    }

    pub fn remove(&mut self, uri: &str) -> Option<String> {
        self.files.remove(uri)
    }

    /// Entries strictly below `dir`, as the remainder after `dir/`.
    fn below<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let dir = dir.trim_end_matches('/');
        self.files.keys().filter_map(move |uri| {
            let rest = uri.strip_prefix(dir)?.strip_prefix('/')?;
            Some((uri.as_str(), rest))
        })
    }
}

impl Vfs for MemoryVfs {
    fn read_file(&self, uri: &str) -> Option<String> {
        self.files.get(uri).cloned()
    }

    fn exists(&self, uri: &str) -> bool {
        self.files.contains_key(uri) || self.below(uri).next().is_some()
    }

    fn list_files(&self, uri: &str) -> Vec<String> {
        self.below(uri)
            .filter(|(_, rest)| !rest.contains('/'))
            .map(|(full, _)| full.to_string())
            .collect()
    }

    fn list_dirs(&self, uri: &str) -> Vec<String> {
        let dir = uri.trim_end_matches('/');
        let mut dirs: Vec<String> = self
            .below(uri)
            .filter_map(|(_, rest)| rest.split_once('/').map(|(first, _)| format!("{dir}/{first}")))
            .collect();
        dirs.dedup();
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_vfs_listing() {
        let mut vfs = MemoryVfs::new();
        vfs.insert("/ws/a.tolk", "");
        vfs.insert("/ws/lib/b.tolk", "");
        vfs.insert("/ws/lib/c.tolk", "");
        vfs.insert("/wsx/d.tolk", "");

        assert_eq!(vfs.list_files("/ws"), vec!["/ws/a.tolk"]);
        assert_eq!(vfs.list_dirs("/ws/"), vec!["/ws/lib"]);
        assert!(vfs.exists("/ws/lib"));
        assert!(!vfs.exists("/nope"));
        assert_eq!(vfs.read_file("/ws/a.tolk").as_deref(), Some(""));
    }

    #[test]
    fn test_fs_vfs_degrades_to_not_found() {
        let dir = TempDir::new().unwrap();
        let root = path_to_uri(dir.path());
        std::fs::write(dir.path().join("main.tolk"), "fun main() {}").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let vfs = FsVfs;
        assert_eq!(vfs.list_files(&root), vec![format!("{root}/main.tolk")]);
        assert_eq!(vfs.list_dirs(&root), vec![format!("{root}/sub")]);
        assert!(vfs.read_file(&format!("{root}/missing.tolk")).is_none());
        assert!(vfs.list_files(&format!("{root}/missing")).is_empty());
    }
}
