use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::config::AnalysisConfig;
use super::stdlib_loader::StdLibLoader;
use super::vfs::{Vfs, path_to_uri};
use crate::base::{FileId, Language};
use crate::error::AnalysisError;
use crate::ide::AnalysisHost;

/// Outcome of a bulk load. Per-file failures do not stop the load.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub errors: Vec<AnalysisError>,
}

impl LoadReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn merge(&mut self, other: LoadReport) {
        self.loaded += other.loaded;
        self.errors.extend(other.errors);
    }
}

/// Loads workspace files into an [`AnalysisHost`].
pub struct WorkspaceLoader;

impl WorkspaceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load the stdlib, the stubs and every workspace root of `config`.
    pub fn load_config(&self, config: &AnalysisConfig, host: &mut AnalysisHost) -> LoadReport {
        host.set_implicit_imports(config.implicit_imports.iter().map(String::as_str));
        let mut stdlib = match &config.stdlib_path {
            Some(path) => StdLibLoader::with_path(path.clone()),
            None => StdLibLoader::new(),
        };
        let mut report = stdlib.ensure_loaded_into_host(host).unwrap_or_default();
        if let Some(stubs) = &config.stubs_path
            && let Err(err) = self.load_file_into_host(stubs, host)
        {
            report.errors.push(err);
        }
        for root in &config.workspace_roots {
            report.merge(self.load_directory_into_host(root, host));
        }
        report
    }

    /// Load every Tolk, TL-B and Fift file below `path`.
    ///
    /// Files are read in parallel and applied to the host in path order.
    pub fn load_directory_into_host<P: Into<PathBuf>>(&self, path: P, host: &mut AnalysisHost) -> LoadReport {
        let path = path.into();
        let mut report = LoadReport::default();
        if !path.is_dir() {
            warn!(path = %path.display(), "directory not found");
            report.errors.push(AnalysisError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
            ));
            return report;
        }

        let (paths, walk_errors) = collect_file_paths(&path);
        report.errors.extend(walk_errors);
        let contents: Vec<(PathBuf, std::io::Result<String>)> = paths
            .into_par_iter()
            .map(|p| {
                let text = fs::read_to_string(&p);
                (p, text)
            })
            .collect();

        for (path, text) in contents {
            let result = text
                .map_err(|e| AnalysisError::io(&path, e))
                .and_then(|text| host.set_file_content(&path_to_uri(&path), &text));
            match result {
                Ok(_) => report.loaded += 1,
                Err(err) => report.errors.push(err),
            }
        }
        debug!(root = %path.display(), loaded = report.loaded, errors = report.errors.len(), "directory loaded");
        report
    }

    /// Load a single file.
    pub fn load_file_into_host<P: AsRef<Path>>(&self, path: P, host: &mut AnalysisHost) -> Result<FileId, AnalysisError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| AnalysisError::io(path, e))?;
        host.set_file_content(&path_to_uri(path), &text)
    }

    /// Load every supported file below `root` of a [`Vfs`].
    pub fn load_from_vfs(&self, vfs: &dyn Vfs, root: &str, host: &mut AnalysisHost) -> LoadReport {
        let mut report = LoadReport::default();
        let mut pending = vec![root.trim_end_matches('/').to_string()];
        while let Some(dir) = pending.pop() {
            for uri in vfs.list_files(&dir) {
                if Language::from_path(&uri).is_none() {
                    continue;
                }
                let Some(text) = vfs.read_file(&uri) else {
                    continue;
                };
                match host.set_file_content(&uri, &text) {
                    Ok(_) => report.loaded += 1,
                    Err(err) => report.errors.push(err),
                }
            }
            pending.extend(vfs.list_dirs(&dir).into_iter().rev());
        }
        report
    }
}

impl Default for WorkspaceLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Supported source files below `dir`, sorted, plus the walk failures.
pub fn collect_file_paths(dir: &Path) -> (Vec<PathBuf>, Vec<AnalysisError>) {
    let mut paths = Vec::new();
    let mut errors = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        match entry {
            Ok(entry) if entry.file_type().is_file() => {
                let path = entry.into_path();
                if Language::from_path(&path_to_uri(&path)).is_some() {
                    paths.push(path);
                }
            }
            Ok(_) => {}
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                errors.push(AnalysisError::io(path, err.into()));
            }
        }
    }
    (paths, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MemoryVfs;
    use tempfile::TempDir;

    #[test]
    fn test_load_directory_collects_supported_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("main.tolk"), "import \"lib/util\"\nfun main() {}").unwrap();
        fs::write(dir.path().join("lib/util.tolk"), "fun util() {}").unwrap();
        fs::write(dir.path().join("block.tlb"), "unit$_ = Unit;").unwrap();
        fs::write(dir.path().join("README.md"), "# readme").unwrap();

        let mut host = AnalysisHost::new();
        let report = WorkspaceLoader::new().load_directory_into_host(dir.path(), &mut host);
        assert!(report.is_ok(), "{:?}", report.errors);
        assert_eq!(report.loaded, 3);
        assert_eq!(host.file_count(), 3);
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let mut host = AnalysisHost::new();
        let report = WorkspaceLoader::new().load_directory_into_host("/definitely/not/here", &mut host);
        assert_eq!(report.loaded, 0);
        assert!(matches!(report.errors.as_slice(), [AnalysisError::Io { .. }]));
    }

    #[test]
    fn test_load_from_memory_vfs() {
        let mut vfs = MemoryVfs::new();
        vfs.insert("/ws/a.tolk", "fun a() {}");
        vfs.insert("/ws/nested/b.tolk", "fun b() {}");
        vfs.insert("/ws/notes.txt", "ignored");

        let mut host = AnalysisHost::new();
        let report = WorkspaceLoader::new().load_from_vfs(&vfs, "/ws", &mut host);
        assert_eq!(report.loaded, 2);
        assert!(host.file_id("/ws/nested/b.tolk").is_some());
    }
}
