use std::path::PathBuf;

use tracing::{debug, warn};

use super::vfs::path_to_uri;
use super::workspace_loader::{LoadReport, WorkspaceLoader};
use crate::base::constants::{STDLIB_DIR, STDLIB_ENV};
use crate::ide::AnalysisHost;

/// Loads the Tolk standard library at startup.
pub struct StdLibLoader {
    stdlib_path: PathBuf,
    loaded: bool,
}

impl StdLibLoader {
    /// Creates a loader with automatic path discovery.
    ///
    /// Searches, in order:
    /// 1. the `TOLK_STDLIB` environment variable
    /// 2. `tolk-stdlib` next to the current executable
    /// 3. `tolk-stdlib` in the current working directory
    pub fn new() -> Self {
        Self::with_path(Self::discover_path())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            stdlib_path: path,
            loaded: false,
        }
    }

    pub fn discover_path() -> PathBuf {
        if let Some(from_env) = std::env::var_os(STDLIB_ENV) {
            let path = PathBuf::from(from_env);
            if path.is_dir() {
                return path;
            }
            warn!(path = %path.display(), "{STDLIB_ENV} does not point to a directory");
        }

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        {
            let next_to_exe = exe_dir.join(STDLIB_DIR);
            if next_to_exe.is_dir() {
                return next_to_exe;
            }
        }

        PathBuf::from(STDLIB_DIR)
    }

    pub fn path(&self) -> &PathBuf {
        &self.stdlib_path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Loads the stdlib unless this loader already did. `None` when it was
    /// loaded before.
    pub fn ensure_loaded_into_host(&mut self, host: &mut AnalysisHost) -> Option<LoadReport> {
        if self.loaded {
            return None;
        }
        let report = self.load_into_host(host);
        self.loaded = true;
        Some(report)
    }

    /// Registers the stdlib root on `host`, then loads every file below it.
    pub fn load_into_host(&self, host: &mut AnalysisHost) -> LoadReport {
        host.set_stdlib_root(Some(&path_to_uri(&self.stdlib_path)));
        let report = WorkspaceLoader::new().load_directory_into_host(&self.stdlib_path, host);
        debug!(path = %self.stdlib_path.display(), files = report.loaded, "stdlib loaded");
        report
    }
}

impl Default for StdLibLoader {
    fn default() -> Self {
        Self::new()
    }
}
