//! Session configuration.

use std::path::PathBuf;

use crate::base::constants::COMMON_FILE;

/// Where the analyzer finds its inputs.
///
/// ```ignore
/// let config = AnalysisConfig::default()
///     .with_stdlib_path("/opt/tolk-stdlib")
///     .with_workspace_root("/home/me/contract");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Standard library directory. Discovered when `None`.
    pub stdlib_path: Option<PathBuf>,
    /// Compiler built-ins file (`stubs.tolk`).
    pub stubs_path: Option<PathBuf>,
    pub workspace_roots: Vec<PathBuf>,
    /// Stdlib files every Tolk file sees without an import.
    pub implicit_imports: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stdlib_path: None,
            stubs_path: None,
            workspace_roots: Vec::new(),
            implicit_imports: vec![COMMON_FILE.to_string()],
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stdlib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdlib_path = Some(path.into());
        self
    }

    pub fn with_stubs_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stubs_path = Some(path.into());
        self
    }

    pub fn with_workspace_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.workspace_roots.push(path.into());
        self
    }

    pub fn with_implicit_imports(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.implicit_imports = names.into_iter().map(Into::into).collect();
        self
    }
}
