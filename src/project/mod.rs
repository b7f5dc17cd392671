//! Project management: configuration, virtual filesystem and loaders.

pub mod config;
pub mod stdlib_loader;
pub mod vfs;
pub mod workspace_loader;

pub use config::AnalysisConfig;
pub use stdlib_loader::StdLibLoader;
pub use vfs::{FsVfs, MemoryVfs, Vfs, path_to_uri};
pub use workspace_loader::{LoadReport, WorkspaceLoader, collect_file_paths};
