//! Project loading tests
//!
//! Tests for loading a configured session from disk and from a VFS.

pub mod tests_workspace_loader;
