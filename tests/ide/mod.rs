//! IDE feature tests
//!
//! Tests for:
//! - Rename (symbols and files)
//! - Find references
//! - Go to definition
//! - Hover information
//! - Code completion
//! - Document and workspace symbols

pub mod tests_completion;
pub mod tests_goto;
pub mod tests_hover;
pub mod tests_references;
pub mod tests_rename;
pub mod tests_symbols;
