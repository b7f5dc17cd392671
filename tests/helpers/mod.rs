//! Shared helpers for integration tests.

pub mod cursor;
pub mod hir_helpers;
