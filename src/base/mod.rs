//! Foundation types for the analyzer.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Interned file identifiers
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`] - Offset to line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for IDE results
//! - [`Language`] - The supported language family
//! - Domain constants (file extensions, stdlib markers)
//!
//! This module has NO dependencies on other crate modules.

pub mod constants;
mod file_id;
mod language;
mod position;

pub use file_id::FileId;
pub use language::Language;
pub use position::{LineIndex, Position, Span};

pub use text_size::{TextRange, TextSize};
